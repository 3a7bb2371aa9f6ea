/*
 * bjlaunch - A native launcher for BlueJ and Greenfoot
 * Copyright (C) 2023 Josh Kropf <josh@slashdev.ca>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/// Minimum Java version accepted from registry scans, compared lexically
/// against the registry sub-key name
const REQUIRED_JAVA: &str = "1.5";

/// The application a launcher build starts.
///
/// Greenfoot ships the BlueJ runtime with a few extra switches, so both share
/// the boot class and jar; they differ in names, properties and where the
/// selected JDK is remembered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    BlueJ,
    Greenfoot
}

impl Product {
    /// Product selected at build time with the `greenfoot` feature
    pub fn current() -> Self {
        if cfg!(feature = "greenfoot") {
            Product::Greenfoot
        } else {
            Product::BlueJ
        }
    }

    pub fn app_name(&self) -> &'static str {
        match self {
            Product::BlueJ => "BlueJ",
            Product::Greenfoot => "Greenfoot"
        }
    }

    /// Setting holding a JDK path that bypasses discovery
    pub fn vm_property(&self) -> &'static str {
        match self {
            Product::BlueJ => "bluej.windows.vm",
            Product::Greenfoot => "greenfoot.windows.vm"
        }
    }

    /// Setting holding extra JVM arguments, tokenized like a command line
    pub fn vm_args_property(&self) -> &'static str {
        match self {
            Product::BlueJ => "bluej.windows.vm.args",
            Product::Greenfoot => "greenfoot.windows.vm.args"
        }
    }

    pub fn user_home_property(&self) -> &'static str {
        "bluej.userHome"
    }

    /// Definition files in the `lib` directory, lowest precedence first
    pub fn defs_files(&self) -> &'static [&'static str] {
        match self {
            Product::BlueJ => &["bluej.defs"],
            Product::Greenfoot => &["bluej.defs", "greenfoot.defs"]
        }
    }

    /// Directory under the user home that holds user preferences
    pub fn pref_dir_name(&self) -> &'static str {
        match self {
            Product::BlueJ => "bluej",
            Product::Greenfoot => "greenfoot"
        }
    }

    pub fn user_properties_file(&self) -> &'static str {
        match self {
            Product::BlueJ => "bluej.properties",
            Product::Greenfoot => "greenfoot.properties"
        }
    }

    /// Arguments always appended to the ones given on the command line
    pub fn extra_app_args(&self) -> &'static [&'static str] {
        match self {
            Product::BlueJ => &[],
            Product::Greenfoot => &["-greenfoot=true", "-bluej.compiler.showunchecked=false"]
        }
    }

    /// Registry key (relative to HKCU or HKLM) storing the selected JDK
    pub fn registry_key(&self, version: &str) -> String {
        format!("Software\\{app}\\{app}\\{version}", app = self.app_name())
    }

    pub fn required_java(&self) -> &'static str {
        REQUIRED_JAVA
    }

    /// Fully qualified bootstrap class name
    pub fn boot_class(&self) -> &'static str {
        "bluej.Boot"
    }

    /// Bootstrap jar, relative to the launcher's `lib` directory
    pub fn boot_jar(&self) -> &'static str {
        "bluej.jar"
    }

    /// Sub-folder the forwarding helper hands execution to
    pub fn forward_dir(&self) -> &'static str {
        self.pref_dir_name()
    }
}

#[cfg(test)]
mod tests {
    use super::Product;

    #[test]
    fn registry_key_includes_version() {
        assert_eq!(
            Product::BlueJ.registry_key("5.2.0"),
            "Software\\BlueJ\\BlueJ\\5.2.0"
        );
        assert_eq!(
            Product::Greenfoot.registry_key("3.8.0"),
            "Software\\Greenfoot\\Greenfoot\\3.8.0"
        );
    }

    #[test]
    fn greenfoot_adds_app_args() {
        assert!(Product::BlueJ.extra_app_args().is_empty());
        assert_eq!(
            Product::Greenfoot.extra_app_args(),
            &["-greenfoot=true", "-bluej.compiler.showunchecked=false"]
        );
    }

    #[test]
    fn greenfoot_layers_its_own_defs() {
        assert_eq!(Product::Greenfoot.defs_files().last(), Some(&"greenfoot.defs"));
        assert_eq!(Product::BlueJ.defs_files(), &["bluej.defs"]);
    }
}
