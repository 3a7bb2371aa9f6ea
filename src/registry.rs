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

/// A JDK as listed under a vendor's registry hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryJdk {
    /// Sub-key name, e.g. "1.8" or "1.8.0_202"
    pub version: String,

    /// `JavaHome` value of the sub-key
    pub java_home: String
}

/// Source of installed-JDK entries
pub trait JdkRegistry {
    fn installed_jdks(&self) -> Vec<RegistryJdk>;
}

/// Vendor hierarchies under HKLM that list installed development kits
#[cfg_attr(not(windows), allow(dead_code))]
const PROVIDER_KEYS: [&str; 2] = [
    "Software\\JavaSoft\\Java Development Kit",
    "Software\\IBM\\Java Development Kit"
];

/// The machine's registry, or nothing on platforms without one
pub struct SystemRegistry;

#[cfg(windows)]
impl JdkRegistry for SystemRegistry {
    fn installed_jdks(&self) -> Vec<RegistryJdk> {
        use winreg::enums::KEY_WOW64_64KEY;

        // 32-bit launchers see the reflected view unless asked for the 64-bit one
        PROVIDER_KEYS.iter()
            .flat_map(|provider| [
                find_provider_jdks(provider, 0),
                find_provider_jdks(provider, KEY_WOW64_64KEY)
            ])
            .flatten()
            .collect()
    }
}

#[cfg(windows)]
fn find_provider_jdks(provider: &str, extra_flags: u32) -> Vec<RegistryJdk> {
    use winreg::{enums::*, RegKey};

    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = match hklm.open_subkey_with_flags(provider, KEY_READ | extra_flags) {
        Ok(key) => key,
        Err(err) => {
            log::debug!("Registry key {provider} unavailable: {err}");
            return Vec::new()
        }
    };

    key.enum_keys()
        .filter_map(Result::ok)
        .filter_map(|version| {
            let subkey = key.open_subkey_with_flags(&version, KEY_QUERY_VALUE | extra_flags).ok()?;
            let java_home = subkey.get_value::<String, _>("JavaHome").ok()?;

            Some(RegistryJdk { version, java_home })
        })
        .collect()
}

#[cfg(not(windows))]
impl JdkRegistry for SystemRegistry {
    fn installed_jdks(&self) -> Vec<RegistryJdk> {
        Vec::new()
    }
}
