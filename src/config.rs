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

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::{cmdline::split_command_line, env, product::Product, props::Settings};

/// Arguments and switches for one launcher invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchConfiguration {
    /// Passed to the bootstrap class's `main`
    pub app_args: Vec<String>,

    /// Passed to the Java VM
    pub vm_args: Vec<String>,

    /// Never load the VM into the launcher process
    pub force_external: bool,

    /// Always show the selection dialog
    pub force_select: bool
}

impl LaunchConfiguration {
    /// Split launcher switches from the application's own arguments.
    /// Switches match case-insensitively, everything else is forwarded as is.
    pub fn from_tokens<I, S>(tokens: I, vm_args: Vec<String>, product: Product) -> Self
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        let mut config = LaunchConfiguration {
            vm_args,
            ..Default::default()
        };

        for token in tokens {
            let token = token.into();

            match token.to_ascii_lowercase().as_str() {
                "/select" | "--force-select" => config.force_select = true,
                "/externalvm" | "--force-external-vm" => config.force_external = true,
                // no longer has any effect, still accepted from old shortcuts
                "/javaw" => {}
                _ => config.app_args.push(token)
            }
        }

        config.app_args.extend(product.extra_app_args().iter().map(|arg| arg.to_string()));

        config
    }

    /// True when every VM argument is a property (`-D`) or VM option (`-X`),
    /// which are the only ones with an in-process equivalent
    pub fn vm_args_embeddable(&self) -> bool {
        self.vm_args
            .iter()
            .all(|arg| arg.starts_with("-D") || arg.starts_with("-X"))
    }
}

/// Everything resolved at startup, handed to discovery, selection and launch
pub struct LaunchContext {
    pub product: Product,

    /// Directory holding the launcher executable and its `lib` folder
    pub launcher_dir: PathBuf,

    /// Product version keying the remembered JDK
    pub version: String,

    pub settings: Settings,

    pub config: LaunchConfiguration
}

impl LaunchContext {
    pub fn new<I, S>(product: Product, launcher_dir: PathBuf, tokens: I) -> Self
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        let settings = Settings::load(product, &launcher_dir);
        Self::with_settings(product, launcher_dir, settings, tokens)
    }

    pub fn with_settings<I, S>(
        product: Product,
        launcher_dir: PathBuf,
        settings: Settings,
        tokens: I
    ) -> Self
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        let vm_args = settings
            .get_trimmed(product.vm_args_property())
            .map(split_command_line)
            .unwrap_or_default();

        LaunchContext {
            product,
            launcher_dir,
            version: env::get_package_version().to_string(),
            config: LaunchConfiguration::from_tokens(tokens, vm_args, product),
            settings
        }
    }

    /// JDK configured in the settings files, bypassing discovery when valid
    pub fn configured_vm(&self) -> Option<&str> {
        self.settings
            .get(self.product.vm_property())
            .filter(|vm| !vm.is_empty())
    }

    /// Bootstrap jar plus the JDK's `tools.jar` for JDKs that still ship one
    pub fn classpath(&self, jdk: &Path) -> Result<String> {
        let mut entries = vec![
            env::get_lib_dir(&self.launcher_dir).join(self.product.boot_jar())
        ];

        let tools_jar = env::tools_jar(jdk);
        if tools_jar.is_file() {
            entries.push(tools_jar);
        }

        Ok(std::env::join_paths(entries)?.to_string_lossy().to_string())
    }
}
