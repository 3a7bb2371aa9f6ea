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

use std::{io, path::{Path, PathBuf}};

use crate::product::Product;

/// Registry value holding the last JDK that launched successfully
pub const CURRENT_VM_VALUE: &str = "CurrentVM";

/// Durable record of the JDK selected on a previous run
pub trait PreferenceStore {
    /// Stored JDK path, if any; the caller re-validates it
    fn current_vm(&self) -> Option<String>;

    fn save_current_vm(&mut self, jdk: &Path) -> io::Result<()>;
}

/// Non-durable store used where no registry is available
#[derive(Default)]
pub struct MemoryStore {
    pub current_vm: Option<String>,

    /// Every path saved, in order
    pub saved: Vec<PathBuf>
}

impl PreferenceStore for MemoryStore {
    fn current_vm(&self) -> Option<String> {
        self.current_vm.clone()
    }

    fn save_current_vm(&mut self, jdk: &Path) -> io::Result<()> {
        self.current_vm = Some(jdk.to_string_lossy().to_string());
        self.saved.push(jdk.to_path_buf());
        Ok(())
    }
}

/// The selected JDK remembered in the registry, keyed by product version
pub struct SystemStore {
    #[cfg_attr(not(windows), allow(dead_code))]
    key: String
}

impl SystemStore {
    pub fn new(product: Product, version: &str) -> Self {
        SystemStore {
            key: product.registry_key(version)
        }
    }
}

#[cfg(windows)]
impl PreferenceStore for SystemStore {
    fn current_vm(&self) -> Option<String> {
        use winreg::{enums::*, RegKey};

        // the per-user key shadows the machine-wide one even without a value
        let key = [HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE]
            .iter()
            .find_map(|hive| RegKey::predef(*hive).open_subkey_with_flags(&self.key, KEY_READ).ok())?;

        match key.get_value::<String, _>(CURRENT_VM_VALUE) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("No {CURRENT_VM_VALUE} under {}: {err}", self.key);
                None
            }
        }
    }

    fn save_current_vm(&mut self, jdk: &Path) -> io::Result<()> {
        use winreg::{enums::*, RegKey};

        let (key, _) = RegKey::predef(HKEY_CURRENT_USER).create_subkey(&self.key)?;
        key.set_value(CURRENT_VM_VALUE, &jdk.to_string_lossy().to_string())
    }
}

#[cfg(not(windows))]
impl PreferenceStore for SystemStore {
    fn current_vm(&self) -> Option<String> {
        None
    }

    fn save_current_vm(&mut self, jdk: &Path) -> io::Result<()> {
        log::debug!("No registry on this platform, not remembering {}", jdk.display());
        Ok(())
    }
}
