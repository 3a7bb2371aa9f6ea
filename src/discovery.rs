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

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::{launcher::VmLauncher, validate::validate};

/// Validated JDKs found so far, in discovery order and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodVmSet {
    vms: Vec<PathBuf>
}

impl GoodVmSet {
    /// Returns false when the JDK was already present
    pub fn insert(&mut self, jdk: PathBuf) -> bool {
        if self.contains(&jdk) {
            return false
        }

        self.vms.push(jdk);
        true
    }

    pub fn contains(&self, jdk: &Path) -> bool {
        self.vms.iter().any(|vm| vm == jdk)
    }

    pub fn len(&self) -> usize {
        self.vms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }

    pub fn first(&self) -> Option<&Path> {
        self.vms.first().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.vms.iter().map(PathBuf::as_path)
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.vms
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Launched,

    /// The user has to choose; candidates may be empty
    NeedsSelection(GoodVmSet)
}

/// Find a JDK without asking the user, launching it when the choice is
/// unambiguous.
///
/// The configured VM wins outright unless selection is forced. Then comes the
/// remembered VM, then every JDK the registry lists above the minimum version.
pub fn discover_and_launch(launcher: &mut VmLauncher) -> Outcome {
    let ctx = launcher.context();
    let force_select = ctx.config.force_select;
    let mut good_vms = GoodVmSet::default();

    if let Some(vm) = ctx.configured_vm() {
        let candidate = validate(vm);

        match candidate.into_valid() {
            Some(jdk) => {
                if !force_select && launcher.launch(&jdk) {
                    return Outcome::Launched
                }
                good_vms.insert(jdk);
            }
            None => info!("Ignoring configured VM {vm}")
        }
    }

    if let Some(vm) = launcher.remembered_vm() {
        let candidate = validate(&vm);

        match candidate.reason() {
            None => { good_vms.insert(candidate.path); }
            Some(reason) => debug!("Remembered VM {vm} is no longer usable: {reason}")
        }

        if let Some(outcome) = launch_single(launcher, &good_vms) {
            return outcome
        }
    }

    let required = ctx.product.required_java();

    for entry in launcher.registry_jdks() {
        if entry.version.as_str() <= required {
            debug!("Skipping JDK {} older than {required}", entry.version);
            continue
        }

        let candidate = validate(&entry.java_home);
        match candidate.reason() {
            None => {
                if good_vms.insert(candidate.path) {
                    debug!("Found JDK {} at {}", entry.version, entry.java_home);
                }
            }
            Some(reason) => debug!("Skipping JDK {} at {}: {reason}", entry.version, entry.java_home)
        }
    }

    launch_single(launcher, &good_vms)
        .unwrap_or(Outcome::NeedsSelection(good_vms))
}

/// Launch when there's exactly one candidate that hasn't already failed
fn launch_single(launcher: &mut VmLauncher, good_vms: &GoodVmSet) -> Option<Outcome> {
    if launcher.context().config.force_select || good_vms.len() != 1 {
        return None
    }

    let jdk = good_vms.first()?;

    if launcher.has_failed(jdk) || !launcher.launch(jdk) {
        return None
    }

    Some(Outcome::Launched)
}
