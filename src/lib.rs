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

mod alert;
mod cmdline;
mod config;
mod discovery;
pub mod env;
mod forward;
mod jvm;
mod launch_cmd;
mod launcher;
mod product;
mod props;
mod registry;
mod selection;
mod store;
mod validate;

use std::{io, path::PathBuf};

pub use {
    alert::Alert,
    cmdline::{escape_arg, join_command_line, split_command_line},
    config::{LaunchConfiguration, LaunchContext},
    discovery::{discover_and_launch, GoodVmSet, Outcome},
    forward::{forward, forward_target},
    jvm::{EmbedError, EmbeddedVm, JniEmbedder, VmEmbedder},
    launch_cmd::{CommandSpawner, LaunchCommand, ProcessSpawner},
    launcher::{LaunchState, Services, VmLauncher},
    product::Product,
    props::{parse_properties, read_properties, Settings},
    registry::{JdkRegistry, RegistryJdk, SystemRegistry},
    selection::{
        no_jdk_message, resolve_browsed_folder, run_selection, SelectionDialog,
        SelectionEvent, SelectionState, SelectionUi
    },
    store::{MemoryStore, PreferenceStore, SystemStore, CURRENT_VM_VALUE},
    validate::{validate, CandidateJdk, InvalidReason}
};

#[cfg(windows)]
pub use alert::MessageBoxAlert;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Couldn't get path to launcher executable")]
    LauncherPath,

    #[error("{app} could not launch Java: {source}")]
    Spawn {
        app: &'static str,
        #[source]
        source: io::Error
    },

    #[error("Couldn't find {0} class")]
    BootClassNotFound(String),

    #[error("Couldn't find main() method in {0} class")]
    MainMethodNotFound(String),

    #[error("{app} launcher could not create dialog: {reason}")]
    Dialog {
        app: &'static str,
        reason: String
    },

    #[error("Couldn't find launcher to forward to at '{0}'")]
    ForwardTarget(PathBuf)
}
