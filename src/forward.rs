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

use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::{launch_cmd::{LaunchCommand, ProcessSpawner}, product::Product, Error};

/// Folder the forwarding launcher hands over to
pub fn forward_target(launcher_dir: &Path, product: Product) -> PathBuf {
    launcher_dir.join(product.forward_dir())
}

/// Start `<target_dir>/<exe_name>` with `args` from inside `target_dir`,
/// without waiting for it
pub fn forward(
    target_dir: &Path,
    exe_name: &str,
    args: &[String],
    spawner: &mut dyn ProcessSpawner
) -> Result<()> {
    let target = target_dir.join(exe_name);

    if !target.is_file() {
        bail!(Error::ForwardTarget(target));
    }

    let mut cmd = LaunchCommand::new(&target);
    cmd.literal_args(args);

    info!("Forwarding to {}", cmd.command_line());

    cmd.spawn(spawner, Some(target_dir))
        .with_context(|| format!("Couldn't start {}", target.display()))
}
