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

//! Starts the launcher of the same name in the product's sub-folder, for
//! installs that keep the real launcher one level down

use anyhow::Result;
use std::process::ExitCode;

use bjlaunch::{env, forward, forward_target, CommandSpawner, Error, Product};
use bjlaunch_cli::ui;

fn main() -> ExitCode {
    ui::setup_logger();

    let product = Product::current();
    let alert = ui::platform_alert(product);

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().to_string())
        .collect();

    ui::report(run(product, &args), alert.as_ref())
}

fn run(product: Product, args: &[String]) -> Result<()> {
    let launcher_dir = env::get_launcher_dir().ok_or(Error::LauncherPath)?;
    let exe_name = env::get_launcher_name().ok_or(Error::LauncherPath)?;

    forward(
        &forward_target(&launcher_dir, product),
        &exe_name,
        args,
        &mut CommandSpawner
    )
}
