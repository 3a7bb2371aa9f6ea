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

mod cli;
mod dialog;

use anyhow::Result;
use log::info;
use std::process::ExitCode;

use bjlaunch::{
    discover_and_launch, env, run_selection, Alert, CommandSpawner, Error, JniEmbedder,
    LaunchContext, Outcome, Product, SelectionDialog, Services, SystemRegistry,
    SystemStore, VmLauncher
};
use bjlaunch_cli::ui;
use cli::{Cli, Parser};
use dialog::ConsoleSelectionUi;

fn main() -> ExitCode {
    ui::setup_logger();

    let cli = Cli::parse();
    let product = Product::current();
    let alert = ui::platform_alert(product);

    ui::report(launch(cli, product, alert.as_ref()), alert.as_ref())
}

fn launch(cli: Cli, product: Product, alert: &dyn Alert) -> Result<()> {
    let launcher_dir = env::get_launcher_dir().ok_or(Error::LauncherPath)?;
    let ctx = LaunchContext::new(product, launcher_dir, cli.into_tokens());

    let mut store = SystemStore::new(product, &ctx.version);
    let mut embedder = JniEmbedder;
    let mut spawner = CommandSpawner;

    let mut launcher = VmLauncher::new(&ctx, Services {
        store: &mut store,
        registry: &SystemRegistry,
        embedder: &mut embedder,
        spawner: &mut spawner,
        alert
    });

    let candidates = match discover_and_launch(&mut launcher) {
        Outcome::Launched => return Ok(()),
        Outcome::NeedsSelection(candidates) => candidates
    };

    info!("Asking for a JDK, {} candidates", candidates.len());

    let mut dialog = SelectionDialog::new(candidates, product);
    let mut ui = ConsoleSelectionUi::new(product);

    run_selection(&mut dialog, &mut ui, &mut launcher)
        .map_err(|err| Error::Dialog {
            app: product.app_name(),
            reason: err.to_string()
        })?;

    Ok(())
}
