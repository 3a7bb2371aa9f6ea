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

use console::{style, Term};
use std::process::ExitCode;

use bjlaunch::{Alert, Product};

/// Alerts written to the terminal
pub struct ConsoleAlert;

impl Alert for ConsoleAlert {
    fn error(&self, message: &str) {
        let _ = Term::stderr().write_line(&format!("{} {message}", style("error:").red().bold()));
    }

    fn warning(&self, message: &str) {
        let _ = Term::stderr().write_line(&format!("{} {message}", style("warning:").yellow().bold()));
    }
}

/// Message boxes on Windows, where the launcher usually has no console
#[cfg(windows)]
pub fn platform_alert(product: Product) -> Box<dyn Alert> {
    Box::new(bjlaunch::MessageBoxAlert { title: product.app_name() })
}

#[cfg(not(windows))]
pub fn platform_alert(_product: Product) -> Box<dyn Alert> {
    Box::new(ConsoleAlert)
}

pub fn setup_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

/// Tell the user why the launcher is giving up, if it is
pub fn report(result: anyhow::Result<()>, alert: &dyn Alert) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            alert.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
