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
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::path::PathBuf;

use bjlaunch::{Product, SelectionDialog, SelectionEvent, SelectionUi};

fn console_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// JDK selection dialog drawn with terminal prompts
pub struct ConsoleSelectionUi {
    product: Product,
    term: Term
}

impl ConsoleSelectionUi {
    pub fn new(product: Product) -> Self {
        ConsoleSelectionUi {
            product,
            term: Term::stderr()
        }
    }
}

impl SelectionUi for ConsoleSelectionUi {
    fn next_event(&mut self, dialog: &SelectionDialog) -> Result<SelectionEvent> {
        let mut items: Vec<String> = dialog.candidates()
            .iter()
            .map(|jdk| jdk.display().to_string())
            .collect();

        let browse = items.len();
        items.push("Browse for a JDK folder...".to_string());

        let launch = match dialog.selected() {
            Some(index) if dialog.launch_enabled() => {
                items.push(format!("Launch with {}", dialog.candidates()[index].display()));
                Some(items.len() - 1)
            }
            _ => None
        };

        let quit = items.len();
        items.push("Quit".to_string());

        let selection = Select::with_theme(&console_theme())
            .with_prompt(format!("Select the JDK to run {}", self.product.app_name()))
            .items(&items)
            .default(launch.or(dialog.selected()).unwrap_or(0))
            .interact_on_opt(&self.term)?;

        Ok(match selection {
            None => SelectionEvent::Quit,
            Some(index) if index == browse => SelectionEvent::Browse,
            Some(index) if Some(index) == launch => SelectionEvent::Launch,
            Some(index) if index == quit => SelectionEvent::Quit,
            Some(index) => SelectionEvent::Select(index)
        })
    }

    fn browse(&mut self) -> Result<Option<PathBuf>> {
        let folder: String = Input::with_theme(&console_theme())
            .with_prompt("JDK folder (empty to cancel)")
            .allow_empty(true)
            .interact_text_on(&self.term)?;

        let folder = folder.trim();

        Ok((!folder.is_empty()).then(|| PathBuf::from(folder)))
    }
}
