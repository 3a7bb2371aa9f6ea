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

pub use clap::Parser;

/// Finds a suitable JDK and starts BlueJ or Greenfoot on it
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Always show the JDK selection dialog [also: /select]
    #[arg(long)]
    pub force_select: bool,

    /// Never load Java into the launcher process [also: /externalvm]
    #[arg(long)]
    pub force_external_vm: bool,

    /// Passed on to the application, e.g. a project to open
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>
}

impl Cli {
    /// Launcher tokens in the form `LaunchConfiguration` reads them,
    /// legacy `/switch` arguments are still among `args`
    pub fn into_tokens(self) -> Vec<String> {
        let mut tokens = Vec::new();

        if self.force_select {
            tokens.push("--force-select".to_string());
        }

        if self.force_external_vm {
            tokens.push("--force-external-vm".to_string());
        }

        tokens.extend(self.args);
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_args_become_tokens() {
        let cli = Cli::parse_from(["bjlaunch", "--force-select", "/externalvm", "my project", "-x"]);

        assert_eq!(cli.into_tokens(), vec!["--force-select", "/externalvm", "my project", "-x"]);
    }

    #[test]
    fn no_arguments() {
        let cli = Cli::parse_from(["bjlaunch"]);

        assert!(!cli.force_select && !cli.force_external_vm);
        assert!(cli.into_tokens().is_empty());
    }
}
