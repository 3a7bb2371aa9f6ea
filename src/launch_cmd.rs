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

use std::{collections::HashMap, io, path::{Path, PathBuf}, process::Command};

use crate::cmdline::{escape_arg, join_command_line};

/// Starts a process from a program path and an already escaped argument line
pub trait ProcessSpawner {
    fn spawn(&mut self, program: &Path, args_line: &str, current_dir: Option<&Path>) -> io::Result<()>;
}

/// Spawns real processes and leaves them running
pub struct CommandSpawner;

impl ProcessSpawner for CommandSpawner {
    fn spawn(&mut self, program: &Path, args_line: &str, current_dir: Option<&Path>) -> io::Result<()> {
        let mut cmd = Command::new(program);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;

            // hand over the line untouched, it is already quoted for the child
            cmd.raw_arg(args_line);
        }

        #[cfg(not(windows))]
        cmd.args(crate::cmdline::split_command_line(args_line));

        if let Some(dir) = current_dir {
            cmd.current_dir(dir);
        }

        // the child is never waited for
        cmd.spawn().map(|_child| ())
    }
}

enum CommandArg {
    /// Expanded against the command's context
    Template(String),
    Literal(String)
}

/// Command line for an external Java process
pub struct LaunchCommand {
    program: PathBuf,
    ctx: HashMap<&'static str, String>,
    args: Vec<CommandArg>
}

impl LaunchCommand {
    pub fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            ctx: HashMap::new(),
            args: Vec::new()
        }
    }

    /// Swap the executable, keeping the arguments
    pub fn set_program(&mut self, program: &Path) -> &mut Self {
        self.program = program.to_path_buf();
        self
    }

    pub fn arg_ctx<S: Into<String>>(&mut self, key: &'static str, val: S) -> &mut Self {
        self.ctx.insert(key, val.into());
        self
    }

    /// Add an argument; `${name}` placeholders expand from the context
    pub fn arg<S: Into<String>>(&mut self, val: S) -> &mut Self {
        self.args.push(CommandArg::Template(val.into()));
        self
    }

    /// Add user supplied arguments, never expanded
    pub fn literal_args<I>(&mut self, iter: I) -> &mut Self
        where I: IntoIterator, I::Item: Into<String>
    {
        iter.into_iter().for_each(|v| self.args.push(CommandArg::Literal(v.into())));
        self
    }

    pub fn expanded_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match arg {
                CommandArg::Template(arg) => shellexpand::env_with_context_no_errors(
                    arg,
                    |var: &str| self.ctx.get(var)
                ).to_string(),
                CommandArg::Literal(arg) => arg.clone()
            })
            .collect()
    }

    /// Arguments after the program, escaped and joined
    pub fn args_line(&self) -> String {
        join_command_line(self.expanded_args())
    }

    /// Full command line, program included
    pub fn command_line(&self) -> String {
        let program = escape_arg(&self.program.to_string_lossy());
        let args = self.args_line();

        if args.is_empty() {
            program
        } else {
            format!("{program} {args}")
        }
    }

    pub fn spawn(&self, spawner: &mut dyn ProcessSpawner, current_dir: Option<&Path>) -> io::Result<()> {
        spawner.spawn(&self.program, &self.args_line(), current_dir)
    }
}
