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

use log::debug;
use std::{collections::HashMap, fs, io, path::{Path, PathBuf}};

use crate::{env, product::Product};

/// Parse `key=value` (or `key:value`) lines in file order.
///
/// Only `\\` and `\:` are unescaped, any other backslash sequence is kept
/// as written so Windows paths survive without doubling every separator.
pub fn parse_properties(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| {
            let (key, value) = split_key_value(line);
            (unescape(key.trim()), unescape(value.trim()))
        })
        .collect()
}

/// Read a properties file; a key defined more than once keeps its last value
pub fn read_properties(path: &Path) -> io::Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)?;

    // no early exit, later values override earlier ones
    Ok(parse_properties(&content).into_iter().collect())
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            return (&line[..i], &line[i + 1..]);
        }
    }

    (line, "")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == ':' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

/// Layered launcher settings; later layers override earlier ones.
#[derive(Default)]
pub struct Settings {
    layers: Vec<HashMap<String, String>>
}

impl Settings {
    pub fn from_layers(layers: Vec<HashMap<String, String>>) -> Self {
        Settings { layers }
    }

    /// Load the product's definition files from `lib`, then the user's
    /// own properties file from the user home.
    pub fn load(product: Product, launcher_dir: &Path) -> Self {
        let lib_dir = env::get_lib_dir(launcher_dir);

        let mut settings = Settings::from_layers(
            product.defs_files()
                .iter()
                .filter_map(|name| load_layer(&lib_dir.join(name)))
                .collect()
        );

        if let Some(home) = settings.user_home(product) {
            let user_props = home
                .join(product.pref_dir_name())
                .join(product.user_properties_file());

            if let Some(layer) = load_layer(&user_props) {
                settings.layers.push(layer);
            }
        }

        settings
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(name))
            .map(String::as_str)
    }

    /// Value with surrounding whitespace removed, `None` when blank
    pub fn get_trimmed(&self, name: &str) -> Option<&str> {
        self.get(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// `bluej.userHome` when configured, otherwise the user's home directory
    pub fn user_home(&self, product: Product) -> Option<PathBuf> {
        self.get_trimmed(product.user_home_property())
            .map(PathBuf::from)
            .or_else(env::get_home_dir)
    }
}

fn load_layer(path: &Path) -> Option<HashMap<String, String>> {
    match read_properties(path) {
        Ok(layer) => Some(layer),
        Err(err) => {
            debug!("Skipping settings file {}: {err}", path.display());
            None
        }
    }
}
