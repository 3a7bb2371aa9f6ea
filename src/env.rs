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

use std::{env, ffi::OsStr, path::{self, Path, PathBuf}};

#[cfg(windows)]
pub const JAVA_EXE: &str = "java.exe";
#[cfg(not(windows))]
pub const JAVA_EXE: &str = "java";

/// Launcher without a console window
#[cfg(windows)]
pub const JAVAW_EXE: &str = "javaw.exe";
#[cfg(not(windows))]
pub const JAVAW_EXE: &str = "java";

#[cfg(windows)]
pub const JAVAC_EXE: &str = "javac.exe";
#[cfg(not(windows))]
pub const JAVAC_EXE: &str = "javac";

/// Directory containing the launcher, resolved from `argv[0]`
pub fn get_launcher_dir() -> Option<PathBuf> {
    env::args_os()
        .next()
        .and_then(|argv0| launcher_dir_from(&argv0))
}

/// `argv[0]` is not guaranteed to be fully qualified, it may be relative
/// to the current directory
pub fn launcher_dir_from(argv0: &OsStr) -> Option<PathBuf> {
    let exe = path::absolute(argv0).ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// File name of the running launcher executable, extension included
pub fn get_launcher_name() -> Option<String> {
    env::current_exe()
        .ok()?
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
}

/// Product version, used to key the remembered JDK
pub fn get_package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// `HOME` when set, as the launcher always honoured it, otherwise the
/// Windows profile directory
pub fn get_home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|var| env::var_os(var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn get_lib_dir(launcher_dir: &Path) -> PathBuf {
    launcher_dir.join("lib")
}

pub fn java_exe(jdk: &Path) -> PathBuf {
    jdk.join("bin").join(JAVA_EXE)
}

pub fn javaw_exe(jdk: &Path) -> PathBuf {
    jdk.join("bin").join(JAVAW_EXE)
}

pub fn javac_exe(jdk: &Path) -> PathBuf {
    jdk.join("bin").join(JAVAC_EXE)
}

pub fn tools_jar(jdk: &Path) -> PathBuf {
    jdk.join("lib").join("tools.jar")
}
