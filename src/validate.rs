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
use std::{fmt, path::{self, Path, PathBuf}};

use crate::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    EmptyPath,
    MissingExecutable,
    MissingSdkMarker
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidReason::EmptyPath => write!(f, "empty path"),
            InvalidReason::MissingExecutable => write!(f, "missing executable"),
            InvalidReason::MissingSdkMarker => write!(f, "missing SDK marker")
        }
    }
}

/// A possible JDK location and whether it passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateJdk {
    /// JDK root without trailing separator
    pub path: PathBuf,
    verdict: Result<(), InvalidReason>
}

impl CandidateJdk {
    pub fn is_valid(&self) -> bool {
        self.verdict.is_ok()
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        self.verdict.err()
    }

    /// The JDK root, only when valid
    pub fn into_valid(self) -> Option<PathBuf> {
        match self.verdict {
            Ok(()) => Some(self.path),
            Err(_) => None
        }
    }
}

/// Check that `path` is the root of a full JDK: a runnable java launcher
/// plus something only a development kit ships.
pub fn validate<P: AsRef<Path>>(path: P) -> CandidateJdk {
    let path = path.as_ref();

    if path.as_os_str().is_empty() {
        return CandidateJdk {
            path: PathBuf::new(),
            verdict: Err(InvalidReason::EmptyPath)
        };
    }

    let path = strip_trailing_separators(path);

    // probe through "<root><sep>" so a root like "C:" still means its top directory
    let mut root = path.clone().into_os_string();
    root.push(path::MAIN_SEPARATOR_STR);
    let root = PathBuf::from(root);

    let verdict = if !is_executable_binary(&env::java_exe(&root)) {
        Err(InvalidReason::MissingExecutable)
    } else if !env::tools_jar(&root).is_file() && !env::javac_exe(&root).is_file() {
        Err(InvalidReason::MissingSdkMarker)
    } else {
        Ok(())
    };

    if let Err(reason) = &verdict {
        debug!("Rejected JDK candidate {}: {reason}", path.display());
    }

    CandidateJdk { path, verdict }
}

fn strip_trailing_separators(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    let trimmed = s.trim_end_matches(path::is_separator);

    if trimmed.is_empty() {
        path.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

#[cfg(windows)]
fn is_executable_binary(path: &Path) -> bool {
    use std::os::windows::ffi::OsStrExt;
    use winapi::um::winbase::GetBinaryTypeW;

    let wide: Vec<u16> = path.as_os_str()
        .encode_wide()
        .chain(Some(0))
        .collect();
    let mut binary_type = 0;

    unsafe { GetBinaryTypeW(wide.as_ptr(), &mut binary_type) != 0 }
}

#[cfg(unix)]
fn is_executable_binary(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(any(windows, unix)))]
fn is_executable_binary(path: &Path) -> bool {
    path.is_file()
}

/// Lay out a JDK that passes validation; the test binary stands in for java
#[cfg(test)]
pub(crate) fn fake_jdk(root: &Path) -> PathBuf {
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::create_dir_all(root.join("lib")).unwrap();
    std::fs::copy(std::env::current_exe().unwrap(), bin.join(env::JAVA_EXE)).unwrap();
    std::fs::write(root.join("lib").join("tools.jar"), b"").unwrap();
    root.to_path_buf()
}
