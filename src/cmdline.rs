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

//! Windows command-line quoting.
//!
//! A spawned Windows process receives a single command-line string and splits
//! it itself: backslashes are literal unless they precede a quote, where 2n
//! backslashes become n and toggle quoting, and 2n+1 become n plus a literal
//! quote.

use std::iter;

/// Quote `arg` so the child's tokenizer hands back exactly `arg`
pub fn escape_arg(arg: &str) -> String {
    let has_space = arg.contains(' ');

    if !has_space && !arg.contains('"') {
        return arg.to_string();
    }

    let mut out = String::with_capacity(arg.len() + 2);
    if has_space {
        out.push('"');
    }

    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                // the run was already copied once; double it and escape the quote
                out.extend(iter::repeat('\\').take(backslashes + 1));
                backslashes = 0;
            }
            _ => backslashes = 0
        }
        out.push(c);
    }

    if has_space {
        // a trailing run would otherwise escape the closing quote
        out.extend(iter::repeat('\\').take(backslashes));
        out.push('"');
    }

    out
}

/// Escape each argument and join them with single spaces
pub fn join_command_line<I, S>(args: I) -> String
    where I: IntoIterator<Item = S>, S: AsRef<str>
{
    args.into_iter()
        .map(|arg| escape_arg(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a command line into arguments following the Windows runtime rules
pub fn split_command_line(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut args = Vec::new();
    let mut i = 0;

    loop {
        while i < chars.len() && is_blank(chars[i]) {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let mut arg = String::new();
        let mut in_quotes = false;

        while i < chars.len() {
            let c = chars[i];

            if c == '\\' {
                let start = i;
                while i < chars.len() && chars[i] == '\\' {
                    i += 1;
                }
                let count = i - start;

                if i < chars.len() && chars[i] == '"' {
                    arg.extend(iter::repeat('\\').take(count / 2));
                    if count % 2 == 1 {
                        arg.push('"');
                        i += 1;
                    }
                    // even run: the quote is handled on the next pass
                } else {
                    arg.extend(iter::repeat('\\').take(count));
                }
                continue;
            }

            if c == '"' {
                if in_quotes && chars.get(i + 1) == Some(&'"') {
                    arg.push('"');
                    i += 2;
                } else {
                    in_quotes = !in_quotes;
                    i += 1;
                }
                continue;
            }

            if is_blank(c) && !in_quotes {
                break;
            }

            arg.push(c);
            i += 1;
        }

        args.push(arg);
    }

    args
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}
