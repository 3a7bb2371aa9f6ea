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

/// Tells the user about something that went wrong
pub trait Alert {
    /// Report a failure that stops the current launch
    fn error(&self, message: &str);

    /// Report something the user should act on
    fn warning(&self, message: &str);
}

/// Alerts shown as native message boxes titled with the product name
#[cfg(windows)]
pub struct MessageBoxAlert {
    pub title: &'static str
}

#[cfg(windows)]
impl MessageBoxAlert {
    fn show(&self, message: &str, icon: u32) {
        use std::{ffi::OsStr, os::windows::ffi::OsStrExt, ptr};
        use winapi::um::winuser::{MessageBoxW, MB_OK};

        let wide = |s: &str| -> Vec<u16> {
            OsStr::new(s).encode_wide().chain(Some(0)).collect()
        };

        let text = wide(message);
        let caption = wide(self.title);

        unsafe {
            MessageBoxW(ptr::null_mut(), text.as_ptr(), caption.as_ptr(), MB_OK | icon);
        }
    }
}

#[cfg(windows)]
impl Alert for MessageBoxAlert {
    fn error(&self, message: &str) {
        self.show(message, winapi::um::winuser::MB_ICONERROR);
    }

    fn warning(&self, message: &str) {
        self.show(message, winapi::um::winuser::MB_ICONEXCLAMATION);
    }
}
