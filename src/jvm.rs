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

use jni::{
    errors::StartJvmError,
    objects::JObject,
    InitArgsBuilder, JNIVersion, JavaVM
};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::Error;

const MAIN_SIGNATURE: &str = "([Ljava/lang/String;)V";

/// Locations of the VM library inside a JDK: directory holding the VM's
/// support libraries, and the VM variant sub-directory under it
#[cfg(windows)]
const JVM_LAYOUTS: [(&str, &str); 4] = [
    ("jre\\bin", "client"),
    ("jre\\bin", "server"),
    ("bin", "server"),
    ("bin", "client")
];
#[cfg(windows)]
const JVM_LIBRARY: &str = "jvm.dll";

#[cfg(not(windows))]
const JVM_LAYOUTS: [(&str, &str); 2] = [
    ("jre/lib", "server"),
    ("lib", "server")
];
#[cfg(not(windows))]
const JVM_LIBRARY: &str = "libjvm.so";

/// Why no in-process VM could be created
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("no JVM library found in {0}")]
    LibraryNotFound(PathBuf),

    #[error("couldn't load {0}")]
    LoadFailed(String),

    /// The library is in the process now, whatever happens next
    #[error("JVM creation failed: {0}")]
    CreateFailed(String)
}

impl EmbedError {
    pub fn library_loaded(&self) -> bool {
        matches!(self, EmbedError::CreateFailed(_))
    }
}

/// Creates a Java VM inside the launcher process
pub trait VmEmbedder {
    fn create(&mut self, jdk: &Path, options: &[String]) -> Result<Box<dyn EmbeddedVm>, EmbedError>;
}

/// A running in-process Java VM
pub trait EmbeddedVm {
    /// Check the bootstrap class and its `main(String[])` can be found
    fn find_main(&mut self, class: &str) -> Result<(), Error>;

    /// Call `main`; may never return
    fn invoke_main(&mut self, class: &str, args: &[String]);

    /// Block until the application is finished with the process
    fn wait(&mut self);

    fn destroy(self: Box<Self>);
}

/// Embeds the JDK's VM through the JNI invocation API
pub struct JniEmbedder;

impl VmEmbedder for JniEmbedder {
    fn create(&mut self, jdk: &Path, options: &[String]) -> Result<Box<dyn EmbeddedVm>, EmbedError> {
        let (library, support_dir) = find_jvm_library(jdk)
            .ok_or_else(|| EmbedError::LibraryNotFound(jdk.to_path_buf()))?;

        let mut builder = InitArgsBuilder::new()
            .version(JNIVersion::V2)
            .ignore_unrecognized(true);

        for option in options {
            builder = builder.option(option.as_str());
        }

        let args = builder.build()
            .map_err(|err| EmbedError::LoadFailed(err.to_string()))?;

        debug!("Loading {}", library.display());

        // the VM's runtime dependencies live beside it, not on the system path
        let dll_dir = DllDirectory::set(&support_dir);
        let vm = JavaVM::with_libjvm(args, || Ok(library.as_path()));
        drop(dll_dir);

        match vm {
            Ok(vm) => Ok(Box::new(JniVm { vm })),
            Err(StartJvmError::LoadError(path, err)) => {
                Err(EmbedError::LoadFailed(format!("{path}: {err}")))
            }
            Err(err) => Err(EmbedError::CreateFailed(err.to_string()))
        }
    }
}

fn find_jvm_library(jdk: &Path) -> Option<(PathBuf, PathBuf)> {
    JVM_LAYOUTS.iter()
        .map(|(support, variant)| {
            let support_dir = jdk.join(support);
            (support_dir.join(variant).join(JVM_LIBRARY), support_dir)
        })
        .find(|(library, _)| library.is_file())
}

struct JniVm {
    vm: JavaVM
}

impl EmbeddedVm for JniVm {
    fn find_main(&mut self, class: &str) -> Result<(), Error> {
        let mut env = self.vm.attach_current_thread()
            .map_err(|_| Error::BootClassNotFound(class.to_string()))?;

        let cls = match env.find_class(class.replace('.', "/")) {
            Ok(cls) => cls,
            Err(_) => {
                let _ = env.exception_clear();
                return Err(Error::BootClassNotFound(class.to_string()))
            }
        };

        if env.get_static_method_id(&cls, "main", MAIN_SIGNATURE).is_err() {
            let _ = env.exception_clear();
            return Err(Error::MainMethodNotFound(class.to_string()))
        }

        Ok(())
    }

    fn invoke_main(&mut self, class: &str, args: &[String]) {
        let mut env = match self.vm.attach_current_thread() {
            Ok(env) => env,
            Err(err) => {
                warn!("Couldn't attach to the Java VM: {err}");
                return
            }
        };

        let result = (|| -> jni::errors::Result<()> {
            let cls = env.find_class(class.replace('.', "/"))?;
            let method_args = env.new_object_array(args.len() as i32, "java/lang/String", JObject::null())?;

            for (i, arg) in args.iter().enumerate() {
                let value = env.new_string(arg)?;
                env.set_object_array_element(&method_args, i as i32, value)?;
            }

            env.call_static_method(&cls, "main", MAIN_SIGNATURE, &[(&method_args).into()])?;
            Ok(())
        })();

        if let Err(err) = result {
            // uncaught Java exceptions go to stderr
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_describe();
                let _ = env.exception_clear();
            } else {
                warn!("Calling {class}.main failed: {err}");
            }
        }
    }

    fn wait(&mut self) {
        pump_messages();
    }

    fn destroy(self: Box<Self>) {
        // blocks until every non-daemon Java thread has finished
        unsafe {
            let vm = self.vm.get_java_vm_pointer();
            if let Some(destroy) = (**vm).DestroyJavaVM {
                destroy(vm);
            }
        }
    }
}

/// Run the thread's message loop until `WM_QUIT`; the embedded application's
/// windows are served from here while the launcher has nothing else to do
#[cfg(windows)]
fn pump_messages() {
    use winapi::um::winuser::{DispatchMessageW, GetMessageW, TranslateMessage, MSG};

    unsafe {
        let mut msg: MSG = std::mem::zeroed();

        loop {
            let status = GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0);
            if status == 0 || status == -1 {
                break;
            }

            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(not(windows))]
fn pump_messages() {}

/// Adds a directory to the DLL search path until dropped
struct DllDirectory;

impl DllDirectory {
    #[cfg(windows)]
    fn set(dir: &Path) -> Self {
        use std::os::windows::ffi::OsStrExt;
        use winapi::um::winbase::SetDllDirectoryW;

        let wide: Vec<u16> = dir.as_os_str()
            .encode_wide()
            .chain(Some(0))
            .collect();

        unsafe {
            SetDllDirectoryW(wide.as_ptr());
        }

        DllDirectory
    }

    #[cfg(not(windows))]
    fn set(_dir: &Path) -> Self {
        DllDirectory
    }
}

#[cfg(windows)]
impl Drop for DllDirectory {
    fn drop(&mut self) {
        use winapi::um::winbase::SetDllDirectoryW;

        unsafe {
            SetDllDirectoryW(std::ptr::null());
        }
    }
}
