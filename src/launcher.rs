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

use log::{debug, info, warn};
use std::{
    io,
    path::{Path, PathBuf}
};

use crate::{
    alert::Alert,
    config::LaunchContext,
    env,
    jvm::VmEmbedder,
    launch_cmd::{LaunchCommand, ProcessSpawner},
    registry::{JdkRegistry, RegistryJdk},
    store::PreferenceStore,
    Error
};

/// Progress of the most recent launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    NotStarted,
    AttemptEmbedded,
    Running,
    FellBackToExternal,
    Exited
}

/// Everything the launcher talks to outside the process
pub struct Services<'a> {
    pub store: &'a mut dyn PreferenceStore,
    pub registry: &'a dyn JdkRegistry,
    pub embedder: &'a mut dyn VmEmbedder,
    pub spawner: &'a mut dyn ProcessSpawner,
    pub alert: &'a dyn Alert
}

/// Starts the product on a chosen JDK, in process when possible
pub struct VmLauncher<'a> {
    ctx: &'a LaunchContext,
    services: Services<'a>,
    state: LaunchState,

    /// Set once a VM library has been loaded; a second one must never be
    embedded_once: bool,

    /// JDKs that couldn't be started during this run
    failed: Vec<PathBuf>
}

impl<'a> VmLauncher<'a> {
    pub fn new(ctx: &'a LaunchContext, services: Services<'a>) -> Self {
        VmLauncher {
            ctx,
            services,
            state: LaunchState::NotStarted,
            embedded_once: false,
            failed: vec![]
        }
    }

    pub fn context(&self) -> &'a LaunchContext {
        self.ctx
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn alert(&self) -> &'a dyn Alert {
        self.services.alert
    }

    pub fn has_failed(&self, jdk: &Path) -> bool {
        self.failed.iter().any(|failed| failed == jdk)
    }

    /// JDK remembered from an earlier successful launch
    pub fn remembered_vm(&self) -> Option<String> {
        self.services.store.current_vm()
    }

    pub fn registry_jdks(&self) -> Vec<RegistryJdk> {
        self.services.registry.installed_jdks()
    }

    /// Start the product with `jdk`. Returns false only when Java couldn't be
    /// started at all; the user has been told why.
    pub fn launch(&mut self, jdk: &Path) -> bool {
        info!("Launching with JDK {}", jdk.display());

        let config = &self.ctx.config;
        let launched = if config.force_external || self.embedded_once || !config.vm_args_embeddable() {
            self.launch_external(jdk)
        } else {
            self.launch_embedded(jdk)
        };

        if !launched {
            self.failed.push(jdk.to_path_buf());
        }

        launched
    }

    fn launch_embedded(&mut self, jdk: &Path) -> bool {
        self.state = LaunchState::AttemptEmbedded;

        let classpath = match self.ctx.classpath(jdk) {
            Ok(classpath) => classpath,
            Err(err) => {
                warn!("Couldn't build class path: {err}");
                return self.launch_external(jdk)
            }
        };

        let mut options = vec![format!("-Djava.class.path={classpath}")];
        options.extend(self.ctx.config.vm_args.iter().cloned());

        let mut vm = match self.services.embedder.create(jdk, &options) {
            Ok(vm) => vm,
            Err(err) => {
                if err.library_loaded() {
                    self.embedded_once = true;
                }

                debug!("Embedding failed, using external VM: {err}");
                return self.launch_external(jdk)
            }
        };

        self.embedded_once = true;
        self.state = LaunchState::Running;

        let boot_class = self.ctx.product.boot_class();

        match vm.find_main(boot_class) {
            Ok(()) => {
                // control may never come back from main
                self.remember(jdk);
                vm.invoke_main(boot_class, &self.ctx.config.app_args);
                vm.wait();
            }
            Err(err) => self.services.alert.error(&err.to_string())
        }

        vm.destroy();
        self.state = LaunchState::Exited;

        true
    }

    fn launch_external(&mut self, jdk: &Path) -> bool {
        if self.state == LaunchState::AttemptEmbedded {
            self.state = LaunchState::FellBackToExternal;
        }

        let app = self.ctx.product.app_name();

        let classpath = match self.ctx.classpath(jdk) {
            Ok(classpath) => classpath,
            Err(err) => {
                self.services.alert.error(&format!("{app} could not launch Java: {err}"));
                return false
            }
        };

        let mut cmd = LaunchCommand::new(&env::javaw_exe(jdk));
        cmd.arg_ctx("classpath", classpath)
            .arg_ctx("boot_class", self.ctx.product.boot_class())
            .arg("-classpath")
            .arg("${classpath}")
            .literal_args(&self.ctx.config.vm_args)
            .arg("${boot_class}")
            .literal_args(&self.ctx.config.app_args);

        debug!("Command line: {}", cmd.command_line());

        let result = match cmd.spawn(self.services.spawner, None) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No windowed launcher, trying {}", env::JAVA_EXE);

                cmd.set_program(&env::java_exe(jdk));
                cmd.spawn(self.services.spawner, Some(&self.ctx.launcher_dir))
            }
            result => result
        };

        if let Err(source) = result {
            self.services.alert.error(&Error::Spawn { app, source }.to_string());
            return false
        }

        self.remember(jdk);
        self.state = LaunchState::Exited;

        true
    }

    fn remember(&mut self, jdk: &Path) {
        if let Err(err) = self.services.store.save_current_vm(jdk) {
            warn!("Couldn't remember JDK {}: {err}", jdk.display());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        alert::tests::RecordingAlert,
        jvm::{EmbedError, EmbeddedVm},
        product::Product,
        props::Settings,
        store::MemoryStore
    };
    use std::{cell::RefCell, rc::Rc};

    /// Registry listing a fixed set of JDKs, counting how often it's asked
    #[derive(Default)]
    pub(crate) struct FakeRegistry {
        pub jdks: Vec<RegistryJdk>,
        pub scans: RefCell<usize>
    }

    impl JdkRegistry for FakeRegistry {
        fn installed_jdks(&self) -> Vec<RegistryJdk> {
            *self.scans.borrow_mut() += 1;
            self.jdks.clone()
        }
    }

    /// Spawner failing for listed programs, or for the first few calls,
    /// and recording the rest
    #[derive(Default)]
    pub(crate) struct FakeSpawner {
        pub missing: Vec<PathBuf>,
        pub refuse: usize,
        pub spawned: Vec<(PathBuf, String, Option<PathBuf>)>
    }

    impl ProcessSpawner for FakeSpawner {
        fn spawn(&mut self, program: &Path, args_line: &str, current_dir: Option<&Path>) -> io::Result<()> {
            if self.refuse > 0 || self.missing.iter().any(|missing| missing == program) {
                self.refuse = self.refuse.saturating_sub(1);
                return Err(io::Error::new(io::ErrorKind::NotFound, "not found"))
            }

            self.spawned.push((
                program.to_path_buf(),
                args_line.to_string(),
                current_dir.map(Path::to_path_buf)
            ));

            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum VmEvent {
        Created(PathBuf, Vec<String>),
        Invoked(Vec<String>, bool),
        Waited,
        Destroyed
    }

    /// Embedder that fails with a preset error or hands out a recording VM
    #[derive(Default)]
    pub(crate) struct FakeEmbedder {
        pub fail_with: Option<fn() -> EmbedError>,
        pub missing_main: bool,
        pub events: Rc<RefCell<Vec<VmEvent>>>,
        pub store: Option<Rc<RefCell<Vec<PathBuf>>>>
    }

    struct FakeVm {
        missing_main: bool,
        events: Rc<RefCell<Vec<VmEvent>>>,
        saved_before_invoke: Option<Rc<RefCell<Vec<PathBuf>>>>
    }

    impl VmEmbedder for FakeEmbedder {
        fn create(&mut self, jdk: &Path, options: &[String]) -> Result<Box<dyn EmbeddedVm>, EmbedError> {
            self.events.borrow_mut().push(VmEvent::Created(jdk.to_path_buf(), options.to_vec()));

            if let Some(error) = self.fail_with {
                return Err(error())
            }

            Ok(Box::new(FakeVm {
                missing_main: self.missing_main,
                events: self.events.clone(),
                saved_before_invoke: self.store.clone()
            }))
        }
    }

    impl EmbeddedVm for FakeVm {
        fn find_main(&mut self, class: &str) -> Result<(), Error> {
            if self.missing_main {
                Err(Error::MainMethodNotFound(class.to_string()))
            } else {
                Ok(())
            }
        }

        fn invoke_main(&mut self, _class: &str, args: &[String]) {
            let saved = self.saved_before_invoke
                .as_ref()
                .map_or(false, |saved| !saved.borrow().is_empty());
            self.events.borrow_mut().push(VmEvent::Invoked(args.to_vec(), saved));
        }

        fn wait(&mut self) {
            self.events.borrow_mut().push(VmEvent::Waited);
        }

        fn destroy(self: Box<Self>) {
            self.events.borrow_mut().push(VmEvent::Destroyed);
        }
    }

    /// Store sharing its saved list so a fake VM can peek at it
    pub(crate) struct SharedStore(pub Rc<RefCell<Vec<PathBuf>>>);

    impl PreferenceStore for SharedStore {
        fn current_vm(&self) -> Option<String> {
            None
        }

        fn save_current_vm(&mut self, jdk: &Path) -> io::Result<()> {
            self.0.borrow_mut().push(jdk.to_path_buf());
            Ok(())
        }
    }

    pub(crate) fn context(tokens: &[&str], vm_args: &[&str]) -> LaunchContext {
        let mut ctx = LaunchContext::with_settings(
            Product::BlueJ,
            PathBuf::from("/opt/bluej"),
            Settings::default(),
            tokens.iter().copied()
        );
        ctx.config.vm_args = vm_args.iter().map(|arg| arg.to_string()).collect();
        ctx
    }

    fn load_failure() -> EmbedError {
        EmbedError::LoadFailed("jvm.dll".into())
    }

    fn create_failure() -> EmbedError {
        EmbedError::CreateFailed("bad option".into())
    }

    #[test]
    fn embeds_and_saves_before_invoking_main() {
        let ctx = context(&["project"], &["-Xmx512m", "-Dfoo=bar"]);
        let saved = Rc::new(RefCell::new(vec![]));
        let mut store = SharedStore(saved.clone());
        let mut embedder = FakeEmbedder { store: Some(saved.clone()), ..Default::default() };
        let mut spawner = FakeSpawner::default();
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(Path::new("/jdk")));
        assert_eq!(launcher.state(), LaunchState::Exited);

        let events = embedder.events.borrow();
        match &events[0] {
            VmEvent::Created(jdk, options) => {
                assert_eq!(jdk, Path::new("/jdk"));
                assert!(options[0].starts_with("-Djava.class.path="));
                assert_eq!(&options[1..], ["-Xmx512m", "-Dfoo=bar"]);
            }
            other => panic!("unexpected {other:?}")
        }
        assert_eq!(events[1], VmEvent::Invoked(vec!["project".into()], true));
        assert_eq!(&events[2..], [VmEvent::Waited, VmEvent::Destroyed]);

        assert!(spawner.spawned.is_empty());
        assert_eq!(*saved.borrow(), vec![PathBuf::from("/jdk")]);
    }

    #[test]
    fn unembeddable_vm_arg_goes_external() {
        let ctx = context(&[], &["-Xmx512m", "-Dfoo=bar", "-server"]);
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder::default();
        let mut spawner = FakeSpawner::default();
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(Path::new("/jdk")));
        assert!(embedder.events.borrow().is_empty());
        assert_eq!(spawner.spawned.len(), 1);

        let (program, args, cwd) = &spawner.spawned[0];
        assert_eq!(program, &env::javaw_exe(Path::new("/jdk")));
        assert!(args.starts_with("-classpath "));
        assert!(args.ends_with("-Xmx512m -Dfoo=bar -server bluej.Boot"));
        assert_eq!(cwd, &None);
        assert_eq!(store.saved, vec![PathBuf::from("/jdk")]);
    }

    #[test]
    fn forced_external_skips_embedding() {
        let ctx = context(&["/externalvm"], &[]);
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder::default();
        let mut spawner = FakeSpawner::default();
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(Path::new("/jdk")));
        assert!(embedder.events.borrow().is_empty());
        assert_eq!(spawner.spawned.len(), 1);
    }

    #[test]
    fn load_failure_falls_back_and_may_embed_again() {
        let ctx = context(&[], &[]);
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder { fail_with: Some(load_failure), ..Default::default() };
        let mut spawner = FakeSpawner::default();
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(Path::new("/jdk1")));
        assert_eq!(launcher.state(), LaunchState::Exited);
        assert!(launcher.launch(Path::new("/jdk2")));

        assert_eq!(embedder.events.borrow().len(), 2);
        assert_eq!(spawner.spawned.len(), 2);
        assert!(alert.errors.borrow().is_empty());
    }

    #[test]
    fn loaded_library_never_embedded_twice() {
        let ctx = context(&[], &[]);
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder { fail_with: Some(create_failure), ..Default::default() };
        let mut spawner = FakeSpawner::default();
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(Path::new("/jdk1")));
        assert!(launcher.launch(Path::new("/jdk2")));

        assert_eq!(embedder.events.borrow().len(), 1);
        assert_eq!(spawner.spawned.len(), 2);
    }

    #[test]
    fn missing_main_alerts_and_tears_down() {
        let ctx = context(&[], &[]);
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder { missing_main: true, ..Default::default() };
        let mut spawner = FakeSpawner::default();
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(Path::new("/jdk")));

        let events = embedder.events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], VmEvent::Destroyed);
        assert_eq!(
            *alert.errors.borrow(),
            vec!["Couldn't find main() method in bluej.Boot class"]
        );
        assert!(store.saved.is_empty());
    }

    #[test]
    fn console_launcher_retried_from_launcher_dir() {
        let ctx = context(&["/externalvm"], &[]);
        let jdk = Path::new("/jdk");
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder::default();
        let mut spawner = FakeSpawner { refuse: 1, ..Default::default() };
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(launcher.launch(jdk));

        let (program, _, cwd) = &spawner.spawned[0];
        assert_eq!(program, &env::java_exe(jdk));
        assert_eq!(cwd.as_deref(), Some(Path::new("/opt/bluej")));
    }

    #[test]
    fn both_launchers_missing_is_fatal() {
        let ctx = context(&["/externalvm"], &[]);
        let jdk = Path::new("/jdk");
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder::default();
        let mut spawner = FakeSpawner {
            missing: vec![env::javaw_exe(jdk), env::java_exe(jdk)],
            ..Default::default()
        };
        let alert = RecordingAlert::default();
        let registry = FakeRegistry::default();

        let mut launcher = VmLauncher::new(&ctx, Services {
            store: &mut store,
            registry: &registry,
            embedder: &mut embedder,
            spawner: &mut spawner,
            alert: &alert
        });

        assert!(!launcher.launch(jdk));
        assert!(launcher.has_failed(jdk));
        drop(launcher);

        assert_eq!(*alert.errors.borrow(), vec!["BlueJ could not launch Java: not found"]);
        assert!(store.saved.is_empty());
    }
}
