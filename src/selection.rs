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
use log::debug;
use std::path::{Path, PathBuf};

use crate::{discovery::GoodVmSet, launcher::VmLauncher, product::Product, validate::validate};

/// Shown in place of the candidate list when discovery found nothing
pub fn no_jdk_message(product: Product) -> String {
    format!(
        "No (suitable) Java JDKs were found. {} requires JDK version {} or later.\n\
        Please also note, the Java JRE is not sufficient. You need a full JDK.\n\
        Browse to the folder of an installed JDK to continue.",
        product.app_name(),
        product.required_java()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    CandidateSelected(usize),
    Browsing,
    LaunchRequested(PathBuf)
}

/// What the user did with the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Select(usize),
    Browse,

    /// Folder picked while browsing, `None` when cancelled
    Browsed(Option<PathBuf>),

    Launch,
    Quit
}

/// State of the JDK selection dialog, independent of how it's drawn
pub struct SelectionDialog {
    candidates: Vec<PathBuf>,
    state: SelectionState,
    selected: Option<usize>,
    notice: Option<String>,
    closed: bool
}

impl SelectionDialog {
    pub fn new(candidates: GoodVmSet, product: Product) -> Self {
        let notice = candidates.is_empty().then(|| no_jdk_message(product));

        SelectionDialog {
            candidates: candidates.into_vec(),
            state: SelectionState::Idle,
            selected: None,
            notice,
            closed: false
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Message for the user in place of, or on top of, the list
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn launch_enabled(&self) -> bool {
        matches!(self.state, SelectionState::CandidateSelected(_))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn handle(&mut self, event: SelectionEvent) -> &SelectionState {
        use SelectionEvent::*;
        use SelectionState::*;

        match (self.state.clone(), event) {
            (_, Quit) => self.closed = true,

            (Idle | CandidateSelected(_), Select(index)) if index < self.candidates.len() => {
                self.select(index);
            }

            (Idle | CandidateSelected(_), Browse) => self.state = Browsing,

            (Browsing, Browsed(Some(folder))) => match resolve_browsed_folder(&folder) {
                Some(jdk) => {
                    let index = match self.candidates.iter().position(|c| *c == jdk) {
                        Some(index) => index,
                        None => {
                            self.candidates.push(jdk);
                            self.candidates.len() - 1
                        }
                    };

                    self.notice = None;
                    self.select(index);
                }
                None => {
                    debug!("{} is not a JDK", folder.display());
                    self.notice = Some(format!(
                        "The selected folder is not a valid JDK:\n{}",
                        folder.display()
                    ));
                    self.reopen();
                }
            },

            (Browsing, Browsed(None)) => self.reopen(),

            (CandidateSelected(index), Launch) => {
                self.state = LaunchRequested(self.candidates[index].clone());
            }

            (state, event) => debug!("Ignoring {event:?} while {state:?}")
        }

        &self.state
    }

    /// Back to the list, keeping the last selection
    pub fn reopen(&mut self) {
        self.state = match self.selected {
            Some(index) => SelectionState::CandidateSelected(index),
            None => SelectionState::Idle
        };
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.state = SelectionState::CandidateSelected(index);
    }
}

/// Accept a JDK root, its `jre/bin` folder, or any folder directly inside
/// one such as `bin`
pub fn resolve_browsed_folder(folder: &Path) -> Option<PathBuf> {
    let parent = folder.parent();
    let grandparent = parent
        .filter(|parent| has_name(folder, "bin") && has_name(parent, "jre"))
        .and_then(Path::parent);

    [Some(folder), grandparent, parent]
        .into_iter()
        .flatten()
        .filter(|path| !path.as_os_str().is_empty())
        .find_map(|path| validate(path).into_valid())
}

fn has_name(path: &Path, name: &str) -> bool {
    path.file_name()
        .map_or(false, |file_name| file_name.to_string_lossy().eq_ignore_ascii_case(name))
}

/// Renders a [`SelectionDialog`] and reports what the user does with it
pub trait SelectionUi {
    /// Show the dialog and wait for the next action
    fn next_event(&mut self, dialog: &SelectionDialog) -> Result<SelectionEvent>;

    /// Ask for a folder, `None` when cancelled
    fn browse(&mut self) -> Result<Option<PathBuf>>;
}

/// Run the dialog until a JDK launches or the user quits.
/// Returns true when something was launched; a failed launch returns to the list.
/// Each new notice is raised as a warning alert.
pub fn run_selection(
    dialog: &mut SelectionDialog,
    ui: &mut dyn SelectionUi,
    launcher: &mut VmLauncher
) -> Result<bool> {
    let mut shown: Option<String> = None;

    loop {
        if dialog.notice() != shown.as_deref() {
            if let Some(notice) = dialog.notice() {
                launcher.alert().warning(notice);
            }
            shown = dialog.notice().map(str::to_string);
        }

        let event = match dialog.state() {
            SelectionState::Browsing => SelectionEvent::Browsed(ui.browse()?),
            _ => ui.next_event(dialog)?
        };

        if let SelectionState::LaunchRequested(jdk) = dialog.handle(event).clone() {
            if launcher.launch(&jdk) {
                return Ok(true)
            }

            dialog.reopen();
        }

        if dialog.is_closed() {
            return Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        alert::tests::RecordingAlert,
        env,
        launcher::{tests::*, Services},
        store::MemoryStore,
        validate::fake_jdk
    };
    use std::collections::VecDeque;

    /// Plays back a fixed script of events and browse results
    struct ScriptedUi {
        events: VecDeque<SelectionEvent>,
        browsed: VecDeque<Option<PathBuf>>,
        launch_enabled: Vec<bool>
    }

    impl SelectionUi for ScriptedUi {
        fn next_event(&mut self, dialog: &SelectionDialog) -> Result<SelectionEvent> {
            self.launch_enabled.push(dialog.launch_enabled());
            Ok(self.events.pop_front().unwrap_or(SelectionEvent::Quit))
        }

        fn browse(&mut self) -> Result<Option<PathBuf>> {
            Ok(self.browsed.pop_front().flatten())
        }
    }

    fn candidates(paths: &[&Path]) -> GoodVmSet {
        let mut set = GoodVmSet::default();
        for path in paths {
            set.insert(path.to_path_buf());
        }
        set
    }

    #[test]
    fn empty_dialog_explains_and_disables_launch() {
        let mut dialog = SelectionDialog::new(GoodVmSet::default(), Product::BlueJ);

        assert!(dialog.notice().unwrap().starts_with("No (suitable) Java JDKs were found"));
        assert!(!dialog.launch_enabled());

        dialog.handle(SelectionEvent::Select(0));
        dialog.handle(SelectionEvent::Launch);
        assert_eq!(dialog.state(), &SelectionState::Idle);
    }

    #[test]
    fn launch_requires_selection() {
        let mut dialog = SelectionDialog::new(candidates(&[Path::new("/a"), Path::new("/b")]), Product::BlueJ);
        assert!(dialog.notice().is_none());

        dialog.handle(SelectionEvent::Launch);
        assert_eq!(dialog.state(), &SelectionState::Idle);

        dialog.handle(SelectionEvent::Select(1));
        assert!(dialog.launch_enabled());

        let state = dialog.handle(SelectionEvent::Launch);
        assert_eq!(state, &SelectionState::LaunchRequested(PathBuf::from("/b")));
    }

    #[test]
    fn browsed_jdk_becomes_selected_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let jdk = fake_jdk(&dir.path().join("jdk"));
        let mut dialog = SelectionDialog::new(GoodVmSet::default(), Product::BlueJ);

        dialog.handle(SelectionEvent::Browse);
        dialog.handle(SelectionEvent::Browsed(Some(jdk.join("bin"))));

        assert_eq!(dialog.candidates(), [jdk.clone()]);
        assert_eq!(dialog.state(), &SelectionState::CandidateSelected(0));
        assert!(dialog.notice().is_none());
    }

    #[test]
    fn invalid_browse_keeps_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        let not_jdk = dir.path().join("apps").join("tools").join("empty");
        std::fs::create_dir_all(&not_jdk).unwrap();
        let mut dialog = SelectionDialog::new(candidates(&[Path::new("/a")]), Product::BlueJ);

        dialog.handle(SelectionEvent::Select(0));
        dialog.handle(SelectionEvent::Browse);
        dialog.handle(SelectionEvent::Browsed(Some(not_jdk)));

        assert_eq!(dialog.state(), &SelectionState::CandidateSelected(0));
        assert!(dialog.notice().unwrap().contains("not a valid JDK"));

        dialog.handle(SelectionEvent::Browse);
        dialog.handle(SelectionEvent::Browsed(None));
        assert_eq!(dialog.state(), &SelectionState::CandidateSelected(0));
    }

    #[test]
    fn browsed_folder_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let apps = dir.path().join("apps").join("java");
        let jdk = fake_jdk(&apps.join("jdk"));
        let jre_bin = jdk.join("jre").join("bin");
        std::fs::create_dir_all(&jre_bin).unwrap();
        let empty = apps.join("other");
        std::fs::create_dir_all(&empty).unwrap();

        assert_eq!(resolve_browsed_folder(&jdk), Some(jdk.clone()));
        assert_eq!(resolve_browsed_folder(&jre_bin), Some(jdk.clone()));
        assert_eq!(resolve_browsed_folder(&jdk.join("bin")), Some(jdk.clone()));
        assert_eq!(resolve_browsed_folder(&empty), None);
    }

    #[test]
    fn grandparent_only_accepted_from_jre_bin() {
        let dir = tempfile::tempdir().unwrap();
        let jdk = fake_jdk(&dir.path().join("apps").join("java").join("jdk"));
        let security = jdk.join("lib").join("security");
        std::fs::create_dir_all(&security).unwrap();
        let jre_bin = jdk.join("JRE").join("Bin");
        std::fs::create_dir_all(&jre_bin).unwrap();

        assert_eq!(resolve_browsed_folder(&security), None);
        assert_eq!(resolve_browsed_folder(&jre_bin), Some(jdk));
    }

    #[test]
    fn failed_launch_returns_to_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let broken = fake_jdk(&dir.path().join("broken"));
        let working = fake_jdk(&dir.path().join("working"));
        let ctx = context(&["/externalvm"], &[]);
        let mut store = MemoryStore::default();
        let mut embedder = FakeEmbedder::default();
        let mut spawner = FakeSpawner {
            missing: vec![env::javaw_exe(&broken), env::java_exe(&broken)],
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

        let mut dialog = SelectionDialog::new(candidates(&[broken.as_path(), working.as_path()]), Product::BlueJ);
        let mut ui = ScriptedUi {
            events: VecDeque::from([
                SelectionEvent::Launch,
                SelectionEvent::Select(0),
                SelectionEvent::Launch,
                SelectionEvent::Select(1),
                SelectionEvent::Launch
            ]),
            browsed: VecDeque::new(),
            launch_enabled: vec![]
        };

        assert!(run_selection(&mut dialog, &mut ui, &mut launcher).unwrap());
        drop(launcher);

        assert_eq!(ui.launch_enabled, vec![false, false, true, true, true]);
        assert_eq!(alert.errors.borrow().len(), 1);
        assert_eq!(store.saved, vec![working]);
    }

    #[test]
    fn quitting_launches_nothing() {
        let ctx = context(&[], &[]);
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

        let mut dialog = SelectionDialog::new(GoodVmSet::default(), Product::BlueJ);
        let mut ui = ScriptedUi {
            events: VecDeque::from([SelectionEvent::Browse]),
            browsed: VecDeque::from([None]),
            launch_enabled: vec![]
        };

        assert!(!run_selection(&mut dialog, &mut ui, &mut launcher).unwrap());
        assert!(dialog.is_closed());
        drop(launcher);

        assert!(spawner.spawned.is_empty());
        assert_eq!(alert.warnings.borrow().len(), 1);
    }

    #[test]
    fn notices_raised_as_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let not_jdk = dir.path().join("apps").join("tools").join("empty");
        std::fs::create_dir_all(&not_jdk).unwrap();
        let ctx = context(&[], &[]);
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

        let mut dialog = SelectionDialog::new(GoodVmSet::default(), Product::BlueJ);
        let mut ui = ScriptedUi {
            events: VecDeque::from([SelectionEvent::Browse, SelectionEvent::Launch]),
            browsed: VecDeque::from([Some(not_jdk)]),
            launch_enabled: vec![]
        };

        assert!(!run_selection(&mut dialog, &mut ui, &mut launcher).unwrap());
        drop(launcher);

        let warnings = alert.warnings.borrow();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0], no_jdk_message(Product::BlueJ));
        assert!(warnings[1].contains("not a valid JDK"));
    }
}
