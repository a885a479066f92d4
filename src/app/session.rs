use anyhow::Result;
use tracing::{debug, info, warn};

use crate::action::{Action, is_terminal_app};
use crate::app::commands::AppCommand;
use crate::app::router::ChoiceRouter;
use crate::config::{ConfigFile, History, Paths, Settings, State, save_state};
use crate::exec::Launcher;
use crate::menu::Menu;
use crate::picker::Picker;
use crate::scanner::{Apps, Catalog};
use crate::view::{self, Origin, Section, View, ViewInput};

static NO_APPS: Apps = Apps::new();
static NO_HISTORY: History = History::new();

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    /// The command line handed to the launcher
    Launched(String),
    HistoryCleared,
}

/// One launcher invocation: picker round-trips until something is launched or cancelled.
pub struct Session<P, L, C> {
    paths: Paths,
    settings: Settings,
    menu: Menu,
    state: State,
    path: Vec<String>,
    picker: P,
    launcher: L,
    catalog: C,
    apps: Option<Apps>,
    binaries: Option<Vec<String>>,
}

impl<P: Picker, L: Launcher, C: Catalog> Session<P, L, C> {
    /// `start` opens a built-in section; otherwise the remembered path (if enabled) or the hub.
    pub fn new(
        paths: Paths,
        config: ConfigFile,
        state: State,
        start: Option<Section>,
        picker: P,
        launcher: L,
        catalog: C,
    ) -> Self {
        let path = match start.and_then(Section::label) {
            Some(label) => vec![label.to_string()],
            None if config.settings.remember_last_path => state.last_path.clone(),
            None => Vec::new(),
        };
        Self {
            paths,
            settings: config.settings,
            menu: config.menu,
            state,
            path,
            picker,
            launcher,
            catalog,
            apps: None,
            binaries: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn picker(&self) -> &P {
        &self.picker
    }

    #[must_use]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Drive the picker until the user cancels or an action ends the session.
    ///
    /// # Errors
    /// Returns error if the picker or the launched process cannot be started.
    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            let view = self.current_view();
            let choice = self.picker.pick(&view.prompt, &view.lines, view.icons)?;
            let cmd = ChoiceRouter::route(&view, choice.as_deref(), &self.settings);
            debug!(?cmd, path = ?self.path, "selection routed");
            let choice = choice.as_deref().map(str::trim).unwrap_or_default();
            if let Some(outcome) = self.apply(cmd, choice)? {
                return Ok(outcome);
            }
        }
    }

    fn current_view(&mut self) -> View {
        loop {
            self.ensure_catalog(Section::of(&self.path));
            if let Some(view) = self.build_view() {
                return view;
            }
            warn!(path = ?self.path, "menu path no longer resolves, returning to hub");
            self.path.clear();
        }
    }

    fn ensure_catalog(&mut self, section: Section) {
        if matches!(section, Section::Hub | Section::Apps) && self.apps.is_none() {
            self.apps = Some(self.catalog.load_apps());
        }
        if section == Section::Run && self.binaries.is_none() {
            self.binaries = Some(self.catalog.load_binaries());
        }
    }

    fn build_view(&self) -> Option<View> {
        let history = if self.settings.remember_history {
            &self.state.history
        } else {
            &NO_HISTORY
        };
        view::build(&ViewInput {
            path: &self.path,
            menu: &self.menu,
            settings: &self.settings,
            history,
            apps: self.apps.as_ref().unwrap_or(&NO_APPS),
            binaries: self.binaries.as_deref().unwrap_or(&[]),
            config_path: &self.paths.config,
        })
    }

    fn apply(&mut self, cmd: AppCommand, choice: &str) -> Result<Option<Outcome>> {
        match cmd {
            AppCommand::Exit => return Ok(Some(Outcome::Cancelled)),
            AppCommand::Redraw => {}
            AppCommand::Back => {
                self.path.pop();
            }
            AppCommand::Home => self.path.clear(),
            AppCommand::Jump(section) => {
                self.path = section.label().map(|l| vec![l.to_string()]).unwrap_or_default();
            }
            AppCommand::Enter(key) => self.path.push(key),
            AppCommand::Search(url) => return self.dispatch(&Action::Web(url)),
            AppCommand::Launch {
                command,
                origin,
                label,
            } => return self.launch(choice, &command, origin, &label),
        }
        Ok(None)
    }

    fn launch(
        &mut self,
        choice: &str,
        command: &str,
        origin: Origin,
        label: &str,
    ) -> Result<Option<Outcome>> {
        if self.settings.remember_history {
            let key = view::launch_key(&self.path, choice, origin, label);
            *self.state.history.entry(key).or_insert(0) += 1;
        }
        self.state.last_path = self.path.clone();
        self.persist();

        let action = match Action::parse(command) {
            Action::Shell(cmd) if origin == Origin::Run && is_terminal_app(&cmd, &self.settings) => {
                Action::Terminal(cmd)
            }
            other => other,
        };
        match action {
            Action::ClearHistory => {
                self.state.history.clear();
                self.persist();
                self.path.clear();
                info!("usage history cleared");
                Ok(Some(Outcome::HistoryCleared))
            }
            Action::Help => {
                self.picker.message(&view::help_text(&self.settings))?;
                Ok(None)
            }
            Action::Internal(name) => {
                warn!(action = %name, "unknown internal action");
                Ok(None)
            }
            other => self.dispatch(&other),
        }
    }

    fn dispatch(&mut self, action: &Action) -> Result<Option<Outcome>> {
        let Some(line) = action.command_line(&self.settings) else {
            return Ok(None);
        };
        self.launcher.launch(&line)?;
        Ok(Some(Outcome::Launched(line)))
    }

    fn persist(&self) {
        if let Err(e) = save_state(&self.paths.state, &self.state) {
            warn!(error = %format!("{e:#}"), "could not save state");
        }
    }
}
