use crate::action::web_search;
use crate::app::commands::AppCommand;
use crate::config::Settings;
use crate::view::{BACK_LABEL, HOME_LABEL, Origin, SEPARATOR, Section, Target, View};

pub struct ChoiceRouter;

impl ChoiceRouter {
    /// Map the picker's output for `view` to the next session command.
    #[must_use]
    pub fn route(view: &View, choice: Option<&str>, settings: &Settings) -> AppCommand {
        let Some(choice) = choice.map(str::trim).filter(|c| !c.is_empty()) else {
            return AppCommand::Exit;
        };
        match choice {
            SEPARATOR => return AppCommand::Redraw,
            BACK_LABEL => return AppCommand::Back,
            HOME_LABEL => return AppCommand::Home,
            _ => {}
        }
        if let Some(section) = Section::from_label(choice) {
            return AppCommand::Jump(section);
        }
        match view.target(choice) {
            Some(Target::Folder) => AppCommand::Enter(choice.to_string()),
            Some(Target::Command {
                command,
                origin,
                label,
            }) => AppCommand::Launch {
                command: command.clone(),
                origin: *origin,
                label: label.clone(),
            },
            // free text typed in Run is a command, even when it starts with a search prefix
            None if view.section == Section::Run => AppCommand::Launch {
                command: choice.to_string(),
                origin: Origin::Run,
                label: choice.to_string(),
            },
            None => web_search(choice, settings).map_or(AppCommand::Redraw, AppCommand::Search),
        }
    }
}
