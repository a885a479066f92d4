//! Picker entries for each menu level, ordered by usage weight.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::action::{self, CLEAR_HISTORY, SHOW_HELP};
use crate::config::{History, Settings, weight};
use crate::menu::{self, Menu, MenuNode, SUFFIX_SEP};
use crate::scanner::{Apps, DEFAULT_APP_ICON};

pub const OPTIONS_LABEL: &str = "🛠️ Menu Settings";
pub const APPS_LABEL: &str = "📱 Applications";
pub const RUN_LABEL: &str = "🚀 Run";
pub const BACK_LABEL: &str = "⬅️ BACK";
pub const HOME_LABEL: &str = "🏠 HOME";
pub const SEPARATOR: &str = "────────────────────────────────────────";

pub const FOLDER_ICON: &str = "folder";
pub const RUN_ICON: &str = "utilities-terminal";

const HELP_ENTRY: &str = "❓ Help & Keybinds";
const CLEAR_ENTRY: &str = "🧹 Clear History";
const EDIT_ENTRY: &str = "📝 Edit Config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hub,
    Category,
    Apps,
    Run,
    Options,
}

impl Section {
    /// Section named by the first path element.
    #[must_use]
    pub fn of(path: &[String]) -> Self {
        match path.first() {
            None => Self::Hub,
            Some(first) => Self::from_label(first).unwrap_or(Self::Category),
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            OPTIONS_LABEL => Some(Self::Options),
            APPS_LABEL => Some(Self::Apps),
            RUN_LABEL => Some(Self::Run),
            _ => None,
        }
    }

    /// Label of a built-in section; `None` for the hub and user categories.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Options => Some(OPTIONS_LABEL),
            Self::Apps => Some(APPS_LABEL),
            Self::Run => Some(RUN_LABEL),
            Self::Hub | Self::Category => None,
        }
    }

    #[must_use]
    pub fn prompt_icon(self) -> &'static str {
        match self {
            Self::Hub => "⚡",
            Self::Apps => "📱",
            Self::Run => "🚀",
            Self::Options => "🛠️",
            Self::Category => "📂",
        }
    }

    /// Apps and Run rows always carry icons.
    #[must_use]
    pub fn wants_icons(self) -> bool {
        matches!(self, Self::Apps | Self::Run)
    }
}

fn nav_icon(label: &str) -> &'static str {
    match label {
        BACK_LABEL => "go-previous",
        HOME_LABEL => "go-home",
        OPTIONS_LABEL => "emblem-system",
        APPS_LABEL => "applications-all",
        RUN_LABEL => "run",
        _ => FOLDER_ICON,
    }
}

/// Where a selectable row came from; decides its weight key and launch rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Menu,
    App,
    Run,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Folder,
    Command {
        command: String,
        origin: Origin,
        /// Name without the `"    (section)"` suffix.
        label: String,
    },
}

#[derive(Debug, Clone)]
pub struct View {
    pub section: Section,
    pub prompt: String,
    /// Picker input, one row per line; rows may carry `\0icon\x1f<name>`.
    pub lines: Vec<String>,
    pub icons: bool,
    targets: HashMap<String, Target>,
}

impl View {
    /// What a selected row refers to. Navigation rows are not targets.
    #[must_use]
    pub fn target(&self, choice: &str) -> Option<&Target> {
        self.targets.get(choice)
    }
}

pub struct ViewInput<'a> {
    pub path: &'a [String],
    pub menu: &'a Menu,
    pub settings: &'a Settings,
    pub history: &'a History,
    pub apps: &'a Apps,
    pub binaries: &'a [String],
    pub config_path: &'a Path,
}

#[must_use]
pub fn hub_key(display: &str) -> String {
    format!("HOME:{display}")
}

#[must_use]
pub fn app_key(name: &str) -> String {
    format!("APP:{name}")
}

#[must_use]
pub fn run_key(bin: &str) -> String {
    format!("RUN:{bin}")
}

#[must_use]
pub fn menu_key(path: &[String], key: &str) -> String {
    format!("{}:{key}", path.join(" > "))
}

/// Weight key recorded when `choice` is launched from `path`.
#[must_use]
pub fn launch_key(path: &[String], choice: &str, origin: Origin, label: &str) -> String {
    match origin {
        Origin::Run => run_key(label),
        Origin::App => app_key(label),
        Origin::Menu | Origin::Internal if path.is_empty() => hub_key(choice),
        Origin::Menu | Origin::Internal => menu_key(path, choice),
    }
}

/// Commands remembered from the Run section, in key order.
pub fn history_binaries(history: &History) -> impl Iterator<Item = &str> {
    history.keys().filter_map(|k| k.strip_prefix("RUN:"))
}

#[must_use]
pub fn prompt(path: &[String], section: Section, settings: &Settings) -> String {
    let icon = settings
        .prompt_icon
        .as_deref()
        .unwrap_or_else(|| section.prompt_icon());
    if path.is_empty() {
        format!(" {icon} HUB ")
    } else {
        format!(" {icon} {} ", path.join(" > "))
    }
}

fn row(text: &str, icon: &str, icons: bool) -> String {
    if icons && !icon.is_empty() {
        format!("{text}\0icon\x1f{icon}")
    } else {
        text.to_string()
    }
}

fn target_for(key: &str, node: &MenuNode, origin: Origin) -> Target {
    match node.command() {
        Some(cmd) => Target::Command {
            command: cmd.to_string(),
            origin,
            label: key.to_string(),
        },
        None => Target::Folder,
    }
}

fn node_icon(node: &MenuNode) -> &str {
    node.icon()
        .unwrap_or(if node.is_folder() { FOLDER_ICON } else { DEFAULT_APP_ICON })
}

/// Build the view for `input.path`. `None` when the path no longer resolves.
#[must_use]
pub fn build(input: &ViewInput<'_>) -> Option<View> {
    let section = Section::of(input.path);
    let icons = input.settings.show_icons_globally || section.wants_icons();
    let mut lines: Vec<String> = Vec::new();
    let mut targets: HashMap<String, Target> = HashMap::new();

    if section != Section::Hub {
        lines.push(row(BACK_LABEL, nav_icon(BACK_LABEL), icons));
        if input.path.len() >= 2 {
            lines.push(row(HOME_LABEL, nav_icon(HOME_LABEL), icons));
        }
    }

    match section {
        Section::Hub => hub(input, icons, &mut lines, &mut targets),
        Section::Category => category(input, icons, &mut lines, &mut targets)?,
        Section::Apps if input.path.len() == 1 => apps(input, icons, &mut lines, &mut targets),
        Section::Run if input.path.len() == 1 => run(input, icons, &mut lines, &mut targets),
        Section::Options if input.path.len() == 1 => {
            options(input, icons, &mut lines, &mut targets);
        }
        Section::Apps | Section::Run | Section::Options => return None,
    }

    Some(View {
        section,
        prompt: prompt(input.path, section, input.settings),
        lines,
        icons,
        targets,
    })
}

struct PoolEntry {
    display: String,
    target: Target,
    icon: String,
    weight: u64,
}

fn hub(
    input: &ViewInput<'_>,
    icons: bool,
    lines: &mut Vec<String>,
    targets: &mut HashMap<String, Target>,
) {
    let history = input.history;

    let mut folders: Vec<(&str, &MenuNode)> =
        input.menu.iter().filter(|(_, n)| n.is_folder()).collect();
    folders.sort_by_cached_key(|(k, _)| Reverse(weight(history, &hub_key(k))));
    for (key, node) in folders {
        lines.push(row(key, node_icon(node), icons));
    }
    for label in [RUN_LABEL, APPS_LABEL, OPTIONS_LABEL] {
        lines.push(row(label, nav_icon(label), icons));
    }
    lines.push(SEPARATOR.to_string());

    let mut pool: Vec<PoolEntry> = Vec::new();
    let mut upsert = |entry: PoolEntry| {
        if let Some(slot) = pool.iter_mut().find(|e| e.display == entry.display) {
            *slot = entry;
        } else {
            pool.push(entry);
        }
    };
    for (display, node) in menu::flatten(input.menu) {
        upsert(PoolEntry {
            weight: weight(history, &hub_key(&display)),
            target: target_for(&display, node, Origin::Menu),
            icon: node_icon(node).to_string(),
            display,
        });
    }
    for app in input.apps.values() {
        upsert(PoolEntry {
            display: format!("{}{SUFFIX_SEP}{APPS_LABEL})", app.name),
            target: Target::Command {
                command: app.command.clone(),
                origin: Origin::App,
                label: app.name.clone(),
            },
            icon: app.icon.clone(),
            weight: weight(history, &app_key(&app.name)),
        });
    }
    for bin in history_binaries(history) {
        upsert(PoolEntry {
            display: format!("{bin}{SUFFIX_SEP}{RUN_LABEL})"),
            target: Target::Command {
                command: bin.to_string(),
                origin: Origin::Run,
                label: bin.to_string(),
            },
            icon: RUN_ICON.to_string(),
            weight: weight(history, &run_key(bin)),
        });
    }

    pool.sort_by_key(|e| Reverse(e.weight));
    for entry in pool {
        lines.push(row(&entry.display, &entry.icon, icons));
        targets.insert(entry.display, entry.target);
    }
    // top-level keys are selectable by name as well
    for (key, node) in input.menu.iter() {
        targets.insert(key.to_string(), target_for(key, node, Origin::Menu));
    }
}

fn category(
    input: &ViewInput<'_>,
    icons: bool,
    lines: &mut Vec<String>,
    targets: &mut HashMap<String, Target>,
) -> Option<()> {
    let menu = menu::resolve(input.menu, input.path)?;
    let mut items: Vec<(&str, &MenuNode)> = menu.iter().collect();
    items.sort_by_cached_key(|(k, _)| Reverse(weight(input.history, &menu_key(input.path, k))));
    for (key, node) in items {
        lines.push(row(key, node_icon(node), icons));
        targets.insert(key.to_string(), target_for(key, node, Origin::Menu));
    }
    Some(())
}

fn apps(
    input: &ViewInput<'_>,
    icons: bool,
    lines: &mut Vec<String>,
    targets: &mut HashMap<String, Target>,
) {
    let mut apps: Vec<_> = input.apps.values().collect();
    apps.sort_by_cached_key(|a| {
        (
            Reverse(weight(input.history, &app_key(&a.name))),
            a.name.to_lowercase(),
        )
    });
    for app in apps {
        lines.push(row(&app.name, &app.icon, icons));
        targets.insert(
            app.name.clone(),
            Target::Command {
                command: app.command.clone(),
                origin: Origin::App,
                label: app.name.clone(),
            },
        );
    }
}

fn run(
    input: &ViewInput<'_>,
    icons: bool,
    lines: &mut Vec<String>,
    targets: &mut HashMap<String, Target>,
) {
    let all: BTreeSet<&str> = input
        .binaries
        .iter()
        .map(String::as_str)
        .chain(history_binaries(input.history))
        .collect();
    let mut bins: Vec<&str> = all.into_iter().collect();
    bins.sort_by_cached_key(|b| (Reverse(weight(input.history, &run_key(b))), b.to_lowercase()));
    for bin in bins {
        lines.push(row(bin, RUN_ICON, icons));
        targets.insert(
            bin.to_string(),
            Target::Command {
                command: bin.to_string(),
                origin: Origin::Run,
                label: bin.to_string(),
            },
        );
    }
}

fn options(
    input: &ViewInput<'_>,
    icons: bool,
    lines: &mut Vec<String>,
    targets: &mut HashMap<String, Target>,
) {
    let edit = format!("EDT:{}", input.config_path.display());
    let entries = [
        (HELP_ENTRY, SHOW_HELP.to_string(), "help-about"),
        (CLEAR_ENTRY, CLEAR_HISTORY.to_string(), "edit-clear"),
        (EDIT_ENTRY, edit, "accessories-text-editor"),
    ];
    for (label, command, icon) in entries {
        lines.push(row(label, icon, icons));
        targets.insert(
            label.to_string(),
            Target::Command {
                command,
                origin: Origin::Internal,
                label: label.to_string(),
            },
        );
    }
}

/// Plain-text quick start shown by the help action.
#[must_use]
pub fn help_text(settings: &Settings) -> String {
    let mut lines: Vec<String> = vec![
        "╔══════════════════════════════════════════════════════════╗".into(),
        "║                COMMAND CENTER QUICK START                ║".into(),
        "╚══════════════════════════════════════════════════════════╝".into(),
        String::new(),
        " ■ WEB SEARCHES".into(),
        "   Type the prefix followed by your query:".into(),
        "   --------------------------------------------------------".into(),
    ];
    for (key, url) in action::search_providers(settings) {
        let domain = url
            .split_once("//")
            .map_or(url.as_str(), |(_, rest)| rest)
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        lines.push(format!("   {key:<4} ->  {domain}"));
    }
    lines.push(String::new());
    lines.push(" ■ COMMAND PREFIXES".into());
    lines.push("   TERM:  Forces command to run in a Terminal window".into());
    lines.push("   WEB:   Forces string to open as a URL in Browser".into());
    lines.push("   EDT:   Opens the path in your editor".into());
    lines.push(String::new());
    lines.push(" ■ AUTO-TERMINAL APPLICATIONS".into());
    lines.push("   The following run in terminal automatically:".into());
    lines.push("   --------------------------------------------------------".into());
    for chunk in action::terminal_apps(settings).chunks(4) {
        lines.push(format!("   {}", chunk.join(", ")));
    }
    lines.push(String::new());
    lines.push(" [ Press ESC or click Close to return to Menu ]".into());
    lines.join("\n")
}
