use std::collections::BTreeMap;

use crate::config::Settings;
use crate::exec::{expand_tilde, shell_quote};

pub const CLEAR_HISTORY: &str = "INTERNAL:CLEAR_HIST";
pub const SHOW_HELP: &str = "INTERNAL:HELP";

/// Typing `<key> <query>` opens a search with the provider's URL prefix.
pub const SEARCH_PROVIDERS: [(&str, &str); 6] = [
    ("g", "https://www.google.com/search?q="),
    ("y", "https://www.youtube.com/results?search_query="),
    ("gh", "https://github.com/search?q="),
    ("w", "https://en.wikipedia.org/wiki/Special:Search?search="),
    ("r", "https://www.reddit.com/search/?q="),
    ("amz", "https://www.amazon.com/s?k="),
];

/// Binaries that only make sense inside a terminal window.
pub const TERMINAL_APPS: [&str; 20] = [
    "htop", "btop", "nvtop", "atop", "vim", "nvim", "nano", "ranger", "nmap", "ssh", "ping",
    "top", "gdb", "python", "ipython", "ncdu", "journalctl", "dmesg", "glances", "tail",
];

/// A menu command classified by its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ClearHistory,
    Help,
    /// `INTERNAL:` with a name nothing handles
    Internal(String),
    /// `TERM:<cmd>`
    Terminal(String),
    /// `EDT:<path>`
    Edit(String),
    /// `WEB:<url or host>`
    Web(String),
    Shell(String),
}

impl Action {
    #[must_use]
    pub fn parse(cmd: &str) -> Self {
        if let Some(name) = cmd.strip_prefix("INTERNAL:") {
            return match cmd {
                CLEAR_HISTORY => Self::ClearHistory,
                SHOW_HELP => Self::Help,
                _ => Self::Internal(name.to_string()),
            };
        }
        if let Some(rest) = cmd.strip_prefix("TERM:") {
            Self::Terminal(rest.to_string())
        } else if let Some(rest) = cmd.strip_prefix("EDT:") {
            Self::Edit(rest.to_string())
        } else if let Some(rest) = cmd.strip_prefix("WEB:") {
            Self::Web(rest.to_string())
        } else {
            Self::Shell(cmd.to_string())
        }
    }

    /// Shell command line that performs this action; `None` for internal actions.
    #[must_use]
    pub fn command_line(&self, settings: &Settings) -> Option<String> {
        let term = settings.terminal_emulator.trim();
        match self {
            Self::ClearHistory | Self::Help | Self::Internal(_) => None,
            Self::Terminal(cmd) => Some(format!(
                "{term} bash -c {}",
                shell_quote(&format!("{cmd}; echo; read"))
            )),
            Self::Edit(path) => Some(format!(
                "{term} {} {}",
                settings.editor.trim(),
                shell_quote(&expand_tilde(path.trim()))
            )),
            Self::Web(target) => Some(format!("xdg-open {}", shell_quote(&web_url(target)))),
            Self::Shell(cmd) => Some(cmd.clone()),
        }
    }
}

/// `https://` is assumed when the target carries no scheme.
#[must_use]
pub fn web_url(target: &str) -> String {
    let target = target.trim();
    if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{target}")
    }
}

/// Built-in providers with the user's `search_providers` merged over them.
#[must_use]
pub fn search_providers(settings: &Settings) -> BTreeMap<String, String> {
    let mut providers: BTreeMap<String, String> = SEARCH_PROVIDERS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    for (k, v) in &settings.search_providers {
        providers.insert(k.clone(), v.clone());
    }
    providers
}

/// `"g rust traits"` -> search URL, when the first word is a provider key.
#[must_use]
pub fn web_search(text: &str, settings: &Settings) -> Option<String> {
    let (key, query) = text.trim().split_once(' ')?;
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let providers = search_providers(settings);
    let base = providers.get(key)?;
    Some(format!("{base}{}", urlencoding::encode(query)))
}

/// Whether the command's binary belongs in a terminal window.
#[must_use]
pub fn is_terminal_app(command: &str, settings: &Settings) -> bool {
    let Some(bin) = command.split_whitespace().next() else {
        return false;
    };
    let bin = bin.rsplit('/').next().unwrap_or(bin);
    TERMINAL_APPS.contains(&bin) || settings.terminal_apps.iter().any(|t| t == bin)
}

/// Sorted terminal app names, built-ins plus user additions.
#[must_use]
pub fn terminal_apps(settings: &Settings) -> Vec<String> {
    let mut all: Vec<String> = TERMINAL_APPS.iter().map(|s| (*s).to_string()).collect();
    all.extend(settings.terminal_apps.iter().cloned());
    all.sort();
    all.dedup();
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_classified() {
        assert_eq!(Action::parse(CLEAR_HISTORY), Action::ClearHistory);
        assert_eq!(Action::parse(SHOW_HELP), Action::Help);
        assert_eq!(Action::parse("INTERNAL:X"), Action::Internal("X".into()));
        assert_eq!(Action::parse("TERM:htop"), Action::Terminal("htop".into()));
        assert_eq!(Action::parse("EDT:~/a"), Action::Edit("~/a".into()));
        assert_eq!(Action::parse("WEB:x.org"), Action::Web("x.org".into()));
        assert_eq!(Action::parse("firefox"), Action::Shell("firefox".into()));
    }

    #[test]
    fn command_lines_use_terminal_and_editor() {
        let s = Settings {
            terminal_emulator: "kitty".into(),
            editor: "vim".into(),
            ..Settings::default()
        };
        assert_eq!(
            Action::parse("TERM:htop").command_line(&s).unwrap(),
            "kitty bash -c 'htop; echo; read'"
        );
        assert_eq!(
            Action::parse("EDT:/etc/hosts").command_line(&s).unwrap(),
            "kitty vim '/etc/hosts'"
        );
        assert_eq!(
            Action::parse("WEB:example.com").command_line(&s).unwrap(),
            "xdg-open 'https://example.com'"
        );
        assert_eq!(
            Action::parse("WEB:http://x.org/a").command_line(&s).unwrap(),
            "xdg-open 'http://x.org/a'"
        );
        assert_eq!(Action::parse("ls -la").command_line(&s).unwrap(), "ls -la");
        assert!(Action::Help.command_line(&s).is_none());
    }

    #[test]
    fn web_search_needs_known_prefix_and_query() {
        let mut s = Settings::default();
        assert_eq!(
            web_search("g rust traits", &s).unwrap(),
            "https://www.google.com/search?q=rust%20traits"
        );
        assert!(web_search("g", &s).is_none());
        assert!(web_search("g   ", &s).is_none());
        assert!(web_search("zz query", &s).is_none());
        s.search_providers
            .insert("ddg".into(), "https://duckduckgo.com/?q=".into());
        assert_eq!(
            web_search("ddg a&b", &s).unwrap(),
            "https://duckduckgo.com/?q=a%26b"
        );
    }

    #[test]
    fn terminal_apps_match_binary_name() {
        let mut s = Settings::default();
        assert!(is_terminal_app("htop", &s));
        assert!(is_terminal_app("/usr/bin/ssh host", &s));
        assert!(!is_terminal_app("firefox", &s));
        assert!(!is_terminal_app("", &s));
        s.terminal_apps.push("mc".into());
        assert!(is_terminal_app("mc", &s));
        assert!(terminal_apps(&s).windows(2).all(|w| w[0] < w[1]));
    }
}
