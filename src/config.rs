use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::menu::Menu;

pub const APP_DIR: &str = "cmd-center";
pub const STATE_FILE: &str = "state.json";
const CONFIG_CANDIDATES: [&str; 4] = ["config.json", "config.yaml", "config.yml", "config.toml"];

/// Usage counters keyed by weight key (`HOME:..`, `APP:..`, `RUN:..`, `<path>:..`).
pub type History = BTreeMap<String, u64>;

/// Resolved locations of the config and state files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub dir: PathBuf,
    pub config: PathBuf,
    pub state: PathBuf,
}

impl Paths {
    /// Use `override_dir` when given, otherwise `<config dir>/cmd-center`.
    #[must_use]
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        let dir = override_dir.map_or_else(default_dir, Path::to_path_buf);
        Self::in_dir(dir)
    }

    /// The first existing `config.{json,yaml,yml,toml}` wins; `config.json` otherwise.
    #[must_use]
    pub fn in_dir(dir: PathBuf) -> Self {
        let config = CONFIG_CANDIDATES
            .iter()
            .map(|c| dir.join(c))
            .find(|p| p.exists())
            .unwrap_or_else(|| dir.join(CONFIG_CANDIDATES[0]));
        let state = dir.join(STATE_FILE);
        Self { dir, config, state }
    }

    /// Every config candidate that exists, in precedence order.
    #[must_use]
    pub fn config_candidates(&self) -> Vec<PathBuf> {
        CONFIG_CANDIDATES
            .iter()
            .map(|c| self.dir.join(c))
            .filter(|p| p.exists())
            .collect()
    }
}

fn default_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(APP_DIR)
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub remember_history: bool,
    pub remember_last_path: bool,
    /// top | bottom | left | right | center
    pub location: String,
    /// Window width in percent.
    pub width: u32,
    /// Visible list lines.
    pub height: u32,
    pub show_icons_globally: bool,
    pub prompt_icon: Option<String>,
    pub terminal_emulator: String,
    pub editor: String,
    pub picker: String,
    /// Merged over the built-in search prefixes.
    pub search_providers: BTreeMap<String, String>,
    /// Extra binaries that always open in a terminal.
    pub terminal_apps: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remember_history: true,
            remember_last_path: true,
            location: "center".to_string(),
            width: 30,
            height: 12,
            show_icons_globally: false,
            prompt_icon: None,
            terminal_emulator: "wezterm start --".to_string(),
            editor: "nano".to_string(),
            picker: "rofi".to_string(),
            search_providers: BTreeMap::new(),
            terminal_apps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub settings: Settings,
    pub menu: Menu,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct State {
    pub last_path: Vec<String>,
    pub history: History,
}

/// Parse a config document, choosing the format by file extension (JSON by default).
///
/// # Errors
/// Returns the parser error for malformed documents.
pub fn parse_config(path: &Path, contents: &str) -> Result<ConfigFile> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let cfg = match ext.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str::<ConfigFile>(contents)?,
        Some("toml") => toml::from_str::<ConfigFile>(contents)?,
        _ => serde_json::from_str::<ConfigFile>(contents)?,
    };
    Ok(cfg)
}

/// Strict load used by `doctor`.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_config_strict(path: &Path) -> Result<ConfigFile> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_config(path, &contents).with_context(|| format!("parsing {}", path.display()))
}

/// Best-effort load: a missing or broken config falls back to defaults.
#[must_use]
pub fn load_config(path: &Path) -> ConfigFile {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return ConfigFile::default();
    }
    load_config_strict(path).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "config unusable, using defaults");
        ConfigFile::default()
    })
}

/// Best-effort JSON load; missing, unreadable or malformed files yield `T::default()`.
#[must_use]
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let Ok(contents) = fs::read_to_string(path) else {
        return T::default();
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring malformed json");
        T::default()
    })
}

/// Write `value` as two-space indented JSON, creating parent directories.
///
/// # Errors
/// Returns error if the directory or file cannot be written.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[must_use]
pub fn load_state(path: &Path) -> State {
    load_json(path)
}

/// # Errors
/// Returns error if the state file cannot be written.
pub fn save_state(path: &Path, state: &State) -> Result<()> {
    save_json(path, state)
}

/// Weight recorded for `key`, zero when unseen.
#[must_use]
pub fn weight(history: &History, key: &str) -> u64 {
    history.get(key).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults_fill_missing_keys() {
        let cfg: ConfigFile =
            serde_json::from_str(r#"{"settings": {"width": 50, "editor": "vim"}}"#).unwrap();
        assert_eq!(cfg.settings.width, 50);
        assert_eq!(cfg.settings.editor, "vim");
        assert_eq!(cfg.settings.height, 12);
        assert!(cfg.settings.remember_history);
        assert_eq!(cfg.settings.terminal_emulator, "wezterm start --");
        assert!(cfg.menu.is_empty());
    }

    #[test]
    fn config_format_follows_extension() {
        let yaml = "settings:\n  location: top\nmenu:\n  Web:\n    Mail: \"WEB:mail.example.com\"\n";
        let cfg = parse_config(Path::new("config.yaml"), yaml).unwrap();
        assert_eq!(cfg.settings.location, "top");
        assert!(cfg.menu.get("Web").is_some());

        let toml_src = "[settings]\nheight = 20\n\n[menu]\nTop = \"htop\"\n";
        let cfg = parse_config(Path::new("config.toml"), toml_src).unwrap();
        assert_eq!(cfg.settings.height, 20);
        assert_eq!(cfg.menu.get("Top").and_then(|n| n.command()), Some("htop"));
    }

    #[test]
    fn broken_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.json");
        std::fs::write(&cfg_path, "{ not json").unwrap();
        let cfg = load_config(&cfg_path);
        assert!(cfg.menu.is_empty());
        assert!(load_config_strict(&cfg_path).is_err());

        let state_path = dir.path().join("state.json");
        std::fs::write(&state_path, "").unwrap();
        assert_eq!(load_state(&state_path), State::default());
        assert_eq!(load_state(&dir.path().join("missing.json")), State::default());
    }

    #[test]
    fn state_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let mut state = State::default();
        state.last_path = vec!["Dev".into()];
        state.history.insert("HOME:Dev".into(), 3);
        save_state(&path, &state).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"last_path\""));
        assert_eq!(load_state(&path), state);
    }

    #[test]
    fn paths_prefer_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let p = Paths::in_dir(dir.path().to_path_buf());
        assert_eq!(p.config, dir.path().join("config.json"));
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        let p = Paths::in_dir(dir.path().to_path_buf());
        assert_eq!(p.config, dir.path().join("config.toml"));
        assert_eq!(p.state, dir.path().join("state.json"));
        assert_eq!(p.config_candidates().len(), 1);
    }
}
