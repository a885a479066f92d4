use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("failed to start picker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("picker i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// External selection UI.
pub trait Picker {
    /// Show `entries` under `prompt`. `Ok(None)` when the user cancels.
    ///
    /// # Errors
    /// Returns error if the picker process cannot be run.
    fn pick(
        &mut self,
        prompt: &str,
        entries: &[String],
        icons: bool,
    ) -> Result<Option<String>, PickerError>;

    /// Show a read-only text panel and wait for it to close.
    ///
    /// # Errors
    /// Returns error if the picker process cannot be run.
    fn message(&mut self, text: &str) -> Result<(), PickerError>;
}

/// rofi `-location` code for a named position; unknown names center.
#[must_use]
pub fn location_code(location: &str) -> u8 {
    match location {
        "top" => 2,
        "bottom" => 7,
        "left" => 4,
        "right" => 5,
        _ => 0,
    }
}

/// Program and arguments for a dmenu-style invocation, without the prompt.
#[must_use]
pub fn build_args(settings: &Settings, icons: bool) -> Vec<String> {
    let theme = format!(
        "window {{ width: {}%; location: {}; }} listview {{ lines: {}; columns: 1; }}",
        settings.width, settings.location, settings.height
    );
    let mut args = vec![
        settings.picker.clone(),
        "-dmenu".to_string(),
        "-i".to_string(),
        "-location".to_string(),
        location_code(&settings.location).to_string(),
        "-theme-str".to_string(),
        theme,
    ];
    if icons || settings.show_icons_globally {
        args.push("-show-icons".to_string());
    }
    args
}

#[derive(Debug, Clone)]
pub struct RofiPicker {
    settings: Settings,
}

impl RofiPicker {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn spawn_error(&self, source: io::Error) -> PickerError {
        PickerError::Spawn {
            program: self.settings.picker.clone(),
            source,
        }
    }
}

impl Picker for RofiPicker {
    fn pick(
        &mut self,
        prompt: &str,
        entries: &[String],
        icons: bool,
    ) -> Result<Option<String>, PickerError> {
        let args = build_args(&self.settings, icons);
        debug!(program = %args[0], entries = entries.len(), prompt, "opening picker");
        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .arg("-p")
            .arg(prompt)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(entries.join("\n").as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }
        // rofi exits non-zero on cancel; an empty selection covers that case
        let output = child.wait_with_output()?;
        let choice = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!choice.is_empty()).then_some(choice))
    }

    fn message(&mut self, text: &str) -> Result<(), PickerError> {
        Command::new(&self.settings.picker)
            .arg("-e")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_follow_settings() {
        let s = Settings {
            location: "bottom".into(),
            width: 40,
            height: 8,
            ..Settings::default()
        };
        let args = build_args(&s, false);
        assert_eq!(args[..5], ["rofi", "-dmenu", "-i", "-location", "7"]);
        assert_eq!(
            args[6],
            "window { width: 40%; location: bottom; } listview { lines: 8; columns: 1; }"
        );
        assert!(!args.contains(&"-show-icons".to_string()));
        assert!(build_args(&s, true).contains(&"-show-icons".to_string()));
    }

    #[test]
    fn unknown_location_centers() {
        assert_eq!(location_code("center"), 0);
        assert_eq!(location_code("nowhere"), 0);
        assert_eq!(location_code("left"), 4);
        assert_eq!(location_code("right"), 5);
        assert_eq!(location_code("top"), 2);
    }

    #[cfg(unix)]
    #[test]
    fn missing_picker_is_a_spawn_error() {
        let mut p = RofiPicker::new(Settings {
            picker: "/nonexistent/picker-binary".into(),
            ..Settings::default()
        });
        let err = p.pick("x", &["a".to_string()], false).unwrap_err();
        assert!(matches!(err, PickerError::Spawn { .. }));
    }
}
