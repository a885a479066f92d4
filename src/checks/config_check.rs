use std::fs;

use super::DoctorCheck;
use super::context::CheckContext;
use super::types::{Finding, Severity};
use crate::config::{Settings, State, load_config_strict};

const LOCATIONS: [&str; 5] = ["top", "bottom", "left", "right", "center"];

pub struct ConfigCheck;

impl ConfigCheck {
    fn finding(&self, id: &str, severity: Severity, message: String) -> Finding {
        Finding {
            id: id.to_string(),
            message,
            severity,
            path: None,
            source_check: self.name(),
        }
    }

    fn settings_findings(&self, settings: &Settings, out: &mut Vec<Finding>) {
        if !LOCATIONS.contains(&settings.location.as_str()) {
            out.push(self.finding(
                "settings.location",
                Severity::Warning,
                format!(
                    "location '{}' not in [{}]; the picker will be centered",
                    settings.location,
                    LOCATIONS.join(", ")
                ),
            ));
        }
        if settings.width == 0 || settings.width > 100 {
            out.push(self.finding(
                "settings.width",
                Severity::Warning,
                format!("width {}% is outside 1..=100", settings.width),
            ));
        }
        if settings.height == 0 {
            out.push(self.finding(
                "settings.height",
                Severity::Warning,
                "height 0 shows no list lines".to_string(),
            ));
        }
        if settings.terminal_emulator.trim().is_empty() {
            out.push(self.finding(
                "settings.terminal_emulator",
                Severity::Warning,
                "terminal_emulator is empty; TERM: and EDT: entries cannot open".to_string(),
            ));
        }
    }
}

impl DoctorCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "ConfigCheck"
    }

    fn run(&self, ctx: &CheckContext) -> Vec<Finding> {
        let mut out = Vec::new();
        let paths = &ctx.paths;
        let candidates = paths.config_candidates();

        if candidates.is_empty() {
            out.push(self.finding(
                "config.missing",
                Severity::Info,
                format!("no config file in {}; defaults apply", paths.dir.display()),
            ));
        } else {
            if candidates.len() > 1 {
                out.push(self.finding(
                    "config.multiple",
                    Severity::Warning,
                    format!(
                        "multiple config files; using {} by precedence",
                        paths.config.display()
                    ),
                ));
            }
            match load_config_strict(&paths.config) {
                Ok(cfg) => self.settings_findings(&cfg.settings, &mut out),
                Err(e) => {
                    let mut f = self.finding("config.parse", Severity::Error, format!("{e:#}"));
                    f.path = Some(paths.config.clone());
                    out.push(f);
                }
            }
        }

        if let Ok(s) = fs::read_to_string(&paths.state) {
            if let Err(e) = serde_json::from_str::<State>(&s) {
                let mut f = self.finding(
                    "state.invalid",
                    Severity::Warning,
                    format!("state file is unreadable and will be reset: {e}"),
                );
                f.path = Some(paths.state.clone());
                out.push(f);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Paths;

    fn ctx(dir: &std::path::Path) -> CheckContext {
        CheckContext {
            paths: Paths::in_dir(dir.to_path_buf()),
            path_var: None,
        }
    }

    #[test]
    fn missing_config_is_informational() {
        let tmp = tempfile::tempdir().unwrap();
        let found = ConfigCheck.run(&ctx(tmp.path()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "config.missing");
        assert_eq!(found[0].severity, Severity::Info);
    }

    #[test]
    fn parse_failure_is_an_error_and_bad_settings_warn() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("config.json"), "{\"menu\": [}").unwrap();
        let found = ConfigCheck.run(&ctx(tmp.path()));
        assert!(found.iter().any(|f| f.id == "config.parse" && f.severity == Severity::Error));

        std::fs::write(
            tmp.path().join("config.json"),
            r#"{"settings": {"location": "middle", "width": 0}}"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join("state.json"), "[1, 2]").unwrap();
        let ids: Vec<String> = ConfigCheck
            .run(&ctx(tmp.path()))
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, ["settings.location", "settings.width", "state.invalid"]);
    }
}
