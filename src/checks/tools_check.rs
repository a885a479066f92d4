use super::DoctorCheck;
use super::context::CheckContext;
use super::types::{Finding, Severity};
use crate::config::load_config;
use crate::exec::find_in;

pub struct ToolsCheck;

impl DoctorCheck for ToolsCheck {
    fn name(&self) -> &'static str {
        "ToolsCheck"
    }

    fn run(&self, ctx: &CheckContext) -> Vec<Finding> {
        let settings = load_config(&ctx.paths.config).settings;
        let terminal = settings
            .terminal_emulator
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let editor = settings
            .editor
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let tools = [
            (settings.picker.clone(), Severity::Warning, "shows every menu"),
            ("gtk-launch".to_string(), Severity::Warning, "starts Applications"),
            ("xdg-open".to_string(), Severity::Warning, "opens WEB: entries and searches"),
            (terminal, Severity::Warning, "runs TERM: and EDT: entries"),
            (editor, Severity::Info, "edits EDT: entries"),
        ];

        let mut out = Vec::new();
        for (program, severity, purpose) in tools {
            if program.is_empty() || find_in(&program, ctx.path_var.as_deref()).is_some() {
                continue;
            }
            out.push(Finding {
                id: format!("tool.missing.{program}"),
                message: format!("'{program}' not found on PATH (it {purpose})"),
                severity,
                path: None,
                source_check: self.name(),
            });
        }
        out
    }
}
