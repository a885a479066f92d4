use super::DoctorCheck;
use super::context::CheckContext;
use super::types::{Finding, Severity};
use crate::config::load_config_strict;
use crate::menu::validate;

pub struct MenuCheck;

impl DoctorCheck for MenuCheck {
    fn name(&self) -> &'static str {
        "MenuCheck"
    }

    fn run(&self, ctx: &CheckContext) -> Vec<Finding> {
        // unparsable configs are reported by ConfigCheck
        let Ok(cfg) = load_config_strict(&ctx.paths.config) else {
            return Vec::new();
        };
        if cfg.menu.is_empty() {
            return vec![Finding {
                id: "menu.empty".into(),
                message: "menu has no categories; only Run, Applications and Settings are shown"
                    .into(),
                severity: Severity::Info,
                path: Some(ctx.paths.config.clone()),
                source_check: self.name(),
            }];
        }
        validate(&cfg.menu)
            .into_iter()
            .map(|message| Finding {
                id: "menu.invalid".into(),
                message,
                severity: Severity::Warning,
                path: Some(ctx.paths.config.clone()),
                source_check: self.name(),
            })
            .collect()
    }
}
