use super::DoctorCheck;
use super::context::CheckContext;
use super::types::{Finding, Severity};

pub struct CheckRunner {
    checks: Vec<Box<dyn DoctorCheck>>,
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
            .register(super::config_check::ConfigCheck)
            .register(super::menu_check::MenuCheck)
            .register(super::tools_check::ToolsCheck)
    }
}

impl CheckRunner {
    #[must_use]
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    #[must_use]
    pub fn register<C: DoctorCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Run every check in registration order and collect the findings.
    #[must_use]
    pub fn run_all(&self, ctx: &CheckContext) -> Vec<Finding> {
        self.checks.iter().flat_map(|c| c.run(ctx)).collect()
    }
}

#[must_use]
pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}
