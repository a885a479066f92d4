pub mod config_check;
pub mod context;
pub mod menu_check;
pub mod runner;
pub mod tools_check;
pub mod types;

use context::CheckContext;
use types::Finding;

/// Trait implemented by individual `doctor` checks.
pub trait DoctorCheck {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &CheckContext) -> Vec<Finding>;
}
