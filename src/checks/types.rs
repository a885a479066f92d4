use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub path: Option<PathBuf>,
    pub source_check: &'static str,
}
