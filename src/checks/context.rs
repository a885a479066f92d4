use std::ffi::OsString;

use crate::config::Paths;

#[derive(Debug, Clone)]
pub struct CheckContext {
    pub paths: Paths,
    /// `PATH` used to look up external tools
    pub path_var: Option<OsString>,
}

impl CheckContext {
    #[must_use]
    pub fn from_env(paths: Paths) -> Self {
        Self {
            paths,
            path_var: std::env::var_os("PATH"),
        }
    }
}
