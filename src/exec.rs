use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::info;

/// Starts a resolved command line and returns without waiting for it.
pub trait Launcher {
    /// # Errors
    /// Returns error if the process cannot be spawned.
    fn launch(&mut self, command_line: &str) -> Result<()>;
}

/// Runs `sh -c <command>` detached: own process group, null stdio, never reaped.
#[derive(Debug, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn launch(&mut self, command_line: &str) -> Result<()> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let child = cmd
            .spawn()
            .with_context(|| format!("spawning `{command_line}`"))?;
        info!(pid = child.id(), command = command_line, "launched");
        Ok(())
    }
}

/// Wrap `s` in single quotes so `sh -c` sees it as one word.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Expand a leading `~` or `~/` to the home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return path.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{rest}", home.display()),
        None => path.to_string(),
    }
}

/// Locate `program` on `PATH` (or use it directly when it contains a slash).
#[must_use]
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    find_in(program, env::var_os("PATH").as_deref())
}

#[must_use]
pub fn find_in(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    if program.contains('/') {
        let p = Path::new(program);
        return is_executable(p).then(|| p.to_path_buf());
    }
    env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|p| is_executable(p))
}

/// Regular file (after following links) with any execute bit.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    let executable = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    };
    #[cfg(not(unix))]
    let executable = true;
    executable
}
