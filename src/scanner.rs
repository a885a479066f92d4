use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::exec::is_executable;

pub const DEFAULT_APP_ICON: &str = "system-run";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopApp {
    pub name: String,
    /// `gtk-launch <desktop id>`
    pub command: String,
    pub icon: String,
}

/// Installed applications keyed by display name.
pub type Apps = BTreeMap<String, DesktopApp>;

/// Source of applications and binaries for the Apps and Run sections.
pub trait Catalog {
    fn load_apps(&self) -> Apps;
    fn load_binaries(&self) -> Vec<String>;
}

/// Reads desktop entries and `PATH` from the running system.
#[derive(Debug, Default)]
pub struct SystemCatalog;

impl Catalog for SystemCatalog {
    fn load_apps(&self) -> Apps {
        scan_apps(&application_dirs())
    }

    fn load_binaries(&self) -> Vec<String> {
        env::var_os("PATH").map_or_else(Vec::new, |p| scan_binaries(&p))
    }
}

/// Desktop file directories; later ones override earlier ones.
#[must_use]
pub fn application_dirs() -> Vec<PathBuf> {
    let mut out = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
    ];
    let home = dirs::home_dir();
    if let Some(h) = &home {
        out.push(h.join(".local/share/applications"));
    }
    out.push(PathBuf::from("/var/lib/flatpak/exports/share/applications"));
    if let Some(h) = &home {
        out.push(h.join(".local/share/flatpak/exports/share/applications"));
    }
    out
}

/// `(name, icon)` from the `[Desktop Entry]` group. `None` without a name or
/// when the entry asks to be hidden.
#[must_use]
pub fn parse_desktop_entry(contents: &str) -> Option<(String, String)> {
    let mut in_entry = false;
    let mut name: Option<String> = None;
    let mut icon: Option<String> = None;
    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" if name.is_none() && !value.is_empty() => name = Some(value.to_string()),
            "Icon" if icon.is_none() && !value.is_empty() => icon = Some(value.to_string()),
            "NoDisplay" | "Hidden" if value.eq_ignore_ascii_case("true") => return None,
            _ => {}
        }
    }
    Some((name?, icon.unwrap_or_else(|| DEFAULT_APP_ICON.to_string())))
}

/// Scan `*.desktop` files in `dirs`, in order.
#[must_use]
pub fn scan_apps(dirs: &[PathBuf]) -> Apps {
    let mut apps = Apps::new();
    for dir in dirs {
        let Ok(rd) = fs::read_dir(dir) else {
            continue;
        };
        let mut files: Vec<PathBuf> = rd
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(OsStr::to_str) == Some("desktop"))
            .collect();
        files.sort();
        for path in files {
            if let Some(app) = read_desktop_file(&path) {
                apps.insert(app.name.clone(), app);
            }
        }
    }
    debug!(count = apps.len(), "scanned desktop entries");
    apps
}

fn read_desktop_file(path: &Path) -> Option<DesktopApp> {
    let contents = fs::read_to_string(path).ok()?;
    let (name, icon) = parse_desktop_entry(&contents)?;
    let id = path.file_name()?.to_string_lossy();
    Some(DesktopApp {
        command: format!("gtk-launch {id}"),
        name,
        icon,
    })
}

/// Executable file names across every `PATH` directory, sorted and unique.
#[must_use]
pub fn scan_binaries(path_var: &OsStr) -> Vec<String> {
    let mut bins: BTreeSet<String> = BTreeSet::new();
    for dir in env::split_paths(path_var) {
        let Ok(rd) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in rd.filter_map(Result::ok) {
            let path = entry.path();
            if is_executable(&path) {
                if let Some(name) = path.file_name().and_then(OsStr::to_str) {
                    bins.insert(name.to_string());
                }
            }
        }
    }
    bins.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_entry_reads_main_group_only() {
        let src = "[Desktop Entry]\nName=Firefox\nName[de]=Feuerfuchs\nIcon=firefox\n\n[Desktop Action new]\nName=New Window\n";
        assert_eq!(
            parse_desktop_entry(src),
            Some(("Firefox".to_string(), "firefox".to_string()))
        );
        assert_eq!(
            parse_desktop_entry("[Desktop Entry]\nName=Calc\n"),
            Some(("Calc".to_string(), DEFAULT_APP_ICON.to_string()))
        );
        assert!(parse_desktop_entry("[Desktop Entry]\nIcon=x\n").is_none());
        assert!(parse_desktop_entry("[Desktop Entry]\nName=X\nNoDisplay=true\n").is_none());
    }

    #[test]
    fn later_directories_override_earlier() {
        let tmp = tempfile::tempdir().unwrap();
        let sys = tmp.path().join("sys");
        let user = tmp.path().join("user");
        fs::create_dir_all(&sys).unwrap();
        fs::create_dir_all(&user).unwrap();
        fs::write(sys.join("ed.desktop"), "[Desktop Entry]\nName=Editor\nIcon=a\n").unwrap();
        fs::write(user.join("my-ed.desktop"), "[Desktop Entry]\nName=Editor\nIcon=b\n").unwrap();
        fs::write(sys.join("notes.txt"), "[Desktop Entry]\nName=Nope\n").unwrap();
        let apps = scan_apps(&[sys, user, tmp.path().join("missing")]);
        assert_eq!(apps.len(), 1);
        let ed = &apps["Editor"];
        assert_eq!(ed.command, "gtk-launch my-ed.desktop");
        assert_eq!(ed.icon, "b");
    }

    #[cfg(unix)]
    #[test]
    fn binaries_are_unique_and_sorted() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        for (dir, name, mode) in [(&a, "zed", 0o755), (&b, "zed", 0o755), (&b, "awk", 0o700), (&b, "readme", 0o644)] {
            let p = dir.join(name);
            fs::write(&p, "").unwrap();
            fs::set_permissions(&p, fs::Permissions::from_mode(mode)).unwrap();
        }
        let path_var = env::join_paths([a, b, tmp.path().join("missing")]).unwrap();
        assert_eq!(scan_binaries(&path_var), ["awk", "zed"]);
    }
}
