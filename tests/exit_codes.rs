use std::path::Path;
use std::process::Command;

fn run_cmd_center(config_dir: &Path, args: &[&str]) -> (i32, String) {
    let exe = env!("CARGO_BIN_EXE_cmd-center");
    let out = Command::new(exe)
        .args(args)
        .env("CMD_CENTER_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("run cmd-center");
    (
        out.status.code().unwrap_or(1),
        String::from_utf8_lossy(&out.stdout).into_owned(),
    )
}

#[test]
fn doctor_passes_with_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "settings:\n  picker: sh\nmenu:\n  Dev:\n    Shell: \"TERM:zsh\"\n",
    )
    .unwrap();
    let (code, out) = run_cmd_center(dir.path(), &["doctor"]);
    assert_eq!(code, 0);
    assert!(out.contains("config.yaml"));
    assert!(!out.contains("'sh' not found"));
}

#[test]
fn doctor_fails_on_unparsable_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ \"menu\": ").unwrap();
    let (code, out) = run_cmd_center(dir.path(), &["doctor"]);
    assert_eq!(code, 1);
    assert!(out.contains("[error]"));
}

#[test]
fn doctor_reports_menu_issues_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "menu": { "Tools": { "Broken": "INTERNAL:NOPE" } } }"#,
    )
    .unwrap();
    let (code, out) = run_cmd_center(dir.path(), &["doctor"]);
    assert_eq!(code, 0);
    assert!(out.contains("unknown internal action 'NOPE'"));
    assert!(out.contains("(MenuCheck: menu.invalid)"));
}

#[test]
fn help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (code, out) = run_cmd_center(dir.path(), &["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("apps"));
    assert!(out.contains("doctor"));
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _) = run_cmd_center(dir.path(), &["launch-everything"]);
    assert_eq!(code, 2);
}
