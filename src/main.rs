use std::path::PathBuf;

use anyhow::Result;
use clap::Parser as ClapParser;
use clap::Subcommand;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use cmd_center::app::session::{Outcome, Session};
use cmd_center::checks::context::CheckContext;
use cmd_center::checks::runner::{CheckRunner, has_errors};
use cmd_center::checks::types::Severity;
use cmd_center::config::{self, Paths};
use cmd_center::exec::ShellLauncher;
use cmd_center::picker::RofiPicker;
use cmd_center::scanner::SystemCatalog;
use cmd_center::view::Section;

#[derive(ClapParser, Debug)]
#[command(
    name = "cmd-center",
    version,
    about = "Keyboard-driven launcher: categories, applications and binaries through rofi"
)]
struct Cli {
    /// Directory holding config.{json,yaml,toml} and state.json
    #[arg(long, env = "CMD_CENTER_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<CenterCmd>,
}

#[derive(Subcommand, Debug)]
enum CenterCmd {
    /// Direct to Applications
    Apps,
    /// Direct to Binary Runner
    Run,
    /// Direct to Settings
    Options,
    /// Check config, menu and external tools
    Doctor,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let is_json = matches!(
        std::env::var("CMD_CENTER_LOG_FORMAT").ok().as_deref(),
        Some("json" | "JSON")
    );
    if is_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() {
    init_tracing();
    let code = match cli_main() {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "cmd-center error");
            1
        }
    };
    std::process::exit(code);
}

fn cli_main() -> Result<i32> {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.config_dir.as_deref());

    let start = match cli.cmd {
        Some(CenterCmd::Doctor) => return Ok(doctor(paths)),
        Some(CenterCmd::Apps) => Some(Section::Apps),
        Some(CenterCmd::Run) => Some(Section::Run),
        Some(CenterCmd::Options) => Some(Section::Options),
        None => None,
    };

    let cfg = config::load_config(&paths.config);
    let state = config::load_state(&paths.state);
    let picker = RofiPicker::new(cfg.settings.clone());
    let mut session = Session::new(
        paths,
        cfg,
        state,
        start,
        picker,
        ShellLauncher,
        SystemCatalog,
    );
    match session.run()? {
        Outcome::Cancelled => debug!("selection cancelled"),
        Outcome::Launched(line) => debug!(command = %line, "exiting after launch"),
        Outcome::HistoryCleared => debug!("exiting after clearing history"),
    }
    Ok(0)
}

fn doctor(paths: Paths) -> i32 {
    println!("cmd-center doctor\n=================");
    println!("\nPaths:");
    println!("  dir:    {}", paths.dir.display());
    println!("  config: {}", paths.config.display());
    println!("  state:  {}", paths.state.display());

    let ctx = CheckContext::from_env(paths);
    let findings = CheckRunner::default().run_all(&ctx);

    println!("\nFindings:");
    if findings.is_empty() {
        println!("  \x1b[32m[ok]\x1b[0m nothing to report");
    }
    for f in &findings {
        let color = match f.severity {
            Severity::Info => "34",
            Severity::Warning => "33",
            Severity::Error => "31",
        };
        println!(
            "  \x1b[{color}m[{}]\x1b[0m {} ({}: {})",
            f.severity, f.message, f.source_check, f.id
        );
        if let Some(p) = &f.path {
            println!("         {}", p.display());
        }
    }

    i32::from(has_errors(&findings))
}
