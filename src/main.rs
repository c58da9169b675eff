//! Hook installer CLI - Link checked-in hook scripts into .git/hooks
//!
//! Usage:
//!   hook-installer                                    # default mapping, repo found from cwd
//!   hook-installer --repo <path>                      # explicit repository root
//!   hook-installer --mapping pre-push=scripts/pp.sh   # repeatable
//!   hook-installer --json                             # JSON report on stdout
//!
//! Exit codes: 0 all hooks installed, 1 some hook failed, 2 fatal error.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use hook_installer::{
    discover_root, ensure_repo_root, install_with_options, select_mappings, HookMapping,
    InstallOptions, InstallReport, InstallResult, LinkMode, ProjectConfig,
};

#[derive(Parser)]
#[command(name = "hook-installer")]
#[command(about = "Install managed git hook links into a repository")]
#[command(version)]
struct Cli {
    /// Repository root (defaults to searching upward from the current directory)
    #[arg(long, value_name = "PATH")]
    repo: Option<PathBuf>,

    /// Hook to install as name=relativePath; repeatable
    #[arg(long = "mapping", value_name = "NAME=PATH")]
    mappings: Vec<HookMapping>,

    /// Project config file (defaults to .hooks.toml in the repository root)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Copy hook files instead of linking them
    #[arg(long)]
    copy: bool,

    /// Output the report as JSON instead of one line per hook
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            return ExitCode::from(2);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report.summary()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{} Failed to serialize report: {}", style("✗").red(), e);
                return ExitCode::from(2);
            }
        }
    } else {
        for entry in &report.entries {
            println!("{}", entry);
        }
    }

    if report.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: &Cli) -> InstallResult<InstallReport> {
    let repo_root = match &cli.repo {
        Some(path) => ensure_repo_root(path)?,
        None => discover_root(env::current_dir()?)?,
    };

    let config = match &cli.config {
        Some(path) => Some(ProjectConfig::load(path)?),
        None => ProjectConfig::discover(&repo_root)?,
    };

    let mappings = select_mappings(cli.mappings.clone(), config.as_ref())?;
    let link_mode = if cli.copy {
        LinkMode::Copy
    } else {
        config.as_ref().and_then(|c| c.mode).unwrap_or_default()
    };

    install_with_options(&repo_root, &mappings, InstallOptions { link_mode })
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "hook_installer=error",
        1 => "hook_installer=info",
        _ => "hook_installer=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
