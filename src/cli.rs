//! Command-line interface for netmsg-check.

use anyhow::Context;
use clap::Parser;
use colored::*;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config};
use crate::report::{self, Report, ReportPaths, WriteOutcome};
use crate::scan::{Runner, ScanOutcome};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;

/// Characters rejected in a project root path.
const UNSAFE_PATH_CHARS: &[char] = &['|', ';', '&', '`', '$', '(', ')', '<', '>'];

/// NetMsg ID conflict checker.
///
/// Scans Lua sources under a project root for NetMsg id declarations,
/// reports ids defined more than once and ids that intrude on reserved
/// ranges, and writes a text and a JSON report.
#[derive(Parser, Debug, Default)]
#[command(name = "netmsg-check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root directory (default: current directory)
    pub project_root: Option<PathBuf>,

    /// Show detailed logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Path for the text report; the JSON report is written next to it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Search upward for a directory containing the project marker
    #[arg(short, long)]
    pub auto_detect: bool,

    /// Path to a YAML config file (default: netmsg-check.yaml in the project root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Continue without asking when the project marker directory is missing
    #[arg(short, long)]
    pub yes: bool,
}

/// Reasons the project root cannot be used.
#[derive(Error, Debug)]
pub enum RootError {
    #[error("project root does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("project root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("project root must be an absolute path: {}", .0.display())]
    NotAbsolute(PathBuf),
    #[error("project root contains suspicious character {ch:?}: {}", .path.display())]
    UnsafeCharacter { path: PathBuf, ch: char },
    #[error("no {marker:?} directory in {}; aborted", .path.display())]
    Aborted { path: PathBuf, marker: String },
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// If `root` is the tool's own directory inside a project, return the
/// project root above it.
pub fn project_root_from_tools_dir(root: &Path, tools_dir: &str) -> Option<PathBuf> {
    let tools = Path::new(tools_dir);
    if tools_dir.is_empty() || !root.ends_with(tools) {
        return None;
    }
    root.ancestors()
        .nth(tools.components().count())
        .map(Path::to_path_buf)
}

/// Walk up from `start` (itself included) at most `levels` directories,
/// looking for one that contains `marker`.
pub fn auto_detect_root(start: &Path, marker: &str, levels: usize) -> Option<PathBuf> {
    start
        .ancestors()
        .take(levels)
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

/// Make `path` absolute against `cwd` and drop `.` and `..` components.
///
/// Purely lexical, so it works for paths that do not exist yet. `..` at the
/// filesystem root stays at the root.
pub fn normalize_path(path: &Path, cwd: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Work out which directory to scan, before any validation.
pub fn candidate_root(cli: &Cli, config: &Config, cwd: &Path) -> PathBuf {
    let requested = cli.project_root.as_deref().unwrap_or(cwd);
    let mut root = normalize_path(requested, cwd);

    if let Some(adjusted) = project_root_from_tools_dir(&root, &config.tools_dir) {
        println!(
            "Running from the tools directory, using project root {}",
            adjusted.display()
        );
        root = adjusted;
    }

    if cli.auto_detect {
        match auto_detect_root(&root, &config.project_marker, config.auto_detect_levels) {
            Some(found) => {
                println!("Auto-detected project root: {}", found.display());
                root = found;
            }
            None => tracing::warn!(
                "no {:?} directory within {} levels of {}",
                config.project_marker,
                config.auto_detect_levels,
                root.display()
            ),
        }
    }

    root
}

/// Check that `root` is an existing, absolute directory free of shell
/// metacharacters.
pub fn validate_root(root: &Path) -> Result<(), RootError> {
    if !root.exists() {
        return Err(RootError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(RootError::NotADirectory(root.to_path_buf()));
    }
    if !root.is_absolute() {
        return Err(RootError::NotAbsolute(root.to_path_buf()));
    }
    if let Some(ch) = root
        .to_string_lossy()
        .chars()
        .find(|c| UNSAFE_PATH_CHARS.contains(c))
    {
        return Err(RootError::UnsafeCharacter {
            path: root.to_path_buf(),
            ch,
        });
    }
    Ok(())
}

/// Ask the operator to confirm. Without a terminal, or on end of input,
/// the answer is no.
pub fn confirm<R: BufRead>(question: &str, input: &mut R, interactive: bool) -> bool {
    if !interactive {
        return false;
    }

    print!("{} (y/n): ", question);
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => {
            println!();
            false
        }
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    }
}

/// Make sure the project marker directory exists, or get permission to go on.
pub fn ensure_project_marker<R: BufRead>(
    root: &Path,
    config: &Config,
    assume_yes: bool,
    input: &mut R,
    interactive: bool,
) -> Result<(), RootError> {
    if root.join(&config.project_marker).is_dir() {
        return Ok(());
    }

    eprintln!(
        "{} no {:?} directory found in {}; this may not be a project root",
        "Warning:".yellow(),
        config.project_marker,
        root.display()
    );
    eprintln!("Hint: pass the project root, or use --auto-detect");

    if assume_yes || confirm("Continue anyway?", input, interactive) {
        return Ok(());
    }
    Err(RootError::Aborted {
        path: root.to_path_buf(),
        marker: config.project_marker.clone(),
    })
}

fn print_banner(root: &Path) {
    println!("============================================");
    println!(
        "  {} v{}",
        "netmsg-check".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("============================================");
    println!("  {}{}", "Platform:     ".dimmed(), std::env::consts::OS);
    println!("  {}{}", "Project root: ".dimmed(), root.display());
    println!("============================================");
}

/// Run a full check. Returns the process exit code.
pub fn run_check(cli: &Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("reading current directory")?;

    let explicit = match &cli.config {
        Some(path) => Some(
            Config::parse_file(path)
                .with_context(|| format!("parsing config {}", path.display()))?,
        ),
        None => None,
    };
    let resolve_config = explicit.clone().unwrap_or_default();

    // Resolve
    let root = candidate_root(cli, &resolve_config, &cwd);
    print_banner(&root);

    if let Err(e) = validate_root(&root) {
        eprintln!("{} {}", "Error:".red(), e);
        eprintln!("Current directory: {}", cwd.display());
        return Ok(EXIT_ERROR);
    }

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    if let Err(e) = ensure_project_marker(
        &root,
        &resolve_config,
        cli.yes,
        &mut stdin.lock(),
        interactive,
    ) {
        eprintln!("{} {}", "Error:".red(), e);
        return Ok(EXIT_ERROR);
    }

    let config = match explicit {
        Some(config) => config,
        None => {
            let (config, path) = Config::discover(&root)?;
            if let Some(path) = path {
                tracing::info!("using config {}", path.display());
            }
            config
        }
    };
    config::validate(&config).context("invalid configuration")?;

    execute(&root, &config, cli.output.as_deref(), &cwd)?;
    Ok(EXIT_SUCCESS)
}

/// What a completed check produced.
#[derive(Debug)]
pub struct CheckResult {
    pub outcome: ScanOutcome,
    pub paths: ReportPaths,
    pub written: WriteOutcome,
}

/// Scan an already validated `root`, write both reports and print the
/// summary. Finding conflicts is not an error.
pub fn execute(
    root: &Path,
    config: &Config,
    output: Option<&Path>,
    fallback_dir: &Path,
) -> anyhow::Result<CheckResult> {
    tracing::info!("checking {} id conflicts", config.table_name);
    let runner = Runner::new(root, config)?;
    let outcome = runner
        .run()
        .with_context(|| format!("scanning {}", root.display()))?;

    let paths = ReportPaths::resolve(root, config, output, fallback_dir);
    let written = {
        let report = Report::new(&outcome.registry, &outcome.stats, &config.table_name);
        let written = report::write_reports(&report, &paths);
        report::print_summary(&report, &paths, &written);
        written
    };

    Ok(CheckResult {
        outcome,
        paths,
        written,
    })
}
