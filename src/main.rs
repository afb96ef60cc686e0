mod commands;
mod core;
mod graph;
mod scan;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use crate::commands::{ChangeSource, GraphView, OutputFormat};
use crate::core::context::{BuildOptions, ProjectContext};
use crate::core::error::{AffectedError, AffectedResult, ResultExt, print_error};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Find the Go entry points affected by a set of changed files
#[derive(Parser)]
#[command(name = "go-affected")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project root holding go.mod (default: nearest ancestor of the current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Worker threads for the directory scan (overrides affected.toml)
  #[arg(short, long, global = true)]
  jobs: Option<usize>,

  /// Output format: text, json, names (default: affected.toml or text)
  #[arg(long, global = true)]
  format: Option<String>,

  /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show which entry points (package main) are affected by changed files
  Affected {
    /// Changed files relative to the project root; read from stdin when omitted
    files: Vec<PathBuf>,
    /// Git ref to compare against (diffs <ref>...HEAD)
    #[arg(long, conflicts_with_all = ["files", "from"])]
    since: Option<String>,
    /// Start ref (for ref pair mode)
    #[arg(long, requires = "to", conflicts_with = "files")]
    from: Option<String>,
    /// End ref (for ref pair mode)
    #[arg(long, requires = "from")]
    to: Option<String>,
  },

  /// Print the package forest discovered under the project root
  Packages,

  /// Inspect the import graph
  Graph {
    /// Export Graphviz DOT
    #[arg(long, conflicts_with = "cycles")]
    dot: bool,
    /// List import cycles
    #[arg(long)]
    cycles: bool,
    /// With --cycles: exit with status 3 when any cycle exists
    #[arg(long, requires = "cycles")]
    strict: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
  let default_level = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> AffectedResult<()> {
  let root = resolve_root(cli.root.as_deref())?;
  tracing::debug!(root = %root.display(), "project root resolved");

  let ctx = ProjectContext::build(&root, BuildOptions { jobs: cli.jobs })?;
  tracing::debug!(module = %ctx.module_path, "project context ready");
  let format = OutputFormat::parse(cli.format.as_deref().unwrap_or(&ctx.config.output.format))?;

  match cli.command {
    Commands::Affected { files, since, from, to } => {
      let source = change_source(files, since, from.zip(to))?;
      commands::run_affected(&ctx, source, format)
    }
    Commands::Packages => commands::run_packages(&ctx, format),
    Commands::Graph { dot, cycles, strict } => {
      let view = if dot {
        GraphView::Dot
      } else if cycles {
        GraphView::Cycles { strict }
      } else {
        GraphView::Summary
      };
      commands::run_graph(&ctx, view, format)
    }
  }
}

/// `--root` if given, else the nearest ancestor with a go.mod, else the
/// current directory (which then fails the manifest check).
fn resolve_root(explicit: Option<&std::path::Path>) -> AffectedResult<PathBuf> {
  let root = match explicit {
    Some(root) => root.to_path_buf(),
    None => {
      let cwd = std::env::current_dir().context("Failed to get current directory")?;
      crate::core::manifest::find_project_root(&cwd).unwrap_or(cwd)
    }
  };

  // Canonical so git's absolute paths line up with the scanned tree
  root
    .canonicalize()
    .with_context(|| format!("Project root {} is not accessible", root.display()))
}

fn change_source(
  files: Vec<PathBuf>,
  since: Option<String>,
  range: Option<(String, String)>,
) -> AffectedResult<ChangeSource> {
  if let Some(base) = since {
    return Ok(ChangeSource::Since(base));
  }
  if let Some((from, to)) = range {
    return Ok(ChangeSource::Range { from, to });
  }
  if !files.is_empty() {
    return Ok(ChangeSource::Files(files));
  }

  let stdin = std::io::stdin();
  if stdin.is_terminal() {
    return Err(AffectedError::with_help(
      "No changed files given",
      "Pass files as arguments, pipe them on stdin (e.g. `git diff --name-only | go-affected affected`), or use --since <ref>.",
    ));
  }
  let files = utils::read_path_list(stdin.lock()).context("Failed to read changed files from stdin")?;
  Ok(ChangeSource::Files(files))
}

fn handle_error(err: AffectedError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
