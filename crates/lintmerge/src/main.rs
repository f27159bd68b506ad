use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use lintmerge_core::{
    Overrides, PipelineOutcome, RunContext, Settings, SummaryOptions, SystemRunner, plan_stages,
    report_failure, run_pipeline, summarize,
};
use lintmerge_types::{ConfigFile, Issue, LastPolicy, Tool};

mod config_loader;
mod env_expand;

use config_loader::load_config_with_includes;
use env_expand::expand_env_vars;

/// Config file picked up from the current directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "lintmerge.toml";

#[derive(Parser)]
#[command(name = "lintmerge")]
#[command(
    about = "Run PHP and JS linters and merge their reports into one Code Climate issue list",
    long_about = None
)]
struct Cli {
    /// Print progress lines; repeat for info-level logging.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    /// Path to a config file. If omitted, uses ./lintmerge.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled linter and print the merged report (the default).
    Run,

    /// Print the resolved stage table.
    Tools,

    /// Print the JSON Schema of the issue report.
    Schema,

    /// Print the effective configuration (includes merged) as TOML.
    Config,
}

#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Root directory of the PHP project.
    #[arg(long, global = true, value_name = "DIR")]
    php_root: Option<PathBuf>,

    /// Root directory of the JS project.
    #[arg(long, global = true, value_name = "DIR")]
    js_root: Option<PathBuf>,

    /// Fail on any issue, not only critical ones.
    #[arg(long, global = true)]
    strict: bool,

    /// Do not print the JSON report.
    #[arg(long, global = true)]
    silent: bool,

    /// Do not print the issue-type table.
    #[arg(long, global = true)]
    no_stats: bool,

    /// When to show the last location of an issue type in the table.
    #[arg(long, global = true, value_enum)]
    last: Option<LastArg>,

    /// Ask tools not to use their caches.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Run only these tools. Repeatable.
    #[arg(long, global = true, value_enum, action = ArgAction::Append)]
    only: Vec<ToolArg>,

    /// Never run these tools. Repeatable.
    #[arg(long, global = true, value_enum, action = ArgAction::Append)]
    skip: Vec<ToolArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LastArg {
    Never,
    Always,
    Single,
}

impl From<LastArg> for LastPolicy {
    fn from(v: LastArg) -> Self {
        match v {
            LastArg::Never => LastPolicy::Never,
            LastArg::Always => LastPolicy::Always,
            LastArg::Single => LastPolicy::Single,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ToolArg {
    Phpstan,
    Psalm,
    PhpCsFixer,
    Phpcs,
    Stylelint,
    ParallelLint,
    Eslint,
    Biome,
}

impl From<ToolArg> for Tool {
    fn from(v: ToolArg) -> Self {
        match v {
            ToolArg::Phpstan => Tool::Phpstan,
            ToolArg::Psalm => Tool::Psalm,
            ToolArg::PhpCsFixer => Tool::PhpCsFixer,
            ToolArg::Phpcs => Tool::Phpcs,
            ToolArg::Stylelint => Tool::Stylelint,
            ToolArg::ParallelLint => Tool::ParallelLint,
            ToolArg::Eslint => Tool::Eslint,
            ToolArg::Biome => Tool::Biome,
        }
    }
}

impl OverrideArgs {
    fn to_overrides(&self, verbosity: u8) -> Overrides {
        Overrides {
            php_root: self.php_root.clone(),
            js_root: self.js_root.clone(),
            strict: self.strict,
            silent: self.silent,
            no_stats: self.no_stats,
            last: self.last.map(Into::into),
            no_cache: self.no_cache,
            only: self.only.iter().copied().map(Into::into).collect(),
            skip: self.skip.iter().copied().map(Into::into).collect(),
            verbosity,
        }
    }
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(lintmerge_types::EXIT_INTERNAL_ERROR as u8)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match &cli.command {
        None | Some(Commands::Run) => cmd_run(&cli),
        Some(Commands::Tools) => {
            cmd_tools(&cli)?;
            Ok(0)
        }
        Some(Commands::Schema) => {
            cmd_schema()?;
            Ok(0)
        }
        Some(Commands::Config) => {
            cmd_config(&cli)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
///
/// A single `-v` only turns on progress lines; logging starts at `-vv`.
fn init_logging(verbose: u8, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose >= 2 {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_run(cli: &Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("determine current directory")?;
    let settings = resolve_settings(cli, &cwd)?;

    let mut ctx = RunContext::new(&cwd);
    let mut diag = io::stderr().lock();
    let outcome = run_pipeline(&settings, &SystemRunner, &mut ctx, &mut diag)?;

    let issues = match outcome {
        PipelineOutcome::Completed { issues } => issues,
        PipelineOutcome::StageFailed(failure) => {
            report_failure(&mut diag, &failure).context("write failure report")?;
            return Ok(failure.exit_code);
        }
    };
    info!("{} issue(s) after filtering", issues.len());

    let summary = summarize(&issues, &SummaryOptions::from(&settings)).context("render report")?;
    if let Some(stats) = &summary.stats_text {
        diag.write_all(stats.as_bytes()).context("write stats")?;
    }
    if let Some(report) = &summary.report_json {
        let mut out = io::stdout().lock();
        writeln!(out, "{report}").context("write report")?;
    }

    Ok(summary.exit_code)
}

fn cmd_tools(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("determine current directory")?;
    let settings = resolve_settings(cli, &cwd)?;

    let mut out = io::stdout().lock();
    writeln!(out, "{:<14} {:<9} BINARY", "TOOL", "STATE")?;
    for plan in plan_stages(&settings) {
        let state = if !plan.enabled {
            "disabled"
        } else if plan.binary.is_some() {
            "ready"
        } else {
            "missing"
        };
        let binary = plan.root.join(plan.tool.binary_path());
        writeln!(
            out,
            "{:<14} {:<9} {}",
            plan.tool.as_str(),
            state,
            binary.display()
        )?;
    }
    Ok(())
}

fn cmd_schema() -> Result<()> {
    let schema = schemars::schema_for!(Vec<Issue>);
    let s = serde_json::to_string_pretty(&schema).context("render schema")?;
    println!("{s}");
    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let s = toml::to_string_pretty(&cfg).context("render toml")?;
    print!("{s}");
    Ok(())
}

fn resolve_settings(cli: &Cli, cwd: &Path) -> Result<Settings> {
    let cfg = load_config(cli.config.as_deref())?;
    let overrides = cli.overrides.to_overrides(cli.verbose);
    let settings = Settings::resolve(&cfg, &overrides, cwd).context("resolve settings")?;
    debug!(
        "PHP root {}, JS root {}",
        settings.php_root.display(),
        settings.js_root.display()
    );
    Ok(settings)
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let user_path = path.map(Path::to_path_buf).or_else(|| {
        let p = PathBuf::from(DEFAULT_CONFIG_FILE);
        if p.exists() { Some(p) } else { None }
    });

    let Some(path) = user_path else {
        debug!("No config file found, using defaults");
        return Ok(ConfigFile::default());
    };

    info!("Loading config from: {}", path.display());
    load_config_with_includes(&path, |text| Ok(expand_env_vars(text)?.into_owned()))
}
