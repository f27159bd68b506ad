//! One tool's run-parse-normalize unit.

use std::path::{Path, PathBuf};

use lintmerge_domain::normalize;
use lintmerge_parsers::{ParseContext, ToolParser};
use lintmerge_types::{BiomeReporter, Family, Issue, Tool};
use tracing::{debug, info};

use crate::runner::{ProcessRunner, ToolCommand};
use crate::settings::Settings;

/// Files Stylelint is pointed at; the tool expands the glob itself.
const STYLELINT_GLOB: &str = "**/*.{css,scss,sass,less}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Ok(Vec<Issue>),
    Failed {
        /// Tool output exactly as captured.
        raw_output: String,
        /// One-line explanation for the diagnostic stream.
        reason: String,
    },
}

/// What the pipeline knows about a stage before running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub tool: Tool,
    pub enabled: bool,
    pub root: PathBuf,
    /// Absolute binary path when it exists under the family root.
    pub binary: Option<PathBuf>,
}

impl StagePlan {
    pub fn will_run(&self) -> bool {
        self.enabled && self.binary.is_some()
    }
}

/// Every stage in pipeline order, with enablement and binary detection resolved.
pub fn plan_stages(settings: &Settings) -> Vec<StagePlan> {
    Tool::ALL
        .into_iter()
        .map(|tool| {
            let root = settings.root(tool.family()).to_path_buf();
            let candidate = root.join(tool.binary_path());
            StagePlan {
                tool,
                enabled: settings.is_enabled(tool),
                binary: candidate.is_file().then_some(candidate),
                root,
            }
        })
        .collect()
}

/// First runtime from `preferences` that is an existing file or resolves on `PATH`.
pub fn resolve_runtime(preferences: &[String]) -> Option<PathBuf> {
    preferences.iter().find_map(|name| {
        let p = Path::new(name);
        if p.components().count() > 1 && p.is_file() {
            return Some(p.to_path_buf());
        }
        match which::which(name) {
            Ok(found) => Some(found),
            Err(e) => {
                debug!("runtime '{name}' not available: {e}");
                None
            }
        }
    })
}

/// Builds the invocation for `tool`, to be run in `working_dir`.
///
/// PHP tools are executed directly. JS tools run as `<runtime> <binary> ...`,
/// so `runtime` must be set for them.
pub fn build_command(
    tool: Tool,
    settings: &Settings,
    working_dir: &Path,
    binary: &Path,
    runtime: Option<&Path>,
) -> ToolCommand {
    let ts = settings.tool(tool);
    let cfg = ts.and_then(|t| t.config.as_deref());
    let cache = settings.cache;

    let mut args: Vec<String> = Vec::new();
    let mut target: Option<&str> = None;
    match tool {
        Tool::Phpstan => {
            args.extend(
                ["analyse", "--error-format=json", "--no-progress", "--no-interaction"]
                    .map(String::from),
            );
            if let Some(c) = cfg {
                args.push("-c".to_string());
                args.push(c.to_string());
            }
        }
        Tool::Psalm => {
            args.extend(["--output-format=json", "--no-progress"].map(String::from));
            if let Some(c) = cfg {
                args.push(format!("--config={c}"));
            }
            if !cache {
                args.push("--no-cache".to_string());
            }
        }
        Tool::PhpCsFixer => {
            args.extend(["fix", "--dry-run", "--diff", "--format=json"].map(String::from));
            if let Some(c) = cfg {
                args.push(format!("--config={c}"));
            }
            if !cache {
                args.push("--using-cache=no".to_string());
            }
        }
        Tool::Phpcs => {
            args.extend(["--report=json", "-q"].map(String::from));
            if let Some(c) = cfg {
                args.push(format!("--standard={c}"));
            }
            if !cache {
                args.push("--no-cache".to_string());
            }
        }
        Tool::ParallelLint => {
            args.extend(["--json", "--exclude", "vendor"].map(String::from));
            target = Some(".");
        }
        Tool::Stylelint => {
            args.push("--formatter=json".to_string());
            if let Some(c) = cfg {
                args.push("--config".to_string());
                args.push(c.to_string());
            }
            if cache {
                args.push("--cache".to_string());
            }
            target = Some(STYLELINT_GLOB);
        }
        Tool::Eslint => {
            args.push("--format=json".to_string());
            if let Some(c) = cfg {
                args.push("--config".to_string());
                args.push(c.to_string());
            }
            if cache {
                args.push("--cache".to_string());
            }
            target = Some(".");
        }
        Tool::Biome => {
            args.push("lint".to_string());
            args.push(format!("--reporter={}", settings.biome_reporter.as_str()));
            if let Some(c) = cfg {
                args.push(format!("--config-path={c}"));
            }
            target = Some(".");
        }
    }
    if let Some(extra) = ts.map(|t| &t.args) {
        args.extend(extra.iter().cloned());
    }
    if let Some(t) = target {
        args.push(t.to_string());
    }

    let current_dir = working_dir.to_path_buf();
    match (tool.family(), runtime) {
        (Family::Js, Some(rt)) => {
            let mut full = vec![binary.display().to_string()];
            full.extend(args);
            ToolCommand {
                program: rt.to_path_buf(),
                args: full,
                current_dir,
            }
        }
        _ => ToolCommand {
            program: binary.to_path_buf(),
            args,
            current_dir,
        },
    }
}

/// Runs `command`, parses what it printed and normalizes every finding.
pub fn run_stage(
    runner: &dyn ProcessRunner,
    tool: Tool,
    command: &ToolCommand,
    biome_reporter: BiomeReporter,
) -> ToolOutcome {
    let output = match runner.run(command) {
        Ok(o) => o,
        Err(e) => {
            return ToolOutcome::Failed {
                raw_output: format!("{e:#}"),
                reason: format!("could not start {}", tool.display_name()),
            };
        }
    };

    let ctx = ParseContext {
        working_dir: &command.current_dir,
        exit_code: output.exit_code,
    };
    match ToolParser::for_tool(tool, biome_reporter).parse(&output.text, &ctx) {
        Ok(findings) => {
            let issues: Vec<Issue> = findings
                .into_iter()
                .map(|f| normalize(tool, &command.current_dir, f))
                .collect();
            info!(
                "{} reported {} issue(s) (exit {:?})",
                tool.display_name(),
                issues.len(),
                output.exit_code
            );
            ToolOutcome::Ok(issues)
        }
        Err(e) => ToolOutcome::Failed {
            raw_output: output.text,
            reason: format!("{} output could not be parsed: {e}", tool.display_name()),
        },
    }
}
