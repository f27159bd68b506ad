//! Stage sequencing with fail-fast semantics.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use lintmerge_types::{Family, Issue, Tool};
use tracing::{debug, info};

use crate::filter::PathFilter;
use crate::runner::ProcessRunner;
use crate::settings::Settings;
use crate::stage::{ToolOutcome, build_command, plan_stages, resolve_runtime, run_stage};

/// Working-directory bookkeeping owned by the orchestrator.
///
/// The process-wide current directory is never changed; stages receive
/// [`RunContext::current`] as their working directory instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    original: PathBuf,
    current: PathBuf,
}

impl RunContext {
    pub fn new(original: impl Into<PathBuf>) -> Self {
        let original = original.into();
        Self {
            current: original.clone(),
            original,
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Switches to `dir`. A no-op when already there.
    pub fn enter(&mut self, dir: &Path) {
        if self.current != dir {
            debug!("entering {}", dir.display());
            self.current = dir.to_path_buf();
        }
    }

    pub fn restore(&mut self) {
        self.enter(&self.original.clone());
    }
}

/// Why a run stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub tool: Tool,
    /// Output of the failing tool, verbatim. Empty when it never ran.
    pub raw_output: String,
    pub message: String,
    pub exit_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every enabled stage succeeded; issues are in stage order.
    Completed { issues: Vec<Issue> },
    StageFailed(StageFailure),
}

/// Runs every enabled, detected stage in order and accumulates their issues.
///
/// Progress lines go to `diag` at verbosity 1 and above. The first failing
/// stage ends the run; `ctx` is back at its original directory either way.
pub fn run_pipeline(
    settings: &Settings,
    runner: &dyn ProcessRunner,
    ctx: &mut RunContext,
    diag: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let filter = PathFilter::compile(&settings.exclude_paths)?;
    let outcome = run_stages(settings, runner, ctx, diag);
    ctx.restore();

    match outcome? {
        PipelineOutcome::Completed { mut issues } => {
            let before = issues.len();
            issues.retain(|i| !filter.is_excluded(&i.location.path));
            if issues.len() != before {
                debug!("exclude_paths dropped {} issue(s)", before - issues.len());
            }
            Ok(PipelineOutcome::Completed { issues })
        }
        failed => Ok(failed),
    }
}

fn run_stages(
    settings: &Settings,
    runner: &dyn ProcessRunner,
    ctx: &mut RunContext,
    diag: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let mut issues = Vec::new();
    // Resolved on first use so PHP-only runs never probe for a runtime.
    let mut runtime: Option<Option<PathBuf>> = None;

    for plan in plan_stages(settings) {
        let tool = plan.tool;
        if !plan.enabled {
            debug!("{}: disabled", tool.as_str());
            continue;
        }
        let Some(binary) = plan.binary else {
            debug!(
                "{}: no binary at {}",
                tool.as_str(),
                plan.root.join(tool.binary_path()).display()
            );
            continue;
        };

        ctx.enter(&plan.root);

        let rt = match tool.family() {
            Family::Php => None,
            Family::Js => {
                let found = runtime.get_or_insert_with(|| resolve_runtime(&settings.runtimes));
                match found {
                    Some(p) => Some(p.clone()),
                    None => {
                        return Ok(PipelineOutcome::StageFailed(StageFailure {
                            tool,
                            raw_output: String::new(),
                            message: format!(
                                "{} needs a JavaScript runtime but none was found (tried: {})",
                                tool.display_name(),
                                settings.runtimes.join(", ")
                            ),
                            exit_code: tool.failure_exit_code(),
                        }));
                    }
                }
            }
        };

        if settings.verbosity >= 1 {
            writeln!(diag, "Running {}...", tool.display_name())?;
        }
        let command = build_command(tool, settings, ctx.current(), &binary, rt.as_deref());
        match run_stage(runner, tool, &command, settings.biome_reporter) {
            ToolOutcome::Ok(found) => issues.extend(found),
            ToolOutcome::Failed { raw_output, reason } => {
                info!("{} failed, aborting run", tool.display_name());
                return Ok(PipelineOutcome::StageFailed(StageFailure {
                    tool,
                    raw_output,
                    message: reason,
                    exit_code: tool.failure_exit_code(),
                }));
            }
        }
    }

    Ok(PipelineOutcome::Completed { issues })
}

/// Writes the failing tool's raw output, then the explanation, to `diag`.
pub fn report_failure(diag: &mut dyn Write, failure: &StageFailure) -> std::io::Result<()> {
    if !failure.raw_output.is_empty() {
        diag.write_all(failure.raw_output.as_bytes())?;
        if !failure.raw_output.ends_with('\n') {
            diag.write_all(b"\n")?;
        }
    }
    writeln!(diag, "{}", failure.message)
}
