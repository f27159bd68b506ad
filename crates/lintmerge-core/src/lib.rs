//! Core engine: runs the configured linters in order, normalizes their
//! reports and summarizes the result.

mod filter;
mod pipeline;
mod report;
mod runner;
mod settings;
mod stage;
mod stats;

pub use filter::{PathFilter, PathFilterError};
pub use pipeline::{PipelineOutcome, RunContext, StageFailure, report_failure, run_pipeline};
pub use report::render_report_json;
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner, ToolCommand};
pub use settings::{DEFAULT_RUNTIMES, Overrides, Settings, SettingsError, ToolSettings};
pub use stage::{
    StagePlan, ToolOutcome, build_command, plan_stages, resolve_runtime, run_stage,
};
pub use stats::{
    StatsEntry, Summary, SummaryOptions, compute_exit_code, rank_issue_types, render_stats,
    summarize,
};
