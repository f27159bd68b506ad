//! Issue-type ranking, exit-code policy and the final summary.

use std::collections::HashMap;
use std::fmt::Write as _;

use lintmerge_types::{
    EXIT_CRITICAL_ISSUES, EXIT_OK, EXIT_STRICT_ISSUES, Issue, LastPolicy, Severity,
};

use crate::report::render_report_json;
use crate::settings::Settings;

/// One row of the issue-type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsEntry {
    pub check_name: String,
    pub count: usize,
    /// `path:line` of the most recent issue of this type.
    pub last_location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub stats: bool,
    pub last: LastPolicy,
    pub strict: bool,
    pub silent: bool,
}

impl From<&Settings> for SummaryOptions {
    fn from(s: &Settings) -> Self {
        Self {
            stats: s.stats,
            last: s.last,
            strict: s.strict,
            silent: s.silent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub exit_code: i32,
    /// For the diagnostic stream; `None` when stats are off.
    pub stats_text: Option<String>,
    /// For stdout; `None` in silent mode.
    pub report_json: Option<String>,
}

pub fn summarize(issues: &[Issue], opts: &SummaryOptions) -> Result<Summary, serde_json::Error> {
    let stats_text = opts
        .stats
        .then(|| render_stats(&rank_issue_types(issues), issues, opts.last));
    let report_json = if opts.silent {
        None
    } else {
        Some(render_report_json(issues)?)
    };
    Ok(Summary {
        exit_code: compute_exit_code(issues, opts.strict),
        stats_text,
        report_json,
    })
}

/// Non-strict: fail only on critical issues. Strict: fail on any issue at all.
pub fn compute_exit_code(issues: &[Issue], strict: bool) -> i32 {
    if strict {
        if issues.is_empty() {
            EXIT_OK
        } else {
            EXIT_STRICT_ISSUES
        }
    } else if issues.iter().any(|i| i.severity == Severity::Critical) {
        EXIT_CRITICAL_ISSUES
    } else {
        EXIT_OK
    }
}

/// Groups by check name and ranks by descending count. Equal counts keep
/// first-seen order.
pub fn rank_issue_types(issues: &[Issue]) -> Vec<StatsEntry> {
    let mut entries: Vec<StatsEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for issue in issues {
        let last_location = format!(
            "{}:{}",
            issue.location.path, issue.location.positions.begin.line
        );
        match index.get(issue.check_name.as_str()) {
            Some(&i) => {
                entries[i].count += 1;
                entries[i].last_location = last_location;
            }
            None => {
                index.insert(&issue.check_name, entries.len());
                entries.push(StatsEntry {
                    check_name: issue.check_name.clone(),
                    count: 1,
                    last_location,
                });
            }
        }
    }

    // stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

pub fn render_stats(entries: &[StatsEntry], issues: &[Issue], last: LastPolicy) -> String {
    if entries.is_empty() {
        return "No issues found.\n".to_string();
    }

    let width = entries
        .iter()
        .map(|e| e.count.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::from("Issue types:\n");
    for e in entries {
        let show_last = match last {
            LastPolicy::Never => false,
            LastPolicy::Always => true,
            LastPolicy::Single => e.count == 1,
        };
        let _ = write!(out, "  {:>width$}  {}", e.count, e.check_name);
        if show_last {
            let _ = write!(out, " ({})", e.last_location);
        }
        out.push('\n');
    }

    let mut counts = [0usize; 4];
    for i in issues {
        counts[i.severity as usize] += 1;
    }
    let _ = writeln!(
        out,
        "\n{} issue(s): {} critical, {} major, {} minor, {} info",
        issues.len(),
        counts[Severity::Critical as usize],
        counts[Severity::Major as usize],
        counts[Severity::Minor as usize],
        counts[Severity::Info as usize],
    );
    out
}
