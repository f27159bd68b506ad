//! PHP-CS-Fixer `fix --dry-run --diff --format=json`.
//!
//! The tool reports a unified diff per file instead of positions, so the line
//! is estimated from the first hunk header.

use std::sync::OnceLock;

use lintmerge_domain::{Finding, ToolSeverity};
use lintmerge_types::Severity;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::ParseError;
use crate::envelope::{Envelope, decode, from_value, keyed_entries};

/// Lines of unchanged context a unified diff carries before the first change.
pub const DIFF_CONTEXT_OFFSET: u32 = 3;

#[derive(Debug, Deserialize)]
struct Report {
    /// A list of file entries, or the same entries keyed by path.
    files: Value,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    diff: String,
    #[serde(default, rename = "appliedFixers")]
    applied_fixers: Vec<String>,
}

fn hunk_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("valid hunk regex")
    })
}

/// Best-effort line of the first change in `diff`: the old-side start of the
/// first hunk plus [`DIFF_CONTEXT_OFFSET`]. Falls back to line 1 without a hunk.
pub fn estimate_line(diff: &str) -> u32 {
    hunk_header()
        .captures(diff)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(|start| start.saturating_add(DIFF_CONTEXT_OFFSET))
        .unwrap_or(1)
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let report: Report = decode(raw, Envelope::Object)?;

    if report.files.is_null() {
        return Err(ParseError::UnexpectedShape("missing `files`".to_string()));
    }

    let mut out = Vec::new();
    for (key, entry) in keyed_entries(report.files, "files")? {
        let file: FileEntry = from_value(entry)?;
        let Some(name) = file.name.filter(|n| !n.is_empty()).or(key) else {
            return Err(ParseError::UnexpectedShape(
                "`files` entry has neither a name nor a path key".to_string(),
            ));
        };
        let line = estimate_line(&file.diff);
        let severity = ToolSeverity::canonical(Severity::Minor);
        if file.applied_fixers.is_empty() {
            out.push(
                Finding::new(name.clone(), line, "File is not formatted")
                    .with_severity(severity),
            );
            continue;
        }
        for fixer in file.applied_fixers {
            let message = format!("Fixer `{fixer}` would change this file");
            out.push(
                Finding::new(name.clone(), line, message)
                    .with_severity(severity.clone())
                    .with_classifier(Some(fixer)),
            );
        }
    }
    Ok(out)
}
