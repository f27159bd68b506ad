//! PHP Parallel Lint `--json`.

use lintmerge_domain::{Finding, ToolSeverity};
use lintmerge_types::Severity;
use serde::Deserialize;

use crate::ParseError;
use crate::envelope::{Envelope, decode};

#[derive(Debug, Deserialize)]
struct Report {
    results: Results,
}

#[derive(Debug, Deserialize)]
struct Results {
    #[serde(default)]
    errors: Vec<LintError>,
}

#[derive(Debug, Deserialize)]
struct LintError {
    #[serde(rename = "type")]
    kind: String,
    file: String,
    #[serde(default)]
    line: Option<u32>,
    message: String,
    /// Message with the file path stripped; preferred when present.
    #[serde(rename = "normalizeMessage", default)]
    normalized: Option<String>,
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let report: Report = decode(raw, Envelope::Object)?;
    Ok(report
        .results
        .errors
        .into_iter()
        .map(|e| {
            let severity = if e.kind == "syntaxError" {
                Severity::Critical
            } else {
                Severity::Major
            };
            let message = e.normalized.filter(|m| !m.is_empty()).unwrap_or(e.message);
            Finding::new(e.file, e.line.unwrap_or(1), message)
                .with_severity(ToolSeverity::canonical(severity))
                .with_classifier(Some(e.kind))
        })
        .collect())
}
