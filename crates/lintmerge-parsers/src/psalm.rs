//! Psalm `--output-format=json`: a flat array of issues.

use lintmerge_domain::{Finding, ToolSeverity};
use serde::Deserialize;

use crate::envelope::{Envelope, decode};
use crate::{ParseError, escalate_parse_error};

#[derive(Debug, Deserialize)]
struct Entry {
    severity: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    message: String,
    file_path: String,
    line_from: u32,
    #[serde(default)]
    line_to: Option<u32>,
    #[serde(default)]
    column_from: Option<u32>,
    #[serde(default)]
    column_to: Option<u32>,
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let entries: Vec<Entry> = decode(raw, Envelope::Array)?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let severity =
                escalate_parse_error(e.kind.as_deref(), ToolSeverity::Label(e.severity));
            Finding::new(e.file_path, e.line_from, e.message)
                .with_severity(severity)
                .with_classifier(e.kind)
                .with_columns(e.column_from, e.column_to)
                .with_end_line(e.line_to)
        })
        .collect())
}
