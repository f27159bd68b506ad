//! Stylelint `--formatter=json`.
//!
//! Some Stylelint versions print deprecation notices before the payload, so
//! everything before the first line opening the array is dropped.

use lintmerge_domain::{Finding, ToolSeverity};
use lintmerge_types::Severity;
use serde::Deserialize;

use crate::ParseError;
use crate::envelope::{Envelope, decode, skip_banner};

const SYNTAX_ERROR_RULE: &str = "CssSyntaxError";

#[derive(Debug, Deserialize)]
struct FileResult {
    source: String,
    #[serde(default)]
    warnings: Vec<Warning>,
}

#[derive(Debug, Deserialize)]
struct Warning {
    line: u32,
    #[serde(default)]
    column: Option<u32>,
    #[serde(rename = "endLine", default)]
    end_line: Option<u32>,
    #[serde(rename = "endColumn", default)]
    end_column: Option<u32>,
    rule: String,
    severity: String,
    text: String,
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let payload = skip_banner(raw, '[').ok_or_else(|| {
        ParseError::UnexpectedShape("no line starts a JSON array".to_string())
    })?;
    let files: Vec<FileResult> = decode(payload, Envelope::Array)?;

    let mut out = Vec::new();
    for file in files {
        for w in file.warnings {
            let severity = if w.rule == SYNTAX_ERROR_RULE {
                ToolSeverity::canonical(Severity::Critical)
            } else {
                ToolSeverity::Label(w.severity)
            };
            let message = strip_rule_suffix(&w.text, &w.rule).to_string();
            out.push(
                Finding::new(file.source.clone(), w.line, message)
                    .with_severity(severity)
                    .with_classifier(Some(w.rule))
                    .with_columns(w.column, w.end_column)
                    .with_end_line(w.end_line),
            );
        }
    }
    Ok(out)
}

/// Stylelint appends ` (rule-name)` to every message text.
fn strip_rule_suffix<'a>(text: &'a str, rule: &str) -> &'a str {
    text.strip_suffix(')')
        .and_then(|t| t.strip_suffix(rule))
        .and_then(|t| t.strip_suffix(" ("))
        .unwrap_or(text)
}
