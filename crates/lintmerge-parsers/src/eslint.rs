//! ESLint `--format=json`.
//!
//! ESLint echoes each file's full `source` when a message is fatal. For
//! binary-ish files that text can hold byte sequences that are not valid JSON
//! strings, so the field is cut out before decoding.

use std::borrow::Cow;
use std::sync::OnceLock;

use lintmerge_domain::{Finding, ToolSeverity};
use lintmerge_types::Severity;
use regex::Regex;
use serde::Deserialize;

use crate::ParseError;
use crate::envelope::{Envelope, decode};

const DEPRECATED_RULES_TOKEN: &str = r#""usedDeprecatedRules":"#;

#[derive(Debug, Deserialize)]
struct FileResult {
    #[serde(rename = "filePath")]
    file_path: String,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(rename = "ruleId", default)]
    rule_id: Option<String>,
    severity: i64,
    message: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
    #[serde(rename = "endLine", default)]
    end_line: Option<u32>,
    #[serde(rename = "endColumn", default)]
    end_column: Option<u32>,
    #[serde(default)]
    fatal: bool,
}

fn source_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)"source":".*?","usedDeprecatedRules":"#).expect("valid source regex")
    })
}

/// Replaces every `"source":"…","usedDeprecatedRules":` run with the trailing token alone.
pub fn excise_source_fields(raw: &str) -> Cow<'_, str> {
    source_field().replace_all(raw, DEPRECATED_RULES_TOKEN)
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let cleaned = excise_source_fields(raw);
    let files: Vec<FileResult> = decode(&cleaned, Envelope::Array)?;

    let mut out = Vec::new();
    for file in files {
        for m in file.messages {
            let severity = if m.fatal {
                ToolSeverity::canonical(Severity::Critical)
            } else {
                ToolSeverity::Ordinal(m.severity)
            };
            out.push(
                Finding::new(file.file_path.clone(), m.line.unwrap_or(1), m.message)
                    .with_severity(severity)
                    .with_classifier(m.rule_id)
                    .with_columns(m.column, m.end_column)
                    .with_end_line(m.end_line),
            );
        }
    }
    Ok(out)
}
