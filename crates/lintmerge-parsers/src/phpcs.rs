//! PHP_CodeSniffer `--report=json`: an object keyed by file path.

use lintmerge_domain::{Finding, ToolSeverity};
use serde::Deserialize;
use serde_json::Value;

use crate::envelope::{Envelope, decode, from_value, keyed_entries};
use crate::{ParseError, escalate_parse_error};

#[derive(Debug, Deserialize)]
struct Report {
    files: Value,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
    /// Sniff code, e.g. `Generic.Files.LineLength.TooLong`.
    #[serde(default)]
    source: Option<String>,
    /// `ERROR` or `WARNING`. The numeric `severity` field is a sniff weight, not a level.
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let report: Report = decode(raw, Envelope::Object)?;

    let mut out = Vec::new();
    for (path, entry) in keyed_entries(report.files, "files")? {
        let path = path.ok_or_else(|| {
            ParseError::UnexpectedShape("`files` entries must be keyed by path".to_string())
        })?;
        let entry: FileEntry = from_value(entry)?;
        for m in entry.messages {
            // Files phpcs cannot tokenize are reported with an `Internal.*` source.
            let subtype = match m.source.as_deref() {
                Some(s) if s.starts_with("Internal.Tokenizer") => Some(crate::PARSE_ERROR_SUBTYPE),
                other => other,
            };
            let severity = escalate_parse_error(subtype, ToolSeverity::Label(m.kind));
            out.push(
                Finding::new(path.clone(), m.line.unwrap_or(1), m.message)
                    .with_severity(severity)
                    .with_classifier(m.source)
                    .with_columns(m.column, None),
            );
        }
    }
    Ok(out)
}
