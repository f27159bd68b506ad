//! PHPStan `--error-format=json`.
//!
//! ```json
//! {"totals": {...}, "files": {"/abs/a.php": {"errors": 1, "messages": [
//!   {"message": "...", "line": 12, "ignorable": true, "identifier": "variable.undefined"}
//! ]}}, "errors": []}
//! ```

use lintmerge_domain::{Finding, ToolSeverity};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::envelope::{Envelope, decode, from_value, keyed_entries};
use crate::{ParseError, escalate_parse_error};

#[derive(Debug, Deserialize)]
struct Report {
    files: Value,
    /// File-less errors (bad config, autoload failures).
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    identifier: Option<String>,
}

pub(crate) fn parse(raw: &str) -> Result<Vec<Finding>, ParseError> {
    let report: Report = decode(raw, Envelope::Object)?;

    for general in &report.errors {
        warn!("PHPStan reported an error without a file: {general}");
    }

    let mut out = Vec::new();
    for (path, entry) in keyed_entries(report.files, "files")? {
        let Some(path) = path else {
            return Err(ParseError::UnexpectedShape(
                "`files` entries must be keyed by path".to_string(),
            ));
        };
        let entry: FileEntry = from_value(entry)?;
        for m in entry.messages {
            let severity =
                escalate_parse_error(m.identifier.as_deref(), ToolSeverity::label("error"));
            out.push(
                Finding::new(path.clone(), m.line.unwrap_or(1), m.message)
                    .with_severity(severity)
                    .with_classifier(m.identifier),
            );
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use lintmerge_domain::map_severity;
    use lintmerge_types::Severity;

    use super::*;

    const SAMPLE: &str = r#"{
    "totals": {"errors": 0, "file_errors": 3},
    "files": {
        "/repo/src/b.php": {"errors": 2, "messages": [
            {"message": "Undefined variable: $foo", "line": 12, "ignorable": true, "identifier": "variable.undefined"},
            {"message": "Syntax error, unexpected EOF", "line": 40, "ignorable": false, "identifier": "ParseError"}
        ]},
        "/repo/src/a.php": {"errors": 1, "messages": [
            {"message": "Method Foo::bar() has no return type specified.", "line": 7, "ignorable": true}
        ]}
    },
    "errors": []
}"#;

    #[test]
    fn parses_files_in_reported_order() {
        let findings = parse(SAMPLE).unwrap();
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].path, "/repo/src/b.php");
        assert_eq!(findings[0].line, 12);
        assert_eq!(findings[0].classifier.as_deref(), Some("variable.undefined"));
        assert_eq!(map_severity(&findings[0].severity), Severity::Major);
        assert_eq!(findings[2].path, "/repo/src/a.php");
        assert_eq!(findings[2].classifier, None);
    }

    #[test]
    fn parse_error_identifier_is_critical() {
        let findings = parse(SAMPLE).unwrap();
        assert_eq!(map_severity(&findings[1].severity), Severity::Critical);
    }

    #[test]
    fn empty_files_list_is_accepted() {
        let findings =
            parse(r#"{"totals":{"errors":0,"file_errors":0},"files":[],"errors":[]}"#).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn general_errors_do_not_become_findings() {
        let findings =
            parse(r#"{"files":[],"errors":["Ignored error pattern was not matched"]}"#).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn rejects_array_envelope() {
        assert!(matches!(parse("[]"), Err(ParseError::UnexpectedShape(_))));
    }

    #[test]
    fn rejects_missing_files_key() {
        assert!(matches!(
            parse(r#"{"totals":{}}"#),
            Err(ParseError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn rejects_unkeyed_file_entries() {
        assert!(parse(r#"{"files":[{"messages":[]}]}"#).is_err());
    }
}
