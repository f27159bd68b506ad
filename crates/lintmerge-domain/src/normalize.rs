use std::path::Path;

use lintmerge_types::{Category, ISSUE_TYPE, Issue, Location, Positions, Tool};

use crate::fingerprint::compute_fingerprint;
use crate::severity::{ToolSeverity, map_severity};

/// A single tool-reported problem, after parsing and before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Path as reported by the tool (absolute or relative).
    pub path: String,
    pub line: u32,
    pub column: Option<u32>,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
    pub message: String,
    pub severity: ToolSeverity,
    /// Rule or subtype identifier, when the tool reports one.
    pub classifier: Option<String>,
}

impl Finding {
    pub fn new(path: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            column: None,
            end_line: None,
            end_column: None,
            message: message.into(),
            severity: ToolSeverity::Label(String::new()),
            classifier: None,
        }
    }

    pub fn with_severity(mut self, severity: ToolSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = classifier.filter(|c| !c.is_empty());
        self
    }

    pub fn with_columns(mut self, column: Option<u32>, end_column: Option<u32>) -> Self {
        self.column = column;
        self.end_column = end_column;
        self
    }

    pub fn with_end_line(mut self, end_line: Option<u32>) -> Self {
        self.end_line = end_line;
        self
    }
}

/// Strips `working_dir` plus one separator from the front of `path`.
///
/// Paths outside the working directory (including siblings that merely share
/// a name prefix) are returned unchanged.
pub fn relativize<'a>(path: &'a str, working_dir: &Path) -> &'a str {
    let raw = working_dir.to_string_lossy();
    let wd = raw.trim_end_matches(['/', '\\']);
    if raw.is_empty() {
        return path;
    }
    if wd.is_empty() {
        // Filesystem root: every absolute path is inside it.
        return path.strip_prefix(['/', '\\']).unwrap_or(path);
    }

    match path.strip_prefix(wd) {
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => &rest[1..],
        _ => path,
    }
}

/// Builds the canonical issue for a finding reported by `tool` in `working_dir`.
pub fn normalize(tool: Tool, working_dir: &Path, finding: Finding) -> Issue {
    let display = tool.display_name();
    let description = format!("{display}: {}", finding.message.trim());
    let check_name = match &finding.classifier {
        Some(c) => format!("{display}: {c}"),
        None => description.clone(),
    };

    let path = relativize(&finding.path, working_dir).to_string();
    let positions = Positions::new(
        finding.line.max(1),
        finding.column,
        finding.end_line,
        finding.end_column,
    );
    let fingerprint = compute_fingerprint(&path, &positions.position_string(), &description);

    Issue {
        kind: ISSUE_TYPE.to_string(),
        check_name,
        description,
        categories: Category::DEFAULT_SET.to_vec(),
        severity: map_severity(&finding.severity),
        location: Location {
            path,
            full_path: finding.path,
            positions,
        },
        fingerprint,
    }
}
