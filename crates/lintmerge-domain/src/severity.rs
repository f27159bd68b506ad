use lintmerge_types::Severity;

/// Severity exactly as a tool reported it: either an ordinal or a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSeverity {
    Ordinal(i64),
    Label(String),
}

impl ToolSeverity {
    pub fn label(s: impl Into<String>) -> Self {
        ToolSeverity::Label(s.into())
    }

    pub fn canonical(sev: Severity) -> Self {
        ToolSeverity::Label(sev.as_str().to_string())
    }
}

/// Maps a tool-native severity onto the four canonical levels.
///
/// - `0`, `info`, `notice` → info
/// - `1`, `warning` → minor
/// - `2`, `error` → major
/// - a canonical level name passes through
/// - anything else → major
pub fn map_severity(raw: &ToolSeverity) -> Severity {
    match raw {
        ToolSeverity::Ordinal(0) => Severity::Info,
        ToolSeverity::Ordinal(1) => Severity::Minor,
        ToolSeverity::Ordinal(2) => Severity::Major,
        ToolSeverity::Ordinal(_) => Severity::Major,
        ToolSeverity::Label(label) => {
            let label = label.trim().to_ascii_lowercase();
            match label.as_str() {
                "info" | "notice" => Severity::Info,
                "warning" => Severity::Minor,
                "error" => Severity::Major,
                other => Severity::from_canonical(other).unwrap_or(Severity::Major),
            }
        }
    }
}
