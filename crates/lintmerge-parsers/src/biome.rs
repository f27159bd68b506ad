//! Biome `lint`, either as CI annotations (`--reporter=github`) or as JSON
//! diagnostics carrying byte-offset spans (`--reporter=json`).

use std::collections::HashMap;
use std::path::Path;

use lintmerge_domain::{Finding, ToolSeverity, resolve_lines};
use lintmerge_types::Severity;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::annotation::parse_annotation_line;
use crate::envelope::{Envelope, decode, skip_banner};
use crate::{ParseContext, ParseError};

pub(crate) fn parse_annotations(
    raw: &str,
    ctx: &ParseContext<'_>,
) -> Result<Vec<Finding>, ParseError> {
    let findings: Vec<Finding> = raw
        .lines()
        .filter_map(parse_annotation_line)
        .map(|a| {
            Finding::new(a.file, a.line, a.message)
                .with_severity(ToolSeverity::Label(a.severity))
                .with_classifier(Some(a.title))
                .with_columns(Some(a.col), Some(a.end_column))
                .with_end_line(Some(a.end_line))
        })
        .collect();

    // A failing exit with nothing recognisable means Biome itself broke
    // (bad config, crash), not that the code is clean.
    match ctx.exit_code {
        Some(code) if code != 0 && findings.is_empty() => Err(ParseError::NoAnnotations(code)),
        _ => Ok(findings),
    }
}

#[derive(Debug, Deserialize)]
struct Report {
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Deserialize)]
struct Diagnostic {
    #[serde(default)]
    category: Option<String>,
    severity: String,
    description: String,
    #[serde(default)]
    location: DiagnosticLocation,
}

#[derive(Debug, Default, Deserialize)]
struct DiagnosticLocation {
    #[serde(default)]
    path: Option<DiagnosticPath>,
    #[serde(default)]
    span: Option<[usize; 2]>,
    #[serde(rename = "sourceCode", default)]
    source_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DiagnosticPath {
    File { file: String },
    Plain(String),
}

impl DiagnosticPath {
    fn into_string(self) -> String {
        match self {
            DiagnosticPath::File { file } | DiagnosticPath::Plain(file) => file,
        }
    }
}

fn biome_severity(label: String) -> ToolSeverity {
    match label.as_str() {
        "fatal" => ToolSeverity::canonical(Severity::Critical),
        "information" | "hint" => ToolSeverity::canonical(Severity::Info),
        _ => ToolSeverity::Label(label),
    }
}

pub(crate) fn parse_json(raw: &str, ctx: &ParseContext<'_>) -> Result<Vec<Finding>, ParseError> {
    let payload = skip_banner(raw, '{').ok_or_else(|| {
        ParseError::UnexpectedShape("no line starts a JSON object".to_string())
    })?;
    let report: Report = decode(payload, Envelope::Object)?;

    let mut sources = SourceCache::new(ctx.working_dir);
    let mut out = Vec::new();
    for d in report.diagnostics {
        let path = d.location.path.map(DiagnosticPath::into_string);
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            debug!(
                "dropping Biome diagnostic without a file: {}",
                d.category.as_deref().unwrap_or("unknown")
            );
            continue;
        };

        let (start, end) = match d.location.span {
            Some([s, e]) => (Some(s), Some(e)),
            None => (None, None),
        };
        let span = match (&d.location.source_code, start) {
            (Some(text), _) => resolve_lines(text, start, end),
            (None, Some(_)) => resolve_lines(sources.get(&path), start, end),
            (None, None) => resolve_lines("", None, None),
        };

        out.push(
            Finding::new(path, span.start_line, d.description)
                .with_severity(biome_severity(d.severity))
                .with_classifier(d.category)
                .with_end_line(span.end_line),
        );
    }
    Ok(out)
}

/// Source text of reported files, read once per file from the working directory.
struct SourceCache<'a> {
    root: &'a Path,
    files: HashMap<String, String>,
}

impl<'a> SourceCache<'a> {
    fn new(root: &'a Path) -> Self {
        Self {
            root,
            files: HashMap::new(),
        }
    }

    /// Unreadable files resolve as empty text.
    fn get(&mut self, path: &str) -> &str {
        let root = self.root;
        self.files.entry(path.to_string()).or_insert_with(|| {
            let full = root.join(path);
            std::fs::read_to_string(&full).unwrap_or_else(|e| {
                warn!("cannot read {} to resolve Biome offsets: {e}", full.display());
                String::new()
            })
        })
        .as_str()
    }
}
