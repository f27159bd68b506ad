//! Tool output parsing.
//!
//! Each supported tool has one parser variant. A parser turns the raw text a
//! tool printed into [`Finding`]s, or rejects the output as malformed so the
//! pipeline can fail the stage with the raw text attached.

mod annotation;
mod biome;
mod envelope;
mod eslint;
mod parallel_lint;
mod php_cs_fixer;
mod phpcs;
mod phpstan;
mod psalm;
mod stylelint;

use std::path::Path;

use lintmerge_domain::{Finding, ToolSeverity};
use lintmerge_types::{BiomeReporter, Severity, Tool};

pub use annotation::{Annotation, parse_annotation_line, unescape_data, unescape_property};
pub use envelope::skip_banner;
pub use eslint::excise_source_fields;
pub use php_cs_fixer::{DIFF_CONTEXT_OFFSET, estimate_line};

/// Subtype name that always escalates a finding to `critical`.
pub const PARSE_ERROR_SUBTYPE: &str = "ParseError";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unexpected output shape: {0}")]
    UnexpectedShape(String),

    #[error("tool exited with status {0} but printed no annotations")]
    NoAnnotations(i32),
}

/// Facts about the tool run that some parsers need besides the raw text.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Directory the tool ran in; relative paths in its output resolve against it.
    pub working_dir: &'a Path,
    pub exit_code: Option<i32>,
}

/// The closed set of output formats, selected by tool identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolParser {
    Phpstan,
    Psalm,
    PhpCsFixer,
    Phpcs,
    Stylelint,
    ParallelLint,
    Eslint,
    BiomeAnnotations,
    BiomeJson,
}

impl ToolParser {
    pub fn for_tool(tool: Tool, biome_reporter: BiomeReporter) -> Self {
        match tool {
            Tool::Phpstan => ToolParser::Phpstan,
            Tool::Psalm => ToolParser::Psalm,
            Tool::PhpCsFixer => ToolParser::PhpCsFixer,
            Tool::Phpcs => ToolParser::Phpcs,
            Tool::Stylelint => ToolParser::Stylelint,
            Tool::ParallelLint => ToolParser::ParallelLint,
            Tool::Eslint => ToolParser::Eslint,
            Tool::Biome => match biome_reporter {
                BiomeReporter::Github => ToolParser::BiomeAnnotations,
                BiomeReporter::Json => ToolParser::BiomeJson,
            },
        }
    }

    pub fn parse(self, raw: &str, ctx: &ParseContext<'_>) -> Result<Vec<Finding>, ParseError> {
        match self {
            ToolParser::Phpstan => phpstan::parse(raw),
            ToolParser::Psalm => psalm::parse(raw),
            ToolParser::PhpCsFixer => php_cs_fixer::parse(raw),
            ToolParser::Phpcs => phpcs::parse(raw),
            ToolParser::Stylelint => stylelint::parse(raw),
            ToolParser::ParallelLint => parallel_lint::parse(raw),
            ToolParser::Eslint => eslint::parse(raw),
            ToolParser::BiomeAnnotations => biome::parse_annotations(raw, ctx),
            ToolParser::BiomeJson => biome::parse_json(raw, ctx),
        }
    }
}

/// Escalates `ParseError` subtypes to `critical`, regardless of the tool's own severity.
pub(crate) fn escalate_parse_error(subtype: Option<&str>, severity: ToolSeverity) -> ToolSeverity {
    if subtype == Some(PARSE_ERROR_SUBTYPE) {
        ToolSeverity::canonical(Severity::Critical)
    } else {
        severity
    }
}
