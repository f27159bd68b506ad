//! Data types (issues + config) for lintmerge.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Frozen Vocabulary ──────────────────────────────────────────
pub const ISSUE_TYPE: &str = "issue";

// Exit codes. Stage failures use `Tool::failure_exit_code`.
pub const EXIT_OK: i32 = 0;
pub const EXIT_INTERNAL_ERROR: i32 = 1;
pub const EXIT_CRITICAL_ISSUES: i32 = 2;
pub const EXIT_STRICT_ISSUES: i32 = 3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Minor,
        Severity::Major,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }

    /// Parses a canonical level name. Tool-native aliases are handled by the normalizer.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sev| sev.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    Clarity,
    Style,
}

impl Category {
    /// Every issue carries the same category set.
    pub const DEFAULT_SET: [Category; 2] = [Category::Clarity, Category::Style];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Begin {
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct End {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Positions {
    pub begin: Begin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<End>,
}

impl Positions {
    pub fn new(
        line: u32,
        column: Option<u32>,
        end_line: Option<u32>,
        end_column: Option<u32>,
    ) -> Self {
        let end = if end_line.is_some() || end_column.is_some() {
            Some(End {
                line: end_line,
                column: end_column,
            })
        } else {
            None
        };
        Self {
            begin: Begin { line, column },
            end,
        }
    }

    pub fn end_line(&self) -> Option<u32> {
        self.end.as_ref().and_then(|e| e.line)
    }

    pub fn end_column(&self) -> Option<u32> {
        self.end.as_ref().and_then(|e| e.column)
    }

    /// `line:column:end_line:end_column`, with an empty segment for each unknown part.
    pub fn position_string(&self) -> String {
        fn seg(v: Option<u32>) -> String {
            v.map(|n| n.to_string()).unwrap_or_default()
        }
        format!(
            "{}:{}:{}:{}",
            self.begin.line,
            seg(self.begin.column),
            seg(self.end_line()),
            seg(self.end_column())
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    /// Path relative to the working directory of the stage that reported it.
    pub path: String,
    /// Path exactly as the tool reported it.
    pub full_path: String,
    pub positions: Positions,
}

/// One normalized issue in the Code Climate issue format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: String,
    pub check_name: String,
    pub description: String,
    pub categories: Vec<Category>,
    pub severity: Severity,
    pub location: Location,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Php,
    Js,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Php => "php",
            Family::Js => "js",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    TypeCheck,
    Style,
    Syntax,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::TypeCheck => "type-check",
            StageKind::Style => "style",
            StageKind::Syntax => "syntax",
        }
    }
}

/// The closed set of supported tools, declared in pipeline order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Phpstan,
    Psalm,
    PhpCsFixer,
    Phpcs,
    Stylelint,
    ParallelLint,
    Eslint,
    Biome,
}

impl Tool {
    /// Pipeline order: type checkers, then style/format linters, then syntax linters.
    pub const ALL: [Tool; 8] = [
        Tool::Phpstan,
        Tool::Psalm,
        Tool::PhpCsFixer,
        Tool::Phpcs,
        Tool::Stylelint,
        Tool::ParallelLint,
        Tool::Eslint,
        Tool::Biome,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Phpstan => "phpstan",
            Tool::Psalm => "psalm",
            Tool::PhpCsFixer => "php-cs-fixer",
            Tool::Phpcs => "phpcs",
            Tool::Stylelint => "stylelint",
            Tool::ParallelLint => "parallel-lint",
            Tool::Eslint => "eslint",
            Tool::Biome => "biome",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Prefix used in issue descriptions and check names.
    pub fn display_name(self) -> &'static str {
        match self {
            Tool::Phpstan => "PHPStan",
            Tool::Psalm => "Psalm",
            Tool::PhpCsFixer => "PHP-CS-Fixer",
            Tool::Phpcs => "PHP_CodeSniffer",
            Tool::Stylelint => "Stylelint",
            Tool::ParallelLint => "Parallel Lint",
            Tool::Eslint => "ESLint",
            Tool::Biome => "Biome",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Tool::Phpstan
            | Tool::Psalm
            | Tool::PhpCsFixer
            | Tool::Phpcs
            | Tool::ParallelLint => Family::Php,
            Tool::Stylelint | Tool::Eslint | Tool::Biome => Family::Js,
        }
    }

    pub fn kind(self) -> StageKind {
        match self {
            Tool::Phpstan | Tool::Psalm => StageKind::TypeCheck,
            Tool::PhpCsFixer | Tool::Phpcs | Tool::Stylelint => StageKind::Style,
            Tool::ParallelLint | Tool::Eslint | Tool::Biome => StageKind::Syntax,
        }
    }

    /// Binary location relative to the family root.
    pub fn binary_path(self) -> &'static str {
        match self {
            Tool::Phpstan => "vendor/bin/phpstan",
            Tool::Psalm => "vendor/bin/psalm",
            Tool::PhpCsFixer => "vendor/bin/php-cs-fixer",
            Tool::Phpcs => "vendor/bin/phpcs",
            Tool::ParallelLint => "vendor/bin/parallel-lint",
            Tool::Stylelint => "node_modules/.bin/stylelint",
            Tool::Eslint => "node_modules/.bin/eslint",
            Tool::Biome => "node_modules/.bin/biome",
        }
    }

    pub fn failure_exit_code(self) -> i32 {
        match self {
            Tool::Phpstan => 10,
            Tool::Psalm => 11,
            Tool::PhpCsFixer => 12,
            Tool::Phpcs => 13,
            Tool::Stylelint => 14,
            Tool::ParallelLint => 15,
            Tool::Eslint => 16,
            Tool::Biome => 17,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LastPolicy {
    Never,
    Always,
    /// Only for issue types seen exactly once.
    #[default]
    Single,
}

impl LastPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            LastPolicy::Never => "never",
            LastPolicy::Always => "always",
            LastPolicy::Single => "single",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BiomeReporter {
    #[default]
    Github,
    Json,
}

impl BiomeReporter {
    pub fn as_str(self) -> &'static str {
        match self {
            BiomeReporter::Github => "github",
            BiomeReporter::Json => "json",
        }
    }
}

/// The on-disk configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    /// Include other config files. Paths are relative to this config file's directory.
    /// Later files override earlier ones field by field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub php_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_root: Option<String>,
    /// JS runtime preference order (names on PATH or explicit paths).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtimes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<LastPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biome_reporter: Option<BiomeReporter>,
}

impl Defaults {
    /// Field-wise merge; values set in `other` win.
    pub fn merged(self, other: Defaults) -> Defaults {
        Defaults {
            php_root: other.php_root.or(self.php_root),
            js_root: other.js_root.or(self.js_root),
            runtimes: other.runtimes.or(self.runtimes),
            stats: other.stats.or(self.stats),
            last: other.last.or(self.last),
            silent: other.silent.or(self.silent),
            strict: other.strict.or(self.strict),
            cache: other.cache.or(self.cache),
            exclude_paths: other.exclude_paths.or(self.exclude_paths),
            biome_reporter: other.biome_reporter.or(self.biome_reporter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ToolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Tool config file, relative to the tool's family root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    /// Extra arguments appended to the invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl ToolConfig {
    pub fn merged(self, other: ToolConfig) -> ToolConfig {
        ToolConfig {
            enabled: other.enabled.or(self.enabled),
            config: other.config.or(self.config),
            args: other.args.or(self.args),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ToolsConfig {
    #[serde(default, skip_serializing_if = "is_default")]
    pub phpstan: ToolConfig,
    #[serde(default, skip_serializing_if = "is_default")]
    pub psalm: ToolConfig,
    #[serde(default, rename = "php-cs-fixer", skip_serializing_if = "is_default")]
    pub php_cs_fixer: ToolConfig,
    #[serde(default, skip_serializing_if = "is_default")]
    pub phpcs: ToolConfig,
    #[serde(default, skip_serializing_if = "is_default")]
    pub stylelint: ToolConfig,
    #[serde(default, rename = "parallel-lint", skip_serializing_if = "is_default")]
    pub parallel_lint: ToolConfig,
    #[serde(default, skip_serializing_if = "is_default")]
    pub eslint: ToolConfig,
    #[serde(default, skip_serializing_if = "is_default")]
    pub biome: ToolConfig,
}

fn is_default(t: &ToolConfig) -> bool {
    *t == ToolConfig::default()
}

impl ToolsConfig {
    pub fn get(&self, tool: Tool) -> &ToolConfig {
        match tool {
            Tool::Phpstan => &self.phpstan,
            Tool::Psalm => &self.psalm,
            Tool::PhpCsFixer => &self.php_cs_fixer,
            Tool::Phpcs => &self.phpcs,
            Tool::Stylelint => &self.stylelint,
            Tool::ParallelLint => &self.parallel_lint,
            Tool::Eslint => &self.eslint,
            Tool::Biome => &self.biome,
        }
    }

    pub fn get_mut(&mut self, tool: Tool) -> &mut ToolConfig {
        match tool {
            Tool::Phpstan => &mut self.phpstan,
            Tool::Psalm => &mut self.psalm,
            Tool::PhpCsFixer => &mut self.php_cs_fixer,
            Tool::Phpcs => &mut self.phpcs,
            Tool::Stylelint => &mut self.stylelint,
            Tool::ParallelLint => &mut self.parallel_lint,
            Tool::Eslint => &mut self.eslint,
            Tool::Biome => &mut self.biome,
        }
    }

    pub fn merged(mut self, other: ToolsConfig) -> ToolsConfig {
        for tool in Tool::ALL {
            let theirs = other.get(tool).clone();
            let slot = self.get_mut(tool);
            *slot = std::mem::take(slot).merged(theirs);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_string_leaves_empty_segments() {
        assert_eq!(Positions::new(12, Some(5), None, None).position_string(), "12:5::");
        assert_eq!(Positions::new(3, None, None, None).position_string(), "3:::");
        assert_eq!(
            Positions::new(3, Some(1), Some(4), Some(9)).position_string(),
            "3:1:4:9"
        );
    }

    #[test]
    fn positions_omit_unknown_end() {
        let p = Positions::new(7, None, None, None);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({ "begin": { "line": 7 } }));
    }

    #[test]
    fn issue_serializes_type_field() {
        let issue = Issue {
            kind: ISSUE_TYPE.to_string(),
            check_name: "ESLint: no-console".to_string(),
            description: "ESLint: Unexpected console statement.".to_string(),
            categories: Category::DEFAULT_SET.to_vec(),
            severity: Severity::Minor,
            location: Location {
                path: "src/a.js".to_string(),
                full_path: "/repo/src/a.js".to_string(),
                positions: Positions::new(4, Some(1), Some(4), Some(12)),
            },
            fingerprint: "abc".to_string(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "issue");
        assert_eq!(json["categories"], serde_json::json!(["Clarity", "Style"]));
        assert_eq!(json["severity"], "minor");
        assert_eq!(json["location"]["positions"]["end"]["column"], 12);
    }

    #[test]
    fn severity_orders_by_weight() {
        assert!(Severity::Info < Severity::Minor);
        assert!(Severity::Major < Severity::Critical);
        assert_eq!(Severity::from_canonical("critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_canonical("warning"), None);
    }

    #[test]
    fn tool_ids_round_trip_and_codes_are_distinct() {
        let mut codes = std::collections::BTreeSet::new();
        for tool in Tool::ALL {
            assert_eq!(Tool::parse(tool.as_str()), Some(tool));
            assert!(codes.insert(tool.failure_exit_code()));
        }
        assert!(!codes.contains(&EXIT_CRITICAL_ISSUES));
        assert!(!codes.contains(&EXIT_STRICT_ISSUES));
    }

    #[test]
    fn tools_config_reads_dashed_keys() {
        let cfg: ConfigFile = toml::from_str(
            r#"
[defaults]
strict = true
last = "always"

[tools.php-cs-fixer]
enabled = false

[tools.parallel-lint]
config = "lint.json"
"#,
        )
        .unwrap();
        assert_eq!(cfg.defaults.strict, Some(true));
        assert_eq!(cfg.defaults.last, Some(LastPolicy::Always));
        assert_eq!(cfg.tools.get(Tool::PhpCsFixer).enabled, Some(false));
        assert_eq!(
            cfg.tools.get(Tool::ParallelLint).config.as_deref(),
            Some("lint.json")
        );
    }

    #[test]
    fn merges_prefer_later_values() {
        let base = Defaults {
            php_root: Some("php".to_string()),
            strict: Some(false),
            ..Default::default()
        };
        let over = Defaults {
            strict: Some(true),
            ..Default::default()
        };
        let merged = base.merged(over);
        assert_eq!(merged.php_root.as_deref(), Some("php"));
        assert_eq!(merged.strict, Some(true));

        let mut a = ToolsConfig::default();
        a.eslint.config = Some("a.json".to_string());
        let mut b = ToolsConfig::default();
        b.eslint.enabled = Some(false);
        let merged = a.merged(b);
        assert_eq!(merged.eslint.config.as_deref(), Some("a.json"));
        assert_eq!(merged.eslint.enabled, Some(false));
    }
}
