//! Sample tool reports and throwaway project layouts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lintmerge_core::{Overrides, Settings};
use lintmerge_types::{ConfigFile, Defaults, Tool};
use tempfile::TempDir;

// =============================================================================
// Sample Outputs
// =============================================================================

/// Realistic report text per tool, as the pipeline would capture it.
pub mod sample_outputs {
    /// PHPStan: one `error` (major) in `src/Foo.php`, reported with an absolute path
    /// under `/work`.
    pub const PHPSTAN_ONE_MAJOR: &str = r#"{"totals":{"errors":0,"file_errors":1},"files":{"/work/src/Foo.php":{"errors":1,"messages":[{"message":"Undefined variable: $bar","line":12,"ignorable":true,"identifier":"variable.undefined"}]}},"errors":[]}"#;

    /// PHPStan: nothing found; PHP encodes the empty map as a list.
    pub const PHPSTAN_CLEAN: &str =
        r#"{"totals":{"errors":0,"file_errors":0},"files":[],"errors":[]}"#;

    /// Psalm: one `ParseError` (critical).
    pub const PSALM_ONE_CRITICAL: &str = r#"[{"severity":"error","line_from":3,"line_to":3,"type":"ParseError","message":"Syntax error, unexpected ';'","file_name":"src/Bar.php","file_path":"/work/src/Bar.php","snippet":"$x = ;","from":40,"to":41,"column_from":6,"column_to":7}]"#;

    /// Psalm: one `info` issue.
    pub const PSALM_ONE_INFO: &str = r#"[{"severity":"info","line_from":8,"line_to":8,"type":"MissingReturnType","message":"Method Bar::baz does not have a return type","file_name":"src/Bar.php","file_path":"/work/src/Bar.php","column_from":21,"column_to":24}]"#;

    /// PHP-CS-Fixer: two fixers would change one file.
    pub const PHP_CS_FIXER_TWO_MINOR: &str = r#"{"files":[{"name":"src/Foo.php","appliedFixers":["braces","single_quote"],"diff":"--- src/Foo.php\n+++ src/Foo.php\n@@ -10,5 +10,6 @@\n"}],"time":{"total":0.2},"memory":14}"#;

    /// PHP-CS-Fixer: the same report shape with `files` keyed by path.
    pub const PHP_CS_FIXER_KEYED_ONE_MINOR: &str = r#"{"files":{"src/Baz.php":{"appliedFixers":["no_trailing_whitespace"],"diff":"--- src/Baz.php\n+++ src/Baz.php\n@@ -30,7 +30,7 @@\n"}},"time":{"total":0.1},"memory":12}"#;

    /// PHP_CodeSniffer: one warning (minor).
    pub const PHPCS_ONE_MINOR: &str = r#"{"totals":{"errors":0,"warnings":1,"fixable":0},"files":{"/work/src/Foo.php":{"errors":0,"warnings":1,"messages":[{"message":"Line exceeds 120 characters; contains 131 characters","source":"Generic.Files.LineLength.TooLong","severity":5,"fixable":false,"type":"WARNING","line":44,"column":121}]}}}"#;

    /// Stylelint with a deprecation banner ahead of the payload.
    pub const STYLELINT_WITH_BANNER: &str = "(node:4242) DeprecationWarning: stylelint.lint is deprecated\n[{\"source\":\"/work/web/app.css\",\"errored\":true,\"warnings\":[{\"line\":7,\"column\":3,\"rule\":\"color-no-invalid-hex\",\"severity\":\"error\",\"text\":\"Unexpected invalid hex color \\\"#12\\\" (color-no-invalid-hex)\"}]}]\n";

    /// Parallel Lint: one syntax error (critical).
    pub const PARALLEL_LINT_ONE_CRITICAL: &str = r#"{"results":{"checkedFiles":4,"filesWithSyntaxError":1,"skippedFiles":[],"errors":[{"type":"syntaxError","file":"/work/src/Broken.php","line":5,"message":"Parse error: unexpected end of file in /work/src/Broken.php on line 5","normalizeMessage":"Unexpected end of file"}]}}"#;

    /// ESLint: one warning (minor) whose file echoed unusable `source` text.
    pub const ESLINT_ONE_MINOR: &str = "[{\"filePath\":\"/work/web/app.js\",\"messages\":[{\"ruleId\":\"no-console\",\"severity\":1,\"message\":\"Unexpected console statement.\",\"line\":4,\"column\":1,\"endLine\":4,\"endColumn\":12}],\"errorCount\":0,\"warningCount\":1,\"source\":\"\u{1}\\q broken \\\" text\",\"usedDeprecatedRules\":[]}]";

    /// Biome annotations: one error (major), plus the summary footer.
    pub const BIOME_ONE_MAJOR: &str = "::error title=lint/suspicious/noDebugger,file=web/app.js,line=9,endLine=9,col=1,endColumn=10::This is an unexpected use of the debugger statement.\nChecked 3 files in 2ms. No fixes applied.\nFound 1 error.\n";

    /// Output that is not a report at all.
    pub const NOT_JSON: &str = "PHP Fatal error:  Allowed memory size of 134217728 bytes exhausted";
}

// =============================================================================
// Project Layouts
// =============================================================================

/// A temporary project with fake tool binaries installed where the pipeline
/// looks for them. The binaries are empty files; pair with a scripted runner.
#[derive(Debug)]
pub struct ProjectLayout {
    dir: TempDir,
    runtime: PathBuf,
}

impl ProjectLayout {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create temp project")?;
        let runtime = dir.path().join("fake-node");
        std::fs::write(&runtime, "").context("write fake runtime")?;
        Ok(Self { dir, runtime })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Installs an empty binary for each tool under the project root.
    pub fn install(self, tools: &[Tool]) -> Result<Self> {
        for tool in tools {
            let path = self.dir.path().join(tool.binary_path());
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::write(&path, "").with_context(|| format!("write {}", path.display()))?;
        }
        Ok(self)
    }

    /// Settings rooted at this project, with the fake runtime first in line.
    pub fn settings(&self, overrides: &Overrides) -> Result<Settings> {
        let config = ConfigFile {
            defaults: Defaults {
                runtimes: Some(vec![self.runtime.display().to_string()]),
                ..Default::default()
            },
            ..Default::default()
        };
        Ok(Settings::resolve(&config, overrides, self.dir.path())?)
    }
}
