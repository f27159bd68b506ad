//! End-to-end runs against fake tool scripts. The scripts need `sh`.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn lintmerge_cmd() -> Command {
    Command::new(cargo::cargo_bin!("lintmerge"))
}

/// A temporary project whose tools are shell scripts printing canned output.
/// JS tools run through `sh`, which stands in for node.
struct Project {
    _dir: TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp");
        let root = dir.path().canonicalize().expect("canonicalize");
        std::fs::write(
            root.join("lintmerge.toml"),
            "[defaults]\nruntimes = [\"sh\"]\n",
        )
        .expect("write config");
        Self { _dir: dir, root }
    }

    fn root(&self) -> &Path {
        &self.root
    }

    /// Installs a script at `rel` that prints `output` and exits with `code`.
    fn tool(&self, rel: &str, output: &str, code: i32) -> &Self {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        let script =
            format!("#!/bin/sh\ncat <<'LINTMERGE_EOF'\n{output}\nLINTMERGE_EOF\nexit {code}\n");
        std::fs::write(&path, script).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");
        self
    }

    fn cmd(&self) -> Command {
        let mut cmd = lintmerge_cmd();
        cmd.current_dir(&self.root).env_remove("RUST_LOG");
        cmd
    }

    fn phpstan_one_major(&self) -> String {
        format!(
            r#"{{"totals":{{"errors":0,"file_errors":1}},"files":{{"{}/src/Foo.php":{{"errors":1,"messages":[{{"message":"Undefined variable: $bar","line":12,"ignorable":true,"identifier":"variable.undefined"}}]}}}},"errors":[]}}"#,
            self.root.display()
        )
    }

    fn psalm_one_critical(&self) -> String {
        format!(
            r#"[{{"severity":"error","line_from":3,"line_to":3,"type":"ParseError","message":"Syntax error, unexpected ';'","file_name":"src/Bar.php","file_path":"{}/src/Bar.php","column_from":6,"column_to":7}}]"#,
            self.root.display()
        )
    }

    fn phpcs_one_minor(&self) -> String {
        format!(
            r#"{{"totals":{{"errors":0,"warnings":1,"fixable":0}},"files":{{"{}/src/Foo.php":{{"errors":0,"warnings":1,"messages":[{{"message":"Line exceeds 120 characters","source":"Generic.Files.LineLength.TooLong","severity":5,"fixable":false,"type":"WARNING","line":44,"column":121}}]}}}}}}"#,
            self.root.display()
        )
    }

    fn eslint_one_minor(&self) -> String {
        format!(
            r#"[{{"filePath":"{}/web/app.js","messages":[{{"ruleId":"no-console","severity":1,"message":"Unexpected console statement.","line":4,"column":1,"endLine":4,"endColumn":12}}],"errorCount":0,"warningCount":1}}]"#,
            self.root.display()
        )
    }
}

fn stdout_json(output: &std::process::Output) -> Vec<serde_json::Value> {
    let text = String::from_utf8(output.stdout.clone()).expect("utf8");
    let value: serde_json::Value = serde_json::from_str(&text).expect("stdout is JSON");
    value.as_array().expect("array").clone()
}

#[test]
fn project_without_tools_is_clean() {
    let project = Project::new();

    project
        .cmd()
        .assert()
        .code(0)
        .stdout("[]\n")
        .stderr(predicate::str::contains("No issues found."));
}

#[test]
fn major_then_critical_exits_with_critical_code() {
    let project = Project::new();
    project
        .tool("vendor/bin/phpstan", &project.phpstan_one_major(), 1)
        .tool("vendor/bin/psalm", &project.psalm_one_critical(), 2);

    let output = project.cmd().arg("run").output().expect("run");
    assert_eq!(output.status.code(), Some(2));

    let issues = stdout_json(&output);
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0]["check_name"], "PHPStan: variable.undefined");
    assert_eq!(issues[0]["severity"], "major");
    assert_eq!(issues[0]["location"]["path"], "src/Foo.php");
    assert_eq!(issues[1]["check_name"], "Psalm: ParseError");
    assert_eq!(issues[1]["severity"], "critical");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("  1  PHPStan: variable.undefined (src/Foo.php:12)"));
    assert!(stderr.contains("  1  Psalm: ParseError (src/Bar.php:3)"));
    assert!(stderr.contains("2 issue(s): 1 critical, 1 major, 0 minor, 0 info"));
}

#[test]
fn report_is_tab_indented() {
    let project = Project::new();
    project.tool("vendor/bin/psalm", &project.psalm_one_critical(), 2);

    let output = project.cmd().output().expect("run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("[\n\t{\n\t\t\"type\": \"issue\","));
}

#[test]
fn unparseable_output_aborts_with_stage_code() {
    let project = Project::new();
    project
        .tool("vendor/bin/phpstan", "PHP Fatal error:  Allowed memory size exhausted", 255)
        .tool("vendor/bin/psalm", &project.psalm_one_critical(), 2);

    project
        .cmd()
        .assert()
        .code(10)
        .stdout("")
        .stderr(predicate::str::contains(
            "PHP Fatal error:  Allowed memory size exhausted",
        ))
        .stderr(predicate::str::contains("PHPStan output could not be parsed"))
        .stderr(predicate::str::contains("Issue types:").not());
}

#[test]
fn strict_mode_fails_on_minor_issues() {
    let project = Project::new();
    project.tool("vendor/bin/phpcs", &project.phpcs_one_minor(), 1);

    project.cmd().assert().code(0);
    project.cmd().arg("--strict").assert().code(3);
}

#[test]
fn strict_mode_can_come_from_config() {
    let project = Project::new();
    project.tool("vendor/bin/phpcs", &project.phpcs_one_minor(), 1);
    std::fs::write(
        project.root().join("lintmerge.toml"),
        "[defaults]\nruntimes = [\"sh\"]\nstrict = true\n",
    )
    .expect("write config");

    project.cmd().assert().code(3);
}

#[test]
fn silent_and_no_stats_suppress_output() {
    let project = Project::new();
    project.tool("vendor/bin/psalm", &project.psalm_one_critical(), 2);

    project
        .cmd()
        .args(["--silent", "--no-stats"])
        .assert()
        .code(2)
        .stdout("")
        .stderr("");
}

#[test]
fn verbose_prints_progress_lines() {
    let project = Project::new();
    project
        .tool("vendor/bin/phpstan", &project.phpstan_one_major(), 1)
        .tool("vendor/bin/phpcs", &project.phpcs_one_minor(), 1);

    project
        .cmd()
        .arg("-v")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Running PHPStan...\nRunning PHP_CodeSniffer...\n"));

    project
        .cmd()
        .assert()
        .stderr(predicate::str::contains("Running").not());
}

#[test]
fn js_tools_run_through_the_configured_runtime() {
    let project = Project::new();
    project.tool("node_modules/.bin/eslint", &project.eslint_one_minor(), 1);

    let output = project.cmd().output().expect("run");
    assert_eq!(output.status.code(), Some(0));
    let issues = stdout_json(&output);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["check_name"], "ESLint: no-console");
    assert_eq!(issues[0]["severity"], "minor");
    assert_eq!(issues[0]["location"]["path"], "web/app.js");
}

#[test]
fn missing_runtime_fails_the_js_stage() {
    let project = Project::new();
    project.tool("node_modules/.bin/eslint", &project.eslint_one_minor(), 1);
    std::fs::write(
        project.root().join("lintmerge.toml"),
        "[defaults]\nruntimes = [\"no-such-runtime-for-lintmerge\"]\n",
    )
    .expect("write config");

    project
        .cmd()
        .assert()
        .code(16)
        .stdout("")
        .stderr(predicate::str::contains(
            "ESLint needs a JavaScript runtime but none was found",
        ));
}

#[test]
fn only_and_skip_select_stages() {
    let project = Project::new();
    project
        .tool("vendor/bin/phpstan", &project.phpstan_one_major(), 1)
        .tool("vendor/bin/psalm", &project.psalm_one_critical(), 2);

    let output = project.cmd().args(["--only", "phpstan"]).output().expect("run");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output).len(), 1);

    let output = project.cmd().args(["--skip", "phpstan"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let issues = stdout_json(&output);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["check_name"], "Psalm: ParseError");
}

#[test]
fn last_location_policy_is_honored() {
    let project = Project::new();
    project.tool("vendor/bin/phpstan", &project.phpstan_one_major(), 1);

    project
        .cmd()
        .args(["--last", "never"])
        .assert()
        .stderr(predicate::str::contains("  1  PHPStan: variable.undefined\n"));
}

#[test]
fn exclude_paths_drop_issues() {
    let project = Project::new();
    project.tool("vendor/bin/phpstan", &project.phpstan_one_major(), 1);
    std::fs::write(
        project.root().join("lintmerge.toml"),
        "[defaults]\nruntimes = [\"sh\"]\nexclude_paths = [\"src/**\"]\n",
    )
    .expect("write config");

    project.cmd().assert().code(0).stdout("[]\n");
}

#[test]
fn missing_php_root_is_an_internal_error() {
    let project = Project::new();

    project
        .cmd()
        .args(["--php-root", "does-not-exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}
