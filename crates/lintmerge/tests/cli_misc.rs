use assert_cmd::Command;
use assert_cmd::cargo;
use lintmerge_types::{ConfigFile, Tool};
use predicates::prelude::*;
use tempfile::TempDir;

fn lintmerge_cmd() -> Command {
    Command::new(cargo::cargo_bin!("lintmerge"))
}

fn write_config(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("lintmerge.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn help_lists_subcommands() {
    lintmerge_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tools"))
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn unknown_tool_name_is_a_usage_error() {
    lintmerge_cmd()
        .args(["--only", "rubocop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rubocop"));
}

#[test]
fn tools_prints_stage_table_in_pipeline_order() {
    let td = TempDir::new().expect("temp");
    let root = td.path().canonicalize().expect("canonicalize");
    std::fs::create_dir_all(root.join("vendor/bin")).expect("mkdir");
    std::fs::write(root.join("vendor/bin/phpstan"), "").expect("write");

    let output = lintmerge_cmd()
        .current_dir(&root)
        .args(["tools", "--skip", "psalm"])
        .output()
        .expect("run tools");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1 + Tool::ALL.len());
    assert!(lines[0].starts_with("TOOL"));

    let ids: Vec<&str> = lines[1..]
        .iter()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    let expected: Vec<&str> = Tool::ALL.iter().map(|t| t.as_str()).collect();
    assert_eq!(ids, expected);

    assert_eq!(
        lines[1],
        format!(
            "{:<14} {:<9} {}",
            "phpstan",
            "ready",
            root.join("vendor/bin/phpstan").display()
        )
    );
    assert!(lines[2].contains(" disabled "));
    assert!(lines[3].contains(" missing "));
}

#[test]
fn schema_describes_an_issue_array() {
    let output = lintmerge_cmd().arg("schema").output().expect("run schema");
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(schema["type"], "array");
    let props = &schema["definitions"]["Issue"]["properties"];
    for field in ["type", "check_name", "description", "severity", "location", "fingerprint"] {
        assert!(props.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn config_prints_merged_includes() {
    let td = TempDir::new().expect("temp");
    std::fs::write(
        td.path().join("base.toml"),
        "[defaults]\nphp_root = \"backend\"\n\n[tools.eslint]\nenabled = false\n",
    )
    .expect("write base");
    write_config(
        td.path(),
        "includes = [\"base.toml\"]\n\n[defaults]\nstrict = true\n",
    );

    let output = lintmerge_cmd()
        .current_dir(td.path())
        .arg("config")
        .output()
        .expect("run config");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("includes"));
    let cfg: ConfigFile = toml::from_str(&stdout).expect("output is TOML");
    assert_eq!(cfg.defaults.php_root.as_deref(), Some("backend"));
    assert_eq!(cfg.defaults.strict, Some(true));
    assert_eq!(cfg.tools.get(Tool::Eslint).enabled, Some(false));
}

#[test]
fn config_expands_environment_variables() {
    let td = TempDir::new().expect("temp");
    write_config(
        td.path(),
        "[defaults]\nphp_root = \"${LM_CLI_TEST_PHP_ROOT:-backend}\"\n",
    );

    lintmerge_cmd()
        .current_dir(td.path())
        .env_remove("LM_CLI_TEST_PHP_ROOT")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("php_root = \"backend\""));

    lintmerge_cmd()
        .current_dir(td.path())
        .env("LM_CLI_TEST_PHP_ROOT", "api")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("php_root = \"api\""));
}

#[test]
fn explicit_config_path_wins_over_default_file() {
    let td = TempDir::new().expect("temp");
    write_config(td.path(), "[defaults]\nlast = \"never\"\n");
    let ci = td.path().join("ci.toml");
    std::fs::write(&ci, "[defaults]\nlast = \"always\"\n").expect("write ci");

    lintmerge_cmd()
        .current_dir(td.path())
        .arg("config")
        .arg("--config")
        .arg(&ci)
        .assert()
        .success()
        .stdout(predicate::str::contains("last = \"always\""));
}

#[test]
fn invalid_config_is_an_internal_error() {
    let td = TempDir::new().expect("temp");
    write_config(td.path(), "[defaults\n");

    lintmerge_cmd()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("parse config"));
}

#[test]
fn unset_required_variable_is_an_internal_error() {
    let td = TempDir::new().expect("temp");
    write_config(td.path(), "[defaults]\njs_root = \"${LM_CLI_TEST_REQUIRED}\"\n");

    lintmerge_cmd()
        .current_dir(td.path())
        .env_remove("LM_CLI_TEST_REQUIRED")
        .arg("config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("LM_CLI_TEST_REQUIRED"));
}
