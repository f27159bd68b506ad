//! Configuration loading with include resolution.
//!
//! A config file may list other files under `includes`. Included files are
//! loaded first, in order, and the including file is merged on top, so later
//! definitions win field by field.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use lintmerge_types::ConfigFile;

/// Maximum depth for include resolution.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Loads `path` and everything it includes, expanding each file's text with
/// `expand_env` before parsing.
pub fn load_config_with_includes<F>(path: &Path, expand_env: F) -> Result<ConfigFile>
where
    F: Fn(&str) -> Result<String> + Copy,
{
    let mut visited = HashSet::new();
    load_recursive(path, expand_env, &mut visited, 0)
}

fn load_recursive<F>(
    path: &Path,
    expand_env: F,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<ConfigFile>
where
    F: Fn(&str) -> Result<String> + Copy,
{
    if depth > MAX_INCLUDE_DEPTH {
        bail!(
            "Include depth exceeded maximum of {MAX_INCLUDE_DEPTH} levels at '{}'",
            path.display()
        );
    }

    let canonical = path
        .canonicalize()
        .with_context(|| format!("canonicalize path '{}'", path.display()))?;
    if !visited.insert(canonical) {
        bail!("Circular include detected: '{}'", path.display());
    }

    debug!("Loading config from '{}' (depth {depth})", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let expanded = expand_env(&text)?;
    let mut config: ConfigFile =
        toml::from_str(&expanded).with_context(|| format!("parse config '{}'", path.display()))?;

    let includes = std::mem::take(&mut config.includes);
    if includes.is_empty() {
        return Ok(config);
    }

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let mut merged = ConfigFile::default();
    for include in &includes {
        let full_path = base_dir.join(include);
        debug!(
            "Resolving include '{include}' relative to '{}'",
            base_dir.display()
        );
        if !full_path.exists() {
            bail!(
                "Included config file not found: '{}' (resolved from '{include}')",
                full_path.display()
            );
        }
        let included = load_recursive(&full_path, expand_env, visited, depth + 1)?;
        merged = merge_configs(merged, included);
    }

    Ok(merge_configs(merged, config))
}

/// Field-wise merge; anything set in `other` wins.
fn merge_configs(base: ConfigFile, other: ConfigFile) -> ConfigFile {
    ConfigFile {
        includes: vec![],
        defaults: base.defaults.merged(other.defaults),
        tools: base.tools.merged(other.tools),
    }
}
