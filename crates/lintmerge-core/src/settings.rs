//! Fully-resolved run settings.
//!
//! The config file and command-line overrides are merged once, before the
//! pipeline starts; nothing downstream reads either source again.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lintmerge_types::{BiomeReporter, ConfigFile, Family, LastPolicy, Tool};

pub const DEFAULT_RUNTIMES: [&str; 2] = ["node", "bun"];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{family} root '{path}' does not exist or is not a directory")]
    MissingRoot {
        family: &'static str,
        path: PathBuf,
    },

    #[error("the JS runtime preference list is empty")]
    NoRuntimes,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub php_root: Option<PathBuf>,
    pub js_root: Option<PathBuf>,
    pub strict: bool,
    pub silent: bool,
    pub no_stats: bool,
    pub last: Option<LastPolicy>,
    pub no_cache: bool,
    /// When non-empty, only these tools run.
    pub only: Vec<Tool>,
    pub skip: Vec<Tool>,
    pub verbosity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub enabled: bool,
    /// Tool config file, passed through relative to the family root.
    pub config: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub php_root: PathBuf,
    pub js_root: PathBuf,
    pub runtimes: Vec<String>,
    pub stats: bool,
    pub last: LastPolicy,
    pub silent: bool,
    pub strict: bool,
    pub cache: bool,
    pub verbosity: u8,
    pub exclude_paths: Vec<String>,
    pub biome_reporter: BiomeReporter,
    pub tools: BTreeMap<Tool, ToolSettings>,
}

impl Settings {
    /// Resolves `config` plus `overrides`. Relative roots are taken from `base_dir`.
    pub fn resolve(
        config: &ConfigFile,
        overrides: &Overrides,
        base_dir: &Path,
    ) -> Result<Settings, SettingsError> {
        let d = &config.defaults;

        let php_root = resolve_root(
            "PHP",
            base_dir,
            overrides.php_root.as_deref(),
            d.php_root.as_deref(),
        )?;
        let js_root = resolve_root(
            "JS",
            base_dir,
            overrides.js_root.as_deref(),
            d.js_root.as_deref(),
        )?;

        let runtimes = d
            .runtimes
            .clone()
            .unwrap_or_else(|| DEFAULT_RUNTIMES.iter().map(|s| s.to_string()).collect());
        if runtimes.is_empty() {
            return Err(SettingsError::NoRuntimes);
        }

        let tools = Tool::ALL
            .into_iter()
            .map(|tool| {
                let tc = config.tools.get(tool);
                let selected = overrides.only.is_empty() || overrides.only.contains(&tool);
                let enabled =
                    tc.enabled.unwrap_or(true) && selected && !overrides.skip.contains(&tool);
                (
                    tool,
                    ToolSettings {
                        enabled,
                        config: tc.config.clone(),
                        args: tc.args.clone().unwrap_or_default(),
                    },
                )
            })
            .collect();

        Ok(Settings {
            php_root,
            js_root,
            runtimes,
            stats: d.stats.unwrap_or(true) && !overrides.no_stats,
            last: overrides.last.or(d.last).unwrap_or_default(),
            silent: overrides.silent || d.silent.unwrap_or(false),
            strict: overrides.strict || d.strict.unwrap_or(false),
            cache: d.cache.unwrap_or(true) && !overrides.no_cache,
            verbosity: overrides.verbosity,
            exclude_paths: d.exclude_paths.clone().unwrap_or_default(),
            biome_reporter: d.biome_reporter.unwrap_or_default(),
            tools,
        })
    }

    pub fn root(&self, family: Family) -> &Path {
        match family {
            Family::Php => &self.php_root,
            Family::Js => &self.js_root,
        }
    }

    pub fn tool(&self, tool: Tool) -> Option<&ToolSettings> {
        self.tools.get(&tool)
    }

    pub fn is_enabled(&self, tool: Tool) -> bool {
        self.tool(tool).is_some_and(|t| t.enabled)
    }
}

fn resolve_root(
    family: &'static str,
    base_dir: &Path,
    cli: Option<&Path>,
    file: Option<&str>,
) -> Result<PathBuf, SettingsError> {
    let raw = cli
        .map(Path::to_path_buf)
        .or_else(|| file.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let joined = base_dir.join(raw);
    match joined.canonicalize() {
        Ok(p) if p.is_dir() => Ok(p),
        _ => Err(SettingsError::MissingRoot {
            family,
            path: joined,
        }),
    }
}
