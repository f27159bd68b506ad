use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

#[derive(Debug, thiserror::Error)]
pub enum PathFilterError {
    #[error("invalid exclude_paths glob '{glob}': {source}")]
    InvalidGlob {
        glob: String,
        source: globset::Error,
    },
}

/// Compiled `exclude_paths`, matched against relative issue paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    set: Option<GlobSet>,
}

impl PathFilter {
    pub fn compile(globs: &[String]) -> Result<Self, PathFilterError> {
        if globs.is_empty() {
            return Ok(Self { set: None });
        }
        let mut b = GlobSetBuilder::new();
        for g in globs {
            let glob = Glob::new(g).map_err(|e| PathFilterError::InvalidGlob {
                glob: g.clone(),
                source: e,
            })?;
            b.add(glob);
        }
        let set = b.build().map_err(|e| PathFilterError::InvalidGlob {
            glob: globs.join(", "),
            source: e,
        })?;
        Ok(Self { set: Some(set) })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.set
            .as_ref()
            .is_some_and(|s| s.is_match(Path::new(path)))
    }
}
