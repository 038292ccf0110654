//! Local asset locator using std::fs.

use std::path::{Path, PathBuf};

use comploc_core::application::ports::AssetLocator;
use tracing::trace;

use super::join_locator;

/// Production asset locator: manifest values are file paths relative to a
/// base directory.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    base: PathBuf,
}

impl LocalAssets {
    /// Create a locator rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl Default for LocalAssets {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetLocator for LocalAssets {
    fn resolve(&self, locator: &str) -> PathBuf {
        join_locator(&self.base, locator)
    }

    fn exists(&self, path: &Path) -> bool {
        let found = path.is_file();
        trace!(path = %path.display(), found, "asset lookup");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_relative_to_base() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("logo_fr.png"), b"png").unwrap();
        let assets = LocalAssets::new(dir.path());

        let path = assets.resolve("logo_fr.png");
        assert_eq!(path, dir.path().join("logo_fr.png"));
        assert!(assets.exists(&path));
        assert!(!assets.exists(&assets.resolve("logo_de.png")));
    }

    #[test]
    fn test_directories_are_not_assets() {
        let dir = TempDir::new().unwrap();
        let assets = LocalAssets::new(dir.path());
        assert!(!assets.exists(dir.path()));
    }
}
