//! In-memory asset locator for testing.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use comploc_core::application::ports::AssetLocator;

use super::join_locator;

/// Asset locator backed by a set of known paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    base: PathBuf,
    known: Arc<RwLock<HashSet<PathBuf>>>,
}

impl MemoryAssets {
    /// Create an empty locator; relative locators resolve against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            known: Arc::default(),
        }
    }

    /// Register `locator` (resolved) as an existing asset.
    pub fn add(&self, locator: &str) -> PathBuf {
        let path = join_locator(&self.base, locator);
        if let Ok(mut known) = self.known.write() {
            known.insert(path.clone());
        }
        path
    }

    pub fn with_files<'a>(self, locators: impl IntoIterator<Item = &'a str>) -> Self {
        for locator in locators {
            self.add(locator);
        }
        self
    }
}

impl AssetLocator for MemoryAssets {
    fn resolve(&self, locator: &str) -> PathBuf {
        join_locator(&self.base, locator)
    }

    fn exists(&self, path: &Path) -> bool {
        self.known
            .read()
            .map(|known| known.contains(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths_exist() {
        let assets = MemoryAssets::new("/assets").with_files(["logo_fr.png"]);
        assert!(assets.exists(&assets.resolve("logo_fr.png")));
        assert!(!assets.exists(&assets.resolve("logo_de.png")));
    }

    #[test]
    fn test_absolute_locators_ignore_base() {
        let assets = MemoryAssets::new("/assets");
        assert_eq!(assets.resolve("/elsewhere/a.png"), PathBuf::from("/elsewhere/a.png"));
        assert_eq!(assets.resolve(" a.png "), PathBuf::from("/assets/a.png"));
    }
}
