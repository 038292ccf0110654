//! Asset locator adapters.

mod local;
mod memory;

pub use local::LocalAssets;
pub use memory::MemoryAssets;

use std::path::{Path, PathBuf};

/// Relative locators hang off `base`; absolute ones are kept.
fn join_locator(base: &Path, locator: &str) -> PathBuf {
    let locator = Path::new(locator.trim());
    if locator.is_absolute() {
        locator.to_path_buf()
    } else {
        base.join(locator)
    }
}
