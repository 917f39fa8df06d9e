//! Cave generation parameters loader.

use std::path::Path;

use game_core::CaveConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for cellular cave parameters from RON files.
pub struct CaveLoader;

impl CaveLoader {
    pub fn load(path: &Path) -> LoadResult<CaveConfig> {
        let content = read_file(path)?;
        let cave: CaveConfig = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse cave RON {}: {}", path.display(), e))?;

        if !(0.0..=1.0).contains(&cave.fill_probability) {
            anyhow::bail!(
                "fill_probability must lie in 0..=1, got {}",
                cave.fill_probability
            );
        }
        if cave.max_attempts == 0 {
            anyhow::bail!("max_attempts must be at least 1");
        }
        Ok(cave)
    }
}
