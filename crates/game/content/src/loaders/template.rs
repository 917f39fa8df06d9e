//! ASCII level template loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};

/// Loader for ASCII level templates.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Reads a template, normalising Windows line endings.
    pub fn load(path: &Path) -> LoadResult<String> {
        let content = read_file(path)?;
        if content.trim().is_empty() {
            anyhow::bail!("Level template {} is empty", path.display());
        }
        Ok(content.replace("\r\n", "\n"))
    }
}
