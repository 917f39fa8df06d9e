//! Loaders for content kept on disk.
//!
//! Game tunables come from TOML, cave parameters from RON, and custom levels
//! from plain ASCII templates in the format of [`crate::template`].

pub mod cave;
pub mod config;
pub mod factory;
pub mod template;

pub use cave::CaveLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use template::TemplateLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
