//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use game_core::{CaveConfig, GameConfig, GameRng, GameState};

use crate::loaders::{CaveLoader, ConfigLoader, LoadResult, TemplateLoader};
use crate::template::build_from_ascii;

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── caves/
/// │   └── spider_room.ron
/// └── levels/
///     ├── default.txt
///     └── lich_test.txt
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load cave parameters from `caves/{name}.ron`.
    pub fn load_cave(&self, name: &str) -> LoadResult<CaveConfig> {
        let path = self.data_dir.join("caves").join(format!("{}.ron", name));
        CaveLoader::load(&path)
    }

    /// Load the template `levels/{name}.txt`.
    pub fn load_template(&self, name: &str) -> LoadResult<String> {
        let path = self.data_dir.join("levels").join(format!("{}.txt", name));
        TemplateLoader::load(&path)
    }

    /// Load a template and build it into a world.
    pub fn build_level(
        &self,
        name: &str,
        config: &GameConfig,
        rng: &mut GameRng,
    ) -> LoadResult<GameState> {
        let template = self.load_template(name)?;
        Ok(build_from_ascii(config, rng, &template))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
