//! Level content for the dungeon simulation.
//!
//! This crate turns data into ready-to-run [`game_core::GameState`] worlds:
//! - ASCII templates with a fixed symbol table ([`template`])
//! - cellular-automata caves ([`cellular`])
//! - the registry of built-in levels ([`levels`])
//! - file loaders for configuration, cave parameters and custom templates
//!   (behind the `loaders` feature)

pub mod cellular;
pub mod levels;
pub mod template;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use cellular::CaveMap;
pub use levels::{BuildLevel, DEFAULT_LEVEL, LEVELS, LevelDefinition, find_level, level_names};
pub use template::build_from_ascii;

#[cfg(feature = "loaders")]
pub use loaders::{CaveLoader, ConfigLoader, ContentFactory, LoadResult, TemplateLoader};
