//! CLI command handlers

pub mod check_config;
pub mod serve;

use std::path::Path;

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Load configuration from `path` when given, otherwise from the project
/// directory layering.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    path.map_or_else(ConfigLoader::load, ConfigLoader::load_from_file)
}
