// Layered settings: defaults, then an optional file, then REBASE_* env vars.
// CLI flags are applied on top by the binary.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Looked up as rebase.{toml,json,yaml} in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rebase";
pub const ENV_PREFIX: &str = "REBASE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub reference_asset: Option<String>,
    pub max_depth: u8,
    /// 0 = one worker per available core
    pub workers: usize,
    pub log_filter: String,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("max_depth", 3_i64)?
            .set_default("workers", 0_i64)?
            .set_default("log_filter", "info")?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}
