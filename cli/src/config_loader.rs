//! Configuration loader with multi-source merging
//!
//! Precedence, lowest to highest: built-in defaults, the optional TOML
//! file, then `CONSILIUM_`-prefixed environment variables (nested keys
//! separated by `__`, e.g. `CONSILIUM_ROLE_WEIGHTS__DEFAULT_WEIGHT`).

use consilium_application::ConsensusConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;

/// Load the engine configuration, merging all sources
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ConsensusConfig> {
    let mut figment = Figment::from(Serialized::defaults(ConsensusConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    let config = figment
        .merge(Env::prefixed("CONSILIUM_").split("__"))
        .extract()?;
    Ok(config)
}
