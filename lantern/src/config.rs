use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use crate::error::LanternError;

/// The contents of a lantern config file. The core's options live at the top level, next to
/// lantern's own.
///
/// ```toml
/// log_level = "debug"
/// frames = 60
/// boot_overlay = true
/// unimplemented_opcode = "skip"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub frames: Option<u64>,
    pub max_steps: Option<u64>,
    #[serde(flatten)]
    pub core: wisp::Config,
}

impl Config {
    /// Reads the config at the given path. A missing path means the default config.
    pub fn load(path: Option<&Path>) -> Result<Self, LanternError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read_to_string(path).map_err(|e| LanternError::io(path, e))?;
        Ok(toml::from_str(&data)?)
    }

    pub fn level(&self) -> Result<Option<LevelFilter>, LanternError> {
        self.log_level
            .as_deref()
            .map(|level| {
                LevelFilter::from_str(level).map_err(|_| LanternError::LogLevel(level.to_owned()))
            })
            .transpose()
    }
}
