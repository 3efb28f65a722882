//! JSON file adapter for [`ConfigPort`].
//!
//! - Missing file: defaults, not an error.
//! - Every load and save is validated; invalid values are rejected.
//! - Saves go to a sibling temp file that is renamed over the target, so
//!   a crash mid-write never leaves a truncated config behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::FlowerConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<FlowerConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("ConfigFile: {} absent, using defaults", self.path.display());
                return Ok(FlowerConfig::default());
            }
            Err(e) => {
                warn!("ConfigFile: cannot read {}: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        let config: FlowerConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("ConfigFile: {} is not valid config JSON: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        info!("ConfigFile: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &FlowerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("ConfigFile: cannot write {}: {}", self.path.display(), e);
                ConfigError::IoError
            })?;
        info!("ConfigFile: saved {}", self.path.display());
        Ok(())
    }
}
