use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{GeneratorError, Result};
use crate::generators::CharacterClass;

/// Defaults applied when the command line leaves a value unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub length: i64,
    pub classes: BTreeSet<CharacterClass>,
    pub min_length: i64,
    pub max_length: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            length: 8,
            classes: BTreeSet::from([CharacterClass::Lowercase]),
            min_length: 4,
            max_length: 16,
        }
    }
}

impl Config {
    const FILE_NAME: &str = "config.json";
    const APP_DIR: &str = "passgen";

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load the config at `path`, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(GeneratorError::Config(format!(
                    "could not open {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        config.check()?;
        info!("loaded config from {}", path.display());

        Ok(config)
    }

    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<()> {
        if self.min_length < 0 || self.min_length > self.max_length {
            return Err(GeneratorError::Config(format!(
                "invalid length bounds: {}..={}",
                self.min_length, self.max_length
            )));
        }

        Ok(())
    }
}
