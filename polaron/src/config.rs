// Host settings, read once at startup from polaron.toml.
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "polaron.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("parsing {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub project_dir: PathBuf,
    pub project_slot: usize,
    /// Substring of the MIDI input port to follow. None runs on the internal clock.
    pub midi_port: Option<String>,
    pub tick_micros: u64,
    pub log_file: PathBuf,
    pub log_filter: String,
    pub knob_step: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            project_slot: 0,
            midi_port: None,
            tick_micros: 1000,
            log_file: PathBuf::from("polaron.log"),
            log_filter: "polaron=info".to_owned(),
            knob_step: 32,
        }
    }
}

impl Config {
    /// A missing file means defaults; a file that is there but unreadable or
    /// malformed is an error.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io { path: path.to_owned(), source });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
