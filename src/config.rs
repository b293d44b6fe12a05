//! Configuration constants and types for the shredder.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Size of each overwrite chunk (1 MiB). The last chunk of a pass is truncated.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 4;

/// Default pass count for the custom algorithm.
pub const DEFAULT_CUSTOM_PASSES: u32 = 3;

/// Default pattern cycle for the custom algorithm.
pub const DEFAULT_CUSTOM_PATTERN: &str = "00,FF,RANDOM";

/// Keyword selecting fresh random bytes in a custom pattern.
pub const RANDOM_KEYWORD: &str = "RANDOM";

/// Characters used when generating a secure rename target.
pub const RENAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Overwrite algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Single zero pass.
    #[default]
    Simple,
    /// DoD 5220.22-M three-pass.
    #[serde(alias = "DoD")]
    Dod,
    /// Gutmann sequence.
    #[serde(alias = "Gutmann")]
    Gutmann,
    /// User-supplied pattern cycle.
    #[serde(alias = "Custom")]
    Custom,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Algorithm::Simple),
            "dod" => Ok(Algorithm::Dod),
            "gutmann" => Ok(Algorithm::Gutmann),
            "custom" => Ok(Algorithm::Custom),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Simple => "simple",
            Algorithm::Dod => "dod",
            Algorithm::Gutmann => "gutmann",
            Algorithm::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Snapshot of shredder settings.
///
/// Treated as immutable once handed to an engine; changing settings means
/// building a new engine state from a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShredConfig {
    /// Which overwrite algorithm to run.
    pub algorithm: Algorithm,

    /// Log what would happen without touching the disk.
    pub dry_run: bool,

    /// Rename each file to a random name before removing it.
    pub secure_rename: bool,

    /// Worker thread count; bounds simultaneously open files.
    pub workers: usize,

    /// Comma-separated cycle of hex bytes and RANDOM, used by `Algorithm::Custom`.
    pub custom_pattern: String,

    /// Number of passes for `Algorithm::Custom`.
    pub custom_passes: u32,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            dry_run: false,
            secure_rename: false,
            workers: DEFAULT_WORKERS,
            custom_pattern: DEFAULT_CUSTOM_PATTERN.to_string(),
            custom_passes: DEFAULT_CUSTOM_PASSES,
        }
    }
}

impl ShredConfig {
    /// Create a configuration for the given algorithm with default settings.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Validate numeric settings. Pattern entries are checked when the
    /// pattern sequence is built.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig(
                "Worker count must be at least 1".to_string(),
            ));
        }
        if self.algorithm == Algorithm::Custom && self.custom_passes == 0 {
            return Err(Error::InvalidConfig(
                "Custom pass count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: ShredConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Save settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
