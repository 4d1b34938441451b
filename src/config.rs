use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Megabyte constant for piece size calculations
pub const MB: u64 = 1_048_576;

/// Thresholds for automatic piece size selection.
/// Maps total size to piece size power (2^N); sizes above the last
/// threshold use the largest legal power (2^22).
pub const PIECE_SIZE_THRESHOLDS: [(u64, u32); 8] = [
    (16 * MB, 14),   // <=16MB  -> 2^14 (16 KB)
    (32 * MB, 15),   // <=32MB  -> 2^15 (32 KB)
    (64 * MB, 16),   // <=64MB  -> 2^16 (64 KB)
    (128 * MB, 17),  // <=128MB -> 2^17 (128 KB)
    (256 * MB, 18),  // <=256MB -> 2^18 (256 KB)
    (512 * MB, 19),  // <=512MB -> 2^19 (512 KB)
    (1024 * MB, 20), // <=1GB   -> 2^20 (1 MB)
    (2048 * MB, 21), // <=2GB   -> 2^21 (2 MB)
];

/// A named set of defaults applied before CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub announce: Option<Vec<String>>,
    pub web_seed: Option<Vec<String>>,
    pub private: Option<bool>,
    pub comment: Option<String>,
    pub include_md5: Option<bool>,
    pub piece_size: Option<u32>,
}

/// User configuration, loaded from `config.toml` in the platform config
/// directory (e.g. `~/.config/seedkit/config.toml`).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Load the user config. A missing file yields the default (empty) config.
    pub fn load() -> Result<Self> {
        let Some(dirs) = directories::ProjectDirs::from("", "", "seedkit") else {
            return Ok(Self::default());
        };
        let path = dirs.config_dir().join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))
    }
}
