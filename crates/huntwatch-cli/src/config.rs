//! `huntwatch.toml` loading and merging with command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use huntwatch_core::memory::layout::timing;
use huntwatch_core::{DEFAULT_PROCESS_NAME, ReaderConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "huntwatch.toml";

/// Languages tried in order when looking up names
pub const DEFAULT_LANGUAGES: &[&str] = &["pt", "en"];

/// On-disk configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub process_name: Option<String>,
    pub cache_ms: Option<u64>,
    pub offsets: Option<PathBuf>,
    pub names_db: Option<PathBuf>,
    pub languages: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the file, falling back to defaults when it is missing or broken.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }
}

/// Values given on the command line; they win over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub process_name: Option<String>,
    pub cache_ms: Option<u64>,
    pub offsets: Option<PathBuf>,
    pub names_db: Option<PathBuf>,
    pub languages: Option<Vec<String>>,
}

/// Effective settings after merging flags, file and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub process_name: String,
    pub cache_window: Duration,
    pub offsets: Option<PathBuf>,
    pub names_db: Option<PathBuf>,
    pub languages: Vec<String>,
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let languages = overrides
            .languages
            .or(file.languages)
            .filter(|languages| !languages.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect());

        Self {
            process_name: overrides
                .process_name
                .or(file.process_name)
                .unwrap_or_else(|| DEFAULT_PROCESS_NAME.to_string()),
            cache_window: Duration::from_millis(
                overrides
                    .cache_ms
                    .or(file.cache_ms)
                    .unwrap_or(timing::CACHE_WINDOW_MS),
            ),
            offsets: overrides.offsets.or(file.offsets),
            names_db: overrides.names_db.or(file.names_db),
            languages,
        }
    }

    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::builder()
            .process_name(self.process_name.clone())
            .cache_window(self.cache_window)
            .build()
    }
}
