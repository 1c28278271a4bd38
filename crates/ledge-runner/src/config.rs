//! Runner configuration.
//!
//! Holds the generator settings plus the parameters of the simulated run.
//! Configuration can be loaded from and saved to a TOML file.

use ledge_levelgen::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the starting template in the built-in catalog.
pub const DEFAULT_STARTING_TEMPLATE: &str = "start";

/// Runner configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    // === Catalog ===
    /// RON catalog to load (None = built-in catalog)
    pub catalog_path: Option<PathBuf>,
    /// Template the level starts with, looked up by name in the catalog file
    pub starting_template: String,

    // === Simulation ===
    /// Player speed in units per second
    pub player_speed: f32,
    /// Simulated tick length in seconds
    pub tick_seconds: f32,
    /// Number of ticks to simulate
    pub ticks: u32,

    // === Output ===
    /// Include every placed chunk in the summary
    pub print_chunks: bool,

    // === Generation ===
    /// Level generator settings
    pub generator: GeneratorConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            starting_template: DEFAULT_STARTING_TEMPLATE.to_string(),

            player_speed: 8.0,
            tick_seconds: 1.0 / 60.0,
            ticks: 3_600, // one minute at 60 Hz

            print_chunks: false,

            generator: GeneratorConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.generator.validate();

        if !self.player_speed.is_finite() {
            self.player_speed = Self::default().player_speed;
        }
        self.player_speed = self.player_speed.clamp(0.0, 1_000.0);

        if !self.tick_seconds.is_finite() {
            self.tick_seconds = Self::default().tick_seconds;
        }
        self.tick_seconds = self.tick_seconds.clamp(0.001, 1.0);

        self.ticks = self.ticks.min(1_000_000);

        if self.starting_template.trim().is_empty() {
            self.starting_template = DEFAULT_STARTING_TEMPLATE.to_string();
        }
    }
}
