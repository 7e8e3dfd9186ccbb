//! Configuration system
//!
//! Component configuration is plain serde data. Files are read as TOML or RON
//! depending on their extension.

pub use serde::{Serialize, Deserialize};

/// Default probe distance for [`ColliderConfig`]
pub const DEFAULT_PROBE_DISTANCE: f32 = 0.5;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value was parsed but is out of range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

fn default_probe_distance() -> f32 {
    DEFAULT_PROBE_DISTANCE
}

/// Probe collider settings, resolved once per collider instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderConfig {
    /// Ray length and minimum clearance kept from obstacle surfaces
    #[serde(default = "default_probe_distance")]
    pub distance: f32,

    /// Publish one debug line per probe direction
    #[serde(default)]
    pub debug: bool,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_PROBE_DISTANCE,
            debug: false,
        }
    }
}

impl Config for ColliderConfig {}

impl ColliderConfig {
    /// Builder pattern: set probe distance
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Builder pattern: toggle debug lines
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Reject distances that are not positive and finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "distance",
                reason: format!("must be a positive finite number, got {}", self.distance),
            });
        }
        Ok(())
    }
}

/// Portal teleporter settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeleporterConfig {
    /// Navigation target
    pub url: String,

    /// Log every collision the portal receives
    #[serde(default)]
    pub debug: bool,
}

impl Config for TeleporterConfig {}

impl TeleporterConfig {
    /// Create a teleporter config pointing at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            debug: false,
        }
    }

    /// Builder pattern: toggle collision logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// A portal without a destination is a configuration mistake
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
