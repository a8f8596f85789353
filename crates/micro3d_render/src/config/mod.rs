//! Configuration system
//!
//! Pipeline settings live in [`PipelineConfig`] and can be loaded from TOML or
//! RON files through the [`Config`] trait.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, its extension is neither `.toml`
    /// nor `.ron`, or its contents do not parse.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Fails when the extension is unsupported, serialization fails, or the
    /// file cannot be written.
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

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Pipeline Configuration
///
/// Settings for the record hand-off channel and the per-figure reuse stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Default log filter, overridable by `RUST_LOG`
    pub log_level: String,
    /// Maximum records in flight between producer and consumer.
    /// `None` means unbounded.
    pub queue_capacity: Option<usize>,
    /// Maximum records kept on each figure's reuse stack.
    /// `None` lets the stack grow with demand.
    pub max_pooled_per_figure: Option<usize>,
    /// Records allocated onto each figure's reuse stack up front
    pub prewarm_per_figure: usize,
}

impl PipelineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            queue_capacity: None,
            max_pooled_per_figure: None,
            prewarm_per_figure: 0,
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Bound the hand-off channel
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Bound each figure's reuse stack
    #[must_use]
    pub fn with_max_pooled_per_figure(mut self, limit: usize) -> Self {
        self.max_pooled_per_figure = Some(limit);
        self
    }

    /// Pre-allocate records for each figure
    #[must_use]
    pub fn with_prewarm_per_figure(mut self, count: usize) -> Self {
        self.prewarm_per_figure = count;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty log level, a zero-sized
    /// queue, or a prewarm count larger than the pool limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }

        if self.queue_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "queue capacity must be at least 1 (omit it for an unbounded queue)".to_string(),
            ));
        }

        if let Some(limit) = self.max_pooled_per_figure {
            if self.prewarm_per_figure > limit {
                return Err(ConfigError::Invalid(format!(
                    "prewarm count {} exceeds pool limit {}",
                    self.prewarm_per_figure, limit
                )));
            }
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PipelineConfig {}
