//! Growth and segmentation policy.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [buffer]
//! initial_capacity = 64
//! growth_factor = 2
//!
//! [segment]
//! segment_capacity = 256
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
pub const DEFAULT_GROWTH_FACTOR: usize = 2;
pub const DEFAULT_SEGMENT_CAPACITY: usize = 64;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub buffer: BufferConfig,
    pub segment: SegmentConfig,
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a value breaks a policy bound.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.buffer.validate()?;
        self.segment.validate()
    }
}

/// Growth policy of a [`crate::container::ByteBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Bytes allocated up front.
    pub initial_capacity: usize,
    /// Capacity multiplier applied on overflow.
    pub growth_factor: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl BufferConfig {
    /// # Errors
    ///
    /// Fails when `growth_factor < 2`, which could never make room.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth_factor < 2 {
            return Err(ConfigError::Invalid {
                field: "buffer.growth_factor",
                reason: format!("must be at least 2, got {}", self.growth_factor),
            });
        }
        Ok(())
    }

    /// Smallest capacity reachable by repeated growth that holds `required` bytes.
    ///
    /// A factor below 2 grows as if it were 2.
    #[must_use]
    pub fn grown_capacity(&self, current: usize, required: usize) -> usize {
        let factor = self.growth_factor.max(2);
        let mut capacity = current.max(1);
        while capacity < required {
            capacity = capacity.saturating_mul(factor);
        }
        capacity
    }
}

/// Segmentation policy of a [`crate::container::Segmented`] container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Elements a segment holds before a new one is started.
    pub segment_capacity: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
        }
    }
}

impl SegmentConfig {
    /// # Errors
    ///
    /// Fails when `segment_capacity` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "segment.segment_capacity",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}
