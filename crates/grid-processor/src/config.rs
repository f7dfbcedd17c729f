//! Configuration for the grid processor.

use serde::{Deserialize, Serialize};

use crate::crop::CropConfig;
use crate::interpolation::InterpolationConfig;

/// Configuration for interpolation, cropping and map caching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridProcessorConfig {
    pub interpolation: InterpolationConfig,
    pub crop: CropConfig,
    pub cache: CacheConfig,
}

/// Map cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of decoded maps kept in memory.
    pub map_cache_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            map_cache_entries: 64,
        }
    }
}

impl GridProcessorConfig {
    /// Override fields from environment variables that are set and parse.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("PREPROCESS_MAP_CACHE") {
            if let Ok(entries) = val.parse() {
                self.cache.map_cache_entries = entries;
            }
        }

        if let Ok(val) = std::env::var("PREPROCESS_WINDOW_SIZE") {
            if let Ok(size) = val.parse() {
                self.crop.window_size = size;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache.map_cache_entries == 0 {
            return Err("map_cache_entries must be > 0".to_string());
        }
        self.interpolation.validate().map_err(|e| e.to_string())?;
        self.crop.validate().map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GridProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crop.window_size, 17);
        assert_eq!(config.interpolation.min_samples, 3);
    }

    #[test]
    fn test_zero_cache_rejected() {
        let mut config = GridProcessorConfig::default();
        config.cache.map_cache_entries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_interpolation_rejected() {
        let mut config = GridProcessorConfig::default();
        config.interpolation.pressure_interval = 7.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("multiple"));
    }
}
