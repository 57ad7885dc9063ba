//! Cache configuration.

/// Tunables for the caching core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied when a call site does not supply one, in minutes.
    pub default_ttl_minutes: u32,
    /// Upper bound on stored entries; least-recently-used entries are
    /// evicted past it. `0` disables the cap.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: 5,
            max_entries: 2_000,
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default TTL in minutes.
    pub fn with_default_ttl_minutes(mut self, minutes: u32) -> Self {
        self.default_ttl_minutes = minutes;
        self
    }

    /// Set the entry cap. `0` disables bounded-memory eviction.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl_minutes, 5);
        assert_eq!(config.max_entries, 2_000);
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::new()
            .with_default_ttl_minutes(15)
            .with_max_entries(100);
        assert_eq!(config.default_ttl_minutes, 15);
        assert_eq!(config.max_entries, 100);
    }
}
