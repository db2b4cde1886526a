use std::time::Duration;

const DEFAULT_MAXIMUM_SIZE: usize = 1024;
const DEFAULT_EXPIRE_AFTER_WRITE: Duration = Duration::from_secs(120);
const DEFAULT_CACHE_NAME_PREFIX: &str = "enrichment";

/// Sizing and expiry knobs for the projection cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    maximum_size: usize,
    expire_after_write: Duration,
    expire_after_access: Option<Duration>,
    cache_name_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            maximum_size: DEFAULT_MAXIMUM_SIZE,
            expire_after_write: DEFAULT_EXPIRE_AFTER_WRITE,
            expire_after_access: None,
            cache_name_prefix: DEFAULT_CACHE_NAME_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    /// Caps the number of ready entries. Clamped to at least 1.
    pub fn with_maximum_size(mut self, maximum_size: usize) -> Self {
        self.maximum_size = maximum_size.max(1);
        self
    }

    /// Age after which a ready entry is dropped regardless of use.
    pub fn with_expire_after_write(mut self, expire_after_write: Duration) -> Self {
        self.expire_after_write = expire_after_write;
        self
    }

    /// Optional sliding window: entries untouched for this long are dropped.
    pub fn with_expire_after_access(mut self, expire_after_access: Duration) -> Self {
        self.expire_after_access = Some(expire_after_access);
        self
    }

    /// Prefix applied to metric names; diagnostics only.
    pub fn with_cache_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_name_prefix = prefix.into();
        self
    }

    pub fn maximum_size(&self) -> usize {
        self.maximum_size
    }

    pub fn expire_after_write(&self) -> Duration {
        self.expire_after_write
    }

    pub fn expire_after_access(&self) -> Option<Duration> {
        self.expire_after_access
    }

    pub fn cache_name_prefix(&self) -> &str {
        &self.cache_name_prefix
    }
}
