//! Pool and event bus configuration options

use std::time::Duration;

/// Configuration for object pool behavior
///
/// Read once when the pool is filled. The lifetime is copied into every
/// item the pool constructs and read again by each item when it is
/// activated.
///
/// # Examples
///
/// ```
/// use unity_tools::PoolConfiguration;
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_capacity(8)
///     .with_expansion(false)
///     .with_lifetime(Duration::from_secs(2));
///
/// assert_eq!(config.capacity, 8);
/// assert!(!config.can_expand);
/// assert_eq!(config.lifetime, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfiguration {
    /// Number of objects created when the pool is filled
    pub capacity: usize,

    /// Whether the pool grows by one object when every object is active
    pub can_expand: bool,

    /// Time an activated object stays active before it deactivates itself.
    /// Zero means objects live until released manually.
    pub lifetime: Duration,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            capacity: 20,
            can_expand: true,
            lifetime: Duration::ZERO,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of objects created up front
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Allow or forbid growing past the initial capacity
    pub fn with_expansion(mut self, can_expand: bool) -> Self {
        self.can_expand = can_expand;
        self
    }

    /// Set the lifetime of activated objects
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Set the lifetime of activated objects in seconds. Negative or
    /// non-finite values disable expiry.
    ///
    /// ```
    /// use unity_tools::PoolConfiguration;
    /// use std::time::Duration;
    ///
    /// let config = PoolConfiguration::new().with_lifetime_secs(1.5);
    /// assert_eq!(config.lifetime, Duration::from_millis(1500));
    ///
    /// let config = PoolConfiguration::new().with_lifetime_secs(-3.0);
    /// assert!(config.lifetime.is_zero());
    /// ```
    pub fn with_lifetime_secs(self, seconds: f32) -> Self {
        let lifetime = Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO);
        self.with_lifetime(lifetime)
    }
}

/// Error policy of an [`EventBus`](crate::EventBus)
///
/// Both policies default to silently ignoring the condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventBusConfig {
    /// Report an error when publishing an event nobody listens to
    pub require_listener: bool,

    /// Report an error when removing a listener that isn't subscribed
    pub strict_unsubscribe: bool,
}

impl EventBusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_require_listener(mut self, require: bool) -> Self {
        self.require_listener = require;
        self
    }

    pub fn with_strict_unsubscribe(mut self, strict: bool) -> Self {
        self.strict_unsubscribe = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfiguration::default();
        assert_eq!(config.capacity, 20);
        assert!(config.can_expand);
        assert!(config.lifetime.is_zero());

        let bus = EventBusConfig::default();
        assert!(!bus.require_listener);
        assert!(!bus.strict_unsubscribe);
    }

    #[test]
    fn test_nan_lifetime_disables_expiry() {
        let config = PoolConfiguration::new().with_lifetime_secs(f32::NAN);
        assert!(config.lifetime.is_zero());
    }
}
