//! Health monitoring for object pools

/// Health status of an object pool
///
/// A pool that can expand is never unhealthy because of utilization; it
/// only grows. A fixed pool is unhealthy once it is nearly or fully used.
///
/// # Examples
///
/// ```
/// use unity_tools::{ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};
///
/// let config = PoolConfiguration::new().with_capacity(1).with_expansion(false);
/// let mut pooler = SimpleObjectPooler::new("pool", config)
///     .with_prototype(Prototype::new("item", || 0));
/// pooler.initialize();
/// assert!(pooler.health_status().is_healthy());
///
/// pooler.spawn().unwrap();
/// let health = pooler.health_status();
/// assert!(!health.is_healthy());
/// assert_eq!(health.available_objects, 0);
/// ```
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    /// Inactive objects count
    pub available_objects: usize,

    /// Active objects count
    pub active_objects: usize,

    /// Objects currently in the pool
    pub pool_size: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(available: usize, active: usize, size: usize, can_expand: bool) -> Self {
        let utilization = if size > 0 {
            active as f64 / size as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if size == 0 {
            warnings.push("Pool has no objects".to_string());
        }

        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            if !can_expand {
                is_healthy = false;
            }
        }

        if available == 0 && size > 0 {
            if can_expand {
                warnings.push("Pool is empty and will expand on the next acquire".to_string());
            } else {
                warnings.push("Pool is exhausted".to_string());
                is_healthy = false;
            }
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            utilization,
            available_objects: available,
            active_objects: active,
            pool_size: size,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}
