//! Metrics collection and export for object pools

use std::collections::HashMap;

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use unity_tools::{PoolConfiguration, Prototype, SimpleObjectPooler, ObjectPooler};
///
/// let mut pooler = SimpleObjectPooler::new("pool", PoolConfiguration::new().with_capacity(3))
///     .with_prototype(Prototype::new("item", || 0));
/// pooler.initialize();
/// pooler.spawn().unwrap();
///
/// let metrics = pooler.metrics();
/// assert_eq!(metrics.total_acquired, 1);
/// assert_eq!(metrics.active_objects, 1);
/// assert_eq!(metrics.pool_size, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolMetrics {
    /// Successful acquire calls. An object acquired again before anyone
    /// activated it is counted once per call.
    pub total_acquired: usize,

    /// Total objects explicitly released
    pub total_released: usize,

    /// Total objects that deactivated themselves when their lifetime ran out
    pub total_expired: usize,

    /// Objects created after the initial fill
    pub total_expanded: usize,

    /// Number of times acquire found no inactive object and could not grow
    pub exhausted_events: usize,

    /// Current active objects
    pub active_objects: usize,

    /// Current inactive objects
    pub available_objects: usize,

    /// Current number of objects in the pool
    pub pool_size: usize,

    /// Pool utilization ratio (0.0 to 1.0)
    pub utilization: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("total_expired".to_string(), self.total_expired.to_string());
        metrics.insert("total_expanded".to_string(), self.total_expanded.to_string());
        metrics.insert("exhausted_events".to_string(), self.exhausted_events.to_string());
        metrics.insert("active_objects".to_string(), self.active_objects.to_string());
        metrics.insert("available_objects".to_string(), self.available_objects.to_string());
        metrics.insert("pool_size".to_string(), self.pool_size.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics
    }
}

/// Metrics exporter for Prometheus format
#[cfg(feature = "metrics")]
pub struct MetricsExporter;

#[cfg(feature = "metrics")]
impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// Every sample carries a `pool` label plus the given tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_tools::{PoolConfiguration, Prototype, SimpleObjectPooler, ObjectPooler};
    /// use std::collections::HashMap;
    ///
    /// let mut pooler = SimpleObjectPooler::new("bullets", PoolConfiguration::new().with_capacity(2))
    ///     .with_prototype(Prototype::new("bullet", || ()));
    /// pooler.initialize();
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("scene".to_string(), "arena".to_string());
    ///
    /// let output = pooler.export_metrics_prometheus(Some(&tags)).unwrap();
    /// assert!(output.contains("objectpool_objects_active"));
    /// assert!(output.contains("scene=\"arena\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> prometheus::Result<String> {
        use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Opts, Registry, TextEncoder};

        let registry = Registry::new();
        let opts = |name: &str, help: &str| {
            let mut labels = tags.cloned().unwrap_or_default();
            labels.insert("pool".to_string(), pool_name.to_string());
            Opts::new(name, help).const_labels(labels)
        };

        // Gauge metrics
        for (name, help, value) in [
            ("objectpool_objects_active", "Current active objects", metrics.active_objects),
            ("objectpool_objects_available", "Current available objects", metrics.available_objects),
            ("objectpool_objects_total", "Current number of pooled objects", metrics.pool_size),
        ] {
            let gauge = IntGauge::with_opts(opts(name, help))?;
            gauge.set(value as i64);
            registry.register(Box::new(gauge))?;
        }

        let utilization = Gauge::with_opts(opts("objectpool_utilization", "Pool utilization ratio"))?;
        utilization.set(metrics.utilization);
        registry.register(Box::new(utilization))?;

        // Counter metrics
        for (name, help, value) in [
            ("objectpool_objects_acquired_total", "Successful acquire calls", metrics.total_acquired),
            ("objectpool_objects_released_total", "Total objects released", metrics.total_released),
            ("objectpool_objects_expired_total", "Total objects expired", metrics.total_expired),
            ("objectpool_objects_expanded_total", "Objects created by expansion", metrics.total_expanded),
            ("objectpool_events_exhausted_total", "Pool exhausted events", metrics.exhausted_events),
        ] {
            let counter = IntCounter::with_opts(opts(name, help))?;
            counter.inc_by(value as u64);
            registry.register(Box::new(counter))?;
        }

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Internal metrics tracker
#[derive(Debug, Default)]
pub(crate) struct MetricsTracker {
    pub total_acquired: usize,
    pub total_released: usize,
    pub total_expired: usize,
    pub total_expanded: usize,
    pub exhausted_events: usize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_metrics(&self, active: usize, available: usize, size: usize) -> PoolMetrics {
        let utilization = if size > 0 {
            active as f64 / size as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired,
            total_released: self.total_released,
            total_expired: self.total_expired,
            total_expanded: self.total_expanded,
            exhausted_events: self.exhausted_events,
            active_objects: active,
            available_objects: available,
            pool_size: size,
            utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_of_empty_pool() {
        let metrics = MetricsTracker::new().get_metrics(0, 0, 0);
        assert_eq!(metrics.utilization, 0.0);
        assert_eq!(metrics.export()["utilization"], "0.00");
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_prometheus_export() {
        let mut tracker = MetricsTracker::new();
        tracker.total_acquired = 7;
        tracker.exhausted_events = 2;
        let metrics = tracker.get_metrics(3, 1, 4);

        let output = MetricsExporter::export_prometheus(&metrics, "bullets", None).unwrap();
        assert!(output.contains("# TYPE objectpool_objects_active gauge"));
        assert!(output.contains("objectpool_objects_active{pool=\"bullets\"} 3"));
        assert!(output.contains("objectpool_objects_acquired_total{pool=\"bullets\"} 7"));
        assert!(output.contains("objectpool_events_exhausted_total{pool=\"bullets\"} 2"));
        assert!(output.contains("objectpool_utilization{pool=\"bullets\"} 0.75"));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_prometheus_rejects_invalid_tag_names() {
        let metrics = MetricsTracker::new().get_metrics(0, 0, 0);
        let mut tags = HashMap::new();
        tags.insert("not a label".to_string(), "x".to_string());

        assert!(MetricsExporter::export_prometheus(&metrics, "bullets", Some(&tags)).is_err());
    }
}
