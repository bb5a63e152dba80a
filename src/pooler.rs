//! Object poolers: the policy layer on top of [`Pool`]

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::item::{ItemId, PooledItem};
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::pool::Pool;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::Dispatch;

/// Template the pool instantiates its objects from
///
/// # Examples
///
/// ```
/// use unity_tools::Prototype;
///
/// let prototype = Prototype::new("Bullet", || vec![0u8; 16]);
/// assert_eq!(prototype.name(), "Bullet");
/// assert_eq!(prototype.create().len(), 16);
/// ```
pub struct Prototype<T> {
    name: String,
    factory: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Prototype<T> {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instantiate one new object
    pub fn create(&self) -> T {
        (self.factory)()
    }
}

impl<T> Clone for Prototype<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Prototype<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Capability shared by every pooling strategy
///
/// The host calls [`initialize`](Self::initialize) on startup and
/// [`teardown`](Self::teardown) when the owning context goes away.
pub trait ObjectPooler<T> {
    /// Name of the pooler, used for the pool name and in log messages
    fn name(&self) -> &str;

    /// Name given to the pool container
    fn pool_name(&self) -> String {
        format!("[ObjectPooler] {}", self.name())
    }

    /// Create and fill the pool
    fn initialize(&mut self) {
        self.fill_pool();
    }

    /// Extension point for strategies that pre-populate their pool
    fn fill_pool(&mut self) {}

    /// Find an object the caller may activate
    ///
    /// The returned object is still inactive; activating it is up to the
    /// caller.
    fn try_acquire(&mut self) -> PoolResult<&mut PooledItem<T>>;

    /// Like [`try_acquire`](Self::try_acquire), mapping every failure to `None`
    fn acquire(&mut self) -> Option<&mut PooledItem<T>> {
        self.try_acquire().ok()
    }

    /// Deactivate an object so it can be acquired again
    fn release(&mut self, id: ItemId) -> PoolResult<()>;

    /// Destroy the pool and every object in it
    fn teardown(&mut self);
}

/// Pooler filling its pool with clones of a single prototype
///
/// # Examples
///
/// ```
/// use unity_tools::{ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};
///
/// let config = PoolConfiguration::new().with_capacity(3).with_expansion(false);
/// let mut pooler = SimpleObjectPooler::new("Enemies", config)
///     .with_prototype(Prototype::new("Goblin", || 100u32));
/// pooler.initialize();
///
/// let goblin = pooler.acquire().unwrap();
/// goblin.activate();
/// assert_eq!(goblin.name(), "Goblin-0");
/// assert_eq!(pooler.pool_name(), "[SimpleObjectPooler] Enemies");
/// ```
pub struct SimpleObjectPooler<T> {
    name: String,
    config: PoolConfiguration,
    prototype: Option<Prototype<T>>,
    pool: Option<Pool<T>>,
    metrics: MetricsTracker,
    logger: Option<Dispatch>,
}

impl<T> SimpleObjectPooler<T> {
    /// Create a pooler without a prototype. Call
    /// [`with_prototype`](Self::with_prototype) before initializing it.
    pub fn new(name: impl Into<String>, config: PoolConfiguration) -> Self {
        Self {
            name: name.into(),
            config,
            prototype: None,
            pool: None,
            metrics: MetricsTracker::new(),
            logger: None,
        }
    }

    pub fn with_prototype(mut self, prototype: Prototype<T>) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Send this pooler's log output to `logger` instead of the ambient
    /// tracing subscriber
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn set_prototype(&mut self, prototype: Prototype<T>) {
        self.prototype = Some(prototype);
    }

    pub fn prototype(&self) -> Option<&Prototype<T>> {
        self.prototype.as_ref()
    }

    pub fn config(&self) -> &PoolConfiguration {
        &self.config
    }

    /// The pool, once [`initialize`](ObjectPooler::initialize) has created it
    pub fn pool(&self) -> Option<&Pool<T>> {
        self.pool.as_ref()
    }

    pub fn item(&self, id: ItemId) -> Option<&PooledItem<T>> {
        self.pool.as_ref()?.get(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut PooledItem<T>> {
        self.pool.as_mut()?.get_mut(id)
    }

    /// Activate an object, starting its countdown if it has a lifetime
    pub fn activate(&mut self, id: ItemId) -> PoolResult<()> {
        self.item_mut(id).ok_or(PoolError::UnknownItem(id))?.activate();
        Ok(())
    }

    /// Acquire an object and activate it in one step
    pub fn spawn(&mut self) -> PoolResult<ItemId> {
        let item = self.try_acquire()?;
        item.activate();
        Ok(item.id())
    }

    /// Advance every running countdown by `elapsed`
    ///
    /// Returns how many objects deactivated themselves.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let Some(pool) = self.pool.as_mut() else {
            return 0;
        };

        let expired = pool.tick(elapsed);
        if expired > 0 {
            self.metrics.total_expired += expired;
            log_with(self.logger.as_ref(), || {
                tracing::debug!(pooler = %self.name, expired, "objects reached the end of their lifetime");
            });
        }
        expired
    }

    /// Get pool metrics
    pub fn metrics(&self) -> PoolMetrics {
        let (active, size) = self.counts();
        self.metrics.get_metrics(active, size - active, size)
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus format
    #[cfg(feature = "metrics")]
    pub fn export_metrics_prometheus(
        &self,
        tags: Option<&HashMap<String, String>>,
    ) -> prometheus::Result<String> {
        crate::metrics::MetricsExporter::export_prometheus(&self.metrics(), &self.name, tags)
    }

    /// Get health status
    pub fn health_status(&self) -> HealthStatus {
        let (active, size) = self.counts();
        HealthStatus::new(size - active, active, size, self.config.can_expand)
    }

    fn counts(&self) -> (usize, usize) {
        self.pool
            .as_ref()
            .map_or((0, 0), |pool| (pool.active_count(), pool.len()))
    }
}

impl<T> ObjectPooler<T> for SimpleObjectPooler<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn pool_name(&self) -> String {
        format!("[SimpleObjectPooler] {}", self.name)
    }

    /// Fill the pool with `capacity` objects built from the prototype
    ///
    /// Without a prototype this silently does nothing.
    fn fill_pool(&mut self) {
        let Some(prototype) = self.prototype.as_ref() else {
            return;
        };

        let mut pool = Pool::new(self.pool_name());
        pool.fill(self.config.capacity, Some(prototype), self.config.lifetime);

        log_with(self.logger.as_ref(), || {
            tracing::debug!(pool = %pool.name(), size = pool.len(), "object pool filled");
        });
        self.pool = Some(pool);
    }

    fn try_acquire(&mut self) -> PoolResult<&mut PooledItem<T>> {
        let Self {
            name,
            config,
            prototype,
            pool,
            metrics,
            logger,
        } = self;

        let (pool, prototype) = match (pool.as_mut(), prototype.as_ref()) {
            (Some(pool), Some(prototype)) => (pool, prototype),
            (None, Some(_)) => {
                log_with(logger.as_ref(), || {
                    tracing::warn!(pooler = %name, "The {} ObjectPooler was used before it was initialized", name);
                });
                return Err(PoolError::NotInitialized(name.clone()));
            }
            (_, None) => {
                log_with(logger.as_ref(), || {
                    tracing::warn!(pooler = %name, "The {} ObjectPooler doesn't have any prototype defined", name);
                });
                return Err(PoolError::NotConfigured(name.clone()));
            }
        };

        let id = match pool.first_inactive() {
            Some(id) => id,
            None if config.can_expand => {
                let id = pool.append(prototype.create(), prototype.name(), config.lifetime);
                metrics.total_expanded += 1;
                log_with(logger.as_ref(), || {
                    tracing::debug!(pool = %pool.name(), size = pool.len(), "object pool expanded");
                });
                id
            }
            None => {
                metrics.exhausted_events += 1;
                return Err(PoolError::Exhausted {
                    capacity: pool.len(),
                });
            }
        };

        // Counts calls, not distinct objects
        metrics.total_acquired += 1;
        pool.get_mut(id).ok_or(PoolError::UnknownItem(id))
    }

    fn release(&mut self, id: ItemId) -> PoolResult<()> {
        let item = self.item_mut(id).ok_or(PoolError::UnknownItem(id))?;
        if item.is_active() {
            item.release();
            self.metrics.total_released += 1;
        }
        Ok(())
    }

    /// Idempotent: tearing down a pooler without a pool does nothing
    fn teardown(&mut self) {
        if let Some(pool) = self.pool.take() {
            log_with(self.logger.as_ref(), || {
                tracing::debug!(pool = %pool.name(), size = pool.len(), "object pool destroyed");
            });
        }
    }
}

/// Run `log` against the injected logger, or the ambient one if none was given
fn log_with(logger: Option<&Dispatch>, log: impl FnOnce()) {
    match logger {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, log),
        None => log(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }

        fn dispatch(&self) -> Dispatch {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::WARN)
                .finish();
            Dispatch::new(subscriber)
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn pooler(capacity: usize, can_expand: bool) -> SimpleObjectPooler<usize> {
        let counter = AtomicUsize::new(0);
        let config = PoolConfiguration::new()
            .with_capacity(capacity)
            .with_expansion(can_expand);
        let mut pooler = SimpleObjectPooler::new("Projectiles", config).with_prototype(
            Prototype::new("Arrow", move || counter.fetch_add(1, Ordering::Relaxed)),
        );
        pooler.initialize();
        pooler
    }

    #[test]
    fn test_fill_creates_capacity_inactive_objects() {
        let pooler = pooler(5, false);
        let pool = pooler.pool().unwrap();

        assert_eq!(pool.len(), 5);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.name(), "[SimpleObjectPooler] Projectiles");
    }

    #[test]
    fn test_acquire_does_not_return_active_objects() {
        let mut pooler = pooler(4, false);
        let mut seen = HashSet::new();

        for _ in 0..4 {
            let id = pooler.spawn().unwrap();
            assert!(seen.insert(id));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_acquire_without_activation_returns_same_object() {
        let mut pooler = pooler(2, false);
        let first = pooler.acquire().unwrap().id();
        let second = pooler.acquire().unwrap().id();
        assert_eq!(first, second);
        assert!(!pooler.item(first).unwrap().is_active());
    }

    #[test]
    fn test_exhausted_pool_without_expansion() {
        let mut pooler = pooler(3, false);
        let ids: Vec<_> = (0..3).map(|_| pooler.spawn().unwrap()).collect();

        assert!(pooler.acquire().is_none());
        assert_eq!(
            pooler.try_acquire().err(),
            Some(PoolError::Exhausted { capacity: 3 })
        );

        pooler.release(ids[1]).unwrap();
        assert_eq!(pooler.acquire().unwrap().id(), ids[1]);
        assert_eq!(pooler.pool().unwrap().len(), 3);
        assert_eq!(pooler.metrics().exhausted_events, 2);
    }

    #[test]
    fn test_expanding_pool_grows_by_one() {
        let mut pooler = pooler(2, true);
        pooler.spawn().unwrap();
        pooler.spawn().unwrap();

        let extra = pooler.acquire().unwrap();
        assert_eq!(extra.id().index(), 2);
        assert_eq!(extra.name(), "Arrow-2");
        assert_eq!(*extra.value(), 2);
        assert!(!extra.is_active());

        assert_eq!(pooler.pool().unwrap().len(), 3);
        assert_eq!(pooler.metrics().total_expanded, 1);
    }

    #[test]
    fn test_lifetime_from_configuration() {
        let config = PoolConfiguration::new()
            .with_capacity(1)
            .with_lifetime(Duration::from_secs(2));
        let mut pooler =
            SimpleObjectPooler::new("Fx", config).with_prototype(Prototype::new("Smoke", || ()));
        pooler.initialize();

        let id = pooler.spawn().unwrap();
        assert_eq!(pooler.tick(Duration::from_secs(1)), 0);
        assert_eq!(pooler.tick(Duration::from_secs(1)), 1);
        assert!(!pooler.item(id).unwrap().is_active());

        // Released before expiry: no late deactivation
        pooler.activate(id).unwrap();
        pooler.tick(Duration::from_millis(500));
        pooler.release(id).unwrap();
        pooler.activate(id).unwrap();
        assert_eq!(pooler.tick(Duration::from_millis(1600)), 0);
        assert!(pooler.item(id).unwrap().is_active());
    }

    #[test]
    fn test_missing_prototype_is_silent_on_fill_and_warns_on_acquire() {
        let log = CapturedLog::default();
        let mut pooler: SimpleObjectPooler<u8> =
            SimpleObjectPooler::new("Orphan", PoolConfiguration::default())
                .with_logger(log.dispatch());

        pooler.initialize();
        assert!(pooler.pool().is_none());
        assert!(log.contents().is_empty());

        assert_eq!(
            pooler.try_acquire().err(),
            Some(PoolError::NotConfigured("Orphan".to_string()))
        );
        assert!(log.contents().contains("doesn't have any prototype defined"));
    }

    #[test]
    fn test_acquire_before_initialize() {
        let log = CapturedLog::default();
        let mut pooler = SimpleObjectPooler::new("Late", PoolConfiguration::default())
            .with_prototype(Prototype::new("Thing", || 1))
            .with_logger(log.dispatch());

        assert_eq!(
            pooler.try_acquire().err(),
            Some(PoolError::NotInitialized("Late".to_string()))
        );
        assert!(log.contents().contains("The Late ObjectPooler was used before it was initialized"));
        assert!(!log.contents().contains("doesn't have any prototype defined"));
    }

    #[test]
    fn test_acquired_counts_calls() {
        let mut pooler = pooler(2, false);
        pooler.acquire().unwrap();
        pooler.acquire().unwrap();
        assert_eq!(pooler.metrics().total_acquired, 2);
        assert_eq!(pooler.metrics().active_objects, 0);

        pooler.spawn().unwrap();
        assert_eq!(pooler.metrics().total_acquired, 3);
        assert_eq!(pooler.metrics().active_objects, 1);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut pooler = pooler(3, true);
        let id = pooler.spawn().unwrap();

        pooler.teardown();
        assert!(pooler.pool().is_none());
        assert_eq!(pooler.release(id), Err(PoolError::UnknownItem(id)));
        pooler.teardown();

        pooler.initialize();
        assert_eq!(pooler.pool().unwrap().len(), 3);
    }

    #[test]
    fn test_metrics_and_health() {
        let mut pooler = pooler(4, false);
        let a = pooler.spawn().unwrap();
        pooler.spawn().unwrap();
        pooler.release(a).unwrap();
        pooler.release(a).unwrap();

        let metrics = pooler.metrics();
        assert_eq!(metrics.total_acquired, 2);
        assert_eq!(metrics.total_released, 1);
        assert_eq!(metrics.active_objects, 1);
        assert_eq!(metrics.available_objects, 3);
        assert_eq!(pooler.export_metrics()["pool_size"], "4");

        let health = pooler.health_status();
        assert!(health.is_healthy());
        assert_eq!(health.active_objects, 1);
    }

    struct Noop;

    impl ObjectPooler<u8> for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn try_acquire(&mut self) -> PoolResult<&mut PooledItem<u8>> {
            Err(PoolError::NotConfigured(self.name().to_string()))
        }

        fn release(&mut self, id: ItemId) -> PoolResult<()> {
            Err(PoolError::UnknownItem(id))
        }

        fn teardown(&mut self) {}
    }

    #[test]
    fn test_trait_defaults() {
        let mut pooler = Noop;
        pooler.initialize();
        assert_eq!(pooler.pool_name(), "[ObjectPooler] noop");
        assert!(pooler.acquire().is_none());
    }
}
