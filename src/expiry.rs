//! Timed deactivation of pooled objects

use crate::errors::{PoolError, PoolResult};
use crate::pooler::SimpleObjectPooler;

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Countdown armed when an object is activated with a lifetime
///
/// The timer is owned by the object it belongs to. Dropping it cancels it.
///
/// # Examples
///
/// ```
/// use unity_tools::ExpiryTimer;
/// use std::time::Duration;
///
/// let mut timer = ExpiryTimer::start(Duration::from_secs(1));
/// assert!(!timer.advance(Duration::from_millis(600)));
/// assert!(timer.advance(Duration::from_millis(400)));
/// assert!(timer.is_elapsed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryTimer {
    duration: Duration,
    remaining: Duration,
}

impl ExpiryTimer {
    /// Start a countdown of exactly `duration`
    pub fn start(duration: Duration) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Advance the countdown, returning true once it has reached zero
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.is_elapsed()
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Drive the expiry countdowns of a shared pooler from a tokio task
///
/// Every `period` the task locks the pooler and advances it by the real
/// time elapsed since the previous tick. Abort the returned handle to stop
/// driving the pool. A zero `period` is rejected with
/// [`PoolError::InvalidTickPeriod`].
///
/// # Examples
///
/// ```
/// use unity_tools::{spawn_expiry_driver, ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};
/// use parking_lot::Mutex;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = PoolConfiguration::new().with_capacity(1);
/// let mut pooler = SimpleObjectPooler::new("bullets", config)
///     .with_prototype(Prototype::new("bullet", || 0u32));
/// pooler.initialize();
///
/// let shared = Arc::new(Mutex::new(pooler));
/// let driver = spawn_expiry_driver(Arc::clone(&shared), Duration::from_millis(16)).unwrap();
/// driver.abort();
/// # }
/// ```
pub fn spawn_expiry_driver<T>(
    pooler: Arc<Mutex<SimpleObjectPooler<T>>>,
    period: Duration,
) -> PoolResult<JoinHandle<()>>
where
    T: Send + 'static,
{
    if period.is_zero() {
        tracing::warn!("expiry driver needs a non-zero tick period");
        return Err(PoolError::InvalidTickPeriod(period));
    }

    Ok(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            interval.tick().await;
            let now = Instant::now();
            let expired = pooler.lock().tick(now - last);
            last = now;

            if expired > 0 {
                tracing::trace!(expired, "expiry driver deactivated objects");
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfiguration;
    use crate::pooler::{ObjectPooler, Prototype};

    #[test]
    fn test_timer_saturates_at_zero() {
        let mut timer = ExpiryTimer::start(Duration::from_millis(100));
        assert!(timer.advance(Duration::from_secs(5)));
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert_eq!(timer.duration(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_expires_active_objects() {
        let config = PoolConfiguration::new()
            .with_capacity(2)
            .with_lifetime(Duration::from_secs(1));
        let mut pooler = SimpleObjectPooler::new("sparks", config)
            .with_prototype(Prototype::new("spark", || 7u8));
        pooler.initialize();
        let id = pooler.spawn().unwrap();

        let shared = Arc::new(Mutex::new(pooler));
        let driver = spawn_expiry_driver(Arc::clone(&shared), Duration::from_millis(100)).unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(shared.lock().item(id).unwrap().is_active());

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert!(!shared.lock().item(id).unwrap().is_active());
        assert_eq!(shared.lock().metrics().total_expired, 1);

        driver.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_rejects_zero_period() {
        let config = PoolConfiguration::new()
            .with_capacity(1)
            .with_lifetime(Duration::from_secs(1));
        let mut pooler = SimpleObjectPooler::new("sparks", config)
            .with_prototype(Prototype::new("spark", || 7u8));
        pooler.initialize();
        let id = pooler.spawn().unwrap();
        let shared = Arc::new(Mutex::new(pooler));

        assert_eq!(
            spawn_expiry_driver(Arc::clone(&shared), Duration::ZERO).err(),
            Some(PoolError::InvalidTickPeriod(Duration::ZERO))
        );

        // The caller can still drive the pool with a valid period
        let driver = spawn_expiry_driver(Arc::clone(&shared), Duration::from_millis(50)).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!shared.lock().item(id).unwrap().is_active());
        assert!(!driver.is_finished());
        driver.abort();
    }
}
