//! Pooled objects and their active/inactive lifecycle

use crate::expiry::ExpiryTimer;

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// Ordinal of an object inside its pool, assigned when it is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a pooled object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    /// Waiting in the pool, free to be acquired
    #[default]
    Inactive,

    /// In use by a consumer
    Active,
}

/// An object owned by a [`Pool`](crate::Pool)
///
/// Objects are never destroyed while their pool lives. Instead of being
/// destroyed they are deactivated, either explicitly with
/// [`release`](Self::release) or automatically when their lifetime runs out.
///
/// # Examples
///
/// ```
/// use unity_tools::{ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};
/// use std::time::Duration;
///
/// let mut pooler = SimpleObjectPooler::new("bullets", PoolConfiguration::new().with_capacity(1))
///     .with_prototype(Prototype::new("bullet", || 0u32));
/// pooler.initialize();
///
/// let bullet = pooler.acquire().unwrap();
/// bullet.set_time_to_live(Duration::from_millis(250));
/// bullet.activate();
/// *bullet.value_mut() += 1;
///
/// assert!(!bullet.advance(Duration::from_millis(200)));
/// assert!(bullet.advance(Duration::from_millis(50)));
/// assert!(!bullet.is_active());
/// ```
pub struct PooledItem<T> {
    value: T,
    id: ItemId,
    name: String,
    state: ItemState,
    time_to_live: Duration,
    timer: Option<ExpiryTimer>,
}

impl<T> PooledItem<T> {
    pub(crate) fn new(value: T, id: ItemId, name: String, time_to_live: Duration) -> Self {
        Self {
            value,
            id,
            name,
            state: ItemState::Inactive,
            time_to_live,
            timer: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ItemState::Active
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Lifetime used the next time the object is activated. Zero disables
    /// automatic deactivation.
    pub fn set_time_to_live(&mut self, time_to_live: Duration) {
        self.time_to_live = time_to_live;
    }

    /// Time left before automatic deactivation, if a countdown is running
    pub fn remaining(&self) -> Option<Duration> {
        self.timer.as_ref().map(ExpiryTimer::remaining)
    }

    /// Mark the object as in use and start its countdown
    ///
    /// Activating an object that is already active does not restart the
    /// countdown.
    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }

        self.state = ItemState::Active;
        if !self.time_to_live.is_zero() {
            self.timer = Some(ExpiryTimer::start(self.time_to_live));
        }
    }

    /// Return the object to the pool, cancelling any pending countdown
    pub fn release(&mut self) {
        self.state = ItemState::Inactive;
        self.timer = None;
    }

    /// Advance the countdown by `elapsed`. Returns true if the object
    /// deactivated itself as a result.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.is_active() {
            return false;
        }

        let expired = self
            .timer
            .as_mut()
            .is_some_and(|timer| timer.advance(elapsed));
        if expired {
            self.release();
        }
        expired
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for PooledItem<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for PooledItem<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("time_to_live", &self.time_to_live)
            .field("remaining", &self.remaining())
            .field("value", &self.value)
            .finish()
    }
}
