//! Explicitly initialized single-instance holders

use crate::errors::{SingletonError, SingletonResult};

use parking_lot::RwLock;
use std::any::type_name;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The host's "is the application running" check
pub trait Host {
    fn is_playing(&self) -> bool;
}

/// Running flag the host flips on startup and shutdown
#[derive(Debug, Default)]
pub struct HostState {
    playing: AtomicBool,
}

impl HostState {
    pub fn new(playing: bool) -> Self {
        Self {
            playing: AtomicBool::new(playing),
        }
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }
}

impl Host for HostState {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }
}

/// Holder for one instance of `T`, replaced by every later [`awake`](Self::awake)
///
/// There is no auto-creation: reading the instance before it was installed
/// is an error.
///
/// # Examples
///
/// ```
/// use unity_tools::{GenericSingleton, HostState, SingletonError};
///
/// struct AudioMixer { volume: f32 }
///
/// let host = HostState::new(true);
/// let mixer = GenericSingleton::new();
/// assert!(matches!(mixer.instance(), Err(SingletonError::NotInitialized(_))));
///
/// mixer.awake(AudioMixer { volume: 0.5 }, &host).unwrap();
/// mixer.awake(AudioMixer { volume: 0.8 }, &host).unwrap();
/// assert_eq!(mixer.instance().unwrap().volume, 0.8);
/// ```
pub struct GenericSingleton<T> {
    instance: RwLock<Option<Arc<T>>>,
}

impl<T> GenericSingleton<T> {
    pub const fn new() -> Self {
        Self {
            instance: parking_lot::const_rwlock(None),
        }
    }

    /// Install `value` as the instance, replacing any previous one
    ///
    /// Ignored while the host is not running.
    pub fn awake(&self, value: T, host: &impl Host) -> SingletonResult<Arc<T>> {
        if !host.is_playing() {
            return Err(SingletonError::HostNotRunning(type_name::<T>()));
        }

        let instance = Arc::new(value);
        *self.instance.write() = Some(Arc::clone(&instance));
        Ok(instance)
    }

    pub fn instance(&self) -> SingletonResult<Arc<T>> {
        self.instance
            .read()
            .clone()
            .ok_or(SingletonError::NotInitialized(type_name::<T>()))
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.read().is_some()
    }

    /// Remove the instance, returning it
    pub fn reset(&self) -> Option<Arc<T>> {
        self.instance.write().take()
    }
}

impl<T> Default for GenericSingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Holder whose first installed instance persists for the whole application
///
/// Later instances are rejected and dropped.
///
/// # Examples
///
/// ```
/// use unity_tools::{HostState, PersistentSingleton, SingletonError};
///
/// let host = HostState::new(true);
/// let settings = PersistentSingleton::new();
///
/// settings.awake("first", &host).unwrap();
/// assert!(matches!(
///     settings.awake("second", &host),
///     Err(SingletonError::AlreadyInitialized(_))
/// ));
/// assert_eq!(*settings.instance().unwrap(), "first");
/// ```
pub struct PersistentSingleton<T> {
    instance: RwLock<Option<Arc<T>>>,
}

impl<T> PersistentSingleton<T> {
    pub const fn new() -> Self {
        Self {
            instance: parking_lot::const_rwlock(None),
        }
    }

    /// Install `value` unless an instance already exists
    pub fn awake(&self, value: T, host: &impl Host) -> SingletonResult<Arc<T>> {
        if !host.is_playing() {
            return Err(SingletonError::HostNotRunning(type_name::<T>()));
        }

        let mut slot = self.instance.write();
        if slot.is_some() {
            tracing::debug!(singleton = type_name::<T>(), "duplicate instance destroyed");
            return Err(SingletonError::AlreadyInitialized(type_name::<T>()));
        }

        let instance = Arc::new(value);
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    pub fn instance(&self) -> SingletonResult<Arc<T>> {
        self.instance
            .read()
            .clone()
            .ok_or(SingletonError::NotInitialized(type_name::<T>()))
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.read().is_some()
    }

    pub fn reset(&self) -> Option<Arc<T>> {
        self.instance.write().take()
    }
}

impl<T> Default for PersistentSingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}
