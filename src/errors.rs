//! Error types for pools, the event bus and singletons

use crate::item::ItemId;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("The {0} pooler doesn't have any prototype defined")]
    NotConfigured(String),

    #[error("The {0} pooler was used before it was initialized")]
    NotInitialized(String),

    #[error("Pool is exhausted - all {capacity} objects are active and it cannot expand")]
    Exhausted { capacity: usize },

    #[error("No pooled object with id {0}")]
    UnknownItem(ItemId),

    #[error("Expiry tick period must be greater than zero, got {0:?}")]
    InvalidTickPeriod(Duration),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Removing listener, but the event type \"{0}\" isn't registered")]
    UnknownEventKind(&'static str),

    #[error("Removing listener, but the supplied receiver isn't subscribed to event type \"{0}\"")]
    ListenerNotFound(&'static str),

    #[error("Attempting to send event of type \"{0}\", but no listener for this type has been found")]
    NoListeners(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SingletonError {
    #[error("Singleton {0} was accessed before it was initialized")]
    NotInitialized(&'static str),

    #[error("Singleton {0} is already initialized")]
    AlreadyInitialized(&'static str),

    #[error("Singleton {0} cannot be initialized while the host is not running")]
    HostNotRunning(&'static str),
}

pub type PoolResult<T> = Result<T, PoolError>;

pub type EventResult<T> = Result<T, EventError>;

pub type SingletonResult<T> = Result<T, SingletonError>;
