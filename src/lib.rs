//! # UnityTools
//!
//! Game-loop utilities: object pooling with timed expiry, a typed event
//! bus, explicitly initialized singletons and component lookup.
//!
//! ## Features
//!
//! - Object pools filled from a prototype, with optional expand-on-demand
//! - Pooled objects that deactivate themselves after a lifetime
//! - Frame-driven expiry through `tick`, or a tokio task driving it
//! - Metrics, health status and Prometheus export
//! - Type-indexed publish/subscribe event bus with configurable strictness
//! - Singletons installed explicitly instead of created on first access
//! - Allocation-free first-component lookup
//!
//! Pools are meant to be driven from a single update loop. Share a pooler
//! behind a mutex if more than one thread touches it.
//!
//! ## Quick Start
//!
//! ```rust
//! use unity_tools::{ObjectPooler, PoolConfiguration, Prototype, SimpleObjectPooler};
//! use std::time::Duration;
//!
//! let config = PoolConfiguration::new()
//!     .with_capacity(3)
//!     .with_expansion(false)
//!     .with_lifetime(Duration::from_secs(1));
//!
//! let mut pooler = SimpleObjectPooler::new("Bullets", config)
//!     .with_prototype(Prototype::new("Bullet", || [0.0f32; 2]));
//! pooler.initialize();
//!
//! let id = pooler.spawn().unwrap();
//! pooler.tick(Duration::from_secs(1));
//! assert!(!pooler.item(id).unwrap().is_active());
//! ```

mod components;
mod config;
mod errors;
mod events;
mod expiry;
mod health;
mod item;
mod metrics;
mod pool;
mod pooler;
mod singleton;

pub use components::{Component, ComponentLookup};
pub use config::{EventBusConfig, PoolConfiguration};
pub use errors::{EventError, EventResult, PoolError, PoolResult, SingletonError, SingletonResult};
pub use events::{EventBus, EventListener, ListenerRegistration};
pub use expiry::{ExpiryTimer, spawn_expiry_driver};
pub use health::HealthStatus;
pub use item::{ItemId, ItemState, PooledItem};
#[cfg(feature = "metrics")]
pub use metrics::MetricsExporter;
pub use metrics::PoolMetrics;
pub use pool::Pool;
pub use pooler::{ObjectPooler, Prototype, SimpleObjectPooler};
pub use singleton::{GenericSingleton, Host, HostState, PersistentSingleton};
