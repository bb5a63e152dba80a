//! Typed publish/subscribe event bus

use crate::config::EventBusConfig;
use crate::errors::{EventError, EventResult};

use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

/// Receiver of events of type `E`
///
/// Closures taking `&E` are listeners too.
pub trait EventListener<E>: Send + Sync {
    fn on_event(&self, event: &E);
}

impl<E, F> EventListener<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        self(event)
    }
}

struct Subscription {
    /// Address of the listener, used for identity comparisons
    key: usize,
    /// An `Arc<dyn EventListener<E>>` for the kind the subscription is stored under
    listener: Arc<dyn Any + Send + Sync>,
}

fn listener_key<E: 'static>(listener: &Arc<dyn EventListener<E>>) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}

/// Registry routing events to the listeners subscribed to their type
///
/// Each application or test context owns its own bus; listeners of one
/// bus never see events published on another.
///
/// # Examples
///
/// ```
/// use unity_tools::{EventBus, EventListener};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// struct ScoreChanged(u32);
///
/// let bus = EventBus::new();
/// let total = Arc::new(AtomicU32::new(0));
///
/// let sink = Arc::clone(&total);
/// let listener: Arc<dyn EventListener<ScoreChanged>> =
///     Arc::new(move |event: &ScoreChanged| { sink.fetch_add(event.0, Ordering::Relaxed); });
///
/// bus.subscribe(Arc::clone(&listener));
/// bus.subscribe(Arc::clone(&listener));
/// assert_eq!(bus.publish(ScoreChanged(5)).unwrap(), 1);
/// assert_eq!(total.load(Ordering::Relaxed), 5);
/// ```
#[derive(Default)]
pub struct EventBus {
    subscribers: DashMap<TypeId, Vec<Subscription>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a bus that silently ignores unknown listeners and unheard events
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            subscribers: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Subscribe `listener` to events of type `E`
    ///
    /// Returns false if this exact listener was already subscribed.
    pub fn subscribe<E: 'static>(&self, listener: Arc<dyn EventListener<E>>) -> bool {
        let key = listener_key(&listener);
        let mut subscriptions = self.subscribers.entry(TypeId::of::<E>()).or_default();

        if subscriptions.iter().any(|subscription| subscription.key == key) {
            return false;
        }

        subscriptions.push(Subscription {
            key,
            listener: Arc::new(listener),
        });
        true
    }

    /// Remove `listener` from the subscribers of `E`
    ///
    /// Removing the last listener of a type forgets the type entirely.
    /// Unknown types and listeners are ignored unless the bus is configured
    /// with `strict_unsubscribe`.
    pub fn unsubscribe<E: 'static>(&self, listener: &Arc<dyn EventListener<E>>) -> EventResult<()> {
        let key = listener_key(listener);
        let kind = TypeId::of::<E>();

        let Some(mut subscriptions) = self.subscribers.get_mut(&kind) else {
            return self.report(EventError::UnknownEventKind(type_name::<E>()));
        };

        let Some(position) = subscriptions.iter().position(|s| s.key == key) else {
            drop(subscriptions);
            return self.report(EventError::ListenerNotFound(type_name::<E>()));
        };

        subscriptions.remove(position);
        let now_empty = subscriptions.is_empty();
        drop(subscriptions);

        if now_empty {
            self.subscribers.remove_if(&kind, |_, subscriptions| subscriptions.is_empty());
        }
        Ok(())
    }

    /// Deliver `event` to every listener of `E`, in subscription order
    ///
    /// Returns how many listeners received it. The listener list is
    /// captured before delivery, so listeners (un)subscribing while the
    /// event is delivered only affect later publishes.
    pub fn publish<E: 'static>(&self, event: E) -> EventResult<usize> {
        let snapshot: Vec<Arc<dyn Any + Send + Sync>> = match self.subscribers.get(&TypeId::of::<E>()) {
            Some(subscriptions) => subscriptions
                .iter()
                .map(|subscription| Arc::clone(&subscription.listener))
                .collect(),
            None => Vec::new(),
        };

        if snapshot.is_empty() {
            if self.config.require_listener {
                return Err(EventError::NoListeners(type_name::<E>()));
            }
            return Ok(0);
        }

        let mut delivered = 0;
        for listener in &snapshot {
            if let Some(listener) = listener.downcast_ref::<Arc<dyn EventListener<E>>>() {
                listener.on_event(&event);
                delivered += 1;
            }
        }

        tracing::trace!(event = type_name::<E>(), delivered, "event published");
        Ok(delivered)
    }

    /// Number of listeners subscribed to `E`
    pub fn listener_count<E: 'static>(&self) -> usize {
        self.subscribers
            .get(&TypeId::of::<E>())
            .map_or(0, |subscriptions| subscriptions.len())
    }

    pub fn has_listeners<E: 'static>(&self) -> bool {
        self.listener_count::<E>() > 0
    }

    /// Remove every subscription of every event type
    pub fn clear(&self) {
        self.subscribers.clear();
    }

    fn report(&self, error: EventError) -> EventResult<()> {
        if self.config.strict_unsubscribe {
            Err(error)
        } else {
            Ok(())
        }
    }
}

/// Lets a shared listener (un)register itself
///
/// # Examples
///
/// ```
/// use unity_tools::{EventBus, EventListener, ListenerRegistration};
/// use std::sync::Arc;
///
/// struct Died;
/// struct Hud;
///
/// impl EventListener<Died> for Hud {
///     fn on_event(&self, _: &Died) {}
/// }
///
/// let bus = EventBus::new();
/// let hud = Arc::new(Hud);
///
/// ListenerRegistration::<Died>::start_listening(&hud, &bus);
/// assert_eq!(bus.listener_count::<Died>(), 1);
/// ListenerRegistration::<Died>::stop_listening(&hud, &bus).unwrap();
/// assert_eq!(bus.listener_count::<Died>(), 0);
/// ```
pub trait ListenerRegistration<E> {
    fn start_listening(&self, bus: &EventBus) -> bool;

    fn stop_listening(&self, bus: &EventBus) -> EventResult<()>;
}

impl<E, L> ListenerRegistration<E> for Arc<L>
where
    E: 'static,
    L: EventListener<E> + 'static,
{
    fn start_listening(&self, bus: &EventBus) -> bool {
        let listener: Arc<dyn EventListener<E>> = self.clone();
        bus.subscribe(listener)
    }

    fn stop_listening(&self, bus: &EventBus) -> EventResult<()> {
        let listener: Arc<dyn EventListener<E>> = self.clone();
        bus.unsubscribe(&listener)
    }
}
