//! Connection events and liveness tracking
//!
//! The transport side of each client (MongoDB heartbeat callbacks, the Redis
//! connection task) publishes [`ConnectionEvent`]s on a [`ConnectionEvents`]
//! bus. Observers registered on the bus react to them; the built-in
//! [`LivenessTracker`] turns them into a single eventually-consistent bit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

/// A change in connection state reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection was (re)established or a heartbeat succeeded
    Connected,
    /// The transport reported a connection failure
    Error { message: String },
}

impl ConnectionEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ConnectionEvent::Error {
            message: message.into(),
        }
    }
}

/// Listener for connection-state notifications
///
/// Called from driver callback contexts and background tasks, so
/// implementations must be cheap and must not block.
pub trait ConnectionObserver: Send + Sync {
    fn on_event(&self, event: &ConnectionEvent);
}

/// Fan-out of connection events to registered observers
///
/// Observers are permanent: there is no unsubscribe.
#[derive(Clone, Default)]
pub struct ConnectionEvents {
    observers: Arc<RwLock<Vec<Arc<dyn ConnectionObserver>>>>,
}

impl ConnectionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for all future events
    pub fn subscribe(&self, observer: Arc<dyn ConnectionObserver>) {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        observers.push(observer);
    }

    /// Deliver an event to every observer, in registration order
    ///
    /// Observers run without the lock held, so they may subscribe others.
    /// Those only see later events.
    pub fn emit(&self, event: ConnectionEvent) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for observer in &observers {
            observer.on_event(&event);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .map(|observers| observers.len())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ConnectionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionEvents")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Shared liveness bit
///
/// Clones observe the same flag. Reads never block and never fail.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    /// Not alive until the first `Connected` event
    pub fn pending() -> Self {
        Self::with_initial(false)
    }

    /// Alive until the first `Error` event
    pub fn optimistic() -> Self {
        Self::with_initial(true)
    }

    fn with_initial(alive: bool) -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(alive)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Store a new value, returning the previous one
    pub fn set(&self, alive: bool) -> bool {
        self.alive.swap(alive, Ordering::AcqRel)
    }
}

/// Observer that logs connection errors and keeps a [`Liveness`] flag current
#[derive(Debug, Clone)]
pub struct LivenessTracker {
    target: &'static str,
    liveness: Liveness,
}

impl LivenessTracker {
    /// `target` names the backing store in log lines (e.g. "mongodb", "redis")
    pub fn new(target: &'static str, liveness: Liveness) -> Self {
        Self { target, liveness }
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }
}

impl ConnectionObserver for LivenessTracker {
    fn on_event(&self, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => {
                if !self.liveness.set(true) {
                    info!(store = self.target, "Connection established");
                }
            }
            ConnectionEvent::Error { message } => {
                if self.liveness.set(false) {
                    error!(store = self.target, error = %message, "Connection failed");
                } else {
                    debug!(store = self.target, error = %message, "Connection still failing");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<ConnectionEvent>>,
    }

    impl ConnectionObserver for Recorder {
        fn on_event(&self, event: &ConnectionEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_liveness_initial_values() {
        assert!(!Liveness::pending().is_alive());
        assert!(Liveness::optimistic().is_alive());
    }

    #[test]
    fn test_liveness_clones_share_state() {
        let liveness = Liveness::pending();
        let clone = liveness.clone();
        assert!(!clone.set(true));
        assert!(liveness.is_alive());
    }

    #[test]
    fn test_tracker_flips_on_error_and_reconnect() {
        let tracker = LivenessTracker::new("redis", Liveness::optimistic());

        tracker.on_event(&ConnectionEvent::error("connection refused"));
        assert!(!tracker.liveness().is_alive());

        // Repeated failures keep it down
        tracker.on_event(&ConnectionEvent::error("connection refused"));
        assert!(!tracker.liveness().is_alive());

        tracker.on_event(&ConnectionEvent::Connected);
        assert!(tracker.liveness().is_alive());
    }

    #[test]
    fn test_events_fan_out_in_order() {
        let events = ConnectionEvents::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        events.subscribe(first.clone());
        events.subscribe(second.clone());
        assert_eq!(events.observer_count(), 2);

        events.emit(ConnectionEvent::error("boom"));
        events.emit(ConnectionEvent::Connected);

        let expected = vec![ConnectionEvent::error("boom"), ConnectionEvent::Connected];
        assert_eq!(*first.seen.lock().unwrap(), expected);
        assert_eq!(*second.seen.lock().unwrap(), expected);
    }

    #[test]
    fn test_observer_can_subscribe_from_callback() {
        struct Chaining {
            events: ConnectionEvents,
            late: Arc<Recorder>,
        }

        impl ConnectionObserver for Chaining {
            fn on_event(&self, _event: &ConnectionEvent) {
                self.events.subscribe(self.late.clone());
            }
        }

        let events = ConnectionEvents::new();
        let late = Arc::new(Recorder::default());
        events.subscribe(Arc::new(Chaining {
            events: events.clone(),
            late: late.clone(),
        }));

        events.emit(ConnectionEvent::Connected);
        assert_eq!(events.observer_count(), 2);
        assert!(late.seen.lock().unwrap().is_empty());

        events.emit(ConnectionEvent::error("boom"));
        assert_eq!(
            *late.seen.lock().unwrap(),
            vec![ConnectionEvent::error("boom")]
        );
    }

    #[test]
    fn test_emit_without_observers_is_noop() {
        let events = ConnectionEvents::new();
        events.emit(ConnectionEvent::Connected);
        assert_eq!(events.observer_count(), 0);
    }

    #[test]
    fn test_concurrent_events_settle_on_last_write() {
        let liveness = Liveness::optimistic();
        let events = ConnectionEvents::new();
        events.subscribe(Arc::new(LivenessTracker::new("redis", liveness.clone())));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let events = events.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        if i % 2 == 0 {
                            events.emit(ConnectionEvent::Connected);
                        } else {
                            events.emit(ConnectionEvent::error("flaky"));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        events.emit(ConnectionEvent::error("final"));
        assert!(!liveness.is_alive());
    }
}
