//! Listener bookkeeping shared by the linking providers.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Callback receiving a deep link URL.
pub type UrlHandler = Arc<dyn Fn(&str) + Send + Sync>;

type Remover = Box<dyn FnOnce() + Send>;

/// Handle returned by listener registration.
///
/// [`Subscription::remove`] detaches the listener; calling it again is a
/// no-op. Dropping the handle does not detach.
pub struct Subscription {
    remover: Mutex<Option<Remover>>,
}

impl Subscription {
    pub fn new(remover: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remover: Mutex::new(Some(Box::new(remover))),
        }
    }

    /// A subscription with nothing to detach.
    pub fn noop() -> Self {
        Self {
            remover: Mutex::new(None),
        }
    }

    pub fn remove(&self) {
        // Take first so the remover runs without holding our lock
        let remover = self.remover.lock().take();
        if let Some(remover) = remover {
            remover();
        }
    }

    pub fn is_active(&self) -> bool {
        self.remover.lock().is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// Listener Registry
// =============================================================================

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    listeners: Vec<(u64, UrlHandler)>,
}

/// Set of URL listeners.
///
/// Dispatch calls a snapshot of the listeners taken under the lock, so a
/// listener removed during an in-flight dispatch may still see that one URL.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handler: UrlHandler) -> Subscription {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, handler));
            id
        };

        let state: Weak<Mutex<RegistryState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.lock().listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Call every listener with `url`. Returns how many were called.
    pub fn dispatch(&self, url: &str) -> usize {
        let listeners: Vec<UrlHandler> = self
            .state
            .lock()
            .listeners
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &listeners {
            handler(url);
        }
        listeners.len()
    }

    pub fn len(&self) -> usize {
        self.state.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
