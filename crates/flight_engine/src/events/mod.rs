//! One-shot multicast notifications
//!
//! A [`Signal`] carries a list of listeners that are all invoked, in
//! subscription order, the first time the signal fires. Later fires are
//! ignored and so are subscriptions made after the fact; an entity is only
//! destroyed once.

use std::fmt;

type Listener<T> = Box<dyn FnOnce(&T)>;

/// One-shot multicast signal
pub struct Signal<T> {
    listeners: Vec<Listener<T>>,
    fired: bool,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    /// Create a signal with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            fired: false,
        }
    }

    /// Register a listener; a no-op once the signal has fired
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnOnce(&T) + 'static,
    {
        if self.fired {
            return;
        }
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every listener once with `payload`
    ///
    /// Returns false if the signal had already fired.
    pub fn fire(&mut self, payload: &T) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        for listener in self.listeners.drain(..) {
            listener(payload);
        }
        true
    }

    /// Whether the signal has fired
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Number of listeners waiting for the signal
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .field("fired", &self.fired)
            .finish()
    }
}
