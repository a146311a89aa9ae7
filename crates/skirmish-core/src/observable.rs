//! Change notification primitives
//!
//! - `Signal<T>` - a subscriber list that is notified with a value
//! - `Observable<T>` - a current value plus a `Signal<T>` fired on every `set`
//!
//! Subscribers run synchronously, in registration order, on the thread that
//! performed the mutation. There is no change suppression: setting a value
//! equal to the current one still notifies every subscriber.
//!
//! Subscriptions are never released implicitly. A subscriber that captures
//! host state must be removed with `unsubscribe` before that state goes away.

use std::fmt;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

type Callback<T> = Box<dyn FnMut(&T)>;

/// A list of subscribers notified with a value on `emit`
pub struct Signal<T> {
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    /// Create a signal with no subscribers
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a subscriber; it is called after all previously registered ones
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscribers.iter().position(|(sid, _)| *sid == id) {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Notify every current subscriber
    pub fn emit(&mut self, value: &T) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(value);
        }
    }

    /// Number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drop every subscriber
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// An observable value
pub struct Observable<T> {
    value: T,
    changed: Signal<T>,
}

impl<T> Observable<T> {
    /// Create with an initial value
    pub fn new(value: T) -> Self {
        Self {
            value,
            changed: Signal::new(),
        }
    }

    /// Get the current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify every subscriber with it
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.changed.emit(&self.value);
    }

    /// Register a change subscriber
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.changed.subscribe(callback)
    }

    /// Remove a change subscriber
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }

    /// Number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.changed.subscriber_count()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.changed.subscriber_count())
            .finish()
    }
}
