//! Typed callback registries.

use std::fmt;

/// Identifies one registration across every registry of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Boxed subscriber callback.
pub type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// Ordered subscriber list for one event type.
///
/// Delivery follows registration order. Registering the same closure twice
/// gives two independent subscriptions.
pub struct Subscribers<T> {
    entries: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.entries.len()).finish()
    }
}

impl<T> Subscribers<T> {
    /// Append a subscriber.
    pub fn subscribe(&mut self, id: SubscriptionId, callback: Callback<T>) {
        self.entries.push((id, callback));
    }

    /// Remove a subscriber. Returns false if `id` is not registered here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Call every subscriber with `event`, in registration order.
    pub fn notify(&mut self, event: &T) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn delivers_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = Subscribers::<u32>::default();
        for tag in ["a", "b", "c"] {
            let log = Arc::clone(&log);
            subscribers.subscribe(
                SubscriptionId::new(subscribers.len() as u64),
                Box::new(move |n| log.lock().unwrap().push(format!("{tag}{n}"))),
            );
        }

        subscribers.notify(&1);
        subscribers.notify(&2);

        assert_eq!(*log.lock().unwrap(), vec!["a1", "b1", "c1", "a2", "b2", "c2"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_entry() {
        let count = Arc::new(Mutex::new(0));
        let mut subscribers = Subscribers::<()>::default();
        for id in 0..2 {
            let count = Arc::clone(&count);
            subscribers.subscribe(SubscriptionId::new(id), Box::new(move |()| *count.lock().unwrap() += 1));
        }

        assert!(subscribers.unsubscribe(SubscriptionId::new(0)));
        assert!(!subscribers.unsubscribe(SubscriptionId::new(0)));
        subscribers.notify(&());

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
