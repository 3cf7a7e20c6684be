//! Controlled/uncontrolled value reconciliation.
//!
//! A [`Controllable`] either mirrors a value owned by the consumer
//! ("controlled") or keeps its own copy ("uncontrolled"). Writes always go
//! through [`Controllable::set`], which notifies the change callback when the
//! proposed value differs from the last observed snapshot, in both modes.

use crate::callback::CallbackWith;

pub struct Controllable<T> {
    controlled: Option<T>,
    internal: T,
    /// Last value either committed or observed from the consumer. Repeated
    /// proposals of the same value between two syncs notify only once.
    last: T,
    on_change: Option<CallbackWith<T>>,
}

impl<T: Clone + PartialEq> Controllable<T> {
    pub fn new(controlled: Option<T>, initial: T, on_change: Option<CallbackWith<T>>) -> Self {
        let last = controlled.clone().unwrap_or_else(|| initial.clone());
        Controllable {
            controlled,
            internal: initial,
            last,
            on_change,
        }
    }

    pub fn get(&self) -> &T {
        self.controlled.as_ref().unwrap_or(&self.internal)
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// Propose a new value.
    ///
    /// Uncontrolled stores adopt it immediately; controlled stores keep
    /// mirroring the consumer's value. Returns whether the change callback
    /// fired.
    pub fn set(&mut self, next: T) -> bool {
        if self.controlled.is_none() {
            self.internal = next.clone();
        }

        if next == self.last {
            return false;
        }

        self.last = next.clone();
        if let Some(on_change) = &self.on_change {
            on_change.call(next);
        }
        true
    }

    /// Re-supply the consumer-owned value, as a host does on every render.
    pub fn sync_controlled(&mut self, controlled: Option<T>) {
        if controlled.is_none()
            && let Some(previous) = self.controlled.take()
        {
            // Dropping control keeps the last value the consumer showed.
            self.internal = previous;
        }
        self.controlled = controlled;
        self.last = self.get().clone();
    }

    /// Replace the change callback; the latest handler is always the one invoked.
    pub fn set_on_change(&mut self, on_change: Option<CallbackWith<T>>) {
        self.on_change = on_change;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, CallbackWith<T>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, CallbackWith::new(move |v: T| sink.borrow_mut().push(v)))
    }

    #[test]
    fn test_uncontrolled_stores_and_notifies() {
        let (seen, cb) = recorder();
        let mut store = Controllable::new(None, 1, Some(cb));

        assert!(store.set(2));
        assert_eq!(*store.get(), 2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_controlled_mirrors_consumer_but_still_notifies() {
        let (seen, cb) = recorder();
        let mut store = Controllable::new(Some(5), 0, Some(cb));

        assert!(store.set(7));
        assert_eq!(*store.get(), 5, "controlled value must not change internally");
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn test_repeated_proposals_notify_once_until_resync() {
        let (seen, cb) = recorder();
        let mut store = Controllable::new(Some(false), false, Some(cb));

        store.set(true);
        store.set(true);
        assert_eq!(seen.borrow().len(), 1);

        // Consumer re-renders without accepting the change.
        store.sync_controlled(Some(false));
        store.set(true);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_same_value_does_not_notify() {
        let (seen, cb) = recorder();
        let mut store = Controllable::new(None, 3, Some(cb));

        assert!(!store.set(3));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_releasing_control_keeps_last_controlled_value() {
        let mut store: Controllable<i32> = Controllable::new(Some(9), 0, None);
        store.sync_controlled(None);

        assert!(!store.is_controlled());
        assert_eq!(*store.get(), 9);
    }

    #[test]
    fn test_latest_callback_wins() {
        let (old_seen, old_cb) = recorder();
        let (new_seen, new_cb) = recorder();
        let mut store = Controllable::new(None, 0, Some(old_cb));

        store.set_on_change(Some(new_cb));
        store.set(1);

        assert!(old_seen.borrow().is_empty());
        assert_eq!(*new_seen.borrow(), vec![1]);
    }
}
