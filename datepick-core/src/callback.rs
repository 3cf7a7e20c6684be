//! Comparable callback handles.
//!
//! Handles compare by identity (`Rc::ptr_eq`), so a consumer can hand the
//! engine a fresh options bag without forcing deep closure comparisons, and
//! the engine can tell whether a handler actually changed.

use std::fmt;
use std::rc::Rc;

/// Stable, comparable callback handle for `Fn()`.
#[derive(Clone)]
pub struct Callback {
    inner: Rc<dyn Fn()>,
}

impl Callback {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(handler),
        }
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.inner)();
    }
}

impl<F> From<F> for Callback
where
    F: Fn() + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// Stable, comparable callback handle for `Fn(T) -> R`.
///
/// Used for value-change notifications and for prop-bag event handlers.
pub struct CallbackWith<T, R = ()> {
    inner: Rc<dyn Fn(T) -> R>,
}

impl<T, R> CallbackWith<T, R> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) -> R + 'static,
    {
        Self {
            inner: Rc::new(handler),
        }
    }

    /// Invoke the callback with an argument.
    pub fn call(&self, value: T) -> R {
        (self.inner)(value)
    }
}

impl<T, R, F> From<F> for CallbackWith<T, R>
where
    F: Fn(T) -> R + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl<T, R> Clone for CallbackWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, R> PartialEq for CallbackWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, R> Eq for CallbackWith<T, R> {}

impl<T, R> fmt::Debug for CallbackWith<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackWith")
    }
}
