//! Open/closed visibility of the picker panel.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::callback::{Callback, CallbackWith};
use crate::controllable::Controllable;

/// Where a pointer or focus interaction landed, as reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// The trigger button, control surface or text input.
    Trigger,
    /// The popover panel, including the grid and footer.
    Content,
    Outside,
}

pub struct Disclosure {
    store: Controllable<bool>,
    on_open: Option<Callback>,
    on_close: Option<Callback>,
}

impl Disclosure {
    pub fn new(
        controlled: Option<bool>,
        default_open: bool,
        on_open_change: Option<CallbackWith<bool>>,
        on_open: Option<Callback>,
        on_close: Option<Callback>,
    ) -> Self {
        Disclosure {
            store: Controllable::new(controlled, default_open, on_open_change),
            on_open,
            on_close,
        }
    }

    pub fn is_open(&self) -> bool {
        *self.store.get()
    }

    pub fn open(&mut self) {
        self.request(true);
    }

    pub fn close(&mut self) {
        self.request(false);
    }

    pub fn toggle(&mut self) {
        self.request(!self.is_open());
    }

    /// Close when an interaction lands outside the trigger and content.
    /// Returns whether a close was requested.
    pub fn handle_interaction(&mut self, region: Region) -> bool {
        if region != Region::Outside || !self.is_open() {
            return false;
        }
        debug!("interaction outside picker; dismissing");
        self.close();
        true
    }

    pub fn sync_controlled(&mut self, controlled: Option<bool>) {
        self.store.sync_controlled(controlled);
    }

    /// Side-channel notifications fire whenever the store reports a change,
    /// including attempts a controlled consumer has not yet accepted.
    fn request(&mut self, next: bool) {
        if !self.store.set(next) {
            return;
        }
        debug!(open = next, "visibility change requested");
        let side_channel = if next { &self.on_open } else { &self.on_close };
        if let Some(callback) = side_channel {
            callback.call();
        }
    }
}
