//! Shared engine handle for the slots of one widget.
//!
//! A [`DatePickerProvider`] is created once per widget and handed to every
//! slot renderer. Slots read through it and dispatch through the prop bags;
//! none of them own engine state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::config::DatePickerOptions;
use crate::engine::{DatePicker, DatePickerState};
use crate::error::{DatePickError, DatePickResult};

#[derive(Clone)]
pub struct DatePickerContext {
    engine: Rc<RefCell<DatePicker>>,
}

impl DatePickerContext {
    pub fn new(picker: DatePicker) -> Self {
        DatePickerContext {
            engine: Rc::new(RefCell::new(picker)),
        }
    }

    pub fn from_options(options: DatePickerOptions) -> Self {
        Self::new(DatePicker::new(options))
    }

    pub fn read<R>(&self, f: impl FnOnce(&DatePicker) -> R) -> DatePickResult<R> {
        let picker = self.engine.try_borrow().map_err(|_| busy())?;
        Ok(f(&picker))
    }

    /// Run an operation. Fails with [`DatePickError::EngineBusy`] when called
    /// from inside one of the engine's own callbacks.
    pub fn update<R>(&self, f: impl FnOnce(&mut DatePicker) -> R) -> DatePickResult<R> {
        let mut picker = self.engine.try_borrow_mut().map_err(|_| busy())?;
        Ok(f(&mut picker))
    }

    pub fn snapshot(&self) -> DatePickResult<DatePickerState> {
        self.read(DatePicker::snapshot)
    }

    pub(crate) fn downgrade(&self) -> WeakDatePicker {
        WeakDatePicker {
            engine: Rc::downgrade(&self.engine),
        }
    }
}

fn busy() -> DatePickError {
    warn!("date picker re-entered from one of its own callbacks");
    DatePickError::EngineBusy
}

/// Handle held by prop-bag event handlers so a bag never keeps an unmounted engine alive.
#[derive(Clone)]
pub(crate) struct WeakDatePicker {
    engine: Weak<RefCell<DatePicker>>,
}

impl WeakDatePicker {
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut DatePicker) -> R) -> DatePickResult<R> {
        let engine = self.engine.upgrade().ok_or(DatePickError::EngineDropped)?;
        let mut picker = engine.try_borrow_mut().map_err(|_| busy())?;
        Ok(f(&mut picker))
    }
}

/// Injects one engine into the slots of a widget.
#[derive(Clone, Default)]
pub struct DatePickerProvider {
    context: Option<DatePickerContext>,
}

impl DatePickerProvider {
    pub fn new(context: DatePickerContext) -> Self {
        DatePickerProvider {
            context: Some(context),
        }
    }

    pub fn provide(&mut self, context: DatePickerContext) {
        self.context = Some(context);
    }

    pub fn try_context(&self) -> DatePickResult<&DatePickerContext> {
        self.context.as_ref().ok_or(DatePickError::MissingContext)
    }

    /// The provided engine.
    ///
    /// # Panics
    ///
    /// Panics when no engine was provided. Rendering a slot outside of an
    /// initialized widget is an integration bug, not a runtime condition.
    pub fn context(&self) -> &DatePickerContext {
        match &self.context {
            Some(context) => context,
            None => panic!("date picker slot used outside of an initialized DatePickerProvider"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatePickerConfig;
    use chrono::NaiveDate;

    fn options() -> DatePickerOptions {
        DatePickerOptions::new(DatePickerConfig::default())
            .with_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_missing_context_is_an_error() {
        let provider = DatePickerProvider::default();
        assert!(matches!(provider.try_context(), Err(DatePickError::MissingContext)));
    }

    #[test]
    #[should_panic(expected = "outside of an initialized DatePickerProvider")]
    fn test_missing_context_panics_when_required() {
        let provider = DatePickerProvider::default();
        provider.context();
    }

    #[test]
    fn test_slots_share_one_engine() {
        let provider = DatePickerProvider::new(DatePickerContext::from_options(options()));
        let slot_a = provider.clone();
        let slot_b = provider.clone();

        slot_a.context().update(|p| p.open()).unwrap();
        assert!(slot_b.context().read(|p| p.is_open()).unwrap());
    }

    #[test]
    fn test_reentrant_callback_gets_busy_error() {
        let slot: Rc<RefCell<Option<DatePickerContext>>> = Rc::new(RefCell::new(None));
        let outcome: Rc<RefCell<Option<DatePickResult<()>>>> = Rc::new(RefCell::new(None));
        let (slot_cb, outcome_cb) = (slot.clone(), outcome.clone());

        let context = DatePickerContext::from_options(options().with_on_change(move |_| {
            if let Some(ctx) = slot_cb.borrow().as_ref() {
                *outcome_cb.borrow_mut() = Some(ctx.update(|p| p.clear()));
            }
        }));
        *slot.borrow_mut() = Some(context.clone());

        context
            .update(|p| p.select_day(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()))
            .unwrap();

        assert!(matches!(*outcome.borrow(), Some(Err(DatePickError::EngineBusy))));
        assert!(context.read(|p| p.has_selection()).unwrap());
    }

    #[test]
    fn test_weak_handle_reports_dropped_engine() {
        let context = DatePickerContext::from_options(options());
        let weak = context.downgrade();
        drop(context);

        assert!(matches!(weak.update(|p| p.open()), Err(DatePickError::EngineDropped)));
    }
}
