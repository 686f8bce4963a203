//! Thread-shareable controller handle.
//!
//! On a multi-threaded host the registry and gate must be mutated under one
//! lock so that at most one line is selected per dispatch cycle.
//! [`SharedClic`] holds the controller behind a single mutex and takes it for
//! the whole of every operation, including the handler call inside a poll.
//! A handler must therefore not call back into the same `SharedClic`; it
//! receives the registry directly for that purpose.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::dispatch::Clic;
use super::handler::Delivery;
use super::line::{Polarity, TriggerMode};
use crate::common::{ContextId, LineId, Result};

/// Cloneable handle to a controller guarded by one lock.
#[derive(Clone, Debug)]
pub struct SharedClic {
    inner: Arc<Mutex<Clic>>,
}

impl SharedClic {
    /// Moves `clic` behind a shared lock.
    pub fn new(clic: Clic) -> Self {
        Self {
            inner: Arc::new(Mutex::new(clic)),
        }
    }

    /// Takes the lock, recovering it if a previous holder panicked.
    fn lock(&self) -> MutexGuard<'_, Clic> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut Clic) -> R) -> R {
        f(&mut self.lock())
    }

    /// Sets priority, trigger mode, and polarity of a line.
    pub fn configure(
        &self,
        id: LineId,
        priority: u8,
        trigger: TriggerMode,
        polarity: Polarity,
    ) -> Result<()> {
        self.lock().configure(id, priority, trigger, polarity)
    }

    /// Enables a line for dispatch.
    pub fn enable(&self, id: LineId) -> Result<()> {
        self.lock().enable(id)
    }

    /// Disables a line; a pending request is kept.
    pub fn disable(&self, id: LineId) -> Result<()> {
        self.lock().disable(id)
    }

    /// Marks a line pending, as an asynchronous event source would.
    pub fn set_pending(&self, id: LineId) -> Result<()> {
        self.lock().set_pending(id)
    }

    /// Clears a line's pending bit.
    pub fn clear_pending(&self, id: LineId) -> Result<()> {
        self.lock().clear_pending(id)
    }

    /// Samples a line's raw input signal.
    pub fn drive_input(&self, id: LineId, level: bool) -> Result<()> {
        self.lock().drive_input(id, level)
    }

    /// Sets the threshold of a context.
    pub fn set_threshold(&self, context: ContextId, value: u8) -> Result<()> {
        self.lock().set_threshold(context, value)
    }

    /// Returns the line `context` would service next, without servicing it.
    pub fn select_next(&self, context: ContextId) -> Result<Option<LineId>> {
        self.lock().select_next(context)
    }

    /// Runs one dispatch cycle on `context`.
    pub fn poll(&self, context: ContextId) -> Result<Option<Delivery>> {
        self.lock().poll(context)
    }
}
