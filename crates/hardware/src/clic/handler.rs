//! Interrupt delivery capability.
//!
//! The environment supplies a [`DeliveryHandler`] when the controller is
//! built. The dispatch loop calls it synchronously for every serviced line,
//! passing the registry so the handler can acknowledge level-triggered lines
//! by clearing their pending bit.

use serde::Serialize;
use tracing::warn;

use super::registry::LineRegistry;
use crate::common::{ContextId, LineId};

/// One serviced interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Delivery {
    /// Serviced line.
    pub line: LineId,
    /// Priority of the line at the time it was selected.
    pub priority: u8,
    /// Context that serviced it.
    pub context: ContextId,
}

/// Receiver of serviced interrupts ("the handler ran").
pub trait DeliveryHandler: Send {
    /// Handles one delivery. `lines` is the controller's registry.
    fn deliver(&mut self, delivery: Delivery, lines: &mut LineRegistry);
}

impl<F> DeliveryHandler for F
where
    F: FnMut(Delivery, &mut LineRegistry) + Send,
{
    fn deliver(&mut self, delivery: Delivery, lines: &mut LineRegistry) {
        self(delivery, lines);
    }
}

/// Handler that ignores deliveries; the stats still record them.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHandler;

impl DeliveryHandler for NullHandler {
    fn deliver(&mut self, _delivery: Delivery, _lines: &mut LineRegistry) {}
}

/// Wraps a handler and clears the pending bit of every delivered line after it returns.
///
/// This is the acknowledge-everything behaviour of a simple software
/// handler: level lines are serviced once per `set_pending`, like edge lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Acknowledging<H> {
    inner: H,
}

impl<H> Acknowledging<H> {
    /// Wraps `inner`.
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }

    /// Returns the wrapped handler.
    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: DeliveryHandler> DeliveryHandler for Acknowledging<H> {
    fn deliver(&mut self, delivery: Delivery, lines: &mut LineRegistry) {
        self.inner.deliver(delivery, lines);
        if let Err(err) = lines.clear_pending(delivery.line) {
            warn!(%err, line = delivery.line, "acknowledge failed");
        }
    }
}
