//! Dispatch Loop and Latch Logic.
//!
//! [`Clic`] owns the registry, the threshold gate, the delivery handler, and
//! the dispatch statistics. It drives the per-line state machine
//!
//! ```text
//! Disabled -> Enabled(idle) -> Enabled(pending) -> Servicing -> Enabled(idle)
//! ```
//!
//! as a cooperative poll. Each call to [`Clic::poll`] is one dispatch cycle:
//! the arbiter picks at most one line, the trigger-mode latch policy is
//! applied, the handler runs, and the statistics are updated. Eligibility is
//! re-evaluated every poll, so disabling a line or raising the threshold
//! cancels a request that has not been serviced yet.
//!
//! Waiting is always bounded: every helper that loops takes an explicit
//! poll budget and reports exhaustion instead of spinning forever.

use std::fmt;

use serde::Serialize;
use tracing::{trace, warn};

use super::arbiter;
use super::handler::{Delivery, DeliveryHandler};
use super::line::{Polarity, TriggerMode};
use super::registry::LineRegistry;
use super::threshold::ThresholdGate;
use crate::common::{ClicError, ContextId, LineId, Result};
use crate::config::{ControllerConfig, LatencyConfig};
use crate::stats::{DispatchStats, LatencyReport};

/// Result of draining a context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DrainOutcome {
    /// Deliveries in service order.
    pub serviced: Vec<Delivery>,
    /// `true` if no line was eligible when draining stopped.
    pub quiescent: bool,
}

/// Core-local interrupt controller.
pub struct Clic {
    registry: LineRegistry,
    gate: ThresholdGate,
    stats: DispatchStats,
    handler: Box<dyn DeliveryHandler>,
}

impl fmt::Debug for Clic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clic")
            .field("registry", &self.registry)
            .field("gate", &self.gate)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Clic {
    /// Creates a controller with every line disabled, idle, and at priority 0.
    ///
    /// # Arguments
    ///
    /// * `config` - Controller geometry; assumed validated.
    /// * `handler` - Receives every serviced interrupt.
    pub fn new<H>(config: &ControllerConfig, handler: H) -> Self
    where
        H: DeliveryHandler + 'static,
    {
        Self {
            registry: LineRegistry::new(config.num_interrupts, config.priority_bits),
            gate: ThresholdGate::new(config.num_contexts),
            stats: DispatchStats::new(config.num_interrupts),
            handler: Box::new(handler),
        }
    }

    /// Creates a controller whose handler is a closure.
    pub fn from_fn<F>(config: &ControllerConfig, handler: F) -> Self
    where
        F: FnMut(Delivery, &mut LineRegistry) + Send + 'static,
    {
        Self::new(config, handler)
    }

    /// Returns the line registry.
    pub const fn lines(&self) -> &LineRegistry {
        &self.registry
    }

    /// Returns the line registry for direct manipulation.
    pub const fn lines_mut(&mut self) -> &mut LineRegistry {
        &mut self.registry
    }

    /// Returns the threshold gate.
    pub const fn gate(&self) -> &ThresholdGate {
        &self.gate
    }

    /// Returns the dispatch statistics.
    pub const fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Returns the number of lines.
    pub const fn num_lines(&self) -> usize {
        self.registry.len()
    }

    /// Returns the number of contexts.
    pub const fn num_contexts(&self) -> usize {
        self.gate.contexts()
    }

    /// Sets priority, trigger mode, and polarity of a line.
    pub fn configure(
        &mut self,
        id: LineId,
        priority: u8,
        trigger: TriggerMode,
        polarity: Polarity,
    ) -> Result<()> {
        self.registry.configure(id, priority, trigger, polarity)
    }

    /// Enables a line.
    pub fn enable(&mut self, id: LineId) -> Result<()> {
        self.registry.enable(id)
    }

    /// Disables a line, keeping any pending request.
    pub fn disable(&mut self, id: LineId) -> Result<()> {
        self.registry.disable(id)
    }

    /// Marks a line pending.
    pub fn set_pending(&mut self, id: LineId) -> Result<()> {
        self.registry.set_pending(id)
    }

    /// Clears a line's pending bit.
    pub fn clear_pending(&mut self, id: LineId) -> Result<()> {
        self.registry.clear_pending(id)
    }

    /// Returns whether a line is pending.
    pub fn is_pending(&self, id: LineId) -> Result<bool> {
        self.registry.is_pending(id)
    }

    /// Returns whether a line is enabled.
    pub fn is_enabled(&self, id: LineId) -> Result<bool> {
        self.registry.is_enabled(id)
    }

    /// Samples a line's raw input signal.
    pub fn drive_input(&mut self, id: LineId, level: bool) -> Result<()> {
        self.registry.drive_input(id, level)
    }

    /// Sets the threshold of a context.
    pub fn set_threshold(&mut self, context: ContextId, value: u8) -> Result<()> {
        self.gate.set_threshold(context, value)
    }

    /// Returns the threshold of a context.
    pub fn get_threshold(&self, context: ContextId) -> Result<u8> {
        self.gate.get_threshold(context)
    }

    /// Returns the line `context` would service next, without side effects.
    pub fn select_next(&self, context: ContextId) -> Result<Option<LineId>> {
        arbiter::select_next(&self.registry, &self.gate, context)
    }

    /// Returns the request presented to `context`: the arbitration winner and its priority.
    pub fn pending_request(&self, context: ContextId) -> Result<Option<Delivery>> {
        let Some(line) = self.select_next(context)? else {
            return Ok(None);
        };
        let priority = self.registry.line(line)?.priority;
        Ok(Some(Delivery {
            line,
            priority,
            context,
        }))
    }

    /// Runs one dispatch cycle on `context`.
    ///
    /// Returns the delivery made, or `None` if no line was eligible. Edge
    /// lines are unlatched when claimed, before the handler runs, so a
    /// re-trigger raised by the handler is kept. Level lines stay pending.
    pub fn poll(&mut self, context: ContextId) -> Result<Option<Delivery>> {
        self.gate.check(context)?;
        let now = self.registry.advance();
        let Some(delivery) = self.pending_request(context)? else {
            return Ok(None);
        };
        let latency = self.registry.claim(delivery.line, now)?;
        trace!(
            line = delivery.line,
            priority = delivery.priority,
            context,
            ?latency,
            "servicing interrupt"
        );
        self.handler.deliver(delivery, &mut self.registry);
        self.stats
            .on_serviced(delivery.line, delivery.priority, latency);
        Ok(Some(delivery))
    }

    /// Polls `context` until nothing is eligible or `max_polls` cycles have run.
    ///
    /// A level line that is never acknowledged keeps the context busy; the
    /// outcome then reports `quiescent == false` rather than looping forever.
    pub fn drain(&mut self, context: ContextId, max_polls: u64) -> Result<DrainOutcome> {
        let mut outcome = DrainOutcome::default();
        for _ in 0..max_polls {
            match self.poll(context)? {
                Some(delivery) => outcome.serviced.push(delivery),
                None => {
                    outcome.quiescent = true;
                    return Ok(outcome);
                }
            }
        }
        outcome.quiescent = self.select_next(context)?.is_none();
        if !outcome.quiescent {
            warn!(
                context,
                max_polls,
                serviced = outcome.serviced.len(),
                "drain budget exhausted with requests outstanding"
            );
        }
        Ok(outcome)
    }

    /// Polls `context` until line `id` completes one more service.
    ///
    /// Returns the number of polls taken, or [`ClicError::Timeout`] once
    /// `max_polls` polls pass without the line being serviced.
    pub fn await_service(&mut self, context: ContextId, id: LineId, max_polls: u64) -> Result<u64> {
        let _ = self.registry.line(id)?;
        self.gate.check(context)?;
        let before = self.stats.service_count(id);
        for polls in 1..=max_polls {
            let _ = self.poll(context)?;
            if self.stats.service_count(id) > before {
                return Ok(polls);
            }
        }
        warn!(line = id, context, max_polls, "interrupt not serviced in time");
        Err(ClicError::Timeout {
            line: id,
            polls: max_polls,
        })
    }

    /// Triggers line `id` `trials` times and measures how many polls each service takes.
    ///
    /// Timed-out trials are counted in the report and excluded from the
    /// average. A line left pending by a timeout stays pending.
    pub fn measure_latency(
        &mut self,
        context: ContextId,
        id: LineId,
        trials: u32,
        max_polls: u64,
    ) -> Result<LatencyReport> {
        let mut report = LatencyReport::new(id, max_polls);
        for _ in 0..trials {
            self.set_pending(id)?;
            match self.await_service(context, id, max_polls) {
                Ok(polls) => report.record(polls),
                Err(ClicError::Timeout { .. }) => report.record_timeout(),
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }

    /// Runs [`Clic::measure_latency`] with the trial count and poll budget from `latency`.
    pub fn measure_latency_with(
        &mut self,
        context: ContextId,
        id: LineId,
        latency: &LatencyConfig,
    ) -> Result<LatencyReport> {
        self.measure_latency(context, id, latency.trials, latency.max_polls)
    }

    /// Disables every line, clears pending bits and statistics, and returns thresholds to 0.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.gate.reset();
        self.stats.reset();
    }
}
