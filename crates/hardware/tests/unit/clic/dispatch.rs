//! Dispatch Loop Tests.
//!
//! Verifies single-selection per poll, the edge one-shot and level persistence
//! latch policies, handler invocation, bounded draining, and reset.

use clicsim_core::ClicError;
use clicsim_core::clic::{
    Acknowledging, Clic, Delivery, DeliveryHandler, LineRegistry, NullHandler, Polarity,
    TriggerMode,
};
use clicsim_core::config::ControllerConfig;
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;
use crate::common::mocks::handler::{DeliveryLog, MockHandler};

// ══════════════════════════════════════════════════════════
// 1. Poll basics
// ══════════════════════════════════════════════════════════

#[test]
fn idle_poll_returns_none() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.clic.poll(0), Ok(None));
    assert!(ctx.log.deliveries().is_empty());
}

#[test]
fn poll_services_exactly_one_line() {
    let mut ctx = TestContext::new();
    ctx.edge(2, 200);
    ctx.edge(4, 50);
    ctx.pend(&[2, 4]);

    let first = ctx.clic.poll(0).unwrap();
    assert_eq!(
        first,
        Some(Delivery {
            line: 4,
            priority: 50,
            context: 0
        })
    );
    assert_eq!(ctx.log.lines(), vec![4]);
    assert!(ctx.clic.is_pending(2).unwrap());
}

#[test]
fn poll_on_unknown_context_fails() {
    let mut ctx = TestContext::new();
    assert_eq!(
        ctx.clic.poll(1),
        Err(ClicError::InvalidContext {
            context: 1,
            count: 1
        })
    );
}

#[test]
fn handler_receives_line_and_priority() {
    let mut handler = MockHandler::new();
    let _ = handler
        .expect_deliver()
        .withf(|delivery, _lines| {
            delivery.line == 7 && delivery.priority == 33 && delivery.context == 0
        })
        .times(1)
        .return_const(());
    let mut clic = Clic::new(&ControllerConfig::default(), handler);
    clic.configure(7, 33, TriggerMode::Edge, Polarity::Positive)
        .unwrap();
    clic.enable(7).unwrap();
    clic.set_pending(7).unwrap();
    assert!(clic.poll(0).unwrap().is_some());
    assert_eq!(clic.poll(0), Ok(None));
}

// ══════════════════════════════════════════════════════════
// 2. Edge one-shot
// ══════════════════════════════════════════════════════════

#[test]
fn edge_line_clears_pending_after_service() {
    let mut ctx = TestContext::new();
    ctx.edge(15, 128);
    ctx.pend(&[15]);
    assert_eq!(ctx.drain(), vec![15]);
    assert!(!ctx.clic.is_pending(15).unwrap());
    assert_eq!(ctx.clic.stats().service_count(15), 1);
}

#[test]
fn edge_retrigger_requires_fresh_set_pending() {
    let mut ctx = TestContext::new();
    ctx.edge(15, 128);
    ctx.pend(&[15]);
    assert_eq!(ctx.drain(), vec![15]);
    assert_eq!(ctx.clic.poll(0), Ok(None));
    ctx.pend(&[15]);
    assert_eq!(ctx.drain(), vec![15]);
    assert_eq!(ctx.clic.stats().service_count(15), 2);
}

#[test]
fn edge_retrigger_from_handler_is_kept() {
    let mut remaining = 2;
    let mut clic = Clic::from_fn(
        &ControllerConfig::default(),
        move |delivery: Delivery, lines: &mut LineRegistry| {
            if remaining > 0 {
                remaining -= 1;
                lines.set_pending(delivery.line).unwrap();
            }
        },
    );
    clic.configure(1, 10, TriggerMode::Edge, Polarity::Positive)
        .unwrap();
    clic.enable(1).unwrap();
    clic.set_pending(1).unwrap();
    let outcome = clic.drain(0, 100).unwrap();
    assert!(outcome.quiescent);
    assert_eq!(outcome.serviced.len(), 3);
}

// ══════════════════════════════════════════════════════════
// 3. Level persistence
// ══════════════════════════════════════════════════════════

#[test]
fn level_line_stays_pending_and_is_reselected() {
    let mut ctx = TestContext::new();
    ctx.level(16, 128);
    ctx.pend(&[16]);
    for _ in 0..3 {
        assert_eq!(ctx.clic.poll(0).unwrap().map(|d| d.line), Some(16));
        assert!(ctx.clic.is_pending(16).unwrap());
    }
    assert_eq!(ctx.clic.stats().service_count(16), 3);
}

#[test]
fn level_line_stops_once_cleared() {
    let mut ctx = TestContext::new();
    ctx.level(16, 128);
    ctx.pend(&[16]);
    assert!(ctx.clic.poll(0).unwrap().is_some());
    ctx.clic.clear_pending(16).unwrap();
    assert_eq!(ctx.clic.poll(0), Ok(None));
}

#[test]
fn unacknowledged_level_line_exhausts_drain_budget() {
    let mut ctx = TestContext::new();
    ctx.level(16, 128);
    ctx.pend(&[16]);
    let outcome = ctx.clic.drain(0, 25).unwrap();
    assert!(!outcome.quiescent);
    assert_eq!(outcome.serviced.len(), 25);
}

#[test]
fn acknowledging_handler_makes_level_one_shot() {
    let mut clic = Clic::new(&ControllerConfig::default(), Acknowledging::new(NullHandler));
    clic.configure(16, 128, TriggerMode::Level, Polarity::Positive)
        .unwrap();
    clic.enable(16).unwrap();
    clic.set_pending(16).unwrap();
    let outcome = clic.drain(0, 10).unwrap();
    assert!(outcome.quiescent);
    assert_eq!(outcome.serviced.len(), 1);
}

#[test]
fn level_line_preempted_by_more_urgent_edge() {
    let mut ctx = TestContext::new();
    ctx.level(20, 100);
    ctx.pend(&[20]);
    assert_eq!(ctx.clic.poll(0).unwrap().map(|d| d.line), Some(20));
    ctx.edge(21, 10);
    ctx.pend(&[21]);
    assert_eq!(ctx.clic.poll(0).unwrap().map(|d| d.line), Some(21));
    assert_eq!(ctx.clic.poll(0).unwrap().map(|d| d.line), Some(20));
}

// ══════════════════════════════════════════════════════════
// 4. Cancellation by re-evaluation
// ══════════════════════════════════════════════════════════

#[test]
fn disabling_before_service_cancels_and_reenable_resumes() {
    let mut ctx = TestContext::new();
    ctx.edge(8, 60);
    ctx.pend(&[8]);
    ctx.clic.disable(8).unwrap();
    assert_eq!(ctx.clic.poll(0), Ok(None));
    ctx.clic.enable(8).unwrap();
    assert_eq!(ctx.drain(), vec![8]);
}

#[test]
fn raising_threshold_before_service_cancels() {
    let mut ctx = TestContext::new();
    ctx.edge(8, 60);
    ctx.pend(&[8]);
    ctx.clic.set_threshold(0, 60).unwrap();
    assert_eq!(ctx.clic.poll(0), Ok(None));
    ctx.clic.set_threshold(0, 61).unwrap();
    assert_eq!(ctx.drain(), vec![8]);
}

// ══════════════════════════════════════════════════════════
// 5. Raw inputs through the dispatch loop
// ══════════════════════════════════════════════════════════

#[test]
fn level_input_services_until_deasserted() {
    let mut ctx = TestContext::new();
    ctx.level(30, 5);
    ctx.clic.drive_input(30, true).unwrap();
    assert!(ctx.clic.poll(0).unwrap().is_some());
    assert!(ctx.clic.poll(0).unwrap().is_some());
    ctx.clic.drive_input(30, false).unwrap();
    assert_eq!(ctx.clic.poll(0), Ok(None));
}

#[test]
fn edge_input_services_once_per_edge() {
    let mut ctx = TestContext::new();
    ctx.edge(31, 5);
    ctx.clic.drive_input(31, true).unwrap();
    ctx.clic.drive_input(31, true).unwrap();
    assert_eq!(ctx.drain(), vec![31]);
    ctx.clic.drive_input(31, false).unwrap();
    ctx.clic.drive_input(31, true).unwrap();
    assert_eq!(ctx.drain(), vec![31]);
}

// ══════════════════════════════════════════════════════════
// 6. Instrumentation and reset
// ══════════════════════════════════════════════════════════

#[test]
fn stats_track_last_serviced_line() {
    let mut ctx = TestContext::new();
    ctx.edge(2, 200);
    ctx.edge(4, 50);
    ctx.pend(&[2, 4]);
    assert_eq!(ctx.drain(), vec![4, 2]);
    let stats = ctx.clic.stats();
    assert_eq!(stats.last_serviced_id, Some(2));
    assert_eq!(stats.last_serviced_priority, Some(200));
    assert_eq!(stats.total_services, 2);
}

#[test]
fn configuration_calls_do_not_touch_stats() {
    let mut ctx = TestContext::new();
    ctx.edge(2, 1);
    ctx.pend(&[2]);
    ctx.clic.clear_pending(2).unwrap();
    ctx.clic.set_threshold(0, 9).unwrap();
    assert_eq!(ctx.clic.stats().total_services, 0);
    assert_eq!(ctx.clic.stats().last_serviced_id, None);
}

#[test]
fn reset_clears_lines_thresholds_and_stats() {
    let mut ctx = TestContext::new();
    ctx.edge(2, 1);
    ctx.level(3, 2);
    ctx.pend(&[2, 3]);
    let _ = ctx.clic.poll(0).unwrap();
    ctx.clic.set_threshold(0, 50).unwrap();

    ctx.clic.reset();

    assert!(!ctx.clic.is_enabled(2).unwrap());
    assert!(!ctx.clic.is_pending(3).unwrap());
    assert_eq!(ctx.clic.get_threshold(0), Ok(0));
    assert_eq!(ctx.clic.stats().service_count(2), 0);
    assert_eq!(ctx.clic.stats().last_serviced_id, None);
    assert_eq!(ctx.clic.poll(0), Ok(None));
}

#[test]
fn pending_request_reports_without_servicing() {
    let mut ctx = TestContext::new();
    ctx.edge(12, 70);
    ctx.pend(&[12]);
    let request = ctx.clic.pending_request(0).unwrap();
    assert_eq!(
        request,
        Some(Delivery {
            line: 12,
            priority: 70,
            context: 0
        })
    );
    assert!(ctx.clic.is_pending(12).unwrap());
    assert!(ctx.log.deliveries().is_empty());
}

#[test]
fn contexts_share_lines_but_not_thresholds() {
    let config = ControllerConfig {
        num_contexts: 2,
        ..ControllerConfig::default()
    };
    let mut ctx = TestContext::with_config(&config);
    ctx.edge(5, 80);
    ctx.clic.set_threshold(0, 50).unwrap();
    ctx.pend(&[5]);

    assert_eq!(ctx.clic.poll(0), Ok(None));
    let delivery = ctx.clic.poll(1).unwrap().unwrap();
    assert_eq!(delivery.context, 1);
    assert!(!ctx.clic.is_pending(5).unwrap());
}

#[test]
fn acknowledging_handler_clears_line_and_keeps_inner_handler() {
    let log = DeliveryLog::new();
    let mut clic = Clic::new(
        &ControllerConfig::default(),
        Acknowledging::new(log.handler()),
    );
    clic.configure(9, 4, TriggerMode::Level, Polarity::Positive)
        .unwrap();
    clic.enable(9).unwrap();
    clic.set_pending(9).unwrap();
    assert_eq!(clic.poll(0).unwrap().map(|d| d.line), Some(9));
    assert!(!clic.is_pending(9).unwrap());
    assert_eq!(log.lines(), vec![9]);
}

#[test]
fn acknowledging_out_of_range_line_is_reported_not_fatal() {
    crate::common::harness::init_tracing();
    let mut handler = Acknowledging::new(NullHandler);
    let mut lines = LineRegistry::new(4, 8);
    handler.deliver(
        Delivery {
            line: 9,
            priority: 0,
            context: 0,
        },
        &mut lines,
    );
    assert!(lines.iter().all(|(_, line)| !line.pending));
}
