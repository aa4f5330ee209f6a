// crates/parlance-placeholders/tests/capability_probe.rs
// ============================================================================
// Module: Capability Probe Tests
// Description: Memoization and concurrency coverage for CapabilityProbe.
// ============================================================================
//! ## Overview
//! Each test owns its probe and call counter so suites can run in parallel.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;

use parlance_placeholders::CapabilityProbe;
use parlance_placeholders::CapabilityState;

/// Calls made by [`present`].
static PRESENT_CALLS: AtomicUsize = AtomicUsize::new(0);
/// Calls made by [`absent`].
static ABSENT_CALLS: AtomicUsize = AtomicUsize::new(0);
/// Calls made by [`raced`].
static RACED_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Probe reporting the capability as present.
fn present() -> bool {
    PRESENT_CALLS.fetch_add(1, Ordering::SeqCst);
    true
}

/// Probe reporting the capability as absent.
fn absent() -> bool {
    ABSENT_CALLS.fetch_add(1, Ordering::SeqCst);
    false
}

/// Probe shared by racing threads.
fn raced() -> bool {
    RACED_CALLS.fetch_add(1, Ordering::SeqCst);
    true
}

#[test]
fn available_probe_runs_once() {
    let probe = CapabilityProbe::new(present);
    assert_eq!(probe.state(), CapabilityState::Unknown);
    assert!(probe.is_available());
    assert!(probe.is_available());
    assert_eq!(probe.state(), CapabilityState::Available);
    assert_eq!(PRESENT_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn unavailable_answer_is_memoized() {
    let probe = CapabilityProbe::new(absent);
    assert!(!probe.is_available());
    assert!(!probe.is_available());
    assert_eq!(probe.state(), CapabilityState::Unavailable);
    assert_eq!(ABSENT_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_first_use_agrees() {
    static PROBE: CapabilityProbe = CapabilityProbe::new(raced);
    let answers: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| PROBE.is_available())).collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });
    assert!(answers.iter().all(|answer| *answer));
    assert_eq!(PROBE.state(), CapabilityState::Available);
    let calls = RACED_CALLS.load(Ordering::SeqCst);
    assert!((1..=8).contains(&calls), "probe ran {calls} times");
}
