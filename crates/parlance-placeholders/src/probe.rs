// crates/parlance-placeholders/src/probe.rs
// ============================================================================
// Module: Capability Probe
// Description: Lazily evaluated, memoized availability check.
// Purpose: Probe an optional capability once and share the answer across
//          threads without locking.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`CapabilityProbe`] starts out unknown. The first caller runs the probe
//! and publishes the answer with a compare-exchange from unknown, so
//! concurrent first callers may each run the probe but all observe the one
//! published answer. The state never returns to unknown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// State tag: probe not yet run.
const UNKNOWN: u8 = 0;
/// State tag: capability present.
const AVAILABLE: u8 = 1;
/// State tag: capability absent.
const UNAVAILABLE: u8 = 2;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Observable probe state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityState {
    /// The probe has not run.
    Unknown,
    /// The capability is present.
    Available,
    /// The capability is absent.
    Unavailable,
}

/// Memoized tri-state capability check.
///
/// # Invariants
/// - Once `Available` or `Unavailable`, the state never changes.
pub struct CapabilityProbe {
    /// Encoded [`CapabilityState`].
    state: AtomicU8,
    /// Check run on first use.
    probe: fn() -> bool,
}

impl CapabilityProbe {
    /// Creates an unknown probe; usable in `static` items.
    #[must_use]
    pub const fn new(probe: fn() -> bool) -> Self {
        Self {
            state: AtomicU8::new(UNKNOWN),
            probe,
        }
    }

    /// Returns whether the capability is present, probing on first use.
    #[must_use]
    pub fn is_available(&self) -> bool {
        match self.state.load(Ordering::Acquire) {
            AVAILABLE => true,
            UNAVAILABLE => false,
            _ => {
                let observed = if (self.probe)() { AVAILABLE } else { UNAVAILABLE };
                match self.state.compare_exchange(
                    UNKNOWN,
                    observed,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => observed == AVAILABLE,
                    Err(published) => published == AVAILABLE,
                }
            }
        }
    }

    /// Returns the current state without probing.
    #[must_use]
    pub fn state(&self) -> CapabilityState {
        match self.state.load(Ordering::Acquire) {
            AVAILABLE => CapabilityState::Available,
            UNAVAILABLE => CapabilityState::Unavailable,
            _ => CapabilityState::Unknown,
        }
    }
}

impl fmt::Debug for CapabilityProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityProbe").field("state", &self.state()).finish()
    }
}
