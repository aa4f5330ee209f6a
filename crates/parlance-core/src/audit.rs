// crates/parlance-core/src/audit.rs
// ============================================================================
// Module: Binding Audit Logging
// Description: Structured audit events for contract binding.
// Purpose: Record binding outcomes without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Binding a contract is the only point where the core reports anything on
//! its own: one [`BindingAuditEvent`] per bind attempt, routed to a
//! [`BindingAuditSink`]. Dispatched calls never log; their failures go back to
//! the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::error::ValidationError;
use crate::validation::ValidationReport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a bind attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingOutcome {
    /// The contract validated and a dispatcher was produced.
    Bound,
    /// Validation failed and no dispatcher was produced.
    Rejected,
}

/// Contract binding audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct BindingAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Contract name.
    pub contract: String,
    /// Bind outcome.
    pub outcome: BindingOutcome,
    /// Message methods validated before the outcome was decided.
    pub message_methods: usize,
    /// Identity and provided methods skipped by validation.
    pub skipped_methods: usize,
    /// Stable validation error code when rejected.
    pub error_code: Option<&'static str>,
    /// Validation error message when rejected.
    pub error: Option<String>,
}

impl BindingAuditEvent {
    /// Creates an event for a successful bind.
    #[must_use]
    pub fn bound(contract: &str, report: ValidationReport) -> Self {
        Self {
            event: "contract_binding",
            timestamp_ms: now_ms(),
            contract: contract.to_string(),
            outcome: BindingOutcome::Bound,
            message_methods: report.message_methods,
            skipped_methods: report.skipped_methods,
            error_code: None,
            error: None,
        }
    }

    /// Creates an event for a rejected bind; `report` covers the methods
    /// visited before `error` stopped validation.
    #[must_use]
    pub fn rejected(contract: &str, report: ValidationReport, error: &ValidationError) -> Self {
        Self {
            event: "contract_binding",
            timestamp_ms: now_ms(),
            contract: contract.to_string(),
            outcome: BindingOutcome::Rejected,
            message_methods: report.message_methods,
            skipped_methods: report.skipped_methods,
            error_code: Some(error.code()),
            error: Some(error.to_string()),
        }
    }
}

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for binding events.
pub trait BindingAuditSink: Send + Sync {
    /// Record a binding event.
    fn record(&self, event: &BindingAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl BindingAuditSink for StderrAuditSink {
    fn record(&self, event: &BindingAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl BindingAuditSink for FileAuditSink {
    fn record(&self, event: &BindingAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl BindingAuditSink for NoopAuditSink {
    fn record(&self, _event: &BindingAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<BindingAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<BindingAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl BindingAuditSink for MemoryAuditSink {
    fn record(&self, event: &BindingAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
