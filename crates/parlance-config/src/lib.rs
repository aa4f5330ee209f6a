// crates/parlance-config/src/lib.rs
// ============================================================================
// Module: Parlance Config Library
// Description: Canonical config model and validation for parlance.toml.
// Purpose: Single source of truth for file-driven dispatcher settings.
// Dependencies: parlance-core, serde, toml
// ============================================================================

//! ## Overview
//! `parlance-config` loads `parlance.toml`, validates it fail-closed, and
//! builds the [`parlance_core::InvocationConfiguration`] and audit sink it
//! describes. Code-built configurations do not need this crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
