// crates/parlance-core/src/validation.rs
// ============================================================================
// Module: Contract Validation
// Description: One-time compatibility check of a contract against policies.
// Purpose: Fail a binding at setup instead of on first use.
// Dependencies: crate::{configuration, descriptor, error, policy}
// ============================================================================

//! ## Overview
//! Validation visits every message method in declaration order and runs the
//! key, argument, and result policy checks, in that order, stopping at the
//! first failure. Identity and provided methods are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::configuration::InvocationConfiguration;
use crate::descriptor::ContractDescriptor;
use crate::descriptor::MethodDescriptor;
use crate::error::ValidationError;
use crate::policy::ArgumentAdaptation;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Summary of a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Message methods that passed every policy check.
    pub message_methods: usize,
    /// Identity and provided methods that were not checked.
    pub skipped_methods: usize,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates one message method against `configuration`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] raised by the key, argument, or
/// result policy, checked in that order.
pub fn validate_method(
    method: &MethodDescriptor,
    configuration: &InvocationConfiguration,
) -> Result<(), ValidationError> {
    configuration.key_policy().validate(method)?;
    configuration.argument_policy().validate(method)?;
    configuration.result_policy().validate(method)
}

/// Validates every message method of `contract` against `configuration`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_contract(
    contract: &ContractDescriptor,
    configuration: &InvocationConfiguration,
) -> Result<ValidationReport, ValidationError> {
    let (report, outcome) = check_contract(contract, configuration);
    outcome.map(|()| report)
}

/// Validates `contract` in method order, stopping at the first failure.
///
/// The report counts the methods visited before the outcome was decided, so
/// a rejection still shows how far validation got.
pub(crate) fn check_contract(
    contract: &ContractDescriptor,
    configuration: &InvocationConfiguration,
) -> (ValidationReport, Result<(), ValidationError>) {
    let mut report = ValidationReport::default();
    for method in contract.methods() {
        if !method.is_message() {
            report.skipped_methods += 1;
            continue;
        }
        if let Err(err) = validate_method(method, configuration) {
            return (report, Err(err));
        }
        report.message_methods += 1;
    }
    (report, Ok(()))
}
