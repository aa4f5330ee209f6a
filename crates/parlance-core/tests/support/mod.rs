// crates/parlance-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and contract fixtures for core tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, plus a small
//! set of domain fixtures reused across suites.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers are selectively used across suites."
)]

use std::error::Error;
use std::fmt;

use parlance_core::ContractDescriptor;
use parlance_core::MethodDescriptor;
use parlance_core::ParameterDescriptor;
use parlance_core::Tag;
use parlance_core::TagResolver;
use parlance_core::TextNode;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Fixtures
// ========================================================================

/// Audience member a message can be rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Display name.
    pub name: String,
}

impl Player {
    /// Creates a player.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Type with no adapter and no special handling.
#[derive(Debug, Clone)]
pub struct Unregistered;

/// `greet(greeting: String) -> TextNode` keyed `hello.world`.
pub fn greet_method() -> MethodDescriptor {
    MethodDescriptor::message("greet")
        .with_key("hello.world")
        .with_message("en", "<greeting>, world")
        .with_parameter(ParameterDescriptor::new::<String>().with_name("greeting"))
}

/// `welcome(player: Player, badge: Tag, extras: TagResolver, count: u32)`.
pub fn welcome_method() -> MethodDescriptor {
    MethodDescriptor::message("welcome")
        .with_key("player.welcome")
        .with_parameter(ParameterDescriptor::target::<Player>().with_identifier("player"))
        .with_parameter(ParameterDescriptor::new::<Tag>().with_name("badge"))
        .with_parameter(ParameterDescriptor::new::<TagResolver>())
        .with_parameter(ParameterDescriptor::new::<u32>().with_name("count"))
}

/// Contract holding the greet and welcome methods.
pub fn greeting_contract() -> TestResult<ContractDescriptor> {
    Ok(ContractDescriptor::builder("Greetings")
        .method(greet_method())
        .method(welcome_method())
        .build()?)
}

/// Literal text node helper.
pub fn text(content: &str) -> TextNode {
    TextNode::text(content)
}
