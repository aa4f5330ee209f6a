// crates/parlance-core/src/policy/mod.rs
// ============================================================================
// Module: Invocation Policies
// Description: Key, argument, name, and result policies.
// Purpose: Group the interchangeable strategies run by the dispatcher.
// Dependencies: crate::policy::{argument, key, name, result}
// ============================================================================

//! ## Overview
//! Each policy kind is a closed enum of built-in strategies plus a `Custom`
//! variant holding a trait object. Every policy validates a method descriptor
//! at binding time and executes against an invocation context at call time;
//! the two halves of a built-in policy share their decision logic so that
//! validation accepts exactly what execution accepts.

pub mod argument;
pub mod key;
pub mod name;
pub mod result;

pub use argument::ArgumentAdaptation;
pub use argument::ArgumentPolicy;
pub use argument::NamedArgumentPolicy;
pub use argument::PositionalArgumentPolicy;
pub use key::KeyPolicy;
pub use key::KeyResolution;
pub use name::NameResolution;
pub use name::NameResolver;
pub use name::to_snake_case;
pub use result::ResultPolicy;
pub use result::ResultTransformation;
