// crates/parlance-core/src/context.rs
// ============================================================================
// Module: Invocation Context
// Description: Immutable snapshot of one dispatched call.
// Purpose: Pair each caller value with its parameter metadata and position.
// Dependencies: crate::{descriptor, error}
// ============================================================================

//! ## Overview
//! An [`InvocationContext`] is created fresh for every call and discarded when
//! the pipeline returns. It borrows both the method descriptor and the caller's
//! values; nothing in it is owned beyond the argument list itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;

use crate::descriptor::MethodDescriptor;
use crate::descriptor::ParameterDescriptor;
use crate::error::InvocationError;

// ============================================================================
// SECTION: Values
// ============================================================================

/// Borrowed, nullable view of one caller value.
#[derive(Clone, Copy)]
pub struct InvocationValue<'a> {
    /// Observed value, or `None` for null.
    value: Option<&'a dyn Any>,
}

impl<'a> InvocationValue<'a> {
    /// Observes `value`.
    #[must_use]
    pub fn of<T: Any>(value: &'a T) -> Self {
        Self {
            value: Some(value),
        }
    }

    /// Returns the null value.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            value: None,
        }
    }

    /// Observes `value`, mapping `None` to null.
    #[must_use]
    pub fn from_option<T: Any>(value: Option<&'a T>) -> Self {
        Self {
            value: value.map(|inner| inner as &'a dyn Any),
        }
    }

    /// Returns the observed value, or `None` for null.
    #[must_use]
    pub const fn get(&self) -> Option<&'a dyn Any> {
        self.value
    }

    /// Returns true for the null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

impl fmt::Debug for InvocationValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_some() {
            f.write_str("InvocationValue(..)")
        } else {
            f.write_str("InvocationValue(null)")
        }
    }
}

/// Builds an array of [`InvocationValue`]s from borrowed expressions.
///
/// ```
/// use parlance_core::invocation_args;
///
/// let name = String::from("Ada");
/// let args = invocation_args![name, 3_u32];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! invocation_args {
    () => {
        [$crate::InvocationValue::null(); 0]
    };
    ($($value:expr),+ $(,)?) => {
        [$($crate::InvocationValue::of(&$value)),+]
    };
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// One argument of a call.
#[derive(Debug, Clone, Copy)]
pub struct InvocationArgument<'a> {
    /// Declared parameter metadata.
    parameter: &'a ParameterDescriptor,
    /// Caller value.
    value: InvocationValue<'a>,
    /// Zero-based position.
    index: usize,
}

impl<'a> InvocationArgument<'a> {
    /// Returns the declared parameter metadata.
    #[must_use]
    pub const fn parameter(&self) -> &'a ParameterDescriptor {
        self.parameter
    }

    /// Returns the caller value.
    #[must_use]
    pub const fn value(&self) -> InvocationValue<'a> {
        self.value
    }

    /// Returns the zero-based position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Immutable snapshot of one call.
///
/// # Invariants
/// - `arguments[i].index() == i` and pairs with `method.parameters()[i]`.
#[derive(Debug, Clone)]
pub struct InvocationContext<'a> {
    /// Method being dispatched.
    method: &'a MethodDescriptor,
    /// Arguments in declaration order.
    arguments: Vec<InvocationArgument<'a>>,
}

impl<'a> InvocationContext<'a> {
    /// Pairs `values` with the method's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::ArityMismatch`] when the value count differs
    /// from the parameter count.
    pub fn new(
        method: &'a MethodDescriptor,
        values: &[InvocationValue<'a>],
    ) -> Result<Self, InvocationError> {
        let parameters = method.parameters();
        if parameters.len() != values.len() {
            return Err(InvocationError::ArityMismatch {
                method: method.name().to_string(),
                expected: parameters.len(),
                actual: values.len(),
            });
        }
        let arguments = parameters
            .iter()
            .zip(values.iter().copied())
            .enumerate()
            .map(|(index, (parameter, value))| InvocationArgument {
                parameter,
                value,
                index,
            })
            .collect();
        Ok(Self {
            method,
            arguments,
        })
    }

    /// Returns the method being dispatched.
    #[must_use]
    pub const fn method(&self) -> &'a MethodDescriptor {
        self.method
    }

    /// Returns the arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[InvocationArgument<'a>] {
        &self.arguments
    }

    /// Returns the method name.
    #[must_use]
    pub fn method_name(&self) -> &'a str {
        self.method.name()
    }
}
