// crates/parlance-core/src/policy/result.rs
// ============================================================================
// Module: Result Transformation Policies
// Description: Turns the assembled translatable node into the return value.
// Purpose: Return the node as-is, or convert it via the transformer registry.
// Dependencies: crate::{context, descriptor, error, text, transformer}
// ============================================================================

//! ## Overview
//! The no-operation policy hands the node back and requires the declared
//! return type to be able to hold it. The standard policy applies a
//! registered transformer when one exists for the return type and otherwise
//! falls back to the node itself. Both re-check assignability at call time
//! and fail the call instead of producing a mistyped value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::InvocationContext;
use crate::descriptor::MethodDescriptor;
use crate::error::InvocationError;
use crate::error::ValidationError;
use crate::text::TextNode;
use crate::text::TranslatableNode;
use crate::transformer::ComponentTransformer;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Custom result transformation strategy.
pub trait ResultTransformation: Send + Sync {
    /// Converts `node` into the method's declared return type.
    ///
    /// The boxed value must be of the type named by the method's return type.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when the node cannot be converted.
    fn transform(
        &self,
        node: TranslatableNode,
        context: &InvocationContext<'_>,
    ) -> Result<Box<dyn Any>, InvocationError>;

    /// Checks that the return type of `method` can be produced.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the return type is unsupported.
    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError>;
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Result transformation policy.
#[derive(Clone, Default)]
pub enum ResultPolicy {
    /// Returns the node unchanged.
    #[default]
    NoOperation,
    /// Applies a registered transformer, falling back to the node.
    Standard(ComponentTransformer),
    /// Delegates to a custom strategy.
    Custom(Arc<dyn ResultTransformation>),
}

impl ResultPolicy {
    /// Wraps a custom strategy.
    #[must_use]
    pub fn custom(transformation: impl ResultTransformation + 'static) -> Self {
        Self::Custom(Arc::new(transformation))
    }

    /// Converts `node` into the method's declared return type.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::UnsupportedReturnType`] when the return type
    /// can neither be produced by a transformer nor hold the node.
    pub fn transform(
        &self,
        node: TranslatableNode,
        context: &InvocationContext<'_>,
    ) -> Result<Box<dyn Any>, InvocationError> {
        let method = context.method();
        let return_type = method.return_type();
        match self {
            Self::NoOperation => unchanged(node, method),
            Self::Standard(transformer) => {
                if transformer.supports(return_type) {
                    transformer.transform(return_type, TextNode::Translatable(node)).map_err(|_| {
                        InvocationError::UnsupportedReturnType {
                            method: method.name().to_string(),
                            type_name: return_type.name(),
                        }
                    })
                } else {
                    unchanged(node, method)
                }
            }
            Self::Custom(transformation) => transformation.transform(node, context),
        }
    }

    /// Checks that the return type of `method` can be produced.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotNodeSupertype`] for the no-operation
    /// policy and [`ValidationError::UnsupportedReturnType`] for the standard
    /// policy when the return type is unsupported.
    pub fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError> {
        let return_type = method.return_type();
        match self {
            Self::NoOperation => {
                if TranslatableNode::is_assignable_to(return_type) {
                    Ok(())
                } else {
                    Err(ValidationError::NotNodeSupertype {
                        method: method.name().to_string(),
                        type_name: return_type.name(),
                    })
                }
            }
            Self::Standard(transformer) => {
                if transformer.supports(return_type)
                    || TranslatableNode::is_assignable_to(return_type)
                {
                    Ok(())
                } else {
                    Err(ValidationError::UnsupportedReturnType {
                        method: method.name().to_string(),
                        type_name: return_type.name(),
                    })
                }
            }
            Self::Custom(transformation) => transformation.validate(method),
        }
    }
}

impl fmt::Debug for ResultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOperation => f.write_str("ResultPolicy::NoOperation"),
            Self::Standard(transformer) => {
                f.debug_tuple("ResultPolicy::Standard").field(transformer).finish()
            }
            Self::Custom(_) => f.write_str("ResultPolicy::Custom(..)"),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the node as the method's return type when it can hold it.
fn unchanged(
    node: TranslatableNode,
    method: &MethodDescriptor,
) -> Result<Box<dyn Any>, InvocationError> {
    node.into_assignable(method.return_type()).map_err(|_| InvocationError::UnsupportedReturnType {
        method: method.name().to_string(),
        type_name: method.return_type().name(),
    })
}
