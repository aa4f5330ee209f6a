// crates/parlance-core/src/transformer.rs
// ============================================================================
// Module: Component Transformer Registry
// Description: Immutable map from return type to node conversion.
// Purpose: Let result policies turn translatable nodes into caller types.
// Dependencies: crate::{error, text, types}
// ============================================================================

//! ## Overview
//! The mirror image of the argument adapter: a [`ComponentTransformer`] maps a
//! declared return type to a function that consumes the assembled
//! [`TextNode`] and produces a value of that type. Registration follows the
//! same rules as the adapter: last write wins and `build()` copies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::text::TextNode;
use crate::types::TypeKey;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Type-erased node conversion.
type TransformFn = Arc<dyn Fn(TextNode) -> Box<dyn Any> + Send + Sync>;

/// Immutable component transformer registry.
///
/// # Invariants
/// - The mapping never changes after construction.
/// - The boxed value produced for a type key is always of that type.
#[derive(Clone, Default)]
pub struct ComponentTransformer {
    /// Conversions keyed by target type.
    mappings: Arc<HashMap<TypeKey, TransformFn>>,
}

impl ComponentTransformer {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> ComponentTransformerBuilder {
        ComponentTransformerBuilder::default()
    }

    /// Returns true when `ty` has a registered conversion.
    #[must_use]
    pub fn supports(&self, ty: TypeKey) -> bool {
        self.mappings.contains_key(&ty)
    }

    /// Converts `node` into a boxed value of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingTransformer`] when `ty` is not registered.
    pub fn transform(&self, ty: TypeKey, node: TextNode) -> Result<Box<dyn Any>, RegistryError> {
        let transform = self.mappings.get(&ty).ok_or(RegistryError::MissingTransformer {
            type_name: ty.name(),
        })?;
        Ok(transform(node))
    }

    /// Converts `node` into a `V`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingTransformer`] when `V` is not registered.
    pub fn transform_into<V: Any>(&self, node: TextNode) -> Result<V, RegistryError> {
        let ty = TypeKey::of::<V>();
        self.transform(ty, node)?.downcast::<V>().map(|value| *value).map_err(|_| {
            RegistryError::ValueMismatch {
                type_name: ty.name(),
            }
        })
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true when no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Seeds a new builder with this transformer's mappings.
    #[must_use]
    pub fn to_builder(&self) -> ComponentTransformerBuilder {
        ComponentTransformerBuilder {
            mappings: self.mappings.as_ref().clone(),
        }
    }
}

impl fmt::Debug for ComponentTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTransformer").field("types", &self.mappings.len()).finish()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Accumulates conversions for a [`ComponentTransformer`].
#[derive(Clone, Default)]
pub struct ComponentTransformerBuilder {
    /// Working map copied on build.
    mappings: HashMap<TypeKey, TransformFn>,
}

impl ComponentTransformerBuilder {
    /// Registers a conversion producing `V`, replacing any earlier one.
    #[must_use]
    pub fn register<V, F>(mut self, convert: F) -> Self
    where
        V: Any,
        F: Fn(TextNode) -> V + Send + Sync + 'static,
    {
        let transform: TransformFn =
            Arc::new(move |node: TextNode| Box::new(convert(node)) as Box<dyn Any>);
        self.mappings.insert(TypeKey::of::<V>(), transform);
        self
    }

    /// Copies the working map into an immutable transformer.
    #[must_use]
    pub fn build(&self) -> ComponentTransformer {
        ComponentTransformer {
            mappings: Arc::new(self.mappings.clone()),
        }
    }
}

impl fmt::Debug for ComponentTransformerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTransformerBuilder").field("types", &self.mappings.len()).finish()
    }
}
