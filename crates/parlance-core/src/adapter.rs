// crates/parlance-core/src/adapter.rs
// ============================================================================
// Module: Argument Adapter Registry
// Description: Immutable map from declared argument type to conversion.
// Purpose: Back argument policies with an extensible, lock-free type registry.
// Dependencies: crate::{argument, error, text, types}
// ============================================================================

//! ## Overview
//! An [`ArgumentAdapter`] converts caller values into [`TranslationArgument`]s
//! by declared type. Adapters are built with an [`ArgumentAdapterBuilder`];
//! `build()` copies the working map, so later builder changes never reach an
//! already-built adapter. Registering a type twice keeps the last mapping.
//!
//! [`ArgumentAdapter::standard`] covers text nodes, pre-built arguments,
//! numbers, booleans, strings, and characters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use crate::argument::Number;
use crate::argument::TranslationArgument;
use crate::error::RegistryError;
use crate::text::TextNode;
use crate::text::TranslatableNode;
use crate::types::TypeKey;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Type-erased conversion; `None` means the value was not the registered type.
type AdaptFn = Arc<dyn Fn(&dyn Any) -> Option<TranslationArgument> + Send + Sync>;

/// Immutable argument adapter registry.
///
/// # Invariants
/// - The mapping never changes after construction.
/// - Clones share the same mapping.
#[derive(Clone)]
pub struct ArgumentAdapter {
    /// Conversions keyed by declared type.
    mappings: Arc<HashMap<TypeKey, AdaptFn>>,
}

impl ArgumentAdapter {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> ArgumentAdapterBuilder {
        ArgumentAdapterBuilder::new()
    }

    /// Returns the shared standard adapter.
    #[must_use]
    pub fn standard() -> Self {
        static STANDARD: OnceLock<ArgumentAdapter> = OnceLock::new();
        STANDARD.get_or_init(|| standard_builder().build()).clone()
    }

    /// Converts `value`, declared as `ty`, into a translation argument.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingAdapter`] when `ty` is not registered and
    /// [`RegistryError::ValueMismatch`] when `value` is not a `ty`.
    pub fn adapt(
        &self,
        ty: TypeKey,
        value: &dyn Any,
    ) -> Result<TranslationArgument, RegistryError> {
        let adapt = self.mappings.get(&ty).ok_or(RegistryError::MissingAdapter {
            type_name: ty.name(),
        })?;
        adapt(value).ok_or(RegistryError::ValueMismatch {
            type_name: ty.name(),
        })
    }

    /// Returns true when `ty` has a registered conversion.
    #[must_use]
    pub fn supports(&self, ty: TypeKey) -> bool {
        self.mappings.contains_key(&ty)
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

    /// Seeds a new builder with this adapter's mappings.
    #[must_use]
    pub fn to_builder(&self) -> ArgumentAdapterBuilder {
        ArgumentAdapterBuilder {
            mappings: self.mappings.as_ref().clone(),
        }
    }
}

impl Default for ArgumentAdapter {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ArgumentAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentAdapter").field("types", &self.mappings.len()).finish()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Accumulates conversions for an [`ArgumentAdapter`].
#[derive(Clone, Default)]
pub struct ArgumentAdapterBuilder {
    /// Working map copied on build.
    mappings: HashMap<TypeKey, AdaptFn>,
}

impl ArgumentAdapterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a direct conversion for `T`, replacing any earlier one.
    #[must_use]
    pub fn argument<T, F>(mut self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> TranslationArgument + Send + Sync + 'static,
    {
        let adapt: AdaptFn =
            Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&convert));
        self.mappings.insert(TypeKey::of::<T>(), adapt);
        self
    }

    /// Registers a conversion that produces a text node wrapped as a component.
    #[must_use]
    pub fn component<T, F>(self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> TextNode + Send + Sync + 'static,
    {
        self.argument::<T, _>(move |value| TranslationArgument::Component(convert(value)))
    }

    /// Registers a conversion that produces a string wrapped as literal text.
    #[must_use]
    pub fn string<T, F>(self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.component::<T, _>(move |value| TextNode::Text(convert(value)))
    }

    /// Copies the working map into an immutable adapter.
    #[must_use]
    pub fn build(&self) -> ArgumentAdapter {
        ArgumentAdapter {
            mappings: Arc::new(self.mappings.clone()),
        }
    }
}

impl fmt::Debug for ArgumentAdapterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentAdapterBuilder").field("types", &self.mappings.len()).finish()
    }
}

// ============================================================================
// SECTION: Standard Mappings
// ============================================================================

/// Registers `Number::from` for each listed numeric type.
macro_rules! numeric {
    ($builder:expr, $($numeric:ty),+) => {
        $builder$(
            .argument::<$numeric, _>(|value| TranslationArgument::Numeric(Number::from(*value)))
        )+
    };
}

/// Builds the standard mapping set.
fn standard_builder() -> ArgumentAdapterBuilder {
    let builder = ArgumentAdapterBuilder::new()
        .argument::<TranslationArgument, _>(TranslationArgument::clone)
        .component::<TextNode, _>(TextNode::clone)
        .component::<TranslatableNode, _>(|node| TextNode::Translatable(node.clone()))
        .argument::<Number, _>(|number| TranslationArgument::Numeric(*number))
        .argument::<bool, _>(|value| TranslationArgument::Boolean(*value))
        .string::<String, _>(String::clone)
        .string::<&'static str, _>(|value| (*value).to_string())
        .string::<char, _>(char::to_string);
    numeric!(builder, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64)
}
