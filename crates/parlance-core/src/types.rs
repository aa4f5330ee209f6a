// crates/parlance-core/src/types.rs
// ============================================================================
// Module: Type Keys
// Description: Runtime type identity used to key registries and descriptors.
// Purpose: Replace reflective type tokens with `TypeId` plus a diagnostic name.
// Dependencies: std::any
// ============================================================================

//! ## Overview
//! A [`TypeKey`] names a concrete Rust type at runtime. Registries, parameter
//! descriptors, and return types are all keyed by it. Only the [`TypeId`]
//! participates in equality and hashing; the name exists for error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::any::type_name;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Runtime identity of a concrete type.
///
/// # Invariants
/// - Two keys are equal exactly when their `TypeId`s are equal.
/// - Generic instantiations are distinct keys (`Vec<u8>` differs from `Vec<u16>`).
#[derive(Clone, Copy)]
pub struct TypeKey {
    /// Compiler-assigned type identity.
    id: TypeId,
    /// Fully qualified type name for diagnostics.
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    #[must_use]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the underlying type identity.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the diagnostic type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true when this key names `T`.
    #[must_use]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
