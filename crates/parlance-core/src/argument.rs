// crates/parlance-core/src/argument.rs
// ============================================================================
// Module: Translation Arguments
// Description: Tagged argument values and the formatting inputs built from them.
// Purpose: Give argument policies a closed vocabulary for template inputs.
// Dependencies: crate::text
// ============================================================================

//! ## Overview
//! A [`TranslationArgument`] is one adapted caller value. Argument policies
//! wrap arguments (and the special tag, resolver, and target kinds) into
//! [`FormattingInput`]s, which are what a translatable node carries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::text::FormatTarget;
use crate::text::Tag;
use crate::text::TagResolver;
use crate::text::TextNode;

// ============================================================================
// SECTION: Numbers
// ============================================================================

/// Numeric argument payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point value.
    Float(f64),
}

/// Implements lossless `From` conversions into a [`Number`] variant.
macro_rules! number_from {
    ($variant:ident, $wide:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(value: $source) -> Self {
                    Self::$variant(<$wide>::from(value))
                }
            }
        )+
    };
}

number_from!(Int, i64, i8, i16, i32, i64);
number_from!(UInt, u64, u8, u16, u32, u64);
number_from!(Float, f64, f32, f64);

/// Widens a pointer-sized integer.
///
/// Lossless wherever pointers are at most 64 bits wide; on wider targets the
/// value saturates at `i64::MIN` or `i64::MAX` instead of wrapping.
impl From<isize> for Number {
    fn from(value: isize) -> Self {
        let saturated = if value < 0 { i64::MIN } else { i64::MAX };
        Self::Int(i64::try_from(value).unwrap_or(saturated))
    }
}

/// Widens a pointer-sized unsigned integer.
///
/// Lossless wherever pointers are at most 64 bits wide; on wider targets the
/// value saturates at `u64::MAX` instead of wrapping.
impl From<usize> for Number {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or(Self::UInt(u64::MAX), Self::UInt)
    }
}

// ============================================================================
// SECTION: Raw Values
// ============================================================================

/// Opaque value handed to the formatter without interpretation.
///
/// # Invariants
/// - Equality is identity of the shared allocation.
#[derive(Clone)]
pub struct RawValue {
    /// Shared payload.
    value: Arc<dyn Any + Send + Sync>,
    /// Diagnostic name of the payload type.
    type_name: &'static str,
}

impl RawValue {
    /// Wraps `value`.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the payload when it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawValue").field(&self.type_name).finish()
    }
}

// ============================================================================
// SECTION: Translation Arguments
// ============================================================================

/// One adapted argument value.
///
/// # Invariants
/// - Exactly one variant is populated; the variant decides how a template
///   engine consumes the value.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationArgument {
    /// Text node argument.
    Component(TextNode),
    /// Numeric argument.
    Numeric(Number),
    /// Boolean argument.
    Boolean(bool),
    /// Opaque argument.
    Raw(RawValue),
}

impl TranslationArgument {
    /// Creates a component argument.
    #[must_use]
    pub fn component(node: impl Into<TextNode>) -> Self {
        Self::Component(node.into())
    }

    /// Creates a numeric argument.
    #[must_use]
    pub fn numeric(number: impl Into<Number>) -> Self {
        Self::Numeric(number.into())
    }

    /// Creates a boolean argument.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    /// Creates an opaque argument.
    #[must_use]
    pub fn raw<T: Any + Send + Sync>(value: T) -> Self {
        Self::Raw(RawValue::new(value))
    }
}

// ============================================================================
// SECTION: Formatting Inputs
// ============================================================================

/// One input handed to the template formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattingInput {
    /// Argument addressed by declaration order.
    Positional(TranslationArgument),
    /// Argument addressed by name.
    Named {
        /// Template-facing name.
        name: String,
        /// Adapted value.
        value: TranslationArgument,
    },
    /// Raw template tag addressed by name.
    Tag {
        /// Template-facing name.
        name: String,
        /// Tag passed through unchanged.
        tag: Tag,
    },
    /// Bundle of tags that supplies its own names.
    Resolver(TagResolver),
    /// Formatting context target.
    Target(FormatTarget),
}

impl FormattingInput {
    /// Creates a named input.
    #[must_use]
    pub fn named(name: impl Into<String>, value: TranslationArgument) -> Self {
        Self::Named {
            name: name.into(),
            value,
        }
    }

    /// Returns the template-facing name for named inputs and tags.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named {
                name, ..
            }
            | Self::Tag {
                name, ..
            } => Some(name),
            Self::Positional(_) | Self::Resolver(_) | Self::Target(_) => None,
        }
    }
}
