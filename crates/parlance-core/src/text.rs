// crates/parlance-core/src/text.rs
// ============================================================================
// Module: Text Model
// Description: Composable text nodes and the special template argument kinds.
// Purpose: Provide the value types produced by and fed into the pipeline.
// Dependencies: crate::{argument, types}
// ============================================================================

//! ## Overview
//! [`TextNode`] is the composable value every dispatched message ends up as. A
//! dispatched call builds a [`TranslatableNode`] (key plus formatting inputs);
//! result policies then hand it back as-is or transform it.
//!
//! The special argument kinds live here as well: a raw template [`Tag`], a
//! [`TagResolver`] bundle that carries its own names, and the opaque
//! [`FormatTarget`] that designates who a message is rendered for.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::argument::FormattingInput;
use crate::types::TypeKey;

// ============================================================================
// SECTION: Text Nodes
// ============================================================================

/// Composable, localizable piece of text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextNode {
    /// Literal text.
    Text(String),
    /// Text looked up by key and formatted with arguments.
    Translatable(TranslatableNode),
    /// Ordered concatenation of child nodes.
    Composite(Vec<TextNode>),
}

impl TextNode {
    /// Creates a literal text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Creates an empty literal text node.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Appends `other` after this node.
    #[must_use]
    pub fn append(self, other: Self) -> Self {
        match self {
            Self::Composite(mut children) => {
                children.push(other);
                Self::Composite(children)
            }
            node => Self::Composite(vec![node, other]),
        }
    }

    /// Returns true when the node carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(content) => content.is_empty(),
            Self::Translatable(_) => false,
            Self::Composite(children) => children.iter().all(Self::is_empty),
        }
    }
}

impl From<TranslatableNode> for TextNode {
    fn from(node: TranslatableNode) -> Self {
        Self::Translatable(node)
    }
}

impl From<String> for TextNode {
    fn from(content: String) -> Self {
        Self::Text(content)
    }
}

impl From<&str> for TextNode {
    fn from(content: &str) -> Self {
        Self::Text(content.to_string())
    }
}

/// Text node built from a translation key and its formatting inputs.
///
/// # Invariants
/// - Inputs keep the order the argument policy produced them in.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatableNode {
    /// Translation key.
    key: String,
    /// Formatting inputs in adaptation order.
    arguments: Vec<FormattingInput>,
}

impl TranslatableNode {
    /// Creates a translatable node.
    #[must_use]
    pub fn new(key: impl Into<String>, arguments: Vec<FormattingInput>) -> Self {
        Self {
            key: key.into(),
            arguments,
        }
    }

    /// Returns the translation key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the formatting inputs.
    #[must_use]
    pub fn arguments(&self) -> &[FormattingInput] {
        &self.arguments
    }

    /// Returns true when a declared type can hold a translatable node unchanged.
    ///
    /// Only [`TranslatableNode`] itself and [`TextNode`] qualify.
    #[must_use]
    pub fn is_assignable_to(ty: TypeKey) -> bool {
        ty.is::<Self>() || ty.is::<TextNode>()
    }

    /// Boxes the node as `ty`, or returns it back when `ty` cannot hold it.
    ///
    /// # Errors
    ///
    /// Returns the node unchanged when `ty` is not a node supertype.
    pub fn into_assignable(self, ty: TypeKey) -> Result<Box<dyn Any>, Self> {
        if ty.is::<Self>() {
            Ok(Box::new(self))
        } else if ty.is::<TextNode>() {
            Ok(Box::new(TextNode::Translatable(self)))
        } else {
            Err(self)
        }
    }
}

// ============================================================================
// SECTION: Template Tags
// ============================================================================

/// Raw template tag passed straight through to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Inserts a node where the tag appears.
    Inserting(TextNode),
    /// Inserts raw template text that is parsed again by the formatter.
    Preprocessed(String),
}

impl Tag {
    /// Creates a tag that inserts `node`.
    #[must_use]
    pub const fn inserting(node: TextNode) -> Self {
        Self::Inserting(node)
    }

    /// Creates a tag that inserts raw template text.
    #[must_use]
    pub fn preprocessed(template: impl Into<String>) -> Self {
        Self::Preprocessed(template.into())
    }
}

/// Ordered bundle of named tags.
///
/// A resolver supplies its own names, so argument policies pass it through
/// without consulting a name resolver.
///
/// # Invariants
/// - Names are unique; registering a name again replaces the earlier tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagResolver {
    /// Named tags in registration order.
    tags: Vec<(String, Tag)>,
}

impl TagResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tags: Vec::new(),
        }
    }

    /// Adds or replaces the tag registered under `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, tag: Tag) -> Self {
        let name = name.into();
        if let Some(slot) = self.tags.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = tag;
        } else {
            self.tags.push((name, tag));
        }
        self
    }

    /// Merges `other` into this resolver; tags in `other` win on name clashes.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        other.tags.into_iter().fold(self, |resolver, (name, tag)| resolver.with(name, tag))
    }

    /// Looks up the tag registered under `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|(existing, _)| existing == name).map(|(_, tag)| tag)
    }

    /// Iterates the registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of registered tags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true when no tags are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

// ============================================================================
// SECTION: Format Target
// ============================================================================

/// Opaque value designating the context a message is rendered for.
///
/// # Invariants
/// - Equality is identity: two targets are equal only when they share the
///   same allocation.
#[derive(Clone)]
pub struct FormatTarget {
    /// Shared target value.
    value: Arc<dyn Any + Send + Sync>,
    /// Diagnostic name of the wrapped type.
    type_name: &'static str,
}

impl FormatTarget {
    /// Wraps `value` as a format target.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the wrapped value when it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns the diagnostic name of the wrapped type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for FormatTarget {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Eq for FormatTarget {}

impl fmt::Debug for FormatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FormatTarget").field(&self.type_name).finish()
    }
}
