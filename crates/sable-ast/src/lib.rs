//! # Sable AST
//!
//! Resolved program tree for the Sable compiler.
//! The tree arrives here after parsing, macro expansion and name resolution:
//! every identifier that names a binding already carries a [`SymbolId`].
//! The type checker writes a [`TypeId`] back into [`Node::ty`] for every node
//! that produces a value.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Core Types (kept in lib.rs - used by all modules)
// =============================================================================

/// Source location information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line of `start`
    pub line: u32,
    /// 1-based column of `start`
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

/// Index into the type checker's type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one name binding.
///
/// `Resolved` ids come from the name resolver. `ClassSelf` is minted by the
/// type checker, once per class expression, for the instance self-reference
/// inside method bodies; the two spaces can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolId {
    Resolved(u32),
    ClassSelf(u32),
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolId::Resolved(id) => write!(f, "${}", id),
            SymbolId::ClassSelf(class) => write!(f, "self@class{}", class),
        }
    }
}

/// AST node wrapper that includes span information and the checker's type slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    pub span: Span,
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeId>,
}

impl<T> Node<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self {
            span,
            value,
            ty: None,
        }
    }
}

/// Identifier, with the symbol assigned by name resolution (if any)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<SymbolId>,
}

impl Ident {
    /// An identifier the resolver left unbound (operators, globals).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: None,
        }
    }

    pub fn resolved(name: impl Into<String>, symbol: u32) -> Self {
        Self {
            name: name.into(),
            symbol: Some(SymbolId::Resolved(symbol)),
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A whole source file after name resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub file: String,
    pub body: Vec<Node<Stmt>>,
    #[serde(default)]
    pub span: Span,
}

// =============================================================================
// Module Declarations
// =============================================================================

pub mod types;
pub mod expr;
pub mod stmt;
pub mod walk;

// =============================================================================
// Re-exports
// =============================================================================

pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use walk::{walk_expr_mut, walk_stmt_mut, walk_stmts_mut, Walk};
