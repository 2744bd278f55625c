//! Statement definitions for the AST

use super::*;
use std::fmt;

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Expression statement
    Expr(Node<Expr>),

    /// Block: (do stmts...)
    Block(Vec<Node<Stmt>>),

    /// (let* ((name init)...) body...) or (const* ...)
    Let {
        kind: BindingKind,
        bindings: Vec<Binding>,
        body: Vec<Node<Stmt>>,
    },

    /// (type Name (params...) Type)
    TypeAlias {
        name: Node<Ident>,
        #[serde(default)]
        type_params: Vec<Node<Ident>>,
        ty: Node<TypeExpr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    Let,
    Const,
}

impl BindingKind {
    pub fn is_mutable(self) -> bool {
        matches!(self, BindingKind::Let)
    }
}

/// One `(name init)` pair of a `let*`/`const*`/`for` head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub name: Node<Ident>,
    #[serde(default)]
    pub type_annotation: Option<Node<TypeExpr>>,
    pub init: Node<Expr>,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Let => write!(f, "let*"),
            BindingKind::Const => write!(f, "const*"),
        }
    }
}
