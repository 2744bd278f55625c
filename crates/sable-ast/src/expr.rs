//! Expression definitions for the AST

use super::*;
use std::fmt;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Literal values
    Literal(Literal),

    /// Identifier
    Ident(Ident),

    /// Call form: (callee args...). Operators are calls to unbound identifiers.
    Call {
        callee: Box<Node<Expr>>,
        args: Vec<Node<Expr>>,
    },

    /// (if test consequent alternate?)
    If {
        test: Box<Node<Expr>>,
        consequent: Box<Node<Stmt>>,
        alternate: Option<Box<Node<Stmt>>>,
    },

    /// Property access: object.property
    Member {
        object: Box<Node<Expr>>,
        property: Node<Ident>,
    },

    /// Index access: object[index]
    Index {
        object: Box<Node<Expr>>,
        index: Box<Node<Expr>>,
    },

    /// Function expression: (fn name? (params) body...)
    Function(FunctionExpr),

    /// Class expression: (class name? fields... methods...)
    Class(ClassExpr),

    /// Type assertion: (as expr Type)
    TypeAssert {
        expr: Box<Node<Expr>>,
        ty: Node<TypeExpr>,
    },

    /// (throw expr)
    Throw(Box<Node<Expr>>),

    /// (while test body...)
    While {
        test: Box<Node<Expr>>,
        body: Vec<Node<Stmt>>,
    },

    /// (for (bindings...) test update body...)
    For {
        init: Vec<Binding>,
        test: Option<Box<Node<Expr>>>,
        update: Option<Box<Node<Expr>>>,
        body: Vec<Node<Stmt>>,
    },

    /// (return expr?)
    Return(Option<Box<Node<Expr>>>),

    /// (try body... (catch e ...) (finally ...))
    Try {
        body: Vec<Node<Stmt>>,
        catch: Option<CatchClause>,
        finally: Option<Vec<Node<Stmt>>>,
    },

    /// Array literal: [elem1, elem2, ...]
    Array(Vec<Node<Expr>>),

    /// Object literal: { key1: value1, key2: value2 }
    Object(Vec<ObjectProperty>),

    /// Assignment: (:= target value)
    Assign {
        target: Box<Node<Expr>>,
        value: Box<Node<Expr>>,
    },
}

impl Expr {
    /// Function and class expressions open a new `return` / self-reference context.
    pub fn is_function_boundary(&self) -> bool {
        matches!(self, Expr::Function(_) | Expr::Class(_))
    }

    /// Identifiers, property accesses and index accesses may be assigned to.
    pub fn is_assignment_target(&self) -> bool {
        matches!(self, Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. })
    }

    /// The callee name when this is a call to a plain identifier.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Expr::Ident(ident) => Some(ident.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub key: Node<Ident>,
    pub value: Node<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Node<Ident>,
    #[serde(default)]
    pub type_annotation: Option<Node<TypeExpr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpr {
    #[serde(default)]
    pub name: Option<Node<Ident>>,
    #[serde(default)]
    pub type_params: Vec<Node<Ident>>,
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<Node<TypeExpr>>,
    pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassExpr {
    #[serde(default)]
    pub name: Option<Node<Ident>>,
    #[serde(default)]
    pub fields: Vec<ClassField>,
    #[serde(default)]
    pub methods: Vec<Node<ClassMethod>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassField {
    pub name: Node<Ident>,
    #[serde(default)]
    pub type_annotation: Option<Node<TypeExpr>>,
    #[serde(default)]
    pub init: Option<Node<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Constructor,
    Method,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMethod {
    pub name: Node<Ident>,
    pub kind: MethodKind,
    #[serde(default)]
    pub type_params: Vec<Node<Ident>>,
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<Node<TypeExpr>>,
    pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub param: Option<Node<Ident>>,
    pub body: Vec<Node<Stmt>>,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
            Literal::Undefined => write!(f, "undefined"),
            Literal::Regex(pattern) => write!(f, "/{}/", pattern),
        }
    }
}
