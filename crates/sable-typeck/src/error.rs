//! Type checking errors and diagnostics

use sable_ast::Span;
use serde::Serialize;
use thiserror::Error;

use crate::types::Type;

/// Type error kinds. `Display` is the user-facing diagnostic message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeErrorKind {
    #[error("unknown type reference '{0}'")]
    UnknownTypeReference(String),

    #[error("operand {position} of '{operator}' must be {expected}, found {found}")]
    OperandMismatch {
        operator: String,
        expected: &'static str,
        found: Type,
        position: usize,
    },

    #[error("operand of '{0}' must be an assignable identifier, property or index")]
    InvalidAssignmentTarget(String),

    #[error("condition must be boolean, found {0}")]
    NonBooleanCondition(Type),

    #[error("argument count mismatch: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("call argument type mismatch: argument {index} expected {expected}, found {found}")]
    ArgumentMismatch {
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("cannot call non-function of type {0}")]
    NotCallable(Type),

    #[error("cannot read property '{property}' of non-object type {ty}")]
    NotAnObject { property: String, ty: Type },

    #[error("unknown property '{property}' on type {ty}")]
    UnknownProperty { property: String, ty: Type },

    #[error("cannot index value of type {0}")]
    NotIndexable(Type),

    #[error("index must be numeric, found {0}")]
    NonNumericIndex(Type),

    #[error("type {found} is not assignable to {expected}")]
    AssignmentMismatch { expected: Type, found: Type },

    #[error("return type mismatch: expected {expected}, found {found}")]
    ReturnMismatch { expected: Type, found: Type },

    #[error("cannot return a value from a function declared to return void")]
    ValueReturnFromVoid,

    #[error("constructors cannot have a return type annotation")]
    ConstructorReturnAnnotation,

    #[error("type {found} cannot be asserted as {target}")]
    AssertionMismatch { target: Type, found: Type },

    #[error("right side of 'instanceof' must be a function, found {0}")]
    InstanceOfTarget(Type),
}

/// Type error with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Checking phase tag carried by diagnostics and trace events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[serde(rename = "typeCheck")]
    TypeCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub start: usize,
    pub end: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, span: Span) -> Self {
        Self {
            file: file.into(),
            line: span.line,
            column: span.column,
            start: span.start,
            end: span.end,
        }
    }
}

/// A reported problem, detached from the checker that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    #[serde(skip)]
    pub kind: TypeErrorKind,
    pub message: String,
    pub location: Location,
    pub phase: Phase,
}

impl Diagnostic {
    pub fn from_error(error: TypeError, file: &str) -> Self {
        Self {
            message: error.kind.to_string(),
            location: Location::new(file, error.span),
            kind: error.kind,
            phase: Phase::TypeCheck,
        }
    }
}
