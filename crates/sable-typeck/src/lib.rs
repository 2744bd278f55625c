//! # Sable Type Checker
//!
//! Structural type checker for resolved Sable programs.
//! Infers and checks types over the tree in a single syntax-directed pass,
//! writes a type id into every value-producing node, and reports one
//! diagnostic per failing top-level statement.

mod error;
mod types;
mod table;
mod env;
mod helpers;
mod trace;
mod resolve;
mod returns;
mod checker;
mod stmt_checker;
mod expr_checker;
mod call_checker;
mod function_checker;

// Re-export public API
pub use error::{Diagnostic, Location, Phase, TypeError, TypeErrorKind};
pub use types::{Field, LiteralValue, Type};
pub use table::TypeTable;
pub use env::TypeEnv;
pub use helpers::TypeHelpers;
pub use trace::{EventSink, NullSink, RecordingSink, TraceData, TraceEvent, TraceKind, TracingSink};
pub use checker::{CheckOutput, TypeChecker};

use sable_ast::Program;

// =============================================================================
// Public API
// =============================================================================

/// Type check a program in place, returning the type table and diagnostics.
pub fn check_program(program: &mut Program, sink: &mut dyn EventSink) -> CheckOutput {
    let mut checker = TypeChecker::new(program.file.clone(), sink);
    checker.check_program(program);
    checker.finish()
}

// =============================================================================
// Tests
// =============================================================================
