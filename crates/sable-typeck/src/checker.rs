//! Main type checker struct

use sable_ast::{Node, Program, Span, SymbolId, TypeId};

use crate::env::TypeEnv;
use crate::error::{Diagnostic, Location, Phase, TypeError};
use crate::function_checker::FieldDiscovery;
use crate::table::TypeTable;
use crate::trace::{EventSink, TraceData, TraceEvent, TraceKind};
use crate::types::Type;

/// Name of the instance self-reference inside class methods
pub(crate) const SELF_NAME: &str = "self";

/// Everything one checker run hands back
#[derive(Debug, Clone)]
pub struct CheckOutput {
    pub type_table: TypeTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Main type checker
///
/// One instance checks one program; nothing is shared across instances.
pub struct TypeChecker<'s> {
    pub(crate) table: TypeTable,
    pub(crate) env: TypeEnv,
    pub(crate) diagnostics: Vec<Diagnostic>,
    sink: &'s mut dyn EventSink,
    file: String,
    next_class: u32,
    /// Field collection for the class whose methods are being checked.
    /// In scratch mode nothing is recorded, emitted or minted.
    pub(crate) discovery: Option<FieldDiscovery>,
}

impl<'s> TypeChecker<'s> {
    pub fn new(file: impl Into<String>, sink: &'s mut dyn EventSink) -> Self {
        Self {
            table: TypeTable::new(),
            env: TypeEnv::new(),
            diagnostics: Vec::new(),
            sink,
            file: file.into(),
            next_class: 0,
            discovery: None,
        }
    }

    /// Main entry point: type check a program in place.
    ///
    /// A failing top-level statement becomes one diagnostic and checking moves
    /// on to the next statement.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %program.file))]
    pub fn check_program(&mut self, program: &mut Program) {
        self.file.clone_from(&program.file);

        for stmt in program.body.iter_mut() {
            if let Err(err) = self.check_stmt(stmt) {
                tracing::debug!(
                    line = err.span.line,
                    column = err.span.column,
                    "{}",
                    err.kind
                );
                self.diagnostics.push(Diagnostic::from_error(err, &self.file));
            }
        }
        debug_assert_eq!(self.env.depth(), 1, "unbalanced scopes");

        let data = TraceData::TypeTableDump {
            ast: program.clone(),
            type_table: self.table.clone(),
        };
        self.emit(TraceKind::TypeTableDump, None, data);
    }

    pub fn finish(self) -> CheckOutput {
        CheckOutput {
            type_table: self.table,
            diagnostics: self.diagnostics,
        }
    }

    /// Run `f` inside a fresh scope, popping it again whether `f` fails or not.
    pub(crate) fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, TypeError>,
    ) -> Result<T, TypeError> {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    pub(crate) fn discovering(&self) -> bool {
        self.discovery.as_ref().is_some_and(|d| d.scratch)
    }

    /// Store `ty` in the table and write its id into the node.
    pub(crate) fn record<T>(&mut self, node: &mut Node<T>, ty: &Type) {
        if self.discovering() {
            return;
        }
        node.ty = Some(self.table.add(ty.clone()));
    }

    pub(crate) fn type_of(&self, id: Option<TypeId>) -> Type {
        id.map_or(Type::Undefined, |id| self.table.get(id).clone())
    }

    pub(crate) fn bind(&mut self, symbol: Option<SymbolId>, ty: Type) {
        if let Some(symbol) = symbol {
            self.env.set_type_for_symbol(symbol, ty);
        }
    }

    pub(crate) fn lookup(&self, symbol: Option<SymbolId>) -> Type {
        symbol
            .and_then(|symbol| self.env.get_type_for_symbol(symbol))
            .cloned()
            .unwrap_or(Type::Unknown)
    }

    pub(crate) fn fresh_class_symbol(&mut self) -> SymbolId {
        let symbol = SymbolId::ClassSelf(self.next_class);
        self.next_class += 1;
        symbol
    }

    pub(crate) fn emit(&mut self, kind: TraceKind, span: Option<Span>, data: TraceData) {
        if self.discovering() {
            return;
        }
        let location = span.map(|span| Location::new(self.file.clone(), span));
        self.sink.emit(TraceEvent {
            phase: Phase::TypeCheck,
            kind,
            location,
            data,
        });
    }
}
