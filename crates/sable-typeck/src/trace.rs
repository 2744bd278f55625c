//! Observational trace events emitted while checking

use sable_ast::{BindingKind, Program, SymbolId};
use serde::Serialize;

use crate::error::{Location, Phase};
use crate::table::TypeTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// Emitted once, after the whole program was checked
    TypeTableDump,
    /// A self-reference identifier was bound to its class's synthetic symbol
    SelfRetarget,
    /// One per `let*`/`const*` block
    BindingMutability,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TraceData {
    TypeTableDump {
        ast: Program,
        type_table: TypeTable,
    },
    SelfRetarget {
        name: String,
        symbol: SymbolId,
    },
    BindingMutability {
        kind: BindingKind,
        mutable: bool,
        names: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub phase: Phase,
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub data: TraceData,
}

/// Receiver for trace events. Consumers must not rely on ordering relative to diagnostics.
pub trait EventSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// Keeps every event in emission order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<TraceEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_kind(&self, kind: TraceKind) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: TraceEvent) {
        let (line, column) = event
            .location
            .as_ref()
            .map_or((0, 0), |loc| (loc.line, loc.column));
        match &event.data {
            TraceData::TypeTableDump { ast, type_table } => {
                tracing::debug!(
                    file = %ast.file,
                    types = type_table.len(),
                    "type table dump"
                );
                for (id, ty) in type_table.iter() {
                    tracing::trace!(%id, %ty, "type");
                }
            }
            TraceData::SelfRetarget { name, symbol } => {
                tracing::trace!(%name, %symbol, line, column, "self reference retargeted");
            }
            TraceData::BindingMutability {
                kind,
                mutable,
                names,
            } => {
                tracing::trace!(%kind, mutable, ?names, line, column, "bindings");
            }
        }
    }
}
