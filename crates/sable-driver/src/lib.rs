//! Sable Driver Library
//!
//! Loads a serialized, name-resolved program tree, runs the type checker
//! over it and prepares the results for printing.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use sable_ast::Program;
use sable_typeck::{
    CheckOutput, Diagnostic, EventSink, TraceEvent, TraceKind, TracingSink, TypeTable,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed program tree in {}: {source}", path.display())]
    MalformedTree {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a program tree from a JSON file.
pub fn load_program(path: &Path) -> Result<Program, DriverError> {
    let text = load_source(path)?;
    parse_program(&text, path)
}

pub fn load_source(path: &Path) -> Result<String, DriverError> {
    fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_program(text: &str, path: &Path) -> Result<Program, DriverError> {
    serde_json::from_str(text).map_err(|source| DriverError::MalformedTree {
        path: path.to_path_buf(),
        source,
    })
}

/// Forwards every event to `tracing` and keeps the final type-table dump.
#[derive(Debug, Default)]
pub struct DumpSink {
    inner: TracingSink,
    pub dump: Option<TraceEvent>,
}

impl EventSink for DumpSink {
    fn emit(&mut self, event: TraceEvent) {
        if event.kind == TraceKind::TypeTableDump {
            self.dump = Some(event.clone());
        }
        self.inner.emit(event);
    }
}

/// A checked program together with the checker's results
#[derive(Debug)]
pub struct CheckRun {
    pub program: Program,
    pub output: CheckOutput,
    pub dump: Option<TraceEvent>,
}

impl CheckRun {
    pub fn has_errors(&self) -> bool {
        !self.output.diagnostics.is_empty()
    }
}

pub fn run_check(mut program: Program) -> CheckRun {
    let mut sink = DumpSink::default();
    let output = sable_typeck::check_program(&mut program, &mut sink);
    tracing::info!(
        file = %program.file,
        types = output.type_table.len(),
        diagnostics = output.diagnostics.len(),
        "checked"
    );
    CheckRun {
        program,
        output,
        dump: sink.dump,
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    program: &'a Program,
    type_table: &'a TypeTable,
    diagnostics: &'a [Diagnostic],
}

/// `{ program, type_table, diagnostics }` as pretty JSON.
pub fn to_json(run: &CheckRun) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        program: &run.program,
        type_table: &run.output.type_table,
        diagnostics: &run.output.diagnostics,
    })
}

/// One-line rendering used when no source text is available.
pub fn format_plain(diag: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {}",
        diag.location.file, diag.location.line, diag.location.column, diag.message
    )
}

pub fn format_type_table(table: &TypeTable) -> String {
    let mut out = String::new();
    for (id, ty) in table.iter() {
        let _ = writeln!(out, "{}: {}", id, ty);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sable_typeck::{Location, Phase, TypeErrorKind};

    const TREE: &str = r#"{
        "file": "main.sbl",
        "body": [
            { "span": { "start": 0, "end": 1, "line": 1, "column": 1 },
              "value": { "expr": {
                  "span": { "start": 0, "end": 1, "line": 1, "column": 1 },
                  "value": { "literal": { "number": 1.0 } } } } }
        ]
    }"#;

    #[test]
    fn test_parse_and_check() {
        let program = parse_program(TREE, Path::new("main.json")).unwrap();
        let run = run_check(program);

        assert!(!run.has_errors());
        assert_eq!(run.output.type_table.len(), 2);
        assert!(run.dump.is_some());
        assert_eq!(format_type_table(&run.output.type_table), "#0: 1\n#1: 1\n");
    }

    #[test]
    fn test_malformed_tree() {
        let err = parse_program("{ \"file\": 3 }", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, DriverError::MalformedTree { .. }));
        assert!(err.to_string().starts_with("malformed program tree in bad.json"));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("sable_missing_source.sbl");
        let err = load_source(&path).unwrap_err();
        assert!(matches!(err, DriverError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read "));
    }

    #[test]
    fn test_format_plain() {
        let diag = Diagnostic {
            kind: TypeErrorKind::ValueReturnFromVoid,
            message: "cannot return a value from a function declared to return void".into(),
            location: Location {
                file: "main.sbl".into(),
                line: 3,
                column: 7,
                start: 20,
                end: 30,
            },
            phase: Phase::TypeCheck,
        };
        assert_eq!(
            format_plain(&diag),
            "main.sbl:3:7: cannot return a value from a function declared to return void"
        );
    }
}
