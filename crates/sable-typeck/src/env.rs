//! Type environment (scoped symbol table)

use rustc_hash::FxHashMap;
use sable_ast::SymbolId;
use crate::types::Type;

/// Type environment with scoped symbol tables.
///
/// Symbol bindings and type-parameter bindings live on two stacks that are
/// always pushed and popped together. Type aliases are deliberately kept in
/// one flat table: a later alias of the same name replaces the earlier one.
#[derive(Debug, Clone)]
pub struct TypeEnv {
    scopes: Vec<FxHashMap<SymbolId, Type>>,
    type_param_scopes: Vec<FxHashMap<String, Type>>,
    type_aliases: FxHashMap<String, Type>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
            type_param_scopes: vec![FxHashMap::default()],
            type_aliases: FxHashMap::default(),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
        self.type_param_scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            self.type_param_scopes.pop();
        }
    }

    /// Number of open scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind in the innermost scope.
    pub fn set_type_for_symbol(&mut self, symbol: SymbolId, ty: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol, ty);
        }
    }

    pub fn get_type_for_symbol(&self, symbol: SymbolId) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&symbol))
    }

    pub fn define_type_param(&mut self, name: String, ty: Type) {
        if let Some(scope) = self.type_param_scopes.last_mut() {
            scope.insert(name, ty);
        }
    }

    pub fn lookup_type_param(&self, name: &str) -> Option<&Type> {
        self.type_param_scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    pub fn define_type_alias(&mut self, name: String, ty: Type) {
        self.type_aliases.insert(name, ty);
    }

    pub fn lookup_type_alias(&self, name: &str) -> Option<&Type> {
        self.type_aliases.get(name)
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
