//! Statement checking methods

use sable_ast::{Binding, Ident, Node, Span, Stmt, TypeExpr};

use crate::checker::TypeChecker;
use crate::error::{TypeError, TypeErrorKind};
use crate::helpers::TypeHelpers;
use crate::trace::{TraceData, TraceKind};
use crate::types::Type;

impl TypeChecker<'_> {
    pub(crate) fn check_stmt(&mut self, stmt: &mut Node<Stmt>) -> Result<Type, TypeError> {
        let span = stmt.span;
        let ty = match &mut stmt.value {
            Stmt::Expr(expr) => self.check_expr(expr)?,
            Stmt::Block(stmts) => self.with_scope(|this| this.check_stmts(stmts))?,
            Stmt::Let {
                kind,
                bindings,
                body,
            } => {
                let kind = *kind;
                let names = bindings.iter().map(|b| b.name.value.name.clone()).collect();
                self.emit(
                    TraceKind::BindingMutability,
                    Some(span),
                    TraceData::BindingMutability {
                        kind,
                        mutable: kind.is_mutable(),
                        names,
                    },
                );
                self.check_let(bindings, body)?
            }
            Stmt::TypeAlias {
                name,
                type_params,
                ty,
            } => {
                self.check_type_alias(name, type_params, ty)?;
                // Declarations produce no value
                return Ok(Type::Undefined);
            }
        };
        self.record(stmt, &ty);
        Ok(ty)
    }

    /// Check statements in sequence; the type of the last one, or undefined when empty.
    pub(crate) fn check_stmts(&mut self, stmts: &mut [Node<Stmt>]) -> Result<Type, TypeError> {
        let mut last = Type::Undefined;
        for stmt in stmts {
            last = self.check_stmt(stmt)?;
        }
        Ok(last)
    }

    fn check_let(
        &mut self,
        bindings: &mut [Binding],
        body: &mut [Node<Stmt>],
    ) -> Result<Type, TypeError> {
        self.with_scope(|this| {
            for binding in bindings.iter_mut() {
                this.check_binding(binding)?;
            }
            this.check_stmts(body)
        })
    }

    /// Check one `(name init)` pair and bind it in the current scope.
    ///
    /// An annotated binding takes the annotation as its type; otherwise the
    /// initializer type is widened.
    pub(crate) fn check_binding(&mut self, binding: &mut Binding) -> Result<Type, TypeError> {
        let init_ty = self.check_expr(&mut binding.init)?;
        let ty = match &binding.type_annotation {
            Some(annotation) => {
                let declared = self.resolve_type_expr(annotation)?;
                self.expect_assignable(&init_ty, &declared, binding.init.span)?;
                declared
            }
            None => TypeHelpers::widen(&init_ty),
        };
        tracing::trace!(name = %binding.name.value, %ty, "bind");
        self.bind(binding.name.value.symbol, ty.clone());
        self.record(&mut binding.name, &ty);
        Ok(ty)
    }

    fn check_type_alias(
        &mut self,
        name: &Node<Ident>,
        type_params: &[Node<Ident>],
        ty: &Node<TypeExpr>,
    ) -> Result<(), TypeError> {
        let resolved = self.with_scope(|this| {
            this.bind_type_params(type_params);
            this.resolve_type_expr(ty)
        })?;
        tracing::trace!(alias = %name.value, ty = %resolved, "type alias");
        self.env.define_type_alias(name.value.name.clone(), resolved);
        Ok(())
    }

    pub(crate) fn bind_type_params(&mut self, type_params: &[Node<Ident>]) {
        for param in type_params {
            self.env
                .define_type_param(param.value.name.clone(), Type::Unknown);
        }
    }

    pub(crate) fn expect_assignable(
        &self,
        actual: &Type,
        expected: &Type,
        span: Span,
    ) -> Result<(), TypeError> {
        if TypeHelpers::is_assignable(actual, expected) {
            Ok(())
        } else {
            Err(TypeError::new(
                TypeErrorKind::AssignmentMismatch {
                    expected: expected.clone(),
                    found: actual.clone(),
                },
                span,
            ))
        }
    }
}
