//! Return-flow collection

use std::convert::Infallible;

use sable_ast::{walk_stmts_mut, Expr, Node, Span, Stmt, TypeId, Walk};

/// One `return` reachable from a function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReturnSite {
    pub span: Span,
    /// Type of the returned expression; `None` for a bare `return`
    pub value: Option<TypeId>,
}

/// Gather every `return` in `body`, in source order.
///
/// Must run after the body was checked so argument nodes carry their types.
/// Returns of nested functions and classes belong to them and are skipped.
pub(crate) fn collect_returns(body: &mut [Node<Stmt>]) -> Vec<ReturnSite> {
    let mut sites = Vec::new();
    walk_stmts_mut(body, &mut |expr: &mut Node<Expr>| {
        if expr.value.is_function_boundary() {
            return Ok::<_, Infallible>(Walk::SkipChildren);
        }
        if let Expr::Return(arg) = &expr.value {
            sites.push(ReturnSite {
                span: expr.span,
                value: arg.as_ref().and_then(|arg| arg.ty),
            });
        }
        Ok(Walk::Continue)
    })
    .unwrap_or_else(|never| match never {});
    sites
}
