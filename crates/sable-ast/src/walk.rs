//! Shallow tree walking over expressions.
//!
//! The walker visits every expression reachable from a statement list in
//! pre-order. The callback decides, per node, whether to descend into its
//! children; returning [`Walk::SkipChildren`] for nodes where
//! [`Expr::is_function_boundary`] holds gives the "stop at nested functions"
//! traversal that return collection and self-reference retargeting need.

use super::*;

/// What the walker does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
}

pub fn walk_stmts_mut<E, F>(stmts: &mut [Node<Stmt>], visit: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Node<Expr>) -> Result<Walk, E>,
{
    for stmt in stmts {
        walk_stmt_mut(stmt, visit)?;
    }
    Ok(())
}

pub fn walk_stmt_mut<E, F>(stmt: &mut Node<Stmt>, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Node<Expr>) -> Result<Walk, E>,
{
    match &mut stmt.value {
        Stmt::Expr(expr) => walk_expr_mut(expr, visit),
        Stmt::Block(stmts) => walk_stmts_mut(stmts, visit),
        Stmt::Let { bindings, body, .. } => {
            for binding in bindings {
                walk_expr_mut(&mut binding.init, visit)?;
            }
            walk_stmts_mut(body, visit)
        }
        Stmt::TypeAlias { .. } => Ok(()),
    }
}

pub fn walk_expr_mut<E, F>(expr: &mut Node<Expr>, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&mut Node<Expr>) -> Result<Walk, E>,
{
    if visit(expr)? == Walk::SkipChildren {
        return Ok(());
    }

    match &mut expr.value {
        Expr::Literal(_) | Expr::Ident(_) => Ok(()),
        Expr::Call { callee, args } => {
            walk_expr_mut(callee, visit)?;
            for arg in args {
                walk_expr_mut(arg, visit)?;
            }
            Ok(())
        }
        Expr::If {
            test,
            consequent,
            alternate,
        } => {
            walk_expr_mut(test, visit)?;
            walk_stmt_mut(consequent, visit)?;
            if let Some(alternate) = alternate {
                walk_stmt_mut(alternate, visit)?;
            }
            Ok(())
        }
        Expr::Member { object, .. } => walk_expr_mut(object, visit),
        Expr::Index { object, index } => {
            walk_expr_mut(object, visit)?;
            walk_expr_mut(index, visit)
        }
        Expr::Function(func) => walk_stmts_mut(&mut func.body, visit),
        Expr::Class(class) => {
            for field in &mut class.fields {
                if let Some(init) = &mut field.init {
                    walk_expr_mut(init, visit)?;
                }
            }
            for method in &mut class.methods {
                walk_stmts_mut(&mut method.value.body, visit)?;
            }
            Ok(())
        }
        Expr::TypeAssert { expr, .. } => walk_expr_mut(expr, visit),
        Expr::Throw(arg) => walk_expr_mut(arg, visit),
        Expr::While { test, body } => {
            walk_expr_mut(test, visit)?;
            walk_stmts_mut(body, visit)
        }
        Expr::For {
            init,
            test,
            update,
            body,
        } => {
            for binding in init {
                walk_expr_mut(&mut binding.init, visit)?;
            }
            if let Some(test) = test {
                walk_expr_mut(test, visit)?;
            }
            if let Some(update) = update {
                walk_expr_mut(update, visit)?;
            }
            walk_stmts_mut(body, visit)
        }
        Expr::Return(arg) => match arg {
            Some(arg) => walk_expr_mut(arg, visit),
            None => Ok(()),
        },
        Expr::Try {
            body,
            catch,
            finally,
        } => {
            walk_stmts_mut(body, visit)?;
            if let Some(catch) = catch {
                walk_stmts_mut(&mut catch.body, visit)?;
            }
            if let Some(finally) = finally {
                walk_stmts_mut(finally, visit)?;
            }
            Ok(())
        }
        Expr::Array(items) => {
            for item in items {
                walk_expr_mut(item, visit)?;
            }
            Ok(())
        }
        Expr::Object(props) => {
            for prop in props {
                walk_expr_mut(&mut prop.value, visit)?;
            }
            Ok(())
        }
        Expr::Assign { target, value } => {
            walk_expr_mut(target, visit)?;
            walk_expr_mut(value, visit)
        }
    }
}
