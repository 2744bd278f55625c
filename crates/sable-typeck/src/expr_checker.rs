//! Expression checking methods

use sable_ast::{Binding, CatchClause, Expr, Ident, Literal, Node, ObjectProperty, Stmt};

use crate::checker::TypeChecker;
use crate::error::{TypeError, TypeErrorKind};
use crate::helpers::TypeHelpers;
use crate::types::{Field, LiteralValue, Type};

impl TypeChecker<'_> {
    /// Check an expression, write its type id into the node and return the type.
    pub(crate) fn check_expr(&mut self, expr: &mut Node<Expr>) -> Result<Type, TypeError> {
        let span = expr.span;
        let ty = match &mut expr.value {
            Expr::Literal(lit) => check_literal(lit),
            Expr::Ident(ident) => self.lookup(ident.symbol),
            Expr::Call { callee, args } => self.check_call(callee, args, span)?,
            Expr::If {
                test,
                consequent,
                alternate,
            } => self.check_if(test, consequent, alternate.as_deref_mut())?,
            Expr::Member { object, property } => self.check_member(object, property)?,
            Expr::Index { object, index } => self.check_index(object, index)?,
            // Bodies are checked once, in the real pass
            Expr::Function(func) if self.discovering() => self.function_signature(func)?,
            Expr::Class(_) if self.discovering() => Type::Unknown,
            Expr::Function(func) => self.check_function(func)?,
            Expr::Class(class) => self.check_class(class)?,
            Expr::TypeAssert { expr: inner, ty } => {
                let found = self.check_expr(inner)?;
                let target = self.resolve_type_expr(ty)?;
                if !TypeHelpers::is_assignable(&found, &target) {
                    return Err(TypeError::new(
                        TypeErrorKind::AssertionMismatch { target, found },
                        span,
                    ));
                }
                target
            }
            Expr::Throw(arg) => {
                self.check_expr(arg)?;
                Type::Undefined
            }
            Expr::While { test, body } => {
                self.check_condition(test)?;
                self.with_scope(|this| this.check_stmts(body))?;
                Type::Undefined
            }
            Expr::For {
                init,
                test,
                update,
                body,
            } => {
                self.check_for(init, test.as_deref_mut(), update.as_deref_mut(), body)?;
                Type::Undefined
            }
            Expr::Return(arg) => match arg {
                Some(arg) => self.check_expr(arg)?,
                None => Type::Undefined,
            },
            Expr::Try {
                body,
                catch,
                finally,
            } => {
                self.check_try(body, catch.as_mut(), finally.as_deref_mut())?;
                Type::Undefined
            }
            Expr::Array(elements) => self.check_array(elements)?,
            Expr::Object(properties) => self.check_object(properties)?,
            Expr::Assign { target, value } => self.check_assignment(target, value)?,
        };
        self.record(expr, &ty);
        Ok(ty)
    }

    /// Check a condition that must be boolean-compatible.
    pub(crate) fn check_condition(&mut self, test: &mut Node<Expr>) -> Result<Type, TypeError> {
        let ty = self.check_expr(test)?;
        if !TypeHelpers::is_boolean(&ty) {
            return Err(TypeError::new(
                TypeErrorKind::NonBooleanCondition(ty),
                test.span,
            ));
        }
        Ok(ty)
    }

    fn check_if(
        &mut self,
        test: &mut Node<Expr>,
        consequent: &mut Node<Stmt>,
        alternate: Option<&mut Node<Stmt>>,
    ) -> Result<Type, TypeError> {
        self.check_condition(test)?;
        let then_ty = self.check_stmt(consequent)?;
        let Some(alternate) = alternate else {
            return Ok(then_ty);
        };
        let else_ty = self.check_stmt(alternate)?;

        if TypeHelpers::types_equal(&then_ty, &else_ty) {
            Ok(then_ty)
        } else {
            Ok(Type::Unknown)
        }
    }

    fn check_member(
        &mut self,
        object: &mut Node<Expr>,
        property: &mut Node<Ident>,
    ) -> Result<Type, TypeError> {
        let object_ty = self.check_expr(object)?;
        let name = &property.value.name;

        let ty = match &object_ty {
            Type::Object { .. } => object_ty.field(name).cloned().ok_or_else(|| {
                TypeError::new(
                    TypeErrorKind::UnknownProperty {
                        property: name.clone(),
                        ty: object_ty.clone(),
                    },
                    property.span,
                )
            })?,
            // Host arrays carry properties we do not model
            Type::Array { .. } | Type::Unknown => Type::Unknown,
            Type::Intersection { members } => {
                if let Some(ty) = members.iter().find_map(|m| m.field(name)) {
                    ty.clone()
                } else if members.iter().any(Type::is_unknown) {
                    Type::Unknown
                } else {
                    return Err(TypeError::new(
                        TypeErrorKind::UnknownProperty {
                            property: name.clone(),
                            ty: object_ty.clone(),
                        },
                        property.span,
                    ));
                }
            }
            _ => {
                return Err(TypeError::new(
                    TypeErrorKind::NotAnObject {
                        property: name.clone(),
                        ty: object_ty.clone(),
                    },
                    object.span,
                ))
            }
        };
        self.record(property, &ty);
        Ok(ty)
    }

    fn check_index(
        &mut self,
        object: &mut Node<Expr>,
        index: &mut Node<Expr>,
    ) -> Result<Type, TypeError> {
        let object_ty = self.check_expr(object)?;
        let index_ty = self.check_expr(index)?;

        if !TypeHelpers::is_numeric(&index_ty) {
            return Err(TypeError::new(
                TypeErrorKind::NonNumericIndex(index_ty),
                index.span,
            ));
        }

        match object_ty {
            Type::Array { element } => Ok(*element),
            Type::Unknown => Ok(Type::Unknown),
            other => Err(TypeError::new(
                TypeErrorKind::NotIndexable(other),
                object.span,
            )),
        }
    }

    fn check_for(
        &mut self,
        init: &mut [Binding],
        test: Option<&mut Node<Expr>>,
        update: Option<&mut Node<Expr>>,
        body: &mut [Node<Stmt>],
    ) -> Result<(), TypeError> {
        self.with_scope(|this| {
            for binding in init.iter_mut() {
                this.check_binding(binding)?;
            }
            if let Some(test) = test {
                this.check_condition(test)?;
            }
            if let Some(update) = update {
                this.check_expr(update)?;
            }
            this.with_scope(|this| this.check_stmts(body))?;
            Ok(())
        })
    }

    fn check_try(
        &mut self,
        body: &mut [Node<Stmt>],
        catch: Option<&mut CatchClause>,
        finally: Option<&mut [Node<Stmt>]>,
    ) -> Result<(), TypeError> {
        self.with_scope(|this| this.check_stmts(body))?;

        if let Some(catch) = catch {
            self.with_scope(|this| {
                if let Some(param) = &mut catch.param {
                    this.bind(param.value.symbol, Type::Unknown);
                    this.record(param, &Type::Unknown);
                }
                this.check_stmts(&mut catch.body)
            })?;
        }

        if let Some(finally) = finally {
            self.with_scope(|this| this.check_stmts(finally))?;
        }
        Ok(())
    }

    fn check_array(&mut self, elements: &mut [Node<Expr>]) -> Result<Type, TypeError> {
        let mut elem_types = Vec::with_capacity(elements.len());
        for elem in elements.iter_mut() {
            let ty = self.check_expr(elem)?;
            elem_types.push(TypeHelpers::widen(&ty));
        }

        let elem_ty = TypeHelpers::common_type(&elem_types).unwrap_or(Type::Unknown);
        Ok(Type::array(elem_ty))
    }

    fn check_object(&mut self, properties: &mut [ObjectProperty]) -> Result<Type, TypeError> {
        let mut fields: Vec<Field> = Vec::with_capacity(properties.len());

        for prop in properties.iter_mut() {
            let ty = TypeHelpers::widen(&self.check_expr(&mut prop.value)?);
            let name = &prop.key.value.name;
            // A repeated key keeps its first position and its last value
            match fields.iter_mut().find(|f| &f.name == name) {
                Some(field) => field.ty = ty,
                None => fields.push(Field::new(name.clone(), ty)),
            }
        }

        Ok(Type::object(fields))
    }

    fn check_assignment(
        &mut self,
        target: &mut Node<Expr>,
        value: &mut Node<Expr>,
    ) -> Result<Type, TypeError> {
        let target_ty = match &target.value {
            Expr::Ident(ident) => {
                let ty = self.lookup(ident.symbol);
                self.record(target, &ty);
                ty
            }
            Expr::Member { .. } | Expr::Index { .. } => self.check_expr(target)?,
            _ => {
                return Err(TypeError::new(
                    TypeErrorKind::InvalidAssignmentTarget(":=".to_string()),
                    target.span,
                ))
            }
        };

        let value_ty = self.check_expr(value)?;
        self.expect_assignable(&value_ty, &target_ty, value.span)?;

        if let Some(discovery) = self.discovery.as_mut() {
            discovery.observe(target, &value_ty);
        }

        if let Expr::Ident(ident) = &target.value {
            let widened = TypeHelpers::widen(&value_ty);
            tracing::trace!(name = %ident, ty = %widened, "rebind");
            self.bind(ident.symbol, widened);
        }
        Ok(value_ty)
    }
}

fn check_literal(lit: &Literal) -> Type {
    let value = match lit {
        Literal::Number(n) => LiteralValue::Number(*n),
        Literal::String(s) => LiteralValue::String(s.clone()),
        Literal::Boolean(b) => LiteralValue::Boolean(*b),
        Literal::Null => LiteralValue::Null,
        Literal::Undefined => LiteralValue::Undefined,
        Literal::Regex(_) => return Type::Unknown,
    };
    Type::literal(value)
}
