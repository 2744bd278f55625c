//! Call checking: built-in operator forms and ordinary calls

use sable_ast::{Expr, Node, Span};

use crate::checker::TypeChecker;
use crate::error::{TypeError, TypeErrorKind};
use crate::helpers::TypeHelpers;
use crate::types::Type;

/// Operator classes recognized by callee name and arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Comparison,
    Equality,
    Logical,
    DoubleNot,
    TypeOf,
    Update,
    Not,
    Bitwise,
    Xor,
    InstanceOf,
    NullishCoalesce,
    CompoundAssign,
    Ternary,
}

impl Operator {
    /// Classify a call to `name` with `arity` arguments.
    ///
    /// An operator name with the wrong number of operands is not an operator
    /// form; it is checked as an ordinary call.
    pub(crate) fn classify(name: &str, arity: usize) -> Option<Operator> {
        let op = match (name, arity) {
            ("<" | "<=" | ">" | ">=", 2) => Operator::Comparison,
            ("==" | "===" | "!=" | "!==", 2) => Operator::Equality,
            ("and" | "or" | "&&" | "||", 2) => Operator::Logical,
            ("!!", 1) => Operator::DoubleNot,
            ("typeof", 1) => Operator::TypeOf,
            ("++" | "--", 1) => Operator::Update,
            ("not" | "!", 1) => Operator::Not,
            ("&" | "|" | "^" | "<<" | ">>" | ">>>", 2) => Operator::Bitwise,
            ("xor", 2) => Operator::Xor,
            ("instanceof", 2) => Operator::InstanceOf,
            ("??", 2) => Operator::NullishCoalesce,
            (
                "??=" | "+=" | "-=" | "*=" | "/=" | "%=" | "**=" | "<<=" | ">>=" | ">>>=" | "&="
                | "^=" | "|=" | "&&=" | "||=",
                2,
            ) => Operator::CompoundAssign,
            ("ternary" | "?:", 3) => Operator::Ternary,
            _ => return None,
        };
        Some(op)
    }
}

impl TypeChecker<'_> {
    pub(crate) fn check_call(
        &mut self,
        callee: &mut Node<Expr>,
        args: &mut [Node<Expr>],
        span: Span,
    ) -> Result<Type, TypeError> {
        let callee_ty = self.check_expr(callee)?;
        let mut arg_types = Vec::with_capacity(args.len());
        for arg in args.iter_mut() {
            arg_types.push(self.check_expr(arg)?);
        }

        if let Some(name) = callee.value.callee_name() {
            if let Some(op) = Operator::classify(name, args.len()) {
                return self.check_operator(op, name, args, &arg_types);
            }
        }

        match callee_ty {
            Type::Function { params, returns } => {
                if args.len() != params.len() {
                    return Err(TypeError::new(
                        TypeErrorKind::ArityMismatch {
                            expected: params.len(),
                            found: args.len(),
                        },
                        span,
                    ));
                }

                for (i, (param_ty, arg_ty)) in params.iter().zip(&arg_types).enumerate() {
                    if !TypeHelpers::is_assignable(arg_ty, param_ty) {
                        return Err(TypeError::new(
                            TypeErrorKind::ArgumentMismatch {
                                index: i + 1,
                                expected: param_ty.clone(),
                                found: arg_ty.clone(),
                            },
                            args[i].span,
                        ));
                    }
                }

                Ok(*returns)
            }
            Type::Unknown => Ok(Type::Unknown),
            other => Err(TypeError::new(
                TypeErrorKind::NotCallable(other),
                callee.span,
            )),
        }
    }

    fn check_operator(
        &self,
        op: Operator,
        name: &str,
        args: &[Node<Expr>],
        arg_types: &[Type],
    ) -> Result<Type, TypeError> {
        let operand = move |position: usize| (&args[position], &arg_types[position]);
        let require = move |position: usize, expected: &'static str, ok: fn(&Type) -> bool| {
            let (arg, ty) = operand(position);
            if ok(ty) {
                Ok(())
            } else {
                Err(TypeError::new(
                    TypeErrorKind::OperandMismatch {
                        operator: name.to_string(),
                        expected,
                        found: ty.clone(),
                        position: position + 1,
                    },
                    arg.span,
                ))
            }
        };
        let numeric = move |position| require(position, "number", TypeHelpers::is_numeric);
        let boolean = move |position| require(position, "boolean", TypeHelpers::is_boolean);

        match op {
            Operator::Comparison => {
                numeric(0)?;
                numeric(1)?;
                Ok(Type::Boolean)
            }
            Operator::Equality | Operator::DoubleNot => Ok(Type::Boolean),
            Operator::Logical | Operator::Xor => {
                boolean(0)?;
                boolean(1)?;
                Ok(Type::Boolean)
            }
            Operator::TypeOf => Ok(Type::String),
            Operator::Update => {
                let (arg, _) = operand(0);
                if !arg.value.is_assignment_target() {
                    return Err(TypeError::new(
                        TypeErrorKind::InvalidAssignmentTarget(name.to_string()),
                        arg.span,
                    ));
                }
                numeric(0)?;
                Ok(Type::Number)
            }
            Operator::Not => {
                boolean(0)?;
                Ok(Type::Boolean)
            }
            Operator::Bitwise => {
                numeric(0)?;
                numeric(1)?;
                Ok(Type::Number)
            }
            Operator::InstanceOf => {
                let (arg, ty) = operand(1);
                match ty {
                    Type::Unknown | Type::Function { .. } => Ok(Type::Boolean),
                    other => Err(TypeError::new(
                        TypeErrorKind::InstanceOfTarget(other.clone()),
                        arg.span,
                    )),
                }
            }
            Operator::NullishCoalesce => Ok(TypeHelpers::nullish_coalesce(
                &arg_types[0],
                &arg_types[1],
            )),
            Operator::CompoundAssign => {
                let (target_ty, (value, value_ty)) = (&arg_types[0], operand(1));
                if target_ty.is_unknown() {
                    return Ok(value_ty.clone());
                }
                self.expect_assignable(value_ty, target_ty, value.span)?;
                Ok(target_ty.clone())
            }
            Operator::Ternary => {
                let (test, test_ty) = operand(0);
                if !TypeHelpers::is_boolean(test_ty) {
                    return Err(TypeError::new(
                        TypeErrorKind::NonBooleanCondition(test_ty.clone()),
                        test.span,
                    ));
                }
                Ok(TypeHelpers::union_type(vec![
                    arg_types[1].clone(),
                    arg_types[2].clone(),
                ]))
            }
        }
    }
}
