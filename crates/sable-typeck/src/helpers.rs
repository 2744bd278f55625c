//! Assignability, equality and widening

use crate::types::{LiteralValue, Type};

/// Helper methods for type relations
pub struct TypeHelpers;

impl TypeHelpers {
    /// Structural equality. Literal types are equal only with identical values.
    pub fn types_equal(a: &Type, b: &Type) -> bool {
        a == b
    }

    /// Convert a literal type to its primitive base type; no-op otherwise.
    pub fn widen(ty: &Type) -> Type {
        match ty {
            Type::Literal { value } => match value {
                LiteralValue::Number(_) => Type::Number,
                LiteralValue::String(_) => Type::String,
                LiteralValue::Boolean(_) => Type::Boolean,
                LiteralValue::Null => Type::Null,
                LiteralValue::Undefined => Type::Undefined,
            },
            other => other.clone(),
        }
    }

    /// Whether a value of type `actual` may be used where `expected` is required.
    pub fn is_assignable(actual: &Type, expected: &Type) -> bool {
        if Self::types_equal(actual, expected) {
            return true;
        }

        // Unknown is the escape hatch in both directions
        if actual.is_unknown() || expected.is_unknown() {
            return true;
        }

        // Source is a union: ALL members must be assignable to target
        if let Type::Union { members } = actual {
            return members.iter().all(|m| Self::is_assignable(m, expected));
        }

        // Literal types are usable wherever their base type is
        if matches!(actual, Type::Literal { .. })
            && Self::is_assignable(&Self::widen(actual), expected)
        {
            return true;
        }

        match expected {
            // Equal literals were accepted above
            Type::Literal { .. } => false,
            Type::Union { members } => members.iter().any(|m| Self::is_assignable(actual, m)),
            Type::Intersection { members } => {
                members.iter().all(|m| Self::is_assignable(actual, m))
            }
            // Width subtyping: every expected field must exist with an assignable type
            Type::Object { fields } => match actual {
                Type::Object {
                    fields: actual_fields,
                } => fields.iter().all(|field| {
                    actual_fields
                        .iter()
                        .find(|f| f.name == field.name)
                        .is_some_and(|f| Self::is_assignable(&f.ty, &field.ty))
                }),
                _ => false,
            },
            // Array covariance
            Type::Array { element } => match actual {
                Type::Array {
                    element: actual_element,
                } => Self::is_assignable(actual_element, element),
                _ => false,
            },
            // Same arity, contravariant params, covariant return
            Type::Function { params, returns } => match actual {
                Type::Function {
                    params: actual_params,
                    returns: actual_returns,
                } => {
                    actual_params.len() == params.len()
                        && params
                            .iter()
                            .zip(actual_params)
                            .all(|(expected_param, actual_param)| {
                                Self::is_assignable(expected_param, actual_param)
                            })
                        && Self::is_assignable(actual_returns, returns)
                }
                _ => false,
            },
            _ => false,
        }
    }

    pub fn is_numeric(ty: &Type) -> bool {
        Self::is_assignable(ty, &Type::Number)
    }

    pub fn is_boolean(ty: &Type) -> bool {
        Self::is_assignable(ty, &Type::Boolean)
    }

    /// The type shared by every element, if they all agree structurally.
    pub fn common_type(types: &[Type]) -> Option<Type> {
        let (first, rest) = types.split_first()?;
        rest.iter()
            .all(|ty| Self::types_equal(ty, first))
            .then(|| first.clone())
    }

    /// Union of `types` with structural duplicates removed; a single member collapses.
    pub fn union_type(types: Vec<Type>) -> Type {
        let mut members: Vec<Type> = Vec::with_capacity(types.len());
        for ty in types {
            if !members.iter().any(|m| Self::types_equal(m, &ty)) {
                members.push(ty);
            }
        }
        match members.len() {
            0 => Type::Unknown,
            1 => members.remove(0),
            _ => Type::union(members),
        }
    }

    /// Remove null and undefined from a type. `None` when nothing is left.
    pub fn strip_nullish(ty: &Type) -> Option<Type> {
        match ty {
            Type::Union { members } => {
                let mut rest: Vec<Type> = members
                    .iter()
                    .filter(|m| !Self::is_nullish(m))
                    .cloned()
                    .collect();
                match rest.len() {
                    0 => None,
                    1 => Some(rest.remove(0)),
                    _ => Some(Type::union(rest)),
                }
            }
            ty if Self::is_nullish(ty) => None,
            ty => Some(ty.clone()),
        }
    }

    fn is_nullish(ty: &Type) -> bool {
        matches!(
            ty,
            Type::Null
                | Type::Undefined
                | Type::Literal {
                    value: LiteralValue::Null | LiteralValue::Undefined
                }
        )
    }

    /// Result type of `left ?? right`.
    ///
    /// A right side the non-nullish left already covers collapses into it.
    pub fn nullish_coalesce(left: &Type, right: &Type) -> Type {
        match Self::strip_nullish(left) {
            None => right.clone(),
            Some(left) if left.is_unknown() || right.is_unknown() => Type::Unknown,
            Some(left) if Self::is_assignable(right, &left) => left,
            Some(left) => Type::union(vec![left, right.clone()]),
        }
    }
}
