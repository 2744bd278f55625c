//! Annotation resolution: syntactic type expressions to [`Type`]

use sable_ast::{LiteralType, Node, PrimitiveType, TypeExpr};

use crate::checker::TypeChecker;
use crate::error::{TypeError, TypeErrorKind};
use crate::types::{Field, LiteralValue, Type};

impl TypeChecker<'_> {
    /// Convert an annotation to a type.
    ///
    /// Named references are looked up as keywords, then in the open
    /// type-parameter scopes, then in the alias table. Any unresolved name,
    /// however deeply nested, fails the whole annotation.
    pub(crate) fn resolve_type_expr(&self, ty: &Node<TypeExpr>) -> Result<Type, TypeError> {
        match &ty.value {
            TypeExpr::Primitive(prim) => Ok(convert_primitive(*prim)),
            TypeExpr::Named(name) => self.resolve_named(name).ok_or_else(|| {
                TypeError::new(TypeErrorKind::UnknownTypeReference(name.clone()), ty.span)
            }),
            TypeExpr::Literal(lit) => Ok(Type::literal(convert_literal_type(lit))),
            TypeExpr::Array(elem) => Ok(Type::array(self.resolve_type_expr(elem)?)),
            TypeExpr::Object(fields) => {
                let mut resolved = Vec::with_capacity(fields.len());
                for field in fields {
                    resolved.push(Field::new(
                        field.name.clone(),
                        self.resolve_type_expr(&field.ty)?,
                    ));
                }
                Ok(Type::object(resolved))
            }
            TypeExpr::Function { params, returns } => {
                let params = self.resolve_all(params)?;
                let returns = self.resolve_type_expr(returns)?;
                Ok(Type::function(params, returns))
            }
            TypeExpr::Union(members) => Ok(Type::union(self.resolve_all(members)?)),
            TypeExpr::Intersection(members) => Ok(Type::intersection(self.resolve_all(members)?)),
            // No generic substitution: arguments are not even resolved
            TypeExpr::Apply { base, .. } => self.resolve_type_expr(base),
        }
    }

    fn resolve_all(&self, types: &[Node<TypeExpr>]) -> Result<Vec<Type>, TypeError> {
        types.iter().map(|ty| self.resolve_type_expr(ty)).collect()
    }

    fn resolve_named(&self, name: &str) -> Option<Type> {
        if let Some(keyword) = keyword_type(name) {
            return Some(keyword);
        }
        self.env
            .lookup_type_param(name)
            .or_else(|| self.env.lookup_type_alias(name))
            .cloned()
    }
}

fn keyword_type(name: &str) -> Option<Type> {
    let ty = match name {
        "number" => Type::Number,
        "string" => Type::String,
        "boolean" => Type::Boolean,
        "null" => Type::Null,
        "undefined" | "void" => Type::Undefined,
        "unknown" | "any" => Type::Unknown,
        _ => return None,
    };
    Some(ty)
}

fn convert_primitive(prim: PrimitiveType) -> Type {
    match prim {
        PrimitiveType::Number => Type::Number,
        PrimitiveType::String => Type::String,
        PrimitiveType::Boolean => Type::Boolean,
        PrimitiveType::Null => Type::Null,
        PrimitiveType::Undefined => Type::Undefined,
        PrimitiveType::Unknown => Type::Unknown,
    }
}

fn convert_literal_type(lit: &LiteralType) -> LiteralValue {
    match lit {
        LiteralType::Number(n) => LiteralValue::Number(*n),
        LiteralType::String(s) => LiteralValue::String(s.clone()),
        LiteralType::Boolean(b) => LiteralValue::Boolean(*b),
        LiteralType::Null => LiteralValue::Null,
        LiteralType::Undefined => LiteralValue::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::NullSink;
    use pretty_assertions::assert_eq;
    use sable_ast::{ObjectTypeField, Span};

    fn node(ty: TypeExpr) -> Node<TypeExpr> {
        Node::new(ty, Span::default())
    }

    fn named(name: &str) -> Node<TypeExpr> {
        node(TypeExpr::Named(name.to_string()))
    }

    #[test]
    fn test_keywords_resolve_before_aliases() {
        let mut sink = NullSink;
        let mut checker = TypeChecker::new("t", &mut sink);
        checker.env.define_type_alias("number".to_string(), Type::String);

        assert_eq!(checker.resolve_type_expr(&named("number")), Ok(Type::Number));
        assert_eq!(checker.resolve_type_expr(&named("void")), Ok(Type::Undefined));
        assert_eq!(checker.resolve_type_expr(&named("any")), Ok(Type::Unknown));
    }

    #[test]
    fn test_type_params_shadow_aliases() {
        let mut sink = NullSink;
        let mut checker = TypeChecker::new("t", &mut sink);
        checker.env.define_type_alias("T".to_string(), Type::String);
        checker.env.push_scope();
        checker.env.define_type_param("T".to_string(), Type::Unknown);

        assert_eq!(checker.resolve_type_expr(&named("T")), Ok(Type::Unknown));
        checker.env.pop_scope();
        assert_eq!(checker.resolve_type_expr(&named("T")), Ok(Type::String));
    }

    #[test]
    fn test_nested_unknown_name_fails_whole_annotation() {
        let mut sink = NullSink;
        let checker = TypeChecker::new("t", &mut sink);
        let ty = node(TypeExpr::Object(vec![ObjectTypeField {
            name: "items".to_string(),
            ty: node(TypeExpr::Array(Box::new(named("Missing")))),
        }]));

        let err = checker.resolve_type_expr(&ty).unwrap_err();
        assert_eq!(err.kind, TypeErrorKind::UnknownTypeReference("Missing".to_string()));
    }

    #[test]
    fn test_application_ignores_arguments() {
        let mut sink = NullSink;
        let mut checker = TypeChecker::new("t", &mut sink);
        checker.env.define_type_alias("Box".to_string(), Type::array(Type::Unknown));
        let ty = node(TypeExpr::Apply {
            base: Box::new(named("Box")),
            args: vec![named("NotDefinedAnywhere")],
        });

        assert_eq!(checker.resolve_type_expr(&ty), Ok(Type::array(Type::Unknown)));
    }
}
