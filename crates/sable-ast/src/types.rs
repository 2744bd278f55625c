//! Type expressions as written in source annotations

use super::*;
use std::fmt;

/// Syntactic type expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// Built-in keyword: number, string, boolean, null, undefined, unknown
    Primitive(PrimitiveType),

    /// Named reference: a type parameter, an alias, or a keyword spelled as a name
    Named(String),

    /// Literal type: "hello" | 42 | true
    Literal(LiteralType),

    /// Array type: (Array T)
    Array(Box<Node<TypeExpr>>),

    /// Object type: { name: Type, ... }
    Object(Vec<ObjectTypeField>),

    /// Function type: (params) => ReturnType
    Function {
        params: Vec<Node<TypeExpr>>,
        returns: Box<Node<TypeExpr>>,
    },

    /// Union type: T1 | T2 | ...
    Union(Vec<Node<TypeExpr>>),

    /// Intersection type: T1 & T2 & ...
    Intersection(Vec<Node<TypeExpr>>),

    /// Type-level application: Base<Args...>
    Apply {
        base: Box<Node<TypeExpr>>,
        args: Vec<Node<TypeExpr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeField {
    pub name: String,
    pub ty: Node<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralType {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::String => write!(f, "string"),
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Null => write!(f, "null"),
            PrimitiveType::Undefined => write!(f, "undefined"),
            PrimitiveType::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(prim) => write!(f, "{}", prim),
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Literal(LiteralType::Number(n)) => write!(f, "{}", n),
            TypeExpr::Literal(LiteralType::String(s)) => write!(f, "{:?}", s),
            TypeExpr::Literal(LiteralType::Boolean(b)) => write!(f, "{}", b),
            TypeExpr::Literal(LiteralType::Null) => write!(f, "null"),
            TypeExpr::Literal(LiteralType::Undefined) => write!(f, "undefined"),
            TypeExpr::Array(elem) => write!(f, "(Array {})", elem.value),
            TypeExpr::Object(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", field.name, field.ty.value)?;
                }
                write!(f, " }}")
            }
            TypeExpr::Function { params, returns } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.value)?;
                }
                write!(f, ") => {}", returns.value)
            }
            TypeExpr::Union(members) => write_joined(f, members, " | "),
            TypeExpr::Intersection(members) => write_joined(f, members, " & "),
            TypeExpr::Apply { base, args } => {
                write!(f, "{}<", base.value)?;
                write_joined(f, args, ", ")?;
                write!(f, ">")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Node<TypeExpr>], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item.value)?;
    }
    Ok(())
}
