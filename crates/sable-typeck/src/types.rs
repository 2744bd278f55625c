//! Internal type representation

use serde::Serialize;
use std::fmt;

/// Internal type representation used by the type checker.
///
/// Types are plain values: composite types own their children and the
/// derived `PartialEq` is the structural equality the checker relies on
/// (order-sensitive for object fields and function parameters).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// Primitive types
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Unknown,

    /// Literal type carrying the exact value
    Literal { value: LiteralValue },

    /// Array type
    Array { element: Box<Type> },

    /// Object type with ordered fields
    Object { fields: Vec<Field> },

    /// Function type
    Function {
        params: Vec<Type>,
        returns: Box<Type>,
    },

    /// Union type
    Union { members: Vec<Type> },

    /// Intersection type
    Intersection { members: Vec<Type> },
}

/// Literal values
///
/// Numbers compare by bit pattern, so a `NaN` literal equals itself and
/// literal equality stays reflexive.
#[derive(Debug, Clone)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::Number(a), LiteralValue::Number(b)) => a.to_bits() == b.to_bits(),
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Null, LiteralValue::Null)
            | (LiteralValue::Undefined, LiteralValue::Undefined) => true,
            _ => false,
        }
    }
}

impl Serialize for LiteralValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LiteralValue::Number(n) => serializer.serialize_f64(*n),
            LiteralValue::String(s) => serializer.serialize_str(s),
            LiteralValue::Boolean(b) => serializer.serialize_bool(*b),
            LiteralValue::Null => serializer.serialize_unit(),
            // JSON has no undefined; the symbolic constant is spelled out
            LiteralValue::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

/// One named member of an object type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl Type {
    pub fn literal(value: LiteralValue) -> Self {
        Type::Literal { value }
    }

    pub fn array(element: Type) -> Self {
        Type::Array {
            element: Box::new(element),
        }
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Type::Object { fields }
    }

    pub fn function(params: Vec<Type>, returns: Type) -> Self {
        Type::Function {
            params,
            returns: Box::new(returns),
        }
    }

    pub fn union(members: Vec<Type>) -> Self {
        Type::Union { members }
    }

    pub fn intersection(members: Vec<Type>) -> Self {
        Type::Intersection { members }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Look up a field by name on an object type.
    pub fn field(&self, name: &str) -> Option<&Type> {
        match self {
            Type::Object { fields } => fields.iter().find(|f| f.name == name).map(|f| &f.ty),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::Boolean => write!(f, "boolean"),
            Type::Null => write!(f, "null"),
            Type::Undefined => write!(f, "undefined"),
            Type::Unknown => write!(f, "unknown"),
            Type::Literal { value } => write!(f, "{}", value),
            Type::Array { element } => match element.as_ref() {
                Type::Union { .. } | Type::Intersection { .. } | Type::Function { .. } => {
                    write!(f, "({})[]", element)
                }
                _ => write!(f, "{}[]", element),
            },
            Type::Object { fields } => {
                if fields.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                write!(f, " }}")
            }
            Type::Function { params, returns } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") => {}", returns)
            }
            Type::Union { members } => write_members(f, members, " | "),
            Type::Intersection { members } => write_members(f, members, " & "),
        }
    }
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[Type], sep: &str) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        match member {
            Type::Union { .. } | Type::Intersection { .. } | Type::Function { .. } => {
                write!(f, "({})", member)?
            }
            _ => write!(f, "{}", member)?,
        }
    }
    Ok(())
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::String(s) => write!(f, "{:?}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Undefined => write!(f, "undefined"),
        }
    }
}
