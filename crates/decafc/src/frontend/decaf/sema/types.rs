//! Static types computed by the analyzer

use crate::frontend::decaf::ast::ScalarType;
use std::fmt;

/// Type of a symbol or expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    /// Fixed-size array; `len` is 0 when the declared size was invalid
    Array { element: ScalarType, len: u32 },
    /// Result of calling a `void` method
    Void,
    /// Sentinel for unresolved references
    Unknown,
}

impl Type {
    pub fn array(element: ScalarType, len: u32) -> Self {
        Type::Array { element, len }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Boolean)
    }

    /// Element type of an array, or `None` for anything else
    pub fn element(&self) -> Option<Type> {
        match self {
            Type::Array { element, .. } => Some(Type::from(*element)),
            _ => None,
        }
    }
}

impl From<ScalarType> for Type {
    fn from(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Int => Type::Int,
            ScalarType::Boolean => Type::Boolean,
        }
    }
}

impl From<Option<ScalarType>> for Type {
    /// Method return types: `None` is `void`
    fn from(ty: Option<ScalarType>) -> Self {
        ty.map_or(Type::Void, Type::from)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::Array { element, len } => write!(f, "{}[{}]", element, len),
            Type::Void => write!(f, "void"),
            Type::Unknown => write!(f, "unknown"),
        }
    }
}
