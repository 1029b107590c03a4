//! Type descriptors and compatibility rules
//!
//! - [`TypeSpec`]: canonical type descriptor attached to symbol entries and
//!   intermediate-code nodes
//! - [`checker`]: the assignment-compatibility matrix and operand typing

pub mod checker;

use std::fmt;

/// Predefined scalar types.
///
/// `Undefined` is the sentinel given to anything whose type could not be
/// resolved; it is never absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Double,
    Char,
    Void,
    Undefined,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Int,
        Primitive::Float,
        Primitive::Double,
        Primitive::Char,
        Primitive::Void,
        Primitive::Undefined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Char => "char",
            Primitive::Void => "void",
            Primitive::Undefined => "undefined",
        }
    }
}

/// Structural form of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    Scalar,
    Array,
    Record,
}

/// A resolved type.
///
/// Arrays and records are only recognized (through `typedef` and
/// `struct`/`union` specifiers) so that they can be rejected where they are
/// not allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Primitive(Primitive),
    Array { element: Primitive, count: usize },
    Record { name: String },
}

impl TypeSpec {
    pub const INT: TypeSpec = TypeSpec::Primitive(Primitive::Int);
    pub const FLOAT: TypeSpec = TypeSpec::Primitive(Primitive::Float);
    pub const DOUBLE: TypeSpec = TypeSpec::Primitive(Primitive::Double);
    pub const CHAR: TypeSpec = TypeSpec::Primitive(Primitive::Char);
    pub const VOID: TypeSpec = TypeSpec::Primitive(Primitive::Void);
    pub const UNDEFINED: TypeSpec = TypeSpec::Primitive(Primitive::Undefined);

    pub fn form(&self) -> TypeForm {
        match self {
            TypeSpec::Primitive(_) => TypeForm::Scalar,
            TypeSpec::Array { .. } => TypeForm::Array,
            TypeSpec::Record { .. } => TypeForm::Record,
        }
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            TypeSpec::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        *self == TypeSpec::UNDEFINED
    }
}

impl Default for TypeSpec {
    fn default() -> Self {
        TypeSpec::UNDEFINED
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Primitive(p) => f.write_str(p.name()),
            TypeSpec::Array { element, count } => write!(f, "{}[{}]", element.name(), count),
            TypeSpec::Record { name } => write!(f, "struct {}", name),
        }
    }
}
