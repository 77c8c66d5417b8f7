//! Declared Types
//!
//! `TypeRef` is the type of a member exactly as it is written in a type
//! descriptor: on a field, in a method signature, or in an `extends` /
//! `implements` clause. Generic declarations keep their type variables;
//! [`TypeResolver`](crate::TypeResolver) substitutes and erases them.

use std::fmt;

/// Name of the universal root class. Every reference type is assignable to it.
pub const ROOT_CLASS: &str = "Object";

/// Primitive (unboxed) value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `char`
    Char,
}

impl PrimitiveType {
    /// Source-level name of the primitive
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Char => "char",
        }
    }

    /// Name of the wrapper class used when the primitive is boxed
    pub fn boxed_class(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Short => "Short",
            PrimitiveType::Int => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
            PrimitiveType::Char => "Character",
        }
    }

    /// Floating point types accept `Value::Float`
    pub fn is_floating(&self) -> bool {
        matches!(self, PrimitiveType::Float | PrimitiveType::Double)
    }

    /// Check if the integer `value` is representable in this type
    pub fn holds_int(&self, value: i64) -> bool {
        match self {
            PrimitiveType::Byte => i8::try_from(value).is_ok(),
            PrimitiveType::Short => i16::try_from(value).is_ok(),
            PrimitiveType::Int => i32::try_from(value).is_ok(),
            PrimitiveType::Long | PrimitiveType::Float | PrimitiveType::Double => true,
            PrimitiveType::Boolean | PrimitiveType::Char => false,
        }
    }
}

/// Primitives whose boxed classes accept `Value::Int`
pub(crate) const INTEGRAL_TYPES: [PrimitiveType; 4] = [
    PrimitiveType::Byte,
    PrimitiveType::Short,
    PrimitiveType::Int,
    PrimitiveType::Long,
];

/// Primitives whose boxed classes accept `Value::Float`
pub(crate) const FLOATING_TYPES: [PrimitiveType; 2] = [PrimitiveType::Float, PrimitiveType::Double];

/// A declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (method return type only)
    Void,
    /// A primitive type
    Primitive(PrimitiveType),
    /// A raw class or interface, by name
    Class(String),
    /// An array of the element type
    Array(Box<TypeRef>),
    /// A generic class applied to type arguments, e.g. `List<String>`
    Parameterized {
        /// Generic class name
        raw: String,
        /// Type arguments, in declaration order of the class's type parameters
        args: Vec<TypeRef>,
    },
    /// A type variable, e.g. `T`
    Variable(String),
}

impl TypeRef {
    /// `boolean`
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(PrimitiveType::Boolean);
    /// `int`
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveType::Int);
    /// `long`
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveType::Long);
    /// `double`
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveType::Double);
    /// `char`
    pub const CHAR: TypeRef = TypeRef::Primitive(PrimitiveType::Char);

    /// A raw class reference
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    /// The root class
    pub fn object() -> Self {
        TypeRef::Class(ROOT_CLASS.to_string())
    }

    /// The built-in `String` class
    pub fn string() -> Self {
        TypeRef::Class("String".to_string())
    }

    /// An array of `element`
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// A generic class applied to `args`
    pub fn parameterized(raw: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Parameterized {
            raw: raw.into(),
            args,
        }
    }

    /// A type variable
    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable(name.into())
    }

    /// Primitive `boolean` (not the boxed `Boolean` class)
    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveType::Boolean))
    }

    /// Check if this is a primitive type
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Class name for class and parameterized types
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) | TypeRef::Parameterized { raw: name, .. } => Some(name),
            _ => None,
        }
    }

    /// True when no type variable or type argument remains
    pub fn is_erased(&self) -> bool {
        match self {
            TypeRef::Void | TypeRef::Primitive(_) | TypeRef::Class(_) => true,
            TypeRef::Array(element) => element.is_erased(),
            TypeRef::Parameterized { .. } | TypeRef::Variable(_) => false,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Class(name.to_string())
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(primitive: PrimitiveType) -> Self {
        TypeRef::Primitive(primitive)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Primitive(p) => write!(f, "{}", p.name()),
            TypeRef::Class(name) | TypeRef::Variable(name) => write!(f, "{}", name),
            TypeRef::Array(element) => write!(f, "{}[]", element),
            TypeRef::Parameterized { raw, args } => {
                write!(f, "{}<", raw)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
        }
    }
}
