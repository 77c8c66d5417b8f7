//! Error types for metadata construction, queries and accessor invocation

use std::fmt;

use thiserror::Error;

use crate::types::TypeRef;

/// Which side of a property was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Read access (getter)
    Get,
    /// Write access (setter)
    Set,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Get => write!(f, "getter"),
            AccessKind::Set => write!(f, "setter"),
        }
    }
}

/// Errors raised while building or querying type metadata
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReflectionError {
    /// Two getters for one property with equal or unrelated return types
    #[error(
        "Illegal overloaded getter method with ambiguous type for property '{property}' in class '{type_name}'"
    )]
    AmbiguousGetter {
        /// Logical property name
        property: String,
        /// Type declaring the conflicting getter
        type_name: String,
    },

    /// Two setters for one property with unrelated parameter types
    #[error(
        "Ambiguous setters defined for property '{property}' in class '{type_name}' with types '{first}' and '{second}'"
    )]
    AmbiguousSetter {
        /// Logical property name
        property: String,
        /// Type declaring the conflicting setter
        type_name: String,
        /// Parameter type of the current winner
        first: TypeRef,
        /// Parameter type of the competing candidate
        second: TypeRef,
    },

    /// No getter or setter resolved under the requested name
    #[error("There is no {kind} for property named '{property}' in '{type_name}'")]
    NoSuchProperty {
        /// Getter or setter
        kind: AccessKind,
        /// Requested property name
        property: String,
        /// Introspected type
        type_name: String,
    },

    /// The type declares no zero-argument constructor
    #[error("There is no default constructor for '{type_name}'")]
    NoDefaultConstructor {
        /// Introspected type
        type_name: String,
    },

    /// A type (or one of its supertypes) is not registered
    #[error("Unknown type '{name}'")]
    UnknownType {
        /// Missing type name
        name: String,
    },

    /// A type reaches itself through its supertypes
    #[error("Circular type hierarchy detected at '{name}'")]
    CircularHierarchy {
        /// Type where the cycle was detected
        name: String,
    },
}

impl ReflectionError {
    /// Missing getter
    pub fn no_getter(property: &str, type_name: &str) -> Self {
        ReflectionError::NoSuchProperty {
            kind: AccessKind::Get,
            property: property.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// Missing setter
    pub fn no_setter(property: &str, type_name: &str) -> Self {
        ReflectionError::NoSuchProperty {
            kind: AccessKind::Set,
            property: property.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

/// Errors raised when an accessor or constructor actually runs
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvocationError {
    /// Target object is not an instance of the member's declaring type
    #[error("Object of type '{actual}' is not an instance of '{expected}'")]
    TargetMismatch {
        /// Declaring type of the member
        expected: String,
        /// Runtime type of the target
        actual: String,
    },

    /// Argument value does not fit the declared parameter or field type
    #[error("Argument of kind '{actual}' is not assignable to '{expected}' for member '{member}'")]
    ArgumentMismatch {
        /// Member name
        member: String,
        /// Declared type
        expected: TypeRef,
        /// Kind of the supplied value
        actual: String,
    },

    /// Wrong number of arguments
    #[error("Member '{member}' expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Member name
        member: String,
        /// Required arguments
        expected: usize,
        /// Supplied arguments
        actual: usize,
    },

    /// No concrete implementation reachable from the target's runtime type
    #[error("Method '{member}' has no implementation for '{type_name}'")]
    AbstractMethod {
        /// Method name
        member: String,
        /// Runtime type of the target
        type_name: String,
    },

    /// Interfaces and abstract classes cannot be instantiated
    #[error("Cannot instantiate abstract type '{type_name}'")]
    AbstractType {
        /// Type name
        type_name: String,
    },

    /// Non-public member and the permission set forbids private access
    #[error("Access to non-public member '{member}' of '{type_name}' is not permitted")]
    AccessDenied {
        /// Member name
        member: String,
        /// Declaring type
        type_name: String,
    },

    /// Field slot missing on the instance or in static storage
    #[error("Unknown field '{field}' on '{type_name}'")]
    UnknownField {
        /// Field name
        field: String,
        /// Type searched
        type_name: String,
    },

    /// A member or constructor body failed
    #[error("{message}")]
    Failed {
        /// Failure description
        message: String,
    },
}

impl InvocationError {
    /// Failure raised from inside a native member body
    pub fn failed(message: impl Into<String>) -> Self {
        InvocationError::Failed {
            message: message.into(),
        }
    }
}
