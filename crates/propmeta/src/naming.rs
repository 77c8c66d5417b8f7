//! Property Naming
//!
//! Maps accessor method names to logical property names and classifies
//! methods as getter or setter candidates. The naming convention is a
//! pluggable [`PropertyNamer`]; [`JavaBeansNamer`] implements the usual
//! `getX` / `isX` / `setX` rules.

use crate::descriptor::MethodDescriptor;

/// Role a method plays for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorRole {
    /// Zero-argument reader
    Getter,
    /// One-argument writer
    Setter,
}

/// Naming convention for accessor methods
pub trait PropertyNamer: Send + Sync {
    /// Derive the property name from an accessor name
    fn method_to_property(&self, name: &str) -> String;

    /// `get` or `is` followed by at least one character
    fn is_getter(&self, name: &str) -> bool {
        (name.starts_with("get") && name.len() > 3) || (name.starts_with("is") && name.len() > 2)
    }

    /// `set` followed by at least one character
    fn is_setter(&self, name: &str) -> bool {
        name.starts_with("set") && name.len() > 3
    }
}

/// `getName` / `isActive` / `setName` convention
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaBeansNamer;

impl PropertyNamer for JavaBeansNamer {
    /// Strips the prefix and lowercases the first character, unless the
    /// remainder starts with two capitals (`getURL` stays `URL`).
    fn method_to_property(&self, name: &str) -> String {
        let rest = if let Some(rest) = name.strip_prefix("is") {
            rest
        } else if let Some(rest) = name.strip_prefix("get").or_else(|| name.strip_prefix("set")) {
            rest
        } else {
            name
        };

        let mut chars = rest.chars();
        let Some(first) = chars.next() else {
            return String::new();
        };
        let second_is_upper = chars.next().is_some_and(char::is_uppercase);
        if second_is_upper {
            return rest.to_string();
        }

        let mut property: String = first.to_lowercase().collect();
        property.push_str(&rest[first.len_utf8()..]);
        property
    }
}

/// Classify a method by name and arity
///
/// Returns the role and the derived property name, or `None` when the
/// method is not an accessor.
pub fn classify(
    namer: &dyn PropertyNamer,
    method: &MethodDescriptor,
) -> Option<(AccessorRole, String)> {
    let name = method.name.as_str();
    match method.arity() {
        0 if namer.is_getter(name) => Some((AccessorRole::Getter, namer.method_to_property(name))),
        1 if namer.is_setter(name) => Some((AccessorRole::Setter, namer.method_to_property(name))),
        _ => None,
    }
}
