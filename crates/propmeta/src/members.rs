//! Member Enumeration
//!
//! Collects every method callable on a type, private ones included: the
//! methods declared on the type and on each ancestor below the root class,
//! plus the methods of every interface they implement. Overrides collapse
//! onto one entry because methods are keyed by their erased signature and
//! the walk goes from the most-derived type upward.

use std::fmt;
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::error::ReflectionError;
use crate::registry::TypeRegistry;
use crate::types::{TypeRef, ROOT_CLASS};

/// Structural identity of a method: erased return type, name, and erased
/// parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Erased return type
    pub return_type: TypeRef,
    /// Method name
    pub name: String,
    /// Erased parameter types
    pub params: Vec<TypeRef>,
}

impl MethodSignature {
    /// Signature of `method` as declared on `declaring`
    pub fn of(
        registry: &TypeRegistry,
        method: &MethodDescriptor,
        declaring: &TypeDescriptor,
    ) -> Self {
        Self {
            return_type: registry.erase(&method.return_type, declaring),
            name: method.name.clone(),
            params: method
                .params
                .iter()
                .map(|p| registry.erase(p, declaring))
                .collect(),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { ':' } else { ',' }, param)?;
        }
        Ok(())
    }
}

/// All methods of `type_name`, deduplicated by signature
///
/// Order is the order of first recording: each class before its
/// interfaces, derived classes before their ancestors, declaration order
/// within a type.
pub fn class_methods(
    registry: &TypeRegistry,
    type_name: &str,
) -> Result<Vec<Arc<MethodDescriptor>>, ReflectionError> {
    let mut unique: IndexMap<MethodSignature, Arc<MethodDescriptor>> = IndexMap::new();

    for desc in registry.hierarchy(type_name)? {
        if desc.name == ROOT_CLASS {
            break;
        }
        add_unique_methods(registry, &mut unique, &desc);

        // Abstract classes need not redeclare the methods of their interfaces.
        for iface in registry.interface_closure(&desc)? {
            add_unique_methods(registry, &mut unique, &iface);
        }
    }

    Ok(unique.into_values().collect())
}

fn add_unique_methods(
    registry: &TypeRegistry,
    unique: &mut IndexMap<MethodSignature, Arc<MethodDescriptor>>,
    desc: &TypeDescriptor,
) {
    for method in desc.methods.iter().filter(|m| !m.is_generated()) {
        // An entry already present came from a subtype that overrides this method.
        if let Entry::Vacant(slot) = unique.entry(MethodSignature::of(registry, method, desc)) {
            slot.insert(method.clone());
        }
    }
}
