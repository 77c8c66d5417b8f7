//! Type Metadata
//!
//! A [`Reflector`] is the immutable, per-type property table: which
//! properties can be read or written, the accessor behind each, the
//! declared type of each, whether the type has a zero-argument
//! constructor, and a case-insensitive lookup of property names.
//!
//! Building one is the expensive part (see [`ReflectorBuilder`]); once
//! built, every query is a map lookup and the reflector can be shared
//! across threads behind an `Arc`.

mod builder;
mod conflict;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

pub use builder::{is_valid_property_name, ReflectorBuilder};

use crate::descriptor::{ConstructorDescriptor, TypeDescriptor};
use crate::error::{InvocationError, ReflectionError};
use crate::invoker::Accessor;
use crate::permissions::ReflectionPermission;
use crate::registry::TypeRegistry;
use crate::types::TypeRef;
use crate::value::ObjectRef;

/// Zero-argument constructor of a reflected type
#[derive(Debug, Clone)]
pub struct DefaultConstructor {
    registry: Arc<TypeRegistry>,
    type_name: String,
    constructor: ConstructorDescriptor,
    permissions: ReflectionPermission,
}

impl DefaultConstructor {
    pub(crate) fn new(
        registry: Arc<TypeRegistry>,
        type_name: String,
        constructor: ConstructorDescriptor,
        permissions: ReflectionPermission,
    ) -> Self {
        Self {
            registry,
            type_name,
            constructor,
            permissions,
        }
    }

    /// The underlying constructor
    pub fn descriptor(&self) -> &ConstructorDescriptor {
        &self.constructor
    }

    /// Allocate and initialize a new instance
    pub fn new_instance(&self) -> Result<ObjectRef, InvocationError> {
        if !self.permissions.allows_invoke(self.constructor.modifiers.is_public()) {
            return Err(InvocationError::AccessDenied {
                member: "<init>".to_string(),
                type_name: self.type_name.clone(),
            });
        }
        let instance = self.registry.allocate(&self.type_name)?;
        if let Some(init) = self.constructor.init() {
            init(&instance)?;
        }
        Ok(instance)
    }
}

/// Property metadata of one type
#[derive(Debug)]
pub struct Reflector {
    type_name: String,
    descriptor: Arc<TypeDescriptor>,
    readable: Vec<String>,
    writable: Vec<String>,
    getters: IndexMap<String, Accessor>,
    setters: IndexMap<String, Accessor>,
    getter_types: IndexMap<String, TypeRef>,
    setter_types: IndexMap<String, TypeRef>,
    default_constructor: Option<DefaultConstructor>,
    case_insensitive: FxHashMap<String, String>,
}

impl Reflector {
    /// Build the metadata of `type_name` with the default naming
    /// convention, type resolver and permissions
    pub fn new(registry: Arc<TypeRegistry>, type_name: &str) -> Result<Self, ReflectionError> {
        ReflectorBuilder::new(registry).build(type_name)
    }

    /// Name of the reflected type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Descriptor of the reflected type
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Zero-argument constructor, if the type declares one
    pub fn default_constructor(&self) -> Result<&DefaultConstructor, ReflectionError> {
        self.default_constructor
            .as_ref()
            .ok_or_else(|| ReflectionError::NoDefaultConstructor {
                type_name: self.type_name.clone(),
            })
    }

    /// Check for a zero-argument constructor
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    /// Accessor that writes `property`
    pub fn get_setter(&self, property: &str) -> Result<&Accessor, ReflectionError> {
        self.setters
            .get(property)
            .ok_or_else(|| ReflectionError::no_setter(property, &self.type_name))
    }

    /// Accessor that reads `property`
    pub fn get_getter(&self, property: &str) -> Result<&Accessor, ReflectionError> {
        self.getters
            .get(property)
            .ok_or_else(|| ReflectionError::no_getter(property, &self.type_name))
    }

    /// Declared type accepted by the setter of `property`
    pub fn setter_type(&self, property: &str) -> Result<&TypeRef, ReflectionError> {
        self.setter_types
            .get(property)
            .ok_or_else(|| ReflectionError::no_setter(property, &self.type_name))
    }

    /// Declared type returned by the getter of `property`
    pub fn getter_type(&self, property: &str) -> Result<&TypeRef, ReflectionError> {
        self.getter_types
            .get(property)
            .ok_or_else(|| ReflectionError::no_getter(property, &self.type_name))
    }

    /// Names of readable properties
    pub fn readable_property_names(&self) -> &[String] {
        &self.readable
    }

    /// Names of writable properties
    pub fn writable_property_names(&self) -> &[String] {
        &self.writable
    }

    /// Check if `property` is writable
    pub fn has_setter(&self, property: &str) -> bool {
        self.setters.contains_key(property)
    }

    /// Check if `property` is readable
    pub fn has_getter(&self, property: &str) -> bool {
        self.getters.contains_key(property)
    }

    /// Canonical name of a property given in any letter case
    pub fn find_property_name(&self, name: &str) -> Option<&str> {
        self.case_insensitive
            .get(&name.to_uppercase())
            .map(String::as_str)
    }
}
