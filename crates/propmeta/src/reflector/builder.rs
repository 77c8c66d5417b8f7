//! Reflector construction
//!
//! Drives one build: enumerate methods, classify them, resolve conflicts
//! per property, fall back to fields, then derive the name lists and the
//! case-insensitive alias table.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::conflict::{resolve_getter, resolve_setter};
use super::{DefaultConstructor, Reflector};
use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::error::ReflectionError;
use crate::invoker::{Accessor, FieldAccess, FieldAccessor, MethodAccessor};
use crate::members::class_methods;
use crate::naming::{classify, AccessorRole, JavaBeansNamer, PropertyNamer};
use crate::permissions::ReflectionPermission;
use crate::registry::TypeRegistry;
use crate::resolver::{GenericTypeResolver, TypeResolver};
use crate::types::TypeRef;

/// Prefix of compiler-internal member names
const INTERNAL_MARKER: char = '$';
/// Serialization version field
const SERIAL_VERSION_FIELD: &str = "serialVersionUID";
/// Name `getClass()` would map to
const TYPE_IDENTIFIER: &str = "class";

type Candidates = IndexMap<String, Vec<Arc<MethodDescriptor>>>;

/// Check if a name may become a property
pub fn is_valid_property_name(name: &str) -> bool {
    !(name.starts_with(INTERNAL_MARKER) || name == SERIAL_VERSION_FIELD || name == TYPE_IDENTIFIER)
}

/// Builds [`Reflector`]s with a configurable naming convention, type
/// resolver and permission set
#[derive(Clone)]
pub struct ReflectorBuilder {
    registry: Arc<TypeRegistry>,
    namer: Arc<dyn PropertyNamer>,
    resolver: Arc<dyn TypeResolver>,
    permissions: ReflectionPermission,
}

impl ReflectorBuilder {
    /// Builder with JavaBeans naming, generic resolution and full access
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            namer: Arc::new(JavaBeansNamer),
            resolver: Arc::new(GenericTypeResolver),
            permissions: ReflectionPermission::default(),
        }
    }

    /// Use a different naming convention
    pub fn with_namer(mut self, namer: Arc<dyn PropertyNamer>) -> Self {
        self.namer = namer;
        self
    }

    /// Use a different type resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Permissions captured by every accessor this builder creates
    pub fn with_permissions(mut self, permissions: ReflectionPermission) -> Self {
        self.permissions = permissions;
        self
    }

    /// The registry types are looked up in
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Build the metadata of `type_name`
    pub fn build(&self, type_name: &str) -> Result<Reflector, ReflectionError> {
        let descriptor = self.registry.require(type_name)?.clone();
        let mut props = Properties::default();

        let default_constructor = descriptor
            .constructors
            .iter()
            .find(|c| c.params.is_empty())
            .map(|c| {
                DefaultConstructor::new(
                    self.registry.clone(),
                    type_name.to_string(),
                    c.clone(),
                    self.permissions,
                )
            });

        let methods = class_methods(&self.registry, type_name)?;
        let (getters, setters) = self.collect_candidates(&methods);
        self.add_getters(&descriptor, getters, &mut props)?;
        self.add_setters(&descriptor, setters, &mut props)?;
        self.add_fields(&descriptor, &mut props)?;

        let readable: Vec<String> = props.getters.keys().cloned().collect();
        let writable: Vec<String> = props.setters.keys().cloned().collect();
        let mut case_insensitive = FxHashMap::default();
        for name in readable.iter().chain(writable.iter()) {
            case_insensitive.insert(name.to_uppercase(), name.clone());
        }

        debug!(
            type_name,
            readable = readable.len(),
            writable = writable.len(),
            default_constructor = default_constructor.is_some(),
            "built reflector"
        );

        Ok(Reflector {
            type_name: type_name.to_string(),
            descriptor,
            readable,
            writable,
            getters: props.getters,
            setters: props.setters,
            getter_types: props.getter_types,
            setter_types: props.setter_types,
            default_constructor,
            case_insensitive,
        })
    }

    fn collect_candidates(&self, methods: &[Arc<MethodDescriptor>]) -> (Candidates, Candidates) {
        let mut getters = Candidates::new();
        let mut setters = Candidates::new();

        for method in methods {
            let Some((role, property)) = classify(self.namer.as_ref(), method) else {
                continue;
            };
            if !is_valid_property_name(&property) {
                continue;
            }
            let group = match role {
                AccessorRole::Getter => &mut getters,
                AccessorRole::Setter => &mut setters,
            };
            group.entry(property).or_default().push(method.clone());
        }

        (getters, setters)
    }

    fn add_getters(
        &self,
        context: &TypeDescriptor,
        candidates: Candidates,
        props: &mut Properties,
    ) -> Result<(), ReflectionError> {
        for (property, methods) in candidates {
            let Some(winner) = resolve_getter(&self.registry, &property, &methods)? else {
                continue;
            };
            let ty = self.resolve(&winner.return_type, &winner.declaring_type, context)?;
            let accessor = MethodAccessor::new(winner, self.registry.clone(), self.permissions);
            props.getter_types.insert(property.clone(), ty);
            props.getters.insert(property, Accessor::Getter(accessor));
        }
        Ok(())
    }

    fn add_setters(
        &self,
        context: &TypeDescriptor,
        candidates: Candidates,
        props: &mut Properties,
    ) -> Result<(), ReflectionError> {
        for (property, methods) in candidates {
            let getter_type = props.getter_types.get(&property);
            let resolved = resolve_setter(&self.registry, &property, &methods, getter_type)?;
            let Some(winner) = resolved else {
                continue;
            };
            let Some(param) = winner.params.first() else {
                continue;
            };
            let ty = self.resolve(param, &winner.declaring_type, context)?;
            let accessor =
                MethodAccessor::new(winner.clone(), self.registry.clone(), self.permissions);
            props.setter_types.insert(property.clone(), ty);
            props.setters.insert(property, Accessor::Setter(accessor));
        }
        Ok(())
    }

    /// Field-backed accessors for properties no method covers
    ///
    /// Walks the class chain derived-first, so a field redeclared lower in
    /// the hierarchy hides the ancestor's.
    fn add_fields(
        &self,
        context: &TypeDescriptor,
        props: &mut Properties,
    ) -> Result<(), ReflectionError> {
        for desc in self.registry.hierarchy(&context.name)? {
            for field in &desc.fields {
                if !is_valid_property_name(&field.name) {
                    continue;
                }

                let needs_setter = !props.setters.contains_key(&field.name) && !field.is_constant();
                let needs_getter = !props.getters.contains_key(&field.name);
                if !needs_setter && !needs_getter {
                    continue;
                }

                let ty = self.resolve(&field.ty, &desc.name, context)?;
                if needs_setter {
                    trace!(field = %field.name, declaring = %desc.name, "field write fallback");
                    let accessor = FieldAccessor::new(
                        field.clone(),
                        FieldAccess::Write,
                        self.registry.clone(),
                        self.permissions,
                    );
                    props.setter_types.insert(field.name.clone(), ty.clone());
                    props.setters.insert(field.name.clone(), Accessor::Field(accessor));
                }
                if needs_getter {
                    trace!(field = %field.name, declaring = %desc.name, "field read fallback");
                    let accessor = FieldAccessor::new(
                        field.clone(),
                        FieldAccess::Read,
                        self.registry.clone(),
                        self.permissions,
                    );
                    props.getter_types.insert(field.name.clone(), ty);
                    props.getters.insert(field.name.clone(), Accessor::Field(accessor));
                }
            }
        }
        Ok(())
    }

    fn resolve(
        &self,
        declared: &TypeRef,
        declaring: &str,
        context: &TypeDescriptor,
    ) -> Result<TypeRef, ReflectionError> {
        let declaring = self.registry.require(declaring)?;
        Ok(self.resolver.resolve(&self.registry, declared, declaring, context))
    }
}

impl std::fmt::Debug for ReflectorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectorBuilder")
            .field("types", &self.registry.len())
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Maps filled while building
#[derive(Default)]
struct Properties {
    getters: IndexMap<String, Accessor>,
    setters: IndexMap<String, Accessor>,
    getter_types: IndexMap<String, TypeRef>,
    setter_types: IndexMap<String, TypeRef>,
}
