//! Type Registry
//!
//! Name-indexed store of [`TypeDescriptor`]s. Besides lookup it answers the
//! hierarchy questions the metadata builder needs (ancestor chain,
//! transitive interfaces, assignability between erased types), allocates
//! instances, and performs virtual dispatch for method accessors.
//!
//! A registry is populated up front and then shared read-only behind an
//! `Arc`; built-in types (`Object`, `String`, the boxed primitives) are
//! always present.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::descriptor::{MethodDescriptor, Modifiers, TypeDescriptor};
use crate::error::{InvocationError, ReflectionError};
use crate::types::{PrimitiveType, TypeRef, FLOATING_TYPES, INTEGRAL_TYPES, ROOT_CLASS};
use crate::value::{Instance, ObjectRef, Value};

/// Upper bound on supertype walks; deeper chains are treated as cycles.
const MAX_HIERARCHY_DEPTH: usize = 256;

/// Registry of type descriptors, keyed by type name
#[derive(Debug)]
pub struct TypeRegistry {
    types: FxHashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create a registry holding the built-in types
    pub fn new() -> Self {
        let mut registry = Self {
            types: FxHashMap::default(),
        };
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        self.register(TypeDescriptor::root(ROOT_CLASS));
        self.register(TypeDescriptor::interface("CharSequence"));
        self.register(TypeDescriptor::class("String").implements("CharSequence"));
        self.register(TypeDescriptor::abstract_class("Number"));
        for numeric in INTEGRAL_TYPES.iter().chain(FLOATING_TYPES.iter()) {
            self.register(TypeDescriptor::class(numeric.boxed_class()).extends("Number"));
        }
        self.register(TypeDescriptor::class(PrimitiveType::Boolean.boxed_class()));
        self.register(TypeDescriptor::class(PrimitiveType::Char.boxed_class()));
    }

    /// Register (or redefine) a type
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.types
            .insert(descriptor.name.clone(), descriptor.clone());
        descriptor
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    /// Get a type by name, failing with `UnknownType`
    pub fn require(&self, name: &str) -> Result<&Arc<TypeDescriptor>, ReflectionError> {
        self.types.get(name).ok_or_else(|| ReflectionError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Check if a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered types
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Resolve the superclass of a type
    pub fn superclass_of(
        &self,
        desc: &TypeDescriptor,
    ) -> Result<Option<&Arc<TypeDescriptor>>, ReflectionError> {
        match &desc.superclass {
            Some(sup) => {
                let name = sup.raw_name().ok_or_else(|| ReflectionError::UnknownType {
                    name: sup.to_string(),
                })?;
                self.require(name).map(Some)
            }
            None => Ok(None),
        }
    }

    /// The class chain from `name` up to and including the root class
    pub fn hierarchy(&self, name: &str) -> Result<Vec<Arc<TypeDescriptor>>, ReflectionError> {
        let mut chain = Vec::new();
        let mut current = Some(self.require(name)?);

        while let Some(desc) = current {
            if chain.len() >= MAX_HIERARCHY_DEPTH
                || chain.iter().any(|c: &Arc<TypeDescriptor>| c.name == desc.name)
            {
                return Err(ReflectionError::CircularHierarchy {
                    name: desc.name.clone(),
                });
            }
            chain.push(desc.clone());
            current = self.superclass_of(desc)?;
        }

        Ok(chain)
    }

    /// `desc`'s directly implemented interfaces followed by all of their
    /// super-interfaces, breadth first, without duplicates
    pub fn interface_closure(
        &self,
        desc: &TypeDescriptor,
    ) -> Result<Vec<Arc<TypeDescriptor>>, ReflectionError> {
        let mut seen = FxHashSet::default();
        let mut result: Vec<Arc<TypeDescriptor>> = Vec::new();
        let mut queue: Vec<&TypeRef> = desc.interfaces.iter().collect();
        let mut next = 0;

        while next < queue.len() {
            let iface = queue[next];
            next += 1;
            let name = iface.raw_name().ok_or_else(|| ReflectionError::UnknownType {
                name: iface.to_string(),
            })?;
            if !seen.insert(name.to_string()) {
                continue;
            }
            let iface_desc = self.require(name)?;
            queue.extend(iface_desc.interfaces.iter());
            result.push(iface_desc.clone());
        }

        Ok(result)
    }

    /// Check if class or interface `sub` is `sup` or one of its descendants
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == ROOT_CLASS {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut stack = vec![sub];
        while let Some(name) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            let Some(desc) = self.types.get(name) else {
                continue;
            };
            for parent in desc.superclass.iter().chain(desc.interfaces.iter()) {
                if let Some(parent_name) = parent.raw_name() {
                    if parent_name == sup {
                        return true;
                    }
                    stack.push(parent_name);
                }
            }
        }

        false
    }

    /// Check if a value of erased type `source` can be stored in `target`
    ///
    /// Primitives are only assignable to themselves; arrays are covariant
    /// in their reference element types.
    pub fn is_assignable(&self, target: &TypeRef, source: &TypeRef) -> bool {
        if target == source {
            return true;
        }

        match (target, source) {
            (TypeRef::Array(t), TypeRef::Array(s)) => {
                !t.is_primitive() && !s.is_primitive() && self.is_assignable(t, s)
            }
            (TypeRef::Class(t), TypeRef::Array(_)) => t == ROOT_CLASS,
            (TypeRef::Array(_), _) => false,
            _ => match (target.raw_name(), source.raw_name()) {
                (Some(t), Some(s)) => self.is_subtype(s, t),
                _ => false,
            },
        }
    }

    /// Erase a declared type in the context of its declaring type
    ///
    /// Type variables become their bound (or the root class), parameterized
    /// types their raw class, and arrays are erased element-wise.
    pub fn erase(&self, ty: &TypeRef, declaring: &TypeDescriptor) -> TypeRef {
        match ty {
            TypeRef::Variable(name) => match declaring.type_param_named(name) {
                Some(param) => match &param.bound {
                    // A bound naming the variable itself would recurse forever.
                    Some(bound) if !matches!(bound, TypeRef::Variable(b) if b == name) => {
                        self.erase(bound, declaring)
                    }
                    _ => TypeRef::object(),
                },
                None => TypeRef::object(),
            },
            TypeRef::Parameterized { raw, .. } => TypeRef::Class(raw.clone()),
            TypeRef::Array(element) => TypeRef::array(self.erase(element, declaring)),
            other => other.clone(),
        }
    }

    // ========================================================================
    // Instances and dispatch
    // ========================================================================

    /// Allocate an instance with every instance field of the class chain
    /// set to its initial value. Constructors are not run.
    pub fn allocate(&self, name: &str) -> Result<ObjectRef, InvocationError> {
        let chain = self
            .hierarchy(name)
            .map_err(|e| InvocationError::failed(e.to_string()))?;
        if chain[0].is_abstract() {
            return Err(InvocationError::AbstractType {
                type_name: name.to_string(),
            });
        }

        let mut instance = Instance::new(name);
        // Base first, so a redeclared field keeps the most-derived initial value.
        for desc in chain.iter().rev() {
            for field in desc.fields.iter().filter(|f| !f.is_static()) {
                instance.insert(field.name.clone(), field.initial_value());
            }
        }

        Ok(ObjectRef::new(instance))
    }

    /// Find the implementation of `method` that a call on an object of
    /// `runtime_type` reaches
    ///
    /// Private and static methods are not virtual and never override.
    /// Otherwise the class chain is searched from `runtime_type` upward for
    /// a concrete instance method with the same name and erased parameter
    /// types; the method's own body (e.g. an interface default) is the
    /// fallback.
    pub fn find_implementation(
        &self,
        runtime_type: &str,
        method: &Arc<MethodDescriptor>,
    ) -> Option<Arc<MethodDescriptor>> {
        if !is_virtual(method) {
            return method.body().map(|_| method.clone());
        }

        let declaring = self.types.get(&method.declaring_type)?;
        let wanted: Vec<TypeRef> = method
            .params
            .iter()
            .map(|p| self.erase(p, declaring))
            .collect();

        if let Ok(chain) = self.hierarchy(runtime_type) {
            for desc in chain {
                let found = desc.methods.iter().find(|m| {
                    m.name == method.name
                        && (Arc::ptr_eq(m, method) || is_virtual(m))
                        && m.body().is_some()
                        && !m.is_generated()
                        && m.params.len() == wanted.len()
                        && m
                            .params
                            .iter()
                            .zip(&wanted)
                            .all(|(p, w)| &self.erase(p, &desc) == w)
                });
                if let Some(found) = found {
                    return Some(found.clone());
                }
            }
        }

        method.body().map(|_| method.clone())
    }

    /// Check if `value` may be stored in a slot of erased type `ty`
    pub fn value_conforms(&self, value: &Value, ty: &TypeRef) -> bool {
        match (value, ty) {
            (_, TypeRef::Void) => false,
            (Value::Null, t) => !t.is_primitive(),
            (_, TypeRef::Variable(_)) => true,
            (Value::Bool(_), TypeRef::Primitive(p)) => *p == PrimitiveType::Boolean,
            (Value::Int(i), TypeRef::Primitive(p)) => p.holds_int(*i),
            (Value::Float(_), TypeRef::Primitive(p)) => p.is_floating(),
            (Value::Char(_), TypeRef::Primitive(p)) => *p == PrimitiveType::Char,
            (_, TypeRef::Primitive(_)) => false,
            (Value::Array(items), TypeRef::Array(element)) => {
                items.iter().all(|item| self.value_conforms(item, element))
            }
            (_, TypeRef::Array(_)) => false,
            (value, target) => {
                let Some(target) = target.raw_name() else {
                    return false;
                };
                match value {
                    Value::Bool(_) => {
                        self.is_subtype(PrimitiveType::Boolean.boxed_class(), target)
                    }
                    Value::Int(i) => INTEGRAL_TYPES
                        .iter()
                        .filter(|p| p.holds_int(*i))
                        .any(|p| self.is_subtype(p.boxed_class(), target)),
                    Value::Float(_) => FLOATING_TYPES
                        .iter()
                        .any(|p| self.is_subtype(p.boxed_class(), target)),
                    Value::Char(_) => self.is_subtype(PrimitiveType::Char.boxed_class(), target),
                    Value::Str(_) => self.is_subtype("String", target),
                    Value::Array(_) => target == ROOT_CLASS,
                    Value::Object(obj) => self.is_subtype(&obj.type_name(), target),
                    Value::Null => true,
                }
            }
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Instance methods that are neither private nor static take part in overriding
fn is_virtual(method: &MethodDescriptor) -> bool {
    !method.modifiers.contains(Modifiers::PRIVATE) && !method.modifiers.is_static()
}
