//! Generic Type Resolution
//!
//! A member declared on a generic ancestor sees its type variables bound
//! by the `extends` / `implements` clauses between the introspected type
//! and that ancestor:
//!
//! ```text
//! class Entity<ID> { ID getId() }
//! class User extends Entity<Long>
//! ```
//!
//! Resolving `getId`'s return type in the context of `User` yields `Long`.
//! The result is always erased: variables that stay unbound fall back to
//! their bound, parameterized types to their raw class.

use crate::descriptor::TypeDescriptor;
use crate::registry::TypeRegistry;
use crate::types::TypeRef;

/// Depth limit for supertype walks
const MAX_DEPTH: usize = 256;

/// Resolves declared member types to concrete erased types
pub trait TypeResolver: Send + Sync {
    /// Resolve `declared`, written on a member of `declaring`, as seen from
    /// an instance of `context`
    fn resolve(
        &self,
        registry: &TypeRegistry,
        declared: &TypeRef,
        declaring: &TypeDescriptor,
        context: &TypeDescriptor,
    ) -> TypeRef;
}

/// Substitutes type variables along the parameterized supertype chain
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericTypeResolver;

impl TypeResolver for GenericTypeResolver {
    fn resolve(
        &self,
        registry: &TypeRegistry,
        declared: &TypeRef,
        declaring: &TypeDescriptor,
        context: &TypeDescriptor,
    ) -> TypeRef {
        if declared.is_erased() {
            return declared.clone();
        }
        let initial = bound_arguments(registry, context);
        let substituted = match bindings_for(registry, &declaring.name, context, initial, 0) {
            Some(actuals) => substitute(declared, declaring, &actuals),
            None => declared.clone(),
        };
        registry.erase(&substituted, declaring)
    }
}

/// Type arguments of `declaring` as seen from `current`, whose own type
/// arguments are `actuals`
fn bindings_for(
    registry: &TypeRegistry,
    declaring: &str,
    current: &TypeDescriptor,
    actuals: Vec<TypeRef>,
    depth: usize,
) -> Option<Vec<TypeRef>> {
    if current.name == declaring {
        return Some(actuals);
    }
    if depth >= MAX_DEPTH {
        return None;
    }

    for parent in current.superclass.iter().chain(current.interfaces.iter()) {
        let (raw, args) = match parent {
            TypeRef::Class(raw) => (raw, &[][..]),
            TypeRef::Parameterized { raw, args } => (raw, args.as_slice()),
            _ => continue,
        };
        let Some(parent_desc) = registry.get(raw) else {
            continue;
        };

        // A raw supertype reference leaves the parent's variables to erasure.
        let next = if args.is_empty() {
            bound_arguments(registry, parent_desc)
        } else {
            args.iter()
                .map(|arg| registry.erase(&substitute(arg, current, &actuals), current))
                .collect()
        };

        if let Some(found) = bindings_for(registry, declaring, parent_desc, next, depth + 1) {
            return Some(found);
        }
    }

    None
}

/// Each type parameter of `desc` erased to its bound
fn bound_arguments(registry: &TypeRegistry, desc: &TypeDescriptor) -> Vec<TypeRef> {
    desc.type_params
        .iter()
        .map(|p| registry.erase(&TypeRef::Variable(p.name.clone()), desc))
        .collect()
}

/// Replace `owner`'s type variables in `ty` with `actuals`
fn substitute(ty: &TypeRef, owner: &TypeDescriptor, actuals: &[TypeRef]) -> TypeRef {
    match ty {
        TypeRef::Variable(name) => owner
            .type_params
            .iter()
            .position(|p| &p.name == name)
            .and_then(|i| actuals.get(i))
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        TypeRef::Parameterized { raw, args } => TypeRef::Parameterized {
            raw: raw.clone(),
            args: args.iter().map(|a| substitute(a, owner, actuals)).collect(),
        },
        TypeRef::Array(element) => TypeRef::array(substitute(element, owner, actuals)),
        other => other.clone(),
    }
}
