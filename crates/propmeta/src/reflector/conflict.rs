//! Accessor conflict resolution
//!
//! Several methods can map onto one property: a covariant override and the
//! method it overrides, an `isX` / `getX` pair, or overloaded setters. The
//! candidates are folded left to right and either one winner survives or
//! the whole type is rejected.

use std::sync::Arc;

use tracing::trace;

use crate::descriptor::MethodDescriptor;
use crate::error::ReflectionError;
use crate::registry::TypeRegistry;
use crate::types::TypeRef;

/// Erased return type of `method` in its declaring type
fn erased_return(registry: &TypeRegistry, method: &MethodDescriptor) -> TypeRef {
    match registry.get(&method.declaring_type) {
        Some(declaring) => registry.erase(&method.return_type, declaring),
        None => method.return_type.clone(),
    }
}

/// Erased type of the single parameter of a setter
fn erased_param(registry: &TypeRegistry, method: &MethodDescriptor) -> TypeRef {
    let param = method.params.first().cloned().unwrap_or(TypeRef::Void);
    match registry.get(&method.declaring_type) {
        Some(declaring) => registry.erase(&param, declaring),
        None => param,
    }
}

/// Pick the getter for `property` among `candidates`
///
/// A narrower return type beats a wider one; for primitive `boolean` the
/// `is` form beats `get`. Equal or unrelated return types are ambiguous.
pub(crate) fn resolve_getter(
    registry: &TypeRegistry,
    property: &str,
    candidates: &[Arc<MethodDescriptor>],
) -> Result<Option<Arc<MethodDescriptor>>, ReflectionError> {
    let mut winner: Option<&Arc<MethodDescriptor>> = None;

    for candidate in candidates {
        let Some(current) = winner else {
            winner = Some(candidate);
            continue;
        };

        let winner_type = erased_return(registry, current);
        let candidate_type = erased_return(registry, candidate);

        if candidate_type == winner_type {
            if !candidate_type.is_boolean() {
                return Err(ambiguous_getter(property, current));
            }
            if candidate.name.starts_with("is") {
                trace!(property, method = %candidate.name, "boolean getter prefers is-form");
                winner = Some(candidate);
            }
        } else if registry.is_assignable(&candidate_type, &winner_type) {
            trace!(property, kept = %current.declaring_type, "getter keeps narrower return type");
        } else if registry.is_assignable(&winner_type, &candidate_type) {
            trace!(
                property,
                chosen = %candidate.declaring_type,
                "getter switches to narrower return type"
            );
            winner = Some(candidate);
        } else {
            return Err(ambiguous_getter(property, current));
        }
    }

    Ok(winner.cloned())
}

fn ambiguous_getter(property: &str, method: &MethodDescriptor) -> ReflectionError {
    ReflectionError::AmbiguousGetter {
        property: property.to_string(),
        type_name: method.declaring_type.clone(),
    }
}

/// Pick the setter for `property` among `candidates`
///
/// A setter whose parameter is exactly `getter_type` wins outright.
/// Otherwise the more specific parameter type wins; once two unrelated
/// parameter types meet, only an exact match can still rescue the property.
pub(crate) fn resolve_setter(
    registry: &TypeRegistry,
    property: &str,
    candidates: &[Arc<MethodDescriptor>],
    getter_type: Option<&TypeRef>,
) -> Result<Option<Arc<MethodDescriptor>>, ReflectionError> {
    let mut best: Option<&Arc<MethodDescriptor>> = None;
    let mut ambiguity: Option<ReflectionError> = None;

    for setter in candidates {
        if getter_type.is_some_and(|ty| erased_param(registry, setter) == *ty) {
            trace!(property, declaring = %setter.declaring_type, "setter matches getter type");
            return Ok(Some(setter.clone()));
        }
        if ambiguity.is_some() {
            continue;
        }
        match pick_better_setter(registry, property, best, setter) {
            Ok(picked) => best = Some(picked),
            Err(err) => {
                best = None;
                ambiguity = Some(err);
            }
        }
    }

    match (best, ambiguity) {
        (Some(setter), _) => Ok(Some(setter.clone())),
        (None, Some(err)) => Err(err),
        (None, None) => Ok(None),
    }
}

fn pick_better_setter<'a>(
    registry: &TypeRegistry,
    property: &str,
    current: Option<&'a Arc<MethodDescriptor>>,
    candidate: &'a Arc<MethodDescriptor>,
) -> Result<&'a Arc<MethodDescriptor>, ReflectionError> {
    let Some(current) = current else {
        return Ok(candidate);
    };

    let current_type = erased_param(registry, current);
    let candidate_type = erased_param(registry, candidate);

    if registry.is_assignable(&current_type, &candidate_type) {
        Ok(candidate)
    } else if registry.is_assignable(&candidate_type, &current_type) {
        Ok(current)
    } else {
        Err(ReflectionError::AmbiguousSetter {
            property: property.to_string(),
            type_name: candidate.declaring_type.clone(),
            first: current_type,
            second: candidate_type,
        })
    }
}
