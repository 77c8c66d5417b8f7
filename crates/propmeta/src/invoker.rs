//! Accessors
//!
//! An [`Accessor`] is the uniform read/write operation behind one property:
//! invoke it with no argument to read, with one argument to write. Only
//! three shapes exist, so it is a closed enum rather than a trait object:
//!
//! | Variant  | Backed by                  | Argument        |
//! |----------|----------------------------|-----------------|
//! | `Getter` | zero-argument method       | none            |
//! | `Setter` | one-argument method        | the new value   |
//! | `Field`  | field slot, read or write  | value on write  |
//!
//! Every invocation checks the permission set captured at build time, the
//! target's runtime type, and the argument against the declared type.

use std::sync::Arc;

use crate::descriptor::{FieldDescriptor, MethodDescriptor, TypeDescriptor};
use crate::error::InvocationError;
use crate::permissions::ReflectionPermission;
use crate::registry::TypeRegistry;
use crate::types::TypeRef;
use crate::value::{ObjectRef, Value};

/// Method-backed accessor
#[derive(Debug, Clone)]
pub struct MethodAccessor {
    method: Arc<MethodDescriptor>,
    param_types: Vec<TypeRef>,
    registry: Arc<TypeRegistry>,
    permissions: ReflectionPermission,
}

impl MethodAccessor {
    pub(crate) fn new(
        method: Arc<MethodDescriptor>,
        registry: Arc<TypeRegistry>,
        permissions: ReflectionPermission,
    ) -> Self {
        let param_types = match registry.get(&method.declaring_type) {
            Some(declaring) => method
                .params
                .iter()
                .map(|p| registry.erase(p, declaring))
                .collect(),
            None => method.params.clone(),
        };
        Self {
            method,
            param_types,
            registry,
            permissions,
        }
    }

    /// The wrapped method
    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    /// Call the method on `target`, dispatching virtually on its runtime type
    pub fn call(&self, target: &ObjectRef, args: &[Value]) -> Result<Value, InvocationError> {
        let method = &self.method;
        if !self.permissions.allows_invoke(method.modifiers.is_public()) {
            return Err(InvocationError::AccessDenied {
                member: method.name.clone(),
                type_name: method.declaring_type.clone(),
            });
        }

        let runtime_type = check_target(&self.registry, target, &method.declaring_type)?;

        if args.len() != self.param_types.len() {
            return Err(InvocationError::ArgumentCount {
                member: method.name.clone(),
                expected: self.param_types.len(),
                actual: args.len(),
            });
        }
        for (arg, ty) in args.iter().zip(&self.param_types) {
            check_argument(&self.registry, &method.name, arg, ty)?;
        }

        let abstract_method = || InvocationError::AbstractMethod {
            member: method.name.clone(),
            type_name: runtime_type.clone(),
        };
        let implementation = self
            .registry
            .find_implementation(&runtime_type, method)
            .ok_or_else(abstract_method)?;
        let body = implementation.body().ok_or_else(abstract_method)?;
        body(target, args)
    }
}

/// Direction of a field accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// Read the slot
    Read,
    /// Overwrite the slot
    Write,
}

/// Field-backed accessor
#[derive(Debug, Clone)]
pub struct FieldAccessor {
    field: Arc<FieldDescriptor>,
    access: FieldAccess,
    field_type: TypeRef,
    registry: Arc<TypeRegistry>,
    permissions: ReflectionPermission,
}

impl FieldAccessor {
    pub(crate) fn new(
        field: Arc<FieldDescriptor>,
        access: FieldAccess,
        registry: Arc<TypeRegistry>,
        permissions: ReflectionPermission,
    ) -> Self {
        let field_type = match registry.get(&field.declaring_type) {
            Some(declaring) => registry.erase(&field.ty, declaring),
            None => field.ty.clone(),
        };
        Self {
            field,
            access,
            field_type,
            registry,
            permissions,
        }
    }

    /// The wrapped field
    pub fn field(&self) -> &Arc<FieldDescriptor> {
        &self.field
    }

    /// Read or write direction
    pub fn access(&self) -> FieldAccess {
        self.access
    }

    /// Read the field. Static fields ignore `target`'s slots.
    pub fn read(&self, target: &ObjectRef) -> Result<Value, InvocationError> {
        let field = &self.field;
        if !self.permissions.allows_read(field.modifiers.is_public()) {
            return Err(self.access_denied());
        }
        if field.is_static() {
            return self.static_owner()?.static_value(&field.name).ok_or_else(|| {
                InvocationError::UnknownField {
                    field: field.name.clone(),
                    type_name: field.declaring_type.clone(),
                }
            });
        }
        check_target(&self.registry, target, &field.declaring_type)?;
        target.field(&field.name)
    }

    /// Overwrite the field
    pub fn write(&self, target: &ObjectRef, value: Value) -> Result<(), InvocationError> {
        let field = &self.field;
        if !self.permissions.allows_write(field.modifiers.is_public()) {
            return Err(self.access_denied());
        }
        check_argument(&self.registry, &field.name, &value, &self.field_type)?;
        if field.is_static() {
            return self.static_owner()?.set_static_value(&field.name, value);
        }
        check_target(&self.registry, target, &field.declaring_type)?;
        target.set_field(&field.name, value)
    }

    fn static_owner(&self) -> Result<&Arc<TypeDescriptor>, InvocationError> {
        self.registry
            .get(&self.field.declaring_type)
            .ok_or_else(|| InvocationError::UnknownField {
                field: self.field.name.clone(),
                type_name: self.field.declaring_type.clone(),
            })
    }

    fn access_denied(&self) -> InvocationError {
        InvocationError::AccessDenied {
            member: self.field.name.clone(),
            type_name: self.field.declaring_type.clone(),
        }
    }
}

/// Uniform read/write operation for one property
#[derive(Debug, Clone)]
pub enum Accessor {
    /// Zero-argument method
    Getter(MethodAccessor),
    /// One-argument method
    Setter(MethodAccessor),
    /// Direct field access
    Field(FieldAccessor),
}

impl Accessor {
    /// Invoke with no argument (read) or one argument (write)
    ///
    /// Returns the value read, or `None` for writes and `void` methods.
    pub fn invoke(
        &self,
        target: &ObjectRef,
        arg: Option<Value>,
    ) -> Result<Option<Value>, InvocationError> {
        match self {
            Accessor::Getter(m) | Accessor::Setter(m) => {
                let args: Vec<Value> = arg.into_iter().collect();
                let result = m.call(target, &args)?;
                Ok(match m.method().return_type {
                    TypeRef::Void => None,
                    _ => Some(result),
                })
            }
            Accessor::Field(f) => match (f.access(), arg) {
                (FieldAccess::Read, None) => f.read(target).map(Some),
                (FieldAccess::Write, Some(value)) => f.write(target, value).map(|_| None),
                (access, arg) => Err(InvocationError::ArgumentCount {
                    member: f.field().name.clone(),
                    expected: usize::from(access == FieldAccess::Write),
                    actual: usize::from(arg.is_some()),
                }),
            },
        }
    }

    /// Read through this accessor
    pub fn get(&self, target: &ObjectRef) -> Result<Value, InvocationError> {
        Ok(self.invoke(target, None)?.unwrap_or(Value::Null))
    }

    /// Write through this accessor
    pub fn set(&self, target: &ObjectRef, value: impl Into<Value>) -> Result<(), InvocationError> {
        self.invoke(target, Some(value.into())).map(|_| ())
    }

    /// Name of the backing member
    pub fn member_name(&self) -> &str {
        match self {
            Accessor::Getter(m) | Accessor::Setter(m) => &m.method().name,
            Accessor::Field(f) => &f.field().name,
        }
    }

    /// Type declaring the backing member
    pub fn declaring_type(&self) -> &str {
        match self {
            Accessor::Getter(m) | Accessor::Setter(m) => &m.method().declaring_type,
            Accessor::Field(f) => &f.field().declaring_type,
        }
    }

    /// Check if backed by a method
    pub fn is_method(&self) -> bool {
        !self.is_field()
    }

    /// Check if backed by a field
    pub fn is_field(&self) -> bool {
        matches!(self, Accessor::Field(_))
    }
}

/// Ensure `target` is an instance of `declaring`; returns its runtime type
fn check_target(
    registry: &TypeRegistry,
    target: &ObjectRef,
    declaring: &str,
) -> Result<String, InvocationError> {
    let runtime_type = target.type_name();
    if registry.is_subtype(&runtime_type, declaring) {
        Ok(runtime_type)
    } else {
        Err(InvocationError::TargetMismatch {
            expected: declaring.to_string(),
            actual: runtime_type,
        })
    }
}

fn check_argument(
    registry: &TypeRegistry,
    member: &str,
    value: &Value,
    ty: &TypeRef,
) -> Result<(), InvocationError> {
    if registry.value_conforms(value, ty) {
        Ok(())
    } else {
        Err(InvocationError::ArgumentMismatch {
            member: member.to_string(),
            expected: ty.clone(),
            actual: value.kind_name(),
        })
    }
}
