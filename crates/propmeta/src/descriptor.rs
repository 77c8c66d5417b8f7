//! Type Descriptors
//!
//! A `TypeDescriptor` is the explicit, pre-populated member table of one
//! class or interface: its supertypes, type parameters, fields, methods and
//! constructors. Descriptors replace runtime introspection; they are built
//! once (by generated code or by hand) and registered in a
//! [`TypeRegistry`](crate::TypeRegistry).
//!
//! ```rust,ignore
//! let user = TypeDescriptor::class("User")
//!     .field(FieldDescriptor::new("name", TypeRef::string()))
//!     .method(MethodDescriptor::getter("getName", "name", TypeRef::string()))
//!     .method(MethodDescriptor::setter("setName", "name", TypeRef::string()))
//!     .default_constructor();
//! ```

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::InvocationError;
use crate::types::TypeRef;
use crate::value::{ObjectRef, Value};

/// Native method body: `(this, args) -> return value`
pub type NativeMethod =
    Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<Value, InvocationError> + Send + Sync>;

/// Native constructor body, run on a freshly allocated instance
pub type NativeInit = Arc<dyn Fn(&ObjectRef) -> Result<(), InvocationError> + Send + Sync>;

/// Member and type modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers (package-private instance member)
    pub const NONE: Self = Self(0x0000);
    /// Public visibility
    pub const PUBLIC: Self = Self(0x0001);
    /// Private visibility
    pub const PRIVATE: Self = Self(0x0002);
    /// Protected visibility
    pub const PROTECTED: Self = Self(0x0004);
    /// Class-level member
    pub const STATIC: Self = Self(0x0008);
    /// Immutable after initialization
    pub const FINAL: Self = Self(0x0010);
    /// No implementation
    pub const ABSTRACT: Self = Self(0x0400);
    /// Compiler generated
    pub const SYNTHETIC: Self = Self(0x1000);
    /// Compiler generated bridge for a covariant or generic override
    pub const BRIDGE: Self = Self(0x0040);

    /// Get raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Check if all flags of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of flags
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Public member
    pub const fn is_public(&self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// Class-level member
    pub const fn is_static(&self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Final member
    pub const fn is_final(&self) -> bool {
        self.contains(Self::FINAL)
    }

    /// Abstract member or type
    pub const fn is_abstract(&self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Bridge or synthetic member
    pub const fn is_generated(&self) -> bool {
        (self.0 & (Self::BRIDGE.0 | Self::SYNTHETIC.0)) != 0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Class or interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Concrete or abstract class
    Class,
    /// Interface
    Interface,
}

/// Declared type parameter of a generic type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    /// Variable name
    pub name: String,
    /// Upper bound, `Object` when absent
    pub bound: Option<TypeRef>,
}

/// A stored member
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Modifiers (private by default)
    pub modifiers: Modifiers,
    /// Initial value, the type's zero value when absent
    pub initial: Option<Value>,
    /// Set when the field is added to a type
    pub declaring_type: String,
}

impl FieldDescriptor {
    /// Private instance field
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Modifiers::PRIVATE,
            initial: None,
            declaring_type: String::new(),
        }
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the initial value
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Class-level field
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Class-level constant (`static final`)
    pub fn is_constant(&self) -> bool {
        self.modifiers.is_static() && self.modifiers.is_final()
    }

    /// Value a fresh slot starts with
    pub fn initial_value(&self) -> Value {
        self.initial.clone().unwrap_or_else(|| zero_value(&self.ty))
    }
}

/// A callable member
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Declared parameter types
    pub params: Vec<TypeRef>,
    /// Declared return type
    pub return_type: TypeRef,
    /// Modifiers (public by default)
    pub modifiers: Modifiers,
    /// Set when the method is added to a type
    pub declaring_type: String,
    body: Option<NativeMethod>,
}

impl MethodDescriptor {
    /// Public method without a body
    pub fn new(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: impl Into<TypeRef>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type: return_type.into(),
            modifiers: Modifiers::PUBLIC,
            declaring_type: String::new(),
            body: None,
        }
    }

    /// Public abstract method (interface or abstract class member)
    pub fn abstract_method(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: impl Into<TypeRef>,
    ) -> Self {
        Self::new(name, params, return_type).with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
    }

    /// Public zero-argument method returning the value of `field`
    pub fn getter(
        name: impl Into<String>,
        field: impl Into<String>,
        ty: impl Into<TypeRef>,
    ) -> Self {
        let field = field.into();
        Self::new(name, Vec::new(), ty).with_body(move |this, _| this.field(&field))
    }

    /// Public one-argument method storing its argument in `field`
    pub fn setter(
        name: impl Into<String>,
        field: impl Into<String>,
        ty: impl Into<TypeRef>,
    ) -> Self {
        let field = field.into();
        Self::new(name, vec![ty.into()], TypeRef::Void).with_body(move |this, args| {
            let value = args.first().cloned().unwrap_or(Value::Null);
            this.set_field(&field, value)?;
            Ok(Value::Null)
        })
    }

    /// Attach a native body
    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark as a compiler-generated bridge
    pub fn bridge(mut self) -> Self {
        self.modifiers = self.modifiers | Modifiers::BRIDGE | Modifiers::SYNTHETIC;
        self
    }

    /// Native body, if the method is concrete
    pub fn body(&self) -> Option<&NativeMethod> {
        self.body.as_ref()
    }

    /// Bridge or synthetic
    pub fn is_generated(&self) -> bool {
        self.modifiers.is_generated()
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .field("declaring_type", &self.declaring_type)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A constructor
#[derive(Clone)]
pub struct ConstructorDescriptor {
    /// Declared parameter types
    pub params: Vec<TypeRef>,
    /// Modifiers
    pub modifiers: Modifiers,
    init: Option<NativeInit>,
}

impl ConstructorDescriptor {
    /// Public constructor taking `params`
    pub fn new(params: Vec<TypeRef>) -> Self {
        Self {
            params,
            modifiers: Modifiers::PUBLIC,
            init: None,
        }
    }

    /// Public zero-argument constructor
    pub fn no_args() -> Self {
        Self::new(Vec::new())
    }

    /// Attach an initializer, run after field slots are allocated
    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&ObjectRef) -> Result<(), InvocationError> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Initializer, if any
    pub fn init(&self) -> Option<&NativeInit> {
        self.init.as_ref()
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .field("modifiers", &self.modifiers)
            .field("has_init", &self.init.is_some())
            .finish()
    }
}

/// Member table of one class or interface
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Type name (identity key in the registry)
    pub name: String,
    /// Class or interface
    pub kind: TypeKind,
    /// Type modifiers
    pub modifiers: Modifiers,
    /// Generic parameters
    pub type_params: Vec<TypeParam>,
    /// `extends` clause; `None` only for the root class and interfaces
    pub superclass: Option<TypeRef>,
    /// `implements` clause (super-interfaces for an interface)
    pub interfaces: Vec<TypeRef>,
    /// Declared fields, in declaration order
    pub fields: Vec<Arc<FieldDescriptor>>,
    /// Declared methods, in declaration order
    pub methods: Vec<Arc<MethodDescriptor>>,
    /// Declared constructors
    pub constructors: Vec<ConstructorDescriptor>,
    statics: RwLock<FxHashMap<String, Value>>,
}

impl TypeDescriptor {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::PUBLIC,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            statics: RwLock::new(FxHashMap::default()),
        }
    }

    /// Public class extending the root class
    pub fn class(name: impl Into<String>) -> Self {
        let mut desc = Self::new(name, TypeKind::Class);
        desc.superclass = Some(TypeRef::object());
        desc
    }

    /// Public abstract class extending the root class
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::class(name).with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
    }

    /// Public interface
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface).with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
    }

    /// Root class (no superclass)
    pub(crate) fn root(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the superclass
    pub fn extends(mut self, superclass: impl Into<TypeRef>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add an implemented interface
    pub fn implements(mut self, interface: impl Into<TypeRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Declare a type parameter
    pub fn type_param(mut self, name: impl Into<String>, bound: Option<TypeRef>) -> Self {
        self.type_params.push(TypeParam {
            name: name.into(),
            bound,
        });
        self
    }

    /// Declare a field
    pub fn field(mut self, mut field: FieldDescriptor) -> Self {
        field.declaring_type = self.name.clone();
        if field.is_static() {
            self.statics
                .get_mut()
                .insert(field.name.clone(), field.initial_value());
        }
        self.fields.push(Arc::new(field));
        self
    }

    /// Declare a method
    pub fn method(mut self, mut method: MethodDescriptor) -> Self {
        method.declaring_type = self.name.clone();
        self.methods.push(Arc::new(method));
        self
    }

    /// Declare a constructor
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declare a public zero-argument constructor
    pub fn default_constructor(self) -> Self {
        self.constructor(ConstructorDescriptor::no_args())
    }

    /// Check if this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Interfaces and abstract classes cannot be instantiated
    pub fn is_abstract(&self) -> bool {
        self.is_interface() || self.modifiers.is_abstract()
    }

    /// Declared type parameter by name
    pub fn type_param_named(&self, name: &str) -> Option<&TypeParam> {
        self.type_params.iter().find(|p| p.name == name)
    }

    /// Declared field by name
    pub fn declared_field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Read a static field slot
    pub fn static_value(&self, name: &str) -> Option<Value> {
        self.statics.read().get(name).cloned()
    }

    /// Overwrite a static field slot
    pub fn set_static_value(&self, name: &str, value: Value) -> Result<(), InvocationError> {
        let mut statics = self.statics.write();
        match statics.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(InvocationError::UnknownField {
                field: name.to_string(),
                type_name: self.name.clone(),
            }),
        }
    }
}

/// Zero value of a declared type
pub fn zero_value(ty: &TypeRef) -> Value {
    use crate::types::PrimitiveType;

    match ty {
        TypeRef::Primitive(PrimitiveType::Boolean) => Value::Bool(false),
        TypeRef::Primitive(PrimitiveType::Char) => Value::Char('\0'),
        TypeRef::Primitive(p) if p.is_floating() => Value::Float(0.0),
        TypeRef::Primitive(_) => Value::Int(0),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Instance;

    #[test]
    fn test_members_record_declaring_type() {
        let desc = TypeDescriptor::class("User")
            .field(FieldDescriptor::new("name", TypeRef::string()))
            .method(MethodDescriptor::getter("getName", "name", TypeRef::string()));

        assert_eq!(desc.fields[0].declaring_type, "User");
        assert_eq!(desc.methods[0].declaring_type, "User");
        assert_eq!(desc.superclass, Some(TypeRef::object()));
    }

    #[test]
    fn test_static_fields_get_storage() {
        let desc = TypeDescriptor::class("Config").field(
            FieldDescriptor::new("VERSION", TypeRef::INT)
                .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
                .initial(3),
        );

        assert!(desc.fields[0].is_constant());
        assert_eq!(desc.static_value("VERSION"), Some(Value::Int(3)));
        desc.set_static_value("VERSION", Value::Int(4)).unwrap();
        assert_eq!(desc.static_value("VERSION"), Some(Value::Int(4)));
        assert!(desc.set_static_value("MISSING", Value::Null).is_err());
    }

    #[test]
    fn test_getter_and_setter_bodies() {
        let getter = MethodDescriptor::getter("getAge", "age", TypeRef::INT);
        let setter = MethodDescriptor::setter("setAge", "age", TypeRef::INT);
        let mut instance = Instance::new("Person");
        instance.insert("age", Value::Int(0));
        let obj = ObjectRef::new(instance);

        (setter.body().unwrap())(&obj, &[Value::Int(42)]).unwrap();
        assert_eq!((getter.body().unwrap())(&obj, &[]).unwrap(), Value::Int(42));
        assert_eq!(setter.arity(), 1);
        assert_eq!(setter.return_type, TypeRef::Void);
    }

    #[test]
    fn test_modifier_flags() {
        let m = Modifiers::PUBLIC | Modifiers::STATIC;
        assert!(m.is_public());
        assert!(m.is_static());
        assert!(!m.is_final());
        assert!(MethodDescriptor::new("x", vec![], TypeRef::Void).bridge().is_generated());
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(zero_value(&TypeRef::BOOLEAN), Value::Bool(false));
        assert_eq!(zero_value(&TypeRef::DOUBLE), Value::Float(0.0));
        assert_eq!(zero_value(&TypeRef::LONG), Value::Int(0));
        assert_eq!(zero_value(&TypeRef::string()), Value::Null);
    }
}
