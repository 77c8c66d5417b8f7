//! Propmeta: per-type property metadata
//!
//! Turns the member table of a type into a stable set of named
//! properties, each backed by a uniform read/write [`Accessor`], so generic
//! code (mappers, serializers, template engines) can get and set a
//! property by name without per-type glue. Introspection runs once per
//! type; the resulting [`Reflector`] is immutable and shared.
//!
//! - **Descriptors**: types are registered up front as [`TypeDescriptor`]s in a
//!   [`TypeRegistry`] (`descriptor`, `registry` modules)
//! - **Builder**: method enumeration, getter/setter classification,
//!   conflict resolution and field fallback (`members`, `naming`, `reflector`)
//! - **Accessors**: method- and field-backed read/write operations (`invoker`)
//! - **Factory**: concurrent single-flight cache of reflectors (`factory`)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use propmeta::{DefaultReflectorFactory, ReflectorFactory, TypeRegistry, TypeDescriptor,
//!                FieldDescriptor, MethodDescriptor, TypeRef};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeDescriptor::class("User")
//!         .field(FieldDescriptor::new("name", TypeRef::string()))
//!         .method(MethodDescriptor::getter("getName", "name", TypeRef::string()))
//!         .default_constructor(),
//! );
//!
//! let factory = DefaultReflectorFactory::new(Arc::new(registry));
//! let reflector = factory.find_for_type("User")?;
//! let user = reflector.default_constructor()?.new_instance()?;
//! reflector.get_setter("name")?.set(&user, "ada")?;
//! assert_eq!(reflector.get_getter("name")?.get(&user)?, "ada".into());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod invoker;
pub mod members;
pub mod naming;
pub mod permissions;
pub mod reflector;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod value;

pub use config::ReflectorConfig;
pub use descriptor::{
    ConstructorDescriptor, FieldDescriptor, MethodDescriptor, Modifiers, TypeDescriptor, TypeKind,
};
pub use error::{AccessKind, InvocationError, ReflectionError};
pub use factory::{DefaultReflectorFactory, ReflectorFactory};
pub use invoker::{Accessor, FieldAccess};
pub use naming::{JavaBeansNamer, PropertyNamer};
pub use permissions::ReflectionPermission;
pub use reflector::{DefaultConstructor, Reflector, ReflectorBuilder};
pub use registry::TypeRegistry;
pub use resolver::{GenericTypeResolver, TypeResolver};
pub use types::{PrimitiveType, TypeRef};
pub use value::{ObjectRef, Value};
