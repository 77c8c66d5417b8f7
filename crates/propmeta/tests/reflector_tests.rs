//! Integration tests for reflector construction and accessors
//!
//! Tests cover:
//! - Default constructor discovery
//! - Getter and setter conflict resolution
//! - Field fallback and reserved names
//! - Generic type substitution
//! - Accessor invocation, dispatch and permissions
//! - Factory caching and configuration

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use propmeta::{
    AccessKind, ConstructorDescriptor, DefaultReflectorFactory, FieldDescriptor, InvocationError,
    JavaBeansNamer, MethodDescriptor, Modifiers, PrimitiveType, PropertyNamer, ReflectionError,
    ReflectionPermission, Reflector, ReflectorBuilder, ReflectorConfig, ReflectorFactory,
    TypeDescriptor, TypeRef, TypeRegistry, Value,
};

// =============================================================================
// FIXTURES
// =============================================================================

fn account() -> TypeDescriptor {
    TypeDescriptor::class("Account")
        .field(FieldDescriptor::new("userName", TypeRef::string()))
        .field(FieldDescriptor::new("active", TypeRef::BOOLEAN))
        .field(
            FieldDescriptor::new("serialVersionUID", TypeRef::LONG)
                .with_modifiers(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL)
                .initial(1i64),
        )
        .field(
            FieldDescriptor::new("$jacocoData", TypeRef::array(TypeRef::BOOLEAN))
                .with_modifiers(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::SYNTHETIC),
        )
        .field(
            FieldDescriptor::new("MAX_USERS", TypeRef::INT)
                .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
                .initial(100),
        )
        .field(
            FieldDescriptor::new("instances", TypeRef::INT)
                .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
        )
        .method(MethodDescriptor::getter("getUserName", "userName", TypeRef::string()))
        .method(MethodDescriptor::setter("setUserName", "userName", TypeRef::string()))
        .method(MethodDescriptor::getter("getActive", "active", TypeRef::BOOLEAN))
        .method(MethodDescriptor::getter("isActive", "active", TypeRef::BOOLEAN))
        .method(MethodDescriptor::setter("setActive", "active", TypeRef::BOOLEAN))
        .method(MethodDescriptor::new("getClass", vec![], TypeRef::class("Class")))
        .default_constructor()
}

fn animals(registry: &mut TypeRegistry) {
    registry.register(
        TypeDescriptor::class("Animal")
            .field(FieldDescriptor::new("owner", TypeRef::object()))
            .method(
                MethodDescriptor::new("getSound", vec![], TypeRef::string())
                    .with_body(|_, _| Ok(Value::from("..."))),
            )
            .method(MethodDescriptor::getter("getOwner", "owner", TypeRef::object()))
            .default_constructor(),
    );
    registry.register(
        TypeDescriptor::class("Dog")
            .extends("Animal")
            .method(
                MethodDescriptor::new("getSound", vec![], TypeRef::string())
                    .with_body(|_, _| Ok(Value::from("woof"))),
            )
            .method(MethodDescriptor::getter("getOwner", "owner", TypeRef::string()))
            .method(MethodDescriptor::getter("getOwner", "owner", TypeRef::object()).bridge())
            .default_constructor(),
    );
    registry.register(
        TypeDescriptor::class("Cat")
            .extends("Animal")
            .method(
                MethodDescriptor::new("getSound", vec![], TypeRef::string())
                    .with_modifiers(Modifiers::PRIVATE)
                    .with_body(|_, _| Ok(Value::from("purr"))),
            )
            .default_constructor(),
    );
}

fn entities(registry: &mut TypeRegistry) {
    registry.register(
        TypeDescriptor::abstract_class("Entity")
            .type_param("ID", None)
            .field(FieldDescriptor::new("id", TypeRef::variable("ID")))
            .method(MethodDescriptor::getter("getId", "id", TypeRef::variable("ID")))
            .method(MethodDescriptor::setter("setId", "id", TypeRef::variable("ID"))),
    );
    registry.register(
        TypeDescriptor::class("User")
            .extends(TypeRef::parameterized("Entity", vec![TypeRef::class("Long")]))
            .field(FieldDescriptor::new("name", TypeRef::string()))
            .default_constructor(),
    );
    registry.register(
        TypeDescriptor::interface("Identified")
            .method(MethodDescriptor::abstract_method("getId", vec![], TypeRef::LONG)),
    );
    registry.register(TypeDescriptor::abstract_class("Record").implements("Identified"));
    registry.register(
        TypeDescriptor::class("Invoice")
            .extends("Record")
            .method(
                MethodDescriptor::new("getId", vec![], TypeRef::LONG)
                    .with_body(|_, _| Ok(Value::Int(42))),
            )
            .default_constructor(),
    );
}

fn setters(registry: &mut TypeRegistry) {
    registry.register(
        TypeDescriptor::class("Holder")
            .field(FieldDescriptor::new("value", TypeRef::object()))
            .method(MethodDescriptor::setter("setValue", "value", TypeRef::object()))
            .method(MethodDescriptor::setter("setValue", "value", TypeRef::class("Number"))),
    );
    registry.register(
        TypeDescriptor::class("Amount")
            .field(FieldDescriptor::new("amount", TypeRef::class("Long")))
            .method(MethodDescriptor::getter("getAmount", "amount", TypeRef::class("Long")))
            .method(MethodDescriptor::setter("setAmount", "amount", TypeRef::class("Number")))
            .method(MethodDescriptor::setter("setAmount", "amount", TypeRef::class("Long")))
            .method(MethodDescriptor::setter("setAmount", "amount", TypeRef::string())),
    );
    registry.register(
        TypeDescriptor::class("Conflicted")
            .method(MethodDescriptor::setter("setCode", "code", TypeRef::string()))
            .method(MethodDescriptor::setter("setCode", "code", TypeRef::class("Integer"))),
    );
    registry.register(
        TypeDescriptor::class("Rescued")
            .field(FieldDescriptor::new("code", TypeRef::class("Integer")))
            .method(MethodDescriptor::getter("getCode", "code", TypeRef::class("Integer")))
            .method(MethodDescriptor::setter("setCode", "code", TypeRef::string()))
            .method(MethodDescriptor::setter("setCode", "code", TypeRef::class("Boolean")))
            .method(MethodDescriptor::setter("setCode", "code", TypeRef::class("Integer"))),
    );
}

fn ambiguous(registry: &mut TypeRegistry) {
    registry.register(
        TypeDescriptor::interface("Labeled").method(MethodDescriptor::abstract_method(
            "getLabel",
            vec![],
            TypeRef::class("CharSequence"),
        )),
    );
    registry.register(
        TypeDescriptor::class("Widget")
            .implements("Labeled")
            .field(FieldDescriptor::new("label", TypeRef::class("Integer")))
            .method(MethodDescriptor::getter("getLabel", "label", TypeRef::class("Integer"))),
    );
}

fn vault() -> TypeDescriptor {
    TypeDescriptor::class("Vault")
        .field(FieldDescriptor::new("secret", TypeRef::string()))
        .field(FieldDescriptor::new("label", TypeRef::string()).with_modifiers(Modifiers::PUBLIC))
        .default_constructor()
}

fn registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry.register(account());
    registry.register(vault());
    animals(&mut registry);
    entities(&mut registry);
    setters(&mut registry);
    ambiguous(&mut registry);
    Arc::new(registry)
}

fn reflect(type_name: &str) -> Reflector {
    Reflector::new(registry(), type_name).unwrap()
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

mod construction {
    use super::*;

    #[test]
    fn test_default_constructor_presence() {
        let account = reflect("Account");
        assert!(account.has_default_constructor());
        assert!(account.default_constructor().is_ok());

        let holder = reflect("Holder");
        assert!(!holder.has_default_constructor());
        assert!(matches!(
            holder.default_constructor(),
            Err(ReflectionError::NoDefaultConstructor { .. })
        ));
    }

    #[test]
    fn test_default_constructor_of_abstract_type_cannot_instantiate() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::abstract_class("Shape").default_constructor());
        let shape = Reflector::new(Arc::new(registry), "Shape").unwrap();

        assert!(shape.has_default_constructor());
        assert!(matches!(
            shape.default_constructor().unwrap().new_instance(),
            Err(InvocationError::AbstractType { .. })
        ));
    }

    #[test]
    fn test_property_names_in_discovery_order() {
        let account = reflect("Account");
        assert_eq!(
            account.readable_property_names(),
            ["userName", "active", "MAX_USERS", "instances"]
        );
        assert_eq!(
            account.writable_property_names(),
            ["userName", "active", "instances"]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let registry = registry();
        for type_name in ["Account", "Dog", "User", "Amount", "Record"] {
            let first = Reflector::new(registry.clone(), type_name).unwrap();
            let second = Reflector::new(registry.clone(), type_name).unwrap();

            assert_eq!(first.readable_property_names(), second.readable_property_names());
            assert_eq!(first.writable_property_names(), second.writable_property_names());
            for name in first.readable_property_names() {
                assert_eq!(first.getter_type(name).unwrap(), second.getter_type(name).unwrap());
            }
            for name in first.writable_property_names() {
                assert_eq!(first.setter_type(name).unwrap(), second.setter_type(name).unwrap());
            }
        }
    }

    #[test]
    fn test_every_accessor_has_a_type() {
        let registry = registry();
        for type_name in ["Account", "Dog", "User", "Holder", "Rescued", "Vault"] {
            let reflector = Reflector::new(registry.clone(), type_name).unwrap();
            for name in reflector.readable_property_names() {
                assert!(reflector.get_getter(name).is_ok());
                assert!(reflector.getter_type(name).is_ok());
            }
            for name in reflector.writable_property_names() {
                assert!(reflector.get_setter(name).is_ok());
                assert!(reflector.setter_type(name).is_ok());
            }
        }
    }

    #[test]
    fn test_unknown_supertype_fails_build() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::class("Orphan").extends("Missing"));
        assert_eq!(
            Reflector::new(Arc::new(registry), "Orphan").unwrap_err(),
            ReflectionError::UnknownType {
                name: "Missing".to_string()
            }
        );
    }
}

// =============================================================================
// GETTER RESOLUTION
// =============================================================================

mod getters {
    use super::*;

    #[test]
    fn test_boolean_is_beats_get() {
        let account = reflect("Account");
        let getter = account.get_getter("active").unwrap();
        assert_eq!(getter.member_name(), "isActive");
        assert_eq!(account.getter_type("active").unwrap(), &TypeRef::BOOLEAN);
    }

    #[test]
    fn test_covariant_override_records_narrower_type() {
        let dog = reflect("Dog");
        let getter = dog.get_getter("owner").unwrap();
        assert_eq!(getter.declaring_type(), "Dog");
        assert_eq!(dog.getter_type("owner").unwrap(), &TypeRef::string());

        let animal = reflect("Animal");
        assert_eq!(animal.getter_type("owner").unwrap(), &TypeRef::object());
    }

    #[test]
    fn test_unrelated_return_types_are_ambiguous() {
        let err = Reflector::new(registry(), "Widget").unwrap_err();
        assert!(matches!(
            err,
            ReflectionError::AmbiguousGetter { ref property, .. } if property == "label"
        ));
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_interface_getter_on_abstract_class() {
        let record = reflect("Record");
        assert!(record.has_getter("id"));
        assert!(!record.has_setter("id"));
        assert_eq!(record.getter_type("id").unwrap(), &TypeRef::LONG);
        assert!(!record.has_default_constructor());
    }

    #[test]
    fn test_generic_getter_type_is_substituted() {
        let user = reflect("User");
        assert_eq!(user.getter_type("id").unwrap(), &TypeRef::class("Long"));
        assert_eq!(user.setter_type("id").unwrap(), &TypeRef::class("Long"));
        assert_eq!(user.getter_type("name").unwrap(), &TypeRef::string());

        let entity = reflect("Entity");
        assert_eq!(entity.getter_type("id").unwrap(), &TypeRef::object());
    }
}

// =============================================================================
// SETTER RESOLUTION
// =============================================================================

mod setters {
    use super::*;

    #[test]
    fn test_narrower_parameter_wins() {
        let holder = reflect("Holder");
        assert_eq!(holder.setter_type("value").unwrap(), &TypeRef::class("Number"));
        assert!(holder.get_setter("value").unwrap().is_method());
    }

    #[test]
    fn test_exact_getter_type_match_wins() {
        let amount = reflect("Amount");
        assert_eq!(amount.setter_type("amount").unwrap(), &TypeRef::class("Long"));
    }

    #[test]
    fn test_unrelated_parameters_are_ambiguous() {
        let err = Reflector::new(registry(), "Conflicted").unwrap_err();
        assert_eq!(
            err,
            ReflectionError::AmbiguousSetter {
                property: "code".to_string(),
                type_name: "Conflicted".to_string(),
                first: TypeRef::string(),
                second: TypeRef::class("Integer"),
            }
        );
    }

    #[test]
    fn test_exact_match_after_ambiguity_still_wins() {
        let rescued = reflect("Rescued");
        assert_eq!(rescued.setter_type("code").unwrap(), &TypeRef::class("Integer"));
    }
}

// =============================================================================
// FIELD FALLBACK
// =============================================================================

mod fields {
    use super::*;

    #[test]
    fn test_method_covered_fields_stay_method_backed() {
        let account = reflect("Account");
        assert!(account.get_getter("userName").unwrap().is_method());
        assert!(account.get_setter("userName").unwrap().is_method());
        assert_eq!(
            account
                .readable_property_names()
                .iter()
                .filter(|n| n.as_str() == "userName")
                .count(),
            1
        );
    }

    #[test]
    fn test_field_fills_missing_side_only() {
        let dog = reflect("Dog");
        assert!(dog.get_getter("owner").unwrap().is_method());
        let setter = dog.get_setter("owner").unwrap();
        assert!(setter.is_field());
        assert_eq!(setter.declaring_type(), "Animal");
        assert_eq!(dog.setter_type("owner").unwrap(), &TypeRef::object());
    }

    #[test]
    fn test_reserved_names_never_appear() {
        let account = reflect("Account");
        for reserved in ["serialVersionUID", "$jacocoData", "class"] {
            assert!(!account.readable_property_names().iter().any(|n| n == reserved));
            assert!(!account.writable_property_names().iter().any(|n| n == reserved));
            assert_eq!(account.find_property_name(reserved), None);
        }
    }

    #[test]
    fn test_static_final_is_read_only() {
        let account = reflect("Account");
        assert!(account.has_getter("MAX_USERS"));
        assert!(!account.has_setter("MAX_USERS"));
        assert!(account.has_setter("instances"));

        let instance = account.default_constructor().unwrap().new_instance().unwrap();
        assert_eq!(
            account.get_getter("MAX_USERS").unwrap().get(&instance).unwrap(),
            Value::Int(100)
        );
    }

    #[test]
    fn test_redeclared_field_hides_ancestor() {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::class("Base").field(FieldDescriptor::new("tag", TypeRef::object())),
        );
        registry.register(
            TypeDescriptor::class("Derived")
                .extends("Base")
                .field(FieldDescriptor::new("tag", TypeRef::string())),
        );
        let derived = Reflector::new(Arc::new(registry), "Derived").unwrap();

        assert_eq!(derived.getter_type("tag").unwrap(), &TypeRef::string());
        assert_eq!(derived.get_getter("tag").unwrap().declaring_type(), "Derived");
    }
}

// =============================================================================
// QUERIES
// =============================================================================

mod queries {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let account = reflect("Account");
        for alias in ["USERNAME", "username", "UserName", "userName"] {
            assert_eq!(account.find_property_name(alias), Some("userName"));
        }
        assert_eq!(account.find_property_name("nonExistent"), None);
    }

    #[test]
    fn test_missing_getter_and_setter_are_distinguished() {
        let account = reflect("Account");

        match account.get_setter("MAX_USERS").unwrap_err() {
            ReflectionError::NoSuchProperty { kind, property, type_name } => {
                assert_eq!(kind, AccessKind::Set);
                assert_eq!(property, "MAX_USERS");
                assert_eq!(type_name, "Account");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = account.get_getter("nonExistent").unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is no getter for property named 'nonExistent' in 'Account'"
        );
    }
}

// =============================================================================
// ACCESSORS
// =============================================================================

mod accessors {
    use super::*;

    #[test]
    fn test_round_trip_through_methods() {
        let account = reflect("Account");
        let instance = account.default_constructor().unwrap().new_instance().unwrap();

        account.get_setter("userName").unwrap().set(&instance, "ada").unwrap();
        account.get_setter("active").unwrap().set(&instance, true).unwrap();

        assert_eq!(
            account.get_getter("userName").unwrap().get(&instance).unwrap(),
            Value::from("ada")
        );
        assert_eq!(
            account.get_getter("active").unwrap().get(&instance).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_static_field_is_shared_between_instances() {
        let account = reflect("Account");
        let ctor = account.default_constructor().unwrap();
        let a = ctor.new_instance().unwrap();
        let b = ctor.new_instance().unwrap();

        account.get_setter("instances").unwrap().set(&a, 2).unwrap();
        assert_eq!(
            account.get_getter("instances").unwrap().get(&b).unwrap(),
            Value::Int(2)
        );
    }

    #[test]
    fn test_virtual_dispatch_through_ancestor_accessor() {
        let registry = registry();
        let animal = Reflector::new(registry.clone(), "Animal").unwrap();
        let dog = registry.allocate("Dog").unwrap();

        assert_eq!(
            animal.get_getter("sound").unwrap().get(&dog).unwrap(),
            Value::from("woof")
        );
    }

    #[test]
    fn test_private_subclass_method_does_not_override() {
        let registry = registry();
        let animal = Reflector::new(registry.clone(), "Animal").unwrap();
        let cat = registry.allocate("Cat").unwrap();

        assert_eq!(
            animal.get_getter("sound").unwrap().get(&cat).unwrap(),
            Value::from("...")
        );
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::class("Packet")
                .field(FieldDescriptor::new("flags", TypeRef::Primitive(PrimitiveType::Byte)))
                .field(FieldDescriptor::new("port", TypeRef::Primitive(PrimitiveType::Short)))
                .method(MethodDescriptor::setter(
                    "setFlags",
                    "flags",
                    TypeRef::Primitive(PrimitiveType::Byte),
                ))
                .default_constructor(),
        );
        let packet = Reflector::new(Arc::new(registry), "Packet").unwrap();
        let instance = packet.default_constructor().unwrap().new_instance().unwrap();

        assert!(packet.get_setter("flags").unwrap().is_method());
        assert!(matches!(
            packet.get_setter("flags").unwrap().set(&instance, 100_000i64),
            Err(InvocationError::ArgumentMismatch { .. })
        ));
        assert!(packet.get_setter("port").unwrap().is_field());
        assert!(matches!(
            packet.get_setter("port").unwrap().set(&instance, 40_000i64),
            Err(InvocationError::ArgumentMismatch { .. })
        ));

        packet.get_setter("flags").unwrap().set(&instance, -1i64).unwrap();
        packet.get_setter("port").unwrap().set(&instance, 8080i64).unwrap();
        assert_eq!(packet.get_getter("flags").unwrap().get(&instance).unwrap(), Value::Int(-1));
        assert_eq!(packet.get_getter("port").unwrap().get(&instance).unwrap(), Value::Int(8080));
    }

    #[test]
    fn test_interface_getter_dispatches_to_implementation() {
        let registry = registry();
        let record = Reflector::new(registry.clone(), "Record").unwrap();
        let invoice = registry.allocate("Invoice").unwrap();

        assert_eq!(
            record.get_getter("id").unwrap().get(&invoice).unwrap(),
            Value::Int(42)
        );
    }

    #[test]
    fn test_generic_setter_accepts_bound_values() {
        let user = reflect("User");
        let instance = user.default_constructor().unwrap().new_instance().unwrap();

        user.get_setter("id").unwrap().set(&instance, 7i64).unwrap();
        assert_eq!(user.get_getter("id").unwrap().get(&instance).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_argument_and_target_mismatch() {
        let registry = registry();
        let account = Reflector::new(registry.clone(), "Account").unwrap();
        let instance = registry.allocate("Account").unwrap();
        let dog = registry.allocate("Dog").unwrap();

        assert!(matches!(
            account.get_setter("active").unwrap().set(&instance, "yes"),
            Err(InvocationError::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            account.get_getter("userName").unwrap().get(&dog),
            Err(InvocationError::TargetMismatch { .. })
        ));
    }

    #[test]
    fn test_private_access_denied_without_permission() {
        let vault = ReflectorBuilder::new(registry())
            .with_permissions(ReflectionPermission::PUBLIC_ONLY)
            .build("Vault")
            .unwrap();
        let instance = vault.default_constructor().unwrap().new_instance().unwrap();

        assert!(vault.has_getter("secret"));
        assert!(matches!(
            vault.get_getter("secret").unwrap().get(&instance),
            Err(InvocationError::AccessDenied { .. })
        ));
        vault.get_setter("label").unwrap().set(&instance, "front").unwrap();
        assert_eq!(
            vault.get_getter("label").unwrap().get(&instance).unwrap(),
            Value::from("front")
        );
    }
}

// =============================================================================
// FACTORY
// =============================================================================

mod factory {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("propmeta=trace"))
            .with_test_writer()
            .try_init();
    }

    /// Counts naming calls; `Counted` has a single accessor method, so one
    /// call per build
    #[derive(Default)]
    struct CountingNamer {
        calls: AtomicUsize,
    }

    impl PropertyNamer for CountingNamer {
        fn method_to_property(&self, name: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            JavaBeansNamer.method_to_property(name)
        }
    }

    #[test]
    fn test_single_flight_under_concurrent_first_use() {
        init_tracing();
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::class("Counted")
                .method(MethodDescriptor::getter("getHits", "hits", TypeRef::LONG)),
        );
        let namer = Arc::new(CountingNamer::default());
        let factory = DefaultReflectorFactory::with_builder(
            ReflectorBuilder::new(Arc::new(registry)).with_namer(namer.clone()),
        );

        let reflectors: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| factory.find_for_type("Counted").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(reflectors.iter().all(|r| Arc::ptr_eq(r, &reflectors[0])));
        assert_eq!(namer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(factory.cached_count(), 1);
    }

    #[test]
    fn test_ambiguous_type_is_never_published() {
        init_tracing();
        let factory = DefaultReflectorFactory::new(registry());
        assert!(factory.find_for_type("Widget").is_err());
        assert!(factory.find_for_type("Widget").is_err());
        assert_eq!(factory.cached_count(), 0);
    }

    #[test]
    fn test_config_controls_cache_and_permissions() {
        let config = ReflectorConfig {
            class_cache_enabled: false,
            permissions: ReflectionPermission::PUBLIC_ONLY,
        };
        let factory = DefaultReflectorFactory::with_config(registry(), &config);
        assert!(!factory.is_class_cache_enabled());

        let vault = factory.find_for_type("Vault").unwrap();
        let instance = factory.registry().allocate("Vault").unwrap();
        assert!(vault.get_getter("secret").unwrap().get(&instance).is_err());
        assert!(!Arc::ptr_eq(&vault, &factory.find_for_type("Vault").unwrap()));
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ReflectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReflectorConfig::default());

        let config: ReflectorConfig =
            serde_json::from_str(r#"{ "permissions": "PUBLIC_ONLY" }"#).unwrap();
        assert!(config.class_cache_enabled);
        assert_eq!(config.permissions, ReflectionPermission::PUBLIC_ONLY);
    }

    #[test]
    fn test_combined_permissions() {
        let config: ReflectorConfig = serde_json::from_str(
            r#"{ "class_cache_enabled": false, "permissions": "READ_ALL|INVOKE_PUBLIC" }"#,
        )
        .unwrap();
        assert!(!config.class_cache_enabled);
        assert!(config.permissions.allows_read(false));
        assert!(!config.permissions.allows_write(true));
        assert!(!config.permissions.can_control_member_accessible());
    }

    #[test]
    fn test_invalid_permission_is_rejected() {
        let result: Result<ReflectorConfig, _> =
            serde_json::from_str(r#"{ "permissions": "EVERYTHING" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_flag_names() {
        let json = serde_json::to_string(&ReflectorConfig::default()).unwrap();
        assert_eq!(json, r#"{"class_cache_enabled":true,"permissions":"ALL"}"#);
    }

    #[test]
    fn test_private_constructor_respects_permissions() {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::class("Hidden")
                .constructor(ConstructorDescriptor::no_args().with_modifiers(Modifiers::PRIVATE)),
        );
        let registry = Arc::new(registry);

        let open = ReflectorConfig::default().builder(registry.clone()).build("Hidden").unwrap();
        assert!(open.default_constructor().unwrap().new_instance().is_ok());

        let closed = ReflectorConfig {
            permissions: ReflectionPermission::PUBLIC_ONLY,
            ..ReflectorConfig::default()
        }
        .builder(registry)
        .build("Hidden")
        .unwrap();
        assert!(closed.default_constructor().unwrap().new_instance().is_err());
    }
}
