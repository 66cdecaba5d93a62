mod container_test {
    use std::collections::BTreeMap;
    use wireup_di::arguments::{Arguments, BoundArguments};
    use wireup_di::callable::{Callable, Function};
    use wireup_di::container::{Container, ContainerBuilder, ServiceRegisterer};
    use wireup_di::definition::Implementation;
    use wireup_di::descriptor::{Constructible, MethodDescriptor, Parameter, TypeRegistry};
    use wireup_di::instance::{ErrorPtr, InstancePtr, TypedInstanceProvider};
    use wireup_di::pool_storage::{PoolCategory, PoolStorage, PoolStoragePtr, SharedPoolStorage};
    use wireup_di::value::Value;
    use wireup_di::ContainerError;

    struct TestObject {
        id: i64,
    }

    impl Constructible for TestObject {
        const NAME: &'static str = "TestObject";

        fn parameters() -> Vec<Parameter> {
            vec![Parameter::new("id").with_default(1)]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                id: arguments.take("id")?,
            })
        }
    }

    struct TestObjectDependencies {
        foo: InstancePtr<TestObject>,
    }

    impl Constructible for TestObjectDependencies {
        const NAME: &'static str = "TestObjectDependencies";

        fn parameters() -> Vec<Parameter> {
            vec![Parameter::new("foo").with_dependency(TestObject::NAME)]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                foo: arguments.take("foo")?,
            })
        }
    }

    struct TestNonDefinedObject;

    impl Constructible for TestNonDefinedObject {
        const NAME: &'static str = "TestNonDefinedObject";

        fn parameters() -> Vec<Parameter> {
            vec![]
        }

        fn construct(_arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self)
        }
    }

    struct TestNonDefinedObjectDependencies {
        foo: InstancePtr<TestObject>,
    }

    impl Constructible for TestNonDefinedObjectDependencies {
        const NAME: &'static str = "TestNonDefinedObjectDependencies";

        fn parameters() -> Vec<Parameter> {
            vec![Parameter::new("foo").with_dependency(TestObject::NAME)]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                foo: arguments.take("foo")?,
            })
        }
    }

    struct TestObjectDependencyDefault {
        foo: InstancePtr<TestObject>,
        foo2: Option<InstancePtr<TestObject>>,
    }

    impl Constructible for TestObjectDependencyDefault {
        const NAME: &'static str = "TestObjectDependencyDefault";

        fn parameters() -> Vec<Parameter> {
            vec![
                Parameter::new("foo").with_dependency(TestObject::NAME),
                Parameter::new("foo2")
                    .with_dependency("UnknownObject")
                    .with_default(Value::Null),
            ]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                foo: arguments.take("foo")?,
                foo2: arguments.take("foo2")?,
            })
        }
    }

    struct TestObjectDependenciesSpecial {
        foo: InstancePtr<TestObject>,
        bar: BTreeMap<String, i64>,
        test: Value,
    }

    impl Constructible for TestObjectDependenciesSpecial {
        const NAME: &'static str = "TestObjectDependenciesSpecial";

        fn parameters() -> Vec<Parameter> {
            vec![
                Parameter::new("foo").with_dependency(TestObject::NAME),
                Parameter::new("bar"),
                Parameter::new("test").with_default(Value::Null),
            ]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                foo: arguments.take("foo")?,
                bar: arguments.take("bar")?,
                test: arguments.take("test")?,
            })
        }
    }

    struct TestObjectSetters {
        id: i64,
        id2: i64,
        tags: Vec<String>,
        reference: Option<InstancePtr<TestObject>>,
    }

    impl TestObjectSetters {
        fn set_id(&mut self, arguments: &mut BoundArguments) -> Result<Value, ErrorPtr> {
            self.id = arguments.take("id")?;
            Ok(Value::Null)
        }

        fn set_id2(&mut self, arguments: &mut BoundArguments) -> Result<Value, ErrorPtr> {
            self.id2 = arguments.take("id2")?;
            Ok(Value::Null)
        }

        fn set_ids(&mut self, arguments: &mut BoundArguments) -> Result<Value, ErrorPtr> {
            self.id2 = arguments.take("id2")?;
            self.id = arguments.take("id")?;
            Ok(Value::from("success"))
        }

        fn add_tag(&mut self, arguments: &mut BoundArguments) -> Result<Value, ErrorPtr> {
            self.tags.push(arguments.take("tag")?);
            Ok(Value::Null)
        }

        fn set_reference(&mut self, arguments: &mut BoundArguments) -> Result<Value, ErrorPtr> {
            self.reference = Some(arguments.take("reference")?);
            Ok(Value::Null)
        }
    }

    impl Default for TestObjectSetters {
        fn default() -> Self {
            Self {
                id: 0,
                id2: 8,
                tags: vec![],
                reference: None,
            }
        }
    }

    impl Constructible for TestObjectSetters {
        const NAME: &'static str = "TestObjectSetters";

        fn parameters() -> Vec<Parameter> {
            vec![]
        }

        fn construct(_arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self::default())
        }

        fn methods() -> Vec<MethodDescriptor> {
            vec![
                MethodDescriptor::new("set_id", vec![Parameter::new("id")], Self::set_id),
                MethodDescriptor::new("set_id2", vec![Parameter::new("id2")], Self::set_id2),
                MethodDescriptor::new(
                    "set_ids",
                    vec![Parameter::new("id2"), Parameter::new("id")],
                    Self::set_ids,
                ),
                MethodDescriptor::new("add_tag", vec![Parameter::new("tag")], Self::add_tag),
                MethodDescriptor::new(
                    "set_reference",
                    vec![Parameter::new("reference").with_dependency(TestObject::NAME)],
                    Self::set_reference,
                ),
            ]
        }
    }

    struct TestCycleA {
        _b: InstancePtr<TestCycleB>,
    }

    impl Constructible for TestCycleA {
        const NAME: &'static str = "TestCycleA";

        fn parameters() -> Vec<Parameter> {
            vec![Parameter::new("b").with_dependency(TestCycleB::NAME)]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                _b: arguments.take("b")?,
            })
        }
    }

    struct TestCycleB {
        _a: InstancePtr<TestCycleA>,
    }

    impl Constructible for TestCycleB {
        const NAME: &'static str = "TestCycleB";

        fn parameters() -> Vec<Parameter> {
            vec![Parameter::new("a").with_dependency(TestCycleA::NAME)]
        }

        fn construct(arguments: &mut BoundArguments) -> Result<Self, ErrorPtr> {
            Ok(Self {
                _a: arguments.take("a")?,
            })
        }
    }

    struct TestServiceRegisterer;

    impl ServiceRegisterer for TestServiceRegisterer {
        fn register(&self, container: &mut Container) {
            container.set_implementation(
                "Foo\\Bar",
                Implementation::factory(|| Ok(Value::from("woo"))),
            );
        }
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with_type::<TestObject>()
            .with_type::<TestObjectDependencies>()
            .with_type::<TestNonDefinedObject>()
            .with_type::<TestNonDefinedObjectDependencies>()
            .with_type::<TestObjectDependencyDefault>()
            .with_type::<TestObjectDependenciesSpecial>()
            .with_type::<TestObjectSetters>()
            .with_type::<TestCycleA>()
            .with_type::<TestCycleB>()
    }

    fn create_container() -> Container {
        let mut container = ContainerBuilder::new()
            .with_type_registry(registry())
            .build();
        container.set(TestObject::NAME);
        container.set(TestObjectDependencies::NAME);
        container
    }

    #[test]
    fn should_return_same_singleton() {
        let mut container = create_container();
        let first = container.get(TestObject::NAME).unwrap();
        let second = container.get(TestObject::NAME).unwrap();

        assert_eq!(first, second);
        assert!(first.downcast::<TestObject>().is_some());
    }

    #[test]
    fn should_return_unique_instances() {
        let mut container = create_container();
        container.set(TestObject::NAME).set_singleton(false);

        let first = container.get(TestObject::NAME).unwrap();
        let second = container.get(TestObject::NAME).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn should_delegate_to_factory_once() {
        let mut container = create_container();
        container.set_implementation(
            TestObject::NAME,
            Implementation::factory(|| Ok(Value::instance(TestNonDefinedObject))),
        );

        let first = container.get(TestObject::NAME).unwrap();
        let second = container.get(TestObject::NAME).unwrap();
        assert!(first.downcast::<TestNonDefinedObject>().is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn should_return_raw_callable() {
        let mut container = create_container();
        container.set_implementation(
            TestObject::NAME,
            Container::raw(|| Ok(Value::instance(TestNonDefinedObject))),
        );

        let first = match container.get(TestObject::NAME).unwrap() {
            Value::Callable(callable) => callable,
            value => panic!("Expected a callable, got: {value:?}"),
        };
        let second = match container.get(TestObject::NAME).unwrap() {
            Value::Callable(callable) => callable,
            value => panic!("Expected a callable, got: {value:?}"),
        };

        let instance = first().unwrap();
        assert!(instance.downcast::<TestNonDefinedObject>().is_some());
        assert_ne!(instance, second().unwrap());
    }

    #[test]
    fn should_check_definitions() {
        let container = create_container();
        assert!(container.has(TestObject::NAME));
        assert!(!container.has("foo"));
        assert_eq!(
            container.definition(TestObject::NAME).unwrap().alias(),
            TestObject::NAME
        );
        assert!(container.definition("foo").is_none());
    }

    #[test]
    fn should_fail_for_undefined_alias() {
        let mut container = create_container();
        assert!(matches!(
            container.get("Foo"),
            Err(ContainerError::DependencyNotFound(alias)) if alias == "Foo"
        ));
    }

    #[test]
    fn should_resolve_dependencies() {
        let mut container = create_container();
        let first = container
            .instance_typed::<TestObjectDependencies>(TestObjectDependencies::NAME)
            .unwrap();
        let second = container
            .instance_typed::<TestObjectDependencies>(TestObjectDependencies::NAME)
            .unwrap();

        assert!(InstancePtr::ptr_eq(&first, &second));
        assert!(InstancePtr::ptr_eq(&first.foo, &second.foo));
        assert!(InstancePtr::ptr_eq(
            &first.foo,
            &container.get_type::<TestObject>().unwrap()
        ));
    }

    #[test]
    fn should_resolve_non_defined_types() {
        let mut container = create_container();
        assert!(container.get_type::<TestNonDefinedObject>().is_ok());

        let instance = container
            .get_type::<TestNonDefinedObjectDependencies>()
            .unwrap();
        assert_eq!(instance.foo.id, 1);
        assert!(container.has(TestNonDefinedObjectDependencies::NAME));
    }

    #[test]
    fn should_not_resolve_non_defined_types_without_auto_registration() {
        let mut container = ContainerBuilder::new()
            .with_type_registry(registry())
            .with_auto_registration(false)
            .build();

        assert!(matches!(
            container.get(TestNonDefinedObject::NAME),
            Err(ContainerError::DependencyNotFound(_))
        ));
    }

    #[test]
    fn should_return_prebuilt_instance() {
        let mut container = create_container();
        let dependencies = TestObjectDependencies {
            foo: InstancePtr::new(TestObject { id: 2 }),
        };
        let instance = Value::instance(dependencies);
        container.set_implementation(
            TestObjectDependencies::NAME,
            Implementation::instance(instance.clone()),
        );

        let resolved = container.get(TestObjectDependencies::NAME).unwrap();
        assert_eq!(resolved, instance);
        assert_eq!(
            resolved.downcast::<TestObjectDependencies>().unwrap().foo.id,
            2
        );
    }

    #[test]
    fn should_pass_instance_as_argument() {
        let mut container = create_container();
        container
            .set(TestObjectDependencies::NAME)
            .with_argument("foo", Value::instance(TestObject { id: 2 }));

        let instance = container.get_type::<TestObjectDependencies>().unwrap();
        assert_eq!(instance.foo.id, 2);
    }

    #[test]
    fn should_pass_service_reference_as_argument() {
        let mut container = create_container();
        let object = Value::instance(TestObject { id: 3 });
        container.set_implementation(TestObject::NAME, Implementation::instance(object.clone()));
        container
            .set(TestObjectDependencies::NAME)
            .with_argument("foo", Value::reference(TestObject::NAME));

        let instance = container.get_type::<TestObjectDependencies>().unwrap();
        assert_eq!(Value::from_ptr(instance.foo.clone()), object);
        assert_eq!(instance.foo.id, 3);
    }

    #[test]
    fn should_fail_for_lone_reference_marker() {
        let mut container = create_container();
        container
            .set(TestObjectDependencies::NAME)
            .with_argument("foo", "@");

        assert!(matches!(
            container.get(TestObjectDependencies::NAME),
            Err(ContainerError::DependencyNotFound(alias)) if alias.is_empty()
        ));
    }

    #[test]
    fn should_use_default_for_unknown_dependency() {
        let mut container = create_container();
        let instance = container.get_type::<TestObjectDependencyDefault>().unwrap();

        assert!(instance.foo2.is_none());
        assert_eq!(instance.foo.id, 1);
    }

    #[test]
    fn should_share_singleton_with_implementation() {
        let mut container = create_container();
        container.set_implementation("Some\\Interface", TestObject::NAME);

        let first = container.get("Some\\Interface").unwrap();
        let second = container.get(TestObject::NAME).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn should_cache_implementation_type_under_its_name() {
        let mut container = create_container();
        container.set_implementation("Some\\Interface", TestNonDefinedObject::NAME);

        let first = container.get("Some\\Interface").unwrap();
        let second = container.get(TestNonDefinedObject::NAME).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn should_not_share_non_singletons_with_implementation() {
        let mut container = create_container();
        container
            .set_implementation("Some\\Interface", TestObject::NAME)
            .set_singleton(false);
        container.set(TestObject::NAME).set_singleton(false);

        let first = container.get("Some\\Interface").unwrap();
        let second = container.get(TestObject::NAME).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn should_invalidate_singleton_on_set() {
        let mut container = create_container();
        let first = container.get(TestObject::NAME).unwrap();

        container.set(TestObject::NAME).with_argument("id", 5);

        let second = container.get(TestObject::NAME).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.downcast::<TestObject>().unwrap().id, 5);
    }

    #[test]
    fn should_apply_setters() {
        let mut container = create_container();
        container
            .set_implementation("Some\\Interface", TestObjectSetters::NAME)
            .with_setter("set_id", Arguments::new().with("id", 10))
            .with_setter("set_id2", Arguments::new().with("id2", 20));

        let instance = container
            .instance_typed::<TestObjectSetters>("Some\\Interface")
            .unwrap();
        assert_eq!(instance.id, 10);
        assert_eq!(instance.id2, 20);
    }

    #[test]
    fn should_apply_setters_with_unordered_arguments() {
        let mut container = create_container();
        container
            .set_implementation("Some\\Interface", TestObjectSetters::NAME)
            .with_setter("set_ids", Arguments::new().with("id", 16).with("id2", 15));

        let instance = container
            .instance_typed::<TestObjectSetters>("Some\\Interface")
            .unwrap();
        assert_eq!(instance.id, 16);
        assert_eq!(instance.id2, 15);
    }

    #[test]
    fn should_apply_repeated_setters_in_order() {
        let mut container = create_container();
        container
            .set(TestObjectSetters::NAME)
            .with_setter("add_tag", Arguments::new().with("tag", "first"))
            .with_setter("set_id", Arguments::new().with("id", 1))
            .with_setter("add_tag", Arguments::new().with("tag", "second"));

        let instance = container.get_type::<TestObjectSetters>().unwrap();
        assert_eq!(instance.tags, vec!["first", "second"]);
        assert_eq!(instance.id, 1);
    }

    #[test]
    fn should_inject_setter_dependencies() {
        let mut container = create_container();
        container
            .set(TestObjectSetters::NAME)
            .with_setter("set_reference", Arguments::new());

        let instance = container.get_type::<TestObjectSetters>().unwrap();
        assert!(InstancePtr::ptr_eq(
            instance.reference.as_ref().unwrap(),
            &container.get_type::<TestObject>().unwrap()
        ));
    }

    #[test]
    fn should_fail_for_unbound_setter_argument() {
        let mut container = create_container();
        container
            .set(TestObjectSetters::NAME)
            .with_setter("set_id", Arguments::new());

        assert!(matches!(
            container.get(TestObjectSetters::NAME),
            Err(ContainerError::Construction { target, .. }) if target == "TestObjectSetters::set_id"
        ));
    }

    #[test]
    fn should_run_service_registerer() {
        let mut container = create_container();
        container.register(&TestServiceRegisterer);

        assert_eq!(container.get("Foo\\Bar").unwrap(), Value::from("woo"));
    }

    #[test]
    fn should_delegate_to_redefined_implementation() {
        let mut container = create_container();
        container.set_implementation("Some\\Interface", TestNonDefinedObject::NAME);

        let object = Value::instance(TestObject { id: 7 });
        container.set_implementation(
            TestNonDefinedObject::NAME,
            Implementation::instance(object.clone()),
        );

        assert_eq!(container.get("Some\\Interface").unwrap(), object);
    }

    #[test]
    fn should_pass_special_arguments() {
        let mut container = create_container();
        container
            .set(TestObjectDependenciesSpecial::NAME)
            .with_argument("bar", BTreeMap::from([("one".to_string(), 1i64)]));

        let instance = container.get_type::<TestObjectDependenciesSpecial>().unwrap();
        assert_eq!(instance.bar["one"], 1);
        assert!(instance.test.is_null());
        assert_eq!(instance.foo.id, 1);

        container
            .set(TestObjectDependenciesSpecial::NAME)
            .with_argument("bar", BTreeMap::<String, i64>::new())
            .with_argument("test", Value::callable(|| Ok(Value::Int(1))));

        let instance = container.get_type::<TestObjectDependenciesSpecial>().unwrap();
        match &instance.test {
            Value::Callable(callable) => assert_eq!(callable().unwrap(), Value::Int(1)),
            value => panic!("Expected a callable, got: {value:?}"),
        }
    }

    #[test]
    fn should_fail_for_missing_special_arguments() {
        let mut container = create_container();
        container.set(TestObjectDependenciesSpecial::NAME);

        assert!(matches!(
            container.get(TestObjectDependenciesSpecial::NAME),
            Err(ContainerError::Construction { .. })
        ));
    }

    #[test]
    fn should_execute_method() {
        let mut container = create_container();
        let mut executable = container.executable_from_callable(
            TestObjectSetters::NAME,
            Callable::method(TestObjectSetters::default(), "set_ids"),
            Arguments::new().with("id", 405).with("id2", 1),
        );

        assert_eq!(executable().unwrap(), Value::from("success"));
    }

    #[test]
    fn should_execute_function() {
        let mut container = create_container();
        let function = Function::new(
            vec![
                Parameter::new("id"),
                Parameter::new("tobj").with_dependency(TestObject::NAME),
            ],
            |arguments| {
                let id: i64 = arguments.take("id")?;
                let object: InstancePtr<TestObject> = arguments.take("tobj")?;
                Ok(Value::Str(format!("success{}{}", id, object.id)))
            },
        );

        let mut executable = container.executable_from_callable(
            "closure",
            Callable::from(function),
            Arguments::new().with("id", 21),
        );

        assert_eq!(executable().unwrap(), Value::from("success211"));
        assert_eq!(executable().unwrap(), Value::from("success211"));
    }

    #[test]
    fn should_execute_function_with_mixed_arguments() {
        let mut container = create_container();
        let function = Function::new(
            vec![
                Parameter::new("tobj").with_dependency(TestObject::NAME),
                Parameter::new("id"),
            ],
            |arguments| {
                let _object: InstancePtr<TestObject> = arguments.take("tobj")?;
                let id: i64 = arguments.take("id")?;
                Ok(Value::Str(format!("success{id}")))
            },
        );

        let mut executable = container.executable_from_callable(
            "mixed",
            Callable::from(function),
            Arguments::positional([None, Some(Value::Int(21))]),
        );

        assert_eq!(executable().unwrap(), Value::from("success21"));
    }

    #[test]
    fn should_replace_definition() {
        let mut container = create_container();
        container.set_implementation("Some\\Interface", TestObject::NAME);
        container.set_implementation("Some\\Interface", TestNonDefinedObject::NAME);

        let instance = container.get("Some\\Interface").unwrap();
        assert!(instance.downcast::<TestNonDefinedObject>().is_some());
    }

    #[test]
    fn should_inject_setters_into_external_instance() {
        let mut container = create_container();
        container
            .set_implementation("Some\\Interface", TestObjectSetters::NAME)
            .with_setter("set_ids", Arguments::new().with("id2", 26).with("id", 1001));

        let mut instance = TestObjectSetters::default();
        container
            .inject_setters("Some\\Interface", &mut instance)
            .unwrap();

        assert_eq!(instance.id2, 26);
        assert_eq!(instance.id, 1001);
    }

    #[test]
    fn should_use_one_shot_arguments() {
        let mut container = create_container();
        let dependency = container.get_type::<TestObject>().unwrap();

        let instance = container
            .set_args(Arguments::new().with("foo", Value::instance(TestObject { id: 2036 })))
            .get(TestObjectDependencies::NAME)
            .unwrap()
            .downcast::<TestObjectDependencies>()
            .unwrap();
        assert_eq!(instance.foo.id, 2036);

        let regular = container.get_type::<TestObjectDependencies>().unwrap();
        assert!(InstancePtr::ptr_eq(&regular.foo, &dependency));
        assert!(!InstancePtr::ptr_eq(&regular, &instance));
        assert!(InstancePtr::ptr_eq(
            &regular,
            &container.get_type::<TestObjectDependencies>().unwrap()
        ));
    }

    #[test]
    fn should_keep_explicit_arguments_after_implicit_registration() {
        let mut container = ContainerBuilder::new()
            .with_type_registry(registry())
            .build();
        container
            .set_implementation("custom", TestObject::NAME)
            .with_argument("id", 42);

        let implicit = container.get_type::<TestObject>().unwrap();
        assert_eq!(implicit.id, 1);

        let custom = container.instance_typed::<TestObject>("custom").unwrap();
        assert_eq!(custom.id, 42);
        assert!(!InstancePtr::ptr_eq(&custom, &implicit));

        // the type keeps its own singleton
        assert!(InstancePtr::ptr_eq(
            &container.get_type::<TestObject>().unwrap(),
            &implicit
        ));
    }

    #[test]
    fn should_delegate_to_explicit_type_definition() {
        let mut container = ContainerBuilder::new()
            .with_type_registry(registry())
            .build();
        container.set_implementation("custom", TestObject::NAME);
        container.get_type::<TestObject>().unwrap();

        container.set(TestObject::NAME).with_argument("id", 7);

        let custom = container.instance_typed::<TestObject>("custom").unwrap();
        assert_eq!(custom.id, 7);
        assert!(InstancePtr::ptr_eq(
            &custom,
            &container.get_type::<TestObject>().unwrap()
        ));
    }

    #[test]
    fn should_detect_constructor_cycles() {
        let mut container = create_container();

        match container.get(TestCycleA::NAME) {
            Err(ContainerError::CyclicDependency { alias, chain }) => {
                assert_eq!(alias, TestCycleA::NAME);
                assert_eq!(chain, vec!["TestCycleA", "TestCycleB", "TestCycleA"]);
            }
            result => panic!("Expected a cycle, got: {:?}", result.map(|_| ())),
        }

        // chain is unwound after failure
        assert!(container.get(TestObject::NAME).is_ok());
        assert!(matches!(
            container.get(TestCycleB::NAME),
            Err(ContainerError::CyclicDependency { alias, .. }) if alias == TestCycleB::NAME
        ));
    }

    #[test]
    fn should_detect_reference_cycles() {
        let mut container = create_container();
        container
            .set(TestObjectDependencies::NAME)
            .with_argument("foo", Value::reference("Some\\Interface"));
        container.set_implementation("Some\\Interface", TestObjectDependencies::NAME);

        assert!(matches!(
            container.get(TestObjectDependencies::NAME),
            Err(ContainerError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn should_share_parameter_cache_between_containers() {
        let storage = SharedPoolStorage::new();
        let handle = storage.share();

        let mut container = ContainerBuilder::new()
            .with_type_registry(registry())
            .with_pool_storage(InstancePtr::new(storage) as PoolStoragePtr)
            .build();
        container.get_type::<TestObjectDependencies>().unwrap();

        assert_eq!(
            handle
                .get(TestObjectDependencies::NAME, PoolCategory::Constructor)
                .unwrap()[0]
                .name,
            "foo"
        );

        let mut other = ContainerBuilder::new()
            .with_type_registry(registry())
            .with_pool_storage(InstancePtr::new(handle) as PoolStoragePtr)
            .build();
        assert!(other.get_type::<TestObjectDependencies>().is_ok());
    }
}
