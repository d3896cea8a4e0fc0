use forge_di::value::{cast, value_of, Value};
use forge_di::{
    ClassDefinition, ConstructorInjection, DiError, DiResult, Factory, MethodInjection,
    ParameterInjection, PropertyInjection, Resolver, TypeDescriptor, TypeRegistry,
};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Resolver fixture recording every call it receives.
struct RecordingResolver {
    entries: HashMap<String, Value>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl RecordingResolver {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with(mut self, name: &str, value: Value) -> Self {
        self.entries.insert(name.to_string(), value);
        self
    }

    fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Resolver for RecordingResolver {
    fn resolve(&self, entry_name: &str, lazy: bool) -> DiResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((entry_name.to_string(), lazy));
        self.entries
            .get(entry_name)
            .cloned()
            .ok_or_else(|| DiError::NotFound(entry_name.to_string()))
    }
}

/// Resolver fixture failing every call with a fixed error.
struct FailingResolver(DiError);

impl Resolver for FailingResolver {
    fn resolve(&self, _entry_name: &str, _lazy: bool) -> DiResult<Value> {
        Err(self.0.clone())
    }
}

fn factory_with(resolver: Arc<RecordingResolver>, registry: TypeRegistry) -> Factory {
    Factory::new(resolver, Arc::new(registry))
}

// The injection target lives in its own module so its fields stay private to
// it; only the descriptor it exports can write them.
mod app {
    use super::*;

    #[derive(Default)]
    pub struct Service {
        database: Option<Arc<String>>,
        tag: String,
        constructed: bool,
        log: Vec<String>,
    }

    impl Service {
        pub fn database(&self) -> Option<&str> {
            self.database.as_ref().map(|db| db.as_str())
        }

        pub fn tag(&self) -> &str {
            &self.tag
        }

        pub fn is_constructed(&self) -> bool {
            self.constructed
        }

        pub fn log(&self) -> &[String] {
            &self.log
        }
    }

    pub fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Service>("app::Service")
            .setter("database", |service, value| {
                service.database = Some(cast::<String>(&value)?);
                Ok(())
            })
            .setter("tag", |service, value| {
                service.tag = cast::<String>(&value)?.as_ref().clone();
                Ok(())
            })
            .constructor(0, |service, args| {
                service.constructed = true;
                // One optional parameter; property injection has already run,
                // so the tag is visible here.
                if let Some(arg) = args.first() {
                    let db = cast::<String>(arg)?;
                    service.log.push(format!("ctor:{}:{}", service.tag, db));
                }
                Ok(())
            })
            .method("warm_up", 0, |service, _args| {
                service.log.push("warm_up".to_string());
                Ok(())
            })
            .method("set_backup", 1, |service, args| {
                let backup = cast::<String>(&args[0])?;
                service.log.push(format!("backup:{}", backup));
                Ok(())
            })
            .build()
    }
}

/// Type whose constructor requires two parameters, for arity checks.
#[derive(Default)]
struct Strict;

fn service_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register(app::descriptor());
    registry.register(
        TypeDescriptor::of::<Strict>("Strict")
            .constructor(2, |_strict, _args| Ok(()))
            .build(),
    );
    registry
}

#[derive(Default)]
struct Plain {
    marker: u8,
}

fn plain_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register(TypeDescriptor::of::<Plain>("Plain").build());
    registry
}

#[test]
fn test_bare_instance_for_empty_definition() {
    let resolver = Arc::new(RecordingResolver::new());
    let factory = factory_with(resolver.clone(), plain_registry());

    let instance = factory
        .create_instance(&ClassDefinition::new("Plain"))
        .unwrap();
    let plain = instance.downcast::<Plain>().unwrap();

    // Freshly allocated, untouched, and no resolution happened.
    assert_eq!(plain.marker, 0);
    assert!(resolver.calls().is_empty());
}

#[test]
fn test_unknown_type_fails_with_dependency_error() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), plain_registry());

    let error = factory
        .create_instance(&ClassDefinition::new("Ghost"))
        .unwrap_err();

    match error {
        DiError::Dependency { message, .. } => {
            assert_eq!(message, "Ghost is not instantiable");
        }
        other => panic!("expected dependency error, got {:?}", other),
    }
}

#[test]
fn test_abstract_type_fails_before_any_injection() {
    let mut registry = TypeRegistry::new();
    registry.register(TypeDescriptor::abstract_type("Repository"));

    let resolver = Arc::new(RecordingResolver::new());
    let factory = factory_with(resolver.clone(), registry);

    let definition = ClassDefinition::new("Repository")
        .with_property(PropertyInjection::new("database", "db"));
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Dependency { .. }));
    assert!(error.to_string().contains("Repository is not instantiable"));
    // Failed before property injection could resolve anything
    assert!(resolver.calls().is_empty());
}

#[test]
fn test_property_injection_reaches_private_field() {
    let resolver = Arc::new(
        RecordingResolver::new().with("db.dsn", value_of("postgres://localhost".to_string())),
    );
    let factory = factory_with(resolver, service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("database", "db.dsn"));
    let instance = factory.create_instance(&definition).unwrap();
    let service = instance.downcast::<app::Service>().unwrap();

    assert_eq!(service.database(), Some("postgres://localhost"));
}

#[test]
fn test_lazy_flag_forwarded_to_resolver() {
    let resolver = Arc::new(
        RecordingResolver::new()
            .with("db.dsn", value_of("dsn".to_string()))
            .with("app.tag", value_of("tag".to_string())),
    );
    let factory = factory_with(resolver.clone(), service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("database", "db.dsn").lazy())
        .with_property(PropertyInjection::new("tag", "app.tag"));
    factory.create_instance(&definition).unwrap();

    assert_eq!(
        resolver.calls(),
        vec![
            ("db.dsn".to_string(), true),
            ("app.tag".to_string(), false),
        ]
    );
}

#[test]
fn test_property_without_entry_name_is_definition_error() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::unresolved("database"));
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Definition(_)));
    assert!(error
        .to_string()
        .contains("app::Service::database has no entry name defined"));
}

#[test]
fn test_unknown_property_is_definition_error() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("nope", "db.dsn"));
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Definition(_)));
    assert!(error.to_string().contains("app::Service::nope does not exist"));
}

#[test]
fn test_missing_property_entry_wrapped_with_member_context() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("database", "db.dsn"));
    let error = factory.create_instance(&definition).unwrap_err();

    match &error {
        DiError::Dependency { message, source } => {
            assert!(message.contains("'db.dsn'"));
            assert!(message.contains("app::Service::database"));
            assert!(source.is_some());
        }
        other => panic!("expected dependency error, got {:?}", other),
    }
    // The original not-found failure stays reachable as the cause
    let cause = error.source().unwrap().to_string();
    assert!(cause.contains("db.dsn"));
}

#[test]
fn test_resolver_dependency_error_passes_verbatim() {
    let inner = DiError::dependency("cycle detected under the hood");
    let mut registry = TypeRegistry::new();
    registry.register(app::descriptor());
    let factory = Factory::new(Arc::new(FailingResolver(inner)), Arc::new(registry));

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("database", "db.dsn"));
    let error = factory.create_instance(&definition).unwrap_err();

    match error {
        DiError::Dependency { message, source } => {
            assert_eq!(message, "cycle detected under the hood");
            assert!(source.is_none());
        }
        other => panic!("expected verbatim dependency error, got {:?}", other),
    }
}

#[test]
fn test_resolver_definition_error_passes_verbatim() {
    let inner = DiError::definition("upstream metadata hole");
    let mut registry = TypeRegistry::new();
    registry.register(app::descriptor());
    let factory = Factory::new(Arc::new(FailingResolver(inner)), Arc::new(registry));

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("database", "db.dsn"));
    let error = factory.create_instance(&definition).unwrap_err();

    match error {
        DiError::Definition(message) => assert_eq!(message, "upstream metadata hole"),
        other => panic!("expected verbatim definition error, got {:?}", other),
    }
}

#[test]
fn test_constructor_arity_shortfall_is_definition_error() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    // Constructor requires 2 parameters, only 1 supplied.
    let definition = ClassDefinition::new("Strict").with_constructor(
        ConstructorInjection::new()
            .with_parameter(ParameterInjection::new("first").with_value(value_of(1u8))),
    );
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Definition(_)));
    assert!(error
        .to_string()
        .contains("The constructor of Strict takes 2 parameters, 1 defined"));
}

#[test]
fn test_missing_constructor_injection_checked_against_arity() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    // No constructor injection at all counts as zero supplied parameters.
    let error = factory
        .create_instance(&ClassDefinition::new("Strict"))
        .unwrap_err();
    assert!(matches!(error, DiError::Definition(_)));
    assert!(error
        .to_string()
        .contains("The constructor of Strict takes 2 parameters, 0 defined"));
}

#[test]
fn test_definition_constructor_skipped_when_type_declares_none() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), plain_registry());

    let definition = ClassDefinition::new("Plain").with_constructor(
        ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
    );

    // Plain has no constructor descriptor, so the injection is ignored.
    assert!(factory.create_instance(&definition).is_ok());
}

#[test]
fn test_constructor_runs_after_properties() {
    let resolver = Arc::new(
        RecordingResolver::new()
            .with("app.tag", value_of("prod".to_string()))
            .with("db.dsn", value_of("postgres://db".to_string())),
    );
    let factory = factory_with(resolver, service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("tag", "app.tag"))
        .with_constructor(
            ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
        );
    let instance = factory.create_instance(&definition).unwrap();
    let service = instance.downcast::<app::Service>().unwrap();

    assert!(service.is_constructed());
    // Constructor saw the property that was injected before it ran
    assert_eq!(service.log(), ["ctor:prod:postgres://db"]);
}

#[test]
fn test_parameter_without_entry_falls_back_to_literal() {
    let resolver = Arc::new(RecordingResolver::new());
    let factory = factory_with(resolver.clone(), service_registry());

    let definition = ClassDefinition::new("app::Service").with_constructor(
        ConstructorInjection::new().with_parameter(
            ParameterInjection::new("db").with_value(value_of("sqlite::memory:".to_string())),
        ),
    );
    let instance = factory.create_instance(&definition).unwrap();
    let service = instance.downcast::<app::Service>().unwrap();

    assert!(service.is_constructed());
    // Literal satisfied the parameter without touching the resolver
    assert!(resolver.calls().is_empty());
}

#[test]
fn test_unresolvable_parameter_is_definition_error() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    let definition = ClassDefinition::new("app::Service").with_constructor(
        ConstructorInjection::new().with_parameter(ParameterInjection::new("db")),
    );
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Definition(_)));
    assert!(error.to_string().contains(
        "The parameter 'db' of the constructor of app::Service has no entry or value defined"
    ));
}

#[test]
fn test_unresolved_constructor_entry_wrapped_with_class_context() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), service_registry());

    let definition = ClassDefinition::new("app::Service").with_constructor(
        ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
    );
    let error = factory.create_instance(&definition).unwrap_err();

    match &error {
        DiError::Dependency { message, source } => {
            assert!(message.contains("Error while injecting dependencies into app::Service"));
            assert!(source.is_some());
        }
        other => panic!("expected dependency error, got {:?}", other),
    }
}

#[test]
fn test_method_injections_run_in_order_after_construction() {
    let resolver = Arc::new(
        RecordingResolver::new()
            .with("db.dsn", value_of("primary".to_string()))
            .with("db.backup", value_of("replica".to_string())),
    );
    let factory = factory_with(resolver, service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_constructor(
            ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
        )
        .with_method(MethodInjection::new("warm_up"))
        .with_method(
            MethodInjection::new("set_backup")
                .with_parameter(ParameterInjection::entry("backup", "db.backup")),
        );
    let instance = factory.create_instance(&definition).unwrap();
    let service = instance.downcast::<app::Service>().unwrap();

    assert_eq!(
        service.log(),
        ["ctor::primary", "warm_up", "backup:replica"]
    );
}

#[test]
fn test_method_arity_shortfall_is_definition_error() {
    let resolver =
        Arc::new(RecordingResolver::new().with("db.dsn", value_of("dsn".to_string())));
    let factory = factory_with(resolver, service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_constructor(
            ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
        )
        .with_method(MethodInjection::new("set_backup"));
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Definition(_)));
    assert!(error
        .to_string()
        .contains("app::Service::set_backup takes 1 parameters, 0 defined"));
}

#[test]
fn test_unknown_method_is_definition_error() {
    let resolver =
        Arc::new(RecordingResolver::new().with("db.dsn", value_of("dsn".to_string())));
    let factory = factory_with(resolver, service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_constructor(
            ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
        )
        .with_method(MethodInjection::new("shutdown"));
    let error = factory.create_instance(&definition).unwrap_err();

    assert!(matches!(error, DiError::Definition(_)));
    assert!(error
        .to_string()
        .contains("app::Service::shutdown does not exist"));
}

#[test]
fn test_class_name_falls_back_to_entry_name() {
    let factory = factory_with(Arc::new(RecordingResolver::new()), plain_registry());

    // Entry named after the type directly, no explicit class name.
    let named = ClassDefinition::new("Plain");
    assert!(factory.create_instance(&named).is_ok());

    // Entry with its own name pointing at the registered type.
    let aliased = ClassDefinition::new("service.plain").with_class_name("Plain");
    assert!(factory.create_instance(&aliased).is_ok());
}

#[test]
fn test_no_memoization_between_calls() {
    let resolver =
        Arc::new(RecordingResolver::new().with("db.dsn", value_of("dsn".to_string())));
    let factory = factory_with(resolver.clone(), service_registry());

    let definition = ClassDefinition::new("app::Service")
        .with_property(PropertyInjection::new("database", "db.dsn"))
        .with_constructor(
            ConstructorInjection::new().with_parameter(ParameterInjection::entry("db", "db.dsn")),
        );

    factory.create_instance(&definition).unwrap();
    factory.create_instance(&definition).unwrap();

    // Two builds, two property lookups and two constructor lookups
    assert_eq!(resolver.calls().len(), 4);
}
