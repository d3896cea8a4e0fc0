//! The type registry: the crate's substitute for runtime reflection.
//!
//! Rust exposes no way to allocate a type by name, write a private field or
//! invoke a method through a string at runtime. The registry fills that gap
//! with a capability-descriptor table: every injectable type registers a
//! [`TypeDescriptor`] mapping its name to closures able to allocate a bare
//! instance, set named fields and invoke named methods over type-erased
//! values. The typed [`TypeDescriptorBuilder`] front-end erases these
//! closures so descriptor authors never touch `dyn Any` themselves.
//!
//! Because setter and method closures are authored in the module that owns
//! the type, private fields are legitimate injection targets: visibility is
//! bypassed by construction, not by magic.

use std::any::Any;
use std::marker::PhantomData;

use crate::error::{DiError, DiResult};
use crate::value::{Instance, Value};

#[cfg(feature = "ahash")]
type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

type AllocateFn = Box<dyn Fn() -> Instance + Send + Sync>;
type SetterFn = Box<dyn Fn(&mut dyn Any, Value) -> DiResult<()> + Send + Sync>;
type InvokeFn = Box<dyn Fn(&mut dyn Any, &[Value]) -> DiResult<()> + Send + Sync>;

/// Callable member of a registered type: the constructor or a named method.
///
/// `required` mirrors the member's required formal parameter count; the
/// factory checks supplied injections against it before resolving anything.
pub struct MethodDescriptor {
    required: usize,
    invoke: InvokeFn,
}

impl MethodDescriptor {
    pub fn required_parameters(&self) -> usize {
        self.required
    }

    /// Invokes the member on an already-allocated instance with positional
    /// arguments.
    pub fn invoke(&self, instance: &mut dyn Any, args: &[Value]) -> DiResult<()> {
        (self.invoke)(instance, args)
    }
}

/// Runtime capabilities of one injectable type, keyed by its name.
///
/// # Examples
///
/// ```rust
/// use forge_di::{TypeDescriptor, TypeRegistry};
/// use forge_di::value::cast;
///
/// #[derive(Default)]
/// struct Greeter {
///     greeting: String,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeDescriptor::of::<Greeter>("Greeter")
///         .setter("greeting", |greeter, value| {
///             greeter.greeting = cast::<String>(&value)?.as_ref().clone();
///             Ok(())
///         })
///         .build(),
/// );
///
/// let descriptor = registry.get("Greeter").unwrap();
/// assert!(descriptor.is_instantiable());
/// assert!(descriptor.has_field("greeting"));
/// ```
pub struct TypeDescriptor {
    type_name: String,
    instantiable: bool,
    allocate: Option<AllocateFn>,
    constructor: Option<MethodDescriptor>,
    setters: Map<String, SetterFn>,
    methods: Map<String, MethodDescriptor>,
}

impl TypeDescriptor {
    /// Starts a descriptor for a type allocated through `T::default()`.
    ///
    /// The default value stands in for a zero-initialized allocation: no user
    /// constructor logic belongs in it.
    pub fn of<T: Default + Any>(type_name: impl Into<String>) -> TypeDescriptorBuilder<T> {
        Self::with_allocator(type_name, T::default)
    }

    /// Starts a descriptor with an explicit bare-instance allocator.
    pub fn with_allocator<T, F>(type_name: impl Into<String>, allocate: F) -> TypeDescriptorBuilder<T>
    where
        T: Any,
        F: Fn() -> T + Send + Sync + 'static,
    {
        TypeDescriptorBuilder::new(type_name.into(), Box::new(move || Box::new(allocate())))
    }

    /// Registers a type that exists but cannot be instantiated (the analogue
    /// of an abstract class or interface). Creating an instance of it fails
    /// with a dependency error.
    pub fn abstract_type(type_name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor {
            type_name: type_name.into(),
            instantiable: false,
            allocate: None,
            constructor: None,
            setters: Map::default(),
            methods: Map::default(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_instantiable(&self) -> bool {
        self.instantiable && self.allocate.is_some()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.setters.contains_key(field)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// The constructor descriptor, or `None` when the type declares none.
    pub fn constructor(&self) -> Option<&MethodDescriptor> {
        self.constructor.as_ref()
    }

    pub fn method(&self, method: &str) -> Option<&MethodDescriptor> {
        self.methods.get(method)
    }

    /// Allocates a bare instance without running constructor logic.
    pub fn allocate(&self) -> DiResult<Instance> {
        match &self.allocate {
            Some(allocate) if self.instantiable => Ok(allocate()),
            _ => Err(DiError::dependency(format!(
                "{} is not instantiable",
                self.type_name
            ))),
        }
    }

    /// Writes a named field on an instance, regardless of declared visibility.
    pub fn set_field(&self, instance: &mut dyn Any, field: &str, value: Value) -> DiResult<()> {
        match self.setters.get(field) {
            Some(setter) => setter(instance, value),
            None => Err(DiError::definition(format!(
                "{}::{} does not exist",
                self.type_name, field
            ))),
        }
    }
}

/// Typed builder for [`TypeDescriptor`].
///
/// Closures are written against `&mut T`; the builder wraps them with the
/// `dyn Any` downcast so the stored descriptor is fully type-erased.
pub struct TypeDescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> TypeDescriptorBuilder<T> {
    fn new(type_name: String, allocate: AllocateFn) -> Self {
        Self {
            descriptor: TypeDescriptor {
                type_name,
                instantiable: true,
                allocate: Some(allocate),
                constructor: None,
                setters: Map::default(),
                methods: Map::default(),
            },
            _marker: PhantomData,
        }
    }

    /// Adds a setter for a named field.
    pub fn setter<F>(mut self, field: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&mut T, Value) -> DiResult<()> + Send + Sync + 'static,
    {
        let type_name = self.descriptor.type_name.clone();
        self.descriptor.setters.insert(
            field.into(),
            Box::new(move |instance, value| {
                let instance = downcast_instance::<T>(instance, &type_name)?;
                setter(instance, value)
            }),
        );
        self
    }

    /// Declares the constructor with its required parameter count.
    ///
    /// The body receives the already-allocated instance plus the positional
    /// argument list and performs whatever the real constructor would.
    pub fn constructor<F>(mut self, required: usize, body: F) -> Self
    where
        F: Fn(&mut T, &[Value]) -> DiResult<()> + Send + Sync + 'static,
    {
        let type_name = self.descriptor.type_name.clone();
        self.descriptor.constructor = Some(MethodDescriptor {
            required,
            invoke: Box::new(move |instance, args| {
                let instance = downcast_instance::<T>(instance, &type_name)?;
                body(instance, args)
            }),
        });
        self
    }

    /// Adds an invokable method with its required parameter count.
    pub fn method<F>(mut self, method: impl Into<String>, required: usize, body: F) -> Self
    where
        F: Fn(&mut T, &[Value]) -> DiResult<()> + Send + Sync + 'static,
    {
        let type_name = self.descriptor.type_name.clone();
        self.descriptor.methods.insert(
            method.into(),
            MethodDescriptor {
                required,
                invoke: Box::new(move |instance, args| {
                    let instance = downcast_instance::<T>(instance, &type_name)?;
                    body(instance, args)
                }),
            },
        );
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

fn downcast_instance<'a, T: Any>(
    instance: &'a mut dyn Any,
    type_name: &str,
) -> DiResult<&'a mut T> {
    instance
        .downcast_mut::<T>()
        .ok_or_else(|| DiError::TypeMismatch(type_name.to_string()))
}

/// Registry of all injectable types, keyed by type name.
///
/// Registering a descriptor under an already-taken name replaces the previous
/// one, matching last-wins registration semantics.
#[derive(Default)]
pub struct TypeRegistry {
    types: Map<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types
            .insert(descriptor.type_name.clone(), descriptor);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
