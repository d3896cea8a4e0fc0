//! # forge-di
//!
//! Definition-driven dependency injection for Rust, inspired by PHP-DI.
//!
//! ## Features
//!
//! - **Named definitions**: constants and class blueprints identified by entry name
//! - **Source merging**: layer definition sources with deterministic precedence
//! - **Three injection styles**: property, constructor and method injection
//! - **Descriptor registry**: capability table standing in for runtime reflection
//! - **Two error kinds**: configuration bugs vs. runtime resolution failures, with causes preserved
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use forge_di::{
//!     ClassDefinition, DiError, DiResult, Factory, PropertyInjection, Resolver,
//!     TypeDescriptor, TypeRegistry,
//! };
//! use forge_di::value::{cast, value_of, Value};
//!
//! // A type the container will build. The field stays private; the setter
//! // closure below lives here and can reach it.
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! // Describe the type's injection capabilities once.
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeDescriptor::of::<Server>("Server")
//!         .setter("port", |server, value| {
//!             server.port = *cast::<u16>(&value)?;
//!             Ok(())
//!         })
//!         .build(),
//! );
//!
//! // The container seen by the factory; here a fixed map of entries.
//! struct MapResolver(HashMap<String, Value>);
//!
//! impl Resolver for MapResolver {
//!     fn resolve(&self, entry_name: &str, _lazy: bool) -> DiResult<Value> {
//!         self.0
//!             .get(entry_name)
//!             .cloned()
//!             .ok_or_else(|| DiError::NotFound(entry_name.to_string()))
//!     }
//! }
//!
//! let mut entries = HashMap::new();
//! entries.insert("config.port".to_string(), value_of(8080u16));
//!
//! let factory = Factory::new(Arc::new(MapResolver(entries)), Arc::new(registry));
//!
//! // A definition, normally assembled by a loader.
//! let definition = ClassDefinition::new("Server")
//!     .with_property(PropertyInjection::new("port", "config.port"));
//!
//! let instance = factory.create_instance(&definition).unwrap();
//! let server = instance.downcast::<Server>().unwrap();
//! assert_eq!(server.port, 8080);
//! ```
//!
//! ## Merging definition sources
//!
//! Definitions come from layered sources (annotations, files, overrides).
//! [`CombinedDefinitionSource`] consults its sub-sources in insertion order,
//! merges class definitions and lets an explicit constant override win
//! outright:
//!
//! ```rust
//! use std::sync::Arc;
//! use forge_di::{CombinedDefinitionSource, Definition, DefinitionSource};
//! use forge_di::value::value_of;
//!
//! struct Override;
//!
//! impl DefinitionSource for Override {
//!     fn get_definition(&self, name: &str) -> Option<Definition> {
//!         (name == "app.debug").then(|| Definition::value(name, value_of(true)))
//!     }
//! }
//!
//! let mut source = CombinedDefinitionSource::new();
//! source.add_source(Arc::new(Override));
//!
//! let definition = source.get_definition("app.debug").unwrap();
//! assert!(definition.is_value());
//! ```

// Module declarations
pub mod definition;
pub mod error;
pub mod factory;
pub mod registry;
pub mod traits;
pub mod value;

// Re-export core types
pub use definition::{
    ClassDefinition, CombinedDefinitionSource, ConstructorInjection, Definition, DefinitionSource,
    MethodInjection, ParameterInjection, PropertyInjection, ValueDefinition,
};
pub use error::{DiError, DiResult};
pub use factory::Factory;
pub use registry::{MethodDescriptor, TypeDescriptor, TypeDescriptorBuilder, TypeRegistry};
pub use traits::Resolver;
pub use value::{Instance, Value};
