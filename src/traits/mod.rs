//! Trait seams between the core and the surrounding container.

mod resolver;

pub use resolver::Resolver;
