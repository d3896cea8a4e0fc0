//! Definition sources and the merging source.

use std::sync::Arc;

use crate::definition::Definition;

/// One contributor of definitions, queried by entry name.
///
/// Loaders (annotation scanners, file readers) implement this; the crate only
/// consumes it. Absence of a definition is `None`, never an error.
pub trait DefinitionSource: Send + Sync {
    /// Returns the definition this source holds for `name`, if any.
    fn get_definition(&self, name: &str) -> Option<Definition>;
}

/// A source that merges the definitions of several sub-sources.
///
/// Sub-sources are consulted in insertion order. A value definition found in
/// any sub-source prevails outright over everything else; class definitions
/// found in several sub-sources are merged into one, earlier sources taking
/// priority. A `CombinedDefinitionSource` is itself a [`DefinitionSource`],
/// so sources nest arbitrarily — a cycle of combined sources referencing each
/// other is a caller configuration error and is not detected here.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use forge_di::{CombinedDefinitionSource, Definition, DefinitionSource};
/// use forge_di::value::value_of;
///
/// struct Constant(&'static str, u16);
///
/// impl DefinitionSource for Constant {
///     fn get_definition(&self, name: &str) -> Option<Definition> {
///         (name == self.0).then(|| Definition::value(self.0, value_of(self.1)))
///     }
/// }
///
/// let mut combined = CombinedDefinitionSource::new();
/// combined.add_source(Arc::new(Constant("app.port", 8080)));
///
/// assert!(combined.get_definition("app.port").is_some());
/// assert!(combined.get_definition("missing").is_none());
/// ```
#[derive(Default)]
pub struct CombinedDefinitionSource {
    sub_sources: Vec<Arc<dyn DefinitionSource>>,
}

impl CombinedDefinitionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition source to the stack.
    ///
    /// Append-only: the new source affects subsequent lookups only. The same
    /// source may be added more than once and then contributes independently
    /// on every occurrence.
    pub fn add_source(&mut self, source: Arc<dyn DefinitionSource>) -> &mut Self {
        self.sub_sources.push(source);
        self
    }

    /// Removes every occurrence of `source`, matching by identity.
    ///
    /// Identity means pointer identity, not content: two distinct sources with
    /// identical definitions stay independently removable. A no-op when the
    /// source was never added.
    pub fn remove_source(&mut self, source: &Arc<dyn DefinitionSource>) {
        self.sub_sources
            .retain(|existing| !same_source(existing, source));
    }

    /// The current ordered sub-source list.
    ///
    /// This is a live view of the backing sequence, not a snapshot.
    pub fn sources(&self) -> &[Arc<dyn DefinitionSource>] {
        &self.sub_sources
    }
}

impl DefinitionSource for CombinedDefinitionSource {
    fn get_definition(&self, name: &str) -> Option<Definition> {
        let mut definition: Option<Definition> = None;

        for sub_source in &self.sub_sources {
            let Some(sub_definition) = sub_source.get_definition(name) else {
                continue;
            };

            // An explicit constant override always wins, over anything found
            // so far or later.
            if sub_definition.is_value() {
                return Some(sub_definition);
            }

            match &mut definition {
                None => definition = Some(sub_definition),
                Some(found) => found.merge(sub_definition),
            }
        }

        definition
    }
}

// Compares the data pointers only, dropping the vtable: the same allocation
// reached through differently-codegened vtables must still count as the same
// source.
fn same_source(a: &Arc<dyn DefinitionSource>, b: &Arc<dyn DefinitionSource>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
