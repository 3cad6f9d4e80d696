//! Embedded resources: named groups of nested resources under `_embedded`.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::{HalError, Result};
use crate::resource::{Resource, ResourceCollection};

/// A named group of nested resources.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedResource {
    name: String,
    pub resources: ResourceCollection,
    enforcing_array_converting: bool,
}

impl EmbeddedResource {
    /// Create an empty group that collapses to an object when it holds one
    /// resource.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_array_converting(name, false)
    }

    /// Create an empty group. With `enforcing_array_converting` set the group
    /// always renders as an array, including when empty.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `name` is empty.
    pub fn with_array_converting(
        name: impl Into<String>,
        enforcing_array_converting: bool,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(HalError::missing("name", "embedded resource"));
        }
        Ok(Self {
            name,
            resources: ResourceCollection::new(),
            enforcing_array_converting,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn enforcing_array_converting(&self) -> bool {
        self.enforcing_array_converting
    }

    pub fn add(&mut self, resource: Resource) {
        self.resources.add(resource);
    }
}

/// Embedded groups of a resource keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedResourceCollection {
    groups: IndexMap<String, EmbeddedResource>,
}

impl EmbeddedResourceCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group. A group with an existing name has its resources
    /// appended to the existing entry; the existing array flag is kept.
    pub fn add(&mut self, embedded: EmbeddedResource) {
        match self.groups.entry(embedded.name.clone()) {
            Entry::Vacant(e) => {
                e.insert(embedded);
            }
            Entry::Occupied(mut e) => {
                tracing::debug!(name = %embedded.name, "merging embedded resources into existing group");
                e.get_mut().resources.extend(embedded.resources);
            }
        }
    }

    /// Get the group called `name`, creating an empty one with the given
    /// array flag if missing.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `name` is empty.
    pub fn get_or_insert(
        &mut self,
        name: &str,
        enforcing_array_converting: bool,
    ) -> Result<&mut EmbeddedResource> {
        match self.groups.entry(name.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let group = EmbeddedResource::with_array_converting(name, enforcing_array_converting)?;
                Ok(e.insert(group))
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EmbeddedResource> {
        self.groups.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EmbeddedResource> {
        self.groups.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<EmbeddedResource> {
        self.groups.shift_remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmbeddedResource> {
        self.groups.values()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl FromIterator<EmbeddedResource> for EmbeddedResourceCollection {
    fn from_iter<I: IntoIterator<Item = EmbeddedResource>>(iter: I) -> Self {
        let mut groups = Self::new();
        for group in iter {
            groups.add(group);
        }
        groups
    }
}
