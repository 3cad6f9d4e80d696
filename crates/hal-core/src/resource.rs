//! The resource type, the recursive unit of a HAL document.

use serde::Serialize;
use serde_json::Value;

use crate::embedded::EmbeddedResourceCollection;
use crate::error::Result;
use crate::link::LinkCollection;

/// A HAL resource: application state plus links plus embedded resources.
///
/// State is held as a [`serde_json::Value`]. Object state is flattened into
/// the rendered document; scalar or array state becomes the whole document
/// when the resource has no links and no embedded resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub state: Option<Value>,
    pub links: Option<LinkCollection>,
    pub embedded_resources: Option<EmbeddedResourceCollection>,
}

impl Resource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resource whose state is the JSON form of `state`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// `state` cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn with_state<T: Serialize>(state: T) -> Result<Self> {
        Ok(Self::from_value(serde_json::to_value(state)?))
    }

    /// Create a resource from an already-converted JSON state.
    #[must_use]
    pub fn from_value(state: Value) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    /// Replace the state with the JSON form of `state`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// `state` cannot be represented as JSON.
    pub fn set_state<T: Serialize>(&mut self, state: T) -> Result<()> {
        self.state = Some(serde_json::to_value(state)?);
        Ok(())
    }

    /// Links, created empty on first access.
    pub fn links_mut(&mut self) -> &mut LinkCollection {
        self.links.get_or_insert_with(LinkCollection::new)
    }

    /// Embedded groups, created empty on first access.
    pub fn embedded_resources_mut(&mut self) -> &mut EmbeddedResourceCollection {
        self.embedded_resources
            .get_or_insert_with(EmbeddedResourceCollection::new)
    }

    /// Whether the resource has at least one link.
    #[must_use]
    pub fn has_links(&self) -> bool {
        self.links.as_ref().is_some_and(|l| !l.is_empty())
    }

    /// Whether the resource has at least one embedded group.
    #[must_use]
    pub fn has_embedded_resources(&self) -> bool {
        self.embedded_resources
            .as_ref()
            .is_some_and(|e| !e.is_empty())
    }
}

/// Ordered list of resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    resources: Vec<Resource>,
}

impl ResourceCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Resource> {
        self.resources.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn clear(&mut self) {
        self.resources.clear();
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl IntoIterator for ResourceCollection {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl FromIterator<Resource> for ResourceCollection {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl Extend<Resource> for ResourceCollection {
    fn extend<I: IntoIterator<Item = Resource>>(&mut self, iter: I) {
        self.resources.extend(iter);
    }
}
