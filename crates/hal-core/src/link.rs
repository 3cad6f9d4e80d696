//! Link types: relation-keyed hypermedia references of a resource.
//!
//! A [`LinkCollection`] holds one [`Link`] per relation name. Each link owns a
//! [`LinkItemCollection`] of concrete [`LinkItem`] targets; a relation with a
//! single item renders as an object, several items (or a forced collection)
//! render as an array.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{HalError, Result};

/// Relation name of the link pointing at the resource itself.
pub const SELF_REL: &str = "self";

/// Relation name of the CURIE declarations (always rendered as an array).
pub const CURIES_REL: &str = "curies";

/// A single hypermedia reference under a relation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkItem {
    /// Target URI or URI template.
    pub href: String,
    /// Secondary key for selecting among items of the same relation.
    pub name: Option<String>,
    /// Whether `href` is a URI template.
    pub templated: Option<bool>,
    /// Media type hint for the target.
    pub link_type: Option<String>,
    /// URL describing the deprecation of the link.
    pub deprecation: Option<String>,
    /// Profile URI of the target resource.
    pub profile: Option<String>,
    /// Human-readable label.
    pub title: Option<String>,
    /// Language of the target resource.
    pub hreflang: Option<String>,
    properties: IndexMap<String, Value>,
}

impl LinkItem {
    /// Create a link item pointing at `href`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `href` is empty.
    pub fn new(href: impl Into<String>) -> Result<Self> {
        let href = href.into();
        if href.is_empty() {
            return Err(HalError::missing("href", "link item"));
        }
        Ok(Self {
            href,
            name: None,
            templated: None,
            link_type: None,
            deprecation: None,
            profile: None,
            title: None,
            hreflang: None,
            properties: IndexMap::new(),
        })
    }

    /// Create a link item and apply the optional attributes in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `href` is empty.
    pub fn with_options(href: impl Into<String>, options: LinkItemOptions) -> Result<Self> {
        let mut item = Self::new(href)?;
        item.name = options.name;
        item.templated = options.templated;
        item.link_type = options.link_type;
        item.deprecation = options.deprecation;
        item.profile = options.profile;
        item.title = options.title;
        item.hreflang = options.hreflang;
        item.properties = options.properties;
        Ok(item)
    }

    /// Add an extra property rendered after the standard link fields.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if the key is already present.
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        match self.properties.entry(name.into()) {
            Entry::Occupied(e) => Err(HalError::InvalidArgument(format!(
                "link item already has a property named '{}'",
                e.key()
            ))),
            Entry::Vacant(e) => {
                e.insert(value.into());
                Ok(())
            }
        }
    }

    /// Look up an extra property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Extra properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }
}

/// Optional attributes of a [`LinkItem`], set fluently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkItemOptions {
    pub name: Option<String>,
    pub templated: Option<bool>,
    pub link_type: Option<String>,
    pub deprecation: Option<String>,
    pub profile: Option<String>,
    pub title: Option<String>,
    pub hreflang: Option<String>,
    pub properties: IndexMap<String, Value>,
}

impl LinkItemOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn templated(mut self, templated: bool) -> Self {
        self.templated = Some(templated);
        self
    }

    #[must_use]
    pub fn link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    #[must_use]
    pub fn deprecation(mut self, deprecation: impl Into<String>) -> Self {
        self.deprecation = Some(deprecation.into());
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }

    /// Add an extra property. A repeated key replaces the earlier value.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Ordered link items of one relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkItemCollection {
    items: Vec<LinkItem>,
    enforcing_array_converting: bool,
}

impl LinkItemCollection {
    /// Create an empty collection. When `enforcing_array_converting` is set the
    /// collection renders as an array even with a single item.
    #[must_use]
    pub fn new(enforcing_array_converting: bool) -> Self {
        Self {
            items: Vec::new(),
            enforcing_array_converting,
        }
    }

    #[must_use]
    pub fn enforcing_array_converting(&self) -> bool {
        self.enforcing_array_converting
    }

    pub fn add(&mut self, item: LinkItem) {
        self.items.push(item);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&LinkItem> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkItem> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a LinkItemCollection {
    type Item = &'a LinkItem;
    type IntoIter = std::slice::Iter<'a, LinkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Extend<LinkItem> for LinkItemCollection {
    fn extend<I: IntoIterator<Item = LinkItem>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// A relation name together with its link items.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    rel: String,
    /// Absent until the first item is added.
    pub items: Option<LinkItemCollection>,
}

impl Link {
    /// Create a link for relation `rel` with no items.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `rel` is empty.
    pub fn new(rel: impl Into<String>) -> Result<Self> {
        let rel = rel.into();
        if rel.is_empty() {
            return Err(HalError::missing("rel", "link"));
        }
        Ok(Self { rel, items: None })
    }

    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Append an item. The item collection is created on first use with the
    /// given array-forcing flag; later flags are ignored.
    pub fn add_item(&mut self, item: LinkItem, enforcing_array_converting: bool) {
        self.items
            .get_or_insert_with(|| LinkItemCollection::new(enforcing_array_converting))
            .add(item);
    }

    /// Number of items under this relation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, LinkItemCollection::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Links of a resource keyed by relation, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkCollection {
    links: IndexMap<String, Link>,
}

impl LinkCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link. If a link with the same relation exists, the incoming
    /// items are appended to it instead of creating a second entry.
    pub fn add(&mut self, link: Link) {
        match self.links.entry(link.rel.clone()) {
            Entry::Vacant(e) => {
                e.insert(link);
            }
            Entry::Occupied(mut e) => {
                tracing::debug!(rel = %link.rel, "merging link into existing relation");
                let existing = e.get_mut();
                if let Some(incoming) = link.items {
                    match existing.items.as_mut() {
                        Some(items) => items.extend(incoming.items),
                        None => existing.items = Some(incoming),
                    }
                }
            }
        }
    }

    /// Get the link for `rel`, creating an empty one if missing.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidArgument`] if `rel` is empty.
    pub fn get_or_insert(&mut self, rel: &str) -> Result<&mut Link> {
        match self.links.entry(rel.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let link = Link::new(rel)?;
                Ok(e.insert(link))
            }
        }
    }

    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    pub fn get_mut(&mut self, rel: &str) -> Option<&mut Link> {
        self.links.get_mut(rel)
    }

    #[must_use]
    pub fn contains(&self, rel: &str) -> bool {
        self.links.contains_key(rel)
    }

    /// Remove a relation, keeping the order of the remaining links.
    pub fn remove(&mut self, rel: &str) -> Option<Link> {
        self.links.shift_remove(rel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

impl FromIterator<Link> for LinkCollection {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut links = Self::new();
        for link in iter {
            links.add(link);
        }
        links
    }
}
