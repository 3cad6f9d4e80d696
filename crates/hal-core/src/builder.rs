//! Fluent builder chain for [`Resource`] trees.
//!
//! The chain is a sequence of typed steps; each step owns the
//! [`ResourceBuilder`] holding the resource under construction and applies
//! its own change as soon as it is called:
//!
//! ```text
//! ResourceBuilder ──with_state──→ ResourceStateBuilder
//!        │                              │
//!        └──────────add_link / add_self_link / add_curies_link──→ LinkBuilder
//!                                                                   │ with_link_item
//!                                                                   ↓
//!                                                             LinkItemBuilder ──add_link…
//!                    add_embedded / add_embedded_array ──→ EmbeddedResourceBuilder
//!                                                                   │ resource / resources
//!                                                                   ↓
//!                                                       EmbeddedResourceItemBuilder ──add_link…
//! ```
//!
//! A link item can only follow a link, and a sub-resource can only follow an
//! embedded group. Problems found along the way (an empty relation name, a
//! state that cannot be converted to JSON) are kept and returned by
//! [`Builder::build`].

use serde::Serialize;

use crate::error::{HalError, Result};
use crate::link::{LinkItem, LinkItemOptions, CURIES_REL, SELF_REL};
use crate::resource::Resource;

use self::sealed::Chain;

mod sealed {
    use super::ResourceBuilder;

    pub trait Chain {
        fn context(&self) -> &ResourceBuilder;
        fn into_context(self) -> ResourceBuilder;
    }
}

/// Terminal operations available at every step of the chain.
pub trait Builder: Sized {
    /// Finish the chain and return the resource.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by any step of the chain.
    fn build(self) -> Result<Resource>;

    /// The resource as built so far, leaving the chain usable.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by any step so far.
    fn snapshot(&self) -> Result<Resource>;
}

impl<T: Chain> Builder for T {
    fn build(self) -> Result<Resource> {
        self.into_context().finish()
    }

    fn snapshot(&self) -> Result<Resource> {
        self.context().clone().finish()
    }
}

/// An already-built resource can be embedded wherever a builder is expected.
impl Builder for Resource {
    fn build(self) -> Result<Resource> {
        Ok(self)
    }

    fn snapshot(&self) -> Result<Resource> {
        Ok(self.clone())
    }
}

/// Steps after which a new link or embedded group may be started.
pub trait LinkingBuilder: Chain + Sized {
    /// Start a link under relation `rel`.
    fn add_link(self, rel: impl Into<String>) -> LinkBuilder {
        LinkBuilder::start(self.into_context(), rel.into(), false)
    }

    /// Start the `self` link.
    fn add_self_link(self) -> LinkBuilder {
        LinkBuilder::start(self.into_context(), SELF_REL.to_string(), false)
    }

    /// Start the `curies` link; its items always render as an array.
    fn add_curies_link(self) -> LinkBuilder {
        LinkBuilder::start(self.into_context(), CURIES_REL.to_string(), true)
    }

    /// Start an embedded group that collapses to an object when it holds a
    /// single resource.
    fn add_embedded(self, name: impl Into<String>) -> EmbeddedResourceBuilder {
        EmbeddedResourceBuilder::start(self.into_context(), name.into(), false)
    }

    /// Start an embedded group that always renders as an array.
    fn add_embedded_array(self, name: impl Into<String>) -> EmbeddedResourceBuilder {
        EmbeddedResourceBuilder::start(self.into_context(), name.into(), true)
    }
}

/// Root of the chain. Owns the resource under construction.
#[derive(Debug, Clone, Default)]
pub struct ResourceBuilder {
    resource: Resource,
    error: Option<HalError>,
}

impl ResourceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource state to the JSON form of `state`.
    pub fn with_state<T: Serialize>(mut self, state: T) -> ResourceStateBuilder {
        self.set_state(state);
        ResourceStateBuilder { context: self }
    }

    fn set_state<T: Serialize>(&mut self, state: T) {
        match serde_json::to_value(state) {
            Ok(value) => self.resource.state = Some(value),
            Err(err) => self.fail(err.into()),
        }
    }

    fn fail(&mut self, err: HalError) {
        tracing::debug!(error = %err, "resource builder recorded an error");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn finish(self) -> Result<Resource> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.resource),
        }
    }

    fn start_link(&mut self, rel: &str) {
        if let Err(err) = self.resource.links_mut().get_or_insert(rel) {
            self.fail(err);
        }
    }

    fn push_link_item(
        &mut self,
        rel: &str,
        href: String,
        options: LinkItemOptions,
        enforcing_array_converting: bool,
    ) {
        let links = self.resource.links_mut();
        let result = LinkItem::with_options(href, options).and_then(|item| {
            links
                .get_or_insert(rel)
                .map(|link| link.add_item(item, enforcing_array_converting))
        });
        if let Err(err) = result {
            self.fail(err);
        }
    }

    fn start_embedded(&mut self, name: &str, enforcing_array_converting: bool) {
        let result = self
            .resource
            .embedded_resources_mut()
            .get_or_insert(name, enforcing_array_converting);
        if let Err(err) = result {
            self.fail(err);
        }
    }

    fn push_embedded<B: Builder>(&mut self, name: &str, builder: B) {
        let result = builder.build().and_then(|resource| {
            self.resource
                .embedded_resources_mut()
                .get_or_insert(name, false)
                .map(|group| group.add(resource))
        });
        if let Err(err) = result {
            self.fail(err);
        }
    }
}

impl From<Resource> for ResourceBuilder {
    fn from(resource: Resource) -> Self {
        Self {
            resource,
            error: None,
        }
    }
}

impl Chain for ResourceBuilder {
    fn context(&self) -> &ResourceBuilder {
        self
    }

    fn into_context(self) -> ResourceBuilder {
        self
    }
}

impl LinkingBuilder for ResourceBuilder {}

/// Step after the state has been set.
#[derive(Debug, Clone)]
pub struct ResourceStateBuilder {
    context: ResourceBuilder,
}

impl ResourceStateBuilder {
    /// Replace the state set earlier in the chain.
    #[must_use]
    pub fn with_state<T: Serialize>(mut self, state: T) -> Self {
        self.context.set_state(state);
        self
    }
}

impl Chain for ResourceStateBuilder {
    fn context(&self) -> &ResourceBuilder {
        &self.context
    }

    fn into_context(self) -> ResourceBuilder {
        self.context
    }
}

impl LinkingBuilder for ResourceStateBuilder {}

/// Step after a link has been started; only link items may follow.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    context: ResourceBuilder,
    rel: String,
    enforcing_array_converting: bool,
}

impl LinkBuilder {
    fn start(mut context: ResourceBuilder, rel: String, enforcing_array_converting: bool) -> Self {
        context.start_link(&rel);
        Self {
            context,
            rel,
            enforcing_array_converting,
        }
    }

    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    #[must_use]
    pub fn enforcing_array_converting(&self) -> bool {
        self.enforcing_array_converting
    }

    /// Add a link item pointing at `href`.
    pub fn with_link_item(self, href: impl Into<String>) -> LinkItemBuilder {
        self.with_link_item_options(href, LinkItemOptions::default())
    }

    /// Add a link item with optional attributes.
    pub fn with_link_item_options(
        mut self,
        href: impl Into<String>,
        options: LinkItemOptions,
    ) -> LinkItemBuilder {
        self.context
            .push_link_item(&self.rel, href.into(), options, self.enforcing_array_converting);
        LinkItemBuilder {
            context: self.context,
            rel: self.rel,
            enforcing_array_converting: self.enforcing_array_converting,
        }
    }
}

impl Chain for LinkBuilder {
    fn context(&self) -> &ResourceBuilder {
        &self.context
    }

    fn into_context(self) -> ResourceBuilder {
        self.context
    }
}

/// Step after a link item; more items for the same relation, a new link, or
/// an embedded group may follow.
#[derive(Debug, Clone)]
pub struct LinkItemBuilder {
    context: ResourceBuilder,
    rel: String,
    enforcing_array_converting: bool,
}

impl LinkItemBuilder {
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    #[must_use]
    pub fn enforcing_array_converting(&self) -> bool {
        self.enforcing_array_converting
    }

    /// Add another item under the same relation.
    #[must_use]
    pub fn with_link_item(self, href: impl Into<String>) -> Self {
        self.with_link_item_options(href, LinkItemOptions::default())
    }

    /// Add another item with optional attributes under the same relation.
    #[must_use]
    pub fn with_link_item_options(mut self, href: impl Into<String>, options: LinkItemOptions) -> Self {
        self.context
            .push_link_item(&self.rel, href.into(), options, self.enforcing_array_converting);
        self
    }
}

impl Chain for LinkItemBuilder {
    fn context(&self) -> &ResourceBuilder {
        &self.context
    }

    fn into_context(self) -> ResourceBuilder {
        self.context
    }
}

impl LinkingBuilder for LinkItemBuilder {}

/// Step after an embedded group has been started; only sub-resources may
/// follow.
#[derive(Debug, Clone)]
pub struct EmbeddedResourceBuilder {
    context: ResourceBuilder,
    name: String,
}

impl EmbeddedResourceBuilder {
    fn start(mut context: ResourceBuilder, name: String, enforcing_array_converting: bool) -> Self {
        context.start_embedded(&name, enforcing_array_converting);
        Self { context, name }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build `builder` and append the result to this group.
    pub fn resource<B: Builder>(self, builder: B) -> EmbeddedResourceItemBuilder {
        EmbeddedResourceItemBuilder {
            context: self.context,
            name: self.name,
        }
        .resource(builder)
    }

    /// Build every builder of `builders`, in order, appending each result.
    pub fn resources<I>(self, builders: I) -> EmbeddedResourceItemBuilder
    where
        I: IntoIterator,
        I::Item: Builder,
    {
        EmbeddedResourceItemBuilder {
            context: self.context,
            name: self.name,
        }
        .resources(builders)
    }
}

impl Chain for EmbeddedResourceBuilder {
    fn context(&self) -> &ResourceBuilder {
        &self.context
    }

    fn into_context(self) -> ResourceBuilder {
        self.context
    }
}

/// Step after a sub-resource has been embedded.
#[derive(Debug, Clone)]
pub struct EmbeddedResourceItemBuilder {
    context: ResourceBuilder,
    name: String,
}

impl EmbeddedResourceItemBuilder {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build `builder` and append the result to the current group.
    #[must_use]
    pub fn resource<B: Builder>(mut self, builder: B) -> Self {
        self.context.push_embedded(&self.name, builder);
        self
    }

    /// Build every builder of `builders`, in order, appending each result.
    #[must_use]
    pub fn resources<I>(mut self, builders: I) -> Self
    where
        I: IntoIterator,
        I::Item: Builder,
    {
        for builder in builders {
            self.context.push_embedded(&self.name, builder);
        }
        self
    }
}

impl Chain for EmbeddedResourceItemBuilder {
    fn context(&self) -> &ResourceBuilder {
        &self.context
    }

    fn into_context(self) -> ResourceBuilder {
        self.context
    }
}

impl LinkingBuilder for EmbeddedResourceItemBuilder {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::Cell;
    use std::collections::HashMap;

    fn hrefs(resource: &Resource, rel: &str) -> Vec<String> {
        resource
            .links
            .as_ref()
            .and_then(|l| l.get(rel))
            .and_then(|l| l.items.as_ref())
            .map(|items| items.iter().map(|i| i.href.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn with_state_sets_resource_state() {
        let resource = ResourceBuilder::new()
            .with_state(json!({"currentlyProcessing": 14}))
            .build()
            .unwrap();
        assert_eq!(resource.state(), Some(&json!({"currentlyProcessing": 14})));
    }

    #[test]
    fn second_with_state_overwrites() {
        let resource = ResourceBuilder::new()
            .with_state(json!({"a": 1}))
            .with_state(json!({"b": 2}))
            .build()
            .unwrap();
        assert_eq!(resource.state(), Some(&json!({"b": 2})));
    }

    #[test]
    fn links_can_start_without_state() {
        let resource = ResourceBuilder::new()
            .add_self_link()
            .with_link_item("/orders")
            .build()
            .unwrap();
        assert!(resource.state.is_none());
        assert_eq!(hrefs(&resource, "self"), vec!["/orders"]);
    }

    #[test]
    fn repeated_rel_appends_items() {
        let resource = ResourceBuilder::new()
            .with_state(json!({}))
            .add_link("x")
            .with_link_item("/one")
            .add_link("y")
            .with_link_item("/other")
            .add_link("x")
            .with_link_item("/two")
            .build()
            .unwrap();

        let links = resource.links.as_ref().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(hrefs(&resource, "x"), vec!["/one", "/two"]);
    }

    #[test]
    fn chained_items_share_the_relation() {
        let builder = ResourceBuilder::new()
            .add_link("alternate")
            .with_link_item("/a")
            .with_link_item_options("/b", LinkItemOptions::new().hreflang("de"));
        assert_eq!(builder.rel(), "alternate");
        assert!(!builder.enforcing_array_converting());

        let resource = builder.build().unwrap();
        assert_eq!(hrefs(&resource, "alternate"), vec!["/a", "/b"]);
    }

    #[test]
    fn curies_link_forces_array() {
        let builder = ResourceBuilder::new().add_curies_link();
        assert_eq!(builder.rel(), "curies");
        assert!(builder.enforcing_array_converting());

        let resource = builder
            .with_link_item_options(
                "http://example.com/docs/rels/{rel}",
                LinkItemOptions::new().name("ea").templated(true),
            )
            .build()
            .unwrap();
        let curies = resource.links.as_ref().unwrap().get("curies").unwrap();
        assert!(curies.items.as_ref().unwrap().enforcing_array_converting());
    }

    #[test]
    fn link_without_items_is_declared() {
        let resource = ResourceBuilder::new().add_link("search").build().unwrap();
        let link = resource.links.as_ref().unwrap().get("search").unwrap();
        assert!(link.items.is_none());
    }

    #[test]
    fn snapshot_reflects_steps_so_far() {
        let builder = ResourceBuilder::new()
            .with_state(json!({"a": 1}))
            .add_self_link()
            .with_link_item("/a");
        let partial = builder.snapshot().unwrap();
        assert_eq!(hrefs(&partial, "self"), vec!["/a"]);
        assert!(partial.embedded_resources.is_none());

        let full = builder
            .add_embedded("items")
            .resource(Resource::from_value(json!({"n": 1})))
            .build()
            .unwrap();
        assert_eq!(full.embedded_resources.as_ref().unwrap().len(), 1);
        assert_eq!(hrefs(&full, "self"), vec!["/a"]);
    }

    #[test]
    fn embedded_group_exists_before_resources_are_added() {
        let resource = ResourceBuilder::new()
            .add_embedded_array("orders")
            .build()
            .unwrap();
        let group = resource
            .embedded_resources
            .as_ref()
            .unwrap()
            .get("orders")
            .unwrap();
        assert!(group.resources.is_empty());
        assert!(group.enforcing_array_converting());
    }

    #[test]
    fn resources_consumes_each_builder_once_in_order() {
        let built = Cell::new(0);
        let builders = (1..=3).map(|n| {
            built.set(built.get() + 1);
            ResourceBuilder::new().with_state(json!({"n": n}))
        });

        let resource = ResourceBuilder::new()
            .add_embedded("items")
            .resources(builders)
            .build()
            .unwrap();

        assert_eq!(built.get(), 3);
        let group = resource.embedded_resources.as_ref().unwrap().get("items").unwrap();
        let states: Vec<&Value> = group.resources.iter().filter_map(Resource::state).collect();
        assert_eq!(states, vec![&json!({"n": 1}), &json!({"n": 2}), &json!({"n": 3})]);
    }

    #[test]
    fn same_embedded_name_appends() {
        let resource = ResourceBuilder::new()
            .add_embedded("items")
            .resource(Resource::from_value(json!(1)))
            .add_embedded("items")
            .resource(Resource::from_value(json!(2)))
            .build()
            .unwrap();
        let groups = resource.embedded_resources.as_ref().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("items").unwrap().resources.len(), 2);
    }

    #[test]
    fn links_follow_embedded_resources() {
        let resource = ResourceBuilder::new()
            .add_embedded("items")
            .resource(Resource::new())
            .add_self_link()
            .with_link_item("/items")
            .build()
            .unwrap();
        assert_eq!(hrefs(&resource, "self"), vec!["/items"]);
    }

    #[test]
    fn empty_rel_fails_the_build() {
        let err = ResourceBuilder::new()
            .add_link("")
            .with_link_item("/x")
            .build()
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidArgument(_)));
    }

    #[test]
    fn empty_href_fails_the_build() {
        let err = ResourceBuilder::new()
            .add_self_link()
            .with_link_item("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("href"));
    }

    #[test]
    fn empty_embedded_name_fails_the_build() {
        let err = ResourceBuilder::new()
            .add_embedded("")
            .resource(Resource::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn unconvertible_state_fails_the_build() {
        let mut state = HashMap::new();
        state.insert((1, 2), "tuple keys are not JSON");
        let err = ResourceBuilder::new().with_state(state).build().unwrap_err();
        assert!(matches!(err, HalError::Serialization(_)));
    }

    #[test]
    fn inner_builder_errors_propagate() {
        let inner = ResourceBuilder::new().add_link("").with_link_item("/x");
        let err = ResourceBuilder::new()
            .add_embedded("children")
            .resource(inner)
            .build()
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidArgument(_)));
    }

    #[test]
    fn first_error_wins() {
        let err = ResourceBuilder::new()
            .add_link("")
            .with_link_item("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("rel"));
    }

    #[test]
    fn builder_starts_from_existing_resource() {
        let resource = ResourceBuilder::from(Resource::from_value(json!({"a": 1})))
            .add_self_link()
            .with_link_item("/a")
            .build()
            .unwrap();
        assert_eq!(resource.state(), Some(&json!({"a": 1})));
        assert_eq!(hrefs(&resource, "self"), vec!["/a"]);
    }
}
