//! HAL-JSON rendering of resource trees.
//!
//! [`HalJson`] pairs a model value with [`SerializerOptions`] and implements
//! [`serde::Serialize`] with the HAL layout rules, so it can be written by
//! `serde_json` directly or nested inside another serializable structure.
//! [`HalSerializer`] wraps the common output targets.
//!
//! Layout of a rendered resource:
//! ```json
//! {
//!   "_links": { "self": { "href": "/orders" } },
//!   "currentlyProcessing": 14,
//!   "_embedded": { "ea:order": [ { "...": "..." } ] }
//! }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::embedded::{EmbeddedResource, EmbeddedResourceCollection};
use crate::error::Result;
use crate::link::{Link, LinkCollection, LinkItem, LinkItemCollection};
use crate::options::{Formatting, NamingConvention, SerializerOptions};
use crate::resource::Resource;

const LINKS_KEY: &str = "_links";
const EMBEDDED_KEY: &str = "_embedded";
const NO_ITEMS: &[Value] = &[];

/// A model value viewed through a set of serialization options.
pub struct HalJson<'a, T: ?Sized> {
    value: &'a T,
    options: &'a SerializerOptions,
}

impl<'a, T: ?Sized> HalJson<'a, T> {
    #[must_use]
    pub fn new(value: &'a T, options: &'a SerializerOptions) -> Self {
        Self { value, options }
    }

    fn child<'b, U: ?Sized>(&'b self, value: &'b U) -> HalJson<'b, U> {
        HalJson {
            value,
            options: self.options,
        }
    }
}

impl Serialize for HalJson<'_, Resource> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let resource = self.value;
        let state = resource.state.as_ref().filter(|s| !s.is_null());
        let has_links = resource.has_links();
        let has_embedded = resource.has_embedded_resources();

        let fields = match state {
            Some(Value::Object(fields)) => Some(fields),
            Some(other) if !has_links && !has_embedded => {
                return StateJson::new(other, self.options).serialize(serializer);
            }
            Some(_) => {
                tracing::debug!("non-object state left out beside links and embedded resources");
                None
            }
            None => None,
        };

        let mut map = serializer.serialize_map(None)?;
        if let Some(links) = resource.links.as_ref().filter(|l| !l.is_empty()) {
            map.serialize_entry(LINKS_KEY, &self.child(links))?;
        }
        if let Some(fields) = fields {
            for (name, value) in state_members(fields, self.options) {
                if (has_links && name == LINKS_KEY) || (has_embedded && name == EMBEDDED_KEY) {
                    continue;
                }
                map.serialize_entry(&name, &StateJson::new(value, self.options))?;
            }
        }
        if let Some(embedded) = resource.embedded_resources.as_ref().filter(|e| !e.is_empty()) {
            map.serialize_entry(EMBEDDED_KEY, &self.child(embedded))?;
        }
        map.end()
    }
}

impl Serialize for HalJson<'_, LinkCollection> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.value.len()))?;
        for link in self.value.iter() {
            serialize_link_entry(&mut map, link, self.options)?;
        }
        map.end()
    }
}

/// A single link renders as a one-entry object keyed by its relation.
impl Serialize for HalJson<'_, Link> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        serialize_link_entry(&mut map, self.value, self.options)?;
        map.end()
    }
}

fn serialize_link_entry<M: SerializeMap>(
    map: &mut M,
    link: &Link,
    options: &SerializerOptions,
) -> std::result::Result<(), M::Error> {
    match &link.items {
        Some(items) => map.serialize_entry(link.rel(), &HalJson::new(items, options)),
        None => map.serialize_entry(link.rel(), NO_ITEMS),
    }
}

impl Serialize for HalJson<'_, LinkItemCollection> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let items = self.value;
        if let (1, false, Some(only)) = (
            items.len(),
            items.enforcing_array_converting(),
            items.first(),
        ) {
            return self.child(only).serialize(serializer);
        }

        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&self.child(item))?;
        }
        seq.end()
    }
}

impl Serialize for HalJson<'_, LinkItem> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let item = self.value;
        let include = self.options.includes_nulls();

        let mut map = serializer.serialize_map(None)?;
        text_field(&mut map, "name", item.name.as_deref(), include)?;
        map.serialize_entry("href", &item.href)?;
        if item.templated.is_some() || include {
            map.serialize_entry("templated", &item.templated)?;
        }
        text_field(&mut map, "type", item.link_type.as_deref(), include)?;
        text_field(&mut map, "deprecation", item.deprecation.as_deref(), include)?;
        text_field(&mut map, "title", item.title.as_deref(), include)?;
        text_field(&mut map, "profile", item.profile.as_deref(), include)?;
        text_field(&mut map, "hreflang", item.hreflang.as_deref(), include)?;
        for (name, value) in item.properties() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Unset and empty strings are skipped unless nulls are included.
fn text_field<M: SerializeMap>(
    map: &mut M,
    key: &str,
    value: Option<&str>,
    include_nulls: bool,
) -> std::result::Result<(), M::Error> {
    match value {
        Some(v) if !v.is_empty() || include_nulls => map.serialize_entry(key, v),
        None if include_nulls => map.serialize_entry(key, &Value::Null),
        _ => Ok(()),
    }
}

impl Serialize for HalJson<'_, EmbeddedResourceCollection> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.value.len()))?;
        for group in self.value.iter() {
            map.serialize_entry(group.name(), &self.child(group))?;
        }
        map.end()
    }
}

/// An embedded group renders as the value stored under its name.
impl Serialize for HalJson<'_, EmbeddedResource> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let group = self.value;
        if let (1, false, Some(only)) = (
            group.resources.len(),
            group.enforcing_array_converting(),
            group.resources.first(),
        ) {
            return self.child(only).serialize(serializer);
        }

        let mut seq = serializer.serialize_seq(Some(group.resources.len()))?;
        for resource in &group.resources {
            seq.serialize_element(&self.child(resource))?;
        }
        seq.end()
    }
}

/// State value with the naming convention and null policy applied to every
/// nested object.
struct StateJson<'a> {
    value: &'a Value,
    options: &'a SerializerOptions,
}

impl<'a> StateJson<'a> {
    fn new(value: &'a Value, options: &'a SerializerOptions) -> Self {
        Self { value, options }
    }
}

impl Serialize for StateJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            Value::Object(fields) => {
                let members = state_members(fields, self.options);
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (name, value) in &members {
                    map.serialize_entry(name, &StateJson::new(value, self.options))?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&StateJson::new(item, self.options))?;
                }
                seq.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

/// Members of a state object as written: renamed by the naming convention,
/// null members dropped unless nulls are included. When two names meet after
/// renaming, the later member wins and keeps the position of the first.
fn state_members<'a>(
    fields: &'a Map<String, Value>,
    options: &SerializerOptions,
) -> IndexMap<Cow<'a, str>, &'a Value> {
    let include = options.includes_nulls();
    let mut members = IndexMap::with_capacity(fields.len());
    for (name, value) in fields {
        if value.is_null() && !include {
            continue;
        }
        let key = match options.naming_convention {
            NamingConvention::AsIs => Cow::Borrowed(name.as_str()),
            naming => Cow::Owned(naming.apply(name)),
        };
        if members.insert(key, value).is_some() {
            tracing::debug!(member = %name, "state member renamed onto an earlier one");
        }
    }
    members
}

/// Renders model values to JSON text, bytes, or trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalSerializer {
    options: SerializerOptions,
}

impl HalSerializer {
    #[must_use]
    pub fn new(options: SerializerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Render `value` as a JSON string laid out per the configured formatting.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// the tree cannot be rendered; no partial output is produced.
    pub fn to_string<T: ?Sized>(&self, value: &T) -> Result<String>
    where
        for<'a> HalJson<'a, T>: Serialize,
    {
        let view = HalJson::new(value, &self.options);
        tracing::trace!(formatting = ?self.options.formatting, "rendering HAL document");
        let json = match self.options.formatting {
            Formatting::Indented => serde_json::to_string_pretty(&view)?,
            Formatting::Compact => serde_json::to_string(&view)?,
        };
        Ok(json)
    }

    /// Render `value` as UTF-8 JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// the tree cannot be rendered.
    pub fn to_vec<T: ?Sized>(&self, value: &T) -> Result<Vec<u8>>
    where
        for<'a> HalJson<'a, T>: Serialize,
    {
        let view = HalJson::new(value, &self.options);
        let bytes = match self.options.formatting {
            Formatting::Indented => serde_json::to_vec_pretty(&view)?,
            Formatting::Compact => serde_json::to_vec(&view)?,
        };
        Ok(bytes)
    }

    /// Render `value` into `writer`. The document is rendered in full before
    /// anything is written, so a failure never leaves a truncated document.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// the tree cannot be rendered, or [`HalError::Io`](crate::HalError::Io)
    /// if writing fails.
    pub fn to_writer<W: Write, T: ?Sized>(&self, mut writer: W, value: &T) -> Result<()>
    where
        for<'a> HalJson<'a, T>: Serialize,
    {
        let bytes = self.to_vec(value)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Render `value` as a JSON tree. Formatting does not apply.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// the tree cannot be rendered.
    pub fn to_value<T: ?Sized>(&self, value: &T) -> Result<Value>
    where
        for<'a> HalJson<'a, T>: Serialize,
    {
        Ok(serde_json::to_value(HalJson::new(value, &self.options))?)
    }
}

impl Resource {
    /// Render this resource with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`](crate::HalError::Serialization) if
    /// the resource cannot be rendered.
    pub fn to_json(&self, options: SerializerOptions) -> Result<String> {
        HalSerializer::new(options).to_string(self)
    }
}

fn display_with_defaults<T: ?Sized>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    for<'a> HalJson<'a, T>: Serialize,
{
    match HalSerializer::default().to_string(value) {
        Ok(json) => f.write_str(&json),
        Err(err) => {
            tracing::warn!(error = %err, "HAL document could not be rendered, displaying null");
            f.write_str("null")
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_with_defaults(self, f)
    }
}

impl fmt::Display for LinkCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_with_defaults(self, f)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_with_defaults(self, f)
    }
}

impl fmt::Display for LinkItemCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_with_defaults(self, f)
    }
}

impl fmt::Display for LinkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_with_defaults(self, f)
    }
}
