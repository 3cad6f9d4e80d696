//! # hal-core
//!
//! Hypertext Application Language (HAL) documents: the resource model, a
//! fluent builder, and the HAL-JSON serializer.
//!
//! This crate defines:
//! - [`Resource`]: state plus links plus embedded resources, recursively
//! - Links ([`LinkItem`], [`LinkItemCollection`], [`Link`], [`LinkCollection`])
//! - Embedded groups ([`EmbeddedResource`], [`EmbeddedResourceCollection`])
//! - The builder chain ([`ResourceBuilder`], [`Builder`], [`LinkingBuilder`])
//! - HAL-JSON output ([`HalSerializer`], [`HalJson`], [`SerializerOptions`])
//! - Error type ([`HalError`])
//!
//! ```
//! use hal_core::prelude::*;
//! use serde_json::json;
//!
//! let resource = ResourceBuilder::new()
//!     .with_state(json!({"shippedToday": 20}))
//!     .add_self_link()
//!     .with_link_item("/orders")
//!     .build()
//!     .unwrap();
//!
//! let json = HalSerializer::new(SerializerOptions::default().with_formatting(Formatting::Compact))
//!     .to_string(&resource)
//!     .unwrap();
//! assert_eq!(json, r#"{"_links":{"self":{"href":"/orders"}},"shippedToday":20}"#);
//! ```

pub mod builder;
pub mod embedded;
pub mod error;
pub mod link;
pub mod options;
pub mod resource;
pub mod serializer;

pub use builder::{
    Builder, EmbeddedResourceBuilder, EmbeddedResourceItemBuilder, LinkBuilder, LinkItemBuilder,
    LinkingBuilder, ResourceBuilder, ResourceStateBuilder,
};
pub use embedded::{EmbeddedResource, EmbeddedResourceCollection};
pub use error::{HalError, Result};
pub use link::{Link, LinkCollection, LinkItem, LinkItemCollection, LinkItemOptions, CURIES_REL, SELF_REL};
pub use options::{Formatting, NamingConvention, NullValueHandling, SerializerOptions};
pub use resource::{Resource, ResourceCollection};
pub use serializer::{HalJson, HalSerializer};

/// Everything needed to build and render documents.
pub mod prelude {
    pub use crate::builder::{Builder, LinkingBuilder, ResourceBuilder};
    pub use crate::link::LinkItemOptions;
    pub use crate::options::{Formatting, NamingConvention, NullValueHandling, SerializerOptions};
    pub use crate::resource::Resource;
    pub use crate::serializer::{HalJson, HalSerializer};
}
