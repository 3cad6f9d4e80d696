//! # hal-host
//!
//! Helpers for hosts that serve HAL documents.
//!
//! - [`PagedResult`]: one page of items plus paging counters
//! - [`RequestUrl`]: the request URL and the links derived from it
//! - [`HalPresenter`]: handler results to `application/hal+json` responses
//! - [`HalConfig`]: HAL switches and serializer options from TOML or YAML
//! - Error type ([`HostError`])

pub mod config;
pub mod error;
pub mod paged;
pub mod presenter;
pub mod url;

pub use config::{HalConfig, HalOptions};
pub use error::{HostError, Result};
pub use paged::PagedResult;
pub use presenter::{
    camel_case_name, HalPresenter, HalResponse, Payload, Presented, RequestContext,
    HAL_JSON_CONTENT_TYPE, JSON_CONTENT_TYPE,
};
pub use url::RequestUrl;
