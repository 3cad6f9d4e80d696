//! Turning handler results into HAL responses.
//!
//! [`HalPresenter::present`] takes the status and payload a handler produced
//! plus the request it answered, and returns either a rendered
//! `application/hal+json` response or the payload untouched.

use std::fmt;

use hal_core::{Builder, HalError, HalSerializer, LinkingBuilder, Resource, ResourceBuilder};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::{HalConfig, HalOptions};
use crate::error::Result;
use crate::paged::PagedResult;
use crate::url::RequestUrl;

pub const HAL_JSON_CONTENT_TYPE: &str = "application/hal+json; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const DEFAULT_COLLECTION_NAME: &str = "data";

/// What a handler returned, already converted to JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Paged(PagedResult<Value>),
    Collection(Vec<Value>),
    Object(Value),
    Empty,
}

impl Payload {
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`] if an item cannot be converted to
    /// JSON.
    pub fn paged<T: Serialize>(page: PagedResult<T>) -> Result<Self> {
        let page = page.try_map_items(serde_json::to_value).map_err(HalError::from)?;
        Ok(Payload::Paged(page))
    }

    /// # Errors
    ///
    /// Returns [`HalError::Serialization`] if an item cannot be converted to
    /// JSON.
    pub fn collection<T, I>(items: I) -> Result<Self>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(HalError::from)?;
        Ok(Payload::Collection(items))
    }

    /// Arrays become [`Payload::Collection`] and `null` becomes
    /// [`Payload::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`] if `value` cannot be converted to
    /// JSON.
    pub fn object<T: Serialize>(value: T) -> Result<Self> {
        Ok(match serde_json::to_value(value).map_err(HalError::from)? {
            Value::Null => Payload::Empty,
            Value::Array(items) => Payload::Collection(items),
            other => Payload::Object(other),
        })
    }

    /// Plain JSON form, as it would be sent without HAL.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Payload::Paged(page) => Some(Value::Array(page.items)),
            Payload::Collection(items) => Some(Value::Array(items)),
            Payload::Object(value) => Some(value),
            Payload::Empty => None,
        }
    }
}

/// The request a payload answers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub url: RequestUrl,
    /// Name of the embedded group holding collection items.
    pub collection_name: String,
    /// Location of a newly created object; replaces the self link.
    pub created_at: Option<String>,
    /// Whether the host runs in production, where links default to https.
    pub production: bool,
}

impl RequestContext {
    #[must_use]
    pub fn new(url: RequestUrl) -> Self {
        Self {
            url,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            created_at: None,
            production: false,
        }
    }

    /// Name the collection after a controller or route, e.g.
    /// `MeetingRooms` becomes `meetingRooms`.
    #[must_use]
    pub fn with_collection(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.collection_name = camel_case_name(name);
        }
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, location: impl Into<String>) -> Self {
        self.created_at = Some(location.into());
        self
    }

    #[must_use]
    pub fn in_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    fn self_href(&self) -> String {
        self.created_at.clone().unwrap_or_else(|| self.url.render())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HalResponse {
    /// Body as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Result of presenting a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Presented {
    /// Rendered HAL document.
    Hal(HalResponse),
    /// Left for the host to send as it would without HAL.
    PassThrough { status: u16, payload: Payload },
}

impl Presented {
    /// Render a pass-through payload as compact `application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`] if the payload cannot be rendered.
    pub fn into_response(self) -> Result<HalResponse> {
        match self {
            Presented::Hal(response) => Ok(response),
            Presented::PassThrough { status, payload } => {
                let body = match payload.into_value() {
                    Some(value) => serde_json::to_vec(&value).map_err(HalError::from)?,
                    None => Vec::new(),
                };
                Ok(HalResponse {
                    status,
                    content_type: JSON_CONTENT_TYPE,
                    body,
                })
            }
        }
    }
}

type ItemPath = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Builds HAL documents for handler results.
pub struct HalPresenter {
    options: HalOptions,
    serializer: HalSerializer,
    item_path: Option<ItemPath>,
}

impl HalPresenter {
    #[must_use]
    pub fn new(config: HalConfig) -> Self {
        Self {
            options: config.hal,
            serializer: HalSerializer::new(config.serializer),
            item_path: None,
        }
    }

    /// Resolve the path of a single item from its id, e.g.
    /// `1` to `/api/meetingrooms/get-by-id/1`.
    #[must_use]
    pub fn with_item_path<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.item_path = Some(Box::new(resolve));
        self
    }

    #[must_use]
    pub fn options(&self) -> &HalOptions {
        &self.options
    }

    #[must_use]
    pub fn serializer(&self) -> &HalSerializer {
        &self.serializer
    }

    /// Present `payload` returned with `status` for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Hal`](crate::HostError::Hal) if the document cannot
    /// be built or rendered.
    pub fn present(&self, status: u16, payload: Payload, request: &RequestContext) -> Result<Presented> {
        if !self.options.enabled {
            let payload = match payload {
                Payload::Paged(page) => Payload::Object(envelope(page, &request.collection_name)),
                other => other,
            };
            return Ok(Presented::PassThrough { status, payload });
        }

        if !(200..=299).contains(&status) {
            tracing::debug!(status, "non-success status, leaving payload as is");
            return Ok(Presented::PassThrough { status, payload });
        }

        let resource = match payload {
            Payload::Paged(page) => self.paged_resource(page, request)?,
            Payload::Collection(items) => self.collection_resource(items, request)?,
            Payload::Object(value @ Value::Object(_)) => ResourceBuilder::new()
                .with_state(value)
                .add_self_link()
                .with_link_item(request.self_href())
                .build()?,
            other => {
                tracing::debug!("payload has no object shape, leaving it as is");
                return Ok(Presented::PassThrough { status, payload: other });
            }
        };

        let body = self.serializer.to_vec(&resource)?;
        Ok(Presented::Hal(HalResponse {
            status,
            content_type: HAL_JSON_CONTENT_TYPE,
            body,
        }))
    }

    fn paged_resource(&self, page: PagedResult<Value>, request: &RequestContext) -> Result<Resource> {
        let scheme = self.link_scheme(request);
        let url = &request.url;
        let number = page.page_number;
        let total_pages = page.total_pages;
        let page_link = |n: u64| url.with_query(scheme, &[("page", n.to_string())]);

        let mut chain = ResourceBuilder::new()
            .with_state(json!({
                "page": {
                    "number": number,
                    "size": page.page_size,
                    "totalElements": page.total_records,
                    "totalPages": total_pages,
                }
            }))
            .add_self_link()
            .with_link_item(url.render())
            .add_link("first")
            .with_link_item(page_link(1))
            .add_link("last")
            .with_link_item(page_link(total_pages));
        if number > 1 && number <= total_pages {
            chain = chain.add_link("prev").with_link_item(page_link(number - 1));
        }
        if number >= 1 && number < total_pages {
            chain = chain.add_link("next").with_link_item(page_link(number + 1));
        }

        let items = self.link_items(page.items, scheme, url);
        Ok(chain
            .add_embedded(request.collection_name.as_str())
            .resource(ResourceBuilder::new().with_state(items))
            .build()?)
    }

    fn collection_resource(&self, items: Vec<Value>, request: &RequestContext) -> Result<Resource> {
        let scheme = self.link_scheme(request);
        let count = items.len();
        let items = self.link_items(items, scheme, &request.url);
        Ok(ResourceBuilder::new()
            .with_state(json!({ "count": count }))
            .add_self_link()
            .with_link_item(request.self_href())
            .add_embedded(request.collection_name.as_str())
            .resource(ResourceBuilder::new().with_state(items))
            .build()?)
    }

    fn link_items(&self, items: Vec<Value>, scheme: &str, url: &RequestUrl) -> Vec<Value> {
        items
            .into_iter()
            .map(|item| self.link_item(item, scheme, url))
            .collect()
    }

    /// Give an item carrying the id property its own self link.
    fn link_item(&self, item: Value, scheme: &str, url: &RequestUrl) -> Value {
        match item {
            Value::Object(mut fields) => {
                let href = fields
                    .get(&self.options.id_property_name)
                    .map(|id| self.item_href(id, scheme, url));
                if let Some(href) = href {
                    fields.insert("_links".to_string(), json!({ "self": { "href": href } }));
                }
                Value::Object(fields)
            }
            other => other,
        }
    }

    fn item_href(&self, id: &Value, scheme: &str, url: &RequestUrl) -> String {
        match self.item_path.as_ref().and_then(|resolve| resolve(id)) {
            Some(path) => url.with_path(scheme, &path),
            None => {
                tracing::debug!(%id, "no path for item, linking to the request instead");
                url.without_query(scheme)
            }
        }
    }

    fn link_scheme<'a>(&self, request: &'a RequestContext) -> &'a str {
        match self.options.use_https_scheme {
            Some(true) => "https",
            Some(false) => request.url.scheme(),
            None if request.production => "https",
            None => request.url.scheme(),
        }
    }
}

impl Default for HalPresenter {
    fn default() -> Self {
        Self::new(HalConfig::default())
    }
}

impl fmt::Debug for HalPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HalPresenter")
            .field("options", &self.options)
            .field("serializer", &self.serializer)
            .field("item_path", &self.item_path.is_some())
            .finish()
    }
}

/// Plain paging envelope used when HAL is disabled.
fn envelope(page: PagedResult<Value>, collection_name: &str) -> Value {
    let mut object = Map::new();
    object.insert("page".to_string(), json!(page.page_number));
    object.insert("size".to_string(), json!(page.page_size));
    object.insert("totalPages".to_string(), json!(page.total_pages));
    object.insert("totalCount".to_string(), json!(page.total_records));
    object.insert(collection_name.to_string(), Value::Array(page.items));
    Value::Object(object)
}

/// Lower-case the first character of a controller or route name.
#[must_use]
pub fn camel_case_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
