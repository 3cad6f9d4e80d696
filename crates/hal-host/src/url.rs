//! Request URLs and the links generated from them.
//!
//! A [`RequestUrl`] is the absolute URL of the request being answered. The
//! presenter derives every link of a response from it: the self link is the
//! request URL as received, page links substitute query parameters, and item
//! links replace the path.

use std::fmt;

use url::Url;

use crate::error::{HostError, Result};

/// Absolute URL of the incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    url: Url,
    path_base: String,
}

impl RequestUrl {
    /// Parse an absolute `scheme://host[:port]/path?query` URL.
    ///
    /// The query is kept exactly as received; the fragment is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidUrl`] when the URL is relative or has no
    /// host.
    pub fn parse(url: &str) -> Result<Self> {
        let mut parsed =
            Url::parse(url).map_err(|e| HostError::InvalidUrl(format!("'{url}': {e}")))?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(HostError::InvalidUrl(format!("missing host in '{url}'")));
        }
        parsed.set_fragment(None);

        Ok(Self {
            url: parsed,
            path_base: String::new(),
        })
    }

    /// Mark the leading `base` of the path as the application's mount point.
    ///
    /// Links with a path override leave the mount point out.
    #[must_use]
    pub fn with_path_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        if !base.is_empty() {
            if let Some(rest) = self.url.path().strip_prefix(base) {
                if rest.is_empty() || rest.starts_with('/') {
                    self.path_base = base.to_string();
                }
            }
        }
        self
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port; default ports of the scheme are not reported.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    #[must_use]
    pub fn path_base(&self) -> &str {
        &self.path_base
    }

    /// Path below the mount point.
    #[must_use]
    pub fn path(&self) -> &str {
        match &self.url.path()[self.path_base.len()..] {
            "" => "/",
            rest => rest,
        }
    }

    /// Decoded query parameters in request order.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }

    /// First value of the query parameter `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// The request URL as received.
    #[must_use]
    pub fn render(&self) -> String {
        self.url.as_str().to_string()
    }

    /// The request URL with `scheme`, without its query.
    #[must_use]
    pub fn without_query(&self, scheme: &str) -> String {
        let mut url = self.with_scheme(scheme);
        url.set_query(None);
        url.into()
    }

    /// The request URL with `scheme` and the given query parameters
    /// substituted: existing parameters keep their position and take the new
    /// value, parameters the request lacks are appended.
    #[must_use]
    pub fn with_query(&self, scheme: &str, substitution: &[(&str, String)]) -> String {
        let mut query = self.query();
        for (name, value) in substitution {
            match query.iter().position(|(key, _)| key == name) {
                Some(i) => {
                    query[i].1.clone_from(value);
                    let mut seen = 0;
                    query.retain(|(key, _)| {
                        if key != name {
                            return true;
                        }
                        seen += 1;
                        seen == 1
                    });
                }
                None => query.push(((*name).to_string(), value.clone())),
            }
        }

        let mut url = self.with_scheme(scheme);
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&query);
        }
        url.into()
    }

    /// A URL on the same host with `scheme` and `path`, without the path base
    /// or any query.
    #[must_use]
    pub fn with_path(&self, scheme: &str, path: &str) -> String {
        let mut url = self.with_scheme(scheme);
        url.set_path(path);
        url.set_query(None);
        url.into()
    }

    fn with_scheme(&self, scheme: &str) -> Url {
        let mut url = self.url.clone();
        if url.set_scheme(scheme).is_err() {
            tracing::debug!(from = url.scheme(), to = scheme, "scheme cannot be changed, keeping it");
        }
        url
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl std::str::FromStr for RequestUrl {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
