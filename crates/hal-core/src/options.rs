//! Serialization options: null policy, naming convention, and layout.

use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};

/// Whether absent values are written as `null` or left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullValueHandling {
    /// Unset link fields and null state members are omitted.
    #[default]
    Ignore,
    /// Unset link fields are written as `null`; null state members are kept.
    Include,
}

/// How state property names are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Names are written exactly as the state value carries them.
    #[default]
    AsIs,
    /// `snake_case` and `PascalCase` names are written as `camelCase`.
    CamelCase,
}

impl NamingConvention {
    /// Apply the convention to a single property name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingConvention::AsIs => name.to_string(),
            NamingConvention::CamelCase => to_camel_case(name),
        }
    }
}

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatting {
    /// Two-space indented output.
    #[default]
    Indented,
    /// Single-line output.
    Compact,
}

/// Options controlling how a resource tree is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    pub null_value_handling: NullValueHandling,
    pub naming_convention: NamingConvention,
    pub formatting: Formatting,
}

impl SerializerOptions {
    /// Options for HTTP responses: nulls ignored, camelCase names, compact.
    #[must_use]
    pub fn web() -> Self {
        Self {
            null_value_handling: NullValueHandling::Ignore,
            naming_convention: NamingConvention::CamelCase,
            formatting: Formatting::Compact,
        }
    }

    #[must_use]
    pub fn with_null_value_handling(mut self, handling: NullValueHandling) -> Self {
        self.null_value_handling = handling;
        self
    }

    #[must_use]
    pub fn with_naming_convention(mut self, convention: NamingConvention) -> Self {
        self.naming_convention = convention;
        self
    }

    #[must_use]
    pub fn with_formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = formatting;
        self
    }

    #[must_use]
    pub fn includes_nulls(&self) -> bool {
        self.null_value_handling == NullValueHandling::Include
    }
}

/// Convert a property name to camelCase.
///
/// Names starting with `_` are reserved and returned unchanged.
fn to_camel_case(name: &str) -> String {
    if name.starts_with('_') {
        return name.to_string();
    }
    name.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_converts_snake_case() {
        let c = NamingConvention::CamelCase;
        assert_eq!(c.apply("currently_processing"), "currentlyProcessing");
        assert_eq!(c.apply("total_elements"), "totalElements");
        assert_eq!(c.apply("a__b_"), "aB");
    }

    #[test]
    fn camel_case_lowers_leading_capitals() {
        let c = NamingConvention::CamelCase;
        assert_eq!(c.apply("Id"), "id");
        assert_eq!(c.apply("ID"), "id");
        assert_eq!(c.apply("URLValue"), "urlValue");
        assert_eq!(c.apply("TotalPages"), "totalPages");
        assert_eq!(c.apply("shippedToday"), "shippedToday");
    }

    #[test]
    fn camel_case_leaves_reserved_names() {
        let c = NamingConvention::CamelCase;
        assert_eq!(c.apply("_links"), "_links");
        assert_eq!(c.apply("_embedded"), "_embedded");
        assert_eq!(c.apply(""), "");
    }

    #[test]
    fn as_is_keeps_names() {
        assert_eq!(NamingConvention::AsIs.apply("Total_Pages"), "Total_Pages");
    }

    #[test]
    fn default_and_web_presets() {
        let default = SerializerOptions::default();
        assert_eq!(default.null_value_handling, NullValueHandling::Ignore);
        assert_eq!(default.naming_convention, NamingConvention::AsIs);
        assert_eq!(default.formatting, Formatting::Indented);

        let web = SerializerOptions::web();
        assert_eq!(web.naming_convention, NamingConvention::CamelCase);
        assert_eq!(web.formatting, Formatting::Compact);
        assert!(!web.includes_nulls());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: SerializerOptions =
            serde_json::from_str(r#"{"naming_convention": "camel_case"}"#).unwrap();
        assert_eq!(options.naming_convention, NamingConvention::CamelCase);
        assert_eq!(options.formatting, Formatting::Indented);
    }
}
