//! URL and picture transforms.

use ::url::Url;
use serde_json::Value;

use super::{FromConfig, Transform, first_string, present};
use crate::UrlConfig;

/// Absolute URLs, from a string or a one-element string array.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransform;

impl Transform for UrlTransform {
    type Value = Url;

    fn decode(&self, raw: Option<&Value>) -> Option<Url> {
        first_string(raw).and_then(|s| Url::parse(s).ok())
    }

    fn encode(&self, value: Option<&Url>) -> Option<Value> {
        value.map(|url| Value::String(url.to_string()))
    }
}

impl FromConfig for UrlTransform {
    fn from_config(_config: &UrlConfig) -> Self {
        Self
    }
}

/// Picture URLs, resolving relative paths against a picture prefix.
///
/// ```
/// use coax_core::transform::{PictureUrl, Transform};
/// use serde_json::json;
///
/// let pictures = PictureUrl::new("https://img.test/");
/// let url = pictures.decode(Some(&json!("a.png"))).expect("resolved");
/// assert_eq!(url.as_str(), "https://img.test/a.png");
/// ```
#[derive(Debug, Clone)]
pub struct PictureUrl {
    base: String,
}

impl PictureUrl {
    /// Create a transform with the given picture prefix.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// The picture prefix.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve a picture path; absolute `http(s)` URLs are kept as-is.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path).ok()
        } else {
            Url::parse(&format!("{}{path}", self.base)).ok()
        }
    }

    /// The inverse of [`Self::resolve`]: strip the picture prefix.
    #[must_use]
    pub fn relativize(&self, url: &Url) -> String {
        let url = url.as_str();
        url.strip_prefix(self.base.as_str()).unwrap_or(url).to_string()
    }
}

impl Transform for PictureUrl {
    type Value = Url;

    fn decode(&self, raw: Option<&Value>) -> Option<Url> {
        first_string(raw).and_then(|s| self.resolve(s))
    }

    fn encode(&self, value: Option<&Url>) -> Option<Value> {
        value.map(|url| Value::String(self.relativize(url)))
    }
}

impl FromConfig for PictureUrl {
    fn from_config(config: &UrlConfig) -> Self {
        Self::new(config.base_picture_url.clone())
    }
}

/// Picture URL lists, from a string or an array of strings.
///
/// Unresolvable entries are dropped; decoding always succeeds, possibly with
/// an empty list.
#[derive(Debug, Clone)]
pub struct PictureList {
    pictures: PictureUrl,
}

impl PictureList {
    /// Create a transform with the given picture prefix.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            pictures: PictureUrl::new(base),
        }
    }
}

impl Transform for PictureList {
    type Value = Vec<Url>;

    fn decode(&self, raw: Option<&Value>) -> Option<Vec<Url>> {
        let urls = match present(raw) {
            Some(Value::String(s)) => self.pictures.resolve(s).into_iter().collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|s| self.pictures.resolve(s))
                .collect(),
            _ => Vec::new(),
        };
        Some(urls)
    }

    fn encode(&self, value: Option<&Vec<Url>>) -> Option<Value> {
        value.map(|urls| {
            urls.iter()
                .map(|url| Value::String(self.pictures.relativize(url)))
                .collect()
        })
    }
}

impl FromConfig for PictureList {
    fn from_config(config: &UrlConfig) -> Self {
        Self::new(config.base_picture_url.clone())
    }
}
