//! URL and response configuration types.

use url::Url;

/// JSON keys holding the envelope's status code, message and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseKeys {
    /// Key of the status code.
    pub code: String,
    /// Key of the message.
    pub message: String,
    /// Key of the payload.
    pub data: String,
}

impl Default for ResponseKeys {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            message: "message".to_string(),
            data: "data".to_string(),
        }
    }
}

impl ResponseKeys {
    /// Create response keys from explicit names.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: data.into(),
        }
    }
}

/// Process-wide configuration, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct UrlConfig {
    /// Base URL that request paths are resolved against.
    pub base_url: Url,
    /// Prefix for relative picture paths.
    pub base_picture_url: String,
    /// Header carrying the client version.
    pub version_header_key: String,
    /// Client version sent in the version header.
    pub version: String,
    /// Envelope keys.
    pub response_keys: ResponseKeys,
}

impl UrlConfig {
    /// Default client version.
    pub const DEFAULT_VERSION: &'static str = "0.1.0";

    /// Default version header.
    pub const DEFAULT_VERSION_HEADER: &'static str = "version";

    /// Create a new configuration builder.
    #[must_use]
    pub fn builder(base_url: Url) -> UrlConfigBuilder {
        UrlConfigBuilder::new(base_url)
    }
}

/// Builder for [`UrlConfig`].
#[derive(Debug, Clone)]
pub struct UrlConfigBuilder {
    base_url: Url,
    base_picture_url: Option<String>,
    version_header_key: Option<String>,
    version: Option<String>,
    response_keys: Option<ResponseKeys>,
}

impl UrlConfigBuilder {
    /// Create a builder for the given base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            base_picture_url: None,
            version_header_key: None,
            version: None,
            response_keys: None,
        }
    }

    /// Set the picture prefix. Defaults to the base URL.
    #[must_use]
    pub fn base_picture_url(mut self, url: impl Into<String>) -> Self {
        self.base_picture_url = Some(url.into());
        self
    }

    /// Set the version header name.
    #[must_use]
    pub fn version_header_key(mut self, key: impl Into<String>) -> Self {
        self.version_header_key = Some(key.into());
        self
    }

    /// Set the client version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the envelope keys.
    #[must_use]
    pub fn response_keys(mut self, keys: ResponseKeys) -> Self {
        self.response_keys = Some(keys);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> UrlConfig {
        let base_picture_url = self
            .base_picture_url
            .unwrap_or_else(|| self.base_url.to_string());
        UrlConfig {
            base_url: self.base_url,
            base_picture_url,
            version_header_key: self
                .version_header_key
                .unwrap_or_else(|| UrlConfig::DEFAULT_VERSION_HEADER.to_string()),
            version: self
                .version
                .unwrap_or_else(|| UrlConfig::DEFAULT_VERSION.to_string()),
            response_keys: self.response_keys.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    fn base() -> Url {
        Url::parse("https://api.test/v1/").expect("valid url")
    }

    #[test]
    fn default_config() {
        let config = UrlConfig::builder(base()).build();
        check!(config.base_picture_url == "https://api.test/v1/");
        check!(config.version_header_key == "version");
        check!(config.version == "0.1.0");
        check!(config.response_keys == ResponseKeys::default());
    }

    #[test]
    fn builder_overrides() {
        let config = UrlConfig::builder(base())
            .base_picture_url("https://img.test/")
            .version_header_key("X-App-Version")
            .version("2.3.1")
            .response_keys(ResponseKeys::new("status", "msg", "result"))
            .build();

        check!(config.base_picture_url == "https://img.test/");
        check!(config.version_header_key == "X-App-Version");
        check!(config.version == "2.3.1");
        check!(config.response_keys.code == "status");
        check!(config.response_keys.message == "msg");
        check!(config.response_keys.data == "result");
    }
}
