//! Engine connection configuration.

use url::Url;

/// Default engine endpoint used when no configuration is provided or the
/// configured value cannot be parsed.
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";

/// Default engine port applied when the configured URL omits one.
const DEFAULT_ENGINE_PORT: u16 = 9200;

/// Connection configuration for the search engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Normalized endpoint in `scheme://host:port` form.
    pub endpoint: String,
}

impl EngineConfig {
    /// Build a configuration from a URL-shaped value.
    ///
    /// The value must carry a scheme and a host; the port defaults to 9200
    /// when absent. A malformed value falls back to
    /// [`DEFAULT_ENGINE_URL`] rather than failing, so a bad environment
    /// variable cannot keep the service from starting.
    pub fn from_url(raw: &str) -> Self {
        let endpoint = Self::normalize(raw)
            .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string());
        Self { endpoint }
    }

    fn normalize(raw: &str) -> Option<String> {
        let parsed = Url::parse(raw).ok()?;
        let host = parsed.host_str()?;
        let port = parsed.port().unwrap_or(DEFAULT_ENGINE_PORT);
        Some(format!("{}://{}:{}", parsed.scheme(), host, port))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENGINE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_url_passes_through() {
        let config = EngineConfig::from_url("http://opensearch:9200");
        assert_eq!(config.endpoint, "http://opensearch:9200");
    }

    #[test]
    fn test_missing_port_defaults_to_9200() {
        let config = EngineConfig::from_url("https://search.internal");
        assert_eq!(config.endpoint, "https://search.internal:9200");
    }

    #[test]
    fn test_explicit_port_is_kept() {
        let config = EngineConfig::from_url("http://localhost:9201");
        assert_eq!(config.endpoint, "http://localhost:9201");
    }

    #[test]
    fn test_malformed_url_falls_back_to_default() {
        let config = EngineConfig::from_url("not a url");
        assert_eq!(config.endpoint, DEFAULT_ENGINE_URL);
    }

    #[test]
    fn test_missing_host_falls_back_to_default() {
        // `Url::parse` accepts "http://" relative forms only with a host
        let config = EngineConfig::from_url("http://");
        assert_eq!(config.endpoint, DEFAULT_ENGINE_URL);
    }
}
