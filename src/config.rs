//! Immutable upstream configuration, built once from the CLI at startup.

use crate::cli::ServeArgs;
use crate::error::ConfigError;
use url::Url;

/// Everything the proxy needs to reach the upstream news API.
///
/// Built once in `main` and shared read-only for the lifetime of the process.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub api_key: String,
    pub language: String,
    pub default_query: String,
}

impl UpstreamConfig {
    pub fn from_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let base_url = Url::parse(&args.base_url).map_err(|source| ConfigError::InvalidUrl {
            url: args.base_url.clone(),
            source,
        })?;

        Ok(Self {
            base_url,
            api_key,
            language: args.language.clone(),
            default_query: args.default_query.clone(),
        })
    }
}

// The key must never end up in logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("language", &self.language)
            .field("default_query", &self.default_query)
            .finish()
    }
}
