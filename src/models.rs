//! Data models for the upstream news search response.
//!
//! - [`NewsItem`]: one article as returned by the upstream API
//! - [`NewsResponse`]: one page of search results
//!
//! Field names follow the upstream JSON (`pubDate`, `totalResults`). The
//! proxy itself never deserializes into these types; it relays the raw JSON.
//! Only the page reads them, so deserialization is lenient: missing or null
//! fields fall back to defaults instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};

/// Card body text used when an item has neither description nor content.
pub const MISSING_DESCRIPTION: &str = "Sem descrição disponível";

/// A single news article from the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewsItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Publication timestamp as sent upstream, e.g. `2025-05-06 14:30:00`.
    #[serde(rename = "pubDate", default, deserialize_with = "null_as_empty")]
    pub pub_date: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_id: String,
}

impl NewsItem {
    /// Text shown in the card body: description, then content, then a fixed
    /// placeholder. Blank strings count as absent.
    pub fn summary(&self) -> &str {
        [self.description.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(MISSING_DESCRIPTION)
    }

    /// The image URL, if present and non-blank.
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// One page of upstream search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(rename = "totalResults", default, deserialize_with = "null_as_default")]
    pub total_results: u64,
    /// Upstream order is preserved. Missing or null means no results.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<NewsItem>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
