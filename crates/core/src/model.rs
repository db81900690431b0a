//! Search payload types.
//!
//! The search endpoint returns loosely shaped JSON, so these types are
//! deliberately permissive: display fields are kept as raw JSON values and
//! nested objects with an unexpected shape are treated as absent instead of
//! failing the whole payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Error;

/// The three kinds of search the endpoint understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Web,
    News,
    Image,
}

impl SearchType {
    pub const ALL: [SearchType; 3] = [SearchType::Web, SearchType::News, SearchType::Image];

    /// Value sent as the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Web => "web",
            SearchType::News => "news",
            SearchType::Image => "image",
        }
    }

    /// Sidebar label, e.g. "Web Search".
    pub fn label(&self) -> &'static str {
        match self {
            SearchType::Web => "Web Search",
            SearchType::News => "News Search",
            SearchType::Image => "Image Search",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(SearchType::Web),
            "news" => Ok(SearchType::News),
            "image" | "images" => Ok(SearchType::Image),
            other => Err(Error::InvalidInput(format!("unknown search type: {other}"))),
        }
    }
}

/// Deserialize a value, treating anything of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`] for sequences: a malformed list is empty, malformed
/// entries are skipped.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Keep any value that is present, `null` included; only a missing key is
/// `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// String conversion of an arbitrary JSON value.
///
/// Strings are returned verbatim; everything else uses its JSON text, so
/// `null` becomes `"null"` and `3` becomes `"3"`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result thumbnail or infobox image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default, deserialize_with = "lenient")]
    pub src: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alt: Option<String>,
}

/// Source site metadata attached to news results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaUrl {
    #[serde(default, deserialize_with = "present")]
    pub hostname: Option<Value>,
}

/// One search result, whatever its type.
///
/// Which fields are meaningful depends on the active [`SearchType`]:
/// `meta_url` and `age` only for news, `source` only for images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default, deserialize_with = "lenient")]
    pub meta_url: Option<MetaUrl>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub source: Option<Value>,
}

impl ResultRecord {
    /// Title as plain text, used for image alt fallbacks.
    pub fn title_text(&self) -> Option<String> {
        self.title.as_ref().map(display_text)
    }
}

/// Entry of an infobox; only the first one is ever shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoboxEntry {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub images: Vec<Thumbnail>,
}

/// Knowledge panel attached to web search responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Infobox {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<InfoboxEntry>,
}

impl Infobox {
    pub fn first(&self) -> Option<&InfoboxEntry> {
        self.results.first()
    }
}

/// `{ "results": [...] }` container used for the web and news buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<ResultRecord>,
}

/// Raw response from the search endpoint.
///
/// Web responses carry `web` and `infobox`, news responses `news`, and image
/// responses a top-level `results` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub web: Option<Bucket>,
    #[serde(default, deserialize_with = "lenient")]
    pub news: Option<Bucket>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<ResultRecord>,
    #[serde(default, deserialize_with = "lenient")]
    pub infobox: Option<Infobox>,
}

impl SearchPayload {
    /// Decode a response body. Any JSON document is accepted; only a body that
    /// is not JSON at all fails.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| Error::DecodeFailure(e.to_string()))?;
        Ok(match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        })
    }

    /// Pick the result list (and infobox) matching `search_type`.
    ///
    /// The infobox is only ever kept for web searches.
    pub fn into_bucket(self, search_type: SearchType) -> (Vec<ResultRecord>, Option<Infobox>) {
        match search_type {
            SearchType::Web => (self.web.map(|b| b.results).unwrap_or_default(), self.infobox),
            SearchType::News => (self.news.map(|b| b.results).unwrap_or_default(), None),
            SearchType::Image => (self.results, None),
        }
    }
}
