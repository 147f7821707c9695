//! Common types and utilities for the Render API

use serde::{Deserialize, Deserializer};

/// Render's list endpoints never return more than this per page
pub const PAGE_LIMIT: usize = 100;

/// Error body returned by Render, e.g. `{"id": "not_found", "message": "..."}`
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: id={id:?}, message={message:?}")]
pub struct ApiErrorDetails {
    pub id: Option<String>,
    pub message: Option<String>,
}

/// One element of a cursor-paginated list, e.g. `{"owner": {...}, "cursor": "abc"}`
pub trait CursorItem {
    type Item;

    fn into_parts(self) -> (Self::Item, String);
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Render sends `null` for unset nested objects and strings; read those as
/// the type's default so presence checks only ever see zero values.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
