//! Wish DTOs and the backend response envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A guest's wish as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub message: String,
    /// Attendance answer given with the wish, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Paging metadata for a wish list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(alias = "totalPages")]
    pub total_pages: u32,
}

/// One page of wishes. This is what the cache stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishPage {
    pub wishes: Vec<Wish>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Field-level validation message from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub msg: String,
    /// Anything else the backend attached (value, location, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: Some("field".to_string()),
            path: Some(path.into()),
            msg: msg.into(),
            extra: Map::new(),
        }
    }
}

/// Backend response envelope.
///
/// Success: `{ "success": true, "data": ... }`.
/// Failure: `{ "success": false, "error": "...", "errors": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}
