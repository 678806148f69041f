//! Request DTOs for the wish relay API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::{Deserialize, Serialize};

use crate::cache::{build_key, normalize_venue, KeyOptions};
use crate::models::FieldError;

/// Largest page size a client may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 10;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 500;

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page() -> u32 {
    1
}

/// Query string for `GET /wishes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishQuery {
    /// Optional venue filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

impl Default for WishQuery {
    fn default() -> Self {
        Self {
            venue: None,
            limit: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl WishQuery {
    /// Returns the query with its venue in canonical form, so the cache
    /// key and the upstream request describe the same thing.
    pub fn normalized(self) -> Self {
        Self {
            venue: self.venue.as_deref().and_then(normalize_venue),
            ..self
        }
    }

    /// Validates paging bounds.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Some(format!("limit must be between 1 and {}", MAX_PAGE_SIZE));
        }
        if self.page == 0 {
            return Some("page must be 1 or greater".to_string());
        }
        None
    }

    pub fn key_options(&self) -> KeyOptions<'_> {
        KeyOptions {
            venue: self.venue.as_deref(),
            limit: self.limit,
            page: self.page,
        }
    }

    /// Cache key for this query.
    pub fn cache_key(&self) -> String {
        build_key(&self.key_options())
    }
}

/// Body for `POST /wishes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWish {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl NewWish {
    /// Returns one entry per invalid field; empty when valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        } else if name.chars().count() > MAX_NAME_CHARS {
            errors.push(FieldError::new(
                "name",
                format!("Name must be at most {} characters", MAX_NAME_CHARS),
            ));
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        } else if message.chars().count() > MAX_MESSAGE_CHARS {
            errors.push(FieldError::new(
                "message",
                format!("Message must be at most {} characters", MAX_MESSAGE_CHARS),
            ));
        }

        errors
    }
}

/// Query string for `DELETE /cache`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearCacheQuery {
    #[serde(default)]
    pub prefix: Option<String>,
}
