//! The stored unit of the catalog and its normalization rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Category used when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Opaque resource identifier, generated once and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn generate() -> ResourceId {
        ResourceId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId(value.to_string())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored link with its description.
///
/// `(id, category)` is the composite key of the durable table; `link` is
/// unique across the whole catalog regardless of category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub category: String,
    pub link: String,
    pub description: String,
}

impl Resource {
    /// Builds a resource with a fresh id, normalizing every field.
    pub fn new(category: &str, link: &str, description: &str) -> Resource {
        Resource {
            id: ResourceId::generate(),
            category: normalize_category(category),
            link: normalize_link(link),
            description: normalize_text(description),
        }
    }
}

/// Trimmed and lower-cased; blank falls back to [`DEFAULT_CATEGORY`].
pub fn normalize_category(category: &str) -> String {
    let category = normalize_text(category);
    if category.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }
    category
}

/// Links keep their case, only surrounding whitespace goes.
pub fn normalize_link(link: &str) -> String {
    link.trim().to_string()
}

pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
