//! Flat menu item record.
//!
//! Represents navigational entries organized into named menus (e.g., "main",
//! "footer"). Each item belongs to a menu and may reference a parent item
//! for hierarchical structures. Retrieval and storage are owned by the
//! embedding application; this crate only consumes and produces these rows.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Menu item record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier (UUIDv7), stable and never reused.
    pub id: Uuid,

    /// Menu machine name (e.g., "main", "footer").
    pub menu: String,

    /// Display label.
    pub title: String,

    /// Optional internal path fragment, alternative to `url`.
    #[serde(default)]
    pub slug: Option<String>,

    /// Optional external or absolute target, alternative to `slug`.
    #[serde(default)]
    pub url: Option<String>,

    /// Optional icon identifier, opaque to this crate.
    #[serde(default)]
    pub icon: Option<String>,

    /// Sibling rank; not necessarily contiguous or unique on input.
    #[serde(default)]
    pub order: i32,

    /// Optional parent item within the same menu; `None` means top-level.
    #[serde(default)]
    pub parent_id: Option<Uuid>,

    /// Optional reference to a content page, opaque to this crate.
    #[serde(default)]
    pub page_id: Option<Uuid>,
}

impl MenuItem {
    /// Create a top-level item with the given menu, title, and rank.
    pub fn new(menu: impl Into<String>, title: impl Into<String>, order: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            menu: menu.into(),
            title: title.into(),
            slug: None,
            url: None,
            icon: None,
            order,
            parent_id: None,
            page_id: None,
        }
    }

    /// Parse menu item rows from a JSON array.
    ///
    /// Elements that fail to deserialize are logged and skipped rather than
    /// failing the whole batch; partial menus still render.
    pub fn parse_rows(json: &str) -> Vec<Self> {
        let rows: Vec<serde_json::Value> = match serde_json::from_str(json) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "failed to parse menu item rows");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<MenuItem>(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(error = %e, "skipping malformed menu item row");
                    None
                }
            })
            .collect()
    }
}
