#![forbid(unsafe_code)]

//! Item types for each layer.
//!
//! - [`DataItem`]: what providers load, merge and persist.
//! - [`ModelItem`]: what the list model publishes.
//! - [`VisualItem`]: what the view-model publishes.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Appended to the original title of a duplicated item.
pub const DUPLICATE_SUFFIX: &str = " (Duplicated)";

/// Icon shown for details rows whose item carries no icon.
pub const DEFAULT_DETAILS_ICON: &str = "graduationcap.fill";

/// A single persisted list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Title of the item this one duplicates; `None` for originals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
}

impl DataItem {
    /// Create an item with only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            icon_name: None,
            title: title.into(),
            description: None,
            original_title: None,
        }
    }

    #[must_use]
    pub fn with_icon_name(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this item was produced by [`duplicate`](Self::duplicate).
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.original_title.is_some()
    }

    /// Build a duplication candidate of this item.
    ///
    /// The copy is titled `"<original> (Duplicated)"` and keeps an icon,
    /// falling back to the original title. Duplicating a duplicate refers
    /// back to the same original.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let original = self
            .original_title
            .clone()
            .unwrap_or_else(|| self.title.clone());
        Self {
            icon_name: Some(self.icon_name.clone().unwrap_or_else(|| original.clone())),
            title: format!("{original}{DUPLICATE_SUFFIX}"),
            description: self.description.clone(),
            original_title: Some(original),
        }
    }

    /// Parse a JSON array of items.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Title ordering applied by data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingOrder {
    /// Provider order: permanent items first, then stored items.
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortingOrder {
    /// Every ordering, in cycling order.
    pub const ALL: [Self; 3] = [Self::None, Self::Ascending, Self::Descending];

    /// Stable-sort `items` by title.
    pub fn sort(self, items: &mut [DataItem]) {
        match self {
            Self::None => {}
            Self::Ascending => items.sort_by(|a, b| a.title.cmp(&b.title)),
            Self::Descending => items.sort_by(|a, b| b.title.cmp(&a.title)),
        }
    }
}

/// Display-ready fields of a model item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemData {
    pub icon_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
}

/// An informational entry together with the data item it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoItem {
    pub data: ItemData,
    pub(crate) source: DataItem,
}

/// An entry of the list model's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelItem {
    Info(InfoItem),
}

impl ModelItem {
    #[must_use]
    pub fn data(&self) -> &ItemData {
        match self {
            Self::Info(info) => &info.data,
        }
    }

    /// The provider item this entry was built from.
    #[must_use]
    pub fn source(&self) -> &DataItem {
        match self {
            Self::Info(info) => &info.source,
        }
    }

    /// One-line summary, `"title - icon - description"`.
    #[must_use]
    pub fn describe(&self) -> String {
        let data = self.data();
        format!(
            "{} - {} - {}",
            data.title,
            data.icon_name.as_deref().unwrap_or("nil"),
            data.description.as_deref().unwrap_or("nil")
        )
    }

    #[must_use]
    pub fn to_visual_item(&self) -> VisualItem {
        let data = self.data();
        VisualItem::Details {
            icon: data
                .icon_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DETAILS_ICON.to_string()),
            title: data.title.clone(),
            description: data.description.clone(),
        }
    }
}

/// An entry of the view-model's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualItem {
    /// Header picture describing the architecture on screen.
    Scheme { identifier: String },
    /// One list row.
    Details {
        icon: String,
        title: String,
        description: Option<String>,
    },
}

impl VisualItem {
    #[must_use]
    pub fn scheme(identifier: impl Into<String>) -> Self {
        Self::Scheme {
            identifier: identifier.into(),
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Scheme { identifier } => format!("SchemeItem - {identifier}"),
            Self::Details {
                icon,
                title,
                description,
            } => format!(
                "DetailsItem - {title} - {} - {icon}",
                description.as_deref().unwrap_or("nil")
            ),
        }
    }
}

bitflags::bitflags! {
    /// User actions the view currently offers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u8 {
        const CLEAR                = 1 << 0;
        const RELOAD               = 1 << 1;
        const CHANGE_SORTING_ORDER = 1 << 2;
    }
}

impl Actions {
    /// Actions offered while the list has content.
    pub const ALL: Self = Self::CLEAR
        .union(Self::RELOAD)
        .union(Self::CHANGE_SORTING_ORDER);
}
