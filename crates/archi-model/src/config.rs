#![forbid(unsafe_code)]

//! Configuration for the list model and the view-model.

use crate::item::SortingOrder;

/// Prefix prepended to icon names when items enter the model.
pub const DEFAULT_ICON_PREFIX: &str = "Emblems/";

/// Header scheme shown above the MVVM list.
pub const DEFAULT_SCHEME_IDENTIFIER: &str = "Schemes/mvvm-scheme";

/// Configuration for [`ListModel`](crate::ListModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Prepended to every item icon name.
    pub icon_prefix: String,
    /// Flush the provider after merging duplicates.
    pub auto_flush: bool,
    /// Ordering applied before the first reload.
    pub initial_sorting: SortingOrder,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            icon_prefix: DEFAULT_ICON_PREFIX.to_string(),
            auto_flush: true,
            initial_sorting: SortingOrder::None,
        }
    }
}

impl ModelConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the icon prefix.
    #[must_use]
    pub fn with_icon_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.icon_prefix = prefix.into();
        self
    }

    /// Set whether duplicates are flushed immediately.
    #[must_use]
    pub fn with_auto_flush(mut self, enabled: bool) -> Self {
        self.auto_flush = enabled;
        self
    }

    /// Set the ordering used before the first reload.
    #[must_use]
    pub fn with_initial_sorting(mut self, order: SortingOrder) -> Self {
        self.initial_sorting = order;
        self
    }
}

/// Configuration for [`MvvmViewModel`](crate::MvvmViewModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModelConfig {
    /// Identifier of the header scheme item.
    pub scheme_identifier: String,
}

impl Default for ViewModelConfig {
    fn default() -> Self {
        Self {
            scheme_identifier: DEFAULT_SCHEME_IDENTIFIER.to_string(),
        }
    }
}

impl ViewModelConfig {
    #[must_use]
    pub fn with_scheme_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.scheme_identifier = identifier.into();
        self
    }
}
