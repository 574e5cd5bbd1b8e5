#![forbid(unsafe_code)]

//! List model publishing its structure through an [`ObservableValue`].
//!
//! The model caches what it loaded: `reload()` is a no-op until something
//! marks it stale (a sorting change, `clear()`, or `duplicate()`). Only
//! assignments to the structure notify observers, so a sorting change alone
//! is silent until the next reload.

use std::fmt;

use archi_reactive::ObservableValue;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::item::{DataItem, InfoItem, ItemData, ModelItem, SortingOrder};
use crate::provider::DataProvider;

/// The list model.
pub struct ListModel {
    structure: ObservableValue<Vec<ModelItem>>,
    provider: Box<dyn DataProvider>,
    config: ModelConfig,
    sorting_order: SortingOrder,
    loaded: bool,
}

impl fmt::Debug for ListModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListModel")
            .field("structure", &self.structure)
            .field("config", &self.config)
            .field("sorting_order", &self.sorting_order)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl ListModel {
    /// Create an empty, unloaded model over `provider`.
    #[must_use]
    pub fn new(mut provider: Box<dyn DataProvider>, config: ModelConfig) -> Self {
        provider.set_sorting_order(config.initial_sorting);
        Self {
            structure: ObservableValue::new(Vec::new()),
            provider,
            sorting_order: config.initial_sorting,
            config,
            loaded: false,
        }
    }

    /// The observable structure. Subscribe here to follow the model.
    #[must_use]
    pub fn structure(&self) -> &ObservableValue<Vec<ModelItem>> {
        &self.structure
    }

    /// Snapshot of the current structure.
    #[must_use]
    pub fn items(&self) -> Vec<ModelItem> {
        self.structure.get()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structure.with(Vec::is_empty)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn sorting_order(&self) -> SortingOrder {
        self.sorting_order
    }

    /// Change the ordering. Marks the model stale without notifying.
    pub fn set_sorting_order(&mut self, order: SortingOrder) {
        if self.sorting_order == order {
            return;
        }
        self.sorting_order = order;
        self.provider.set_sorting_order(order);
        self.loaded = false;
    }

    /// Load from the provider and publish, unless already loaded.
    ///
    /// On error the structure is left untouched and the model stays stale.
    pub fn reload(&mut self) -> Result<(), ModelError> {
        if self.loaded {
            return Ok(());
        }

        let items: Vec<ModelItem> = self
            .provider
            .reload()?
            .into_iter()
            .map(|item| self.model_item(item))
            .collect();

        #[cfg(feature = "tracing")]
        debug!(count = items.len(), order = ?self.sorting_order, "list model: reloaded");

        self.structure.set(items);
        self.loaded = true;
        Ok(())
    }

    /// Publish an empty structure, unless it already is empty.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.structure.set(Vec::new());
        self.loaded = false;
    }

    /// Duplication candidates for `items`.
    #[must_use]
    pub fn validate_for_duplication(&self, items: &[ModelItem]) -> Vec<DataItem> {
        if items.is_empty() {
            return Vec::new();
        }
        let sources: Vec<DataItem> = items.iter().map(|item| item.source().clone()).collect();
        self.provider.duplicate(&sources)
    }

    /// Store duplication candidates ahead of earlier duplicates.
    ///
    /// Candidates without an original title or an icon are skipped. The
    /// model is marked stale; the new items show up on the next reload.
    pub fn duplicate(&mut self, items: Vec<DataItem>) -> Result<(), ModelError> {
        self.loaded = false;

        let mut merged: Vec<DataItem> = items
            .into_iter()
            .filter(|item| item.is_duplicate() && item.icon_name.is_some())
            .collect();
        if merged.is_empty() {
            return Ok(());
        }

        let earlier: Vec<DataItem> = self
            .provider
            .reload()?
            .into_iter()
            .filter(DataItem::is_duplicate)
            .collect();

        #[cfg(feature = "tracing")]
        debug!(
            added = merged.len(),
            earlier = earlier.len(),
            "list model: merging duplicates"
        );

        merged.extend(earlier);
        self.provider.merge(merged);
        if self.config.auto_flush {
            self.provider.flush()?;
        }
        Ok(())
    }

    fn model_item(&self, item: DataItem) -> ModelItem {
        let icon = item
            .icon_name
            .as_deref()
            .or(item.original_title.as_deref())
            .unwrap_or(&item.title);
        ModelItem::Info(InfoItem {
            data: ItemData {
                icon_name: Some(format!("{}{icon}", self.config.icon_prefix)),
                title: item.title.clone(),
                description: item.description.clone(),
            },
            source: item,
        })
    }
}
