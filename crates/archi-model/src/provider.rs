#![forbid(unsafe_code)]

//! Data providers backing the list model.
//!
//! A provider serves two kinds of items:
//!
//! - **permanent** items, fixed at construction, and
//! - **stored** items, replaced wholesale by [`DataProvider::merge`].
//!
//! # Invariants
//!
//! 1. `reload()` returns permanent items followed by stored items, then
//!    stable-sorted by title according to the current [`SortingOrder`].
//! 2. A stored item whose title equals a permanent title is dropped, both
//!    when loaded and when merged.
//! 3. `reload()` is cached until the sorting order changes or `merge()` runs.
//!
//! # Failure Modes
//!
//! | Failure | Provider | Behavior |
//! |---------|----------|----------|
//! | Backing file missing or blank | JSON | No stored items |
//! | Backing file not a JSON item list | JSON | No stored items (logged) |
//! | Backing file unreadable | JSON | `ModelError::Io` from `reload()` |
//! | Write failure | JSON | `ModelError::Io` from `flush()` |

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::item::{DataItem, SortingOrder};

/// Source of list items for the model layer.
pub trait DataProvider {
    fn sorting_order(&self) -> SortingOrder;

    /// Change the ordering; invalidates the cached structure if it differs.
    fn set_sorting_order(&mut self, order: SortingOrder);

    /// Current structure, loading stored items on first use.
    fn reload(&mut self) -> Result<Vec<DataItem>, ModelError>;

    /// Replace the stored items.
    fn merge(&mut self, items: Vec<DataItem>);

    /// Persist the stored items.
    fn flush(&mut self) -> Result<(), ModelError>;

    /// Build duplication candidates for `items`.
    fn duplicate(&self, items: &[DataItem]) -> Vec<DataItem> {
        items.iter().map(DataItem::duplicate).collect()
    }
}

/// Bookkeeping shared by the provider implementations.
#[derive(Debug, Clone, Default)]
struct ItemCatalog {
    permanent: Vec<DataItem>,
    permanent_titles: HashSet<String>,
    /// `None` until stored items were loaded or merged.
    stored: Option<Vec<DataItem>>,
    structure: Vec<DataItem>,
    sorting_order: SortingOrder,
    loaded: bool,
}

impl ItemCatalog {
    fn new(permanent: Vec<DataItem>) -> Self {
        let permanent_titles = permanent.iter().map(|item| item.title.clone()).collect();
        Self {
            permanent,
            permanent_titles,
            ..Self::default()
        }
    }

    fn set_sorting_order(&mut self, order: SortingOrder) {
        if self.sorting_order != order {
            self.sorting_order = order;
            self.loaded = false;
        }
    }

    fn set_stored(&mut self, items: Vec<DataItem>) {
        let stored = items
            .into_iter()
            .filter(|item| !self.permanent_titles.contains(&item.title))
            .collect();
        self.stored = Some(stored);
        self.loaded = false;
    }

    fn stored(&self) -> &[DataItem] {
        self.stored.as_deref().unwrap_or_default()
    }

    fn structure(&mut self) -> Vec<DataItem> {
        if !self.loaded {
            let mut structure = self.permanent.clone();
            structure.extend_from_slice(self.stored());
            self.sorting_order.sort(&mut structure);
            self.structure = structure;
            self.loaded = true;
        }
        self.structure.clone()
    }
}

// ---------------------------------------------------------------------------
// In-memory provider
// ---------------------------------------------------------------------------

/// Provider keeping stored items in memory only.
#[derive(Debug, Clone)]
pub struct MemoryDataProvider {
    catalog: ItemCatalog,
}

impl MemoryDataProvider {
    /// Create a provider with the given permanent items and no stored items.
    #[must_use]
    pub fn new(permanent: Vec<DataItem>) -> Self {
        Self::with_stored(permanent, Vec::new())
    }

    /// Create a provider with permanent and initial stored items.
    #[must_use]
    pub fn with_stored(permanent: Vec<DataItem>, stored: Vec<DataItem>) -> Self {
        let mut catalog = ItemCatalog::new(permanent);
        catalog.set_stored(stored);
        Self { catalog }
    }

    /// Stored items, unsorted.
    #[must_use]
    pub fn stored(&self) -> &[DataItem] {
        self.catalog.stored()
    }
}

impl DataProvider for MemoryDataProvider {
    fn sorting_order(&self) -> SortingOrder {
        self.catalog.sorting_order
    }

    fn set_sorting_order(&mut self, order: SortingOrder) {
        self.catalog.set_sorting_order(order);
    }

    fn reload(&mut self) -> Result<Vec<DataItem>, ModelError> {
        Ok(self.catalog.structure())
    }

    fn merge(&mut self, items: Vec<DataItem>) {
        self.catalog.set_stored(items);
    }

    fn flush(&mut self) -> Result<(), ModelError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file provider
// ---------------------------------------------------------------------------

/// Provider persisting stored items as a JSON array in a single file.
///
/// The file is read lazily on the first `reload()` and written only by
/// `flush()`.
#[derive(Debug, Clone)]
pub struct JsonFileDataProvider {
    path: PathBuf,
    catalog: ItemCatalog,
}

impl JsonFileDataProvider {
    /// Create a provider backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, permanent: Vec<DataItem>) -> Self {
        Self {
            path: path.into(),
            catalog: ItemCatalog::new(permanent),
        }
    }

    /// Create a provider backed by `<dir>/<identifier>.json`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>, identifier: &str, permanent: Vec<DataItem>) -> Self {
        Self::new(dir.as_ref().join(format!("{identifier}.json")), permanent)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_stored(&self) -> Result<Vec<DataItem>, ModelError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(ModelError::io(&self.path, err)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<DataItem>>(&bytes) {
            Ok(items) => Ok(items),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                warn!(path = %self.path.display(), error = %_err, "json provider: ignoring unreadable item list");
                Ok(Vec::new())
            }
        }
    }
}

impl DataProvider for JsonFileDataProvider {
    fn sorting_order(&self) -> SortingOrder {
        self.catalog.sorting_order
    }

    fn set_sorting_order(&mut self, order: SortingOrder) {
        self.catalog.set_sorting_order(order);
    }

    fn reload(&mut self) -> Result<Vec<DataItem>, ModelError> {
        if self.catalog.stored.is_none() {
            let stored = self.load_stored()?;

            #[cfg(feature = "tracing")]
            debug!(path = %self.path.display(), count = stored.len(), "json provider: loaded");

            self.catalog.set_stored(stored);
        }
        Ok(self.catalog.structure())
    }

    fn merge(&mut self, items: Vec<DataItem>) {
        self.catalog.set_stored(items);
    }

    fn flush(&mut self) -> Result<(), ModelError> {
        let json = serde_json::to_vec_pretty(self.catalog.stored())?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| ModelError::io(parent, err))?;
        }
        fs::write(&self.path, json).map_err(|err| ModelError::io(&self.path, err))?;

        #[cfg(feature = "tracing")]
        debug!(path = %self.path.display(), count = self.catalog.stored().len(), "json provider: flushed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn permanent() -> Vec<DataItem> {
        vec![
            DataItem::new("MVVM"),
            DataItem::new("MVC"),
            DataItem::new("VIPER"),
        ]
    }

    fn titles(items: &[DataItem]) -> Vec<String> {
        items.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn memory_reload_orders_by_sorting() {
        let mut provider =
            MemoryDataProvider::with_stored(permanent(), vec![DataItem::new("MVP")]);
        assert_eq!(
            titles(&provider.reload().unwrap()),
            vec!["MVVM", "MVC", "VIPER", "MVP"]
        );

        provider.set_sorting_order(SortingOrder::Ascending);
        assert_eq!(
            titles(&provider.reload().unwrap()),
            vec!["MVC", "MVP", "MVVM", "VIPER"]
        );

        provider.set_sorting_order(SortingOrder::Descending);
        assert_eq!(
            titles(&provider.reload().unwrap()),
            vec!["VIPER", "MVVM", "MVP", "MVC"]
        );
        assert_eq!(provider.sorting_order(), SortingOrder::Descending);
    }

    #[test]
    fn stored_items_colliding_with_permanent_are_dropped() {
        let mut provider = MemoryDataProvider::with_stored(
            permanent(),
            vec![DataItem::new("MVC").with_description("shadow"), DataItem::new("MVP")],
        );
        assert_eq!(titles(provider.stored()), vec!["MVP"]);

        provider.merge(vec![DataItem::new("VIPER"), DataItem::new("Redux")]);
        assert_eq!(titles(provider.stored()), vec!["Redux"]);
        assert_eq!(provider.reload().unwrap().len(), 4);
    }

    #[test]
    fn merge_replaces_stored_items() {
        let mut provider =
            MemoryDataProvider::with_stored(permanent(), vec![DataItem::new("MVP")]);
        provider.merge(vec![DataItem::new("Elm")]);
        assert_eq!(
            titles(&provider.reload().unwrap()),
            vec!["MVVM", "MVC", "VIPER", "Elm"]
        );
    }

    #[test]
    fn default_duplicate_builds_candidates() {
        let provider = MemoryDataProvider::new(permanent());
        let candidates = provider.duplicate(&[DataItem::new("MVC")]);
        assert_eq!(titles(&candidates), vec!["MVC (Duplicated)"]);
        assert!(candidates[0].is_duplicate());
    }

    #[test]
    fn json_missing_file_has_no_stored_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = JsonFileDataProvider::in_dir(dir.path(), "com.mvvm.data", permanent());
        assert_eq!(provider.path(), dir.path().join("com.mvvm.data.json"));
        assert_eq!(titles(&provider.reload().unwrap()), vec!["MVVM", "MVC", "VIPER"]);
    }

    #[test]
    fn json_blank_or_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        for contents in ["", "  \n", "{not json", r#"{"title":"x"}"#] {
            let path = dir.path().join("items.json");
            fs::write(&path, contents).unwrap();
            let mut provider = JsonFileDataProvider::new(&path, permanent());
            assert_eq!(provider.reload().unwrap().len(), 3, "contents: {contents:?}");
        }
    }

    #[test]
    fn json_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = JsonFileDataProvider::new(dir.path(), permanent());
        let err = provider.reload().unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn json_flush_round_trips_stored_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("items.json");

        let mut writer = JsonFileDataProvider::new(&path, permanent());
        writer.merge(vec![DataItem::new("MVC").duplicate(), DataItem::new("MVC")]);
        writer.flush().unwrap();

        let mut reader = JsonFileDataProvider::new(&path, permanent());
        let structure = reader.reload().unwrap();
        assert_eq!(
            titles(&structure),
            vec!["MVVM", "MVC", "VIPER", "MVC (Duplicated)"]
        );
        assert_eq!(structure[3].original_title.as_deref(), Some("MVC"));
    }

    #[test]
    fn json_flush_before_load_writes_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let mut provider = JsonFileDataProvider::new(&path, permanent());
        provider.flush().unwrap();

        let written: Vec<DataItem> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert!(written.is_empty());
    }
}
