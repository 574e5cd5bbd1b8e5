#![forbid(unsafe_code)]

//! Model layer: list data, providers, and the MVVM view-model.
//!
//! # Role in archi
//! `archi-model` is the consumer of `archi-reactive`. It owns the item types
//! of each layer and shows how observable bindings are wired between them.
//!
//! # Primary responsibilities
//! - **DataProvider**: loads, merges and persists list items
//!   ([`MemoryDataProvider`], [`JsonFileDataProvider`]).
//! - **ListModel**: caches provider output and publishes it as an
//!   `ObservableValue<Vec<ModelItem>>`.
//! - **MvvmViewModel**: subscribes to the model and publishes visual items
//!   plus the currently available [`Actions`].
//!
//! # How it fits in the system
//! ```text
//! DataProvider ──reload()──▶ ListModel.structure ──notify──▶ MvvmViewModel
//!                                                             ├─ structure
//!                                                             └─ available_actions ──▶ view
//! ```
//! Everything runs synchronously on the caller's thread. Callers that need
//! background loading marshal results back before touching the model.

pub mod config;
pub mod error;
pub mod item;
pub mod model;
pub mod provider;
pub mod view_model;

pub use config::{ModelConfig, ViewModelConfig};
pub use error::ModelError;
pub use item::{Actions, DataItem, InfoItem, ItemData, ModelItem, SortingOrder, VisualItem};
pub use model::ListModel;
pub use provider::{DataProvider, JsonFileDataProvider, MemoryDataProvider};
pub use view_model::MvvmViewModel;
