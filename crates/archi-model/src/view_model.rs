#![forbid(unsafe_code)]

//! MVVM view-model bound to a [`ListModel`].
//!
//! The view-model subscribes to the model's structure and republishes it as
//! visual items behind a scheme header, together with the set of actions the
//! view should offer. Both outputs are [`ObservableValue`]s updated
//! synchronously from the model's notification.

use archi_reactive::{ObservableValue, Subscription};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::config::ViewModelConfig;
use crate::error::ModelError;
use crate::item::{Actions, ModelItem, SortingOrder, VisualItem};
use crate::model::ListModel;

/// View-model over a [`ListModel`].
#[derive(Debug)]
pub struct MvvmViewModel {
    // Declared first so it detaches while the model is still alive.
    model_subscription: Subscription,
    model: ListModel,
    structure: ObservableValue<Vec<VisualItem>>,
    available_actions: ObservableValue<Actions>,
}

fn visual_structure(header: &[VisualItem], items: &[ModelItem]) -> Vec<VisualItem> {
    header
        .iter()
        .cloned()
        .chain(items.iter().map(ModelItem::to_visual_item))
        .collect()
}

fn actions_for(structure: &[VisualItem], header_len: usize) -> Actions {
    if structure.len() == header_len {
        Actions::RELOAD
    } else {
        Actions::ALL
    }
}

impl MvvmViewModel {
    /// Bind a view-model to `model`.
    #[must_use]
    pub fn new(model: ListModel, config: ViewModelConfig) -> Self {
        let header = vec![VisualItem::scheme(config.scheme_identifier)];
        let initial = model
            .structure()
            .with(|items| visual_structure(&header, items));
        let available_actions = ObservableValue::new(actions_for(&initial, header.len()));
        let structure = ObservableValue::new(initial);

        let model_subscription = {
            let structure = structure.clone();
            let available_actions = available_actions.clone();
            model.structure().subscribe(move |items| {
                let visual = visual_structure(&header, items);
                let actions = actions_for(&visual, header.len());

                #[cfg(feature = "tracing")]
                trace!(rows = visual.len(), actions = ?actions, "view-model: structure changed");

                structure.set(visual);
                available_actions.set(actions);
            })
        };

        Self {
            model_subscription,
            model,
            structure,
            available_actions,
        }
    }

    /// Header followed by one details row per model item.
    #[must_use]
    pub fn structure(&self) -> &ObservableValue<Vec<VisualItem>> {
        &self.structure
    }

    #[must_use]
    pub fn available_actions(&self) -> &ObservableValue<Actions> {
        &self.available_actions
    }

    /// Snapshot of the current visual structure.
    #[must_use]
    pub fn items(&self) -> Vec<VisualItem> {
        self.structure.get()
    }

    #[must_use]
    pub fn model(&self) -> &ListModel {
        &self.model
    }

    /// Mutable access for operations the view-model does not wrap, such as
    /// duplication.
    pub fn model_mut(&mut self) -> &mut ListModel {
        &mut self.model
    }

    #[must_use]
    pub fn sorting_order(&self) -> SortingOrder {
        self.model.sorting_order()
    }

    /// Change the ordering; reloads right away if the list has content.
    pub fn set_sorting_order(&mut self, order: SortingOrder) -> Result<(), ModelError> {
        self.model.set_sorting_order(order);
        if self.model.is_empty() {
            return Ok(());
        }
        self.model.reload()
    }

    pub fn reload_data(&mut self) -> Result<(), ModelError> {
        self.model.reload()
    }

    pub fn clear_data(&mut self) {
        self.model.clear();
    }

    /// Whether the model subscription is still attached.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.model_subscription.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::item::DataItem;
    use crate::provider::MemoryDataProvider;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn model() -> ListModel {
        ListModel::new(
            Box::new(MemoryDataProvider::new(vec![
                DataItem::new("MVVM"),
                DataItem::new("MVC"),
                DataItem::new("MVP"),
            ])),
            ModelConfig::default(),
        )
    }

    fn view_model() -> MvvmViewModel {
        MvvmViewModel::new(model(), ViewModelConfig::default())
    }

    #[test]
    fn starts_with_header_only() {
        let vm = view_model();
        assert_eq!(
            vm.items(),
            vec![VisualItem::scheme("Schemes/mvvm-scheme")]
        );
        assert_eq!(vm.available_actions().get(), Actions::RELOAD);
        assert!(vm.is_bound());
    }

    #[test]
    fn reload_and_clear_drive_structure_and_actions() {
        let mut vm = view_model();
        let calls = Rc::new(Cell::new(0usize));
        let last_len = Rc::new(Cell::new(0usize));
        let (calls_clone, len_clone) = (Rc::clone(&calls), Rc::clone(&last_len));
        let sub = vm.structure().subscribe(move |items| {
            calls_clone.set(calls_clone.get() + 1);
            len_clone.set(items.len());
        });

        vm.set_sorting_order(SortingOrder::None).unwrap();
        assert_eq!(calls.get(), 0);
        let empty_len = vm.items().len();

        vm.reload_data().unwrap();
        assert_eq!(calls.get(), 1);
        assert!(last_len.get() > empty_len);
        assert_eq!(vm.available_actions().get(), Actions::ALL);

        vm.clear_data();
        assert_eq!(calls.get(), 2);
        assert_eq!(last_len.get(), empty_len);
        assert_eq!(vm.available_actions().get(), Actions::RELOAD);

        assert!(vm.structure().is_in_use());
        sub.cancel();
        assert!(!vm.structure().is_in_use());
    }

    #[test]
    fn sorting_reloads_only_with_content() {
        let mut vm = view_model();
        vm.set_sorting_order(SortingOrder::Ascending).unwrap();
        assert_eq!(vm.items().len(), 1);
        assert_eq!(vm.sorting_order(), SortingOrder::Ascending);

        vm.reload_data().unwrap();
        vm.set_sorting_order(SortingOrder::Descending).unwrap();
        let titles: Vec<String> = vm
            .items()
            .iter()
            .filter_map(|item| match item {
                VisualItem::Details { title, .. } => Some(title.clone()),
                VisualItem::Scheme { .. } => None,
            })
            .collect();
        assert_eq!(titles, vec!["MVVM", "MVP", "MVC"]);
    }

    #[test]
    fn details_rows_mirror_model_items() {
        let mut vm = view_model();
        vm.reload_data().unwrap();
        let described: Vec<String> = vm.items().iter().map(VisualItem::describe).collect();
        assert_eq!(
            described,
            vec![
                "SchemeItem - Schemes/mvvm-scheme".to_string(),
                "DetailsItem - MVVM - nil - Emblems/MVVM".to_string(),
                "DetailsItem - MVC - nil - Emblems/MVC".to_string(),
                "DetailsItem - MVP - nil - Emblems/MVP".to_string(),
            ]
        );
    }

    #[test]
    fn dropping_view_model_releases_model_subscription() {
        let model = model();
        let model_structure = model.structure().clone();
        let vm = MvvmViewModel::new(model, ViewModelConfig::default());
        assert!(model_structure.is_in_use());

        drop(vm);
        assert!(!model_structure.is_in_use());
    }

    #[test]
    fn custom_scheme_header() {
        let vm = MvvmViewModel::new(
            model(),
            ViewModelConfig::default().with_scheme_identifier("Schemes/plain-scheme"),
        );
        assert_eq!(vm.items(), vec![VisualItem::scheme("Schemes/plain-scheme")]);
    }
}
