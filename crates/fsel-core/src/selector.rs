//! The searchable multi-value filter selector.
//!
//! [`FilterSelector`] owns one [`SearchController`] and one
//! [`SelectionCoordinator`] for the lifetime of a filter widget. A display
//! forwards typed terms and selection changes here, pulls updates with
//! [`FilterSelector::next_update`] and draws [`FilterSelector::view`].

use crate::search::{QuerySettings, SearchController, SearchOutcome, SearchResults};
use crate::selection::{FilterListener, SelectionCoordinator, SelectionView};
use crate::service::{ErrorNotifier, QueryService};
use crate::types::{FilterModel, SelectOption, SelectionInput};
use futures::StreamExt;
use std::sync::Arc;

pub struct FilterSelector {
    controller: SearchController,
    results: SearchResults,
    coordinator: SelectionCoordinator,
}

impl FilterSelector {
    /// Spawn the controller (which immediately requests the baseline list).
    pub fn new(
        settings: QuerySettings,
        service: Arc<dyn QueryService>,
        notifier: Arc<dyn ErrorNotifier>,
        listener: impl FilterListener + 'static,
    ) -> Self {
        let (controller, results) = SearchController::spawn(settings, service, notifier);
        Self {
            controller,
            results,
            coordinator: SelectionCoordinator::new(listener),
        }
    }

    pub fn on_search_term_typed(&self, term: impl Into<String>) {
        self.controller.submit(term);
    }

    /// Store the new selection, notify the listener and reload the full
    /// candidate list.
    pub fn on_selection_changed(&mut self, filter: &mut FilterModel, raw: SelectionInput) {
        self.coordinator.set_selection(filter, raw);
        self.controller.refresh("");
    }

    /// Wait for the next settled result and apply it. Returns `None` once
    /// the selector has been disposed.
    pub async fn next_update(&mut self) -> Option<SearchOutcome> {
        let outcome = self.results.next().await?;
        self.coordinator.apply(outcome.clone());
        Some(outcome)
    }

    pub fn available_options(&self) -> &[SelectOption] {
        self.coordinator.available_options()
    }

    pub fn is_empty(&self, filter: &FilterModel) -> bool {
        self.coordinator.is_empty(filter)
    }

    pub fn is_selected(&self, filter: &FilterModel, option: &SelectOption) -> bool {
        self.coordinator.is_selected(filter, option)
    }

    pub fn view<'a>(&'a self, filter: &'a FilterModel) -> SelectionView<'a> {
        self.coordinator.view(filter)
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.controller.is_disposed()
    }
}
