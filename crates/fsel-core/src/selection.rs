//! Selection coordinator.
//!
//! Holds the sorted option list delivered by the search controller and
//! writes user selections into the caller-owned [`FilterModel`].

use crate::search::SearchOutcome;
use crate::types::{FilterModel, FilterValue, SelectOption, SelectionInput};
use std::cmp::Ordering;

/// Notified synchronously after the coordinator writes a filter model.
pub trait FilterListener: Send {
    fn filter_changed(&mut self, filter: &FilterModel);
}

impl<F> FilterListener for F
where
    F: FnMut(&FilterModel) + Send,
{
    fn filter_changed(&mut self, filter: &FilterModel) {
        self(filter)
    }
}

/// Display comparator: case-insensitive label, then href so equal labels
/// still have a fixed order.
pub fn compare_options(a: &SelectOption, b: &SelectOption) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.href.cmp(&b.href))
}

/// Stable sort by [`compare_options`].
pub fn sort_options(options: &mut [SelectOption]) {
    options.sort_by(compare_options);
}

/// Everything a display needs to draw the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView<'a> {
    pub available_options: &'a [SelectOption],
    pub selection: &'a [FilterValue],
    pub is_empty: bool,
}

pub struct SelectionCoordinator {
    available: Vec<SelectOption>,
    listener: Box<dyn FilterListener>,
}

impl SelectionCoordinator {
    pub fn new(listener: impl FilterListener + 'static) -> Self {
        Self {
            available: Vec::new(),
            listener: Box::new(listener),
        }
    }

    /// Apply one controller outcome. A loaded list replaces the current one
    /// (sorted once, here); a failure keeps the last good list.
    ///
    /// Returns `true` when the option list changed.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        match outcome {
            SearchOutcome::Loaded { term, mut options } => {
                sort_options(&mut options);
                tracing::debug!(term = %term, count = options.len(), "selection: options replaced");
                self.available = options;
                true
            }
            SearchOutcome::Failed { term, .. } => {
                tracing::debug!(term = %term, "selection: keeping previous options after failure");
                false
            }
        }
    }

    pub fn available_options(&self) -> &[SelectOption] {
        &self.available
    }

    /// Normalise `raw`, store it in `filter` and notify the listener.
    ///
    /// Single values become a one-element list, duplicates (by identity) are
    /// dropped keeping the first, and values of the wrong kind for this
    /// filter are discarded. Empty or malformed input clears the selection.
    pub fn set_selection(&mut self, filter: &mut FilterModel, raw: SelectionInput) {
        let values = match raw {
            SelectionInput::Empty => Vec::new(),
            SelectionInput::Malformed => {
                tracing::warn!(filter = %filter.name, "selection: malformed input treated as empty");
                Vec::new()
            }
            SelectionInput::Single(value) => vec![value],
            SelectionInput::Many(values) => values,
        };

        let mut normalised: Vec<FilterValue> = Vec::with_capacity(values.len());
        for value in values {
            if value.kind() != filter.value_kind {
                tracing::warn!(
                    filter = %filter.name,
                    expected = ?filter.value_kind,
                    value = %value.identity(),
                    "selection: value of wrong kind discarded"
                );
                continue;
            }
            if normalised.iter().any(|v| v.identity() == value.identity()) {
                continue;
            }
            normalised.push(value);
        }

        tracing::debug!(filter = %filter.name, count = normalised.len(), "selection: values set");
        filter.values = normalised;
        self.listener.filter_changed(filter);
    }

    /// True iff nothing is selected. Computed on every call.
    pub fn is_empty(&self, filter: &FilterModel) -> bool {
        filter.values.is_empty()
    }

    /// Whether `option` is part of the current selection, compared by href.
    pub fn is_selected(&self, filter: &FilterModel, option: &SelectOption) -> bool {
        filter.values.iter().any(|v| v.identity() == option.href)
    }

    pub fn view<'a>(&'a self, filter: &'a FilterModel) -> SelectionView<'a> {
        SelectionView {
            available_options: &self.available,
            selection: &filter.values,
            is_empty: self.is_empty(filter),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
