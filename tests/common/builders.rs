//! Test builders: ergonomic constructors for options, conditions and
//! controller settings.
//!
//! These are designed for readability in test assertions, not for
//! production use.

use fsel_core::{FilterCondition, Operator, QuerySettings, ResourceKind, SelectOption};
use std::time::Duration;

/// Debounce used by the harnesses. Matches the production default.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// A user option as the API would return it.
pub fn user(id: u32, name: &str) -> SelectOption {
    SelectOption::new(format!("/api/v3/users/{id}"), name).with_id(id.to_string())
}

/// A work package option as the API would return it.
pub fn work_package(id: u32, subject: &str) -> SelectOption {
    SelectOption::new(format!("/api/v3/work_packages/{id}"), subject).with_id(id.to_string())
}

/// Four users, deliberately out of display order.
pub fn roster() -> Vec<SelectOption> {
    vec![
        user(3, "carol"),
        user(1, "Ada Lovelace"),
        user(4, "Bob Builder"),
        user(2, "adam"),
    ]
}

/// `status = [value]`
pub fn status_is(value: &str) -> FilterCondition {
    FilterCondition::new("status", Operator::Equals, vec![value.to_string()])
}

/// User search with free text on `name` and the harness debounce.
pub fn user_settings() -> QuerySettings {
    QuerySettings::new(ResourceKind::Users)
        .with_search_field("name")
        .with_debounce(DEBOUNCE)
}

/// Labels of `options`, in order.
pub fn labels(options: &[SelectOption]) -> Vec<&str> {
    options.iter().map(|o| o.label.as_str()).collect()
}
