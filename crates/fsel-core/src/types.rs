//! Core types shared by the builder, the controller and the coordinator.
//!
//! This module defines the remote [`SelectOption`], the [`FilterCondition`]
//! triple handed to the expression builder, the caller-owned [`FilterModel`]
//! and the raw [`SelectionInput`] a display emits when the user picks values.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Resource kind
// ---------------------------------------------------------------------------

/// Which remote collection a selector queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Users,
    #[serde(alias = "work-packages", alias = "work_items")]
    WorkPackages,
}

impl ResourceKind {
    /// Collection path segment below `/api/v3/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::WorkPackages => "work_packages",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" | "user" => Ok(ResourceKind::Users),
            "work_packages" | "work-packages" | "work_items" | "work-items" => {
                Ok(ResourceKind::WorkPackages)
            }
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Operators and conditions
// ---------------------------------------------------------------------------

/// Filter operator, carried on the wire as its API v3 symbol.
///
/// Operators the remote side knows but this crate does not are kept in
/// [`Operator::Other`] and encoded verbatim; the server decides validity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    /// Fuzzy free-text match used for the typed search term.
    Search,
    Any,
    None,
    GreaterOrEqual,
    LessOrEqual,
    Other(String),
}

impl Operator {
    pub fn symbol(&self) -> &str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!",
            Operator::Contains => "~",
            Operator::NotContains => "!~",
            Operator::Search => "**",
            Operator::Any => "*",
            Operator::None => "!*",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Other(raw) => raw,
        }
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        match raw {
            "=" => Operator::Equals,
            "!" => Operator::NotEquals,
            "~" => Operator::Contains,
            "!~" => Operator::NotContains,
            "**" => Operator::Search,
            "*" => Operator::Any,
            "!*" => Operator::None,
            ">=" => Operator::GreaterOrEqual,
            "<=" => Operator::LessOrEqual,
            other => Operator::Other(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        Operator::from(raw.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Condition values: a list of strings, or a single flag for boolean filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValues {
    Flag(bool),
    List(Vec<String>),
}

impl FilterValues {
    /// Values as they appear on the wire. Flags become `"t"` / `"f"`.
    pub fn wire_values(&self) -> Vec<String> {
        match self {
            FilterValues::Flag(true) => vec!["t".to_string()],
            FilterValues::Flag(false) => vec!["f".to_string()],
            FilterValues::List(values) => values.clone(),
        }
    }
}

impl From<Vec<String>> for FilterValues {
    fn from(values: Vec<String>) -> Self {
        FilterValues::List(values)
    }
}

impl From<bool> for FilterValues {
    fn from(flag: bool) -> Self {
        FilterValues::Flag(flag)
    }
}

/// One `(field, operator, values)` triple. Conditions are conjunctive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: Operator,
    pub values: FilterValues,
}

impl FilterCondition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<Operator>,
        values: impl Into<FilterValues>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            values: values.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Options and selections
// ---------------------------------------------------------------------------

/// A selectable remote entity (user or work package).
///
/// Options are fetched and displayed; they are never edited locally.
/// `href` is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub href: String,
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
}

impl SelectOption {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            id: None,
            label: label.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// What kind of values a filter stores. Fixed per filter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Resource,
    Scalar,
}

/// A single selected value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Resource(SelectOption),
    Scalar(String),
}

impl FilterValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FilterValue::Resource(_) => ValueKind::Resource,
            FilterValue::Scalar(_) => ValueKind::Scalar,
        }
    }

    /// Identity used for equality across fetches: the href of a resource,
    /// the string itself for a scalar.
    pub fn identity(&self) -> &str {
        match self {
            FilterValue::Resource(option) => &option.href,
            FilterValue::Scalar(raw) => raw,
        }
    }
}

impl From<SelectOption> for FilterValue {
    fn from(option: SelectOption) -> Self {
        FilterValue::Resource(option)
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        FilterValue::Scalar(raw.to_string())
    }
}

impl From<bool> for FilterValue {
    fn from(flag: bool) -> Self {
        FilterValue::Scalar(if flag { "t" } else { "f" }.to_string())
    }
}

/// Caller-owned filter whose `values` slot the coordinator writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterModel {
    pub name: String,
    pub value_kind: ValueKind,
    pub values: Vec<FilterValue>,
}

impl FilterModel {
    pub fn new(name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            value_kind,
            values: Vec::new(),
        }
    }
}

/// Raw selection as emitted by a display, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    /// Nothing selected.
    Empty,
    /// A bare value instead of a list.
    Single(FilterValue),
    Many(Vec<FilterValue>),
    /// Input the display could not express as a value or a list.
    Malformed,
}

impl From<Vec<FilterValue>> for SelectionInput {
    fn from(values: Vec<FilterValue>) -> Self {
        SelectionInput::Many(values)
    }
}

impl From<FilterValue> for SelectionInput {
    fn from(value: FilterValue) -> Self {
        SelectionInput::Single(value)
    }
}
