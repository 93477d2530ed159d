//! Filter expression builder.
//!
//! Turns the fixed [`FilterCondition`]s of a selector plus the typed search
//! term into a [`QueryExpression`]. The builder is a pure function: no I/O,
//! no shared state, the same inputs always give the same expression.
//!
//! # Wire form
//!
//! ```text
//! [{"status":{"operator":"=","values":["open"]}},{"name":{"operator":"**","values":["bob"]}}]
//! ```
//!
//! Condition order is preserved. It changes the encoded string but not the
//! meaning, since conditions are conjunctive.

use crate::types::{FilterCondition, Operator};
use serde_json::{json, Map, Value};

/// An immutable, ordered set of conditions sent with one query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryExpression {
    conditions: Vec<FilterCondition>,
}

impl QueryExpression {
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// JSON array of single-key objects, one per condition.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.conditions
                .iter()
                .map(|c| {
                    let mut entry = Map::new();
                    entry.insert(
                        c.field.clone(),
                        json!({
                            "operator": c.operator.symbol(),
                            "values": c.values.wire_values(),
                        }),
                    );
                    Value::Object(entry)
                })
                .collect(),
        )
    }

    /// Compact JSON string suitable for a `filters=` query parameter.
    pub fn to_query_param(&self) -> String {
        self.to_json().to_string()
    }
}

/// Build the expression for one search invocation.
///
/// The free-text condition (`search_field ** [search_term]`) is appended only
/// when both the term and the field name are non-empty. A missing field name
/// disables free-text search without error.
pub fn build(
    conditions: &[FilterCondition],
    search_term: &str,
    search_field: Option<&str>,
) -> QueryExpression {
    let mut out = conditions.to_vec();

    if !search_term.is_empty() {
        match search_field.filter(|f| !f.is_empty()) {
            Some(field) => out.push(FilterCondition::new(
                field,
                Operator::Search,
                vec![search_term.to_string()],
            )),
            None => {
                tracing::debug!(term = %search_term, "no search field configured, term ignored")
            }
        }
    }

    QueryExpression { conditions: out }
}
