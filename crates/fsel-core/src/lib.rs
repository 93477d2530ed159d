//! fsel-core: searchable multi-value filter selector.
//!
//! This crate holds everything except the transport: the filter expression
//! builder, the debounced switch-search controller, the selection coordinator
//! and the [`FilterSelector`] that ties them to one filter widget.
//!
//! # Flow
//!
//! ```text
//! typed term ──► SearchController ──► QueryService ──► SearchOutcome
//!                (debounce, dedup,     (remote)            │
//!                 switch-map)                              ▼
//! selection ◄── SelectionCoordinator ◄──────────── sort + replace
//!     │
//!     └──► FilterModel + FilterListener, then refresh("")
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod search;
pub mod selection;
pub mod selector;
pub mod service;
pub mod types;

pub use error::{ConfigError, QueryError};
pub use filter::{build, QueryExpression};
pub use search::{QuerySettings, SearchController, SearchOutcome, SearchResults, DEFAULT_DEBOUNCE};
pub use selection::{compare_options, sort_options, FilterListener, SelectionCoordinator, SelectionView};
pub use selector::FilterSelector;
pub use service::{ErrorNotifier, QueryService, TracingNotifier};
pub use types::{
    FilterCondition, FilterModel, FilterValue, FilterValues, Operator, ResourceKind, SelectOption,
    SelectionInput, ValueKind,
};
