//! Seams to the outside world: the remote query service and the error
//! notification sink.

use crate::error::QueryError;
use crate::filter::QueryExpression;
use crate::types::{ResourceKind, SelectOption};
use async_trait::async_trait;

/// Fetches options from a remote collection.
///
/// Implementations may fail with any [`QueryError`]; the search controller
/// treats every failure the same way.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn fetch(
        &self,
        kind: ResourceKind,
        expression: &QueryExpression,
    ) -> Result<Vec<SelectOption>, QueryError>;
}

/// Receives user-facing notifications for failed queries.
pub trait ErrorNotifier: Send + Sync {
    fn notify(&self, error: &QueryError);
}

impl<F> ErrorNotifier for F
where
    F: Fn(&QueryError) + Send + Sync,
{
    fn notify(&self, error: &QueryError) {
        self(error)
    }
}

/// Notifier that only logs. Used when the caller has no notification surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl ErrorNotifier for TracingNotifier {
    fn notify(&self, error: &QueryError) {
        tracing::warn!(%error, "option query failed");
    }
}
