//! In-process [`QueryService`] with scripted latency and failures.
//!
//! Every call is recorded before any delay, so `terms()` reflects the order
//! in which the controller *issued* requests, not the order they finished.
//! Works with `tokio::time::pause()`: delays are `tokio::time::sleep`.
//!
//! `live()` / `peak_live()` count calls currently inside `fetch`; an aborted
//! call leaves that count when its future is dropped. `finished()` counts
//! calls that ran to the end.

use async_trait::async_trait;
use fsel_core::{
    ErrorNotifier, FilterValues, Operator, QueryError, QueryExpression, QueryService,
    ResourceKind, SelectOption,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// The free-text term carried by `expression`, or `""` for a baseline query.
pub fn search_term(expression: &QueryExpression) -> String {
    expression
        .conditions()
        .iter()
        .find(|c| c.operator == Operator::Search)
        .and_then(|c| match &c.values {
            FilterValues::List(values) => values.first().cloned(),
            FilterValues::Flag(_) => None,
        })
        .unwrap_or_default()
}

pub struct ScriptedQueryService {
    roster: Vec<SelectOption>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, QueryError>,
    calls: Mutex<Vec<(ResourceKind, QueryExpression)>>,
    live: AtomicUsize,
    peak_live: AtomicUsize,
    finished: AtomicUsize,
}

/// Decrements the live count however the call ends.
struct LiveGuard<'a>(&'a AtomicUsize);

impl Drop for LiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedQueryService {
    /// Answers every query with the roster entries whose label contains the
    /// term (case-insensitive), immediately.
    pub fn new(roster: Vec<SelectOption>) -> Self {
        Self {
            roster,
            delays: HashMap::new(),
            failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            live: AtomicUsize::new(0),
            peak_live: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    /// Answer `term` only after `delay`.
    pub fn delay(mut self, term: &str, delay: Duration) -> Self {
        self.delays.insert(term.to_string(), delay);
        self
    }

    /// Fail every query for `term` with `error`.
    pub fn fail(mut self, term: &str, error: QueryError) -> Self {
        self.failures.insert(term.to_string(), error);
        self
    }

    /// Terms of all issued requests, in issue order.
    pub fn terms(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, expr)| search_term(expr))
            .collect()
    }

    pub fn expressions(&self) -> Vec<QueryExpression> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, expr)| expr.clone())
            .collect()
    }

    pub fn kinds(&self) -> Vec<ResourceKind> {
        self.calls.lock().unwrap().iter().map(|(kind, _)| *kind).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls currently inside `fetch`.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest `live()` seen so far.
    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    /// Calls that returned, successfully or not.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryService for ScriptedQueryService {
    async fn fetch(
        &self,
        kind: ResourceKind,
        expression: &QueryExpression,
    ) -> Result<Vec<SelectOption>, QueryError> {
        self.calls.lock().unwrap().push((kind, expression.clone()));
        let now_live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_live.fetch_max(now_live, Ordering::SeqCst);
        let _guard = LiveGuard(&self.live);
        let term = search_term(expression);

        if let Some(delay) = self.delays.get(&term) {
            tokio::time::sleep(*delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.get(&term) {
            return Err(error.clone());
        }

        let needle = term.to_lowercase();
        Ok(self
            .roster
            .iter()
            .filter(|o| o.label.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

/// Notifier that keeps every error it is given.
#[derive(Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<QueryError>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<QueryError> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorNotifier for RecordingNotifier {
    fn notify(&self, error: &QueryError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}
