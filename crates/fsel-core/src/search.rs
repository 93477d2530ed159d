//! Debounced switch-search controller.
//!
//! The controller turns a rapid stream of typed terms into at most one
//! request per quiet period and delivers only the newest term's result.
//!
//! ```text
//!            submit/refresh                timer fires            response
//!   Idle ───────────────────► Pending ───────────────► In-Flight ──────────► Idle
//!                              ▲   │ new term              │ new term
//!                              └───┴───────────────────────┘ (old generation goes stale)
//! ```
//!
//! All state lives in a single tokio task (the actor). Each issued request
//! runs in its own task tagged with a generation number. A superseding term
//! aborts that task; a response that still slips through with a generation
//! that is no longer current is dropped. At most one request is live at a
//! time, plus the aborted one until the runtime reaps it.
//!
//! Consecutive duplicate terms passed to [`SearchController::submit`] are
//! dropped before the debounce. [`SearchController::refresh`] skips that
//! check and always schedules a request.

use crate::error::QueryError;
use crate::filter;
use crate::service::{ErrorNotifier, QueryService};
use crate::types::{FilterCondition, ResourceKind, SelectOption};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Quiet period between the last accepted term and the request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Settings and outcomes
// ---------------------------------------------------------------------------

/// What a controller queries and how long it waits before querying.
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub resource: ResourceKind,
    /// Conditions applied to every request, before the free-text one.
    pub conditions: Vec<FilterCondition>,
    /// Field used for the free-text condition. `None` disables free text.
    pub search_field: Option<String>,
    pub debounce: Duration,
}

impl QuerySettings {
    pub fn new(resource: ResourceKind) -> Self {
        Self {
            resource,
            conditions: Vec::new(),
            search_field: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_conditions(mut self, conditions: Vec<FilterCondition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// One result per settled term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Loaded {
        term: String,
        options: Vec<SelectOption>,
    },
    /// The request failed. The notifier has already been called.
    Failed { term: String, error: QueryError },
}

impl SearchOutcome {
    pub fn term(&self) -> &str {
        match self {
            SearchOutcome::Loaded { term, .. } | SearchOutcome::Failed { term, .. } => term,
        }
    }
}

/// Stream of [`SearchOutcome`]s. Ends once the controller is disposed;
/// outcomes still queued at that point are discarded.
pub struct SearchResults {
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
    cancel: CancellationToken,
}

impl Stream for SearchResults {
    type Item = SearchOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.cancel.is_cancelled() {
            self.rx.close();
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

// ---------------------------------------------------------------------------
// Controller handle
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Input {
    Submit(String),
    Refresh(String),
}

/// Handle owned by the widget. Dropping it disposes the controller.
pub struct SearchController {
    input: Option<mpsc::UnboundedSender<Input>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SearchController {
    /// Start the controller task and prime it with an empty term so the
    /// baseline options load before any user input.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        settings: QuerySettings,
        service: Arc<dyn QueryService>,
        notifier: Arc<dyn ErrorNotifier>,
    ) -> (Self, SearchResults) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tracing::debug!(
            resource = %settings.resource,
            debounce_ms = settings.debounce.as_millis() as u64,
            "search controller starting"
        );

        let actor = Actor {
            settings,
            service,
            notifier,
            output: output_tx,
            generation: 0,
            last_accepted: None,
            pending: None,
            deadline: None,
            in_flight: None,
            in_flight_task: None,
        };
        let task = tokio::spawn(actor.run(input_rx, cancel.clone()));

        let controller = Self {
            input: Some(input_tx),
            cancel,
            task: Some(task),
        };
        controller.refresh("");
        let results = SearchResults {
            rx: output_rx,
            cancel: controller.cancel.clone(),
        };
        (controller, results)
    }

    /// Queue a typed term. Never blocks. A term equal to the previously
    /// accepted one is ignored.
    pub fn submit(&self, term: impl Into<String>) {
        self.send(Input::Submit(term.into()));
    }

    /// Queue a term even if it equals the previously accepted one.
    pub fn refresh(&self, term: impl Into<String>) {
        self.send(Input::Refresh(term.into()));
    }

    pub fn is_disposed(&self) -> bool {
        self.input.is_none()
    }

    /// Stop the controller: cancel the pending timer, abort the in-flight
    /// request, end the results stream and close the input channel. Safe to
    /// call twice.
    pub fn dispose(&mut self) {
        if self.input.take().is_none() {
            return;
        }
        self.cancel.cancel();
        // The actor exits on its own once it sees the cancellation.
        self.task.take();
        tracing::debug!("search controller disposed");
    }

    fn send(&self, input: Input) {
        if let Some(tx) = &self.input {
            if tx.send(input).is_err() {
                tracing::debug!("search controller task already stopped");
            }
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct Completed {
    generation: u64,
    term: String,
    result: Result<Vec<SelectOption>, QueryError>,
}

struct Actor {
    settings: QuerySettings,
    service: Arc<dyn QueryService>,
    notifier: Arc<dyn ErrorNotifier>,
    output: mpsc::UnboundedSender<SearchOutcome>,
    /// Generation of the most recently issued request.
    generation: u64,
    /// Last term that passed the duplicate check.
    last_accepted: Option<String>,
    /// Term waiting for the debounce timer.
    pending: Option<String>,
    deadline: Option<Instant>,
    /// Generation whose response will be delivered, if any.
    in_flight: Option<u64>,
    in_flight_task: Option<AbortHandle>,
}

impl Actor {
    async fn run(mut self, mut input: mpsc::UnboundedReceiver<Input>, cancel: CancellationToken) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completed>();

        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                msg = input.recv() => match msg {
                    Some(msg) => self.accept(msg),
                    None => break,
                },

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire(&done_tx);
                }

                Some(done) = done_rx.recv() => self.complete(done),
            }
        }

        self.abort_in_flight();
        tracing::debug!(generation = self.generation, "search controller stopped");
    }

    fn accept(&mut self, input: Input) {
        let term = match input {
            Input::Submit(term) => {
                if self.last_accepted.as_deref() == Some(term.as_str()) {
                    tracing::debug!(term = %term, "search: duplicate term dropped");
                    return;
                }
                term
            }
            Input::Refresh(term) => term,
        };

        if let Some(stale) = self.in_flight.take() {
            tracing::debug!(generation = stale, "search: in-flight query superseded");
        }
        self.abort_in_flight();
        if let Some(previous) = self.pending.as_deref() {
            tracing::debug!(previous = %previous, "search: pending term replaced");
        }

        tracing::debug!(term = %term, "search: pending");
        self.last_accepted = Some(term.clone());
        self.pending = Some(term);
        self.deadline = Some(Instant::now() + self.settings.debounce);
    }

    fn fire(&mut self, done_tx: &mpsc::UnboundedSender<Completed>) {
        self.deadline = None;
        let Some(term) = self.pending.take() else {
            return;
        };

        self.generation += 1;
        let generation = self.generation;
        self.in_flight = Some(generation);

        let expression = filter::build(
            &self.settings.conditions,
            &term,
            self.settings.search_field.as_deref(),
        );
        tracing::debug!(
            generation,
            term = %term,
            filters = %expression.to_query_param(),
            "search: request issued"
        );

        let service = Arc::clone(&self.service);
        let kind = self.settings.resource;
        let done_tx = done_tx.clone();
        let task = tokio::spawn(async move {
            let result = service.fetch(kind, &expression).await;
            // The actor may be gone; a closed channel means nobody is listening.
            let _ = done_tx.send(Completed {
                generation,
                term,
                result,
            });
        });
        self.in_flight_task = Some(task.abort_handle());
    }

    fn abort_in_flight(&mut self) {
        if let Some(task) = self.in_flight_task.take() {
            task.abort();
        }
    }

    fn complete(&mut self, done: Completed) {
        if self.in_flight != Some(done.generation) {
            tracing::debug!(
                generation = done.generation,
                term = %done.term,
                "search: stale response dropped"
            );
            return;
        }
        self.in_flight = None;
        self.in_flight_task = None;

        let outcome = match done.result {
            Ok(options) => {
                tracing::debug!(term = %done.term, count = options.len(), "search: loaded");
                SearchOutcome::Loaded {
                    term: done.term,
                    options,
                }
            }
            Err(error) => {
                tracing::warn!(term = %done.term, %error, "search: query failed");
                self.notifier.notify(&error);
                // Let the user retry the same term.
                self.last_accepted = None;
                SearchOutcome::Failed {
                    term: done.term,
                    error,
                }
            }
        };

        if self.output.send(outcome).is_err() {
            tracing::debug!("search: results receiver dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
