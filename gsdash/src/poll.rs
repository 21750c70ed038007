//! Periodic list polling.
//!
//! A [`Subscription`] owns one background task that fetches a list on a
//! fixed interval with the latest committed filter. Every result is tagged
//! with the subscription's generation so the receiver can tell responses
//! of a superseded screen apart from current ones. Dropping the
//! subscription cancels the task, including a fetch already in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, Backend};
use crate::view::ListSource;

/// Shortest period a poller runs at; shorter requests are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Builds the outgoing event from a generation and a fetch result.
pub type Wrap<F, E> = fn(u64, Result<<F as ListSource>::Listing, ApiError>) -> E;

/// Handle to a running poller.
pub struct Subscription<F: ListSource> {
    generation: u64,
    cancel: CancellationToken,
    query_tx: watch::Sender<F>,
}

impl<F: ListSource> Subscription<F> {
    /// Start polling with `query`. The first fetch happens immediately,
    /// then once per `every`. Results are sent to `events` through `wrap`.
    pub fn spawn<B: Backend, E: Send + 'static>(
        backend: Arc<B>,
        query: F,
        every: Duration,
        generation: u64,
        events: mpsc::Sender<E>,
        wrap: Wrap<F, E>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let (query_tx, query_rx) = watch::channel(query);
        tokio::spawn(run(
            backend,
            query_rx,
            every,
            generation,
            cancel.clone(),
            events,
            wrap,
        ));
        tracing::debug!(list = F::NAME, generation, "poller started");
        Self {
            generation,
            cancel,
            query_tx,
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The filter the next fetch will use.
    pub fn query(&self) -> F {
        self.query_tx.borrow().clone()
    }

    /// Replace the filter and fetch right away.
    pub fn set_query(&self, query: F) {
        self.query_tx.send_replace(query);
    }

    /// Fetch right away with the current filter.
    pub fn refresh(&self) {
        self.query_tx.send_modify(|_| {});
    }

}

impl<F: ListSource> Drop for Subscription<F> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<F: ListSource, B: Backend, E: Send + 'static>(
    backend: Arc<B>,
    mut query_rx: watch::Receiver<F>,
    every: Duration,
    generation: u64,
    cancel: CancellationToken,
    events: mpsc::Sender<E>,
    wrap: Wrap<F, E>,
) {
    let mut ticker = tokio::time::interval(every.max(MIN_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            changed = query_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                // Restart the period from this fetch.
                ticker.reset();
            }
            _ = ticker.tick() => {}
        }

        let query = query_rx.borrow_and_update().clone();
        let result = tokio::select! {
            () = cancel.cancelled() => break,
            result = F::fetch(backend.as_ref(), &query) => result,
        };
        if events.send(wrap(generation, result)).await.is_err() {
            break;
        }
    }

    tracing::debug!(list = F::NAME, generation, "poller stopped");
}
