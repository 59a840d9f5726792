//! A remote resource that tracks the result of the most recently observed request.
//!
//! Observing a new [`RequestSpec`] resets the state to loading and cancels any
//! request still in flight for the previous spec. A cancelled request never
//! touches the state again, neither with its value nor with an error.

use crate::core::fetch::{self, FetchState, RequestSpec};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

struct Observation {
    spec: RequestSpec,
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct RemoteResource<T> {
    client: reqwest::Client,
    state: Arc<watch::Sender<FetchState<T>>>,
    // Bumped on every cancellation; a task may only commit while it holds the latest value.
    generation: Arc<AtomicU64>,
    active: Option<Observation>,
}

impl<T> RemoteResource<T> {
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    pub fn current_spec(&self) -> Option<&RequestSpec> {
        self.active.as_ref().map(|obs| &obs.spec)
    }

    pub fn is_in_flight(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|obs| !obs.handle.is_finished())
    }

    /// Cancels the in-flight request, if any. The state is left as it is.
    pub fn cancel(&mut self) {
        if let Some(obs) = self.active.take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            if obs.cancel.send(()).is_ok() {
                debug!(url = %obs.spec.url, "Cancelled in-flight request");
            }
        }
    }
}

impl<T> RemoteResource<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(client: reqwest::Client) -> Self {
        let (state, _) = watch::channel(FetchState::Loading);
        Self {
            client,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Starts a fetch cycle for `spec` unless it equals the spec already observed.
    ///
    /// Returns `true` when a new request was issued.
    pub fn observe(&mut self, spec: RequestSpec) -> bool {
        if self.current_spec() == Some(&spec) {
            debug!(url = %spec.url, "Spec unchanged, keeping current request");
            return false;
        }

        self.cancel();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(FetchState::Loading);
        debug!(url = %spec.url, generation, "Starting fetch cycle");

        let (cancel, cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(run_fetch(
            self.client.clone(),
            spec.clone(),
            generation,
            Arc::clone(&self.generation),
            Arc::clone(&self.state),
            cancel_rx,
        ));

        self.active = Some(Observation {
            spec,
            cancel,
            handle,
        });
        true
    }

    /// Waits until the current cycle succeeds or fails.
    ///
    /// Returns the current state right away when nothing is in flight.
    pub async fn settled(&self) -> FetchState<T> {
        if self.active.is_none() {
            return self.state();
        }
        let mut rx = self.state.subscribe();
        match rx.wait_for(FetchState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl<T> Drop for RemoteResource<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_fetch<T>(
    client: reqwest::Client,
    spec: RequestSpec,
    generation: u64,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<FetchState<T>>>,
    cancel_rx: oneshot::Receiver<()>,
) where
    T: DeserializeOwned + Send + Sync,
{
    let result = tokio::select! {
        biased;
        _ = cancel_rx => {
            debug!(url = %spec.url, generation, "Request superseded");
            return;
        }
        result = fetch::execute::<T>(&client, &spec) => result,
    };

    let next = match result {
        Ok(value) => FetchState::Success(value),
        Err(err) => {
            warn!(url = %spec.url, error = %err, "Fetch failed");
            FetchState::Failure(err)
        }
    };

    let committed = state.send_if_modified(move |current| {
        if latest.load(Ordering::SeqCst) != generation {
            return false;
        }
        *current = next;
        true
    });

    if !committed {
        debug!(url = %spec.url, generation, "Discarded stale response");
    }
}
