// Fetch controller: lifecycle management for one logical GET request.
//
// Each controller owns one `RequestState` and publishes it through a watch
// channel. Adopting a new request identity (URL + options) cancels any
// in-flight attempt before starting the next one: the outstanding task is
// aborted and a monotonically increasing generation counter is bumped, so an
// attempt that already passed its network await still cannot commit. Only the
// newest attempt's result ever reaches the published state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::transport::{Body, RequestOptions, Transport};

// ---------------------------------------------------------------------------
// Request state
// ---------------------------------------------------------------------------

/// Published state of one fetch controller.
///
/// `data` holds the last committed payload; it survives reloads and errors
/// and is cleared only when the controller is sent back to idle.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState {
            data: None,
            loading: false,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request identity
// ---------------------------------------------------------------------------

/// Canonical identity of a logical request: the built URL plus a normalized
/// options fingerprint. Two fetches with equal keys are the same request and
/// must not be issued twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    url: String,
    options: String,
}

impl RequestKey {
    pub fn new(url: &str, options: &RequestOptions) -> Self {
        RequestKey {
            url: url.to_string(),
            options: options.fingerprint(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// ---------------------------------------------------------------------------
// FetchController
// ---------------------------------------------------------------------------

/// Stateful unit managing one logical GET-style request.
///
/// Created against a shared transport; the consumer drives it with
/// [`fetch`](FetchController::fetch) / [`refetch`](FetchController::refetch)
/// and observes state through [`subscribe`](FetchController::subscribe).
/// Dropping (or [`dispose`](FetchController::dispose)-ing) the controller
/// invalidates any outstanding attempt so no late response can write.
pub struct FetchController<T> {
    transport: Arc<dyn Transport>,
    state: Arc<watch::Sender<RequestState<T>>>,
    generation: Arc<AtomicU64>,
    current: Option<(RequestKey, RequestOptions)>,
    task: Option<JoinHandle<()>>,
}

impl<T> FetchController<T> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (tx, _rx) = watch::channel(RequestState::default());
        FetchController {
            transport,
            state: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            current: None,
            task: None,
        }
    }

    /// Subscribe to state updates. The receiver always observes the latest
    /// committed state.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState<T>
    where
        T: Clone,
    {
        self.state.borrow().clone()
    }

    /// The currently adopted request identity, if any.
    pub fn current_key(&self) -> Option<&RequestKey> {
        self.current.as_ref().map(|(key, _)| key)
    }

    /// Invalidate the outstanding attempt so it can never commit. Safe to
    /// call repeatedly; the consumer calls this on teardown.
    pub fn dispose(&mut self) {
        self.invalidate();
    }

    fn invalidate(&mut self) {
        // Bump the generation before aborting: an attempt already past its
        // network await fails the commit check even if the abort lands late.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.task.take() {
            handle.abort();
            debug!("cancelled in-flight request attempt");
        }
    }
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Adopt a request identity.
    ///
    /// `None` sends the controller idle and clears stale data. A URL whose
    /// key equals the currently adopted one is a no-op — exactly one network
    /// call is issued per distinct identity; use [`refetch`] to force a new
    /// attempt for the same identity.
    ///
    /// [`refetch`]: FetchController::refetch
    pub fn fetch(&mut self, url: Option<String>, options: RequestOptions) {
        match url {
            None => {
                self.invalidate();
                self.current = None;
                self.state.send_replace(RequestState::default());
            }
            Some(url) => {
                let key = RequestKey::new(&url, &options);
                if self.current.as_ref().is_some_and(|(current, _)| *current == key) {
                    return;
                }
                self.current = Some((key, options));
                self.start_attempt();
            }
        }
    }

    /// Force a new attempt against the currently held identity, with the
    /// same cancellation discipline as adopting a new URL. No-op when idle.
    pub fn refetch(&mut self) {
        if self.current.is_some() {
            self.start_attempt();
        }
    }

    fn start_attempt(&mut self) {
        self.invalidate();

        let Some((key, options)) = self.current.clone() else {
            return;
        };
        let attempt = self.generation.load(Ordering::SeqCst);

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        let generation = Arc::clone(&self.generation);
        let url = key.url().to_string();

        let handle = tokio::spawn(async move {
            let result = transport
                .get(&url, &options)
                .await
                .and_then(Body::decode::<T>);

            // Commit rule: only the attempt whose generation is still current
            // may write. Superseded attempts leave no trace.
            if generation.load(Ordering::SeqCst) != attempt {
                debug!(attempt, "discarding result of superseded attempt");
                return;
            }

            match result {
                Ok(data) => {
                    state.send_modify(|s| {
                        s.data = Some(data);
                        s.loading = false;
                        s.error = None;
                    });
                }
                Err(err) => {
                    warn!(%url, "request failed: {err}");
                    state.send_modify(|s| {
                        s.error = Some(err.message());
                        s.loading = false;
                    });
                }
            }
        });

        self.task = Some(handle);
    }
}

impl<T> Drop for FetchController<T> {
    fn drop(&mut self) {
        self.invalidate();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
