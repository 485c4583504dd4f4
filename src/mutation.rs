// Mutation controller: lifecycle management for one logical write operation.
//
// Wraps a single async write (create/update/delete), publishes
// `{data, loading, error}` through a watch channel, and both stores and
// re-raises failures so callers can branch on the outcome (keep a dialog
// open, show a toast) without re-deriving the message.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tracing::warn;

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Mutation state
// ---------------------------------------------------------------------------

/// Published state of one mutation controller.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for MutationState<T> {
    fn default() -> Self {
        MutationState {
            data: None,
            loading: false,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Callback and operation types
// ---------------------------------------------------------------------------

type MutationFn<V, T> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;
type SuccessCallback<V, T> = Arc<dyn Fn(T, V) -> BoxFuture<'static, ()> + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(ApiError) -> BoxFuture<'static, ()> + Send + Sync>;

// ---------------------------------------------------------------------------
// MutationController
// ---------------------------------------------------------------------------

/// Stateful unit wrapping a single asynchronous write operation.
///
/// Overlapping [`mutate`](MutationController::mutate) calls are not
/// deduplicated: each runs independently and the published state reflects
/// whichever call updated it last (last write wins). Callers that need
/// stricter ordering serialize their own calls.
pub struct MutationController<V, T> {
    op: MutationFn<V, T>,
    state: watch::Sender<MutationState<T>>,
    on_success: Option<SuccessCallback<V, T>>,
    on_error: Option<ErrorCallback>,
}

impl<V, T> MutationController<V, T>
where
    V: Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Wrap an async write operation.
    pub fn new<F, Fut>(op: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, _rx) = watch::channel(MutationState::default());
        MutationController {
            op: Arc::new(move |vars| Box::pin(op(vars))),
            state: tx,
            on_success: None,
            on_error: None,
        }
    }

    /// Register a success callback, awaited before `mutate` resolves.
    pub fn on_success<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(T, V) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.on_success = Some(Arc::new(move |result, vars| Box::pin(callback(result, vars))));
        self
    }

    /// Register an error callback, invoked before the error is re-raised.
    pub fn on_error<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(ApiError) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.on_error = Some(Arc::new(move |err| Box::pin(callback(err))));
        self
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<MutationState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> MutationState<T> {
        self.state.borrow().clone()
    }

    /// Run the wrapped operation.
    ///
    /// Sets `loading` and clears `error` up front. On success the result is
    /// stored, the success callback (if any) is awaited, and the result is
    /// returned. On failure the resolved message is stored, the error
    /// callback (if any) is awaited, and the error is re-raised. `loading`
    /// is cleared on both paths before this future settles.
    pub async fn mutate(&self, variables: V) -> Result<T, ApiError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match (self.op)(variables.clone()).await {
            Ok(result) => {
                self.state.send_modify(|s| {
                    s.data = Some(result.clone());
                    s.loading = false;
                });
                if let Some(callback) = &self.on_success {
                    callback(result.clone(), variables).await;
                }
                Ok(result)
            }
            Err(err) => {
                warn!("mutation failed: {err}");
                self.state.send_modify(|s| {
                    s.error = Some(err.message());
                    s.loading = false;
                });
                if let Some(callback) = &self.on_error {
                    callback(err.clone()).await;
                }
                Err(err)
            }
        }
    }

    /// Clear `data`, `error`, and `loading` without side effects.
    pub fn reset(&self) {
        self.state.send_replace(MutationState::default());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
