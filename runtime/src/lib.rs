//! # DebrisFlow Runtime
//!
//! The [`Store`] owns aggregate state, runs a reducer for every action sent
//! to it, and executes the effects the reducer returns. Actions produced by
//! effects are fed back into the store, closing the unidirectional loop:
//!
//! ```text
//! send(action) → reduce → state' + effects → execute → send(action') → …
//! ```
//!
//! Each user interaction is an independent, non-overlapping operation; the
//! store serializes reductions behind a single `RwLock` and spawns effect
//! futures fire-and-forget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use debrisflow_core::effect::Effect;
use debrisflow_core::reducer::Reducer;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Runtime driving a reducer and its effects.
///
/// # Type Parameters
///
/// - `S`: state type
/// - `A`: action type
/// - `E`: environment type
/// - `R`: reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(TicketState::new(), TicketReducer::new(), env);
///
/// store.send(TicketAction::OpenTicket { id, project_id, truck_id, .. }).await?;
/// let open = store.state(|s| s.count()).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Send an action through the reducer and execute resulting effects
    ///
    /// The reduction itself happens under the state write lock; effects are
    /// spawned after the lock is released. Actions produced by effects are
    /// sent back into the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(StoreError::ShutdownInProgress);
        }

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        for effect in effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    /// Read state through a closure
    ///
    /// # Example
    ///
    /// ```ignore
    /// let open_tickets = store.state(|s| s.count_open()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Stop accepting actions and wait for in-flight effects to finish
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the timeout elapses.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.shutdown.store(true, Ordering::SeqCst);

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let pending = self.pending_effects.load(Ordering::SeqCst);
            if pending == 0 {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(StoreError::ShutdownTimeout(pending));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Execute a single effect, spawning a task where the effect is async
    fn execute_effect(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {
                tracing::trace!("executing Effect::None (no-op)");
            },
            Effect::Future(fut) => {
                tracing::trace!("executing Effect::Future");
                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = PendingGuard(Arc::clone(&store.pending_effects));

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action, sending to store");
                        if let Err(err) = store.send(action).await {
                            tracing::warn!("dropping effect action: {err}");
                        }
                    }
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
        }
    }
}

/// Decrements the pending-effect counter when a spawned effect finishes,
/// including on panic.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use debrisflow_core::SmallVec;
    use debrisflow_core::smallvec;

    #[derive(Clone, Debug, Default)]
    struct CounterState {
        count: i64,
        pings: u32,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Increment,
        IncrementLater(Duration),
        PingViaFuture,
        Ping,
    }

    #[derive(Clone)]
    struct CounterEnv;

    #[derive(Clone)]
    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = CounterEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    SmallVec::new()
                },
                CounterAction::IncrementLater(duration) => {
                    smallvec![Effect::future(async move {
                        tokio::time::sleep(duration).await;
                        Some(CounterAction::Increment)
                    })]
                },
                CounterAction::PingViaFuture => {
                    smallvec![Effect::future(async { Some(CounterAction::Ping) })]
                },
                CounterAction::Ping => {
                    state.pings += 1;
                    SmallVec::new()
                },
            }
        }
    }

    fn store() -> Store<CounterState, CounterAction, CounterEnv, CounterReducer> {
        Store::new(CounterState::default(), CounterReducer, CounterEnv)
    }

    #[tokio::test]
    async fn send_applies_action() {
        let store = store();
        store.send(CounterAction::Increment).await.unwrap();
        store.send(CounterAction::Increment).await.unwrap();
        assert_eq!(store.state(|s| s.count).await, 2);
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = store();
        store.send(CounterAction::PingViaFuture).await.unwrap();

        // The effect runs on a spawned task; wait for it to settle.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.pings).await, 1);
    }

    #[tokio::test]
    async fn slow_effect_dispatches_after_its_await() {
        let store = store();
        store
            .send(CounterAction::IncrementLater(Duration::from_millis(20)))
            .await
            .unwrap();

        assert_eq!(store.state(|s| s.count).await, 0);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = store();
        store.shutdown(Duration::from_millis(100)).await.unwrap();

        let err = store.send(CounterAction::Increment).await.unwrap_err();
        assert!(matches!(err, StoreError::ShutdownInProgress));
    }

    #[tokio::test]
    async fn shutdown_waits_for_pending_effects() {
        let store = store();
        store
            .send(CounterAction::IncrementLater(Duration::from_millis(30)))
            .await
            .unwrap();

        // The produced action is dropped because the store is shutting down,
        // but shutdown itself must wait for the effect task to finish.
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert_eq!(store.state(|s| s.count).await, 0);
    }
}
