//! Fan-out executor
//!
//! Runs a fixed batch of independent calls concurrently and joins on all
//! of them, with first-failure propagation.

use crate::ports::completion_client::ServiceError;
use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a fan-out batch
#[derive(Error, Debug)]
pub enum FanOutError<E> {
    #[error("task {index} failed: {error}")]
    Task { index: usize, error: E },

    #[error("task {index} panicked or was aborted: {message}")]
    Panicked { index: usize, message: String },
}

impl From<FanOutError<ServiceError>> for ServiceError {
    fn from(error: FanOutError<ServiceError>) -> Self {
        match error {
            FanOutError::Task { error, .. } => error,
            FanOutError::Panicked { message, .. } => ServiceError::Aborted(message),
        }
    }
}

/// Executes a batch of tasks as one all-or-nothing unit.
///
/// - Every task is spawned immediately; there is no throttling.
/// - Results are returned in submission order, whatever order tasks finish in.
/// - The first failure is returned as soon as it is observed.
/// - Siblings still in flight are detached, not aborted; they run to
///   completion and their results are dropped. This also holds when the
///   batch future itself is dropped, so tasks are plain `JoinHandle`s
///   (dropping a `JoinSet` would abort them).
pub struct FanOutExecutor;

impl FanOutExecutor {
    /// Run `tasks` concurrently and collect their results in task order.
    pub async fn run_batch<T, E, F>(tasks: Vec<F>) -> Result<Vec<T>, FanOutError<E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        Self::run_batch_observed(tasks, |_, _| {}).await
    }

    /// Like [`run_batch`](Self::run_batch), calling `on_complete(index, success)`
    /// as each task resolves.
    pub async fn run_batch_observed<T, E, F, O>(
        tasks: Vec<F>,
        mut on_complete: O,
    ) -> Result<Vec<T>, FanOutError<E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        O: FnMut(usize, bool),
    {
        let total = tasks.len();
        let mut pending: FuturesUnordered<_> = tasks
            .into_iter()
            .enumerate()
            .map(|(index, task)| tokio::spawn(task).map(move |joined| (index, joined)))
            .collect();
        debug!("Fan-out of {} tasks issued", total);

        let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();

        while let Some((index, joined)) = pending.next().await {
            match joined {
                Ok(Ok(value)) => {
                    debug!("Task {} resolved", index);
                    on_complete(index, true);
                    slots[index] = Some(value);
                }
                Ok(Err(error)) => {
                    on_complete(index, false);
                    warn!(
                        "Task {} failed; detaching {} in-flight sibling(s)",
                        index,
                        pending.len()
                    );
                    return Err(FanOutError::Task { index, error });
                }
                Err(e) => {
                    on_complete(index, false);
                    warn!("Task {} join error: {}", index, e);
                    return Err(FanOutError::Panicked {
                        index,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
