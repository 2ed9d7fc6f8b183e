//! Runs the long-lived service tasks and shuts them all down together.

use std::future::Future;

use anyhow::{Error, Result};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

type TaskOutcome = (&'static str, Result<()>);

pub struct Supervisor {
    shutdown: CancellationToken,
    tasks: JoinSet<TaskOutcome>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Token that stops every child when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn<F, Fut>(&mut self, name: &'static str, factory: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let shutdown = self.shutdown.child_token();
        tracing::debug!(task = name, "starting task");
        self.tasks.spawn(async move { (name, factory(shutdown).await) });
    }

    /// Wait for every task. Ctrl-c or the first failing task cancels the rest;
    /// the first error is returned.
    pub async fn run(mut self) -> Result<()> {
        let mut first_err: Option<Error> = None;

        while !self.tasks.is_empty() {
            tokio::select! {
                Some(outcome) = self.tasks.join_next() => {
                    self.handle_task_outcome(&mut first_err, outcome);
                }
                _ = tokio::signal::ctrl_c(), if !self.shutdown.is_cancelled() => {
                    tracing::info!("ctrl-c received, shutting down");
                    self.shutdown.cancel();
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn handle_task_outcome(
        &self,
        first_err: &mut Option<Error>,
        outcome: std::result::Result<TaskOutcome, JoinError>,
    ) {
        let err = match outcome {
            Ok((name, Ok(()))) => {
                tracing::info!(task = name, "task exited gracefully");
                return;
            }
            Ok((name, Err(err))) => {
                tracing::error!(task = name, "task exited with error: {err:#}");
                err
            }
            Err(join_err) => {
                tracing::error!("task panicked: {join_err:?}");
                join_err.into()
            }
        };

        if first_err.is_none() {
            *first_err = Some(err);
        }
        if !self.shutdown.is_cancelled() {
            tracing::warn!("supervisor shutting down remaining tasks");
            self.shutdown.cancel();
        }
    }
}
