use crate::{CrudError, Result};
use std::{future::Future, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline of a single engine call.
///
/// Cloning shares the token: cancelling any clone cancels them all.
#[derive(Default, Debug, Clone)]
pub struct ExecContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ExecContext {
    /// Never cancelled unless [`cancel`](Self::cancel) is called, no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Keep the earliest of the current deadline and `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Use a child of `token`, cancelling the parent cancels this context too.
    pub fn with_token(mut self, token: &CancellationToken) -> Self {
        self.token = token.child_token();
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fail if the context is already cancelled or expired.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(CrudError::Cancelled.into());
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(CrudError::DeadlineExceeded.into());
        }
        Ok(())
    }

    /// Drive `future` to completion unless the context fires first, in which case it is dropped.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CrudError::Cancelled.into()),
            _ = deadline => Err(CrudError::DeadlineExceeded.into()),
            result = future => result,
        }
    }
}
