use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Task did not complete: {0}")]
    Join(#[from] JoinError),
}

/// A set of tasks that succeed or fail together.
///
/// Tasks run concurrently on the runtime. `wait` collects their outputs in
/// completion order; the first failure (or the group deadline elapsing)
/// aborts every task still in flight and is returned to the caller. The
/// aborted tasks are drained before `wait` returns, so nothing they own
/// outlives the group.
pub struct TaskGroup<T, E> {
    tasks: JoinSet<Result<T, E>>,
    deadline: Option<(Instant, Duration)>,
}

impl<T, E> TaskGroup<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create a group without a deadline.
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            deadline: None,
        }
    }

    /// Create a group whose tasks must all finish within `timeout` from now.
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            tasks: JoinSet::new(),
            deadline: Some((Instant::now() + timeout, timeout)),
        }
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task, returning their outputs or the first error.
    pub async fn wait(mut self) -> Result<Vec<T>, E>
    where
        E: From<GroupError>,
    {
        let mut outputs = Vec::with_capacity(self.tasks.len());

        let outcome: Result<Vec<T>, E> = loop {
            let next = match self.deadline {
                Some((deadline, timeout)) => {
                    match tokio::time::timeout_at(deadline, self.tasks.join_next()).await {
                        Ok(next) => next,
                        Err(_) => break Err(GroupError::DeadlineExceeded(timeout).into()),
                    }
                }
                None => self.tasks.join_next().await,
            };

            match next {
                None => break Ok(outputs),
                Some(Ok(Ok(output))) => outputs.push(output),
                Some(Ok(Err(e))) => break Err(e),
                Some(Err(e)) => break Err(GroupError::from(e).into()),
            }
        };

        if outcome.is_err() {
            self.tasks.shutdown().await;
        }

        outcome
    }
}
