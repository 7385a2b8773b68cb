//! Explicit task submission for CPU-bound work.
//!
//! Decoding large schematics is plain CPU work. Rather than hiding it behind
//! a synchronous-looking call, callers hand it to an [`Executor`] of their
//! choosing and await the returned [`TaskHandle`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use blueprint_core::{Error, Result};
use futures_channel::oneshot;

/// A unit of work handed to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run jobs, now or later, on some thread.
pub trait Executor: Send + Sync {
    fn execute(&self, job: Job);
}

/// Runs jobs on the global rayon pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct RayonExecutor;

impl Executor for RayonExecutor {
    fn execute(&self, job: Job) {
        rayon::spawn(job);
    }
}

/// Runs jobs immediately on the submitting thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Completion of a submitted task.
///
/// Dropping the handle does not cancel the task; its result is discarded.
/// Resolves to [`Error::TaskAborted`] if the executor dropped the task before
/// it finished.
#[derive(Debug)]
#[must_use = "a task handle does nothing unless awaited"]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(Error::TaskAborted)))
    }
}

/// Submit `task` to `executor`.
pub fn spawn<E, F, T>(executor: &E, task: F) -> TaskHandle<T>
where
    E: Executor + ?Sized,
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    executor.execute(Box::new(move || {
        // The receiver may already be gone; nobody is waiting then.
        let _ = tx.send(task());
    }));
    TaskHandle { rx }
}
