use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// A task that will be cancelled (aborted) when dropped
#[derive(Debug)]
pub struct AbortableTask<T>(JoinHandle<T>);

impl<T> AbortableTask<T> {
    pub const fn new(handle: JoinHandle<T>) -> Self {
        Self(handle)
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl<T> AbortableTask<T>
where
    T: Send + 'static,
{
    /// Spawn on the global runtime, `None` when it has not been initialized
    pub fn try_spawn<F>(fut: F) -> Option<Self>
    where
        F: Future<Output = T> + Send + 'static,
    {
        crate::task::try_spawn(fut).map(Self)
    }

    /// Run `fut` after `delay`, unless dropped first
    pub fn try_spawn_after<F>(delay: Duration, fut: F) -> Option<Self>
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::try_spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await
        })
    }
}

impl<T> Drop for AbortableTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
