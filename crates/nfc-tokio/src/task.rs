use std::future::Future;

use tokio::task::JoinHandle;

/// Spawn onto the global runtime, `None` only if no runtime could be started
pub fn try_spawn<T>(task: T) -> Option<JoinHandle<T::Output>>
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    crate::handle().map(|handle| handle.spawn(task))
}
