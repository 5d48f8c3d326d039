//! A handle to a spawned task that is aborted when the last handle is dropped.

use std::sync::Arc;

use tokio::task::JoinHandle;

/// Owns a background task spawned on the Tokio runtime.
///
/// Cloning the handle shares ownership of the task. Once every clone has been
/// dropped the task is aborted, which cancels any subscriptions it holds.
#[derive(Debug, Clone)]
pub(crate) struct BackgroundTask {
    handle: Arc<AbortOnDrop>,
}

impl BackgroundTask {
    /// Spawn `future` as a new task.
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Arc::new(AbortOnDrop(tokio::spawn(future))),
        }
    }

    /// Whether the task has run to completion or been aborted.
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.0.is_finished()
    }
}

#[derive(Debug)]
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
