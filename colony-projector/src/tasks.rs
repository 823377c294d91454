use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Handle to the background loops of a running ingester.
#[derive(Clone, Debug, Default)]
pub struct IngesterTask {
    subtasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl IngesterTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_subtask(&self, subtask: JoinHandle<()>) {
        self.subtasks.lock().await.push(subtask);
    }

    pub async fn len(&self) -> usize {
        self.subtasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subtasks.lock().await.is_empty()
    }

    pub async fn stop(&self) {
        for subtask in self.subtasks.lock().await.iter() {
            subtask.abort();
        }
    }

    pub async fn is_stopped(&self) -> bool {
        self.subtasks.lock().await.iter().all(|subtask| subtask.is_finished())
    }
}
