use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

/// FIFO of pending work with a single-drainer guard.
///
/// Producers push at any time. Only one drain may run at a time; a second
/// caller gets `None` from [`WorkQueue::try_start_drain`] and should return.
#[derive(Debug)]
pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    draining: AtomicBool,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
        }
    }

    pub async fn push(&self, item: T) {
        self.items.lock().await.push_back(item);
    }

    pub async fn extend(&self, items: impl IntoIterator<Item = T>) {
        self.items.lock().await.extend(items);
    }

    pub async fn pop(&self) -> Option<T> {
        self.items.lock().await.pop_front()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Claims the drain. The claim is released when the guard drops.
    pub fn try_start_drain(&self) -> Option<DrainGuard<'_>> {
        self.draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard {
                draining: &self.draining,
            })
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct DrainGuard<'a> {
    draining: &'a AtomicBool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.draining.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Drained(usize),
    AlreadyDraining,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pops_in_insertion_order() {
        let queue = WorkQueue::new();
        queue.extend([3, 1, 2]).await;
        queue.push(7).await;

        let mut popped = vec![];
        while let Some(item) = queue.pop().await {
            popped.push(item);
        }

        assert_eq!(popped, vec![3, 1, 2, 7]);
        assert!(queue.is_empty().await);
    }

    #[test]
    fn allows_a_single_drain_at_a_time() {
        let queue = WorkQueue::<u64>::new();

        let guard = queue.try_start_drain();
        assert!(guard.is_some());
        assert!(queue.try_start_drain().is_none());

        drop(guard);
        assert!(!queue.is_draining());
        assert!(queue.try_start_drain().is_some());
    }
}
