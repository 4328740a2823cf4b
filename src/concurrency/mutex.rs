use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::{timeout, Duration};

use crate::core::config::MutexConfig;
use crate::core::error::{Error, Result};

struct Waiter {
    notify: oneshot::Sender<()>,
}

struct State {
    locked: bool,
    queue: VecDeque<Waiter>,
}

/// Async FIFO mutex serializing graph mutations (spec §4.15). Index
/// reads take a consistent snapshot without holding this lock at all.
pub struct GraphMutex {
    state: Arc<Mutex<State>>,
    config: MutexConfig,
}

/// Held while the caller has the lock; dropping it (or calling
/// `release()`) hands the lock to the head of the waiter queue.
pub struct MutexGuard {
    state: Arc<Mutex<State>>,
}

impl Drop for MutexGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        match state.queue.pop_front() {
            Some(waiter) => {
                // Lock stays held; handed directly to the next waiter.
                let _ = waiter.notify.send(());
            }
            None => state.locked = false,
        }
    }
}

impl GraphMutex {
    pub fn new(config: MutexConfig) -> Self {
        GraphMutex { state: Arc::new(Mutex::new(State { locked: false, queue: VecDeque::new() })), config }
    }

    /// Acquires the lock, queueing behind any current holder. Fails with
    /// `MutexQueueFull` if the bounded waiter queue is already at
    /// capacity, or `MutexTimeout` if `timeoutMs` elapses first (the
    /// waiter is then removed from the queue).
    pub async fn acquire(&self) -> Result<MutexGuard> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.state.lock();
            if !state.locked {
                state.locked = true;
                return Ok(MutexGuard { state: self.state.clone() });
            }
            if state.queue.len() >= self.config.max_queue_length {
                return Err(Error::mutex_queue_full(format!(
                    "waiter queue at capacity ({})",
                    self.config.max_queue_length
                )));
            }
            state.queue.push_back(Waiter { notify: tx });
        }

        if self.config.timeout_ms == 0 {
            rx.await.map_err(|_| Error::internal("mutex waiter channel closed"))?;
            return Ok(MutexGuard { state: self.state.clone() });
        }

        match timeout(Duration::from_millis(self.config.timeout_ms), rx).await {
            Ok(Ok(())) => Ok(MutexGuard { state: self.state.clone() }),
            Ok(Err(_)) => Err(Error::internal("mutex waiter channel closed")),
            Err(_) => {
                self.remove_self_from_queue();
                Err(Error::mutex_timeout(format!("acquire timed out after {}ms", self.config.timeout_ms)))
            }
        }
    }

    fn remove_self_from_queue(&self) {
        // The sender side was dropped along with `rx` in the timeout
        // branch; prune any waiters whose receiver is already gone.
        let mut state = self.state.lock();
        state.queue.retain(|w| !w.notify.is_closed());
    }

    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn single_owner_fifo_handoff() {
        let mutex = GraphMutex::new(MutexConfig { max_queue_length: 10, timeout_ms: 1000 });
        let guard = mutex.acquire().await.unwrap();
        assert!(mutex.is_locked());
        drop(guard);
        assert!(!mutex.is_locked());
    }

    #[tokio::test]
    async fn queue_full_rejects_new_waiters() {
        let mutex = GraphMutex::new(MutexConfig { max_queue_length: 0, timeout_ms: 1000 });
        let _guard = mutex.acquire().await.unwrap();
        let err = mutex.acquire().await.unwrap_err();
        assert!(err.is_kind(crate::core::error::ErrorKind::MutexQueueFull));
    }

    #[tokio::test]
    async fn timeout_releases_the_waiter_slot() {
        let mutex = GraphMutex::new(MutexConfig { max_queue_length: 1, timeout_ms: 20 });
        let guard = mutex.acquire().await.unwrap();
        let err = mutex.acquire().await.unwrap_err();
        assert!(err.is_kind(crate::core::error::ErrorKind::MutexTimeout));
        drop(guard);
        assert_eq!(mutex.queue_len(), 0);
    }
}
