//! # Debouncer
//!
//! Coalesces bursts of calls (keystrokes) into one deferred task. Each `call`
//! cancels the pending timer and starts a new one; the task runs only after
//! `delay` passes with no further calls.
//!
//! Cancellation only reaches the timer. Once the delay elapses the task is
//! detached and runs to completion, so a request that already went out is
//! never torn down mid-flight. Callers drop stale results themselves.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `task` to run after the delay, replacing any pending one.
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Drops the pending timer, if any. The task it guarded never runs.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for _ in 0..5 {
            debouncer.call(counting_task(&counter));
            settle(Duration::from_millis(100)).await;
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        settle(Duration::from_millis(300)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_call_wins() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::default();

        for query in ["b", "br", "bra"] {
            let seen = seen.clone();
            debouncer.call(async move {
                seen.lock().unwrap().push(query);
            });
            settle(Duration::from_millis(50)).await;
        }
        settle(DEFAULT_DEBOUNCE).await;

        assert_eq!(*seen.lock().unwrap(), vec!["bra"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.call(counting_task(&counter));
        settle(Duration::from_millis(400)).await;
        debouncer.call(counting_task(&counter));
        settle(Duration::from_millis(400)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.call(counting_task(&counter));
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        settle(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_task_survives_later_call() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        let slow = {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        };
        debouncer.call(slow);
        settle(Duration::from_millis(150)).await;

        // Timer already fired; the in-flight task must not be aborted.
        debouncer.cancel();
        settle(Duration::from_millis(1000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
