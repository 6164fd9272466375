//! Trailing-edge debounce with cancellation.
//!
//! A burst of [`Debounced::call`]s collapses into a single invocation with the
//! latest argument, made once `delay` has passed without another call. Each new
//! call cancels the previous one, whether it is still waiting on its timer or
//! already running. [`Debounced::shutdown`] cancels everything and refuses
//! further calls; it also runs on drop.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

pub struct Debounced<F> {
    delay: Duration,
    func: Arc<F>,
    pending: Option<Pending>,
    shutdown: CancellationToken,
}

struct Pending {
    cancel: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl<F> Debounced<F> {
    pub fn new(delay: Duration, func: F) -> Self {
        Self {
            delay,
            func: Arc::new(func),
            pending: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True while a call is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| {
            !p.cancel.is_cancelled() && !p.fired.load(Ordering::Acquire)
        })
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Drop the latest call, including its invocation if it is already running.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
    }

    /// Cancel all outstanding work. Later calls are ignored.
    pub fn shutdown(&mut self) {
        self.cancel();
        self.shutdown.cancel();
    }

    /// Schedule `func(arg)` to run after the quiet period, replacing any earlier call.
    ///
    /// Must be called from within a Tokio runtime. Returns `false` after shutdown.
    pub fn call<T, Fut>(&mut self, arg: T) -> bool
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
        T: Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            return false;
        }
        self.cancel();

        let cancel = self.shutdown.child_token();
        let fired = Arc::new(AtomicBool::new(false));
        self.pending = Some(Pending {
            cancel: cancel.clone(),
            fired: Arc::clone(&fired),
        });

        let func = Arc::clone(&self.func);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = sleep(delay) => {}
            }
            fired.store(true, Ordering::Release);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = (*func)(arg) => {}
            }
        });
        true
    }
}

impl<F> Drop for Debounced<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::pin::Pin;
    use tokio::time::Instant;

    type Log = Arc<Mutex<Vec<(String, Duration)>>>;
    type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

    /// Records each invocation's argument and start time, then works for `work`.
    fn recorder(
        log: Log,
        start: Instant,
        work: Duration,
    ) -> impl Fn(String) -> BoxFuture + Send + Sync + 'static {
        move |word: String| -> BoxFuture {
            let log = Arc::clone(&log);
            Box::pin(async move {
                let started = start.elapsed();
                sleep(work).await;
                log.lock().push((word, started));
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_latest() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut debounced =
            Debounced::new(Duration::from_millis(300), recorder(Arc::clone(&log), start, Duration::ZERO));

        debounced.call("a".to_string());
        sleep(Duration::from_millis(100)).await;
        debounced.call("ab".to_string());
        sleep(Duration::from_millis(50)).await;
        debounced.call("abc".to_string());
        assert!(debounced.is_pending());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(
            *log.lock(),
            vec![("abc".to_string(), Duration::from_millis(450))]
        );
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_periods_fire_separately() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut debounced =
            Debounced::new(Duration::from_millis(300), recorder(Arc::clone(&log), start, Duration::ZERO));

        debounced.call("first".to_string());
        sleep(Duration::from_millis(500)).await;
        debounced.call("second".to_string());
        sleep(Duration::from_millis(500)).await;

        assert_eq!(
            *log.lock(),
            vec![
                ("first".to_string(), Duration::from_millis(300)),
                ("second".to_string(), Duration::from_millis(800)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut debounced =
            Debounced::new(Duration::from_millis(300), recorder(Arc::clone(&log), start, Duration::ZERO));

        debounced.call("gone".to_string());
        sleep(Duration::from_millis(200)).await;
        debounced.cancel();
        assert!(!debounced.is_pending());
        sleep(Duration::from_secs(1)).await;
        assert!(log.lock().is_empty());

        assert!(debounced.call("kept".to_string()));
        sleep(Duration::from_secs(1)).await;
        assert_eq!(log.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_call_cancels_running_invocation() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut debounced = Debounced::new(
            Duration::from_millis(300),
            recorder(Arc::clone(&log), start, Duration::from_secs(2)),
        );

        debounced.call("slow".to_string());
        sleep(Duration::from_millis(400)).await;
        debounced.call("fresh".to_string());
        sleep(Duration::from_secs(5)).await;

        assert_eq!(
            *log.lock(),
            vec![("fresh".to_string(), Duration::from_millis(700))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_refuses_further_calls() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut debounced =
            Debounced::new(Duration::from_millis(300), recorder(Arc::clone(&log), start, Duration::ZERO));

        debounced.call("pending".to_string());
        debounced.shutdown();
        assert!(debounced.is_shut_down());
        assert!(!debounced.call("late".to_string()));
        sleep(Duration::from_secs(1)).await;
        assert!(log.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_call() {
        let log: Log = Arc::default();
        let start = Instant::now();
        {
            let mut debounced =
                Debounced::new(Duration::from_millis(300), recorder(Arc::clone(&log), start, Duration::ZERO));
            debounced.call("orphan".to_string());
        }
        sleep(Duration::from_secs(1)).await;
        assert!(log.lock().is_empty());
    }
}
