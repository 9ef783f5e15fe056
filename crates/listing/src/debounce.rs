use std::time::Duration;

use tokio::task::AbortHandle;

/// Trailing-edge debounce timer.
///
/// Every [`schedule`](Debouncer::schedule) restarts the timer and bumps a
/// token; only the callback carrying the latest token should be honoured,
/// which [`take`](Debouncer::take) checks. A timer that already fired but
/// whose event was not processed yet is therefore ignored once superseded.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    token: u64,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            token: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restarts the timer. `fire` runs with the new token once `delay` elapsed
    /// without another call. Must be called inside a tokio runtime.
    pub fn schedule<F>(&mut self, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.token += 1;
        let token = self.token;
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(token);
        });
        self.pending = Some(handle.abort_handle());
        token
    }

    /// Consumes the pending timer if `token` is the latest one.
    pub fn take(&mut self, token: u64) -> bool {
        if self.pending.is_some() && token == self.token {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_call_fires() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for _ in 0..3 {
            let sink = Arc::clone(&fired);
            debouncer.schedule(move |token| sink.lock().unwrap().push(token));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*fired.lock().unwrap(), vec![3]);
        assert!(debouncer.take(3));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tokens_are_refused() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let first = debouncer.schedule(|_| {});
        let second = debouncer.schedule(|_| {});

        assert!(!debouncer.take(first));
        assert!(debouncer.take(second));
        assert!(!debouncer.take(second));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let fired = Arc::new(Mutex::new(false));
        let sink = Arc::clone(&fired);
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(move |_| *sink.lock().unwrap() = true);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!*fired.lock().unwrap());
    }
}
