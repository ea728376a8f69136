use std::time::Duration;
use tokio::time::Instant;

/// 對外部服務的禮貌性節流：上一次呼叫結束後至少間隔 `min_interval`
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_done: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_done: None,
        }
    }

    /// Waits until `min_interval` has passed since the previous call
    /// finished. The first call never waits.
    pub async fn wait(&mut self) {
        if let Some(done) = self.last_done {
            let ready_at = done + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tracing::debug!("Throttling for {:?}", ready_at - now);
                tokio::time::sleep_until(ready_at).await;
            }
        }
    }

    /// Records that the external call has completed.
    pub fn mark_done(&mut self) {
        self.last_done = Some(Instant::now());
    }

    /// `wait`, run the call, `mark_done`.
    pub async fn run<F, T>(&mut self, call: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.wait().await;
        let output = call.await;
        self.mark_done();
        output
    }
}
