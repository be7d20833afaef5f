use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A job run immediately and then once per `period`, until the handle is cancelled or dropped.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut job: F) -> anyhow::Result<Self>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        anyhow::ensure!(!period.is_zero(), "period of task {name} must be non-zero");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!(task = name, "periodic task tick");
                job().await;
            }
        });

        tracing::info!(task = name, period_secs = period.as_secs(), "periodic task started");
        Ok(Self { name, handle })
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::info!(task = self.name, "periodic task cancelled");
    }
}
