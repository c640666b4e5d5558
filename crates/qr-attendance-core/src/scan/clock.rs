use std::{future::Future, time::Duration};

use chrono::{DateTime, Utc};

/// Time source for the decode loop.
///
/// Injected so tests can run the loop without real delays.
pub trait Clock: Send + Sync {
    /// Suspend the caller for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Wall-clock instant used to stamp decoded records.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the tokio timer and the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
