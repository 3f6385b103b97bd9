use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// Floor used when no usable rate limit is configured.
pub const FALLBACK_MIN_DELAY: Duration = Duration::from_secs(2);

/// Upper bound of each pause as a multiple of the minimum delay.
const JITTER_CEILING: f64 = 1.5;

/// Minimum pause between requests for a requests-per-minute budget.
///
/// `60 / rate` seconds for a positive rate, [`FALLBACK_MIN_DELAY`] otherwise.
pub fn min_delay_for_rate(rate_limit_per_minute: Option<i64>) -> Duration {
    match rate_limit_per_minute {
        Some(rate) if rate > 0 => Duration::from_secs_f64(60.0 / rate as f64),
        _ => FALLBACK_MIN_DELAY,
    }
}

/// Paces collaborator calls with a randomized pause.
///
/// Each [`wait`](DelayController::wait) sleeps for a duration drawn uniformly
/// from `[min_delay, min_delay * 1.5]`. This is a client-side courtesy only; it
/// says nothing about what the server will tolerate.
#[derive(Debug)]
pub struct DelayController {
    min_delay: Duration,
    waits_issued: AtomicU64,
}

impl DelayController {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            waits_issued: AtomicU64::new(0),
        }
    }

    pub fn from_rate_limit(rate_limit_per_minute: Option<i64>) -> Self {
        Self::new(min_delay_for_rate(rate_limit_per_minute))
    }

    /// A controller that never sleeps but still counts its waits.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.min_delay.mul_f64(JITTER_CEILING)
    }

    /// Draws the next pause from `[min, max]`.
    pub fn next_delay(&self) -> Duration {
        jittered(self.min_delay, self.max_delay())
    }

    /// Suspends the calling flow for one randomized pause.
    pub async fn wait(&self) {
        let delay = self.next_delay();
        self.waits_issued.fetch_add(1, Ordering::Relaxed);
        if !delay.is_zero() {
            tracing::debug!("Pacing for {:?}", delay);
            sleep(delay).await;
        }
    }

    /// Longer pause between whole tickers, drawn from `[2 * min, 3 * min]`.
    pub async fn wait_between_batches(&self) {
        let delay = jittered(self.min_delay * 2, self.min_delay * 3);
        if !delay.is_zero() {
            tracing::debug!("Pausing {:?} before next batch", delay);
            sleep(delay).await;
        }
    }

    /// Number of [`wait`](DelayController::wait) calls made so far.
    pub fn waits_issued(&self) -> u64 {
        self.waits_issued.load(Ordering::Relaxed)
    }
}

fn jittered(low: Duration, high: Duration) -> Duration {
    let span = high.saturating_sub(low);
    low + span.mul_f64(fastrand::f64())
}
