//! Progress bar for pauses between attempts.

use std::time::Duration;

use async_trait::async_trait;
use bulk_downloader_core::Sleeper;
use indicatif::{ProgressBar, ProgressStyle};

/// Pauses shorter than this are served silently.
const BAR_THRESHOLD: Duration = Duration::from_secs(2);

const TICK: Duration = Duration::from_secs(1);

/// Sleeps in one-second ticks, drawing a countdown bar for longer pauses.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProgressSleeper {
    show_bar: bool,
}

impl ProgressSleeper {
    pub(crate) fn new(show_bar: bool) -> Self {
        Self { show_bar }
    }

    fn bar(&self, duration: Duration) -> ProgressBar {
        if !self.show_bar || duration < BAR_THRESHOLD {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(tick_count(duration));
        bar.set_style(
            ProgressStyle::with_template("waiting {bar:40} {pos}/{len}s")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

/// Number of loop iterations needed to serve `duration`: whole ticks plus a
/// final partial one.
fn tick_count(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis().div_ceil(TICK.as_millis())).unwrap_or(u64::MAX)
}

#[async_trait]
impl Sleeper for ProgressSleeper {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        let bar = self.bar(duration);
        let mut remaining = duration;
        while !remaining.is_zero() {
            let step = remaining.min(TICK);
            tokio::time::sleep(step).await;
            remaining = remaining.saturating_sub(step);
            bar.inc(1);
        }
        bar.finish_and_clear();
    }
}
