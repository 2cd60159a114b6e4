use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Receives estimated progress percentages while a transcription runs
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl ProgressObserver for indicatif::ProgressBar {
    fn on_progress(&self, percent: u8) {
        self.set_position(u64::from(percent));
    }
}

pub(crate) const TICK: Duration = Duration::from_millis(500);
pub(crate) const STEP: u8 = 5;
pub(crate) const CEILING: u8 = 95;

/// Estimated progress ticker, decoupled from the real pipeline stages.
///
/// Advances by [`STEP`] every [`TICK`] until [`CEILING`]; finishing reports 100.
pub(crate) struct ProgressTicker {
    observer: Arc<dyn ProgressObserver>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub(crate) fn start(observer: Arc<dyn ProgressObserver>) -> Self {
        let ticking = Arc::clone(&observer);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            // the first tick completes immediately
            interval.tick().await;

            let mut percent = 0u8;
            while percent < CEILING {
                interval.tick().await;
                percent = (percent + STEP).min(CEILING);
                ticking.on_progress(percent);
            }
        });

        Self { observer, handle }
    }

    /// Stop ticking and report completion
    pub(crate) fn finish(self) {
        self.handle.abort();
        self.observer.on_progress(100);
    }

    /// Stop ticking without a completion notice
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
