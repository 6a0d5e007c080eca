use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::gating;
use super::state::NotifierState;
use crate::config::VigilCfg;
use crate::io::feed::SensorFeed;
use crate::io::sink::{Notification, NotificationSink};
use crate::types::RawReading;

struct Inner {
    cfg: VigilCfg,
    state: NotifierState,
}

/// Debounced state-change notifier.
///
/// Reactive on two paths: the sensor feed (consumed by a spawned task while
/// active) and the explicit command entry point. Both funnel through the same
/// lock around config + state; nothing here blocks or awaits while holding it.
/// Clones share state, so one clone can ride along in the feed consumer task.
#[derive(Clone)]
pub struct StateChangeNotifier {
    inner: Arc<Mutex<Inner>>,
    sink: Arc<dyn NotificationSink>,
    feed_task: Arc<Mutex<Option<(CancellationToken, JoinHandle<()>)>>>,
}

impl StateChangeNotifier {
    pub fn new(cfg: VigilCfg, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                cfg,
                state: NotifierState::new(),
            })),
            sink,
            feed_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the configuration. Takes effect from the next update.
    pub fn configure(&self, cfg: VigilCfg) {
        self.lock_inner().cfg = cfg;
    }

    /// Subscribe to the feed and start consuming readings. No-op if already
    /// active.
    pub fn activate(&self, feed: &dyn SensorFeed) {
        let mut task = lock_unpoisoned(&self.feed_task);
        if task.is_some() {
            tracing::debug!("notifier already active, ignoring");
            return;
        }
        let mut rx = feed.subscribe();
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let notifier = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    reading = rx.recv() => match reading {
                        Some(reading) => notifier.on_raw_update(reading),
                        None => {
                            tracing::debug!("sensor feed closed, consumer exiting");
                            break;
                        }
                    }
                }
            }
        });
        *task = Some((token, handle));
        tracing::info!("notifier activated");
    }

    /// Cancel the feed consumer and drop all observed state.
    pub fn deactivate(&self) {
        if let Some((token, _handle)) = lock_unpoisoned(&self.feed_task).take() {
            token.cancel();
            tracing::info!("notifier deactivated");
        }
        self.lock_inner().state.reset();
    }

    pub fn is_active(&self) -> bool {
        lock_unpoisoned(&self.feed_task).is_some()
    }

    /// Entry point for each raw reading from the feed. Clamps out-of-range
    /// values and folds through the gating policy.
    pub fn on_raw_update(&self, reading: RawReading) {
        if reading.out_of_range() {
            tracing::warn!(value = reading.value, "raw reading out of range, clamping");
        }
        let value = reading.clamped_value();

        let emissions = {
            let mut inner = self.lock_inner();
            if !inner.state.observe(value, reading.category) {
                tracing::trace!(value, category = %reading.category, "reading unchanged, skipped");
                return;
            }
            let Inner { cfg, state } = &mut *inner;
            gating::evaluate(state, cfg, false)
        };
        self.dispatch(emissions);
    }

    /// Explicit command entry. `force` bypasses the threshold gate for the
    /// plain message; the detailed path keeps its own gating.
    pub fn execute(&self, force: bool) {
        let emissions = {
            let mut inner = self.lock_inner();
            if inner.state.last_known.is_none() {
                tracing::debug!("no reading observed yet, nothing to announce");
                return;
            }
            let Inner { cfg, state } = &mut *inner;
            gating::evaluate(state, cfg, force)
        };
        self.dispatch(emissions);
    }

    /// Command surface: an optional `silent` argument downgrades the command
    /// to the gated path; anything else (or no argument) forces the emission.
    pub fn handle_command(&self, arg: Option<&str>) {
        let force = !matches!(arg, Some("silent"));
        self.execute(force);
    }

    fn dispatch(&self, emissions: Vec<Notification>) {
        for emission in emissions {
            match emission {
                Notification::Plain { value } => {
                    tracing::debug!(value, "emitting plain message");
                    self.sink.send_plain(value);
                }
                Notification::Detailed { status, category } => {
                    tracing::debug!(status = %status, category = %category, "emitting detailed status");
                    self.sink.set_detailed(&status, category);
                }
            }
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        lock_unpoisoned(&self.inner)
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::feed::FeedHub;
    use crate::types::Category;

    struct RecordingSink {
        emitted: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                emitted: Mutex::new(Vec::new()),
            })
        }

        fn take(&self) -> Vec<Notification> {
            std::mem::take(&mut self.emitted.lock().unwrap())
        }
    }

    impl NotificationSink for RecordingSink {
        fn send_plain(&self, value: u8) {
            self.emitted.lock().unwrap().push(Notification::plain(value));
        }

        fn set_detailed(&self, status: &str, category: Category) {
            self.emitted
                .lock()
                .unwrap()
                .push(Notification::detailed(status, category));
        }
    }

    fn notifier(sink: Arc<RecordingSink>) -> StateChangeNotifier {
        StateChangeNotifier::new(VigilCfg::default(), sink)
    }

    #[test]
    fn out_of_range_reading_is_clamped() {
        let sink = RecordingSink::new();
        let n = notifier(Arc::clone(&sink));
        n.on_raw_update(RawReading::new(150, Category::Battery));
        assert!(sink.take().contains(&Notification::plain(100)));
    }

    #[test]
    fn execute_before_any_reading_is_silent() {
        let sink = RecordingSink::new();
        let n = notifier(Arc::clone(&sink));
        n.execute(true);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn silent_command_respects_gating() {
        let sink = RecordingSink::new();
        let n = notifier(Arc::clone(&sink));
        n.on_raw_update(RawReading::new(50, Category::Battery));
        sink.take();

        n.handle_command(Some("silent"));
        assert!(sink.take().is_empty());

        n.handle_command(None);
        assert_eq!(sink.take(), vec![Notification::plain(50)]);
    }

    #[test]
    fn configure_swaps_step_width() {
        let sink = RecordingSink::new();
        let n = notifier(Arc::clone(&sink));
        n.on_raw_update(RawReading::new(50, Category::Battery));
        sink.take();

        n.configure(VigilCfg {
            step_width: 3,
            notify_detailed: false,
            ..VigilCfg::default()
        });
        n.on_raw_update(RawReading::new(51, Category::Battery));
        assert_eq!(sink.take(), vec![Notification::plain(51)]);
    }

    #[tokio::test]
    async fn activation_consumes_the_feed() {
        let sink = RecordingSink::new();
        let n = notifier(Arc::clone(&sink));
        let hub = FeedHub::new();
        n.activate(&hub);
        assert!(n.is_active());
        n.activate(&hub); // no-op
        assert_eq!(hub.subscriber_count(), 1);

        hub.publish(RawReading::new(42, Category::Battery));
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let emitted = sink.take();
        assert!(emitted.contains(&Notification::plain(42)));

        n.deactivate();
        assert!(!n.is_active());
    }

    #[tokio::test]
    async fn deactivate_resets_first_observation_gate() {
        let sink = RecordingSink::new();
        let n = notifier(Arc::clone(&sink));
        n.on_raw_update(RawReading::new(50, Category::Battery));
        sink.take();

        n.deactivate();
        // Same reading counts as first-ever again after teardown.
        n.on_raw_update(RawReading::new(50, Category::Battery));
        assert!(sink.take().contains(&Notification::plain(50)));
    }
}
