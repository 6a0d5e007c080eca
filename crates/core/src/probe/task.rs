use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::listeners::{FailureListener, ListenerId, ListenerRegistry};
use super::target::ProbeTarget;

/// Interval sentinel meaning "stop after the current wait".
const STOPPED: i64 = -1;

/// Observable lifecycle of the probe loop. Terminated is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePhase {
    Created,
    WarmingUp,
    Probing,
    Terminated,
}

/// Periodic liveness check against a weakly-held peer.
///
/// One background task per probe. The interval lives in an atomic shared with
/// the loop: `set_interval` and `stop` write it from any task, the loop
/// re-reads it each cycle. Stopping is cooperative — after `stop()` the loop
/// may still run for up to one full interval before exiting.
pub struct LivenessProbe {
    interval_ms: Arc<AtomicI64>,
    listeners: Arc<ListenerRegistry>,
    warmup_ms: u64,
    phase_tx: watch::Sender<ProbePhase>,
    handle: Option<JoinHandle<()>>,
}

impl LivenessProbe {
    /// `warmup_ms` is extra delay before the first probe, on top of one
    /// interval, so the peer's handshake can finish first.
    pub fn new(warmup_ms: u64) -> Self {
        let (phase_tx, _) = watch::channel(ProbePhase::Created);
        Self {
            interval_ms: Arc::new(AtomicI64::new(STOPPED)),
            listeners: Arc::new(ListenerRegistry::new()),
            warmup_ms,
            phase_tx,
            handle: None,
        }
    }

    /// Spawn the probe loop. No-op if this probe was already started.
    pub fn start(&mut self, target: Weak<dyn ProbeTarget>, interval_ms: u64) {
        if self.handle.is_some() {
            tracing::debug!("probe already started, ignoring");
            return;
        }
        self.interval_ms
            .store(interval_ms as i64, Ordering::Release);
        tracing::info!(interval_ms, warmup_ms = self.warmup_ms, "liveness probe starting");

        let interval = Arc::clone(&self.interval_ms);
        let listeners = Arc::clone(&self.listeners);
        let phase = self.phase_tx.clone();
        let warmup_ms = self.warmup_ms;
        self.handle = Some(tokio::spawn(async move {
            run_loop(target, interval, listeners, phase, warmup_ms).await;
        }));
    }

    /// Cooperative stop: the loop exits after its current wait.
    pub fn stop(&self) {
        self.interval_ms.store(STOPPED, Ordering::Release);
        tracing::debug!("probe stop requested");
    }

    /// Change the sleep duration. Read fresh at the top of each cycle, so the
    /// in-flight sleep finishes at the old length. A value <= 0 stops the loop.
    pub fn set_interval(&self, interval_ms: i64) {
        self.interval_ms.store(interval_ms, Ordering::Release);
        tracing::debug!(interval_ms, "probe interval updated");
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval_ms.load(Ordering::Acquire)
    }

    pub fn register_failure_listener(&self, listener: Arc<dyn FailureListener>) -> ListenerId {
        self.listeners.register(listener)
    }

    pub fn unregister_failure_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Watch the loop's lifecycle phase.
    pub fn phase(&self) -> watch::Receiver<ProbePhase> {
        self.phase_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        matches!(
            *self.phase_tx.borrow(),
            ProbePhase::WarmingUp | ProbePhase::Probing
        )
    }
}

async fn run_loop(
    target: Weak<dyn ProbeTarget>,
    interval: Arc<AtomicI64>,
    listeners: Arc<ListenerRegistry>,
    phase: watch::Sender<ProbePhase>,
    warmup_ms: u64,
) {
    phase.send_replace(ProbePhase::WarmingUp);
    let first_wait = warmup_ms.saturating_add(interval.load(Ordering::Acquire).max(0) as u64);
    tokio::time::sleep(Duration::from_millis(first_wait)).await;
    phase.send_replace(ProbePhase::Probing);

    loop {
        if interval.load(Ordering::Acquire) <= 0 {
            tracing::debug!("probe interval cleared, loop exiting");
            break;
        }

        // Scope the upgraded handle so the sleep below never extends the
        // peer's lifetime.
        match target.upgrade() {
            None => {
                tracing::info!("probe target released by owner, loop exiting");
                break;
            }
            Some(peer) => {
                if peer.is_ready() {
                    if !peer.probe().await {
                        tracing::warn!("probe failed, notifying listeners");
                        listeners.notify_failure();
                    }
                } else {
                    tracing::trace!("peer not ready, skipping this cycle");
                }
            }
        }

        // Re-read so a concurrent set_interval is honored on this sleep.
        let ms = interval.load(Ordering::Acquire);
        if ms <= 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(ms as u64)).await;
    }

    phase.send_replace(ProbePhase::Terminated);
    tracing::info!("liveness probe terminated");
}
