//! vigil agent binary: wires a simulated peer and battery feed to the core
//! subsystems. Reads commands on stdin (`status`, `status silent`, `quit`);
//! SIGTERM/SIGINT shut everything down.

mod sim;

use std::path::Path;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vigil_core::config::VigilCfg;
use vigil_core::io::feed::FeedHub;
use vigil_core::io::sink::{self, ChannelSink, Notification};
use vigil_core::notifier::StateChangeNotifier;
use vigil_core::probe::{FailureListener, LivenessProbe, ProbeTarget, ReportError};
use vigil_core::shutdown::ShutdownGuard;

/// Logs every probe failure; the kind of listener a reconnect policy would
/// hang off of.
struct LogListener;

impl FailureListener for LogListener {
    fn on_failure(&self) -> Result<(), ReportError> {
        tracing::warn!("peer failed a liveness probe");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => VigilCfg::load(Path::new(&path))?,
        None => VigilCfg::default(),
    };

    let shutdown = ShutdownGuard::new();
    shutdown.spawn_signal_listener();
    let token = shutdown.token();

    // Liveness probe over a simulated peer. The agent owns the peer; the
    // probe only holds it weakly.
    let peer = Arc::new(sim::SimulatedPeer::new());
    let mut probe = LivenessProbe::new(cfg.probe_warmup_ms);
    probe.register_failure_listener(Arc::new(LogListener));
    probe.start(
        Arc::downgrade(&peer) as Weak<dyn ProbeTarget>,
        cfg.probe_interval_ms,
    );

    // Notifier over a simulated battery feed, emitting through a channel sink.
    let (tx, mut rx) = sink::channel();
    let notifier = StateChangeNotifier::new(cfg, Arc::new(ChannelSink::new(tx)));
    let hub = Arc::new(FeedHub::new());
    notifier.activate(hub.as_ref());
    tokio::spawn(sim::drive_battery(
        Arc::clone(&hub),
        token.clone(),
        Duration::from_secs(2),
    ));

    let transport = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            match notification {
                Notification::Plain { value } => tracing::info!(value, "-> battery level"),
                Notification::Detailed { status, category } => {
                    tracing::info!(status = %status, category = %category, "-> presence status");
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            line = lines.next_line() => match line? {
                Some(line) => {
                    let mut words = line.split_whitespace();
                    match words.next() {
                        Some("status") => notifier.handle_command(words.next()),
                        Some("quit") => break,
                        Some(other) => tracing::info!(command = other, "unknown command"),
                        None => {}
                    }
                }
                None => break,
            },
        }
    }

    token.cancel();
    probe.stop();
    notifier.deactivate();
    transport.abort();
    tracing::info!("vigil agent stopped");
    Ok(())
}
