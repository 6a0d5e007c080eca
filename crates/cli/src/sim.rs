//! Simulated collaborators for the demo agent: a peer that occasionally drops
//! a probe, and a battery that drains then charges.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use vigil_core::io::feed::FeedHub;
use vigil_core::probe::ProbeTarget;
use vigil_core::types::{Category, RawReading};

/// Always-ready peer that fails every seventh probe.
pub struct SimulatedPeer {
    probes: AtomicUsize,
}

impl SimulatedPeer {
    pub fn new() -> Self {
        Self {
            probes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProbeTarget for SimulatedPeer {
    fn is_ready(&self) -> bool {
        true
    }

    async fn probe(&self) -> bool {
        let n = self.probes.fetch_add(1, Ordering::Relaxed);
        n % 7 != 6
    }
}

/// Publish a drain-then-charge cycle onto the feed until cancelled.
pub async fn drive_battery(hub: Arc<FeedHub>, token: CancellationToken, tick: Duration) {
    let mut value: i32 = 100;
    let mut category = Category::Battery;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(tick) => {}
        }
        match category {
            Category::Battery => {
                value -= 1;
                if value <= 20 {
                    category = Category::Ac;
                }
            }
            _ => {
                value += 2;
                if value >= 100 {
                    value = 100;
                    category = Category::Battery;
                }
            }
        }
        hub.publish(RawReading::new(value, category));
    }
}
