use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::types::RawReading;

/// Sender half of a reading stream — the platform side pushes here.
pub type ReadingSender = mpsc::UnboundedSender<RawReading>;
/// Receiver half — subscribers consume from here.
pub type ReadingReceiver = mpsc::UnboundedReceiver<RawReading>;

/// Source of raw sensor readings. The core never drives the feed; events
/// arrive at arbitrary times from whatever mechanism the platform provides.
/// Unsubscribing is dropping the receiver.
pub trait SensorFeed: Send + Sync {
    fn subscribe(&self) -> ReadingReceiver;
}

/// In-process feed fan-out: every subscriber gets its own channel, publishers
/// push once. Closed subscriptions are pruned on the next publish.
#[derive(Debug, Default)]
pub struct FeedHub {
    senders: Mutex<Vec<ReadingSender>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a reading to every live subscriber.
    pub fn publish(&self, reading: RawReading) {
        let mut senders = lock_unpoisoned(&self.senders);
        senders.retain(|tx| tx.send(reading).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        lock_unpoisoned(&self.senders).len()
    }
}

impl SensorFeed for FeedHub {
    fn subscribe(&self) -> ReadingReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        lock_unpoisoned(&self.senders).push(tx);
        rx
    }
}

/// Recover the guard even if a holder panicked; the sender list stays valid.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
