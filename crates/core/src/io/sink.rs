use tokio::sync::mpsc;

use crate::types::Category;

/// An outbound notification produced by the gating policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Plain message carrying the exact value.
    Plain { value: u8 },
    /// Detailed status line: exact or bucketed value plus category.
    Detailed { status: String, category: Category },
}

impl Notification {
    pub fn plain(value: u8) -> Self {
        Self::Plain { value }
    }

    pub fn detailed(status: impl Into<String>, category: Category) -> Self {
        Self::Detailed {
            status: status.into(),
            category,
        }
    }
}

/// Where notifications go. The actual transport (a chat message, a presence
/// update) lives outside the core; implementations must not block.
pub trait NotificationSink: Send + Sync {
    /// Deliver the plain "current value" message.
    fn send_plain(&self, value: u8);
    /// Publish the detailed status (already rendered) with its category.
    fn set_detailed(&self, status: &str, category: Category);
}

/// Notification channel sender — the notifier pushes here.
pub type NotificationSender = mpsc::UnboundedSender<Notification>;
/// Notification channel receiver — the transport consumes from here.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Create a notification channel.
pub fn channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}

/// Sink that forwards every notification onto a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: NotificationSender,
}

impl ChannelSink {
    pub fn new(tx: NotificationSender) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn send_plain(&self, value: u8) {
        if self.tx.send(Notification::plain(value)).is_err() {
            tracing::debug!(value, "notification receiver gone, plain message dropped");
        }
    }

    fn set_detailed(&self, status: &str, category: Category) {
        if self.tx.send(Notification::detailed(status, category)).is_err() {
            tracing::debug!(status, "notification receiver gone, detailed status dropped");
        }
    }
}
