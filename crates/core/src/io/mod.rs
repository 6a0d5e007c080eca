pub mod feed;
pub mod sink;

pub use feed::{FeedHub, ReadingReceiver, ReadingSender, SensorFeed};
pub use sink::{ChannelSink, Notification, NotificationSink};
