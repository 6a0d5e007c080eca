use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Power source category attached to each sensor reading.
///
/// `Ac` and `Usb` are "precise" sources: while plugged in the exact value is
/// worth announcing. `Battery` is coarse and gets bucketed before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Ac,
    Usb,
    Battery,
    Unknown,
}

impl Category {
    /// True for sources where the exact value is announced instead of a bucket.
    pub fn is_precise(self) -> bool {
        matches!(self, Self::Ac | Self::Usb)
    }

    /// Parse a source label from the platform feed. Unrecognized labels fold
    /// to `Unknown` rather than failing.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("ac") {
            Self::Ac
        } else if label.eq_ignore_ascii_case("usb") {
            Self::Usb
        } else if label.eq_ignore_ascii_case("battery") {
            Self::Battery
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ac => "AC",
            Self::Usb => "USB",
            Self::Battery => "Battery",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Raw (value, category) pair delivered by the sensor feed.
///
/// `value` is nominally in [0, 100]; out-of-range readings are clamped at the
/// notifier boundary. The timestamp is informational and takes no part in
/// change detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawReading {
    pub value: i32,
    pub category: Category,
    pub observed_at: DateTime<Utc>,
}

impl RawReading {
    pub fn new(value: i32, category: Category) -> Self {
        Self {
            value,
            category,
            observed_at: Utc::now(),
        }
    }

    /// Value clamped into [0, 100].
    pub fn clamped_value(&self) -> u8 {
        self.value.clamp(0, 100) as u8
    }

    /// True when the raw value fell outside [0, 100].
    pub fn out_of_range(&self) -> bool {
        !(0..=100).contains(&self.value)
    }
}
