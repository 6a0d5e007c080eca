use crate::types::Category;

/// One observed (value, category) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerState {
    pub value: u8,
    pub category: Category,
}

impl PowerState {
    pub fn new(value: u8, category: Category) -> Self {
        Self { value, category }
    }
}

/// Last-known vs last-sent tracking. `None` means "never observed" / "never
/// sent" — the sentinels the gating paths key off. Owned by one notifier
/// instance and mutated only under its lock.
#[derive(Debug, Default)]
pub struct NotifierState {
    pub last_known: Option<PowerState>,
    pub last_sent: Option<PowerState>,
}

impl NotifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading. Returns false when it matches the last-known state
    /// exactly, in which case nothing downstream needs to run.
    pub fn observe(&mut self, value: u8, category: Category) -> bool {
        let next = PowerState::new(value, category);
        if self.last_known == Some(next) {
            return false;
        }
        self.last_known = Some(next);
        true
    }

    /// Torn down on deactivation; the next activation starts never-observed.
    pub fn reset(&mut self) {
        self.last_known = None;
        self.last_sent = None;
    }
}
