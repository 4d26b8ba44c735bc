use chrono::{DateTime, Utc};
use license_engine::PremiumStatus;

/// How many shortcuts a user may keep per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutQuota {
    Limited(usize),
    Unlimited,
}

impl ShortcutQuota {
    /// Unlimited while premium is in effect, otherwise `free_limit`.
    pub fn from_status(status: &PremiumStatus, now: DateTime<Utc>, free_limit: usize) -> Self {
        if status.is_premium(now) {
            Self::Unlimited
        } else {
            Self::Limited(free_limit)
        }
    }

    /// Whether one more shortcut fits next to `existing`.
    pub fn allows(&self, existing: usize) -> bool {
        match self {
            Self::Limited(limit) => existing < *limit,
            Self::Unlimited => true,
        }
    }
}
