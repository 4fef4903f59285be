//! Tracks how long it has been since something was last seen.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// Seen within the timeout.
    Present,
    /// The timeout has just passed. Reported once per absence.
    JustExpired,
    /// Never seen, or already reported as expired.
    Absent,
}

#[derive(Clone, Debug)]
pub struct PresenceWatchdog {
    timeout: Duration,
    last_seen: Option<Instant>,
    expired: bool,
}

impl PresenceWatchdog {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout, last_seen: None, expired: true }
    }

    /// Records a sighting. Older timestamps than the latest are ignored.
    pub fn saw(&mut self, at: Instant) {
        self.last_seen = Some(self.last_seen.map_or(at, |last| last.max(at)));
    }

    pub fn check(&mut self, now: Instant) -> Presence {
        let Some(last) = self.last_seen else {
            return Presence::Absent;
        };

        if now.saturating_duration_since(last) <= self.timeout {
            self.expired = false;
            Presence::Present
        }
        else if self.expired {
            Presence::Absent
        }
        else {
            self.expired = true;
            Presence::JustExpired
        }
    }

    pub const fn is_expired(&self) -> bool {
        self.expired
    }
}
