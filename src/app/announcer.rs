//! Periodic status announcer run by the main task once the service is up.
//!
//! Reads actuator state only through the guard, so it may run concurrently
//! with request handlers.

use super::events::AppEvent;
use super::guard::ActuatorGuard;
use super::ports::{ActuatorPort, EventSink};

pub struct StatusAnnouncer {
    interval_secs: u64,
    last_announce_secs: Option<u64>,
}

impl StatusAnnouncer {
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval_secs: u64::from(interval_secs.max(1)),
            last_announce_secs: None,
        }
    }

    /// Emit [`AppEvent::Status`] if at least one interval has elapsed since
    /// the previous announcement (the first call always announces).
    /// Returns `true` when an announcement was made.
    pub fn tick<A: ActuatorPort>(
        &mut self,
        now_secs: u64,
        guard: &ActuatorGuard<A>,
        sink: &impl EventSink,
    ) -> bool {
        if let Some(last) = self.last_announce_secs {
            if now_secs.saturating_sub(last) < self.interval_secs {
                return false;
            }
        }
        self.last_announce_secs = Some(now_secs);
        sink.emit(&AppEvent::Status {
            state: guard.snapshot(),
            uptime_secs: now_secs,
        });
        true
    }
}
