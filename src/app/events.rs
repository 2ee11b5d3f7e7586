//! Outbound application events.
//!
//! The command handler, boot sequencer, and status announcer emit these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them (serial log in production, a
//! recording vector in tests).

use crate::boot::BootState;
use crate::error::ActuatorError;

use super::commands::Verb;
use super::state::{ActuatorState, RequestSource};

/// Why a `spray` request left the pump untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No `pwm` parameter in the query.
    MissingParameter,
    /// `pwm` present but not an integer.
    MalformedParameter,
}

/// Structured events emitted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The boot sequencer advanced.
    BootStateChanged { from: BootState, to: BootState },

    /// A `spray` request reached the hardware.
    IntensityApplied {
        source: RequestSource,
        requested: i64,
        applied: u8,
    },

    /// A `stop` request reached the hardware.
    Stopped { source: RequestSource },

    /// A command was acknowledged without changing the actuator.
    CommandIgnored {
        source: RequestSource,
        verb: Verb,
        reason: IgnoreReason,
    },

    /// The driver refused a write.
    ActuatorFault {
        source: RequestSource,
        error: ActuatorError,
    },

    /// Periodic status announcement from the main task.
    Status {
        state: ActuatorState,
        uptime_secs: u64,
    },
}
