//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ guard / command handler / boot sequencer
//! ```
//!
//! Driven adapters (pump driver, event sinks, clock, access point, HTTP
//! server) implement these traits.  The core consumes them via generics so
//! it never touches ESP-IDF directly and runs unchanged in host tests.

use crate::error::{ActuatorError, ConnectivityError, TransportError};

use super::commands::{Reply, Verb};
use super::events::AppEvent;
use super::state::ActuatorState;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single pump actuator.
///
/// Implementations own the hardware handle exclusively.  The caller is
/// responsible for serialising access (see [`ActuatorGuard`](super::guard::ActuatorGuard)).
pub trait ActuatorPort {
    /// Configure the output stage.  Must succeed before any duty write.
    fn initialize(&mut self) -> Result<(), ActuatorError>;

    /// Program the duty register.  `level` is already in range.
    fn set_intensity(&mut self, level: u8) -> Result<(), ActuatorError>;

    /// Equivalent to `set_intensity(0)`.
    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.set_intensity(0)
    }

    /// Last state successfully written to hardware.
    fn state(&self) -> ActuatorState;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`]s through this port.
///
/// Takes `&self`: request handlers emit from whatever task the transport
/// dispatches on, so sinks must be shareable.
pub trait EventSink {
    fn emit(&self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic clock used to timestamp actuator state changes.
pub trait TimePort {
    /// Microseconds since boot.
    fn uptime_us(&self) -> u64;

    /// Seconds since boot.
    fn uptime_secs(&self) -> u64 {
        self.uptime_us() / 1_000_000
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (access point bring-up)
// ───────────────────────────────────────────────────────────────

/// Brings up the local wireless network that command clients join.
pub trait ConnectivityPort {
    /// Start the network.  Blocks until the interface is up.
    fn start(&mut self) -> Result<(), ConnectivityError>;

    fn is_up(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Command transport port
// ───────────────────────────────────────────────────────────────

/// Handler invoked with the raw query string (text after `?`, may be empty).
pub type VerbHandler = Box<dyn Fn(&str) -> Reply + Send + Sync + 'static>;

/// Request/response dispatcher that routes verbs to handlers.
pub trait CommandTransport {
    /// Start accepting connections.  Requires the network to be up.
    fn start(&mut self) -> Result<(), TransportError>;

    /// Route `verb` to `handler`.  Only valid after [`start`](Self::start).
    fn register(&mut self, verb: Verb, handler: VerbHandler) -> Result<(), TransportError>;
}
