//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{AppEvent, IgnoreReason};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&self, event: &AppEvent) {
        match event {
            AppEvent::BootStateChanged { from, to } => {
                info!("BOOT | {:?} -> {:?}", from, to);
            }
            AppEvent::IntensityApplied {
                source,
                requested,
                applied,
            } => {
                if i64::from(*applied) == *requested {
                    info!("PUMP | {} | speed set to {}", source, applied);
                } else {
                    info!("PUMP | {} | speed set to {} (requested {})", source, applied, requested);
                }
            }
            AppEvent::Stopped { source } => {
                info!("PUMP | {} | stopped", source);
            }
            AppEvent::CommandIgnored {
                source,
                verb,
                reason,
            } => {
                let why = match reason {
                    IgnoreReason::MissingParameter => "missing pwm",
                    IgnoreReason::MalformedParameter => "malformed pwm",
                };
                info!("CMD | {} | {} ignored ({})", source, verb.path(), why);
            }
            AppEvent::ActuatorFault { source, error } => {
                warn!("PUMP | {} | write failed: {}", source, error);
            }
            AppEvent::Status { state, uptime_secs } => {
                info!(
                    "STATUS | up={}s | intensity={} | dir={:?} | {}",
                    uptime_secs,
                    state.intensity,
                    state.direction,
                    if state.is_running() { "RUNNING" } else { "IDLE" },
                );
            }
        }
    }
}
