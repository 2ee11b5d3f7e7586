//! Actuator domain types shared by the driver, the guard, and the
//! command surface.

use core::fmt;

use crate::pins;

/// Pump rotation direction.  The board is wired single-direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
}

/// Last-known actuator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    /// Duty level currently programmed (0 = off, 255 = full speed).
    pub intensity: u8,
    pub direction: Direction,
    /// Monotonic microseconds since boot of the last register write.
    pub last_updated_us: u64,
}

impl ActuatorState {
    /// Power-on state: stopped, forward.
    pub const fn off() -> Self {
        Self {
            intensity: 0,
            direction: Direction::Forward,
            last_updated_us: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.intensity > 0
    }
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self::off()
    }
}

/// Opaque identity of whoever asked for an actuator change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// A transport request, numbered in arrival order.
    Remote(u32),
    /// An in-process caller (main task, tests).
    Local,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(seq) => write!(f, "remote#{}", seq),
            Self::Local => write!(f, "local"),
        }
    }
}

/// A single intensity change request.  Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityRequest {
    /// Raw level as received; may be outside the duty range.
    pub requested_level: i64,
    pub source: RequestSource,
}

impl IntensityRequest {
    pub fn new(requested_level: i64, source: RequestSource) -> Self {
        Self {
            requested_level,
            source,
        }
    }

    /// The level that will actually be applied: saturated into `0..=255`.
    pub fn clamped(&self) -> u8 {
        clamp_level(self.requested_level)
    }

    pub fn was_clamped(&self) -> bool {
        i64::from(self.clamped()) != self.requested_level
    }
}

/// Saturate any integer into the duty range.  Out-of-range input is never
/// rejected.
pub fn clamp_level(requested: i64) -> u8 {
    requested.clamp(0, i64::from(pins::PUMP_MAX_DUTY)) as u8
}
