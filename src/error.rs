//! Unified error types for the pump controller firmware.
//!
//! Each subsystem owns a small `Copy` error enum; the top-level [`Error`]
//! wraps all of them so the boot path in `main()` can use `?` uniformly.

use core::fmt;

use crate::boot::BootError;
use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible boot-path operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// The boot sequence could not complete.
    Boot(BootError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Boot(e) => write!(f, "boot: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl From<BootError> for Error {
    fn from(e: BootError) -> Self {
        Self::Boot(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Direction pin write failed.
    DirectionWriteFailed,
    /// The PWM channel cannot represent every 8-bit duty level.
    ResolutionTooCoarse { max_duty: u16 },
    /// A duty write was attempted before `initialize()` succeeded.
    NotInitialized,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::DirectionWriteFailed => write!(f, "direction pin write failed"),
            Self::ResolutionTooCoarse { max_duty } => {
                write!(f, "PWM resolution too coarse (max duty {max_duty} < 255)")
            }
            Self::NotInitialized => write!(f, "driver not initialized"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

/// Errors from bringing up the wireless access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    /// SSID must be 1-32 printable ASCII bytes.
    InvalidSsid,
    /// Password must be empty (open network) or 8-64 bytes.
    InvalidPassword,
    /// The radio could not be taken (already started or released).
    RadioUnavailable,
    /// The platform Wi-Fi stack rejected the request (ESP-IDF error code).
    StartFailed(i32),
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes, or empty for open)")
            }
            Self::RadioUnavailable => write!(f, "Wi-Fi radio unavailable"),
            Self::StartFailed(rc) => write!(f, "access point start failed (rc={})", rc),
        }
    }
}

/// Errors from the request/response transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The server could not be started (ESP-IDF error code).
    StartFailed(i32),
    /// A handler was registered before `start()`.
    NotStarted,
    /// The platform rejected a handler registration (ESP-IDF error code).
    RegisterFailed(i32),
    /// A handler for this path already exists.
    DuplicateRoute(&'static str),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFailed(rc) => write!(f, "server start failed (rc={})", rc),
            Self::NotStarted => write!(f, "server not started"),
            Self::RegisterFailed(rc) => write!(f, "handler registration failed (rc={})", rc),
            Self::DuplicateRoute(path) => write!(f, "duplicate route {}", path),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
