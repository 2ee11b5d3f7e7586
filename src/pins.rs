//! GPIO / peripheral pin assignments for the pump controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  These values match the physical wiring and are
//! deliberately not part of [`SystemConfig`](crate::config::SystemConfig).

// ---------------------------------------------------------------------------
// Pump motor driver (L9110 H-bridge)
// ---------------------------------------------------------------------------

/// IA input: LEDC PWM output controlling pump speed.
pub const PUMP_PWM_GPIO: i32 = 25;
/// IB input: digital direction output.
pub const PUMP_DIR_GPIO: i32 = 26;
/// Level driven on IB for the forward direction (LOW on this board).
/// The pump is wired single-direction; reverse is never commanded.
pub const PUMP_DIR_FORWARD_HIGH: bool = false;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the pump motor.
pub const PUMP_PWM_FREQ_HZ: u32 = 1_000;
/// Highest duty level the command surface can request (full on).
pub const PUMP_MAX_DUTY: u8 = u8::MAX;
