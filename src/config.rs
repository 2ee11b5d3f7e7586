//! System configuration parameters
//!
//! Network-facing settings for the pump controller.  Hardware parameters
//! (pins, PWM frequency and resolution) are fixed by the wiring and live in
//! [`pins`](crate::pins) instead.  A stored copy may be loaded from NVS as a
//! postcard blob; anything that fails to decode or validate falls back to
//! [`SystemConfig::default()`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Access point ---
    /// SSID broadcast by the SoftAP (1-32 printable ASCII bytes)
    pub ap_ssid: heapless::String<32>,
    /// WPA2 passphrase (8-64 bytes), or empty for an open network
    pub ap_password: heapless::String<64>,
    /// 2.4 GHz channel (1-13)
    pub ap_channel: u8,
    /// Maximum simultaneously associated stations
    pub ap_max_connections: u16,

    // --- Command transport ---
    /// TCP port of the HTTP command server
    pub http_port: u16,

    // --- Timing ---
    /// Interval between status announcements from the main task (seconds)
    pub status_announce_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut ap_ssid = heapless::String::new();
        let _ = ap_ssid.push_str("WaterPump");
        let mut ap_password = heapless::String::new();
        let _ = ap_password.push_str("pump12345");

        Self {
            // Access point
            ap_ssid,
            ap_password,
            ap_channel: 1,
            ap_max_connections: 4,

            // Transport
            http_port: 80,

            // Timing
            status_announce_interval_secs: 30,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ap_ssid.is_empty() || !self.ap_ssid.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return Err(ConfigError::ValidationFailed("ap_ssid must be 1-32 printable ASCII bytes"));
        }
        if !self.ap_password.is_empty() && self.ap_password.len() < 8 {
            return Err(ConfigError::ValidationFailed("ap_password must be empty or 8-64 bytes"));
        }
        if !(1..=13).contains(&self.ap_channel) {
            return Err(ConfigError::ValidationFailed("ap_channel must be 1-13"));
        }
        if !(1..=10).contains(&self.ap_max_connections) {
            return Err(ConfigError::ValidationFailed("ap_max_connections must be 1-10"));
        }
        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be non-zero"));
        }
        if self.status_announce_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "status_announce_interval_secs must be non-zero",
            ));
        }
        Ok(())
    }

    /// Decode and validate a stored postcard blob.
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode for storage.
    pub fn to_postcard(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Corrupted)
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
