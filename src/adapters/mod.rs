//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                     |
//! |------------|-------------------|---------------------------------|
//! | `http`     | CommandTransport  | ESP-IDF httpd / in-memory routes|
//! | `log_sink` | EventSink         | Serial log output               |
//! | `time`     | TimePort          | ESP32 system timer              |
//! | `wifi`     | ConnectivityPort  | ESP-IDF Wi-Fi SoftAP            |
//!
//! The pump itself is driven by [`drivers::pump`](crate::drivers::pump),
//! which implements `ActuatorPort` directly.

pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
