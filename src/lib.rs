//! Water pump controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod boot;
pub mod config;
pub mod error;
pub mod pins;

// Hardware-facing modules; host builds get simulation stubs from the
// cfg-gated code inside.
pub mod adapters;
pub mod drivers;
