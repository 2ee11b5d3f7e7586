//! Application core: actuator serialization and the command surface.
//!
//! Everything here is hardware-agnostic: the pump, the network, and the
//! HTTP server are reached only through the **port traits** in [`ports`],
//! so the whole core runs in host tests against mocks.

pub mod announcer;
pub mod commands;
pub mod events;
pub mod guard;
pub mod ports;
pub mod state;
