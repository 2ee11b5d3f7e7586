//! Pump actuator driver and its one-shot hardware initialisation.

pub mod hw_init;
pub mod pump;
