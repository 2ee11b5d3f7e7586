//! Actuator state guard.
//!
//! Owns the [`ActuatorPort`] behind a mutex so that request handlers running
//! on different tasks can never interleave duty-register writes.  Policy is
//! last-writer-wins: no queue, no priority; whichever caller enters the
//! exclusive section last determines the final output.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error};

use crate::error::ActuatorError;

use super::ports::ActuatorPort;
use super::state::{ActuatorState, IntensityRequest, RequestSource};

pub struct ActuatorGuard<A> {
    actuator: Mutex<A>,
}

impl<A: ActuatorPort> ActuatorGuard<A> {
    /// Wrap an already-initialized actuator.
    pub fn new(actuator: A) -> Self {
        Self {
            actuator: Mutex::new(actuator),
        }
    }

    /// Enter the exclusive section.  A panicked holder cannot leave the
    /// hardware half-written (each write is a single register update), so a
    /// poisoned lock is recovered rather than wedging the pump.
    fn lock(&self) -> MutexGuard<'_, A> {
        self.actuator.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Saturate the requested level into `0..=255` and apply it.
    /// Returns the level written.
    pub fn apply(&self, request: IntensityRequest) -> Result<u8, ActuatorError> {
        let level = request.clamped();
        if request.was_clamped() {
            debug!(
                "guard: {} requested {}, clamped to {}",
                request.source, request.requested_level, level
            );
        }

        let mut actuator = self.lock();
        actuator.set_intensity(level).inspect_err(|e| {
            error!("guard: {} set_intensity({}) failed: {}", request.source, level, e);
        })?;
        Ok(level)
    }

    /// Force the actuator to zero.
    pub fn stop(&self, source: RequestSource) -> Result<(), ActuatorError> {
        let mut actuator = self.lock();
        actuator.stop().inspect_err(|e| {
            error!("guard: {} stop failed: {}", source, e);
        })
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> ActuatorState {
        self.lock().state()
    }
}
