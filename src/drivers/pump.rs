//! Water pump motor driver (L9110 H-bridge).
//!
//! Variable speed via one PWM channel on IA; IB is a plain GPIO held at the
//! forward level for the life of the process.
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` PWM and output-pin traits.  On ESP-IDF the
//! handles are `LedcDriver` / `PinDriver` from
//! [`hw_init`](crate::drivers::hw_init); on host they are simulations or
//! test mocks.
//!
//! This driver is a dumb actuator: it does no clamping and no locking.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info};

use crate::app::ports::{ActuatorPort, TimePort};
use crate::app::state::{ActuatorState, Direction};
use crate::error::ActuatorError;
use crate::pins;

pub struct PumpDriver<P, D, C> {
    pwm: P,
    dir: D,
    clock: C,
    state: ActuatorState,
    initialized: bool,
}

impl<P, D, C> PumpDriver<P, D, C>
where
    P: SetDutyCycle,
    D: OutputPin,
    C: TimePort,
{
    pub fn new(pwm: P, dir: D, clock: C) -> Self {
        Self {
            pwm,
            dir,
            clock,
            state: ActuatorState::off(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn set_direction_hw(&mut self, dir: Direction) -> Result<(), ActuatorError> {
        let level = match dir {
            Direction::Forward => PinState::from(pins::PUMP_DIR_FORWARD_HIGH),
        };
        self.dir
            .set_state(level)
            .map_err(|_| ActuatorError::DirectionWriteFailed)
    }

    fn set_duty_hw(&mut self, level: u8) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fraction(u16::from(level), u16::from(pins::PUMP_MAX_DUTY))
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }
}

impl<P, D, C> ActuatorPort for PumpDriver<P, D, C>
where
    P: SetDutyCycle,
    D: OutputPin,
    C: TimePort,
{
    fn initialize(&mut self) -> Result<(), ActuatorError> {
        let max_duty = self.pwm.max_duty_cycle();
        if max_duty < u16::from(pins::PUMP_MAX_DUTY) {
            return Err(ActuatorError::ResolutionTooCoarse { max_duty });
        }
        self.set_direction_hw(Direction::Forward)?;
        self.initialized = true;
        info!(
            "pump: initialized on GPIO {} (PWM) and GPIO {} (DIR)",
            pins::PUMP_PWM_GPIO,
            pins::PUMP_DIR_GPIO
        );
        Ok(())
    }

    fn set_intensity(&mut self, level: u8) -> Result<(), ActuatorError> {
        if !self.initialized {
            return Err(ActuatorError::NotInitialized);
        }
        self.set_duty_hw(level)?;
        self.state = ActuatorState {
            intensity: level,
            direction: Direction::Forward,
            last_updated_us: self.clock.uptime_us(),
        };
        debug!("pump: duty set to {}", level);
        Ok(())
    }

    fn state(&self) -> ActuatorState {
        self.state
    }
}
