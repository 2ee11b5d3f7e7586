//! One-shot pump peripheral initialization.
//!
//! Configures the LEDC timer/channel driving the pump's IA input and the
//! IB direction GPIO.  Called once from `main()`; the returned handles are
//! the only way to reach the pump hardware and are moved straight into the
//! [`PumpDriver`](crate::drivers::pump::PumpDriver).
//!
//! On host targets the handles are in-memory simulations implementing the
//! same `embedded-hal` traits.

use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerConfigFailed(i32),
    LedcChannelConfigFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerConfigFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelConfigFailed(rc) => {
                write!(f, "LEDC channel config failed (rc={})", rc)
            }
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

// ── ESP-IDF handles ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub type PumpPwm = esp_idf_hal::ledc::LedcDriver<'static>;

#[cfg(target_os = "espidf")]
pub type PumpDirPin =
    esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::Gpio26, esp_idf_hal::gpio::Output>;

/// Configure LEDC timer 0 (1 kHz, 8-bit) on channel 0 / GPIO 25 and GPIO 26
/// as a push-pull output.  The channel starts at duty 0.
#[cfg(target_os = "espidf")]
pub fn init_pump_peripherals(
    timer: esp_idf_hal::ledc::TIMER0,
    channel: esp_idf_hal::ledc::CHANNEL0,
    pwm_pin: esp_idf_hal::gpio::Gpio25,
    dir_pin: esp_idf_hal::gpio::Gpio26,
) -> Result<(PumpPwm, PumpDirPin), HwInitError> {
    use esp_idf_hal::gpio::PinDriver;
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_hal::units::Hertz;

    let timer_cfg = TimerConfig::new()
        .frequency(Hertz(pins::PUMP_PWM_FREQ_HZ))
        .resolution(Resolution::Bits8);
    let timer = LedcTimerDriver::new(timer, &timer_cfg)
        .map_err(|e| HwInitError::LedcTimerConfigFailed(e.code()))?;

    let pwm = LedcDriver::new(channel, timer, pwm_pin)
        .map_err(|e| HwInitError::LedcChannelConfigFailed(e.code()))?;

    let dir = PinDriver::output(dir_pin).map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;

    info!(
        "hw_init: pump LEDC configured (GPIO {} @ {} Hz, {}-bit), DIR on GPIO {}",
        pins::PUMP_PWM_GPIO,
        pins::PUMP_PWM_FREQ_HZ,
        pins::PWM_RESOLUTION_BITS,
        pins::PUMP_DIR_GPIO
    );
    Ok((pwm, dir))
}

// ── Simulation handles ────────────────────────────────────────

/// In-memory LEDC channel used on non-espidf targets.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug)]
pub struct SimPwm {
    duty: u16,
}

#[cfg(not(target_os = "espidf"))]
impl SimPwm {
    /// Last programmed duty register value.
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::pwm::ErrorType for SimPwm {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::pwm::SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(pins::PUMP_MAX_DUTY)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// In-memory direction GPIO used on non-espidf targets.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug)]
pub struct SimPin {
    high: bool,
}

#[cfg(not(target_os = "espidf"))]
impl SimPin {
    pub fn is_high(&self) -> bool {
        self.high
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
pub type PumpPwm = SimPwm;

#[cfg(not(target_os = "espidf"))]
pub type PumpDirPin = SimPin;

#[cfg(not(target_os = "espidf"))]
pub fn init_pump_peripherals() -> Result<(PumpPwm, PumpDirPin), HwInitError> {
    info!("hw_init(sim): pump PWM and DIR simulated");
    // GPIO outputs power up low.
    Ok((SimPwm { duty: 0 }, SimPin { high: false }))
}
