//! Water Pump Controller: main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PumpDriver        LogEventSink   AccessPoint    HttpTransport │
//! │  (ActuatorPort)    (EventSink)    (Connectivity) (Transport)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   BootSequencer → ActuatorGuard ← CommandHandler        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Main task: StatusAnnouncer                                    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs};
use log::{error, info, warn};

use waterpump::adapters::http::HttpTransport;
use waterpump::adapters::log_sink::LogEventSink;
use waterpump::adapters::time::Esp32TimeAdapter;
use waterpump::adapters::wifi::AccessPoint;
use waterpump::app::announcer::StatusAnnouncer;
use waterpump::app::commands::CommandHandler;
use waterpump::app::guard::ActuatorGuard;
use waterpump::app::ports::TimePort;
use waterpump::boot::BootSequencer;
use waterpump::config::SystemConfig;
use waterpump::drivers::hw_init::{self, PumpDirPin, PumpPwm};
use waterpump::drivers::pump::PumpDriver;

const NVS_NAMESPACE: &str = "pump";
const NVS_CONFIG_KEY: &str = "cfg";

type Pump = PumpDriver<PumpPwm, PumpDirPin, Esp32TimeAdapter>;

/// Everything that must stay alive for the command surface to keep serving.
struct Service {
    guard: Arc<ActuatorGuard<Pump>>,
    _handler: Arc<CommandHandler<Pump, LogEventSink>>,
    _ap: AccessPoint,
    _transport: HttpTransport,
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WaterPump v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = load_config(&nvs);

    // ── 3. Boot sequence ──────────────────────────────────────
    let sink = Arc::new(LogEventSink::new());
    let service = match start_service(peripherals, sysloop, nvs, &config, &sink) {
        Ok(service) => service,
        Err(e) => fatal(&e),
    };

    info!("System ready. Serving commands on port {}.", config.http_port);

    // ── 4. Steady state: request handlers run on the httpd task;
    //       this task only announces status.
    let clock = Esp32TimeAdapter::new();
    let mut announcer = StatusAnnouncer::new(config.status_announce_interval_secs);
    loop {
        announcer.tick(clock.uptime_secs(), &service.guard, sink.as_ref());
        std::thread::sleep(Duration::from_secs(1));
    }
}

/// Run both boot transitions.  Any error here is fatal.
fn start_service(
    peripherals: Peripherals,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
    config: &SystemConfig,
    sink: &Arc<LogEventSink>,
) -> waterpump::error::Result<Service> {
    config.validate()?;
    let mut boot = BootSequencer::new();

    // Uninitialized → DriverReady: pump configured and forced off before
    // the radio is even powered.
    let (pwm, dir) = hw_init::init_pump_peripherals(
        peripherals.ledc.timer0,
        peripherals.ledc.channel0,
        peripherals.pins.gpio25,
        peripherals.pins.gpio26,
    )?;
    let pump = PumpDriver::new(pwm, dir, Esp32TimeAdapter::new());
    let guard = boot.bring_up_driver(pump, sink.as_ref())?;

    // DriverReady → ServiceReady
    let mut ap = AccessPoint::new(config, peripherals.modem, sysloop, Some(nvs));
    let mut transport = HttpTransport::new(config.http_port);
    let handler = boot.bring_up_service(&guard, sink, &mut ap, &mut transport)?;

    Ok(Service {
        guard,
        _handler: handler,
        _ap: ap,
        _transport: transport,
    })
}

fn load_config(nvs: &EspDefaultNvsPartition) -> SystemConfig {
    let store = match EspNvs::new(nvs.clone(), NVS_NAMESPACE, true) {
        Ok(store) => store,
        Err(e) => {
            warn!("NVS open failed ({}), using defaults", e);
            return SystemConfig::default();
        }
    };

    let mut buf = [0u8; 256];
    match store.get_raw(NVS_CONFIG_KEY, &mut buf) {
        Ok(Some(bytes)) => match SystemConfig::from_postcard(bytes) {
            Ok(cfg) => {
                info!("Config loaded from NVS");
                cfg
            }
            Err(e) => {
                warn!("NVS config rejected ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        Ok(None) => {
            info!("No stored config, using defaults");
            SystemConfig::default()
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

/// A half-initialized actuator must not keep running: log and restart.
fn fatal(err: &waterpump::error::Error) -> ! {
    error!("FATAL: {}; restarting", err);
    // Give the UART a moment to drain before the reset.
    std::thread::sleep(Duration::from_millis(200));
    esp_idf_hal::reset::restart()
}
