//! Wi-Fi SoftAP adapter.
//!
//! Implements [`ConnectivityPort`]: the controller hosts its own network
//! and command clients associate with it directly.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF Wi-Fi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub for host-side tests.

use log::info;

use crate::app::ports::ConnectivityPort;
use crate::config::SystemConfig;
use crate::error::ConnectivityError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::eventloop::EspSystemEventLoop;
#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::EspDefaultNvsPartition;
#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Access point adapter
// ───────────────────────────────────────────────────────────────

pub struct AccessPoint {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    channel: u8,
    max_connections: u16,
    up: bool,
    #[cfg(target_os = "espidf")]
    modem: Option<esp_idf_hal::modem::Modem>,
    #[cfg(target_os = "espidf")]
    sysloop: EspSystemEventLoop,
    #[cfg(target_os = "espidf")]
    nvs: Option<EspDefaultNvsPartition>,
    /// Kept alive for the process lifetime; dropping it tears the AP down.
    #[cfg(target_os = "espidf")]
    wifi: Option<BlockingWifi<EspWifi<'static>>>,
}

impl AccessPoint {
    #[cfg(target_os = "espidf")]
    pub fn new(
        config: &SystemConfig,
        modem: esp_idf_hal::modem::Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Self {
        Self {
            ssid: config.ap_ssid.clone(),
            password: config.ap_password.clone(),
            channel: config.ap_channel,
            max_connections: config.ap_max_connections,
            up: false,
            modem: Some(modem),
            sysloop,
            nvs,
            wifi: None,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            ssid: config.ap_ssid.clone(),
            password: config.ap_password.clone(),
            channel: config.ap_channel,
            max_connections: config.ap_max_connections,
            up: false,
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration};

        let modem = self.modem.take().ok_or(ConnectivityError::RadioUnavailable)?;
        let fail = |e: esp_idf_svc::sys::EspError| ConnectivityError::StartFailed(e.code());

        let driver = EspWifi::new(modem, self.sysloop.clone(), self.nvs.take()).map_err(fail)?;
        let mut wifi = BlockingWifi::wrap(driver, self.sysloop.clone()).map_err(fail)?;

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            channel: self.channel,
            auth_method,
            max_connections: self.max_connections,
            ..Default::default()
        }))
        .map_err(fail)?;

        wifi.start().map_err(fail)?;
        wifi.wait_netif_up().map_err(fail)?;

        if let Ok(ip) = wifi.wifi().ap_netif().get_ip_info() {
            info!("WiFi: AP address {}", ip.ip);
        }
        self.wifi = Some(wifi);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): access point simulated");
        Ok(())
    }
}

impl ConnectivityPort for AccessPoint {
    fn start(&mut self) -> Result<(), ConnectivityError> {
        validate_ssid(&self.ssid)?;
        validate_password(&self.password)?;
        if self.up {
            return Ok(());
        }

        self.platform_start()?;
        self.up = true;
        info!(
            "WiFi: AP '{}' up on channel {} ({}, max {} clients)",
            self.ssid,
            self.channel,
            if self.password.is_empty() { "open" } else { "WPA2" },
            self.max_connections
        );
        Ok(())
    }

    fn is_up(&self) -> bool {
        self.up
    }
}
