//! Device configuration
//!
//! A single immutable configuration struct, constructed once by the embedding
//! firmware and injected into the components that need it. No component reads
//! ad-hoc global state.

use embassy_time::Duration;
use heapless::String;

/// Wi-Fi credentials for the station interface.
///
/// Consumed by the network shell, not by the control core itself.
#[derive(Debug, Clone, Default)]
pub struct WifiConfig {
    pub ssid: String<32>,
    pub password: String<64>,
}

/// MQTT broker endpoint and session settings.
#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub host: String<64>,
    pub port: u16,
    pub username: String<32>,
    pub password: String<64>,
    pub client_id: String<32>,
    /// Base topic commands arrive on, e.g. `panneau_led/1`.
    pub base_topic: String<64>,
}

/// Byte layout of the persisted value records.
#[derive(Debug, Clone, Copy)]
pub struct StorageLayout {
    pub intensity_offset: u32,
    pub temperature_offset: u32,
    /// Total reserved region, leaving room for future records.
    pub region_size: u32,
}

/// Bounds, defaults and timing of the control loop.
#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    pub intensity_max: i16,
    pub temperature_max: i16,
    /// Fallback when no valid persisted intensity exists.
    pub intensity_default: i16,
    /// Fallback when no valid persisted temperature exists.
    pub temperature_default: i16,
    /// Quiet period before a dirty value is committed to storage. The
    /// controller applies this to its persistence service at construction.
    pub commit_quiet: Duration,
    /// Controller tick period.
    pub tick: Duration,
}

/// Full device configuration.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Network hostname, also announced to the OTA updater.
    pub hostname: String<64>,
    pub wifi: WifiConfig,
    pub mqtt: MqttConfig,
    pub storage: StorageLayout,
    pub control: ControlConfig,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: String::try_from("10.0.1.7").unwrap_or_default(),
            port: 1883,
            username: String::new(),
            password: String::new(),
            client_id: String::try_from("panneau_led/1").unwrap_or_default(),
            base_topic: String::try_from("panneau_led/1").unwrap_or_default(),
        }
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            intensity_offset: 0,
            temperature_offset: 16,
            region_size: 32,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            hostname: String::try_from("panneau_led/1").unwrap_or_default(),
            wifi: WifiConfig::default(),
            mqtt: MqttConfig::default(),
            storage: StorageLayout::default(),
            control: ControlConfig::default(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            intensity_max: 60,
            temperature_max: 60,
            intensity_default: 15,
            temperature_default: 15,
            commit_quiet: Duration::from_millis(500),
            tick: Duration::from_millis(5),
        }
    }
}
