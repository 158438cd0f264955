mod tests {
    use cct_dimmer::config::{ControlConfig, DeviceConfig, StorageLayout};
    use embassy_time::Duration;

    #[test]
    fn test_control_defaults() {
        let config = ControlConfig::default();
        assert_eq!(config.intensity_max, 60);
        assert_eq!(config.temperature_max, 60);
        assert_eq!(config.intensity_default, 15);
        assert_eq!(config.temperature_default, 15);
        assert_eq!(config.commit_quiet, Duration::from_millis(500));
    }

    #[test]
    fn test_storage_layout_defaults() {
        let layout = StorageLayout::default();
        assert_eq!(layout.intensity_offset, 0);
        assert_eq!(layout.temperature_offset, 16);
        assert_eq!(layout.region_size, 32);
    }

    #[test]
    fn test_device_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.hostname.as_str(), "panneau_led/1");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.mqtt.base_topic.as_str(), "panneau_led/1");
        assert!(config.wifi.ssid.is_empty());
    }
}
