mod tests {
    use cct_dimmer::config::ControlConfig;
    use cct_dimmer::store::{ControlId, OutOfRange, ValueStore};

    fn store() -> ValueStore {
        let config = ControlConfig::default();
        ValueStore::new(&config, 15, 15)
    }

    #[test]
    fn test_apply_delta_saturates_at_bounds() {
        let mut store = store();

        assert_eq!(store.apply_delta(ControlId::Intensity, 100), 60);
        assert_eq!(store.apply_delta(ControlId::Intensity, 1), 60);
        assert_eq!(store.apply_delta(ControlId::Intensity, -200), 0);
        assert_eq!(store.apply_delta(ControlId::Intensity, -1), 0);
        assert_eq!(store.apply_delta(ControlId::Intensity, i16::MAX), 60);
        assert_eq!(store.apply_delta(ControlId::Intensity, i16::MIN), 0);
    }

    #[test]
    fn test_delta_sequences_stay_in_range() {
        let mut store = store();
        let deltas = [5, -3, 60, -120, 7, 7, 7, -1, 100, -100, 1];
        for delta in deltas {
            let value = store.apply_delta(ControlId::Temperature, delta);
            assert!((0..=60).contains(&value));
        }
    }

    #[test]
    fn test_set_absolute_rejects_out_of_range() {
        let mut store = store();

        assert_eq!(
            store.set_absolute(ControlId::Temperature, 75),
            Err(OutOfRange {
                channel: ControlId::Temperature,
                value: 75,
                max: 60,
            })
        );
        assert_eq!(store.read(ControlId::Temperature), 15);

        assert_eq!(
            store.set_absolute(ControlId::Temperature, -1),
            Err(OutOfRange {
                channel: ControlId::Temperature,
                value: -1,
                max: 60,
            })
        );
        assert_eq!(store.read(ControlId::Temperature), 15);
    }

    #[test]
    fn test_set_absolute_is_idempotent() {
        let mut store = store();
        store.clear_output_dirty();
        assert!(!store.take_persist_dirty(ControlId::Intensity));

        assert_eq!(store.set_absolute(ControlId::Intensity, 20), Ok(()));
        assert!(store.output_dirty());
        assert!(store.take_persist_dirty(ControlId::Intensity));
        store.clear_output_dirty();

        // Same value again: no state change, no dirty marks
        assert_eq!(store.set_absolute(ControlId::Intensity, 20), Ok(()));
        assert!(!store.output_dirty());
        assert!(!store.take_persist_dirty(ControlId::Intensity));
    }

    #[test]
    fn test_delta_at_bound_does_not_mark_dirty() {
        let mut store = store();
        store.apply_delta(ControlId::Intensity, 60);
        store.clear_output_dirty();
        store.take_persist_dirty(ControlId::Intensity);

        assert_eq!(store.apply_delta(ControlId::Intensity, 1), 60);
        assert!(!store.output_dirty());
        assert!(!store.take_persist_dirty(ControlId::Intensity));
    }

    #[test]
    fn test_dirty_flags_are_per_channel() {
        let mut store = store();
        store.apply_delta(ControlId::Intensity, 1);
        assert!(store.take_persist_dirty(ControlId::Intensity));
        assert!(!store.take_persist_dirty(ControlId::Temperature));
    }

    #[test]
    fn test_boot_values_clamped() {
        let config = ControlConfig::default();
        let store = ValueStore::new(&config, 100, -4);
        assert_eq!(store.read(ControlId::Intensity), 60);
        assert_eq!(store.read(ControlId::Temperature), 0);
    }

    #[test]
    fn test_channel_names_round_trip() {
        for channel in ControlId::ALL {
            assert_eq!(ControlId::parse_from_str(channel.as_str()), Some(channel));
        }
        assert_eq!(ControlId::parse_from_str("warm"), None);
    }
}
