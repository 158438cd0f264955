//! Bounded value store for the two control channels.
//!
//! The controller loop exclusively owns the store; encoders and network
//! commands only submit deltas or targets. Every successful mutation marks
//! the channel dirty for both the output stage and the persistence layer.

use crate::config::ControlConfig;

const CHANNEL_NAME_INTENSITY: &str = "intensity";
const CHANNEL_NAME_TEMPERATURE: &str = "temperature";

/// The two controllable channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Intensity,
    Temperature,
}

impl ControlId {
    pub const ALL: [Self; 2] = [Self::Intensity, Self::Temperature];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intensity => CHANNEL_NAME_INTENSITY,
            Self::Temperature => CHANNEL_NAME_TEMPERATURE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            CHANNEL_NAME_INTENSITY => Some(Self::Intensity),
            CHANNEL_NAME_TEMPERATURE => Some(Self::Temperature),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Intensity => 0,
            Self::Temperature => 1,
        }
    }
}

/// Rejected absolute write: the value lies outside `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub channel: ControlId,
    pub value: i16,
    pub max: i16,
}

#[derive(Debug, Clone, Copy)]
struct ControlValue {
    current: i16,
    max: i16,
}

/// Current intensity and temperature, clamped to their bounds.
#[derive(Debug)]
pub struct ValueStore {
    values: [ControlValue; 2],
    dirty_output: bool,
    dirty_persist: [bool; 2],
}

impl ValueStore {
    /// Build the store from configured bounds and restored boot values.
    ///
    /// Boot values are assumed already validated by the persistence layer
    /// and are clamped here as a last resort.
    pub fn new(config: &ControlConfig, intensity: i16, temperature: i16) -> Self {
        Self {
            values: [
                ControlValue {
                    current: intensity.clamp(0, config.intensity_max),
                    max: config.intensity_max,
                },
                ControlValue {
                    current: temperature.clamp(0, config.temperature_max),
                    max: config.temperature_max,
                },
            ],
            dirty_output: true,
            dirty_persist: [false; 2],
        }
    }

    /// Current value of a channel. Never fails.
    pub const fn read(&self, channel: ControlId) -> i16 {
        self.values[channel.index()].current
    }

    /// Configured maximum of a channel.
    pub const fn max(&self, channel: ControlId) -> i16 {
        self.values[channel.index()].max
    }

    /// Apply a relative step, saturating at the bounds.
    ///
    /// Returns the new value. A delta pushing past a bound is absorbed, not
    /// wrapped; at a bound the value is unchanged and nothing is marked dirty.
    pub fn apply_delta(&mut self, channel: ControlId, delta: i16) -> i16 {
        let slot = self.values[channel.index()];
        let next = slot.current.saturating_add(delta).clamp(0, slot.max);
        if next != slot.current {
            self.values[channel.index()].current = next;
            self.mark_dirty(channel);
        }
        next
    }

    /// Replace the value of a channel, rejecting anything outside `[0, max]`.
    ///
    /// Idempotent: writing the value already held leaves the dirty flags
    /// untouched.
    pub fn set_absolute(&mut self, channel: ControlId, value: i16) -> Result<(), OutOfRange> {
        let slot = self.values[channel.index()];
        if value < 0 || value > slot.max {
            return Err(OutOfRange {
                channel,
                value,
                max: slot.max,
            });
        }
        if value != slot.current {
            self.values[channel.index()].current = value;
            self.mark_dirty(channel);
        }
        Ok(())
    }

    /// Whether the output stage needs a recompute.
    pub const fn output_dirty(&self) -> bool {
        self.dirty_output
    }

    /// Clear the output dirty flag after the drive levels were applied.
    pub fn clear_output_dirty(&mut self) {
        self.dirty_output = false;
    }

    /// Take the persistence dirty flag for a channel, clearing it.
    pub fn take_persist_dirty(&mut self, channel: ControlId) -> bool {
        core::mem::take(&mut self.dirty_persist[channel.index()])
    }

    fn mark_dirty(&mut self, channel: ControlId) {
        self.dirty_output = true;
        self.dirty_persist[channel.index()] = true;
    }
}
