//! Debounced persistence of the control values.
//!
//! Each channel owns a fixed-offset record in a small non-volatile region.
//! Mutations only restart a per-channel quiet timer; the value is written
//! once the channel has been untouched for the whole quiet period, coalescing
//! a burst of encoder turns into a single write. EEPROM endurance is the
//! constraint here.
//!
//! The record schema is validated for overlap at construction. Boot-time
//! reads that decode to an out-of-range value (erased storage reads as
//! `0xFFFF`) fall back to the configured default instead of propagating the
//! corrupt state.

use embassy_time::{Duration, Instant};
use embedded_storage::Storage;
use log::warn;

use crate::config::StorageLayout;
use crate::store::ControlId;

/// Bytes reserved per record. Only the first two hold the value.
pub const RECORD_SIZE: u32 = 16;

/// Invalid record schema, detected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    /// Two records share bytes.
    Overlap,
    /// A record extends past the reserved region.
    OutOfRegion,
    /// The backing storage is smaller than the reserved region.
    RegionTooLarge,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: u32,
    pending: i16,
    dirty_since: Option<Instant>,
}

/// Write-through mirror of the value store, debounced per channel.
pub struct PersistenceService<S> {
    storage: S,
    quiet: Duration,
    slots: [Slot; 2],
}

impl<S: Storage> PersistenceService<S> {
    /// Validate the record schema and bind the backing storage.
    pub fn new(storage: S, layout: &StorageLayout, quiet: Duration) -> Result<Self, SchemaError> {
        let offsets = [layout.intensity_offset, layout.temperature_offset];
        for offset in offsets {
            if offset + RECORD_SIZE > layout.region_size {
                return Err(SchemaError::OutOfRegion);
            }
        }
        if offsets[0].abs_diff(offsets[1]) < RECORD_SIZE {
            return Err(SchemaError::Overlap);
        }
        if layout.region_size as usize > storage.capacity() {
            return Err(SchemaError::RegionTooLarge);
        }

        let slot = |offset| Slot {
            offset,
            pending: 0,
            dirty_since: None,
        };
        Ok(Self {
            storage,
            quiet,
            slots: [slot(offsets[0]), slot(offsets[1])],
        })
    }

    /// Read the boot value of a channel.
    ///
    /// Anything that fails to read or decodes outside `[0, max]` yields
    /// `default` instead.
    pub fn load(&mut self, channel: ControlId, max: i16, default: i16) -> i16 {
        let offset = self.slots[index(channel)].offset;
        let mut raw = [0u8; 2];
        if self.storage.read(offset, &mut raw).is_err() {
            warn!("{}: storage read failed, using default", channel.as_str());
            return default;
        }
        let value = i16::from_le_bytes(raw);
        if value < 0 || value > max {
            warn!(
                "{}: stored value {} out of range, using default {}",
                channel.as_str(),
                value,
                default
            );
            return default;
        }
        value
    }

    /// Replace the quiet period. Pending commits keep their timestamps.
    pub fn set_quiet(&mut self, quiet: Duration) {
        self.quiet = quiet;
    }

    /// Note a mutated value, restarting the channel's quiet timer.
    pub fn note_change(&mut self, channel: ControlId, value: i16, now: Instant) {
        let slot = &mut self.slots[index(channel)];
        slot.pending = value;
        slot.dirty_since = Some(now);
    }

    /// Commit every channel whose quiet period has elapsed.
    ///
    /// A failed write stays dirty and is retried on the next call; it is
    /// never fatal to the loop. Returns the number of records written.
    pub fn service(&mut self, now: Instant) -> usize {
        let mut written = 0;
        for (i, channel) in ControlId::ALL.into_iter().enumerate() {
            let slot = &mut self.slots[i];
            let Some(since) = slot.dirty_since else {
                continue;
            };
            if since + self.quiet > now {
                continue;
            }
            let raw = slot.pending.to_le_bytes();
            match self.storage.write(slot.offset, &raw) {
                Ok(()) => {
                    slot.dirty_since = None;
                    written += 1;
                }
                Err(_) => {
                    warn!("{}: storage write failed, will retry", channel.as_str());
                }
            }
        }
        written
    }

    /// Whether any channel still awaits its commit.
    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(|slot| slot.dirty_since.is_some())
    }
}

const fn index(channel: ControlId) -> usize {
    match channel {
        ControlId::Intensity => 0,
        ControlId::Temperature => 1,
    }
}
