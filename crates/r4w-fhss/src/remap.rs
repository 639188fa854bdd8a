//! Domain override codes
//!
//! A peer (or a configuration channel) can move the hop band with three small
//! codes instead of raw frequencies:
//!
//! | Code         | Values | Meaning                                      |
//! |--------------|--------|----------------------------------------------|
//! | `start_code` | 0..=5  | 750, 800, 850, 900, 950, 1000 MHz            |
//! | `stop_code`  | 0..=5  | same table, applied to the stop bound        |
//! | `count_code` | 0..=3  | 10, 20, 30, 40 channels                      |
//!
//! Any other value leaves that field of the domain as it was.

use crate::domain::{FrequencyDomain, RadioChip};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Band edges selectable by `start_code` / `stop_code`, in Hz
pub const BAND_EDGES_HZ: [u64; 6] = [
    750_000_000,
    800_000_000,
    850_000_000,
    900_000_000,
    950_000_000,
    1_000_000_000,
];

/// Channel counts selectable by `count_code`
pub const CHANNEL_COUNTS: [u8; 4] = [10, 20, 30, 40];

/// Raw override codes as received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OverrideCodes {
    /// Index into [`BAND_EDGES_HZ`] for the start frequency
    pub start_code: u8,
    /// Index into [`BAND_EDGES_HZ`] for the stop frequency
    pub stop_code: u8,
    /// Index into [`CHANNEL_COUNTS`]
    pub count_code: u8,
}

impl OverrideCodes {
    /// Bundle three codes.
    pub fn new(start_code: u8, stop_code: u8, count_code: u8) -> Self {
        Self {
            start_code,
            stop_code,
            count_code,
        }
    }

    /// Decoded start frequency in Hz, `None` if the code is not in the table
    pub fn start_hz(&self) -> Option<u64> {
        BAND_EDGES_HZ.get(usize::from(self.start_code)).copied()
    }

    /// Decoded stop frequency in Hz, `None` if the code is not in the table
    pub fn stop_hz(&self) -> Option<u64> {
        BAND_EDGES_HZ.get(usize::from(self.stop_code)).copied()
    }

    /// Decoded channel count, `None` if the code is not in the table
    pub fn channel_count(&self) -> Option<u8> {
        CHANNEL_COUNTS.get(usize::from(self.count_code)).copied()
    }

    /// Return `domain` with every recognised code applied.
    ///
    /// Unrecognised codes are ignored. The result is not validated.
    pub fn remap(&self, domain: &FrequencyDomain, chip: RadioChip) -> FrequencyDomain {
        let mut remapped = domain.clone();

        match self.start_hz() {
            Some(hz) => remapped.freq_start = chip.hz_to_reg(hz),
            None => debug!("Ignoring start code {}", self.start_code),
        }
        match self.stop_hz() {
            Some(hz) => remapped.freq_stop = chip.hz_to_reg(hz),
            None => debug!("Ignoring stop code {}", self.stop_code),
        }
        match self.channel_count() {
            Some(count) => remapped.channel_count = count,
            None => debug!("Ignoring count code {}", self.count_code),
        }

        debug!(
            "Remapped {}: freq_start = {}, freq_stop = {}, channels = {}",
            remapped.name, remapped.freq_start, remapped.freq_stop, remapped.channel_count
        );
        remapped
    }
}

/// Codes of the last override that was applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideState {
    last: Option<OverrideCodes>,
}

impl OverrideState {
    /// Last applied codes, if any override has been applied
    pub fn last(&self) -> Option<OverrideCodes> {
        self.last
    }

    /// Record `codes` as applied.
    pub fn record(&mut self, codes: OverrideCodes) {
        self.last = Some(codes);
    }

    /// Forget the last override (domain reselected from the table).
    pub fn clear(&mut self) {
        self.last = None;
    }

    /// True unless `codes` equal the last applied codes exactly.
    pub fn has_changed(&self, codes: &OverrideCodes) -> bool {
        self.last.as_ref() != Some(codes)
    }
}
