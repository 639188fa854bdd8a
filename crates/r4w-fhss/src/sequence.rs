//! Hop sequence generation
//!
//! A hop sequence is a fixed-capacity buffer of channel indices split into
//! consecutive blocks of `channel_count` slots. Every block starts with the
//! sync channel; the remaining slots hold every other channel exactly once,
//! in a seed-dependent order.
//!
//! ## Generation
//!
//! ```text
//! n = channel_count, s = n / 2 + 1
//!
//! skeleton:  | s 1 2 .. s-1 0 s+1 .. n-1 | s 1 2 .. | ...
//!              ^ slot 0 of a block holds the sync channel,
//!                slot s holds channel 0
//!
//! scramble:  for every slot i that is not a block start
//!                r = next(n - 1) + 1
//!                swap(i, block_start(i) + r)
//! ```
//!
//! The scramble is a run of random transpositions, not a uniform shuffle.
//! Radios in the field rely on this exact sequence of swaps, so the same
//! `(domain, seed)` must keep producing the same buffer.

use crate::domain::FrequencyDomain;
use crate::error::Result;
use crate::rng::RandomSource;
use std::ops::Index;
use tracing::{info, trace};

/// Number of slots in the hop sequence buffer
pub const SEQUENCE_CAPACITY: usize = 256;

/// Fixed-point scale applied to the channel spacing
pub const SPREAD_SCALE: u64 = 256;

/// Ordered channel indices, grouped into blocks of `channel_count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopSequence<const N: usize = SEQUENCE_CAPACITY> {
    slots: [u8; N],
    len: usize,
    channel_count: u8,
}

impl<const N: usize> HopSequence<N> {
    /// Buffer capacity
    pub const fn capacity() -> usize {
        N
    }

    /// Used slots: whole blocks only
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no block fits (never the case for a validated domain)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Channels per block
    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Number of complete blocks
    pub fn block_count(&self) -> usize {
        self.len / usize::from(self.channel_count)
    }

    /// The used part of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.slots[..self.len]
    }

    /// Iterate over blocks
    pub fn blocks(&self) -> std::slice::ChunksExact<'_, u8> {
        self.as_slice().chunks_exact(usize::from(self.channel_count))
    }

    /// Channel at `index`, if within the used length
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    fn skeleton(channel_count: u8, sync_channel: u8) -> Self {
        let n = usize::from(channel_count);
        let sync = usize::from(sync_channel);
        let len = (N / n) * n;
        let mut slots = [0u8; N];

        for (i, slot) in slots.iter_mut().enumerate().take(len) {
            let position = i % n;
            *slot = if position == 0 {
                sync_channel
            } else if position == sync {
                0
            } else {
                position as u8
            };
        }

        Self {
            slots,
            len,
            channel_count,
        }
    }

    fn scramble<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let n = usize::from(self.channel_count);
        let bound = u32::from(self.channel_count) - 1;

        for i in 0..self.len {
            if i % n == 0 {
                continue;
            }
            let offset = (i / n) * n;
            let r = rng.next_below(bound) as usize + 1;
            self.slots.swap(i, offset + r);
        }
    }
}

impl<const N: usize> Index<usize> for HopSequence<N> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

/// A generated hop plan: the sequence plus the values derived from its domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopPlan<const N: usize = SEQUENCE_CAPACITY> {
    domain: FrequencyDomain,
    seed: u32,
    sequence: HopSequence<N>,
    sync_channel: u8,
    freq_spread: u64,
}

impl<const N: usize> HopPlan<N> {
    /// Build the hop plan for `domain` and `seed`.
    ///
    /// `rng` is reseeded with `seed` before the first draw, so its prior
    /// state never leaks into the result.
    pub fn generate<R: RandomSource + ?Sized>(
        domain: &FrequencyDomain,
        seed: u32,
        rng: &mut R,
    ) -> Result<Self> {
        domain.validate(N)?;

        let sync_channel = domain.sync_channel();
        let freq_spread = u64::from(domain.freq_stop - domain.freq_start) * SPREAD_SCALE
            / (u64::from(domain.channel_count) - 1);

        rng.seed(seed);
        let mut sequence = HopSequence::<N>::skeleton(domain.channel_count, sync_channel);
        sequence.scramble(rng);

        info!(
            "Setting {} mode: {} channels, sync channel {}",
            domain.name, domain.channel_count, sync_channel
        );
        trace_sequence(sequence.as_slice());

        Ok(Self {
            domain: domain.clone(),
            seed,
            sequence,
            sync_channel,
            freq_spread,
        })
    }

    /// Domain the plan was generated for
    pub fn domain(&self) -> &FrequencyDomain {
        &self.domain
    }

    /// Seed the plan was generated from
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The hop sequence
    pub fn sequence(&self) -> &HopSequence<N> {
        &self.sequence
    }

    /// Sync channel index
    pub fn sync_channel(&self) -> u8 {
        self.sync_channel
    }

    /// Channel spacing in register units, scaled by [`SPREAD_SCALE`]
    pub fn freq_spread(&self) -> u64 {
        self.freq_spread
    }

    /// Register value for `channel`.
    pub fn channel_frequency(&self, channel: u8) -> u32 {
        let offset = self.freq_spread * u64::from(channel) / SPREAD_SCALE;
        self.domain.freq_start + offset as u32
    }

    /// Register value of the sync channel, used before the link is up.
    pub fn initial_frequency(&self) -> u32 {
        self.channel_frequency(self.sync_channel)
    }
}

/// Generate a plan with the default buffer capacity.
pub fn generate<R: RandomSource + ?Sized>(
    domain: &FrequencyDomain,
    seed: u32,
    rng: &mut R,
) -> Result<HopPlan> {
    HopPlan::<SEQUENCE_CAPACITY>::generate(domain, seed, rng)
}

fn trace_sequence(sequence: &[u8]) {
    for line in sequence.chunks(10) {
        let rendered: Vec<String> = line.iter().map(|ch| ch.to_string()).collect();
        trace!("{}", rendered.join(" "));
    }
}
