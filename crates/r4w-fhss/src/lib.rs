//! # R4W FHSS
//!
//! Frequency hopping support for R4W (Rust for Waveforms): regulatory domain
//! tables, seed-reproducible hop sequences, and the shared hop table a radio
//! driver walks once per hop interval.
//!
//! ## Overview
//!
//! Both ends of a link derive the same hop sequence from a regulatory domain
//! and a 32-bit seed. The sequence is a 256-slot buffer of channel indices
//! split into blocks of `channel_count` slots; each block begins with the
//! sync channel and visits every other channel once.
//!
//! ```text
//! FhssConfig ──▶ FhssController ──generate──▶ HopPlan ──publish──▶ HopTable
//!                 │  domain table                                   │
//!                 │  override codes                                 ▼
//!                 └─ RandomSource (LCG)                  hop driver: next_channel()
//! ```
//!
//! ## Example
//!
//! ```rust
//! use r4w_fhss::{DomainSelector, FhssController, RadioChip};
//!
//! let controller = FhssController::new(
//!     RadioChip::Sx127x,
//!     &DomainSelector::Name("EU868".into()),
//!     0x1234,
//! )?;
//!
//! // Hand the table to the hop driver
//! let table = controller.table();
//! assert!(table.on_sync_channel());
//! let channel = table.next_channel();
//! assert!(channel < 13);
//! # Ok::<(), r4w_fhss::FhssError>(())
//! ```
//!
//! ## Features
//!
//! - `std-rng` - [`rng::StdRandomSource`], generation driven by `rand` (default)

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod hopper;
pub mod remap;
pub mod rng;
pub mod sequence;

// Re-export main types
pub use config::FhssConfig;
pub use controller::FhssController;
pub use domain::{DomainSelector, DomainSpec, FrequencyDomain, RadioChip, EU868};
pub use error::{FhssError, Result};
pub use hopper::HopTable;
pub use remap::{OverrideCodes, OverrideState};
pub use rng::{LinearCongruential, RandomSource};
pub use sequence::{generate, HopPlan, HopSequence, SEQUENCE_CAPACITY, SPREAD_SCALE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::controller::FhssController;
    pub use crate::domain::{DomainSelector, FrequencyDomain, RadioChip};
    pub use crate::hopper::HopTable;
    pub use crate::remap::OverrideCodes;
    pub use crate::sequence::{HopPlan, HopSequence};
}
