//! Error types for the FHSS crate.

use thiserror::Error;

/// FHSS error type
#[derive(Error, Debug)]
pub enum FhssError {
    /// Domain index outside the radio's domain table
    #[error("invalid domain index {index}: table has {available} entries")]
    InvalidDomain {
        /// Requested index
        index: usize,
        /// Number of domains in the table
        available: usize,
    },

    /// Domain name not present in the radio's domain table
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// Channel count too small to derive a channel spacing
    #[error(
        "degenerate domain: {channel_count} channel(s), at least {min} required",
        min = crate::domain::MIN_CHANNEL_COUNT
    )]
    DegenerateDomain {
        /// Offending channel count
        channel_count: u8,
    },

    /// Stop frequency not above start frequency
    #[error("invalid frequency range: stop {freq_stop} <= start {freq_start}")]
    InvalidRange {
        /// Start frequency (register units)
        freq_start: u32,
        /// Stop frequency (register units)
        freq_stop: u32,
    },

    /// One block of channels does not fit the sequence buffer
    #[error("{channel_count} channels exceed sequence capacity {capacity}")]
    CapacityExceeded {
        /// Offending channel count
        channel_count: u8,
        /// Sequence buffer capacity
        capacity: usize,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// YAML parse/emit error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FHSS operations
pub type Result<T> = std::result::Result<T, FhssError>;
