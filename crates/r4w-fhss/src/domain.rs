//! Regulatory domains and radio chip frequency units
//!
//! Each supported radio chip carries a closed table of regulatory domains.
//! Frequencies are stored in the chip's synthesizer register units so the
//! hop driver can program them without further conversion.
//!
//! | Chip   | Domain | Range (MHz)        | Channels |
//! |--------|--------|--------------------|----------|
//! | SX127x | AU915  | 915.500 - 926.900  | 20       |
//! | SX127x | FCC915 | 903.500 - 926.900  | 40       |
//! | SX127x | EU868  | 865.275 - 869.575  | 13       |
//! | SX127x | IN866  | 865.375 - 866.950  | 4        |
//! | SX127x | AU433  | 433.420 - 434.420  | 3        |
//! | SX127x | EU433  | 433.100 - 434.450  | 3        |
//! | SX128x | ISM2G4 | 2400.4 - 2479.4    | 80       |
//! | SX128x | CE_LBT | 2400.4 - 2479.4    | 80       |

use crate::error::{FhssError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Name of the European 868 MHz domain.
pub const EU868: &str = "EU868";

/// Fewest channels a domain may have.
///
/// With two channels the sync index (`2 / 2 + 1 = 2`) is not a valid channel.
pub const MIN_CHANNEL_COUNT: u8 = 3;

/// Radio transceiver family, which fixes the frequency register units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioChip {
    /// Semtech SX1276/77/78/79 (sub-GHz)
    #[default]
    Sx127x,
    /// Semtech SX1280/81 (2.4 GHz)
    Sx128x,
}

impl RadioChip {
    /// Crystal frequency in Hz
    pub const fn xtal_hz(self) -> u64 {
        match self {
            RadioChip::Sx127x => 32_000_000,
            RadioChip::Sx128x => 52_000_000,
        }
    }

    /// Resolution of the frequency register in bits
    pub const fn register_bits(self) -> u32 {
        match self {
            RadioChip::Sx127x => 19,
            RadioChip::Sx128x => 18,
        }
    }

    /// Convert a frequency in Hz to register units (truncating).
    pub const fn hz_to_reg(self, freq_hz: u64) -> u32 {
        ((freq_hz << self.register_bits()) / self.xtal_hz()) as u32
    }

    /// Convert register units back to Hz (truncating).
    pub const fn reg_to_hz(self, reg: u32) -> u64 {
        (reg as u64 * self.xtal_hz()) >> self.register_bits()
    }

    /// Domain table for this chip
    pub fn domains(self) -> &'static [DomainSpec] {
        match self {
            RadioChip::Sx127x => SX127X_DOMAINS,
            RadioChip::Sx128x => SX128X_DOMAINS,
        }
    }

    /// Look up a domain by table index.
    pub fn domain(self, index: usize) -> Result<FrequencyDomain> {
        let table = self.domains();
        table
            .get(index)
            .map(|spec| spec.to_domain(self))
            .ok_or(FhssError::InvalidDomain {
                index,
                available: table.len(),
            })
    }

    /// Look up a domain by name (case-insensitive).
    pub fn domain_by_name(self, name: &str) -> Result<FrequencyDomain> {
        self.domains()
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .map(|spec| spec.to_domain(self))
            .ok_or_else(|| FhssError::UnknownDomain(name.to_string()))
    }

    /// Resolve a configuration selector against this chip's table.
    pub fn select(self, selector: &DomainSelector) -> Result<FrequencyDomain> {
        match selector {
            DomainSelector::Index(index) => self.domain(*index),
            DomainSelector::Name(name) => self.domain_by_name(name),
        }
    }
}

impl fmt::Display for RadioChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioChip::Sx127x => write!(f, "sx127x"),
            RadioChip::Sx128x => write!(f, "sx128x"),
        }
    }
}

impl FromStr for RadioChip {
    type Err = FhssError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sx127x" | "sx1276" | "sx1278" | "900" => Ok(RadioChip::Sx127x),
            "sx128x" | "sx1280" | "2400" | "2g4" => Ok(RadioChip::Sx128x),
            _ => Err(FhssError::Config(format!(
                "unknown radio chip: {}. Use sx127x or sx128x",
                s
            ))),
        }
    }
}

/// Static domain table entry, frequencies in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSpec {
    /// Domain label
    pub name: &'static str,
    /// Lowest channel frequency in Hz
    pub freq_start_hz: u64,
    /// Highest channel frequency in Hz
    pub freq_stop_hz: u64,
    /// Number of channels
    pub channel_count: u8,
}

impl DomainSpec {
    /// Convert to register units for `chip`.
    pub fn to_domain(&self, chip: RadioChip) -> FrequencyDomain {
        FrequencyDomain {
            name: Cow::Borrowed(self.name),
            freq_start: chip.hz_to_reg(self.freq_start_hz),
            freq_stop: chip.hz_to_reg(self.freq_stop_hz),
            channel_count: self.channel_count,
        }
    }
}

const SX127X_DOMAINS: &[DomainSpec] = &[
    DomainSpec { name: "AU915", freq_start_hz: 915_500_000, freq_stop_hz: 926_900_000, channel_count: 20 },
    DomainSpec { name: "FCC915", freq_start_hz: 903_500_000, freq_stop_hz: 926_900_000, channel_count: 40 },
    DomainSpec { name: EU868, freq_start_hz: 865_275_000, freq_stop_hz: 869_575_000, channel_count: 13 },
    DomainSpec { name: "IN866", freq_start_hz: 865_375_000, freq_stop_hz: 866_950_000, channel_count: 4 },
    DomainSpec { name: "AU433", freq_start_hz: 433_420_000, freq_stop_hz: 434_420_000, channel_count: 3 },
    DomainSpec { name: "EU433", freq_start_hz: 433_100_000, freq_stop_hz: 434_450_000, channel_count: 3 },
];

const SX128X_DOMAINS: &[DomainSpec] = &[
    DomainSpec { name: "ISM2G4", freq_start_hz: 2_400_400_000, freq_stop_hz: 2_479_400_000, channel_count: 80 },
    DomainSpec { name: "CE_LBT", freq_start_hz: 2_400_400_000, freq_stop_hz: 2_479_400_000, channel_count: 80 },
];

/// Active frequency domain, frequencies in register units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyDomain {
    /// Domain label
    pub name: Cow<'static, str>,
    /// Frequency of channel 0
    pub freq_start: u32,
    /// Frequency of the last channel
    pub freq_stop: u32,
    /// Number of channels
    pub channel_count: u8,
}

impl FrequencyDomain {
    /// Build a custom domain.
    pub fn new(name: impl Into<Cow<'static, str>>, freq_start: u32, freq_stop: u32, channel_count: u8) -> Self {
        Self {
            name: name.into(),
            freq_start,
            freq_stop,
            channel_count,
        }
    }

    /// Whether this is the EU 868 MHz domain (duty-cycle limited).
    pub fn is_eu868(&self) -> bool {
        self.name == EU868
    }

    /// Channel reserved for sync packets and initial acquisition.
    pub fn sync_channel(&self) -> u8 {
        self.channel_count / 2 + 1
    }

    /// Check the domain can produce a hop sequence of `capacity` slots.
    pub fn validate(&self, capacity: usize) -> Result<()> {
        if self.channel_count < MIN_CHANNEL_COUNT {
            return Err(FhssError::DegenerateDomain {
                channel_count: self.channel_count,
            });
        }
        if self.freq_stop <= self.freq_start {
            return Err(FhssError::InvalidRange {
                freq_start: self.freq_start,
                freq_stop: self.freq_stop,
            });
        }
        if usize::from(self.channel_count) > capacity {
            return Err(FhssError::CapacityExceeded {
                channel_count: self.channel_count,
                capacity,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FrequencyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}..{}] x{}",
            self.name, self.freq_start, self.freq_stop, self.channel_count
        )
    }
}

/// Domain selection as written in configuration: a table index or a name
///
/// A numeric string (`"2"`) selects by index, both from YAML and from the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawSelector")]
pub enum DomainSelector {
    /// Position in the chip's domain table
    Index(usize),
    /// Domain label
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelector {
    Index(usize),
    Text(String),
}

impl From<RawSelector> for DomainSelector {
    fn from(raw: RawSelector) -> Self {
        match raw {
            RawSelector::Index(index) => DomainSelector::Index(index),
            RawSelector::Text(text) => match text.parse() {
                Ok(selector) => selector,
                Err(never) => match never {},
            },
        }
    }
}

impl Default for DomainSelector {
    fn default() -> Self {
        DomainSelector::Index(0)
    }
}

impl FromStr for DomainSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(index) => DomainSelector::Index(index),
            Err(_) => DomainSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for DomainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSelector::Index(index) => write!(f, "#{}", index),
            DomainSelector::Name(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_conversion() {
        assert_eq!(RadioChip::Sx127x.hz_to_reg(865_275_000), 14_176_665);
        assert_eq!(RadioChip::Sx127x.hz_to_reg(868_000_000), 14_221_312);
        assert_eq!(RadioChip::Sx127x.hz_to_reg(750_000_000), 12_288_000);
        assert_eq!(RadioChip::Sx127x.hz_to_reg(1_000_000_000), 16_384_000);
        assert_eq!(RadioChip::Sx128x.hz_to_reg(2_400_400_000), 12_100_970);
        assert_eq!(RadioChip::Sx128x.hz_to_reg(2_479_400_000), 12_499_227);
    }

    #[test]
    fn test_reg_to_hz_within_one_step() {
        for chip in [RadioChip::Sx127x, RadioChip::Sx128x] {
            for spec in chip.domains() {
                let back = chip.reg_to_hz(chip.hz_to_reg(spec.freq_start_hz));
                let step = chip.xtal_hz() >> chip.register_bits();
                assert!(spec.freq_start_hz - back <= step + 1);
            }
        }
    }

    #[test]
    fn test_domain_lookup() {
        let eu = RadioChip::Sx127x.domain(2).unwrap();
        assert_eq!(eu.name, "EU868");
        assert_eq!(eu.channel_count, 13);
        assert!(eu.is_eu868());

        let fcc = RadioChip::Sx127x.domain_by_name("fcc915").unwrap();
        assert_eq!(fcc.channel_count, 40);
        assert!(!fcc.is_eu868());
    }

    #[test]
    fn test_domain_out_of_range() {
        match RadioChip::Sx127x.domain(6) {
            Err(FhssError::InvalidDomain { index, available }) => {
                assert_eq!(index, 6);
                assert_eq!(available, 6);
            }
            other => panic!("expected InvalidDomain, got {:?}", other),
        }
        assert!(RadioChip::Sx128x.domain(2).is_err());
        assert!(matches!(
            RadioChip::Sx128x.domain_by_name("EU868"),
            Err(FhssError::UnknownDomain(_))
        ));
    }

    #[test]
    fn test_sync_channel() {
        let domain = FrequencyDomain::new("test", 0, 100, 4);
        assert_eq!(domain.sync_channel(), 3);
        assert_eq!(RadioChip::Sx127x.domain(2).unwrap().sync_channel(), 7);
        assert_eq!(RadioChip::Sx128x.domain(0).unwrap().sync_channel(), 41);
    }

    #[test]
    fn test_validate() {
        assert!(FrequencyDomain::new("ok", 100, 200, 10).validate(256).is_ok());
        assert!(matches!(
            FrequencyDomain::new("one", 100, 200, 1).validate(256),
            Err(FhssError::DegenerateDomain { channel_count: 1 })
        ));
        assert!(matches!(
            FrequencyDomain::new("two", 100, 200, 2).validate(256),
            Err(FhssError::DegenerateDomain { channel_count: 2 })
        ));
        assert!(matches!(
            FrequencyDomain::new("flat", 200, 200, 10).validate(256),
            Err(FhssError::InvalidRange { .. })
        ));
        assert!(matches!(
            FrequencyDomain::new("wide", 100, 200, 10).validate(8),
            Err(FhssError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_all_tables_valid() {
        for chip in [RadioChip::Sx127x, RadioChip::Sx128x] {
            for index in 0..chip.domains().len() {
                chip.domain(index).unwrap().validate(256).unwrap();
            }
        }
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!("3".parse::<DomainSelector>().unwrap(), DomainSelector::Index(3));
        assert_eq!(
            "EU868".parse::<DomainSelector>().unwrap(),
            DomainSelector::Name("EU868".to_string())
        );
        let domain = RadioChip::Sx127x
            .select(&DomainSelector::Name("in866".to_string()))
            .unwrap();
        assert_eq!(domain.channel_count, 4);
    }

    #[test]
    fn test_selector_yaml_matches_from_str() {
        for text in ["2", "\"2\"", "EU868", "\"EU868\""] {
            let from_yaml: DomainSelector = serde_yaml::from_str(text).unwrap();
            let from_cli: DomainSelector = text.trim_matches('"').parse().unwrap();
            assert_eq!(from_yaml, from_cli, "{}", text);
        }
        let quoted: DomainSelector = serde_yaml::from_str("\"2\"").unwrap();
        assert_eq!(quoted, DomainSelector::Index(2));
        assert_eq!(RadioChip::Sx127x.select(&quoted).unwrap().name, "EU868");
    }

    #[test]
    fn test_chip_parse() {
        assert_eq!("SX127x".parse::<RadioChip>().unwrap(), RadioChip::Sx127x);
        assert_eq!("sx1280".parse::<RadioChip>().unwrap(), RadioChip::Sx128x);
        assert!("cc1101".parse::<RadioChip>().is_err());
    }
}
