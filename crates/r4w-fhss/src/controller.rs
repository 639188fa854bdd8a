//! FHSS controller
//!
//! The controller owns everything that changes outside the hop timer: the
//! selected radio chip and domain, the seed, the override codes last applied
//! and the random source. Every change builds a complete plan and publishes
//! it to the shared [`HopTable`]; a change that fails validation leaves the
//! table, the active domain and the override state untouched.

use crate::config::FhssConfig;
use crate::domain::{DomainSelector, FrequencyDomain, RadioChip};
use crate::error::Result;
use crate::hopper::HopTable;
use crate::remap::{OverrideCodes, OverrideState};
use crate::rng::{LinearCongruential, RandomSource};
use crate::sequence::HopPlan;
use std::sync::Arc;
use tracing::{info, warn};

/// Owner of the active domain and publisher of hop plans
#[derive(Debug)]
pub struct FhssController<R = LinearCongruential> {
    chip: RadioChip,
    domain: FrequencyDomain,
    seed: u32,
    overrides: OverrideState,
    rng: R,
    table: Arc<HopTable>,
}

impl FhssController<LinearCongruential> {
    /// Select a domain from `chip`'s table and publish its plan for `seed`.
    pub fn new(chip: RadioChip, selector: &DomainSelector, seed: u32) -> Result<Self> {
        Self::with_rng(chip, selector, seed, LinearCongruential::default())
    }

    /// Build a controller from configuration, applying its override codes.
    pub fn from_config(config: &FhssConfig) -> Result<Self> {
        config.validate()?;
        let mut controller = Self::new(config.radio, &config.domain, config.seed)?;
        if let Some(codes) = config.override_codes {
            controller.apply_override(codes, config.seed)?;
        }
        Ok(controller)
    }
}

impl<R: RandomSource> FhssController<R> {
    /// Like [`FhssController::new`] with an explicit random source.
    pub fn with_rng(chip: RadioChip, selector: &DomainSelector, seed: u32, mut rng: R) -> Result<Self> {
        let domain = chip.select(selector)?;
        info!("Selected domain {} on {}", domain.name, chip);
        let plan = HopPlan::generate(&domain, seed, &mut rng)?;

        Ok(Self {
            chip,
            domain,
            seed,
            overrides: OverrideState::default(),
            rng,
            table: Arc::new(HopTable::new(plan)),
        })
    }

    /// Handle for the hop driver
    pub fn table(&self) -> Arc<HopTable> {
        Arc::clone(&self.table)
    }

    /// Radio chip the domain table belongs to
    pub fn chip(&self) -> RadioChip {
        self.chip
    }

    /// Active domain, including any applied override
    pub fn domain(&self) -> &FrequencyDomain {
        &self.domain
    }

    /// Seed of the published plan
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Codes of the last applied override
    pub fn override_state(&self) -> &OverrideState {
        &self.overrides
    }

    /// Whether the active domain is EU 868 MHz.
    pub fn is_domain_868(&self) -> bool {
        self.domain.is_eu868()
    }

    /// Regenerate the plan for the active domain with a new seed.
    pub fn randomise(&mut self, seed: u32) -> Result<()> {
        let plan = HopPlan::generate(&self.domain, seed, &mut self.rng)?;
        self.commit(self.domain.clone(), seed, plan);
        Ok(())
    }

    /// Switch to another table domain, dropping any override.
    pub fn select_domain(&mut self, selector: &DomainSelector, seed: u32) -> Result<()> {
        let domain = self.chip.select(selector)?;
        let plan = HopPlan::generate(&domain, seed, &mut self.rng)?;
        info!("Selected domain {} on {}", domain.name, self.chip);
        self.overrides.clear();
        self.commit(domain, seed, plan);
        Ok(())
    }

    /// Remap the active domain with `codes` and regenerate.
    ///
    /// Codes outside their tables leave the matching field unchanged. If the
    /// remapped domain is unusable the error is returned and nothing changes.
    pub fn apply_override(&mut self, codes: OverrideCodes, seed: u32) -> Result<&FrequencyDomain> {
        let remapped = codes.remap(&self.domain, self.chip);
        let plan = match HopPlan::generate(&remapped, seed, &mut self.rng) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Rejected override {:?}: {}", codes, e);
                return Err(e);
            }
        };

        self.overrides.record(codes);
        self.commit(remapped, seed, plan);
        Ok(&self.domain)
    }

    /// Apply `codes` only if they differ from the last override.
    ///
    /// Returns whether a new plan was published.
    pub fn apply_override_if_changed(&mut self, codes: OverrideCodes, seed: u32) -> Result<bool> {
        if !self.has_changed(&codes) {
            return Ok(false);
        }
        self.apply_override(codes, seed)?;
        Ok(true)
    }

    /// True unless `codes` equal the last applied override exactly.
    pub fn has_changed(&self, codes: &OverrideCodes) -> bool {
        self.overrides.has_changed(codes)
    }

    fn commit(&mut self, domain: FrequencyDomain, seed: u32, plan: HopPlan) {
        self.domain = domain;
        self.seed = seed;
        self.table.publish(plan);
    }
}
