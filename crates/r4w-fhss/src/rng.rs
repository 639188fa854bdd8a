//! Pseudorandom sources for hop sequence generation
//!
//! Sequence generation only needs two things from a generator: a way to be
//! reseeded with a 32-bit value, and bounded draws in `[0, bound)`. The
//! [`RandomSource`] trait captures exactly that so the generator can be
//! driven by the bit-exact radio LCG or, for simulation, by any `rand`
//! generator.
//!
//! ## Linear congruential generator
//!
//! ```text
//! state = (214013 * state + 2531011) mod 2^31     (32-bit wrapping multiply)
//! out   = state >> 16                             (15 bits, 0..=0x7FFF)
//! next(bound) = out % bound
//! ```
//!
//! Radios that must interoperate over the air have to use
//! [`LinearCongruential`]; any other source produces a different sequence for
//! the same seed.

/// A seedable generator of bounded integers.
pub trait RandomSource {
    /// Reset the generator to a state fully determined by `seed`.
    fn seed(&mut self, seed: u32);

    /// Draw an integer in `[0, bound)`.
    ///
    /// `bound` must be non-zero.
    fn next_below(&mut self, bound: u32) -> u32;
}

/// Largest value returned by [`LinearCongruential::next_raw`].
pub const LCG_MAX: u32 = 0x7FFF;

const LCG_MULTIPLIER: u32 = 214_013;
const LCG_INCREMENT: u32 = 2_531_011;
const LCG_MODULUS_MASK: u32 = 0x7FFF_FFFF;

/// MSVC-style LCG used by hopping radios in the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearCongruential {
    state: u32,
}

impl LinearCongruential {
    /// Create a generator already seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return the next 15-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            & LCG_MODULUS_MASK;
        self.state >> 16
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for LinearCongruential {
    fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "bound must be non-zero");
        self.next_raw() % bound
    }
}

#[cfg(feature = "std-rng")]
pub use self::std_rng::StdRandomSource;

#[cfg(feature = "std-rng")]
mod std_rng {
    use super::RandomSource;
    use rand::{Rng, RngCore, SeedableRng};

    /// Adapter driving generation from a `rand` generator.
    ///
    /// Draws are unbiased (`gen_range`), which makes the emitted sequence
    /// differ from [`super::LinearCongruential`] for the same seed. Use it for
    /// simulations that do not need to talk to real radios.
    #[derive(Debug, Clone)]
    pub struct StdRandomSource<R = rand::rngs::StdRng> {
        rng: R,
    }

    impl<R: RngCore + SeedableRng> StdRandomSource<R> {
        /// Create an adapter seeded with `seed`.
        pub fn new(seed: u32) -> Self {
            Self {
                rng: R::seed_from_u64(u64::from(seed)),
            }
        }
    }

    impl<R: RngCore + SeedableRng> RandomSource for StdRandomSource<R> {
        fn seed(&mut self, seed: u32) {
            self.rng = R::seed_from_u64(u64::from(seed));
        }

        fn next_below(&mut self, bound: u32) -> u32 {
            self.rng.gen_range(0..bound)
        }
    }
}
