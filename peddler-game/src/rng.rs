//! Seeded random streams for market generation.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

use crate::constants::{RNG_DOMAIN_OFFERS, RNG_DOMAIN_ROTATION};

type StreamRng = CountingRng<SmallRng>;

/// Draws taken from each market stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCounts {
    pub rotation: u64,
    pub offers: u64,
}

impl DrawCounts {
    /// Draws made after `earlier` was recorded.
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self {
            rotation: self.rotation.saturating_sub(earlier.rotation),
            offers: self.offers.saturating_sub(earlier.offers),
        }
    }
}

/// Independent RNG streams derived from a single user seed, so that category
/// rotation draws never shift offer sampling and vice versa.
#[derive(Debug)]
pub struct RngBundle {
    seed: u64,
    rotation: RefCell<StreamRng>,
    offers: RefCell<StreamRng>,
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let stream = |domain: &[u8]| {
            RefCell::new(CountingRng::new(SmallRng::seed_from_u64(
                derive_stream_seed(seed, domain),
            )))
        };
        Self {
            seed,
            rotation: stream(RNG_DOMAIN_ROTATION),
            offers: stream(RNG_DOMAIN_OFFERS),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream used for category rotation.
    #[must_use]
    pub fn rotation(&self) -> RefMut<'_, StreamRng> {
        self.rotation.borrow_mut()
    }

    /// Stream used for price jitter and offer sampling.
    #[must_use]
    pub fn offers(&self) -> RefMut<'_, StreamRng> {
        self.offers.borrow_mut()
    }

    /// Running totals since the bundle was created.
    #[must_use]
    pub fn draws(&self) -> DrawCounts {
        DrawCounts {
            rotation: self.rotation.borrow().draws(),
            offers: self.offers.borrow().draws(),
        }
    }
}

/// RNG adaptor that tallies every call into the wrapped generator.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    inner: R,
    draws: u64,
}

impl<R> CountingRng<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }

    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    fn tick(&mut self) -> &mut R {
        self.draws = self.draws.saturating_add(1);
        &mut self.inner
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.tick().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.tick().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.tick().fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.tick().try_fill_bytes(dest)
    }
}

/// Keyed by the stream's domain tag, so each stream gets an unrelated seed
/// even for adjacent user seeds.
fn derive_stream_seed(user_seed: u64, domain: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(domain) else {
        return user_seed;
    };
    mac.update(&user_seed.to_be_bytes());
    let digest = mac.finalize().into_bytes();
    digest
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
