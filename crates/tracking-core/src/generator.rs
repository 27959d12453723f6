//! # Tracking Number Generation
//!
//! A tracking number is `TR`, then the current Unix time in whole seconds,
//! then six characters drawn uniformly from `A–Z0–9`, cut to 16 characters.
//! With a ten-digit timestamp only the first four random characters
//! survive the cut.
//!
//! ## Uniqueness
//!
//! The generator does not look at previously issued numbers and never
//! retries. Two calls within the same second share their first twelve
//! characters and differ only in four random characters (36^4 ≈ 1.7M
//! combinations), so collisions under burst load are possible. They
//! surface as a unique-key violation in the store.
//!
//! The [`TrackingNumberGenerator`] trait is the seam for a future
//! generator that handles collisions differently.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::identity::TrackingNumber;
use crate::temporal::{Clock, SystemClock};

/// Fixed two-character prefix of every generated tracking number.
pub const TRACKING_PREFIX: &str = "TR";

/// Number of random characters appended before truncation.
pub const RANDOM_SUFFIX_LEN: usize = 6;

/// Characters the random suffix is drawn from.
pub const SUFFIX_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces candidate tracking numbers.
///
/// Implementations are pure generators: they do not touch storage and make
/// no uniqueness promise.
pub trait TrackingNumberGenerator: Send + Sync {
    fn generate(&self) -> TrackingNumber;
}

/// Prefix + Unix seconds + random suffix, truncated to 16 characters.
#[derive(Debug)]
pub struct TimestampGenerator<C, R> {
    clock: C,
    rng: Mutex<R>,
}

impl TimestampGenerator<SystemClock, StdRng> {
    /// Generator backed by the wall clock and an entropy-seeded RNG.
    pub fn system() -> Self {
        Self::new(SystemClock, StdRng::from_entropy())
    }
}

impl<C: Clock, R: RngCore + Send> TimestampGenerator<C, R> {
    pub fn new(clock: C, rng: R) -> Self {
        Self {
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Draw the random suffix.
    fn random_suffix(&self) -> String {
        let mut rng = self.rng.lock();
        (0..RANDOM_SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect()
    }
}

impl<C: Clock, R: RngCore + Send> TrackingNumberGenerator for TimestampGenerator<C, R> {
    fn generate(&self) -> TrackingNumber {
        let mut candidate = format!(
            "{TRACKING_PREFIX}{}{}",
            self.clock.unix_seconds(),
            self.random_suffix()
        );
        // ASCII only, so byte truncation is char truncation.
        candidate.truncate(TrackingNumber::MAX_LEN);
        TrackingNumber::from_generated(candidate)
    }
}

impl<T: TrackingNumberGenerator + ?Sized> TrackingNumberGenerator for std::sync::Arc<T> {
    fn generate(&self) -> TrackingNumber {
        (**self).generate()
    }
}
