use crate::{AllocatorSettings, Generator};
use rand::seq::SliceRandom;
use rand::Rng;
use snaplink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use snaplink_core::ShortCode;
use tracing::warn;

/// The 62-character alphanumeric alphabet.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const FALLBACK_LENGTH: usize = 6;

/// Generates random alphanumeric codes.
///
/// The length of every code is picked uniformly from the configured
/// lengths. Lengths outside the valid short code range (3-20) are dropped
/// when the generator is built, so every generated code is well formed.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    lengths: Vec<usize>,
}

impl RandomGenerator {
    pub fn new(mut lengths: Vec<usize>) -> Self {
        lengths.retain(|&length| {
            let valid = (MIN_LENGTH..=MAX_LENGTH).contains(&length);
            if !valid {
                warn!(length, "ignoring short code length outside {MIN_LENGTH}-{MAX_LENGTH}");
            }
            valid
        });
        Self { lengths }
    }

    pub fn from_settings(settings: &AllocatorSettings) -> Self {
        Self::new(settings.lengths.clone())
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    fn random_code(&self, rng: &mut impl Rng) -> String {
        let length = self
            .lengths
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_LENGTH);

        (0..length)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::from_settings(&AllocatorSettings::default())
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let code = self.random_code(&mut rand::thread_rng());
        ShortCode::new_unchecked(code)
    }
}
