pub mod error;
pub mod random;
pub mod seq;

pub use error::GeneratorError;
pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use snaplink_core::ShortCode;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is the job of [`allocate`], which retries on collision.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}

/// Tunables for random short code allocation.
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorSettings {
    /// Candidate code lengths; one is picked at random for every attempt.
    #[builder(default = vec![6, 7])]
    pub lengths: Vec<usize>,
    /// How many candidates to try before giving up.
    #[builder(default = 10)]
    pub max_attempts: usize,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws candidates from `generator` until one is not taken.
///
/// `is_taken` is consulted for every candidate; nothing is reserved. Fails
/// with [`GeneratorError::Exhausted`] after `max_attempts` collisions.
pub fn allocate<G, F>(
    generator: &G,
    max_attempts: usize,
    is_taken: F,
) -> Result<ShortCode, GeneratorError>
where
    G: Generator + ?Sized,
    F: Fn(&ShortCode) -> bool,
{
    for attempt in 1..=max_attempts {
        let candidate: ShortCode = generator.generate().into();
        if !is_taken(&candidate) {
            trace!(code = %candidate, attempt, "allocated short code");
            return Ok(candidate);
        }
        debug!(code = %candidate, attempt, "generated short code collides");
    }

    Err(GeneratorError::Exhausted {
        attempts: max_attempts,
    })
}
