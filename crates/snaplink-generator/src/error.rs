use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("failed to generate a unique short code after {attempts} attempts")]
    Exhausted { attempts: usize },
}
