use jiff::Timestamp;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("short code already exists: {0}")]
    ShortCodeTaken(String),
    #[error("failed to generate unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },
    #[error("invalid validity window: {0}")]
    InvalidValidity(String),
    #[error("batch must contain between 1 and {max} requests, got {got}")]
    BatchSize { got: usize, max: usize },
    #[error("request #{index} rejected: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<ShortenerError>,
    },
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("field '{0}' cannot change after creation")]
    ImmutableField(&'static str),
    #[error("invalid update: {0}")]
    InvalidUpdate(String),
    #[error("record {0} changed since it was read")]
    Conflict(String),
    #[error("short code {code} expired at {expires_at}")]
    Expired { code: String, expires_at: Timestamp },
}

impl ShortenerError {
    /// Returns the underlying error, looking through [`ShortenerError::Batch`].
    pub fn kind(&self) -> &ShortenerError {
        match self {
            ShortenerError::Batch { source, .. } => source.kind(),
            other => other,
        }
    }

    /// Index of the failing request inside a batch, if any.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            ShortenerError::Batch { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn in_batch(self, index: usize) -> Self {
        ShortenerError::Batch {
            index,
            source: Box::new(self),
        }
    }
}

impl From<snaplink_generator::GeneratorError> for ShortenerError {
    fn from(value: snaplink_generator::GeneratorError) -> Self {
        match value {
            snaplink_generator::GeneratorError::Exhausted { attempts } => {
                Self::CodeGenerationExhausted { attempts }
            }
        }
    }
}

impl From<snaplink_core::CoreError> for ShortenerError {
    fn from(value: snaplink_core::CoreError) -> Self {
        match value {
            snaplink_core::CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
            snaplink_core::CoreError::InvalidUrl(message) => Self::InvalidUrl(message),
        }
    }
}
