use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Error)]
pub enum RedirectorError {
    #[error("geolocation client error: {0}")]
    Client(#[from] reqwest::Error),
}
