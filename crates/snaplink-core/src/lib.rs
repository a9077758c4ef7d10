//! Core types and traits for the snaplink URL shortener.
//!
//! This crate provides the record model, the short code type, the shared
//! validation predicates and the collaborator ports (store, telemetry,
//! clock) used by both the registry and the resolver.

pub mod clock;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod shortener;
pub mod store;
pub mod telemetry;
pub mod validate;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, StorageError};
pub use record::{ClickEvent, RecordId, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::CreateRequest;
pub use store::RecordStore;
pub use telemetry::{Category, Level, NoopTelemetry, Telemetry};
