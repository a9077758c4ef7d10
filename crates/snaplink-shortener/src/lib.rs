//! The registry of shortened URLs.
//!
//! [`Registry`] owns every record and the uniqueness of short codes. It
//! validates and allocates new records, accepts click updates from the
//! resolver and mirrors its state into a [`RecordStore`](snaplink_core::RecordStore).

pub mod error;
pub mod registry;
pub mod state;
pub mod stats;

pub use error::{Result, ShortenerError};
pub use registry::{Registry, RegistryBuilder, RegistrySettings};
pub use state::{LoadReport, RegistryState};
pub use stats::{StatsFilter, StatsQuery, StatsSort, StatsSummary};
