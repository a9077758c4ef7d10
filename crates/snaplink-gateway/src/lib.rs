//! HTTP surface of snaplink.
//!
//! [`App::router`] exposes URL creation, lookups, statistics and short code
//! resolution over JSON.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
