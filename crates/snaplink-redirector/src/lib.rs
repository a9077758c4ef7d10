//! Resolution of short codes into redirect decisions.
//!
//! The [`Resolver`] looks codes up in a shared
//! [`Registry`](snaplink_shortener::Registry), refuses expired ones and
//! records a click for every successful redirect. Click locations come from a
//! pluggable [`Geolocator`].

pub mod countdown;
pub mod error;
pub mod geo;
pub mod resolver;

pub use countdown::{Countdown, CountdownHandle, CountdownOutcome};
pub use error::{RedirectorError, Result};
pub use geo::{FixedGeolocator, Geolocator, IpApiGeolocator, MockGeolocator};
pub use resolver::{ClickContext, Resolution, Resolver, ResolverSettings};
