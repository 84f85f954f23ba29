//! Geographic points, contact events and the crate error type.

pub mod contact;
pub mod types;

pub use contact::{ContactDetails, ContactEvent};
pub use types::{DEFAULT_STATION, GeoPoint, MapError, Result};
