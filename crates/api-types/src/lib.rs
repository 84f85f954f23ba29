//! Wire types for contact records delivered by the dashboard's query layer.
//!
//! Field names follow the GraphQL schema (`recvCallsign`, `freqRx`, ...), so
//! records can be deserialized straight from a query response.

use serde::{Deserialize, Serialize};

/// Where a contact's coordinates came from
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum LocationSource {
    #[default]
    NoLocation,
    /// Estimated from the callsign prefix
    Prefix,
    /// Looked up on HamQTH
    HamQTH,
}

/// A single logged contact as returned by the `entries` query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub recv_callsign: String,
    /// Receive frequency in Hz
    pub freq_rx: i64,
    pub mode: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub location_source: LocationSource,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// ISO 8601, e.g. `2024-06-22T18:04:00Z`
    pub timestamp: String,
}

impl ContactRecord {
    /// Both coordinates, if the record has been located
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Response body of the `entries` query (newest first)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub entries: Vec<ContactRecord>,
}
