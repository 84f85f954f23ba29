//! Contact events as the map sees them.

use api_types::{ContactRecord, LocationSource};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

use crate::identifiers::{ContactId, OperatorTag};
use crate::models::types::{GeoPoint, MapError, Result};

/// Popup fields shown next to a marker; not used by any geometry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContactDetails {
    pub recv_callsign: String,
    pub freq_rx_hz: i64,
    pub mode: String,
    pub location_source: LocationSource,
}

impl ContactDetails {
    /// Receive frequency in kHz, e.g. `14074` for 14.074 MHz
    pub fn freq_khz(&self) -> f64 {
        self.freq_rx_hz as f64 / 1000.0
    }
}

impl From<&ContactRecord> for ContactDetails {
    fn from(record: &ContactRecord) -> Self {
        Self {
            recv_callsign: record.recv_callsign.clone(),
            freq_rx_hz: record.freq_rx,
            mode: record.mode.clone(),
            location_source: record.location_source,
        }
    }
}

/// A located, timestamped radio contact.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactEvent {
    pub id: ContactId,
    pub location: GeoPoint,
    /// Milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    pub operator: OperatorTag,
    pub details: ContactDetails,
}

impl ContactEvent {
    pub fn new(
        id: impl Into<ContactId>,
        location: GeoPoint,
        timestamp_millis: i64,
        operator: impl Into<OperatorTag>,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            timestamp_millis,
            operator: operator.into(),
            details: ContactDetails::default(),
        }
    }

    pub fn with_details(self, details: ContactDetails) -> Self {
        Self { details, ..self }
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.location.longitude()
    }

    /// Convert a wire record into an event.
    ///
    /// Returns `Ok(None)` for records that have not been located yet. Records
    /// without an id are keyed by callsign and timestamp; a missing operator
    /// becomes an empty tag.
    pub fn from_record(record: ContactRecord) -> Result<Option<Self>> {
        let Some((latitude, longitude)) = record.coordinates() else {
            return Ok(None);
        };

        let location = GeoPoint::new(latitude, longitude)?;
        let timestamp_millis = parse_timestamp_millis(&record.timestamp)?;

        let details = ContactDetails::from(&record);
        let id = match record.id {
            Some(id) => ContactId::from(id),
            None => ContactId::new(format!("{}@{}", record.recv_callsign, record.timestamp)),
        };

        Ok(Some(Self {
            id,
            location,
            timestamp_millis,
            operator: OperatorTag::new(record.operator.unwrap_or_default()),
            details,
        }))
    }
}

/// Parse an ISO 8601 timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 (with offset) and naive `YYYY-MM-DDTHH:MM:SS[.fff]`,
/// which is taken as UTC.
pub fn parse_timestamp_millis(s: &str) -> Result<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().timestamp_millis())
        .map_err(|_| MapError::InvalidTimestamp(s.to_owned()))
}
