use anyhow::{Context, Result};
use api_types::{ContactRecord, EntriesResponse};
use qso_map_core::{parse_timestamp_millis, ContactEvent};
use serde::Deserialize;
use std::path::Path;

/// Either a bare array of records or the `entries` query response
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Bare(Vec<ContactRecord>),
    Response(EntriesResponse),
}

/// Parse contact records from JSON text
pub fn parse_records(json: &str) -> Result<Vec<ContactRecord>> {
    let file: RecordFile = serde_json::from_str(json).context("Failed to parse contact records")?;
    Ok(match file {
        RecordFile::Bare(records) => records,
        RecordFile::Response(response) => response.entries,
    })
}

pub fn read_records(path: &Path) -> Result<Vec<ContactRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_records(&json)
}

/// What was read besides the located events
#[derive(Debug, Default)]
pub struct LoadStats {
    pub total: usize,
    pub unlocated: usize,
    /// Epoch millis of every record, located or not
    pub timestamps: Vec<i64>,
    /// Most recent record, located or not
    pub latest: Option<ContactRecord>,
}

/// Convert records into events, dropping the ones without coordinates
pub fn located_events(records: Vec<ContactRecord>) -> Result<(Vec<ContactEvent>, LoadStats)> {
    let mut stats = LoadStats {
        total: records.len(),
        timestamps: Vec::with_capacity(records.len()),
        ..Default::default()
    };
    let mut events = Vec::with_capacity(records.len());
    let mut latest_millis = i64::MIN;

    for record in records {
        let callsign = record.recv_callsign.clone();
        let timestamp = parse_timestamp_millis(&record.timestamp)
            .with_context(|| format!("Invalid record for {callsign}"))?;
        stats.timestamps.push(timestamp);
        if stats.latest.is_none() || timestamp > latest_millis {
            latest_millis = timestamp;
            stats.latest = Some(record.clone());
        }

        match ContactEvent::from_record(record)
            .with_context(|| format!("Invalid record for {callsign}"))?
        {
            Some(event) => events.push(event),
            None => {
                log::debug!("  Skipping {callsign}: no location");
                stats.unlocated += 1;
            }
        }
    }

    Ok((events, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qso_map_core::{format_hours_minutes, Activity};

    const BARE: &str = r#"[
        {"recvCallsign": "JA1XYZ", "freqRx": 14074000, "mode": "FT8",
         "latitude": 35.68, "longitude": 139.69, "timestamp": "2024-06-22T18:04:00Z"},
        {"recvCallsign": "W1AW", "freqRx": 7074000, "mode": "CW",
         "timestamp": "2024-06-22T18:00:00Z"}
    ]"#;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_records(BARE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].recv_callsign, "JA1XYZ");
    }

    #[test]
    fn test_parse_entries_response() {
        let json = format!(r#"{{"entries": {BARE}}}"#);
        let records = parse_records(&json).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_records(r#"{"contacts": []}"#).is_err());
    }

    #[test]
    fn test_located_events_skips_unlocated() {
        let (events, stats) = located_events(parse_records(BARE).unwrap()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.unlocated, 1);
        assert_eq!(events[0].id.as_str(), "JA1XYZ@2024-06-22T18:04:00Z");
        assert_eq!(stats.timestamps.len(), 2);
        assert_eq!(stats.latest.unwrap().recv_callsign, "JA1XYZ");
    }

    #[test]
    fn test_unlocated_contacts_count_as_activity() {
        let records = parse_records(
            r#"[
                {"recvCallsign": "A", "freqRx": 0, "mode": "FT8",
                 "latitude": 10.0, "longitude": 10.0, "timestamp": "2024-06-22T18:00:00Z"},
                {"recvCallsign": "B", "freqRx": 0, "mode": "FT8",
                 "timestamp": "2024-06-22T18:05:00Z"},
                {"recvCallsign": "C", "freqRx": 0, "mode": "FT8",
                 "latitude": 20.0, "longitude": 20.0, "timestamp": "2024-06-22T18:15:00Z"}
            ]"#,
        )
        .unwrap();
        let (events, stats) = located_events(records).unwrap();
        assert_eq!(events.len(), 2);

        let activity = Activity::from_millis(stats.timestamps).unwrap();
        assert_eq!(activity.active_minutes(), 16);
        assert_eq!(format_hours_minutes(activity.active_minutes()), "0:16");
    }

    #[test]
    fn test_latest_may_be_unlocated() {
        let (_, stats) = located_events(parse_records(BARE).unwrap()).unwrap();
        let mut records = parse_records(BARE).unwrap();
        records[1].timestamp = "2024-06-22T19:00:00Z".into();
        let (_, later) = located_events(records).unwrap();

        assert_eq!(stats.latest.unwrap().recv_callsign, "JA1XYZ");
        assert_eq!(later.latest.unwrap().recv_callsign, "W1AW");
    }

    #[test]
    fn test_bad_timestamp_rejected_even_without_location() {
        let records = parse_records(
            r#"[{"recvCallsign": "X", "freqRx": 0, "mode": "FT8", "timestamp": "soon"}]"#,
        )
        .unwrap();
        assert!(located_events(records).is_err());
    }

    #[test]
    fn test_located_events_rejects_bad_coordinates() {
        let records = parse_records(
            r#"[{"recvCallsign": "X", "freqRx": 0, "mode": "FT8",
                 "latitude": 95.0, "longitude": 0.0, "timestamp": "2024-06-22T18:04:00Z"}]"#,
        )
        .unwrap();
        assert!(located_events(records).is_err());
    }
}
