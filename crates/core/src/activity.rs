//! Per-minute operating activity derived from contact timestamps.
//!
//! A minute counts as active if a contact was logged in it, or if it falls in
//! a gap of at most ten minutes between two consecutive contacts.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// Gaps up to this many minutes count as continuous operating time
pub const IDLE_GAP_MINUTES: i64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    /// One entry per minute in `start..=end`
    minutes: Vec<bool>,
}

fn floor_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(TimeDelta::minutes(1)).unwrap_or(t)
}

impl Activity {
    /// Build the series from contact times. Returns `None` without contacts.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> Option<Self> {
        let mut times: Vec<DateTime<Utc>> = timestamps.into_iter().map(floor_minute).collect();
        times.sort_unstable();

        let start = *times.first()?;
        let end = *times.last()?;

        let mut minutes = Vec::new();
        for pair in times.windows(2) {
            let gap = (pair[1] - pair[0]).num_minutes();
            if gap == 0 {
                continue;
            }
            minutes.push(true);
            minutes.extend(std::iter::repeat_n(gap <= IDLE_GAP_MINUTES, gap as usize - 1));
        }
        minutes.push(true);

        Some(Self {
            start,
            end,
            minutes,
        })
    }

    /// Build the series from epoch-millisecond timestamps, skipping any that
    /// are out of chrono's range.
    pub fn from_millis(timestamps: impl IntoIterator<Item = i64>) -> Option<Self> {
        Self::from_timestamps(timestamps.into_iter().filter_map(DateTime::from_timestamp_millis))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn minutes(&self) -> &[bool] {
        &self.minutes
    }

    pub fn active_minutes(&self) -> usize {
        self.minutes.iter().filter(|active| **active).count()
    }

    /// The series restricted (or padded with idle minutes) to `start..=end`.
    ///
    /// Returns `None` if the window is empty or does not overlap the series.
    pub fn window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        let start = floor_minute(start);
        let end = floor_minute(end);

        if start > end || start > self.end || end < self.start {
            return None;
        }

        let offset = (start - self.start).num_minutes();
        let len = (end - start).num_minutes() + 1;
        let minutes = (offset..offset + len)
            .map(|i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|i| self.minutes.get(i).copied())
                    .unwrap_or(false)
            })
            .collect();

        Some(Self {
            start,
            end,
            minutes,
        })
    }

    /// The trailing `duration` ending at `now`.
    pub fn last(&self, now: DateTime<Utc>, duration: TimeDelta) -> Option<Self> {
        self.window(now - duration, now)
    }
}

/// `H:MM`, e.g. `2:05` for 125 minutes
pub fn format_hours_minutes(total_minutes: usize) -> String {
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}
