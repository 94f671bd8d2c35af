// Time series domain models and the smoothing pipeline
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Offset-less layouts tried after RFC 3339; they are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One sample as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: f64,
}

impl ParsedPoint {
    pub fn parse(point: &DataPoint) -> Self {
        Self {
            timestamp: parse_timestamp(&point.timestamp),
            value: point.value,
        }
    }
}

/// Parse a backend timestamp, returning `None` when it is not a valid date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parsed samples with timestamps and values kept pairwise aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
    pub dropped: usize,
}

impl Series {
    /// Parse raw points in backend order. A point with an unparseable
    /// timestamp is removed from both arrays at once and counted in `dropped`.
    pub fn from_points(points: &[DataPoint]) -> Self {
        let mut series = Self::default();

        for point in points.iter().map(ParsedPoint::parse) {
            match point.timestamp {
                Some(timestamp) => {
                    series.timestamps.push(timestamp);
                    series.values.push(point.value);
                }
                None => series.dropped += 1,
            }
        }

        series.align();
        series
    }

    /// Keep the first N entries of each array, N being the shorter length.
    pub fn align(&mut self) {
        let len = self.timestamps.len().min(self.values.len());
        self.timestamps.truncate(len);
        self.values.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}

/// Trailing (causal) moving average.
///
/// Index `i` holds the mean of `values[i + 1 - window_size ..= i]`, or `None`
/// while fewer than `window_size` values are available. NaN inputs propagate.
pub fn moving_average(values: &[f64], window_size: usize) -> Vec<Option<f64>> {
    if window_size == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window_size {
                None
            } else {
                let window = &values[i + 1 - window_size..=i];
                Some(window.iter().sum::<f64>() / window_size as f64)
            }
        })
        .collect()
}

/// State handed to the rendering side: raw and smoothed values aligned on
/// the same timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub timestamps: Vec<DateTime<Utc>>,
    pub raw_values: Vec<f64>,
    pub smoothed_values: Vec<Option<f64>>,
    pub dataset_label: Option<String>,
    pub dropped_points: usize,
}

impl FeedSnapshot {
    pub fn from_series(label: String, series: Series, window_size: usize) -> Self {
        let smoothed_values = moving_average(&series.values, window_size);
        Self {
            timestamps: series.timestamps,
            raw_values: series.values,
            smoothed_values,
            dataset_label: Some(label),
            dropped_points: series.dropped,
        }
    }

    pub fn empty(label: Option<String>) -> Self {
        Self {
            dataset_label: label,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_moving_average_window_five() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let smoothed = moving_average(&values, 5);

        assert_eq!(smoothed, vec![None, None, None, None, Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_moving_average_short_input() {
        let smoothed = moving_average(&[10.0, 20.0], 5);
        assert_eq!(smoothed, vec![None, None]);
        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let smoothed = moving_average(&[10.0, 20.0, 30.0], 1);
        assert_eq!(smoothed, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_moving_average_zero_window() {
        assert_eq!(moving_average(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_moving_average_propagates_nan() {
        let values = [1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let smoothed = moving_average(&values, 5);

        assert!(smoothed[4].is_some_and(f64::is_nan));
        assert!(smoothed[5].is_some_and(f64::is_nan));
        assert_eq!(smoothed[6], Some(5.0));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();

        assert_eq!(parse_timestamp("2024-01-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:30"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let parsed = parse_timestamp("2024-01-01T00:00:00.250Z").unwrap();
        assert_eq!(parsed.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45T00:00:00Z"), None);
    }

    #[test]
    fn test_series_drops_invalid_points_in_lockstep() {
        let points = vec![
            DataPoint::new("2024-01-01T00:00:00Z", 10.0),
            DataPoint::new("not-a-date", 20.0),
            DataPoint::new("2024-01-01T00:00:02Z", 30.0),
        ];

        let series = Series::from_points(&points);

        assert_eq!(series.len(), 2);
        assert_eq!(series.values, vec![10.0, 30.0]);
        assert_eq!(
            series.timestamps[1],
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 2).unwrap()
        );
        assert_eq!(series.dropped, 1);
    }

    #[test]
    fn test_align_truncates_to_shorter() {
        let mut series = Series {
            timestamps: vec![Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()],
            values: vec![1.0, 2.0, 3.0],
            dropped: 0,
        };

        series.align();

        assert_eq!(series.values, vec![1.0]);
        assert_eq!(series.timestamps.len(), 1);
    }

    #[test]
    fn test_snapshot_arrays_have_equal_length() {
        let points: Vec<DataPoint> = (0..8)
            .map(|i| {
                let ts = if i == 3 {
                    "garbage".to_string()
                } else {
                    format!("2024-01-01T00:00:{:02}Z", i)
                };
                DataPoint::new(ts, i as f64)
            })
            .collect();

        let snapshot = FeedSnapshot::from_series(
            "run.csv".to_string(),
            Series::from_points(&points),
            DEFAULT_WINDOW_SIZE,
        );

        assert_eq!(snapshot.timestamps.len(), 7);
        assert_eq!(snapshot.raw_values.len(), 7);
        assert_eq!(snapshot.smoothed_values.len(), 7);
        assert_eq!(snapshot.dropped_points, 1);
        assert_eq!(snapshot.dataset_label.as_deref(), Some("run.csv"));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = FeedSnapshot::empty(Some("a.csv".to_string()));
        assert!(snapshot.is_empty());
        assert!(snapshot.timestamps.is_empty());
        assert!(snapshot.smoothed_values.is_empty());
    }
}
