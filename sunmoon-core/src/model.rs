use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Sampling interval used when a query has none (or a non-positive one).
pub const DEFAULT_INTERVAL_MS: i64 = 1000 * 60 * 30;

/// A batch of queries answered together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    pub queries: Vec<DataQuery>,
}

/// One query as sent by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    /// Groups the frames produced for this query in the response.
    pub ref_id: String,
    pub time_range: TimeRange,
    #[serde(default)]
    pub interval_ms: Option<i64>,
    /// Raw query model: `{ latitude?, longitude?, target: [..] }`.
    #[serde(default, rename = "json")]
    pub payload: serde_json::Value,
}

impl DataQuery {
    /// Sampling step, with the 30 minute default for absent or non-positive values.
    pub fn interval(&self) -> TimeDelta {
        self.interval_ms
            .filter(|ms| *ms > 0)
            .map(TimeDelta::milliseconds)
            .unwrap_or_else(|| TimeDelta::milliseconds(DEFAULT_INTERVAL_MS))
    }
}

/// Half-open range: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

/// Location after override/default resolution, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl ResolvedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Datasource-level default location; either half may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_falls_back_to_thirty_minutes() {
        let mut query: DataQuery = serde_json::from_value(serde_json::json!({
            "refId": "A",
            "timeRange": { "from": "2024-06-21T00:00:00Z", "to": "2024-06-21T02:00:00Z" },
            "json": { "target": ["sun_altitude"] }
        }))
        .unwrap();
        assert_eq!(query.interval(), TimeDelta::minutes(30));

        query.interval_ms = Some(0);
        assert_eq!(query.interval(), TimeDelta::minutes(30));

        query.interval_ms = Some(-5);
        assert_eq!(query.interval(), TimeDelta::minutes(30));

        query.interval_ms = Some(60_000);
        assert_eq!(query.interval(), TimeDelta::minutes(1));
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let req: QueryRequest = serde_json::from_str(
            r#"{
                "queries": [{
                    "refId": "B",
                    "timeRange": { "from": "2024-01-01T00:00:00Z", "to": "2024-01-02T00:00:00Z" },
                    "intervalMs": 3600000,
                    "json": { "latitude": "45", "longitude": "9", "target": ["sunrise"] }
                }]
            }"#,
        )
        .unwrap();

        let query = &req.queries[0];
        assert_eq!(query.ref_id, "B");
        assert_eq!(query.interval(), TimeDelta::hours(1));
        assert_eq!(query.payload["target"][0], "sunrise");
    }
}
