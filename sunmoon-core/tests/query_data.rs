//! End-to-end requests through the public API.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use sunmoon_core::{
    CivilZone, Datasource, DefaultLocation, QueryError, QueryRequest, frame::MetricFrame,
};

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn datasource() -> Datasource {
    Datasource::new(
        DefaultLocation {
            latitude: Some(45.0),
            longitude: Some(9.0),
        },
        CivilZone::Utc,
    )
}

fn request(value: serde_json::Value) -> QueryRequest {
    serde_json::from_value(value).unwrap()
}

fn metric<'a>(response: &'a sunmoon_core::Response, ref_id: &str, idx: usize) -> &'a MetricFrame {
    response.get(ref_id).unwrap().frames[idx].as_metric().unwrap()
}

#[test]
fn sun_altitude_over_two_hours() {
    let req = request(json!({
        "queries": [{
            "refId": "A",
            "timeRange": { "from": "2024-06-21T00:00:00Z", "to": "2024-06-21T02:00:00Z" },
            "intervalMs": 1_800_000,
            "json": { "latitude": "45", "longitude": "9", "target": ["sun_altitude"] }
        }]
    }));

    let response = datasource().query_data(&req).unwrap();
    let frame = metric(&response, "A", 0);

    let times: Vec<_> = frame.times().collect();
    assert_eq!(
        times,
        [
            utc("2024-06-21T00:00:00Z"),
            utc("2024-06-21T00:30:00Z"),
            utc("2024-06-21T01:00:00Z"),
            utc("2024-06-21T01:30:00Z"),
        ]
    );
    // Shortly after midnight the sun is well below the horizon at 45N.
    assert!(frame.values().all(|v| v < 0.0 && v > -90.0));
    assert_eq!(frame.config.decimals, 1);
}

#[test]
fn default_interval_is_thirty_minutes() {
    let req = request(json!({
        "queries": [{
            "refId": "A",
            "timeRange": { "from": "2024-06-21T00:00:00Z", "to": "2024-06-21T06:00:00Z" },
            "json": { "target": ["moon_illumination"] }
        }]
    }));

    let response = datasource().query_data(&req).unwrap();
    let frame = metric(&response, "A", 0);

    assert_eq!(frame.points.len(), 12);
    assert_eq!(frame.points[1].time - frame.points[0].time, TimeDelta::minutes(30));
    assert!(frame.values().all(|v| (0.0..=1.0).contains(&v)));
}

#[test]
fn sunrise_for_one_day() {
    let req = request(json!({
        "queries": [{
            "refId": "A",
            "timeRange": { "from": "2024-06-21T00:00:00Z", "to": "2024-06-22T00:00:00Z" },
            "json": { "latitude": "45", "longitude": "9", "target": ["sunrise"] }
        }]
    }));

    let response = datasource().query_data(&req).unwrap();
    let frame = response.get("A").unwrap().frames[0].as_annotation().unwrap();

    assert_eq!(frame.rows.len(), 1);
    let row = &frame.rows[0];
    assert_eq!(row.title, "Sunrise");
    assert_eq!(row.tags, "sun");
}

#[test]
fn arctic_midsummer_has_no_sunset_rows() {
    let req = request(json!({
        "queries": [{
            "refId": "A",
            "timeRange": { "from": "2024-06-20T00:00:00Z", "to": "2024-06-23T00:00:00Z" },
            "json": { "latitude": "78", "longitude": "15", "target": ["sunset", "solarNoon"] }
        }]
    }));

    let response = datasource().query_data(&req).unwrap();
    let frames = &response.get("A").unwrap().frames;

    assert_eq!(frames[0].name(), "Sunset");
    assert!(frames[0].is_empty());
    assert_eq!(frames[1].name(), "Solar noon");
    assert_eq!(frames[1].len(), 3);
}

#[test]
fn unknown_target_yields_no_frames() {
    let req = request(json!({
        "queries": [{
            "refId": "A",
            "timeRange": { "from": "2024-06-21T00:00:00Z", "to": "2024-06-22T00:00:00Z" },
            "json": { "target": ["sun_altitude", "bogus"] }
        }]
    }));

    let err = datasource().query_data(&req).unwrap_err();
    assert_eq!(err, QueryError::UnknownTarget("bogus".into()));
    assert_eq!(err.to_string(), "unknown target: bogus");
}

#[test]
fn response_serializes_to_frame_json() {
    let req = request(json!({
        "queries": [{
            "refId": "Q",
            "timeRange": { "from": "2024-01-01T00:00:00Z", "to": "2024-01-01T01:00:00Z" },
            "intervalMs": 3_600_000,
            "json": { "target": ["moon_distance", "midnight"] }
        }]
    }));

    let response = datasource().query_data(&req).unwrap();
    let value = serde_json::to_value(&response).unwrap();

    let frames = value["Q"]["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["name"], "Moon distance");
    assert_eq!(frames[0]["fields"][1]["config"]["unit"], "lengthkm");
    assert_eq!(frames[1]["fields"][0]["values"][0], "2024-01-01T00:00:00Z");
    assert_eq!(frames[1]["fields"][3]["values"][0], "time");
}
