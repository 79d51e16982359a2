//! Per-query payload parsing and location resolution.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Axis, QueryError, QueryResult};
use crate::model::{DefaultLocation, ResolvedLocation};

/// Coordinate as it arrives from a query editor: usually a string, but a
/// bare number is accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Text(String),
    Number(f64),
}

#[derive(Debug, Default, Deserialize)]
struct QueryModel {
    #[serde(default)]
    latitude: Option<RawCoordinate>,
    #[serde(default)]
    longitude: Option<RawCoordinate>,
    #[serde(default)]
    target: Option<Vec<String>>,
}

/// Typed form of the per-query payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySpec {
    pub latitude: Option<RawCoordinate>,
    pub longitude: Option<RawCoordinate>,
    /// Requested identifiers in request order, duplicates kept.
    pub targets: Vec<String>,
}

/// Turns raw payloads into a location and a target list.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuerySpecResolver {
    default_location: DefaultLocation,
}

impl QuerySpecResolver {
    pub fn new(default_location: DefaultLocation) -> Self {
        Self { default_location }
    }

    /// Parse the payload; `null` counts as an empty object.
    pub fn parse(&self, payload: &Value) -> QueryResult<QuerySpec> {
        let model = if payload.is_null() {
            QueryModel::default()
        } else {
            QueryModel::deserialize(payload)
                .map_err(|e| QueryError::InvalidPayload(e.to_string()))?
        };

        Ok(QuerySpec {
            latitude: model.latitude,
            longitude: model.longitude,
            targets: model.target.unwrap_or_default(),
        })
    }

    /// Override-over-default, one axis at a time.
    ///
    /// An override must parse and lie in range. A missing or blank override
    /// falls back to the default as-is; the default was validated when the
    /// settings were loaded.
    pub fn resolve_location(&self, spec: &QuerySpec) -> QueryResult<ResolvedLocation> {
        let latitude = resolve_axis(
            Axis::Latitude,
            spec.latitude.as_ref(),
            self.default_location.latitude,
        )?;
        let longitude = resolve_axis(
            Axis::Longitude,
            spec.longitude.as_ref(),
            self.default_location.longitude,
        )?;

        Ok(ResolvedLocation::new(latitude, longitude))
    }

    /// Parse and resolve in one step.
    pub fn resolve(&self, payload: &Value) -> QueryResult<(ResolvedLocation, Vec<String>)> {
        let spec = self.parse(payload)?;
        let location = self.resolve_location(&spec)?;
        Ok((location, spec.targets))
    }
}

fn resolve_axis(axis: Axis, raw: Option<&RawCoordinate>, default: Option<f64>) -> QueryResult<f64> {
    match raw {
        Some(RawCoordinate::Text(text)) if !text.trim().is_empty() => parse_coordinate(axis, text),
        Some(RawCoordinate::Number(value)) => check_range(axis, *value, &value.to_string()),
        _ => default.ok_or(QueryError::MissingLocation(axis)),
    }
}

fn parse_coordinate(axis: Axis, text: &str) -> QueryResult<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| QueryError::InvalidCoordinate {
            axis,
            value: text.to_string(),
            reason: e.to_string(),
        })?;

    check_range(axis, value, text)
}

fn check_range(axis: Axis, value: f64, text: &str) -> QueryResult<f64> {
    let (min, max) = axis.bounds();

    if !value.is_finite() {
        return Err(QueryError::InvalidCoordinate {
            axis,
            value: text.to_string(),
            reason: "not a finite number".to_string(),
        });
    }

    if value < min || value > max {
        return Err(QueryError::InvalidCoordinate {
            axis,
            value: text.to_string(),
            reason: format!("not in range {min} to {max}"),
        });
    }

    Ok(value)
}
