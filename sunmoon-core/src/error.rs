//! Query error types.
//!
//! Every variant aborts the whole request: location resolution and target
//! classification run before any frame is built, so a failing request never
//! carries partial frames.

use std::fmt;

use thiserror::Error;

/// Which half of a coordinate pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }

    /// Inclusive bounds accepted for this axis, in degrees.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-360.0, 360.0),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while turning a request into frames.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// An override coordinate could not be parsed or lies out of range.
    #[error("invalid {axis} '{value}': {reason}")]
    InvalidCoordinate {
        axis: Axis,
        value: String,
        reason: String,
    },

    /// A requested target is neither a known metric nor a known annotation.
    #[error("unknown target: {0}")]
    UnknownTarget(String),

    /// No override was given and the datasource has no default.
    #[error("no {0} configured: set a default location or pass one with the query")]
    MissingLocation(Axis),

    /// The per-query JSON payload does not have the expected shape.
    #[error("invalid query payload: {0}")]
    InvalidPayload(String),

    /// A broken internal invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_input() {
        let err = QueryError::InvalidCoordinate {
            axis: Axis::Latitude,
            value: "abc".into(),
            reason: "not a number".into(),
        };
        assert_eq!(err.to_string(), "invalid latitude 'abc': not a number");

        let err = QueryError::UnknownTarget("bogus".into());
        assert_eq!(err.to_string(), "unknown target: bogus");

        let err = QueryError::MissingLocation(Axis::Longitude);
        assert!(err.to_string().starts_with("no longitude configured"));
    }
}
