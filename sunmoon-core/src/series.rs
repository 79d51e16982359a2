//! Frame builders: fixed-step metric sampling and calendar-day annotations.

use std::f64::consts::PI;

pub mod annotation;
pub mod metric;

pub use annotation::AnnotationSeriesBuilder;
pub use metric::MetricSeriesBuilder;

fn to_degrees(rad: f64) -> f64 {
    rad * (180.0 / PI)
}

/// South-referenced azimuth in radians to a compass bearing in [0, 360).
fn compass_bearing(azimuth: f64) -> f64 {
    let bearing = (to_degrees(azimuth) + 180.0).rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.
    if bearing >= 360.0 { 0.0 } else { bearing }
}
