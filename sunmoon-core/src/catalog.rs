//! Registries of the signals a query can ask for.
//!
//! Metrics are sampled numeric series; annotations are at-most-once-per-day
//! events. The two key sets are disjoint, so a target string classifies into
//! exactly one of them or into neither.

use std::collections::HashMap;
use std::fmt;

use crate::error::{QueryError, QueryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricId {
    MoonIllumination,
    MoonAltitude,
    MoonAzimuth,
    MoonDistance,
    SunAltitude,
    SunAzimuth,
    SunMaximumAltitude,
}

impl MetricId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::MoonIllumination => "moon_illumination",
            MetricId::MoonAltitude => "moon_altitude",
            MetricId::MoonAzimuth => "moon_azimuth",
            MetricId::MoonDistance => "moon_distance",
            MetricId::SunAltitude => "sun_altitude",
            MetricId::SunAzimuth => "sun_azimuth",
            MetricId::SunMaximumAltitude => "sun_maximum_altitude",
        }
    }

    pub const fn all() -> &'static [MetricId] {
        &[
            MetricId::MoonIllumination,
            MetricId::MoonAltitude,
            MetricId::MoonAzimuth,
            MetricId::MoonDistance,
            MetricId::SunAltitude,
            MetricId::SunAzimuth,
            MetricId::SunMaximumAltitude,
        ]
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationId {
    Sunrise,
    SunriseEnd,
    GoldenHourEnd,
    SolarNoon,
    GoldenHour,
    SunsetStart,
    Sunset,
    Dusk,
    NauticalDusk,
    Night,
    Nadir,
    NightEnd,
    NauticalDawn,
    Dawn,
    Moonrise,
    Moonset,
    Noon,
    Midnight,
}

impl AnnotationId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationId::Sunrise => "sunrise",
            AnnotationId::SunriseEnd => "sunriseEnd",
            AnnotationId::GoldenHourEnd => "goldenHourEnd",
            AnnotationId::SolarNoon => "solarNoon",
            AnnotationId::GoldenHour => "goldenHour",
            AnnotationId::SunsetStart => "sunsetStart",
            AnnotationId::Sunset => "sunset",
            AnnotationId::Dusk => "dusk",
            AnnotationId::NauticalDusk => "nauticalDusk",
            AnnotationId::Night => "night",
            AnnotationId::Nadir => "nadir",
            AnnotationId::NightEnd => "nightEnd",
            AnnotationId::NauticalDawn => "nauticalDawn",
            AnnotationId::Dawn => "dawn",
            AnnotationId::Moonrise => "moonrise",
            AnnotationId::Moonset => "moonset",
            AnnotationId::Noon => "noon",
            AnnotationId::Midnight => "midnight",
        }
    }

    pub const fn all() -> &'static [AnnotationId] {
        &[
            AnnotationId::Sunrise,
            AnnotationId::SunriseEnd,
            AnnotationId::GoldenHourEnd,
            AnnotationId::SolarNoon,
            AnnotationId::GoldenHour,
            AnnotationId::SunsetStart,
            AnnotationId::Sunset,
            AnnotationId::Dusk,
            AnnotationId::NauticalDusk,
            AnnotationId::Night,
            AnnotationId::Nadir,
            AnnotationId::NightEnd,
            AnnotationId::NauticalDawn,
            AnnotationId::Dawn,
            AnnotationId::Moonrise,
            AnnotationId::Moonset,
            AnnotationId::Noon,
            AnnotationId::Midnight,
        ]
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata of a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub id: MetricId,
    pub title: &'static str,
    pub description: &'static str,
    /// Unit tag understood by dashboards, e.g. `degree` or `lengthkm`.
    pub unit: &'static str,
    pub decimals: u16,
    pub min: f64,
}

/// Display metadata of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDefinition {
    pub id: AnnotationId,
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

impl AnnotationDefinition {
    /// Tags as rendered in the `Tags` field.
    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }
}

/// Immutable metric and annotation registries.
///
/// Built once and shared read-only; lookups need no synchronisation.
#[derive(Debug, Clone)]
pub struct Catalog {
    metrics: HashMap<&'static str, MetricDefinition>,
    annotations: HashMap<&'static str, AnnotationDefinition>,
}

impl Catalog {
    /// The built-in sun and moon catalog.
    pub fn builtin() -> Self {
        let metrics = builtin_metrics()
            .into_iter()
            .map(|def| (def.id.as_str(), def))
            .collect();
        let annotations = builtin_annotations()
            .into_iter()
            .map(|def| (def.id.as_str(), def))
            .collect();

        Self { metrics, annotations }
    }

    /// Build a catalog from explicit definitions.
    ///
    /// Fails if an identifier is listed twice. Metric and annotation keys come
    /// from disjoint id enums, so the two registries cannot collide.
    pub fn from_definitions(
        metrics: Vec<MetricDefinition>,
        annotations: Vec<AnnotationDefinition>,
    ) -> QueryResult<Self> {
        let mut catalog = Self {
            metrics: HashMap::with_capacity(metrics.len()),
            annotations: HashMap::with_capacity(annotations.len()),
        };

        for def in metrics {
            let key = def.id.as_str();
            if catalog.metrics.insert(key, def).is_some() {
                return Err(QueryError::Internal(format!("metric '{key}' defined twice")));
            }
        }

        for def in annotations {
            let key = def.id.as_str();
            if catalog.annotations.insert(key, def).is_some() {
                return Err(QueryError::Internal(format!(
                    "annotation '{key}' defined twice"
                )));
            }
        }

        Ok(catalog)
    }

    pub fn metric(&self, id: &str) -> Option<&MetricDefinition> {
        self.metrics.get(id)
    }

    pub fn annotation(&self, id: &str) -> Option<&AnnotationDefinition> {
        self.annotations.get(id)
    }

    /// Metric definitions in their canonical order.
    pub fn metrics(&self) -> impl Iterator<Item = &MetricDefinition> {
        MetricId::all()
            .iter()
            .filter_map(|id| self.metrics.get(id.as_str()))
    }

    /// Annotation definitions in their canonical order.
    pub fn annotations(&self) -> impl Iterator<Item = &AnnotationDefinition> {
        AnnotationId::all()
            .iter()
            .filter_map(|id| self.annotations.get(id.as_str()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const SUN: &[&str] = &["sun"];
const MOON: &[&str] = &["moon"];
const TIME: &[&str] = &["time"];

fn builtin_metrics() -> Vec<MetricDefinition> {
    fn metric(
        id: MetricId,
        title: &'static str,
        description: &'static str,
        unit: &'static str,
        decimals: u16,
    ) -> MetricDefinition {
        MetricDefinition {
            id,
            title,
            description,
            unit,
            decimals,
            min: 0.0,
        }
    }

    vec![
        metric(
            MetricId::MoonIllumination,
            "Moon illumination",
            "Percentage of the moon illuminated by the sun (0.0 - 1.0)",
            "percentunit",
            1,
        ),
        metric(
            MetricId::MoonAltitude,
            "Moon altitude",
            "Height of the moon in degrees (-90 - 90)",
            "degree",
            1,
        ),
        metric(
            MetricId::MoonAzimuth,
            "Moon azimuth",
            "Direction of the moon along the horizon in degrees (0 - 360)",
            "degree",
            1,
        ),
        metric(
            MetricId::MoonDistance,
            "Moon distance",
            "Distance to the moon in kilometers",
            "lengthkm",
            0,
        ),
        metric(
            MetricId::SunAltitude,
            "Sun altitude",
            "Height of the sun in degrees (-90 - 90)",
            "degree",
            1,
        ),
        metric(
            MetricId::SunAzimuth,
            "Sun azimuth",
            "Direction of the sun along the horizon in degrees (0 - 360)",
            "degree",
            1,
        ),
        metric(
            MetricId::SunMaximumAltitude,
            "Maximum sun altitude of the day",
            "Maximum height of the sun of the day (at solar noon) in degrees (-90 - 90)",
            "degree",
            1,
        ),
    ]
}

fn builtin_annotations() -> Vec<AnnotationDefinition> {
    fn annotation(
        id: AnnotationId,
        title: &'static str,
        description: &'static str,
        tags: &'static [&'static str],
    ) -> AnnotationDefinition {
        AnnotationDefinition {
            id,
            title,
            description,
            tags,
        }
    }

    vec![
        annotation(
            AnnotationId::Sunrise,
            "Sunrise",
            "Top edge of the sun appears on the horizon",
            SUN,
        ),
        annotation(
            AnnotationId::SunriseEnd,
            "Sunrise ends",
            "Bottom edge of the sun touches the horizon",
            SUN,
        ),
        annotation(
            AnnotationId::GoldenHourEnd,
            "Morning golden hour ends",
            "Soft light, best time for photography",
            SUN,
        ),
        annotation(
            AnnotationId::SolarNoon,
            "Solar noon",
            "Sun is in the highest position",
            SUN,
        ),
        annotation(
            AnnotationId::GoldenHour,
            "Evening golden hour starts",
            "Soft light, best time for photography",
            SUN,
        ),
        annotation(
            AnnotationId::SunsetStart,
            "Sunset starts",
            "Bottom edge of the sun touches the horizon",
            SUN,
        ),
        annotation(
            AnnotationId::Sunset,
            "Sunset",
            "Sun disappears below the horizon, evening civil twilight starts",
            SUN,
        ),
        annotation(
            AnnotationId::Dusk,
            "Dusk",
            "Evening nautical twilight starts",
            SUN,
        ),
        annotation(
            AnnotationId::NauticalDusk,
            "Nautical dusk",
            "Evening astronomical twilight starts",
            SUN,
        ),
        annotation(
            AnnotationId::Night,
            "Night starts",
            "Dark enough for astronomical observations",
            SUN,
        ),
        annotation(
            AnnotationId::Nadir,
            "Nadir",
            "Darkest moment of the night, sun is in the lowest position",
            SUN,
        ),
        annotation(
            AnnotationId::NightEnd,
            "Night ends",
            "Morning astronomical twilight starts",
            SUN,
        ),
        annotation(
            AnnotationId::NauticalDawn,
            "Nautical dawn",
            "Morning nautical twilight starts",
            SUN,
        ),
        annotation(
            AnnotationId::Dawn,
            "Dawn",
            "Morning nautical twilight ends, morning civil twilight starts",
            SUN,
        ),
        annotation(
            AnnotationId::Moonrise,
            "Moonrise",
            "Top edge of the moon appears on the horizon",
            MOON,
        ),
        annotation(
            AnnotationId::Moonset,
            "Moonset",
            "Moon disappears below the horizon",
            MOON,
        ),
        annotation(
            AnnotationId::Noon,
            "Noon",
            "12 o'clock in the daytime",
            TIME,
        ),
        annotation(
            AnnotationId::Midnight,
            "Midnight",
            "12 o'clock in the night",
            TIME,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_complete_and_disjoint() {
        let catalog = Catalog::builtin();

        for id in MetricId::all() {
            assert!(catalog.metric(id.as_str()).is_some(), "missing metric {id}");
            assert!(catalog.annotation(id.as_str()).is_none());
        }
        for id in AnnotationId::all() {
            assert!(catalog.annotation(id.as_str()).is_some(), "missing annotation {id}");
            assert!(catalog.metric(id.as_str()).is_none());
        }

        assert!(Catalog::from_definitions(builtin_metrics(), builtin_annotations()).is_ok());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = Catalog::builtin();
        assert!(catalog.annotation("sunriseEnd").is_some());
        assert!(catalog.annotation("sunriseend").is_none());
        assert!(catalog.metric("Sun_Altitude").is_none());
    }

    #[test]
    fn sunrise_definition_matches_display_metadata() {
        let catalog = Catalog::builtin();
        let sunrise = catalog.annotation("sunrise").unwrap();

        assert_eq!(sunrise.title, "Sunrise");
        assert_eq!(sunrise.tags, &["sun"]);
        assert_eq!(sunrise.joined_tags(), "sun");

        let distance = catalog.metric("moon_distance").unwrap();
        assert_eq!(distance.unit, "lengthkm");
        assert_eq!(distance.decimals, 0);
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let err = Catalog::from_definitions(
            vec![builtin_metrics()[0].clone(), builtin_metrics()[0].clone()],
            vec![],
        )
        .unwrap_err();
        assert!(err.to_string().contains("defined twice"));

        let sunrise = builtin_annotations()[0].clone();
        let err = Catalog::from_definitions(vec![], vec![sunrise.clone(), sunrise]).unwrap_err();
        assert_eq!(err.to_string(), "internal error: annotation 'sunrise' defined twice");
    }

    #[test]
    fn metric_and_annotation_ids_never_share_a_key() {
        for metric in MetricId::all() {
            for annotation in AnnotationId::all() {
                assert_ne!(metric.as_str(), annotation.as_str());
            }
        }
    }

    #[test]
    fn iteration_follows_canonical_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog.metrics().map(|def| def.id).collect();
        assert_eq!(ids, MetricId::all());

        let titles: Vec<_> = catalog.annotations().map(|def| def.title).take(2).collect();
        assert_eq!(titles, ["Sunrise", "Sunrise ends"]);
    }
}
