use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::debug;

use crate::catalog::{MetricDefinition, MetricId};
use crate::civil::{CivilZone, SampleInstants};
use crate::evaluator::{Evaluator, SolarEvent};
use crate::frame::MetricFrame;
use crate::model::{ResolvedLocation, TimeRange};

use super::{compass_bearing, to_degrees};

/// Samples one metric over a time range at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct MetricSeriesBuilder<'a> {
    evaluator: &'a dyn Evaluator,
    zone: CivilZone,
}

impl<'a> MetricSeriesBuilder<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, zone: CivilZone) -> Self {
        Self { evaluator, zone }
    }

    pub fn build(
        &self,
        def: &MetricDefinition,
        location: &ResolvedLocation,
        range: &TimeRange,
        interval: TimeDelta,
    ) -> MetricFrame {
        let mut frame = MetricFrame::new(def);
        let mut daily_max: Option<(NaiveDate, f64)> = None;

        for t in SampleInstants::new(range.from, range.to, interval) {
            let value = match def.id {
                MetricId::SunMaximumAltitude => {
                    let date = self.zone.date_of(t);
                    match daily_max {
                        Some((cached, value)) if cached == date => value,
                        _ => {
                            let value = self.max_sun_altitude(date, location);
                            daily_max = Some((date, value));
                            value
                        }
                    }
                }
                id => self.sample(id, t, location),
            };

            frame.append(t, value);
        }

        debug!(metric = %def.id, samples = frame.points.len(), "built metric frame");
        frame
    }

    /// Value of an instantaneous metric at `t`.
    pub fn sample(&self, id: MetricId, t: DateTime<Utc>, location: &ResolvedLocation) -> f64 {
        match id {
            MetricId::MoonIllumination => self.evaluator.moon_illumination(t).fraction,
            MetricId::MoonAltitude => to_degrees(self.evaluator.moon_position(t, location).altitude),
            MetricId::MoonAzimuth => {
                compass_bearing(self.evaluator.moon_position(t, location).azimuth)
            }
            MetricId::MoonDistance => self.evaluator.moon_position(t, location).distance,
            MetricId::SunAltitude => to_degrees(self.evaluator.sun_position(t, location).altitude),
            MetricId::SunAzimuth => compass_bearing(self.evaluator.sun_position(t, location).azimuth),
            MetricId::SunMaximumAltitude => {
                self.max_sun_altitude(self.zone.date_of(t), location)
            }
        }
    }

    /// Sun altitude at the solar noon of the civil `date`, in degrees.
    fn max_sun_altitude(&self, date: NaiveDate, location: &ResolvedLocation) -> f64 {
        let near = self.zone.noon(date);
        let solar_noon = self
            .evaluator
            .solar_events(near, location)
            .get(SolarEvent::SolarNoon)
            .unwrap_or(near);

        to_degrees(self.evaluator.sun_position(solar_noon, location).altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::evaluator::SunCalc;
    use crate::series::stub::StubEvaluator;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn range(from: &str, to: &str) -> TimeRange {
        TimeRange::new(utc(from), utc(to))
    }

    fn build(evaluator: &dyn Evaluator, id: &str, range: &TimeRange, step: TimeDelta) -> MetricFrame {
        let catalog = Catalog::builtin();
        let def = catalog.metric(id).unwrap();
        let loc = ResolvedLocation::new(45.0, 9.0);
        MetricSeriesBuilder::new(evaluator, CivilZone::Utc).build(def, &loc, range, step)
    }

    #[test]
    fn half_open_range_at_thirty_minutes() {
        let frame = build(
            &SunCalc::new(),
            "sun_altitude",
            &range("2024-06-21T00:00:00Z", "2024-06-21T02:00:00Z"),
            TimeDelta::minutes(30),
        );

        assert_eq!(frame.name, "Sun altitude");
        assert_eq!(frame.config.unit, "degree");
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
    }

    #[test]
    fn sample_count_matches_interval_arithmetic() {
        let r = range("2024-03-01T00:00:00Z", "2024-03-01T07:00:00Z");
        for minutes in [1, 7, 30, 45, 60, 419, 420, 421] {
            let step = TimeDelta::minutes(minutes);
            let frame = build(&StubEvaluator::default(), "sun_azimuth", &r, step);

            let expected = (420 + minutes - 1) / minutes;
            assert_eq!(frame.points.len() as i64, expected, "step {minutes}m");
            for pair in frame.points.windows(2) {
                assert_eq!(pair[1].time - pair[0].time, step);
            }
        }
    }

    #[test]
    fn unit_conversions() {
        let r = range("2024-01-01T00:00:00Z", "2024-01-01T00:01:00Z");
        let step = TimeDelta::minutes(30);
        let stub = StubEvaluator::default();

        let value = |id| build(&stub, id, &r, step).points[0].value;

        assert_eq!(value("moon_illumination"), 0.25);
        assert!((value("moon_altitude") - -90.0).abs() < 1e-9);
        assert!((value("moon_azimuth") - 270.0).abs() < 1e-9);
        assert_eq!(value("moon_distance"), 384_400.0);
        assert_eq!(value("sun_azimuth"), 180.0);
    }

    #[test]
    fn maximum_altitude_is_constant_within_a_day() {
        let frame = build(
            &SunCalc::new(),
            "sun_maximum_altitude",
            &range("2024-06-20T00:00:00Z", "2024-06-23T00:00:00Z"),
            TimeDelta::minutes(45),
        );

        let mut by_day: Vec<(NaiveDate, f64)> = Vec::new();
        for p in &frame.points {
            let date = p.time.date_naive();
            match by_day.last() {
                Some((d, v)) if *d == date => assert_eq!(*v, p.value),
                _ => by_day.push((date, p.value)),
            }
        }

        assert_eq!(by_day.len(), 3);
        // Midsummer at 45N: 90 - 45 + 23.44
        for (_, v) in by_day {
            assert!((v - 68.4).abs() < 0.5, "got {v}");
        }
    }

    #[test]
    fn maximum_altitude_matches_direct_sampling() {
        let sun_calc = SunCalc::new();
        let builder = MetricSeriesBuilder::new(&sun_calc, CivilZone::Utc);
        let loc = ResolvedLocation::new(-33.9, 18.4);

        let morning = builder.sample(MetricId::SunMaximumAltitude, utc("2024-12-21T03:00:00Z"), &loc);
        let evening = builder.sample(MetricId::SunMaximumAltitude, utc("2024-12-21T23:00:00Z"), &loc);
        assert_eq!(morning, evening);
    }

    #[test]
    fn value_ranges_hold_across_the_globe() {
        let sun_calc = SunCalc::new();
        let builder = MetricSeriesBuilder::new(&sun_calc, CivilZone::Utc);

        let mut t = utc("2024-01-01T00:00:00Z");
        let end = utc("2025-01-01T00:00:00Z");
        while t < end {
            for lat in [-89.0, -60.0, -12.5, 0.0, 33.3, 66.6, 89.9] {
                for lon in [-179.0, -75.0, 0.0, 9.0, 120.0, 359.0] {
                    let loc = ResolvedLocation::new(lat, lon);

                    for id in [MetricId::SunAltitude, MetricId::MoonAltitude] {
                        let v = builder.sample(id, t, &loc);
                        assert!((-90.0..=90.0).contains(&v), "{id} {v} at {t} {lat},{lon}");
                    }
                    for id in [MetricId::SunAzimuth, MetricId::MoonAzimuth] {
                        let v = builder.sample(id, t, &loc);
                        assert!((0.0..360.0).contains(&v), "{id} {v} at {t} {lat},{lon}");
                    }
                }
            }

            let illum = builder.sample(MetricId::MoonIllumination, t, &ResolvedLocation::new(0.0, 0.0));
            assert!((0.0..=1.0).contains(&illum));

            t += TimeDelta::hours(37);
        }
    }
}
