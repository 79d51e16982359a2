//! Built-in evaluator backed by the `suncalc` crate.
//!
//! Positions, illumination and the solar day come straight from the crate.
//! Moonrise and moonset are not provided there, so they are found here by
//! scanning the moon altitude hour by hour.

use chrono::{DateTime, TimeDelta, Utc};
use suncalc::Timestamp;

use crate::model::ResolvedLocation;

use super::{
    BodyPosition, Evaluator, MoonEvents, MoonIllumination, MoonPosition, SolarEvent, SolarEvents,
};

/// Moon rise/set horizon correction, radians.
const MOON_HORIZON: f64 = 0.133 * std::f64::consts::PI / 180.0;

/// Default [`Evaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SunCalc {
    /// Observer height above the horizon plane in metres; lowers the
    /// apparent horizon for rise/set events.
    pub observer_height_m: f64,
}

impl SunCalc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer_height(observer_height_m: f64) -> Self {
        Self { observer_height_m }
    }
}

fn timestamp(at: DateTime<Utc>) -> Timestamp {
    Timestamp(at.timestamp_millis())
}

/// Undefined events (the sun never reaches the altitude) come back from the
/// crate as the epoch.
fn instant(ts: Timestamp) -> Option<DateTime<Utc>> {
    if ts.0 == 0 {
        return None;
    }
    DateTime::from_timestamp_millis(ts.0)
}

fn hours_later(start: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() {
        return None;
    }
    let ms = (hours * 3_600_000.0).round() as i64;
    start.checked_add_signed(TimeDelta::try_milliseconds(ms)?)
}

impl Evaluator for SunCalc {
    fn sun_position(&self, at: DateTime<Utc>, location: &ResolvedLocation) -> BodyPosition {
        let pos = suncalc::get_position(timestamp(at), location.latitude, location.longitude);

        BodyPosition {
            altitude: pos.altitude,
            azimuth: pos.azimuth,
        }
    }

    fn moon_position(&self, at: DateTime<Utc>, location: &ResolvedLocation) -> MoonPosition {
        let pos = suncalc::moon_pos(timestamp(at), location.latitude, location.longitude);

        MoonPosition {
            altitude: pos.altitude,
            azimuth: pos.azimuth,
            distance: pos.distance.unwrap_or(f64::NAN),
            parallactic_angle: pos.parallactic_angle.unwrap_or(f64::NAN),
        }
    }

    fn moon_illumination(&self, at: DateTime<Utc>) -> MoonIllumination {
        let illum = suncalc::moon_illumination(timestamp(at));

        MoonIllumination {
            fraction: illum.fraction,
            phase: illum.phase,
            angle: illum.angle,
        }
    }

    fn solar_events(&self, near: DateTime<Utc>, location: &ResolvedLocation) -> SolarEvents {
        let times = suncalc::get_times(
            timestamp(near),
            location.latitude,
            location.longitude,
            Some(self.observer_height_m.max(0.0)),
        );

        let mut events = SolarEvents::default();
        for (event, ts) in [
            (SolarEvent::SolarNoon, times.solar_noon),
            (SolarEvent::Nadir, times.nadir),
            (SolarEvent::Sunrise, times.sunrise),
            (SolarEvent::Sunset, times.sunset),
            (SolarEvent::SunriseEnd, times.sunrise_end),
            (SolarEvent::SunsetStart, times.sunset_start),
            (SolarEvent::Dawn, times.dawn),
            (SolarEvent::Dusk, times.dusk),
            (SolarEvent::NauticalDawn, times.nautical_dawn),
            (SolarEvent::NauticalDusk, times.nautical_dusk),
            (SolarEvent::NightEnd, times.night_end),
            (SolarEvent::Night, times.night),
            (SolarEvent::GoldenHourEnd, times.golden_hour_end),
            (SolarEvent::GoldenHour, times.golden_hour),
        ] {
            events.set(event, instant(ts));
        }

        events
    }

    fn moon_events(&self, day_start: DateTime<Utc>, location: &ResolvedLocation) -> MoonEvents {
        let moon_alt = |hours: f64| {
            hours_later(day_start, hours)
                .map(|t| self.moon_position(t, location).altitude - MOON_HORIZON)
                .unwrap_or(f64::NAN)
        };

        let mut h0 = moon_alt(0.0);
        let mut rise = None;
        let mut set = None;
        let mut ye = 0.0;

        // Fit a parabola through every three consecutive hourly altitudes
        // and look for its roots inside the two-hour window.
        let mut i = 1.0;
        while i <= 24.0 {
            let h1 = moon_alt(i);
            let h2 = moon_alt(i + 1.0);

            let a = (h0 + h2) / 2.0 - h1;
            let b = (h2 - h0) / 2.0;
            let xe = -b / (2.0 * a);
            ye = (a * xe + b) * xe + h1;
            let disc = b * b - 4.0 * a * h1;

            let mut roots = 0;
            let mut x1 = 0.0;
            let mut x2 = 0.0;

            if disc >= 0.0 {
                let dx = disc.sqrt() / (a.abs() * 2.0);
                x1 = xe - dx;
                x2 = xe + dx;
                if x1.abs() <= 1.0 {
                    roots += 1;
                }
                if x2.abs() <= 1.0 {
                    roots += 1;
                }
                if x1 < -1.0 {
                    x1 = x2;
                }
            }

            if roots == 1 {
                if h0 < 0.0 {
                    rise = Some(i + x1);
                } else {
                    set = Some(i + x1);
                }
            } else if roots == 2 {
                rise = Some(i + if ye < 0.0 { x2 } else { x1 });
                set = Some(i + if ye < 0.0 { x1 } else { x2 });
            }

            if rise.is_some() && set.is_some() {
                break;
            }

            h0 = h2;
            i += 2.0;
        }

        let neither = rise.is_none() && set.is_none();

        MoonEvents {
            rise: rise.and_then(|h| hours_later(day_start, h)),
            set: set.and_then(|h| hours_later(day_start, h)),
            always_up: neither && ye > 0.0,
            always_down: neither && ye <= 0.0,
        }
    }
}
