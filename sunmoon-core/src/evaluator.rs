use chrono::{DateTime, Utc};
use std::fmt::Debug;

use crate::model::ResolvedLocation;

pub mod builtin;

pub use builtin::SunCalc;

/// Horizontal position of a body. Angles are in radians; azimuth is measured
/// from south towards west.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    pub altitude: f64,
    pub azimuth: f64,
    /// Earth-moon distance in kilometres.
    pub distance: f64,
    pub parallactic_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonIllumination {
    /// Illuminated fraction of the disc, 0 to 1.
    pub fraction: f64,
    /// 0 new moon, 0.25 first quarter, 0.5 full moon, 0.75 last quarter.
    pub phase: f64,
    /// Midpoint angle of the bright limb, radians.
    pub angle: f64,
}

/// Daily solar events, each tied to an altitude crossing or the transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEvent {
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
}

impl SolarEvent {
    const COUNT: usize = 14;

    fn index(self) -> usize {
        self as usize
    }
}

/// Event instants of one solar cycle. `None` when the sun never crosses the
/// corresponding altitude (polar day or night).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolarEvents {
    times: [Option<DateTime<Utc>>; SolarEvent::COUNT],
}

impl SolarEvents {
    pub fn get(&self, event: SolarEvent) -> Option<DateTime<Utc>> {
        self.times[event.index()]
    }

    pub fn set(&mut self, event: SolarEvent, at: Option<DateTime<Utc>>) {
        self.times[event.index()] = at;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoonEvents {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    /// Neither rise nor set, moon above the horizon all day.
    pub always_up: bool,
    /// Neither rise nor set, moon below the horizon all day.
    pub always_down: bool,
}

/// Astronomical position and event computation.
///
/// Implementations are pure functions of their inputs, so one instance may
/// be shared across threads without locking.
pub trait Evaluator: Send + Sync + Debug {
    fn sun_position(&self, at: DateTime<Utc>, location: &ResolvedLocation) -> BodyPosition;

    fn moon_position(&self, at: DateTime<Utc>, location: &ResolvedLocation) -> MoonPosition;

    fn moon_illumination(&self, at: DateTime<Utc>) -> MoonIllumination;

    /// Events of the solar cycle whose transit is nearest to `near`.
    fn solar_events(&self, near: DateTime<Utc>, location: &ResolvedLocation) -> SolarEvents;

    /// Moon rise and set within the 24 hours starting at `day_start`.
    fn moon_events(&self, day_start: DateTime<Utc>, location: &ResolvedLocation) -> MoonEvents;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_events_default_to_undefined() {
        let mut events = SolarEvents::default();
        assert_eq!(events.get(SolarEvent::Sunrise), None);

        let at: DateTime<Utc> = "2024-06-21T04:00:00Z".parse().unwrap();
        events.set(SolarEvent::Dawn, Some(at));
        assert_eq!(events.get(SolarEvent::Dawn), Some(at));
        assert_eq!(events.get(SolarEvent::Dusk), None);
    }
}
