use chrono::{DateTime, NaiveTime, Utc};
use tracing::debug;

use crate::catalog::{AnnotationDefinition, AnnotationId};
use crate::civil::{noon_time, CivilZone};
use crate::evaluator::{Evaluator, SolarEvent};
use crate::frame::AnnotationFrame;
use crate::model::{ResolvedLocation, TimeRange};

/// Emits one annotation row per calendar day on which the event occurs.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationSeriesBuilder<'a> {
    evaluator: &'a dyn Evaluator,
    zone: CivilZone,
}

impl<'a> AnnotationSeriesBuilder<'a> {
    pub fn new(evaluator: &'a dyn Evaluator, zone: CivilZone) -> Self {
        Self { evaluator, zone }
    }

    pub fn build(
        &self,
        def: &AnnotationDefinition,
        location: &ResolvedLocation,
        range: &TimeRange,
    ) -> AnnotationFrame {
        let mut frame = AnnotationFrame::new(def);

        for day in self.zone.days(range.from, range.to) {
            if let Some(at) = self.event_time(def.id, day, location) {
                frame.append(at, def);
            }
        }

        debug!(annotation = %def.id, rows = frame.rows.len(), "built annotation frame");
        frame
    }

    /// Instant of `id` on the calendar day containing `day`, if it occurs.
    pub fn event_time(
        &self,
        id: AnnotationId,
        day: DateTime<Utc>,
        location: &ResolvedLocation,
    ) -> Option<DateTime<Utc>> {
        let date = self.zone.date_of(day);

        let solar = |event| {
            self.evaluator
                .solar_events(self.zone.noon(date), location)
                .get(event)
        };
        let moon = || self.evaluator.moon_events(self.zone.day_start(date), location);

        match id {
            AnnotationId::Sunrise => solar(SolarEvent::Sunrise),
            AnnotationId::SunriseEnd => solar(SolarEvent::SunriseEnd),
            AnnotationId::GoldenHourEnd => solar(SolarEvent::GoldenHourEnd),
            AnnotationId::SolarNoon => solar(SolarEvent::SolarNoon),
            AnnotationId::GoldenHour => solar(SolarEvent::GoldenHour),
            AnnotationId::SunsetStart => solar(SolarEvent::SunsetStart),
            AnnotationId::Sunset => solar(SolarEvent::Sunset),
            AnnotationId::Dusk => solar(SolarEvent::Dusk),
            AnnotationId::NauticalDusk => solar(SolarEvent::NauticalDusk),
            AnnotationId::Night => solar(SolarEvent::Night),
            AnnotationId::Nadir => solar(SolarEvent::Nadir),
            AnnotationId::NightEnd => solar(SolarEvent::NightEnd),
            AnnotationId::NauticalDawn => solar(SolarEvent::NauticalDawn),
            AnnotationId::Dawn => solar(SolarEvent::Dawn),
            AnnotationId::Moonrise => moon().rise,
            AnnotationId::Moonset => moon().set,
            // Wall-clock times in the civil zone, not the location's solar time.
            AnnotationId::Noon => self.zone.civil_instant(date, noon_time()),
            AnnotationId::Midnight => self.zone.civil_instant(date, NaiveTime::MIN),
        }
    }
}
