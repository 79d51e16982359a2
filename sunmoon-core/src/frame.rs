//! Output frames: named, column-oriented tables sharing a time index.
//!
//! Serialised in a data-frame layout,
//! `{ "name", "fields": [{ "name", "type", "config"?, "values" }] }`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::catalog::{AnnotationDefinition, MetricDefinition};

pub const TIME_FIELD: &str = "Time";
pub const VALUE_FIELD: &str = "Value";
pub const TITLE_FIELD: &str = "Title";
pub const TEXT_FIELD: &str = "Text";
pub const TAGS_FIELD: &str = "Tags";

/// Display configuration attached to a metric's value field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConfig {
    pub unit: String,
    pub decimals: u16,
    pub min: f64,
}

impl From<&MetricDefinition> for FieldConfig {
    fn from(def: &MetricDefinition) -> Self {
        Self {
            unit: def.unit.to_string(),
            decimals: def.decimals,
            min: def.min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// A sampled numeric series.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFrame {
    pub name: String,
    pub config: FieldConfig,
    pub points: Vec<MetricPoint>,
}

impl MetricFrame {
    pub fn new(def: &MetricDefinition) -> Self {
        Self {
            name: def.title.to_string(),
            config: FieldConfig::from(def),
            points: Vec::new(),
        }
    }

    pub fn append(&mut self, time: DateTime<Utc>, value: f64) {
        self.points.push(MetricPoint { time, value });
    }

    pub fn times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.time)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRow {
    pub time: DateTime<Utc>,
    pub title: String,
    pub text: String,
    pub tags: String,
}

/// Discrete events, at most one row per calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationFrame {
    pub name: String,
    pub rows: Vec<AnnotationRow>,
}

impl AnnotationFrame {
    pub fn new(def: &AnnotationDefinition) -> Self {
        Self {
            name: def.title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn append(&mut self, time: DateTime<Utc>, def: &AnnotationDefinition) {
        self.rows.push(AnnotationRow {
            time,
            title: def.title.to_string(),
            text: def.description.to_string(),
            tags: def.joined_tags(),
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Metric(MetricFrame),
    Annotation(AnnotationFrame),
}

impl Frame {
    pub fn name(&self) -> &str {
        match self {
            Frame::Metric(f) => &f.name,
            Frame::Annotation(f) => &f.name,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Frame::Metric(f) => f.points.len(),
            Frame::Annotation(f) => f.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Frame::Metric(_) => &[TIME_FIELD, VALUE_FIELD],
            Frame::Annotation(_) => &[TIME_FIELD, TITLE_FIELD, TEXT_FIELD, TAGS_FIELD],
        }
    }

    pub fn as_metric(&self) -> Option<&MetricFrame> {
        match self {
            Frame::Metric(f) => Some(f),
            Frame::Annotation(_) => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotationFrame> {
        match self {
            Frame::Annotation(f) => Some(f),
            Frame::Metric(_) => None,
        }
    }
}

impl From<MetricFrame> for Frame {
    fn from(frame: MetricFrame) -> Self {
        Frame::Metric(frame)
    }
}

impl From<AnnotationFrame> for Frame {
    fn from(frame: AnnotationFrame) -> Self {
        Frame::Annotation(frame)
    }
}

#[derive(Serialize)]
struct FrameRepr<'a> {
    name: &'a str,
    fields: Vec<FieldRepr<'a>>,
}

#[derive(Serialize)]
struct FieldRepr<'a> {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a FieldConfig>,
    values: Values<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Values<'a> {
    Time(Vec<DateTime<Utc>>),
    Number(Vec<f64>),
    Text(Vec<&'a str>),
}

impl<'a> FieldRepr<'a> {
    fn new(name: &'static str, values: Values<'a>) -> Self {
        let kind = match values {
            Values::Time(_) => "time",
            Values::Number(_) => "number",
            Values::Text(_) => "string",
        };
        Self {
            name,
            kind,
            config: None,
            values,
        }
    }

    fn with_config(mut self, config: &'a FieldConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = match self {
            Frame::Metric(f) => vec![
                FieldRepr::new(TIME_FIELD, Values::Time(f.times().collect())),
                FieldRepr::new(VALUE_FIELD, Values::Number(f.values().collect()))
                    .with_config(&f.config),
            ],
            Frame::Annotation(f) => {
                let column = |pick: fn(&AnnotationRow) -> &str| {
                    Values::Text(f.rows.iter().map(pick).collect())
                };
                vec![
                    FieldRepr::new(TIME_FIELD, Values::Time(f.rows.iter().map(|r| r.time).collect())),
                    FieldRepr::new(TITLE_FIELD, column(|r| &r.title)),
                    FieldRepr::new(TEXT_FIELD, column(|r| &r.text)),
                    FieldRepr::new(TAGS_FIELD, column(|r| &r.tags)),
                ]
            }
        };

        FrameRepr {
            name: self.name(),
            fields,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use serde_json::json;

    #[test]
    fn metric_frame_serializes_with_value_config() {
        let catalog = Catalog::builtin();
        let mut frame = MetricFrame::new(catalog.metric("sun_altitude").unwrap());
        frame.append("2024-06-21T00:00:00Z".parse().unwrap(), -20.5);

        let value = serde_json::to_value(Frame::from(frame)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Sun altitude",
                "fields": [
                    { "name": "Time", "type": "time", "values": ["2024-06-21T00:00:00Z"] },
                    {
                        "name": "Value",
                        "type": "number",
                        "config": { "unit": "degree", "decimals": 1, "min": 0.0 },
                        "values": [-20.5]
                    }
                ]
            })
        );
    }

    #[test]
    fn annotation_frame_has_four_fields() {
        let catalog = Catalog::builtin();
        let def = catalog.annotation("moonrise").unwrap();
        let mut frame = AnnotationFrame::new(def);
        frame.append("2024-06-21T21:13:00Z".parse().unwrap(), def);

        let frame = Frame::from(frame);
        assert_eq!(frame.field_names(), ["Time", "Title", "Text", "Tags"]);
        assert_eq!(frame.len(), 1);

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["name"], "Moonrise");
        assert_eq!(value["fields"][1]["values"][0], "Moonrise");
        assert_eq!(value["fields"][3]["values"][0], "moon");
        assert!(value["fields"][0].get("config").is_none());
    }
}
