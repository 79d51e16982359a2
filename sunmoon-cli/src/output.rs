//! Human-readable rendering of catalogs and responses.

use std::fmt::Write as _;

use chrono::SecondsFormat;
use sunmoon_core::{Catalog, Frame, Response};

pub fn print_targets(catalog: &Catalog) {
    print!("{}", render_targets(catalog));
}

pub fn print_response(response: &Response) {
    print!("{}", render_response(response));
}

fn render_targets(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Metrics:");
    for def in catalog.metrics() {
        let _ = writeln!(out, "  {:<22} {} [{}]", def.id.as_str(), def.title, def.unit);
    }

    let _ = writeln!(out, "Annotations:");
    for def in catalog.annotations() {
        let _ = writeln!(out, "  {:<22} {} ({})", def.id.as_str(), def.title, def.joined_tags());
    }

    out
}

fn render_response(response: &Response) -> String {
    let mut out = String::new();

    if response.is_empty() {
        let _ = writeln!(out, "No frames.");
        return out;
    }

    for (ref_id, data) in response.iter() {
        for frame in &data.frames {
            let _ = writeln!(out, "[{ref_id}] {} ({} rows)", frame.name(), frame.len());
            match frame {
                Frame::Metric(f) => {
                    let decimals = usize::from(f.config.decimals);
                    for p in &f.points {
                        let time = p.time.to_rfc3339_opts(SecondsFormat::Secs, true);
                        let _ = writeln!(
                            out,
                            "  {time}  {:>12.decimals$} {}",
                            p.value, f.config.unit
                        );
                    }
                }
                Frame::Annotation(f) => {
                    for row in &f.rows {
                        let time = row.time.to_rfc3339_opts(SecondsFormat::Secs, true);
                        let _ = writeln!(out, "  {time}  {}  [{}]", row.title, row.tags);
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunmoon_core::ResponseAssembler;
    use sunmoon_core::frame::{AnnotationFrame, MetricFrame};

    #[test]
    fn lists_every_target() {
        let catalog = Catalog::builtin();
        let text = render_targets(&catalog);

        assert!(text.starts_with("Metrics:\n  moon_illumination"));
        assert!(text.contains("sun_maximum_altitude"));
        assert!(text.contains("sunriseEnd"));
        assert!(text.contains("(time)"));
        assert_eq!(text.lines().count(), 2 + 7 + 18);
    }

    #[test]
    fn renders_metric_and_annotation_rows() {
        let catalog = Catalog::builtin();
        let mut altitude = MetricFrame::new(catalog.metric("sun_altitude").unwrap());
        altitude.append("2024-06-21T12:00:00Z".parse().unwrap(), 68.4321);

        let def = catalog.annotation("sunrise").unwrap();
        let mut sunrise = AnnotationFrame::new(def);
        sunrise.append("2024-06-21T03:45:10Z".parse().unwrap(), def);

        let mut assembler = ResponseAssembler::new();
        assembler.append("A", altitude);
        assembler.append("A", sunrise);
        let text = render_response(&assembler.finish());

        assert!(text.contains("[A] Sun altitude (1 rows)"));
        assert!(text.contains("2024-06-21T12:00:00Z"));
        assert!(text.contains("68.4 degree"));
        assert!(text.contains("2024-06-21T03:45:10Z  Sunrise  [sun]"));
    }

    #[test]
    fn empty_response() {
        assert_eq!(render_response(&Response::default()), "No frames.\n");
    }
}
