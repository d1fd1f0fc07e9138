// SVG markup for the section view
use std::fmt::Write;

use crate::view2d::{AxisOrientation, AxisView, LabelBox, SectionScene, SectionView};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn open_svg(out: &mut String, width: f64, height: f64) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
}

/// Serialize a rendered section view. `Idle` yields an empty drawing of the given size.
pub fn to_svg(view: &SectionView, width: f64, height: f64) -> String {
    let mut out = String::new();
    match view {
        SectionView::Idle => {
            open_svg(&mut out, width, height);
        }
        SectionView::Placeholder(p) => {
            open_svg(&mut out, width, height);
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" class="error-text">{}</text>"#,
                p.x,
                p.y,
                escape_xml(&p.message)
            );
        }
        SectionView::Scene(scene) => {
            open_svg(&mut out, scene.width, scene.height);
            write_scene(&mut out, scene);
        }
    }
    out.push_str("</svg>");
    out
}

fn write_scene(out: &mut String, scene: &SectionScene) {
    let _ = write!(out, r#"<g class="polygons" transform="{}">"#, scene.transform.to_svg_attr());
    for path in &scene.polygons {
        let _ = write!(
            out,
            r#"<g><path data-index="{}" d="{}" fill="{}" stroke="{}" stroke-width="{}" style="cursor: pointer"/>"#,
            path.index,
            path.d,
            escape_xml(&path.fill),
            path.stroke,
            path.stroke_width
        );
        if let Some(label) = scene.label.as_ref().filter(|l| l.polygon_index == path.index) {
            write_label(out, label);
        }
        out.push_str("</g>");
    }
    out.push_str("</g>");

    write_axis(out, &scene.x_axis, "x-axis");
    write_axis(out, &scene.y_axis, "y-axis");

    for caption in &scene.captions {
        match &caption.transform {
            Some(t) => {
                let _ = write!(
                    out,
                    r#"<text transform="{}" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                    t,
                    caption.x,
                    caption.y,
                    escape_xml(&caption.text)
                );
            }
            None => {
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                    caption.x,
                    caption.y,
                    escape_xml(&caption.text)
                );
            }
        }
    }
}

fn write_label(out: &mut String, label: &LabelBox) {
    let bg = &label.background;
    let _ = write!(
        out,
        r#"<g class="polygon-label"><rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}" fill="{}" opacity="{}"/>"#,
        bg.x, bg.y, bg.width, bg.height, bg.rx, bg.ry, label.fill, label.opacity
    );
    for (pos, text) in [
        (label.symbol_position, &label.symbol),
        (label.description_position, &label.description),
    ] {
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" class="label-text">{}</text>"#,
            pos[0],
            pos[1],
            escape_xml(text)
        );
    }
    out.push_str("</g>");
}

fn write_axis(out: &mut String, axis: &AxisView, class: &str) {
    let _ = write!(out, r#"<g class="{}" transform="{}" fill="none" font-size="10">"#, class, axis.transform);
    let (r0, r1) = axis.range;
    match axis.orientation {
        AxisOrientation::Bottom => {
            let _ = write!(out, r#"<path class="domain" stroke="currentColor" d="M{},{}V0H{}V{}"/>"#, r0, TICK_SIZE, r1, TICK_SIZE);
        }
        AxisOrientation::Left => {
            let _ = write!(out, r#"<path class="domain" stroke="currentColor" d="M{},{}H0V{}H{}"/>"#, -TICK_SIZE, r0, r1, -TICK_SIZE);
        }
    }
    let (lo, hi) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
    for tick in axis.ticks.iter().filter(|t| t.position >= lo - 0.5 && t.position <= hi + 0.5) {
        match axis.orientation {
            AxisOrientation::Bottom => {
                let _ = write!(
                    out,
                    r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="{}"/><text fill="currentColor" y="{}" dy="0.71em" text-anchor="middle">{}</text></g>"#,
                    tick.position,
                    TICK_SIZE,
                    TICK_SIZE + TICK_PADDING,
                    escape_xml(&tick.label)
                );
            }
            AxisOrientation::Left => {
                let _ = write!(
                    out,
                    r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="{}"/><text fill="currentColor" x="{}" dy="0.32em" text-anchor="end">{}</text></g>"#,
                    tick.position,
                    -TICK_SIZE,
                    -(TICK_SIZE + TICK_PADDING),
                    escape_xml(&tick.label)
                );
            }
        }
    }
    out.push_str("</g>");
}
