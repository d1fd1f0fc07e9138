// Section view: one cross-section drawn as SVG polygons with axes and pan/zoom
use geo::{BoundingRect, Intersects, LineString, MultiPoint, Point};
use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::models::{GeologyDocument, Polygon, Section};
use crate::module_state::{ActiveLabel, Interaction2D};
use crate::scale::{Axis, LinearScale, Tick, ZoomTransform};

const LABEL_PADDING: f64 = 10.0;
const LABEL_HEIGHT: f64 = 50.0;
const LABEL_LINE_OFFSET: f64 = 10.0;
// Average glyph width relative to font size, used when the host cannot measure text
const GLYPH_WIDTH_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned bounds of every 2D vertex in a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent2D {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SectionView {
    /// No section selected yet.
    Idle,
    Placeholder(Placeholder),
    Scene(SectionScene),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub message: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScene {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub extent: Extent2D,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub transform: ZoomTransform,
    pub polygons: Vec<PolygonPath>,
    pub x_axis: AxisView,
    pub y_axis: AxisView,
    pub captions: Vec<Caption>,
    pub label: Option<LabelBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonPath {
    pub index: usize,
    /// SVG path data in untransformed screen space.
    pub d: String,
    pub points: Vec<[f64; 2]>,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub centroid: [f64; 2],
    pub symbol: String,
    pub symbol_description: String,
}

impl PolygonPath {
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Whether an untransformed screen point falls inside (or on) the outline.
    pub fn hit(&self, point: [f64; 2]) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let ring: LineString<f64> = self.points.iter().map(|p| (p[0], p[1])).collect();
        let polygon = geo::Polygon::new(ring, vec![]);
        polygon.intersects(&Point::new(point[0], point[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisOrientation {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisView {
    pub orientation: AxisOrientation,
    /// Group transform placing the axis along the plot edge.
    pub transform: String,
    /// Pixel span of the axis line.
    pub range: (f64, f64),
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub transform: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub ry: f64,
}

/// Floating label for a clicked polygon, sized to its two text lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBox {
    pub polygon_index: usize,
    pub symbol: String,
    pub description: String,
    pub symbol_position: [f64; 2],
    pub description_position: [f64; 2],
    pub background: Rect,
    pub fill: String,
    pub opacity: f64,
}

impl LabelBox {
    pub fn layout(
        polygon_index: usize,
        polygon: &PolygonPath,
        symbol_width: f64,
        description_width: f64,
    ) -> LabelBox {
        let [cx, cy] = polygon.centroid;
        let text_width = symbol_width.max(description_width);
        LabelBox {
            polygon_index,
            symbol: polygon.symbol.clone(),
            description: polygon.symbol_description.clone(),
            symbol_position: [cx, cy - LABEL_LINE_OFFSET],
            description_position: [cx, cy + LABEL_LINE_OFFSET],
            background: Rect {
                x: cx - text_width / 2.0 - LABEL_PADDING,
                y: cy - 25.0,
                width: text_width + LABEL_PADDING * 2.0,
                height: LABEL_HEIGHT,
                rx: 5.0,
                ry: 5.0,
            },
            fill: "white".to_string(),
            opacity: 0.8,
        }
    }
}

pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO
}

/// Outcome of a click in the section view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum ClickOutcome {
    Shown(usize),
    Hidden(usize),
    Missed,
}

pub fn section_extent(section: &Section) -> Option<Extent2D> {
    let points: MultiPoint<f64> = section
        .polygons
        .iter()
        .flat_map(|polygon| polygon.points_2d.iter())
        .map(|p| Point::new(p.vertex[0], p.vertex[1]))
        .collect();
    points.bounding_rect().map(|rect| Extent2D {
        min_x: rect.min().x,
        max_x: rect.max().x,
        min_y: rect.min().y,
        max_y: rect.max().y,
    })
}

fn format_path(points: &[[f64; 2]]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{},{}", p[0], p[1]));
    }
    if !points.is_empty() {
        d.push('Z');
    }
    d
}

fn polygon_path(index: usize, polygon: &Polygon, x_scale: &LinearScale, y_scale: &LinearScale) -> PolygonPath {
    let points: Vec<[f64; 2]> = polygon
        .points_2d
        .iter()
        .map(|p| [x_scale.apply(p.vertex[0]), y_scale.apply(p.vertex[1])])
        .collect();
    let centroid = if points.is_empty() {
        [0.0, 0.0]
    } else {
        let n = points.len() as f64;
        let (sx, sy) = points.iter().fold((0.0, 0.0), |acc, p| (acc.0 + p[0], acc.1 + p[1]));
        [sx / n, sy / n]
    };
    PolygonPath {
        index,
        d: format_path(&points),
        points,
        fill: polygon.color.css(),
        stroke: "black".to_string(),
        stroke_width: 1.0,
        centroid,
        symbol: polygon.symbol.clone(),
        symbol_description: polygon.symbol_description.clone(),
    }
}

fn placeholder(message: String, viewport: Viewport) -> SectionView {
    SectionView::Placeholder(Placeholder {
        message,
        x: viewport.width / 2.0,
        y: viewport.height / 2.0,
    })
}

fn build_paths(section: &Section, viewport: Viewport, config: &ViewerConfig) -> (Extent2D, LinearScale, LinearScale, Vec<PolygonPath>) {
    let extent = section_extent(section).unwrap_or_default();
    let padding = config.padding;
    let x_scale = LinearScale::new((extent.min_x, extent.max_x), (padding, viewport.width - padding));
    let y_scale = LinearScale::new((extent.min_y, extent.max_y), (viewport.height - padding, padding));
    let paths = section
        .polygons
        .iter()
        .enumerate()
        .map(|(i, polygon)| polygon_path(i, polygon, &x_scale, &y_scale))
        .collect();
    (extent, x_scale, y_scale, paths)
}

/// Lay out the selected section for a `viewport`-sized drawing area.
pub fn render_section(
    document: &GeologyDocument,
    selected: &str,
    viewport: Viewport,
    config: &ViewerConfig,
    interaction: &Interaction2D,
) -> SectionView {
    if selected.is_empty() {
        return SectionView::Idle;
    }
    let section = match document.find_section(selected) {
        Some(section) => section,
        None => return placeholder(format!("No section found with name: {}", selected), viewport),
    };
    if section.polygons.is_empty() {
        return placeholder(format!("No polygons found in section: {}", selected), viewport);
    }

    let (extent, x_scale, y_scale, polygons) = build_paths(section, viewport, config);
    let padding = config.padding;
    let transform = interaction.transform;

    let x_axis = AxisView {
        orientation: AxisOrientation::Bottom,
        transform: format!("translate(0,{})", viewport.height - padding),
        range: x_scale.range,
        ticks: x_scale.rescale(&transform, Axis::X).ticks(config.tick_count),
    };
    let y_axis = AxisView {
        orientation: AxisOrientation::Left,
        transform: format!("translate({},0)", padding),
        range: y_scale.range,
        ticks: y_scale.rescale(&transform, Axis::Y).ticks(config.tick_count),
    };

    let captions = vec![
        Caption {
            text: "X".to_string(),
            x: viewport.width / 2.0,
            y: viewport.height - 5.0,
            transform: None,
        },
        Caption {
            text: "Y".to_string(),
            x: -viewport.height / 2.0,
            y: 15.0,
            transform: Some("rotate(-90)".to_string()),
        },
    ];

    let label = interaction.active_label.as_ref().and_then(|active| {
        polygons.get(active.polygon_index).map(|path| {
            let symbol_width = active
                .symbol_width
                .unwrap_or_else(|| estimate_text_width(&path.symbol, config.label_font_size));
            let description_width = active
                .description_width
                .unwrap_or_else(|| estimate_text_width(&path.symbol_description, config.label_font_size));
            LabelBox::layout(active.polygon_index, path, symbol_width, description_width)
        })
    });

    SectionView::Scene(SectionScene {
        width: viewport.width,
        height: viewport.height,
        padding,
        extent,
        x_scale,
        y_scale,
        transform,
        polygons,
        x_axis,
        y_axis,
        captions,
        label,
    })
}

/// Toggle the label of the topmost polygon under a screen point.
///
/// `symbol_width` / `description_width` are text widths measured by the host,
/// if it has them. Clicking empty space leaves the current label in place.
pub fn handle_click(
    document: &GeologyDocument,
    selected: &str,
    viewport: Viewport,
    config: &ViewerConfig,
    interaction: &mut Interaction2D,
    point: [f64; 2],
    symbol_width: Option<f64>,
    description_width: Option<f64>,
) -> ClickOutcome {
    // Nothing is drawn without a selection, so nothing can be hit
    if selected.is_empty() {
        return ClickOutcome::Missed;
    }
    let section = match document.find_section(selected) {
        Some(section) if !section.polygons.is_empty() => section,
        _ => return ClickOutcome::Missed,
    };
    let (_, _, _, paths) = build_paths(section, viewport, config);
    let local = interaction.transform.invert(point);

    // Later polygons are drawn on top
    let hit = paths.iter().rev().find(|path| path.hit(local)).map(|path| path.index);
    match hit {
        Some(index) => {
            let showing = interaction
                .active_label
                .as_ref()
                .map(|active| active.polygon_index == index)
                .unwrap_or(false);
            if showing {
                interaction.active_label = None;
                ClickOutcome::Hidden(index)
            } else {
                interaction.active_label = Some(ActiveLabel {
                    polygon_index: index,
                    symbol_width,
                    description_width,
                });
                ClickOutcome::Shown(index)
            }
        }
        None => ClickOutcome::Missed,
    }
}

/// Wheel-style zoom around a screen point, clamped to the configured extent.
pub fn zoom(interaction: &mut Interaction2D, config: &ViewerConfig, point: [f64; 2], factor: f64) {
    interaction.transform = interaction.transform.zoom_at(point, factor, config.zoom_extent());
}

pub fn pan(interaction: &mut Interaction2D, dx: f64, dy: f64) {
    interaction.transform = interaction.transform.pan(dx, dy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;

    const VIEW: Viewport = Viewport { width: 480.0, height: 400.0 };

    fn sample() -> GeologyDocument {
        parse_document(
            r##"{"polygonsBySection": [
                {"sectionId": 1, "sectionName": "A", "polygons": [
                    {"points2D": [{"vertex": [0, 0]}, {"vertex": [100, 0]}, {"vertex": [100, 50]}, {"vertex": [0, 50]}],
                     "points3D": [], "color": "ff0000", "symbol": "Qal", "symbolDescription": "Alluvium"},
                    {"points2D": [{"vertex": [20, 10]}, {"vertex": [40, 10]}, {"vertex": [30, 30]}],
                     "points3D": [], "color": "#00ff00", "symbol": "Tg", "symbolDescription": "Granite"}
                ]},
                {"sectionId": 2, "sectionName": "Empty"}
            ]}"##,
        )
        .expect("document")
    }

    fn scene(view: SectionView) -> SectionScene {
        match view {
            SectionView::Scene(scene) => scene,
            other => panic!("expected scene, got {other:?}"),
        }
    }

    #[test]
    fn nothing_selected_is_idle() {
        let view = render_section(&sample(), "", VIEW, &ViewerConfig::default(), &Interaction2D::default());
        assert_eq!(view, SectionView::Idle);
    }

    #[test]
    fn unknown_section_renders_placeholder() {
        let view = render_section(&sample(), "Z", VIEW, &ViewerConfig::default(), &Interaction2D::default());
        assert_eq!(
            view,
            SectionView::Placeholder(Placeholder {
                message: "No section found with name: Z".to_string(),
                x: 240.0,
                y: 200.0,
            })
        );
    }

    #[test]
    fn section_without_polygons_renders_placeholder() {
        let view = render_section(&sample(), "Empty", VIEW, &ViewerConfig::default(), &Interaction2D::default());
        match view {
            SectionView::Placeholder(p) => assert_eq!(p.message, "No polygons found in section: Empty"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn extent_covers_every_vertex() {
        let doc = sample();
        let extent = section_extent(doc.find_section("A").expect("A")).expect("extent");
        assert_eq!(extent, Extent2D { min_x: 0.0, max_x: 100.0, min_y: 0.0, max_y: 50.0 });
    }

    #[test]
    fn paths_keep_vertex_count_and_prefixed_fill() {
        let doc = sample();
        let s = scene(render_section(&doc, "A", VIEW, &ViewerConfig::default(), &Interaction2D::default()));
        let section = doc.find_section("A").expect("A");
        for (path, polygon) in s.polygons.iter().zip(&section.polygons) {
            assert_eq!(path.vertex_count(), polygon.points_2d.len());
            assert_eq!(path.d.matches(|c| c == 'M' || c == 'L').count(), polygon.points_2d.len());
            assert_eq!(path.fill, format!("#{}", polygon.color.digits()));
        }
        assert_eq!(s.polygons[1].fill, "#00ff00");
    }

    #[test]
    fn extent_maps_to_padded_area() {
        let s = scene(render_section(&sample(), "A", VIEW, &ViewerConfig::default(), &Interaction2D::default()));
        // Bottom-left data corner lands at (padding, height - padding)
        assert_eq!(s.polygons[0].points[0], [40.0, 360.0]);
        assert_eq!(s.polygons[0].points[2], [440.0, 40.0]);
        assert_eq!(s.x_axis.transform, "translate(0,360)");
        assert_eq!(s.y_axis.transform, "translate(40,0)");
        assert!(s.x_axis.ticks.iter().any(|t| t.value == 100.0));
    }

    #[test]
    fn click_toggles_label_on_topmost_polygon() {
        let doc = sample();
        let cfg = ViewerConfig::default();
        let mut interaction = Interaction2D::default();
        let s = scene(render_section(&doc, "A", VIEW, &cfg, &interaction));
        let inner = s.polygons[1].centroid;

        let outcome = handle_click(&doc, "A", VIEW, &cfg, &mut interaction, inner, Some(30.0), Some(80.0));
        assert_eq!(outcome, ClickOutcome::Shown(1));

        let s = scene(render_section(&doc, "A", VIEW, &cfg, &interaction));
        let label = s.label.expect("label");
        assert_eq!(label.symbol, "Tg");
        assert_eq!(label.description, "Granite");
        assert_eq!(label.background.width, 100.0);
        assert_eq!(label.background.height, 50.0);
        assert_eq!(label.background.x, inner[0] - 50.0);
        assert_eq!(label.symbol_position, [inner[0], inner[1] - 10.0]);

        let outcome = handle_click(&doc, "A", VIEW, &cfg, &mut interaction, inner, None, None);
        assert_eq!(outcome, ClickOutcome::Hidden(1));
        assert!(interaction.active_label.is_none());
    }

    #[test]
    fn click_outside_keeps_label() {
        let doc = sample();
        let cfg = ViewerConfig::default();
        let mut interaction = Interaction2D::default();
        handle_click(&doc, "A", VIEW, &cfg, &mut interaction, [60.0, 350.0], None, None);
        assert_eq!(interaction.active_label.as_ref().map(|l| l.polygon_index), Some(0));

        let outcome = handle_click(&doc, "A", VIEW, &cfg, &mut interaction, [5.0, 5.0], None, None);
        assert_eq!(outcome, ClickOutcome::Missed);
        assert!(interaction.active_label.is_some());
    }

    #[test]
    fn click_without_selection_misses_unnamed_section() {
        let doc = parse_document(
            r#"{"polygonsBySection": [{"sectionId": 7, "sectionName": "", "polygons": [
                {"points2D": [{"vertex": [0, 0]}, {"vertex": [100, 0]}, {"vertex": [100, 50]}, {"vertex": [0, 50]}],
                 "points3D": [], "color": "ff0000"}
            ]}]}"#,
        )
        .expect("document");
        let cfg = ViewerConfig::default();
        let mut interaction = Interaction2D::default();
        assert_eq!(render_section(&doc, "", VIEW, &cfg, &interaction), SectionView::Idle);

        let outcome = handle_click(&doc, "", VIEW, &cfg, &mut interaction, [240.0, 200.0], None, None);
        assert_eq!(outcome, ClickOutcome::Missed);
        assert!(interaction.active_label.is_none());
    }

    #[test]
    fn click_respects_zoom_transform() {
        let doc = sample();
        let cfg = ViewerConfig::default();
        let mut interaction = Interaction2D::default();
        pan(&mut interaction, 1000.0, 0.0);
        // The rectangle has moved away from its unpanned screen position
        let outcome = handle_click(&doc, "A", VIEW, &cfg, &mut interaction, [60.0, 350.0], None, None);
        assert_eq!(outcome, ClickOutcome::Missed);
        let outcome = handle_click(&doc, "A", VIEW, &cfg, &mut interaction, [1060.0, 350.0], None, None);
        assert_eq!(outcome, ClickOutcome::Shown(0));
    }

    #[test]
    fn zoom_rescales_axes() {
        let doc = sample();
        let cfg = ViewerConfig::default();
        let mut interaction = Interaction2D::default();
        zoom(&mut interaction, &cfg, [40.0, 360.0], 2.0);
        let s = scene(render_section(&doc, "A", VIEW, &cfg, &interaction));
        let max_tick = s.x_axis.ticks.iter().map(|t| t.value).fold(f64::MIN, f64::max);
        assert!(max_tick <= 50.0);
        assert_eq!(s.transform.k, 2.0);
    }

    #[test]
    fn estimated_label_width_uses_font_size() {
        assert_eq!(estimate_text_width("abcd", 10.0), 24.0);
    }
}
