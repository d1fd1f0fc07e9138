// 3D scene for every section at once: polygon meshes, borehole markers, grid and camera
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::color::{Color, HexColor};
use crate::config::ViewerConfig;
use crate::geometry::{cylinder, fan_indices, BufferGeometry};
use crate::models::{Borehole, GeologyDocument, Polygon};

const BACKGROUND: &str = "#FFFFFF";
const GRID_COLOR: &str = "#CCCCCC";
const AXIS_COLOR: &str = "#000000";
const TICK_HALF_LENGTH: f64 = 2.0;

/// File coordinates `[x, y, z]` (z = elevation) to scene coordinates with +Y up.
pub fn to_scene_axes(vertex: [f64; 3]) -> Point3<f64> {
    let [x, y, z] = vertex;
    Point3::new(x, z, -y)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds3 {
    /// Bounds of every 3D polygon vertex in scene axes; the zero box when there are none.
    pub fn of_document(document: &GeologyDocument) -> Bounds3 {
        let mut min = Vector3::repeat(f64::INFINITY);
        let mut max = Vector3::repeat(f64::NEG_INFINITY);
        let mut any = false;

        for section in &document.polygons_by_section {
            for polygon in &section.polygons {
                for point in &polygon.points_3d {
                    let p = to_scene_axes(point.vertex).coords;
                    min = min.inf(&p);
                    max = max.sup(&p);
                    any = true;
                }
            }
        }

        if !any {
            return Bounds3 { min: [0.0; 3], max: [0.0; 3] };
        }
        Bounds3 {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
        }
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.max[0] + self.min[0]) / 2.0,
            (self.max[1] + self.min[1]) / 2.0,
            (self.max[2] + self.min[2]) / 2.0,
        ]
    }

    /// Grid edge length: the wider horizontal span, never below `min_size`.
    pub fn grid_size(&self, min_size: f64) -> f64 {
        (self.max[0] - self.min[0]).max(self.max[2] - self.min[2]).max(min_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSetup {
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub up: [f64; 3],
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub screen_space_panning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lighting {
    pub ambient_intensity: f64,
    pub directional_position: [f64; 3],
    pub directional_intensity: f64,
}

/// Line segments as flat `[x0, y0, z0, x1, y1, z1, ...]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSet {
    pub positions: Vec<f32>,
    pub color: String,
    pub opacity: f64,
}

impl LineSet {
    fn new(color: &str, opacity: f64) -> Self {
        LineSet {
            positions: Vec::new(),
            color: color.to_string(),
            opacity,
        }
    }

    fn push(&mut self, a: [f64; 3], b: [f64; 3]) {
        self.positions
            .extend(a.iter().chain(b.iter()).map(|v| *v as f32));
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 6
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSetup {
    pub size: f64,
    pub divisions: u32,
    pub center: [f64; 3],
    /// Square grid lines, `size * 2` wide.
    pub lines: LineSet,
    pub ticks: LineSet,
    pub axes: LineSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialParams {
    pub color: String,
    pub rgb: Color,
    pub opacity: f64,
    pub transparent: bool,
    pub double_sided: bool,
    pub flat_shading: bool,
    pub shininess: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonMesh {
    pub key: String,
    pub section_name: String,
    pub symbol: String,
    pub geometry: BufferGeometry,
    pub material: MaterialParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedMesh {
    pub position: [f64; 3],
    pub geometry: BufferGeometry,
    pub material: MaterialParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub text: String,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoreholeMarker {
    pub key: String,
    pub name: String,
    pub shaft: PlacedMesh,
    pub collar: PlacedMesh,
    pub label: TextLabel,
}

/// Everything the three.js host needs to draw the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub background: String,
    pub bounds: Bounds3,
    pub center: [f64; 3],
    pub camera: CameraSetup,
    pub lighting: Lighting,
    pub grid: GridSetup,
    pub polygons: Vec<PolygonMesh>,
    pub boreholes: Vec<BoreholeMarker>,
}

fn camera_for(center: [f64; 3], config: &ViewerConfig) -> CameraSetup {
    CameraSetup {
        position: [center[0] + config.camera_offset, config.camera_height, center[2] + config.camera_offset],
        target: [center[0], 0.0, center[2]],
        up: [0.0, 1.0, 0.0],
        fov: config.camera_fov,
        near: 0.1,
        far: 20000.0,
        enable_damping: true,
        damping_factor: 0.05,
        screen_space_panning: true,
    }
}

/// Ground grid in the y = 0 plane with tick marks and two axis lines through the center.
pub fn build_grid(size: f64, center: [f64; 3], divisions: u32) -> GridSetup {
    let divisions = divisions.max(1);
    let (cx, cz) = (center[0], center[2]);
    let step = size * 2.0 / divisions as f64;

    let mut lines = LineSet::new(GRID_COLOR, 0.5);
    for i in 0..=divisions {
        let offset = -size + i as f64 * step;
        lines.push([cx - size, 0.0, cz + offset], [cx + size, 0.0, cz + offset]);
        lines.push([cx + offset, 0.0, cz - size], [cx + offset, 0.0, cz + size]);
    }

    let mut ticks = LineSet::new(AXIS_COLOR, 1.0);
    for i in 0..=divisions {
        let pos = (i as f64 - divisions as f64 / 2.0) * step;
        ticks.push([pos + cx, 0.0, cz - TICK_HALF_LENGTH], [pos + cx, 0.0, cz + TICK_HALF_LENGTH]);
        ticks.push([cx - TICK_HALF_LENGTH, 0.0, pos + cz], [cx + TICK_HALF_LENGTH, 0.0, pos + cz]);
    }

    let mut axes = LineSet::new(AXIS_COLOR, 1.0);
    axes.push([cx - size, 0.0, cz], [cx + size, 0.0, cz]);
    axes.push([cx, 0.0, cz - size], [cx, 0.0, cz + size]);

    GridSetup {
        size,
        divisions,
        center: [cx, 0.0, cz],
        lines,
        ticks,
        axes,
    }
}

/// Fan-triangulated surface of one polygon; `None` below three vertices.
pub fn polygon_geometry(polygon: &Polygon) -> Option<BufferGeometry> {
    if polygon.points_3d.len() < 3 {
        return None;
    }
    let vertices: Vec<f32> = polygon
        .points_3d
        .iter()
        .flat_map(|p| {
            let s = to_scene_axes(p.vertex);
            [s.x as f32, s.y as f32, s.z as f32]
        })
        .collect();
    Some(BufferGeometry::from_indexed(vertices, fan_indices(polygon.points_3d.len())))
}

fn polygon_material(color: &HexColor) -> MaterialParams {
    MaterialParams {
        color: color.css(),
        rgb: color.rgb(),
        opacity: 0.95,
        transparent: true,
        double_sided: true,
        flat_shading: true,
        shininess: 0.0,
    }
}

pub fn borehole_marker(key: String, borehole: &Borehole, config: &ViewerConfig) -> BoreholeMarker {
    let style = &config.borehole;
    let color = HexColor::new(&style.color);
    let material = |opacity: f64| MaterialParams {
        color: color.css(),
        rgb: color.rgb(),
        opacity,
        transparent: opacity < 1.0,
        double_sided: false,
        flat_shading: false,
        shininess: 30.0,
    };
    let Borehole { x, elevation, depth, .. } = *borehole;

    BoreholeMarker {
        key,
        name: borehole.name.clone(),
        shaft: PlacedMesh {
            position: [x, -depth / 2.0, elevation],
            geometry: cylinder(style.shaft_radius, style.shaft_radius, depth, style.radial_segments),
            material: material(0.7),
        },
        collar: PlacedMesh {
            position: [x, 0.0, elevation],
            geometry: cylinder(style.collar_radius, style.collar_radius, style.collar_height, style.radial_segments),
            material: material(1.0),
        },
        label: TextLabel {
            text: borehole.name.clone(),
            position: [x, style.label_offset, elevation],
        },
    }
}

pub fn build_scene(document: &GeologyDocument, config: &ViewerConfig) -> SceneDescription {
    let bounds = Bounds3::of_document(document);
    let center = bounds.center();
    let grid_size = bounds.grid_size(config.min_grid_size);

    let mut polygons = Vec::new();
    let mut boreholes = Vec::new();
    for section in &document.polygons_by_section {
        for (index, polygon) in section.polygons.iter().enumerate() {
            if let Some(geometry) = polygon_geometry(polygon) {
                polygons.push(PolygonMesh {
                    key: format!("{}-{}", section.section_id, index),
                    section_name: section.section_name.clone(),
                    symbol: polygon.symbol.clone(),
                    geometry,
                    material: polygon_material(&polygon.color),
                });
            }
        }
        for (index, borehole) in section.boreholes.iter().enumerate() {
            let key = format!("{}-borehole-{}", section.section_id, index);
            boreholes.push(borehole_marker(key, borehole, config));
        }
    }

    SceneDescription {
        background: BACKGROUND.to_string(),
        bounds,
        center,
        camera: camera_for(center, config),
        lighting: Lighting {
            ambient_intensity: 0.7,
            directional_position: [1.0, 1.0, 1.0],
            directional_intensity: 0.3,
        },
        grid: build_grid(grid_size, center, config.grid_divisions),
        polygons,
        boreholes,
    }
}
