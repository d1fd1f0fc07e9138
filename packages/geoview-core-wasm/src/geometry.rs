// Mesh primitives handed to three.js as BufferGeometry attributes
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Indexed triangle mesh with flat `[x, y, z, ...]` attribute arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BufferGeometry {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub has_data: bool,
}

impl BufferGeometry {
    pub fn empty() -> Self {
        BufferGeometry::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Builds an indexed mesh and derives its normals from the faces.
    pub fn from_indexed(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        let normals = compute_vertex_normals(&vertices, &indices);
        let has_data = !vertices.is_empty() && !indices.is_empty();
        BufferGeometry {
            vertices,
            normals,
            indices,
            has_data,
        }
    }
}

/// Triangle fan over an ordered ring: (0, i, i + 1). Fewer than 3 points yield nothing.
pub fn fan_indices(point_count: usize) -> Vec<u32> {
    if point_count < 3 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity((point_count - 2) * 3);
    for i in 1..(point_count - 1) {
        indices.push(0);
        indices.push(i as u32);
        indices.push(i as u32 + 1);
    }
    indices
}

fn vertex_at(positions: &[f32], index: usize) -> Vector3<f32> {
    Vector3::new(positions[index * 3], positions[index * 3 + 1], positions[index * 3 + 2])
}

// Compute vertex normals for an indexed mesh
pub fn compute_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accum = vec![Vector3::<f32>::zeros(); vertex_count];

    for face in indices.chunks_exact(3) {
        let (a, b, c) = (face[0] as usize, face[1] as usize, face[2] as usize);
        if a >= vertex_count || b >= vertex_count || c >= vertex_count {
            continue;
        }
        let pa = vertex_at(positions, a);
        let pb = vertex_at(positions, b);
        let pc = vertex_at(positions, c);

        let face_normal = (pb - pa).cross(&(pc - pa));
        let len = face_normal.norm();
        if len <= f32::EPSILON {
            // Degenerate triangle contributes nothing
            continue;
        }
        let unit = face_normal / len;
        accum[a] += unit;
        accum[b] += unit;
        accum[c] += unit;
    }

    let mut normals = Vec::with_capacity(positions.len());
    for n in accum {
        let len = n.norm();
        if len > 0.0 {
            normals.extend_from_slice(&[n.x / len, n.y / len, n.z / len]);
        } else {
            normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }
    normals
}

/// Closed cylinder centered on the origin along +Y.
///
/// Vertex layout follows three.js `CylinderGeometry` with one height segment:
/// the side ring pairs come first, then the top cap, then the bottom cap.
pub fn cylinder(radius_top: f64, radius_bottom: f64, height: f64, radial_segments: u32) -> BufferGeometry {
    let segments = radial_segments.max(3);
    let half_height = height / 2.0;
    let mut vertices: Vec<f32> = Vec::new();
    let mut normals: Vec<f32> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Side
    let slope = if height != 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };
    let mut rows: Vec<Vec<u32>> = Vec::with_capacity(2);
    for y in 0..=1u32 {
        let v = y as f64;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::with_capacity(segments as usize + 1);
        for x in 0..=segments {
            let theta = x as f64 / segments as f64 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            vertices.extend_from_slice(&[
                (radius * sin) as f32,
                (-v * height + half_height) as f32,
                (radius * cos) as f32,
            ]);
            let n = Vector3::new(sin, slope, cos).normalize();
            normals.extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
            row.push((vertices.len() / 3 - 1) as u32);
        }
        rows.push(row);
    }
    for x in 0..segments as usize {
        let a = rows[0][x];
        let b = rows[1][x];
        let c = rows[1][x + 1];
        let d = rows[0][x + 1];
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    // Caps
    for (radius, sign) in [(radius_top, 1.0f64), (radius_bottom, -1.0f64)] {
        let center_start = (vertices.len() / 3) as u32;
        for _ in 0..segments {
            vertices.extend_from_slice(&[0.0, (half_height * sign) as f32, 0.0]);
            normals.extend_from_slice(&[0.0, sign as f32, 0.0]);
        }
        let ring_start = (vertices.len() / 3) as u32;
        for x in 0..=segments {
            let theta = x as f64 / segments as f64 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            vertices.extend_from_slice(&[
                (radius * sin) as f32,
                (half_height * sign) as f32,
                (radius * cos) as f32,
            ]);
            normals.extend_from_slice(&[0.0, sign as f32, 0.0]);
        }
        for x in 0..segments {
            let c = center_start + x;
            let i = ring_start + x;
            if sign > 0.0 {
                indices.extend_from_slice(&[i, i + 1, c]);
            } else {
                indices.extend_from_slice(&[i + 1, i, c]);
            }
        }
    }

    BufferGeometry {
        has_data: !indices.is_empty(),
        vertices,
        normals,
        indices,
    }
}
