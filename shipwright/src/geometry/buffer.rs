//! Geometry buffer shared by every builder
//!
//! Lathed surfaces, trusses and necks all hand back the same buffer type:
//! positions with parallel UVs, an optional index list and derived normals.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex positions, UVs, optional indices and derived normals
///
/// Invariants kept by every builder in this crate:
/// - `positions.len() == uvs.len()`
/// - every index is `< positions.len()`
/// - `normals` is either empty (not yet derived) or parallel to `positions`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryBuffer {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// UV coordinates as [u, v], parallel to `positions`
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices; `None` means every three vertices form a triangle
    pub indices: Option<Vec<u32>>,
    /// Per-vertex normals, derived by `compute_normals` or `SmoothNormals`
    pub normals: Vec<[f32; 3]>,
}

/// Interleaved vertex record for GPU upload
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GeometryBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty indexed buffer with room for `vertices` vertices
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Some(Vec::with_capacity(indices)),
            normals: Vec::new(),
        }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn push_vertex(&mut self, position: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.uvs.push(uv);
        index
    }

    /// Add a triangle by vertex indices
    #[inline]
    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices
            .get_or_insert_with(Vec::new)
            .extend_from_slice(&[i0, i1, i2]);
    }

    /// Add a quad `a b c d` (counter-clockwise) as two triangles
    #[inline]
    pub fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Iterate triangles as index triples, resolving implicit triangulation
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| match &self.indices {
            Some(indices) => [indices[t * 3], indices[t * 3 + 1], indices[t * 3 + 2]],
            None => {
                let base = (t * 3) as u32;
                [base, base + 1, base + 2]
            }
        })
    }

    /// Replace implicit triangulation with an explicit sequential index list
    pub fn ensure_indices(&mut self) -> &mut Vec<u32> {
        let count = (self.positions.len() / 3 * 3) as u32;
        self.indices.get_or_insert_with(|| (0..count).collect())
    }

    /// Reverse the winding of every triangle
    pub fn flip_winding(&mut self) {
        for tri in self.ensure_indices().chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        for n in &mut self.normals {
            *n = [-n[0], -n[1], -n[2]];
        }
    }

    /// Derive per-vertex normals from area-weighted face normals
    ///
    /// Vertices are not welded: duplicated vertices (UV seams, hard edges)
    /// keep separate normals. A vertex touched only by zero-area faces gets a
    /// zero normal.
    pub fn compute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];
        for [i0, i1, i2] in self.triangles() {
            let p0 = Vec3::from(self.positions[i0 as usize]);
            let p1 = Vec3::from(self.positions[i1 as usize]);
            let p2 = Vec3::from(self.positions[i2 as usize]);
            let face = (p1 - p0).cross(p2 - p0);
            accum[i0 as usize] += face;
            accum[i1 as usize] += face;
            accum[i2 as usize] += face;
        }
        self.normals = accum
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }

    /// Axis-aligned bounds as (min, max); both zero for an empty buffer
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| {
                let p = Vec3::from(*p);
                (min.min(p), max.max(p))
            },
        )
    }

    /// Append another buffer, offsetting its indices
    pub fn append(&mut self, other: &GeometryBuffer) {
        if other.positions.is_empty() {
            return;
        }
        let offset = self.positions.len() as u32;
        let had_normals = !self.normals.is_empty() || self.positions.is_empty();
        self.ensure_indices();

        self.positions.extend_from_slice(&other.positions);
        self.uvs.extend_from_slice(&other.uvs);
        let shifted: Vec<u32> = other.triangles().flatten().map(|i| i + offset).collect();
        self.ensure_indices().extend(shifted);

        if had_normals && other.normals.len() == other.positions.len() {
            self.normals.extend_from_slice(&other.normals);
        } else {
            self.normals.clear();
        }
    }

    /// True when no coordinate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.positions.iter().flatten().all(|c| c.is_finite())
            && self.uvs.iter().flatten().all(|c| c.is_finite())
            && self.normals.iter().flatten().all(|c| c.is_finite())
    }

    /// True when UVs are parallel to positions and every index is in range
    pub fn is_well_formed(&self) -> bool {
        let count = self.positions.len();
        self.uvs.len() == count
            && (self.normals.is_empty() || self.normals.len() == count)
            && self
                .indices
                .as_ref()
                .is_none_or(|idx| idx.len() % 3 == 0 && idx.iter().all(|&i| (i as usize) < count))
    }

    /// Interleave positions, normals and UVs for GPU upload
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0; 3]),
                uv: self.uvs.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect()
    }

    /// Interleaved vertex data as raw bytes
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// Index data as raw bytes (u32 little-endian on little-endian hosts)
    pub fn index_bytes(&self) -> Vec<u8> {
        let indices: Vec<u32> = self.triangles().flatten().collect();
        bytemuck::cast_slice(&indices).to_vec()
    }
}

/// Combine multiple buffers into one
pub fn combine(parts: &[&GeometryBuffer]) -> GeometryBuffer {
    let total_vertices: usize = parts.iter().map(|p| p.positions.len()).sum();
    let total_indices: usize = parts.iter().map(|p| p.triangle_count() * 3).sum();

    let mut result = GeometryBuffer::with_capacity(total_vertices, total_indices);
    for part in parts {
        result.append(part);
    }
    result
}
