//! Flat-preserving subdivision for hand-built struts
//!
//! Each iteration splits every triangle into four at its edge midpoints, then
//! relaxes only the vertices sitting on a soft crease: where the adjacent faces
//! meet at an angle between `FLAT_DEGREES` and `crease_degrees`. Flat regions
//! and hard edges (the 90° corners of a strut's cross-section) keep their
//! exact positions, so the silhouette rounds off at elbow joints while the
//! faces stay planar.

use glam::Vec3;
use hashbrown::{HashMap, HashSet};

use super::buffer::GeometryBuffer;
use super::modifiers::MeshModifier;

/// Face normals closer than this are treated as coplanar
const FLAT_DEGREES: f32 = 1.0;

/// Positions closer than this are one point when finding creases
const WELD: f32 = 1e-5;

/// Subdivide, then smooth soft creases while keeping hard edges and flats
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatPreservingSubdivide {
    /// Number of subdivision iterations (each multiplies triangles by 4)
    pub iterations: u32,
    /// Dihedral angle above which an edge is hard and left alone
    pub crease_degrees: f32,
    /// Fraction of the way each crease vertex moves toward its neighbors
    pub smoothing: f32,
}

impl Default for FlatPreservingSubdivide {
    fn default() -> Self {
        Self {
            iterations: 1,
            crease_degrees: 60.0,
            smoothing: 0.5,
        }
    }
}

impl FlatPreservingSubdivide {
    pub fn iterations(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }
}

impl MeshModifier for FlatPreservingSubdivide {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        for _ in 0..self.iterations {
            subdivide_once(mesh);
            relax_creases(mesh, self.crease_degrees, self.smoothing.clamp(0.0, 1.0));
        }
        if !mesh.normals.is_empty() {
            mesh.compute_normals();
        }
    }
}

/// Midpoint subdivision: (A, B, C) becomes four triangles sharing edge midpoints
fn subdivide_once(mesh: &mut GeometryBuffer) {
    fn edge_key(a: u32, b: u32) -> (u32, u32) {
        if a < b { (a, b) } else { (b, a) }
    }

    let triangles: Vec<[u32; 3]> = mesh.triangles().collect();
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut indices = Vec::with_capacity(triangles.len() * 12);

    let mut midpoint = |mesh: &mut GeometryBuffer, a: u32, b: u32| -> u32 {
        *midpoints.entry(edge_key(a, b)).or_insert_with(|| {
            let pa = Vec3::from(mesh.positions[a as usize]);
            let pb = Vec3::from(mesh.positions[b as usize]);
            let ua = mesh.uvs[a as usize];
            let ub = mesh.uvs[b as usize];
            mesh.push_vertex(
                (pa + pb) * 0.5,
                [(ua[0] + ub[0]) * 0.5, (ua[1] + ub[1]) * 0.5],
            )
        })
    };

    for [i0, i1, i2] in triangles {
        let m01 = midpoint(mesh, i0, i1);
        let m12 = midpoint(mesh, i1, i2);
        let m20 = midpoint(mesh, i2, i0);
        indices.extend_from_slice(&[i0, m01, m20]);
        indices.extend_from_slice(&[m01, i1, m12]);
        indices.extend_from_slice(&[m20, m12, i2]);
        indices.extend_from_slice(&[m01, m12, m20]);
    }

    mesh.indices = Some(indices);
    mesh.normals.clear();
}

/// Move vertices on soft creases toward the average of their welded neighbors
fn relax_creases(mesh: &mut GeometryBuffer, crease_degrees: f32, smoothing: f32) {
    if smoothing == 0.0 {
        return;
    }
    let key = |p: [f32; 3]| {
        (
            (p[0] / WELD).round() as i64,
            (p[1] / WELD).round() as i64,
            (p[2] / WELD).round() as i64,
        )
    };

    let mut lookup: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let group_of: Vec<usize> = mesh
        .positions
        .iter()
        .map(|&p| {
            let next = lookup.len();
            *lookup.entry(key(p)).or_insert(next)
        })
        .collect();
    let groups = lookup.len();

    let mut center = vec![Vec3::ZERO; groups];
    for (i, &g) in group_of.iter().enumerate() {
        center[g] = Vec3::from(mesh.positions[i]);
    }

    let mut face_normals: Vec<Vec<Vec3>> = vec![Vec::new(); groups];
    let mut neighbors: Vec<HashSet<usize>> = vec![HashSet::new(); groups];
    for [i0, i1, i2] in mesh.triangles() {
        let g = [i0, i1, i2].map(|i| group_of[i as usize]);
        let normal = (center[g[1]] - center[g[0]])
            .cross(center[g[2]] - center[g[0]])
            .normalize_or_zero();
        for k in 0..3 {
            if normal != Vec3::ZERO {
                face_normals[g[k]].push(normal);
            }
            let (a, b) = (g[k], g[(k + 1) % 3]);
            if a != b {
                neighbors[a].insert(b);
                neighbors[b].insert(a);
            }
        }
    }

    let flat_cos = FLAT_DEGREES.to_radians().cos();
    let crease_cos = crease_degrees.to_radians().cos();
    let mut moved = center.clone();
    for g in 0..groups {
        let normals = &face_normals[g];
        if normals.is_empty() || neighbors[g].is_empty() {
            continue;
        }
        let min_dot = normals
            .iter()
            .enumerate()
            .flat_map(|(i, a)| normals[i + 1..].iter().map(move |b| a.dot(*b)))
            .fold(1.0f32, f32::min);
        if min_dot >= flat_cos || min_dot < crease_cos {
            continue;
        }
        let average =
            neighbors[g].iter().map(|&n| center[n]).sum::<Vec3>() / neighbors[g].len() as f32;
        moved[g] = center[g].lerp(average, smoothing);
    }

    for (i, &g) in group_of.iter().enumerate() {
        if moved[g].is_finite() {
            mesh.positions[i] = moved[g].to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open square tube along Z with unshared faces, like a single truss segment
    fn tube() -> GeometryBuffer {
        let mut mesh = GeometryBuffer::new();
        let corners = [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        for k in 0..4 {
            let a = corners[k];
            let b = corners[(k + 1) % 4];
            let i0 = mesh.push_vertex(a, [0.0, 0.0]);
            let i1 = mesh.push_vertex(b, [0.0, 1.0]);
            let i2 = mesh.push_vertex(b + Vec3::Z * 4.0, [1.0, 1.0]);
            let i3 = mesh.push_vertex(a + Vec3::Z * 4.0, [1.0, 0.0]);
            mesh.push_quad(i0, i1, i2, i3);
        }
        mesh
    }

    #[test]
    fn test_triangle_count_quadruples() {
        let mut mesh = tube();
        let before = mesh.triangle_count();
        FlatPreservingSubdivide::iterations(2).apply(&mut mesh);
        assert_eq!(mesh.triangle_count(), before * 16);
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn test_hard_edges_and_flats_stay_put() {
        let mut mesh = tube();
        FlatPreservingSubdivide::iterations(2).apply(&mut mesh);
        for p in &mesh.positions {
            // Every vertex still lies on the surface of the square tube
            let on_side = (p[0].abs() - 1.0).abs() < 1e-5 || (p[1].abs() - 1.0).abs() < 1e-5;
            assert!(on_side, "{p:?} left the tube surface");
        }
    }

    #[test]
    fn test_soft_crease_is_rounded() {
        // Two faces folded by 30 degrees along the X axis
        let mut mesh = GeometryBuffer::new();
        let fold = 30f32.to_radians();
        let a = mesh.push_vertex(Vec3::new(-1.0, 0.0, 0.0), [0.0, 0.5]);
        let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), [1.0, 0.5]);
        let c = mesh.push_vertex(Vec3::new(1.0, 0.0, 1.0), [1.0, 1.0]);
        let d = mesh.push_vertex(Vec3::new(-1.0, 0.0, 1.0), [0.0, 1.0]);
        let e = mesh.push_vertex(Vec3::new(1.0, fold.sin(), -fold.cos()), [1.0, 0.0]);
        let f = mesh.push_vertex(Vec3::new(-1.0, fold.sin(), -fold.cos()), [0.0, 0.0]);
        mesh.push_quad(a, b, c, d);
        mesh.push_quad(f, e, b, a);

        FlatPreservingSubdivide::default().apply(&mut mesh);
        // The crease midpoint (0,0,0) rises toward the folded side
        let moved = mesh
            .positions
            .iter()
            .any(|p| p[0].abs() < 1e-5 && p[2].abs() < 0.2 && p[1] > 1e-4);
        assert!(moved);
        assert!(mesh.is_finite());
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut mesh = tube();
        let before = mesh.clone();
        FlatPreservingSubdivide::iterations(0).apply(&mut mesh);
        assert_eq!(mesh, before);
    }
}
