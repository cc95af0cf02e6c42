//! UV projection for disc-like parts
//!
//! Lathed bodies keep the wraparound UVs the lathe produced (and get repeat
//! addressing on their textures); truss and neck builders author theirs per
//! vertex. Only the saucer and bridge are re-projected here.

use glam::Vec2;

use super::buffer::GeometryBuffer;
use super::modifiers::MeshModifier;

/// Top-down projection onto the XZ bounding box
///
/// `u = (x − min_x) / size_x`, `v = 1 − (z − min_z) / size_z`, computed on the
/// already deformed positions. With `split_faces`, vertices at or above the
/// XZ plane land in `v ∈ [0, 0.5]` and the rest in `v ∈ [0.5, 1]`, so the top
/// and bottom of a disc share one texture without overlapping.
///
/// `bounds` overrides the measured XZ box, so pieces of one surface built
/// separately (the saucer's half-shells) project into one shared frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanarProjection {
    pub split_faces: bool,
    /// Explicit (min, max) of the XZ box, as `Vec2(x, z)`
    pub bounds: Option<(Vec2, Vec2)>,
}

impl PlanarProjection {
    pub fn top_down() -> Self {
        Self {
            split_faces: false,
            bounds: None,
        }
    }

    pub fn split() -> Self {
        Self {
            split_faces: true,
            bounds: None,
        }
    }

    /// Project into a fixed XZ box instead of the buffer's own
    pub fn within(mut self, min: Vec2, max: Vec2) -> Self {
        self.bounds = Some((min, max));
        self
    }
}

/// Normalized coordinate within an extent; a zero extent maps to the middle
#[inline]
fn normalize(value: f32, min: f32, size: f32) -> f32 {
    if size > f32::EPSILON {
        ((value - min) / size).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

impl MeshModifier for PlanarProjection {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        if mesh.positions.is_empty() {
            return;
        }
        let (min, max) = self.bounds.unwrap_or_else(|| {
            let (min, max) = mesh.bounds();
            (Vec2::new(min.x, min.z), Vec2::new(max.x, max.z))
        });
        let size = max - min;

        mesh.uvs = mesh
            .positions
            .iter()
            .map(|p| {
                let u = normalize(p[0], min.x, size.x);
                let v = 1.0 - normalize(p[2], min.y, size.y);
                if !self.split_faces {
                    [u, v]
                } else if p[1] >= 0.0 {
                    [u, v * 0.5]
                } else {
                    [u, 0.5 + v * 0.5]
                }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Lathe, ProfilePolyline};
    use glam::Vec3;

    /// Lens-shaped disc centered on the origin
    fn disc() -> GeometryBuffer {
        let profile = ProfilePolyline::new(vec![
            [0.0, -0.3],
            [1.5, -0.1],
            [2.0, 0.0],
            [1.5, 0.2],
            [0.0, 0.4],
        ]);
        Lathe::full(24).build(&profile).unwrap()
    }

    #[test]
    fn test_projection_in_unit_square() {
        let mut mesh = disc();
        PlanarProjection::top_down().apply(&mut mesh);
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        for uv in &mesh.uvs {
            assert!((0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]));
        }
    }

    #[test]
    fn test_fore_maps_to_top_of_texture() {
        let mut mesh = GeometryBuffer::new();
        mesh.push_vertex(Vec3::new(0.0, 0.0, 1.0), [0.0, 0.0]);
        mesh.push_vertex(Vec3::new(1.0, 0.0, -1.0), [0.0, 0.0]);
        PlanarProjection::top_down().apply(&mut mesh);
        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
        assert_eq!(mesh.uvs[1], [1.0, 1.0]);
    }

    #[test]
    fn test_split_faces_partitions_v() {
        let mut mesh = disc();
        PlanarProjection::split().apply(&mut mesh);
        for (p, uv) in mesh.positions.iter().zip(&mesh.uvs) {
            if p[1] >= 0.0 {
                assert!(uv[1] <= 0.5);
            } else {
                assert!(uv[1] >= 0.5);
            }
        }
    }

    #[test]
    fn test_shared_bounds_for_half_shell() {
        let profile = ProfilePolyline::new(vec![[0.0, -0.2], [2.0, 0.0], [0.0, 0.2]]);
        let mut half = Lathe::partial(12, 0.0, std::f32::consts::PI)
            .build(&profile)
            .unwrap();
        PlanarProjection::top_down()
            .within(Vec2::splat(-2.0), Vec2::splat(2.0))
            .apply(&mut half);
        // The starboard half (x >= 0) only reaches the right half of U
        assert!(half.uvs.iter().all(|uv| uv[0] >= 0.5 - 1e-5));
    }

    #[test]
    fn test_zero_extent_maps_to_center() {
        let mut mesh = GeometryBuffer::new();
        for _ in 0..3 {
            mesh.push_vertex(Vec3::new(2.0, 1.0, 2.0), [0.0, 0.0]);
        }
        PlanarProjection::top_down().apply(&mut mesh);
        assert!(mesh.uvs.iter().all(|uv| *uv == [0.5, 0.5]));
    }
}
