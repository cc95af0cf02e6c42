//! Mesh modifiers
//!
//! Every in-place operation on a `GeometryBuffer` (placement transforms,
//! reflections, normal smoothing and the deformation steps in `deform`)
//! implements `MeshModifier`, so a part's build reads as an ordered chain:
//! ```no_run
//! use shipwright::geometry::*;
//!
//! let profile = ProfilePolyline::new(vec![[0.0, 0.0], [1.0, 0.5], [0.0, 1.0]]);
//! let mut part = Lathe::full(16).build(&profile)?;
//! part.apply(Transform::rotate_x(90.0))
//!     .apply(Transform::translate(2.0, 0.0, 0.0))
//!     .apply(Reflect { axis: Axis::X })
//!     .apply(SmoothNormals::default());
//! # Ok::<(), shipwright::GeometryError>(())
//! ```

use glam::{Mat4, Vec3};
use hashbrown::HashMap;

use super::buffer::GeometryBuffer;

/// Trait for mesh modifiers
pub trait MeshModifier {
    /// Apply this modifier to a buffer, modifying it in place
    fn apply(&self, mesh: &mut GeometryBuffer);
}

impl<M: MeshModifier + ?Sized> MeshModifier for &M {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        (**self).apply(mesh);
    }
}

/// Extension trait for fluent modifier application
pub trait MeshApply {
    /// Apply a modifier and return `&mut Self` for chaining
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self;
}

impl MeshApply for GeometryBuffer {
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis (port/starboard)
    X,
    /// Y axis (dorsal/ventral)
    Y,
    /// Z axis (aft/fore)
    Z,
}

impl Axis {
    /// Component index into a `[f32; 3]`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Transform positions (and any derived normals) by a 4x4 matrix
///
/// Normals use the inverse-transpose so non-uniform scales stay correct.
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    /// Create a translation transform
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Mat4::from_translation(Vec3::new(x, y, z)),
        }
    }

    /// Create a rotation around the X axis (in degrees)
    pub fn rotate_x(degrees: f32) -> Self {
        Self {
            matrix: Mat4::from_rotation_x(degrees.to_radians()),
        }
    }
}

impl MeshModifier for Transform {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        let normal_matrix = self.matrix.inverse().transpose();

        for pos in &mut mesh.positions {
            *pos = self.matrix.transform_point3(Vec3::from(*pos)).to_array();
        }

        for norm in &mut mesh.normals {
            *norm = normal_matrix
                .transform_vector3(Vec3::from(*norm))
                .normalize_or_zero()
                .to_array();
        }
    }
}

/// Reflect a buffer across the plane through the origin normal to `axis`
///
/// Triangle winding is reversed so faces keep pointing outward. Used to derive
/// the port nacelle and pylon from the starboard ones.
pub struct Reflect {
    pub axis: Axis,
}

impl MeshModifier for Reflect {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        let a = self.axis.index();
        for pos in &mut mesh.positions {
            pos[a] = -pos[a];
        }
        // flip_winding negates normals, which restores the two untouched
        // components; re-negate the reflected one.
        mesh.flip_winding();
        for norm in &mut mesh.normals {
            *norm = [-norm[0], -norm[1], -norm[2]];
            norm[a] = -norm[a];
        }
    }
}

/// Recalculate normals by averaging face normals across shared positions
///
/// Vertices closer than `weld_threshold` are treated as one point, which hides
/// the UV seam of a lathed surface and closes its poles.
pub struct SmoothNormals {
    /// Distance threshold for considering vertices as sharing a position
    pub weld_threshold: f32,
}

impl Default for SmoothNormals {
    fn default() -> Self {
        Self {
            weld_threshold: 0.0001,
        }
    }
}

impl MeshModifier for SmoothNormals {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        let cell = self.weld_threshold.max(f32::EPSILON);
        let key = |p: [f32; 3]| {
            (
                (p[0] / cell).round() as i64,
                (p[1] / cell).round() as i64,
                (p[2] / cell).round() as i64,
            )
        };

        let mut groups: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let group_of: Vec<usize> = mesh
            .positions
            .iter()
            .map(|&p| {
                let next = groups.len();
                *groups.entry(key(p)).or_insert(next)
            })
            .collect();

        let mut accum = vec![Vec3::ZERO; groups.len()];
        for [i0, i1, i2] in mesh.triangles() {
            let p0 = Vec3::from(mesh.positions[i0 as usize]);
            let p1 = Vec3::from(mesh.positions[i1 as usize]);
            let p2 = Vec3::from(mesh.positions[i2 as usize]);
            let face = (p1 - p0).cross(p2 - p0);
            for i in [i0, i1, i2] {
                accum[group_of[i as usize]] += face;
            }
        }

        mesh.normals = group_of
            .iter()
            .map(|&g| accum[g].normalize_or_zero().to_array())
            .collect();
    }
}
