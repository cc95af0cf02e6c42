//! Surfaces of revolution
//!
//! A `ProfilePolyline` of (radius, axial) points is swept around the Y axis.
//! Vertex layout follows the usual lathe convention: `x = r·sin φ`,
//! `y = axial`, `z = r·cos φ`, so φ = 0 points along +Z.

use std::f32::consts::TAU;

use glam::Vec3;
use tracing::warn;

use super::buffer::GeometryBuffer;
use crate::GeometryError;

/// Ordered 2D cross-section: each point is `[radius, axial]`
///
/// Axial position does not need to be monotonic (profiles may fold back, as
/// the deflector's antenna spike does). Self-intersecting sweeps are not
/// checked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfilePolyline {
    pub points: Vec<[f32; 2]>,
}

impl ProfilePolyline {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self { points }
    }

    /// Number of profile points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the profile was authored with a decreasing axial coordinate
    pub fn is_descending(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last[1] < first[1],
            _ => false,
        }
    }
}

/// Lathe sweep settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lathe {
    /// Radial divisions (rings are `segments + 1`, the last duplicating the
    /// first on a full sweep for the UV seam)
    pub segments: u32,
    /// Sweep start angle (radians)
    pub start: f32,
    /// Sweep extent (radians); 0 gives a zero-area surface
    pub sweep: f32,
}

impl Lathe {
    /// Full 2π sweep
    pub fn full(segments: u32) -> Self {
        Self {
            segments,
            start: 0.0,
            sweep: TAU,
        }
    }

    /// Partial sweep from `start` over `sweep` radians
    pub fn partial(segments: u32, start: f32, sweep: f32) -> Self {
        Self {
            segments,
            start,
            sweep,
        }
    }

    /// Build the revolution surface
    ///
    /// Produces `N × (S+1)` vertices with `u = i/S` and `v = j/(N-1)`. Winding
    /// faces outward for an ascending profile; a descending profile gets its
    /// winding flipped afterwards so normals still point outward.
    pub fn build(&self, profile: &ProfilePolyline) -> Result<GeometryBuffer, GeometryError> {
        if profile.len() < 2 {
            return Err(GeometryError::ProfileTooShort(profile.len()));
        }
        if self.segments == 0 {
            return Err(GeometryError::NoSegments);
        }

        let sweep = if self.sweep.is_finite() {
            self.sweep
        } else {
            warn!("Lathe::build: non-finite sweep, using 0.0");
            0.0
        };

        let levels = profile.len();
        let rings = self.segments as usize + 1;
        let mut mesh = GeometryBuffer::with_capacity(
            levels * rings,
            (levels - 1) * self.segments as usize * 6,
        );

        // A full turn closes on its first column exactly, so seam vertices
        // weld by position
        let closed = (sweep.abs() - TAU).abs() < 1e-6;
        let v_div = (levels - 1) as f32;
        for i in 0..rings {
            let u = i as f32 / self.segments as f32;
            let phi = if closed && i == rings - 1 {
                self.start
            } else {
                self.start + u * sweep
            };
            let (sin, cos) = phi.sin_cos();

            for (j, &[radius, axial]) in profile.points.iter().enumerate() {
                let position = Vec3::new(radius * sin, axial, radius * cos);
                mesh.push_vertex(position, [u, j as f32 / v_div]);
            }
        }

        let levels = levels as u32;
        for i in 0..self.segments {
            for j in 0..levels - 1 {
                let a = j + i * levels;
                let b = a + levels;
                let c = b + 1;
                let d = a + 1;
                mesh.push_triangle(a, b, d);
                mesh.push_triangle(b, c, d);
            }
        }

        if profile.is_descending() {
            mesh.flip_winding();
        }

        Ok(mesh)
    }
}
