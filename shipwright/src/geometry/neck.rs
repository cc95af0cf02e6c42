//! Neck (saucer → engineering hull connector)
//!
//! A ruled duct between two rectangular frames: the bottom frame sits on the
//! hull's topside, the top frame on the saucer's underside. Each corner
//! carries its own height so a frame can follow a sloped or curved surface.
//! The duct is sliced along Y; each slice interpolates the four corners,
//! pinches inside the undercut window and twists about its own center.

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use super::buffer::GeometryBuffer;

/// Attachment rectangle at one end of the neck
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NeckEnd {
    /// Z of the fore edge
    pub fore: f32,
    /// Z of the aft edge
    pub aft: f32,
    pub half_width: f32,
    /// Y of each corner, in corner order
    pub heights: [f32; 4],
    /// X of the rectangle's center
    pub lateral: f32,
}

impl NeckEnd {
    /// Corners: 0 (+x, fore), 1 (−x, fore), 2 (−x, aft), 3 (+x, aft)
    fn corners(&self) -> [Vec3; 4] {
        let (fore, aft) = if self.fore < self.aft {
            (self.aft, self.fore)
        } else {
            (self.fore, self.aft)
        };
        let w = self.half_width.abs();
        let x = self.lateral;
        let [y0, y1, y2, y3] = self.heights;
        [
            Vec3::new(x + w, y0, fore),
            Vec3::new(x - w, y1, fore),
            Vec3::new(x - w, y2, aft),
            Vec3::new(x + w, y3, aft),
        ]
    }
}

/// Localized waist along the neck's height
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NeckUndercut {
    /// Slice fraction at the narrowest point
    pub location: f32,
    /// Half the window width, as a slice fraction
    pub half_width: f32,
    pub amount: f32,
    pub curve: f32,
}

impl NeckUndercut {
    /// Slice scale at fraction `t`, in `[1 − amount, 1]`
    pub fn scale_at(&self, t: f32) -> f32 {
        let amount = if self.amount.is_finite() {
            self.amount.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if amount == 0.0 || !(self.half_width > f32::EPSILON) {
            return 1.0;
        }
        let distance = (t - self.location).abs();
        if distance >= self.half_width {
            return 1.0;
        }
        let curve = if self.curve.is_finite() {
            self.curve.max(0.01)
        } else {
            1.0
        };
        let progress = 1.0 - distance / self.half_width;
        (1.0 - amount * progress.powf(curve)).clamp(1.0 - amount, 1.0)
    }
}

/// Neck duct builder
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neck {
    pub bottom: NeckEnd,
    pub top: NeckEnd,
    /// Per-corner taper of the top frame about its center (corner order as
    /// in `NeckEnd`)
    pub taper: [f32; 4],
    /// Rotation about Y reached at the top slice (radians)
    pub twist: f32,
    pub undercut: NeckUndercut,
    /// Longitudinal steps; the duct has `slices + 1` rings
    pub slices: u32,
}

impl Neck {
    pub fn build(&self) -> GeometryBuffer {
        let slices = if self.slices == 0 {
            warn!("Neck::build: slices must be >= 1, clamping to 1");
            1
        } else {
            self.slices
        };
        let bottom = self.bottom.corners();
        let top = self.tapered_top();

        let rings = slices as usize + 1;
        let mut mesh = GeometryBuffer::with_capacity(rings * 5 + 8, slices as usize * 24 + 12);
        let mut first = [Vec3::ZERO; 4];
        let mut last = [Vec3::ZERO; 4];

        for i in 0..rings {
            let t = i as f32 / slices as f32;
            let ring = self.ring(&bottom, &top, t);
            for (k, corner) in ring.iter().enumerate() {
                mesh.push_vertex(*corner, [k as f32 * 0.25, t]);
            }
            mesh.push_vertex(ring[0], [1.0, t]);

            if i == 0 {
                first = ring;
            }
            last = ring;
        }

        for i in 0..slices {
            let base = i * 5;
            for k in 0..4 {
                let a = base + k;
                let a1 = a + 1;
                let b = a + 5;
                let b1 = b + 1;
                mesh.push_triangle(a, b, b1);
                mesh.push_triangle(a, b1, a1);
            }
        }

        push_cap(&mut mesh, &first, 0.0, false);
        push_cap(&mut mesh, &last, 1.0, true);
        mesh.compute_normals();

        debug!(
            "Neck::build: {} slices, {} vertices",
            slices,
            mesh.vertex_count()
        );
        mesh
    }

    /// Final (x, z) of the top ring's corners after taper, undercut and
    /// twist; the top heights do not move them
    pub fn top_footprint(&self) -> [Vec2; 4] {
        self.ring(&self.bottom.corners(), &self.tapered_top(), 1.0)
            .map(|c| Vec2::new(c.x, c.z))
    }

    /// Corners of the slice at fraction `t`
    fn ring(&self, bottom: &[Vec3; 4], top: &[Vec3; 4], t: f32) -> [Vec3; 4] {
        let twist = if self.twist.is_finite() { self.twist } else { 0.0 };
        let mut ring: [Vec3; 4] = std::array::from_fn(|k| bottom[k].lerp(top[k], t));

        let center = ring.iter().copied().sum::<Vec3>() * 0.25;
        let scale = self.undercut.scale_at(t);
        let (sin, cos) = (t * twist).sin_cos();
        for corner in &mut ring {
            let offset = Vec2::new(corner.x - center.x, corner.z - center.z) * scale;
            // rotation about +Y: x' = x cos + z sin, z' = −x sin + z cos
            let rotated = Vec2::new(
                offset.x * cos + offset.y * sin,
                -offset.x * sin + offset.y * cos,
            );
            corner.x = center.x + rotated.x;
            corner.z = center.z + rotated.y;
        }
        ring
    }

    fn tapered_top(&self) -> [Vec3; 4] {
        let corners = self.top.corners();
        let center = corners.iter().copied().sum::<Vec3>() * 0.25;
        let mut tapered = corners;
        for (corner, &ratio) in tapered.iter_mut().zip(&self.taper) {
            let ratio = if ratio.is_finite() { ratio.max(0.0) } else { 1.0 };
            let offset = *corner - center;
            *corner = center + Vec3::new(offset.x * ratio, offset.y, offset.z * ratio);
        }
        tapered
    }
}

/// Fan cap over four corners; the top cap faces +Y, the bottom −Y
fn push_cap(mesh: &mut GeometryBuffer, corners: &[Vec3; 4], v: f32, top: bool) {
    let ids: Vec<u32> = corners
        .iter()
        .enumerate()
        .map(|(k, &c)| mesh.push_vertex(c, [k as f32 * 0.25, v]))
        .collect();
    if top {
        mesh.push_triangle(ids[0], ids[2], ids[1]);
        mesh.push_triangle(ids[0], ids[3], ids[2]);
    } else {
        mesh.push_triangle(ids[0], ids[1], ids[2]);
        mesh.push_triangle(ids[0], ids[2], ids[3]);
    }
}
