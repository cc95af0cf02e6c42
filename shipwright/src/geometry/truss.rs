//! Segmented rectangular struts (nacelle pylons)
//!
//! A truss is a chain of `TrussNode`s. Each node carries a cross-section
//! rectangle whose long side runs along the ship's Z axis (from `aft` to
//! `fore`) and whose short side is the strut thickness. Consecutive nodes are
//! joined by a prism segment of 8 vertices, its 4 start and 4 end corners.
//! Segments do not share vertices, but the corners of segment `i+1` start
//! exactly where segment `i` ended.

use glam::Vec3;
use tracing::{debug, warn};

use super::buffer::GeometryBuffer;
use super::modifiers::MeshModifier;
use super::subdivide::FlatPreservingSubdivide;
use crate::GeometryError;

/// More than this many subdivision iterations is clamped
const MAX_SUBDIVISIONS: u32 = 3;

/// V of each cross-section corner; long face `k` runs from corner `k` to `k+1`
const CORNER_V: [f32; 4] = [0.0, 0.25, 0.5, 0.75];

/// U depth of the patch an end cap samples, inward from its node's U
const CAP_U: f32 = 0.1;

/// One cross-section along a truss
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrussNode {
    pub center: Vec3,
    /// Signed Z offset of the fore face from `center` (always `>= aft`)
    pub fore: f32,
    /// Signed Z offset of the aft face from `center`
    pub aft: f32,
    /// Parametric position along the truss, used for U
    pub u: f32,
}

impl TrussNode {
    pub fn new(center: Vec3, fore: f32, aft: f32, u: f32) -> Self {
        Self {
            center,
            fore,
            aft,
            u,
        }
    }

    /// Attachment frame on a part of the given length
    ///
    /// The fractions locate the fore and aft faces along the part, 0 at its
    /// aft end and 1 at its fore end. Inverted fractions are swapped so the
    /// fore face always ends up at or ahead of the aft face.
    pub fn from_part(
        center: Vec3,
        part_length: f32,
        fore_fraction: f32,
        aft_fraction: f32,
        u: f32,
    ) -> Self {
        let (fore_fraction, aft_fraction) = if fore_fraction < aft_fraction {
            warn!(
                "TrussNode::from_part: fore fraction {} behind aft fraction {}, swapping",
                fore_fraction, aft_fraction
            );
            (aft_fraction, fore_fraction)
        } else {
            (fore_fraction, aft_fraction)
        };
        let length = part_length.max(0.0);
        Self {
            center,
            fore: (fore_fraction - 0.5) * length,
            aft: (aft_fraction - 0.5) * length,
            u,
        }
    }

    /// Blend two nodes (`t = 0` gives `self`)
    pub fn lerp(&self, other: &TrussNode, t: f32) -> Self {
        Self {
            center: self.center.lerp(other.center, t),
            fore: self.fore + (other.fore - self.fore) * t,
            aft: self.aft + (other.aft - self.aft) * t,
            u: self.u + (other.u - self.u) * t,
        }
    }
}

/// Intermediate routing node settings
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Elbow {
    /// Where between the two end frames the elbow sits (0..1)
    pub fraction: f32,
    /// Length of the segment between the two nodes of a double elbow
    pub length: f32,
    /// Offsets applied to the interpolated elbow position
    pub lateral: f32,
    pub vertical: f32,
    pub longitudinal: f32,
}

impl Elbow {
    fn offset(&self) -> Vec3 {
        Vec3::new(self.lateral, self.vertical, self.longitudinal)
    }
}

/// How a truss travels between its two end frames
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrussRoute {
    Direct,
    SingleElbow(Elbow),
    DoubleElbow(Elbow),
}

impl TrussRoute {
    /// Node chain from `start` to `end`, with `u` re-assigned by path length
    pub fn nodes(&self, start: TrussNode, end: TrussNode) -> Vec<TrussNode> {
        let mut nodes = vec![start];
        match self {
            TrussRoute::Direct => {}
            TrussRoute::SingleElbow(elbow) => {
                let t = elbow.fraction.clamp(0.0, 1.0);
                let mut node = start.lerp(&end, t);
                node.center += elbow.offset();
                nodes.push(node);
            }
            TrussRoute::DoubleElbow(elbow) => {
                let t = elbow.fraction.clamp(0.0, 1.0);
                let mut mid = start.lerp(&end, t);
                mid.center += elbow.offset();
                let direction = (end.center - start.center).normalize_or(Vec3::Y);
                let half = direction * elbow.length.max(0.0) * 0.5;
                nodes.push(TrussNode {
                    center: mid.center - half,
                    ..mid
                });
                nodes.push(TrussNode {
                    center: mid.center + half,
                    ..mid
                });
            }
        }
        nodes.push(end);
        assign_path_u(&mut nodes);
        nodes
    }
}

/// Spread `u` from the first node's to the last node's by cumulative length
fn assign_path_u(nodes: &mut [TrussNode]) {
    let (Some(first), Some(last)) = (nodes.first().copied(), nodes.last().copied()) else {
        return;
    };
    let mut distances = Vec::with_capacity(nodes.len());
    let mut total = 0.0;
    distances.push(0.0);
    for pair in nodes.windows(2) {
        total += pair[0].center.distance(pair[1].center);
        distances.push(total);
    }
    let count = nodes.len();
    for (i, node) in nodes.iter_mut().enumerate() {
        let t = if total > f32::EPSILON {
            distances[i] / total
        } else {
            i as f32 / (count - 1).max(1) as f32
        };
        node.u = first.u + (last.u - first.u) * t;
    }
}

/// Prism strut builder
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Truss {
    /// Full thickness of the cross-section's short side
    pub thickness: f32,
    /// Flat-preserving subdivision iterations (0 = none)
    pub subdivisions: u32,
}

impl Truss {
    /// Build the strut shell through `nodes`
    ///
    /// Each segment emits its 4 start and 4 end corners once, shared by the
    /// four long faces (fore, one side, aft, other side). Corner `k` sits at
    /// `V = k/4`, so the first three faces take the bands `[0, ¼]`, `[¼, ½]`
    /// and `[½, ¾]` and the closing face runs from `¾` back to 0. Only the
    /// first and last node get end caps. Coincident nodes give zero-area
    /// faces, never NaN.
    pub fn build(&self, nodes: &[TrussNode]) -> Result<GeometryBuffer, GeometryError> {
        if nodes.len() < 2 {
            return Err(GeometryError::TrussTooShort(nodes.len()));
        }

        let thickness = if self.thickness.is_finite() && self.thickness >= 0.0 {
            self.thickness
        } else {
            warn!(
                "Truss::build: thickness must be >= 0.0, clamping {} to 0.0",
                self.thickness
            );
            0.0
        };
        let subdivisions = if self.subdivisions > MAX_SUBDIVISIONS {
            warn!(
                "Truss::build: subdivisions {} too high, clamping to {}",
                self.subdivisions, MAX_SUBDIVISIONS
            );
            MAX_SUBDIVISIONS
        } else {
            self.subdivisions
        };

        let corners = node_corners(nodes, thickness * 0.5);
        let segments = nodes.len() - 1;
        let mut mesh = GeometryBuffer::with_capacity(segments * 8 + 8, segments * 24 + 12);

        for s in 0..segments {
            let (u0, u1) = (nodes[s].u, nodes[s + 1].u);
            let start: [u32; 4] =
                std::array::from_fn(|k| mesh.push_vertex(corners[s][k], [u0, CORNER_V[k]]));
            let end: [u32; 4] =
                std::array::from_fn(|k| mesh.push_vertex(corners[s + 1][k], [u1, CORNER_V[k]]));
            for k in 0..4 {
                let next = (k + 1) % 4;
                mesh.push_quad(start[k], end[k], end[next], start[next]);
            }
        }

        push_cap(&mut mesh, &corners[0], nodes[0].u, false);
        push_cap(&mut mesh, &corners[segments], nodes[segments].u, true);

        if subdivisions > 0 {
            FlatPreservingSubdivide::iterations(subdivisions).apply(&mut mesh);
        }
        mesh.compute_normals();

        debug!(
            "Truss::build: {} segments, {} vertices",
            segments,
            mesh.vertex_count()
        );
        Ok(mesh)
    }
}

/// Per-node corner rectangles
///
/// Corner order: 0 fore/+side, 1 fore/−side, 2 aft/−side, 3 aft/+side, where
/// the side axis is perpendicular to both the strut and Z. Interior nodes
/// average the side axes of their two segments so the joint stays closed.
fn node_corners(nodes: &[TrussNode], half_thickness: f32) -> Vec<[Vec3; 4]> {
    let segment_sides: Vec<Vec3> = nodes
        .windows(2)
        .map(|pair| {
            (pair[1].center - pair[0].center)
                .cross(Vec3::Z)
                .normalize_or(Vec3::X)
        })
        .collect();

    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let before = i.checked_sub(1).map(|s| segment_sides[s]);
            let after = segment_sides.get(i).copied();
            let side = match (before, after) {
                (Some(a), Some(b)) => (a + b).normalize_or(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => Vec3::X,
            } * half_thickness;
            let fore = node.center + Vec3::Z * node.fore;
            let aft = node.center + Vec3::Z * node.aft;
            [fore + side, fore - side, aft - side, aft + side]
        })
        .collect()
}

/// End cap quad over a `CAP_U × ¼` patch: fore corners at the node's U, aft
/// corners `CAP_U` further into the strut
fn push_cap(mesh: &mut GeometryBuffer, corners: &[Vec3; 4], u: f32, end: bool) {
    let u = u.clamp(0.0, 1.0);
    let inner = if end { u - CAP_U } else { u + CAP_U }.clamp(0.0, 1.0);
    let uvs = [[u, 0.0], [u, 0.25], [inner, 0.25], [inner, 0.0]];
    let ids: Vec<u32> = corners
        .iter()
        .zip(uvs)
        .map(|(&c, uv)| mesh.push_vertex(c, uv))
        .collect();
    if end {
        mesh.push_quad(ids[0], ids[3], ids[2], ids[1]);
    } else {
        mesh.push_quad(ids[0], ids[1], ids[2], ids[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight() -> [TrussNode; 2] {
        [
            TrussNode::new(Vec3::ZERO, 1.0, -1.0, 0.0),
            TrussNode::new(Vec3::new(4.0, 0.0, 0.0), 0.5, -0.5, 1.0),
        ]
    }

    #[test]
    fn test_too_few_nodes_is_error() {
        let truss = Truss {
            thickness: 0.2,
            subdivisions: 0,
        };
        assert_eq!(
            truss.build(&straight()[..1]),
            Err(GeometryError::TrussTooShort(1))
        );
    }

    #[test]
    fn test_segment_layout() {
        let start = straight()[0];
        let end = straight()[1];
        let nodes = TrussRoute::SingleElbow(Elbow {
            fraction: 0.5,
            vertical: 1.0,
            ..Default::default()
        })
        .nodes(start, end);
        let mesh = Truss {
            thickness: 0.2,
            subdivisions: 0,
        }
        .build(&nodes)
        .unwrap();
        // 2 segments × 8 corners + 2 caps × 4
        assert_eq!(mesh.vertex_count(), 2 * 8 + 8);
        assert_eq!(mesh.triangle_count(), 2 * 8 + 4);
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn test_segments_are_positionally_continuous() {
        let nodes = TrussRoute::DoubleElbow(Elbow {
            fraction: 0.4,
            length: 1.0,
            lateral: 0.3,
            vertical: -0.8,
            longitudinal: 0.2,
        })
        .nodes(straight()[0], straight()[1]);
        let mesh = Truss {
            thickness: 0.3,
            subdivisions: 0,
        }
        .build(&nodes)
        .unwrap();
        for s in 0..nodes.len() - 2 {
            for k in 0..4 {
                // end corner k of segment s vs start corner k of segment s+1
                let end = mesh.positions[s * 8 + 4 + k];
                let start = mesh.positions[(s + 1) * 8 + k];
                assert_eq!(end, start);
            }
        }
    }

    #[test]
    fn test_single_segment_emits_eight_corners() {
        let mesh = Truss {
            thickness: 0.2,
            subdivisions: 0,
        }
        .build(&straight())
        .unwrap();
        // 8 segment corners, then two 4-vertex caps
        assert_eq!(mesh.vertex_count(), 8 + 8);
        assert_eq!(mesh.triangle_count(), 8 + 4);
        let indices = mesh.indices.as_ref().unwrap();
        assert!(indices[..24].iter().all(|&i| i < 8));
    }

    #[test]
    fn test_corner_uvs() {
        let mesh = Truss {
            thickness: 0.2,
            subdivisions: 0,
        }
        .build(&straight())
        .unwrap();
        for k in 0..4 {
            assert_eq!(mesh.uvs[k], [0.0, CORNER_V[k]]);
            assert_eq!(mesh.uvs[4 + k], [1.0, CORNER_V[k]]);
        }
        assert!(mesh
            .uvs
            .iter()
            .all(|uv| (0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1])));
    }

    #[test]
    fn test_caps_cover_an_area_of_uv_space() {
        let mesh = Truss {
            thickness: 0.2,
            subdivisions: 0,
        }
        .build(&straight())
        .unwrap();
        for cap in [8, 12] {
            let uvs = &mesh.uvs[cap..cap + 4];
            let width = uvs.iter().map(|uv| uv[0]).fold(f32::MIN, f32::max)
                - uvs.iter().map(|uv| uv[0]).fold(f32::MAX, f32::min);
            let height = uvs.iter().map(|uv| uv[1]).fold(f32::MIN, f32::max)
                - uvs.iter().map(|uv| uv[1]).fold(f32::MAX, f32::min);
            assert!((width - CAP_U).abs() < 1e-6, "cap at {cap}");
            assert!((height - 0.25).abs() < 1e-6, "cap at {cap}");
        }
    }

    #[test]
    fn test_long_faces_point_outward() {
        let mesh = Truss {
            thickness: 0.4,
            subdivisions: 0,
        }
        .build(&straight())
        .unwrap();
        for i in 0..8 {
            let p = Vec3::from(mesh.positions[i]);
            let n = Vec3::from(mesh.normals[i]);
            let axis_point = Vec3::new(p.x, 0.0, 0.0);
            assert!(n.dot(p - axis_point) > 0.0);
        }
    }

    #[test]
    fn test_coincident_frames_degrade_gracefully() {
        let node = TrussNode::new(Vec3::new(1.0, 2.0, 3.0), 0.5, -0.5, 0.0);
        let mut other = node;
        other.u = 1.0;
        for subdivisions in [0, 2] {
            let mesh = Truss {
                thickness: 0.1,
                subdivisions,
            }
            .build(&[node, other])
            .unwrap();
            assert!(mesh.is_finite());
            assert!(mesh.is_well_formed());
        }
    }

    #[test]
    fn test_subdivision_keeps_end_cross_section() {
        let nodes = TrussRoute::SingleElbow(Elbow {
            fraction: 0.5,
            vertical: 1.5,
            ..Default::default()
        })
        .nodes(straight()[0], straight()[1]);
        let mesh = Truss {
            thickness: 0.2,
            subdivisions: 2,
        }
        .build(&nodes)
        .unwrap();
        assert!(mesh.is_finite());
        assert_eq!(mesh.triangle_count(), (2 * 8 + 4) * 16);
        let (min, _) = mesh.bounds();
        assert!((min.z - -1.0).abs() < 1e-4);
    }

    #[test]
    fn test_from_part_swaps_inverted_fractions() {
        let a = TrussNode::from_part(Vec3::ZERO, 10.0, 0.2, 0.8, 0.0);
        let b = TrussNode::from_part(Vec3::ZERO, 10.0, 0.8, 0.2, 0.0);
        assert_eq!(a, b);
        assert!(a.fore >= a.aft);
        assert!((a.fore - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_route_u_runs_start_to_end() {
        let nodes = TrussRoute::DoubleElbow(Elbow {
            fraction: 0.5,
            length: 0.5,
            ..Default::default()
        })
        .nodes(straight()[0], straight()[1]);
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].u, 0.0);
        assert_eq!(nodes[3].u, 1.0);
        assert!(nodes.windows(2).all(|w| w[0].u <= w[1].u));
    }
}
