//! Primary hull: saucer half-shells and bridge dome

use std::f32::consts::PI;

use glam::Vec2;
use tracing::warn;

use super::{at_least, finite_or, segments, PartKind, ShipPart};
use crate::geometry::{
    Axis, AxisScale, Deformation, DeformationChain, Lathe, MeshApply, PlanarProjection,
    ProfilePolyline, Shear, SmoothNormals, Transform,
};
use crate::params::ShipShapeParameters;
use crate::texture::Section;
use crate::ShipError;

/// Start angle and sweep extent (radians) of the starboard and port shells
///
/// The starboard shell runs from the fore notch's edge to the aft notch's,
/// the port shell from the other side of the aft notch back around to the
/// fore notch. With both notches at 0 the two sweeps tile 2π exactly.
pub fn saucer_sweeps(params: &ShipShapeParameters) -> [(f32, f32); 2] {
    let notch = |name: &str, value: f32| {
        let clamped = if value.is_finite() { value.clamp(0.0, PI) } else { 0.0 };
        if clamped != value {
            warn!("saucer_sweeps: {name} must be in [0, PI], clamping to {clamped}");
        }
        clamped
    };
    let fore = notch("primary_notch_fore", params.primary_notch_fore);
    let aft = notch("primary_notch_aft", params.primary_notch_aft);
    let extent = PI - (fore + aft) * 0.5;
    [(fore * 0.5, extent), (PI + aft * 0.5, extent)]
}

fn saucer_radius(params: &ShipShapeParameters) -> f32 {
    at_least("saucer", "primary_radius", params.primary_radius, 0.001)
}

fn saucer_width(params: &ShipShapeParameters) -> f32 {
    at_least("saucer", "primary_width_ratio", params.primary_width_ratio, 0.01)
}

/// Profile points from the bottom center out to the rim's lower edge
const UNDERSIDE_LEVELS: usize = 5;

/// Rim-out cross-section from the bottom center to the top center
fn saucer_profile(params: &ShipShapeParameters) -> ProfilePolyline {
    let r = saucer_radius(params);
    let rim = at_least("saucer", "primary_thickness", params.primary_thickness, 0.0) * 0.5;
    let dome = at_least("saucer", "primary_dome_height", params.primary_dome_height, 0.0);
    let bottom = at_least("saucer", "primary_bottom_height", params.primary_bottom_height, 0.0)
        .max(rim);

    ProfilePolyline::new(vec![
        [0.0, -bottom],
        [r * 0.3, -bottom * 0.95],
        [r * 0.65, -bottom * 0.7],
        [r * 0.9, -rim - (bottom - rim) * 0.2],
        [r, -rim * 0.5],
        [r, rim * 0.5],
        [r * 0.9, rim + dome * 0.08],
        [r * 0.6, rim + dome * 0.35],
        [r * 0.3, rim + dome * 0.8],
        [0.0, rim + dome],
    ])
}

/// Width scale, shared top/bottom planar UVs, then fore-aft skew
///
/// The projection runs before the skew so the top/bottom split still follows
/// the unskewed rim.
pub fn saucer_deformations(params: &ShipShapeParameters) -> DeformationChain {
    let r = saucer_radius(params);
    let width = saucer_width(params);
    let half = Vec2::new(r * width, r);
    DeformationChain::new()
        .then(Deformation::Scale(AxisScale::width(width)))
        .then(Deformation::PlanarUv(PlanarProjection::split().within(-half, half)))
        .then(Deformation::Shear(Shear {
            source: Axis::Z,
            target: Axis::Y,
            factor: finite_or("saucer", "primary_skew", params.primary_skew, 0.0),
        }))
}

/// World Y of the saucer's underside below the point (x, z)
///
/// Follows the width ratio and the skew; points past the rim read the rim's
/// lower edge.
pub fn saucer_underside(params: &ShipShapeParameters, x: f32, z: f32) -> f32 {
    let profile = saucer_profile(params);
    let lower = &profile.points[..UNDERSIDE_LEVELS];
    let local_z = z - finite_or("saucer", "primary_z", params.primary_z, 0.0);
    let radius = Vec2::new(x / saucer_width(params), local_z).length();

    let rim = lower[UNDERSIDE_LEVELS - 1][1];
    let axial = lower
        .windows(2)
        .find(|w| radius <= w[1][0])
        .map_or(rim, |w| {
            let span = w[1][0] - w[0][0];
            let t = if span > 0.0 {
                ((radius - w[0][0]) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            w[0][1] + (w[1][1] - w[0][1]) * t
        });
    let skew = finite_or("saucer", "primary_skew", params.primary_skew, 0.0);
    finite_or("saucer", "primary_y", params.primary_y, 0.0) + axial + skew * local_z
}

/// Starboard and port saucer half-shells, built as two partial sweeps
pub fn saucer_shells(params: &ShipShapeParameters) -> Result<[ShipPart; 2], ShipError> {
    let profile = saucer_profile(params);
    let chain = saucer_deformations(params);
    let per_shell = (segments("saucer", "primary_segments", params.primary_segments) / 2)
        .max(super::MIN_SEGMENTS);
    let offset = Transform::translate(
        0.0,
        finite_or("saucer", "primary_y", params.primary_y, 0.0),
        finite_or("saucer", "primary_z", params.primary_z, 0.0),
    );

    let [starboard, port] = saucer_sweeps(params);
    let build = |(start, extent): (f32, f32), kind: PartKind| -> Result<ShipPart, ShipError> {
        let mut shell = Lathe::partial(per_shell, start, extent).build(&profile)?;
        shell.apply(&chain).apply(&offset).apply(SmoothNormals::default());
        Ok(ShipPart::new(kind, Section::Saucer, shell))
    };
    Ok([
        build(starboard, PartKind::SaucerStarboard)?,
        build(port, PartKind::SaucerPort)?,
    ])
}

/// Width scale, then top-down UVs
pub fn bridge_deformations(params: &ShipShapeParameters) -> DeformationChain {
    DeformationChain::new()
        .then(Deformation::Scale(AxisScale::width(at_least(
            "bridge",
            "bridge_width_ratio",
            params.bridge_width_ratio,
            0.01,
        ))))
        .then(Deformation::PlanarUv(PlanarProjection::top_down()))
}

/// Bridge dome seated on top of the saucer
pub fn bridge(params: &ShipShapeParameters) -> Result<ShipPart, ShipError> {
    let r = at_least("bridge", "bridge_radius", params.bridge_radius, 0.001);
    let h = at_least("bridge", "bridge_height", params.bridge_height, 0.0);
    let profile = ProfilePolyline::new(vec![
        [r, 0.0],
        [r * 0.92, h * 0.45],
        [r * 0.62, h * 0.85],
        [r * 0.25, h],
        [0.0, h],
    ]);

    let saucer_top = params.primary_thickness.max(0.0) * 0.5 + params.primary_dome_height.max(0.0);
    let base = finite_or("bridge", "primary_y", params.primary_y, 0.0) + saucer_top - h * 0.25;
    let z = finite_or("bridge", "primary_z", params.primary_z, 0.0)
        + finite_or("bridge", "bridge_z", params.bridge_z, 0.0);

    let mut dome = Lathe::full(segments("bridge", "bridge_segments", params.bridge_segments))
        .build(&profile)?;
    dome.apply(&bridge_deformations(params))
        .apply(Transform::translate(0.0, base, z))
        .apply(SmoothNormals::default());
    Ok(ShipPart::new(PartKind::Bridge, Section::Bridge, dome))
}
