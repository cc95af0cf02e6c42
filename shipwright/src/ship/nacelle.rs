//! Warp nacelles and bussard collectors
//!
//! Only the starboard side is built; the port parts are reflections across
//! the YZ plane.

use tracing::warn;

use super::{at_least, finite_or, segments, PartKind, ShipPart};
use crate::geometry::{
    Axis, AxisScale, Deformation, DeformationChain, FarEnd, GeometryBuffer, Lathe, MeshApply,
    Pointiness, ProfilePolyline, Reflect, Shear, Side, SmoothNormals, Transform, Undercut,
};
use crate::params::ShipShapeParameters;
use crate::texture::Section;
use crate::ShipError;

pub(super) fn nacelle_length(params: &ShipShapeParameters) -> f32 {
    at_least("nacelle", "nacelle_length", params.nacelle_length, 0.001)
}

pub(super) fn nacelle_radius(params: &ShipShapeParameters) -> f32 {
    at_least("nacelle", "nacelle_radius", params.nacelle_radius, 0.001)
}

pub(super) fn nacelle_width(params: &ShipShapeParameters) -> f32 {
    at_least("nacelle", "nacelle_width_ratio", params.nacelle_width_ratio, 0.01)
}

/// Starboard nacelle center
pub(super) fn nacelle_center(params: &ShipShapeParameters) -> [f32; 3] {
    [
        finite_or("nacelle", "nacelle_x", params.nacelle_x, 0.0),
        finite_or("nacelle", "nacelle_y", params.nacelle_y, 0.0),
        finite_or("nacelle", "nacelle_z", params.nacelle_z, 0.0),
    ]
}

fn nacelle_profile(params: &ShipShapeParameters) -> ProfilePolyline {
    let length = nacelle_length(params);
    let r = nacelle_radius(params);
    let fore = at_least("nacelle", "nacelle_fore_taper", params.nacelle_fore_taper, 0.0);
    let aft = at_least("nacelle", "nacelle_aft_taper", params.nacelle_aft_taper, 0.0);
    let h = length * 0.5;

    ProfilePolyline::new(vec![
        [0.0, -h],
        [r * aft, -h],
        [r * (aft + (1.0 - aft) * 0.7), -h + length * 0.08],
        [r, -h + length * 0.2],
        [r, h - length * 0.12],
        [r * fore, h],
    ])
}

/// Width, undercuts toward the aft end, pointiness, skew (same order as the
/// engineering hull, with the nacelle's own parameters)
pub fn nacelle_deformations(params: &ShipShapeParameters) -> DeformationChain {
    let top = Undercut {
        compress: Axis::Y,
        along: Axis::Z,
        side: Side::Positive,
        far_end: FarEnd::Min,
        start: params.nacelle_undercut_top_start,
        amount: params.nacelle_undercut_top,
        curve: params.nacelle_undercut_top_curve,
    };
    let bottom = Undercut {
        side: Side::Negative,
        start: params.nacelle_undercut_bottom_start,
        amount: params.nacelle_undercut_bottom,
        curve: params.nacelle_undercut_bottom_curve,
        ..top
    };
    DeformationChain::new()
        .then(Deformation::Scale(AxisScale::width(nacelle_width(params))))
        .then(Deformation::Undercut(top))
        .then(Deformation::Undercut(bottom))
        .then(Deformation::Pointiness(Pointiness {
            axis: Axis::Z,
            amount: finite_or("nacelle", "nacelle_pointiness", params.nacelle_pointiness, 0.0),
        }))
        .then(Deformation::Shear(Shear {
            source: Axis::Z,
            target: Axis::Y,
            factor: finite_or("nacelle", "nacelle_skew", params.nacelle_skew, 0.0),
        }))
}

fn mirrored(starboard: &GeometryBuffer) -> GeometryBuffer {
    let mut port = starboard.clone();
    port.apply(Reflect { axis: Axis::X });
    port
}

/// Starboard and port nacelle bodies
pub fn nacelles(params: &ShipShapeParameters) -> Result<[ShipPart; 2], ShipError> {
    let [x, y, z] = nacelle_center(params);
    let mut body = Lathe::full(segments("nacelle", "nacelle_segments", params.nacelle_segments))
        .build(&nacelle_profile(params))?;
    body.apply(Transform::rotate_x(90.0))
        .apply(&nacelle_deformations(params))
        .apply(Transform::translate(x, y, z))
        .apply(SmoothNormals::default());

    let port = mirrored(&body);
    Ok([
        ShipPart::new(PartKind::NacelleStarboard, Section::Nacelle, body),
        ShipPart::new(PartKind::NacellePort, Section::Nacelle, port),
    ])
}

/// Nested bussard domes on each nacelle's fore end: a hull-colored outer
/// shell and a glowing inner core
pub fn bussards(params: &ShipShapeParameters) -> Result<[ShipPart; 4], ShipError> {
    let r = at_least("bussard", "bussard_radius", params.bussard_radius, 0.001);
    let length = at_least("bussard", "bussard_length", params.bussard_length, 0.0);
    let inner_scale = params.bussard_inner_scale;
    let inner_scale = if inner_scale.is_finite() {
        inner_scale.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if inner_scale != params.bussard_inner_scale {
        warn!(
            "bussards: bussard_inner_scale must be in [0.0, 1.0], clamping to {}",
            inner_scale
        );
    }
    let radial = segments("bussard", "bussard_segments", params.bussard_segments);

    let dome = |radius: f32, length: f32| {
        ProfilePolyline::new(vec![
            [radius, 0.0],
            [radius * 0.94, length * 0.35],
            [radius * 0.75, length * 0.7],
            [radius * 0.42, length * 0.93],
            [0.0, length],
        ])
    };

    let [x, y, z] = nacelle_center(params);
    let fore = z + nacelle_length(params) * 0.5;
    let place = |mut shell: GeometryBuffer| {
        shell
            .apply(Transform::rotate_x(90.0))
            .apply(AxisScale::width(nacelle_width(params)))
            .apply(Transform::translate(x, y, fore))
            .apply(SmoothNormals::default());
        shell
    };

    let outer = place(Lathe::full(radial).build(&dome(r, length))?);
    let inner = place(
        Lathe::full(radial).build(&dome(r * inner_scale, length * inner_scale))?,
    );
    let outer_port = mirrored(&outer);
    let inner_port = mirrored(&inner);

    Ok([
        ShipPart::new(PartKind::BussardOuterStarboard, Section::Nacelle, outer),
        ShipPart::new(PartKind::BussardInnerStarboard, Section::Nacelle, inner)
            .with_glow(params.bussard_color),
        ShipPart::new(PartKind::BussardOuterPort, Section::Nacelle, outer_port),
        ShipPart::new(PartKind::BussardInnerPort, Section::Nacelle, inner_port)
            .with_glow(params.bussard_color),
    ])
}
