//! Engineering hull and deflector dish
//!
//! Both are lathed around Y and turned onto the ship's Z axis with a +90°
//! rotation about X, so profile "up" becomes fore and the lathe seam (φ = 0)
//! ends up along the keel.

use super::{at_least, finite_or, segments, PartKind, ShipPart};
use crate::geometry::{
    Axis, AxisScale, Deformation, DeformationChain, FarEnd, Lathe, MeshApply, Pointiness,
    ProfilePolyline, Shear, Side, SmoothNormals, Transform, Undercut,
};
use crate::params::ShipShapeParameters;
use crate::texture::Section;
use crate::ShipError;

pub(super) fn hull_length(params: &ShipShapeParameters) -> f32 {
    at_least("engineering", "engineering_length", params.engineering_length, 0.001)
}

pub(super) fn hull_radius(params: &ShipShapeParameters) -> f32 {
    at_least("engineering", "engineering_radius", params.engineering_radius, 0.001)
}

pub(super) fn hull_width(params: &ShipShapeParameters) -> f32 {
    at_least("engineering", "engineering_width_ratio", params.engineering_width_ratio, 0.01)
}

/// Aft-to-fore body section, open at the fore end for the deflector
fn hull_profile(params: &ShipShapeParameters) -> ProfilePolyline {
    let length = hull_length(params);
    let r = hull_radius(params);
    let fore = at_least("engineering", "engineering_fore_taper", params.engineering_fore_taper, 0.0);
    let aft = at_least("engineering", "engineering_aft_taper", params.engineering_aft_taper, 0.0);
    let h = length * 0.5;

    ProfilePolyline::new(vec![
        [0.0, -h],
        [r * aft, -h],
        [r * (aft + (1.0 - aft) * 0.6), -h + length * 0.2],
        [r, -h + length * 0.45],
        [r, -h + length * 0.7],
        [r * fore, h],
        [r * fore * 0.75, h],
    ])
}

/// Width, top and bottom undercuts toward the aft end, pointiness, skew
///
/// Runs on the rotated (Z-forward) but untranslated hull, so undercut sides
/// are measured from the hull's own axis.
pub fn engineering_deformations(params: &ShipShapeParameters) -> DeformationChain {
    let top = Undercut {
        compress: Axis::Y,
        along: Axis::Z,
        side: Side::Positive,
        far_end: FarEnd::Min,
        start: params.engineering_undercut_top_start,
        amount: params.engineering_undercut_top,
        curve: params.engineering_undercut_top_curve,
    };
    let bottom = Undercut {
        side: Side::Negative,
        start: params.engineering_undercut_bottom_start,
        amount: params.engineering_undercut_bottom,
        curve: params.engineering_undercut_bottom_curve,
        ..top
    };
    DeformationChain::new()
        .then(Deformation::Scale(AxisScale::width(hull_width(params))))
        .then(Deformation::Undercut(top))
        .then(Deformation::Undercut(bottom))
        .then(Deformation::Pointiness(Pointiness {
            axis: Axis::Z,
            amount: finite_or(
                "engineering",
                "engineering_pointiness",
                params.engineering_pointiness,
                0.0,
            ),
        }))
        .then(Deformation::Shear(Shear {
            source: Axis::Z,
            target: Axis::Y,
            factor: finite_or("engineering", "engineering_skew", params.engineering_skew, 0.0),
        }))
}

fn hull_offset(params: &ShipShapeParameters) -> Transform {
    Transform::translate(
        0.0,
        finite_or("engineering", "engineering_y", params.engineering_y, 0.0),
        finite_or("engineering", "engineering_z", params.engineering_z, 0.0),
    )
}

pub fn engineering_hull(params: &ShipShapeParameters) -> Result<ShipPart, ShipError> {
    let mut hull = Lathe::full(segments(
        "engineering",
        "engineering_segments",
        params.engineering_segments,
    ))
    .build(&hull_profile(params))?;
    hull.apply(Transform::rotate_x(90.0))
        .apply(&engineering_deformations(params))
        .apply(&hull_offset(params))
        .apply(SmoothNormals::default());
    Ok(ShipPart::new(
        PartKind::EngineeringHull,
        Section::Engineering,
        hull,
    ))
}

/// Concave dish at the hull's fore end, folding back into an antenna spike
pub fn deflector(params: &ShipShapeParameters) -> Result<ShipPart, ShipError> {
    let r = at_least("deflector", "deflector_radius", params.deflector_radius, 0.001);
    let depth = at_least("deflector", "deflector_depth", params.deflector_depth, 0.0);
    let antenna = at_least(
        "deflector",
        "deflector_antenna_length",
        params.deflector_antenna_length,
        0.0,
    );
    let profile = ProfilePolyline::new(vec![
        [r, 0.0],
        [r * 0.75, -depth * 0.5],
        [r * 0.35, -depth * 0.9],
        [r * 0.12, -depth],
        [r * 0.06, antenna * 0.4 - depth * 0.6],
        [r * 0.03, antenna],
        [0.0, antenna],
    ]);

    let z = hull_length(params) * 0.5 - depth * 0.5;
    let y = finite_or("deflector", "deflector_y", params.deflector_y, 0.0);
    let mut dish = Lathe::full(segments("deflector", "deflector_segments", params.deflector_segments))
        .build(&profile)?;
    dish.apply(Transform::rotate_x(90.0))
        .apply(AxisScale::width(hull_width(params)))
        .apply(Transform::translate(0.0, y, z))
        .apply(&hull_offset(params))
        .apply(SmoothNormals::default());
    Ok(ShipPart::new(PartKind::Deflector, Section::Hull, dish).with_glow(params.deflector_color))
}
