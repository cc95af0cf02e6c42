//! Hand-built connectors: the neck and the nacelle pylons

use glam::Vec3;

use super::engineering::{hull_length, hull_radius, hull_width};
use super::nacelle::{nacelle_center, nacelle_length, nacelle_radius, nacelle_width};
use super::primary::saucer_underside;
use super::{at_least, finite_or, PartKind, ShipPart};
use crate::geometry::{
    Axis, Elbow, MeshApply, Neck, NeckEnd, NeckUndercut, Reflect, Truss, TrussNode, TrussRoute,
};
use crate::params::{PylonRoute, ShipShapeParameters};
use crate::texture::Section;
use crate::ShipError;

/// Hull-side (bottom) and saucer-side (top) neck rectangles
///
/// The top frame is level at the saucer's center underside; `neck` reseats
/// its corners on the underside once taper and twist have placed them.
pub fn neck_ends(params: &ShipShapeParameters) -> (NeckEnd, NeckEnd) {
    let hull_z = finite_or("neck", "engineering_z", params.engineering_z, 0.0);
    let hull_y = finite_or("neck", "engineering_y", params.engineering_y, 0.0);
    let length = hull_length(params);
    let bottom = NeckEnd {
        fore: hull_z + (params.neck_engineering_fore - 0.5) * length,
        aft: hull_z + (params.neck_engineering_aft - 0.5) * length,
        half_width: at_least("neck", "neck_engineering_width", params.neck_engineering_width, 0.0),
        heights: [hull_y + hull_radius(params) * 0.55; 4],
        lateral: 0.0,
    };

    let saucer_z = finite_or("neck", "primary_z", params.primary_z, 0.0);
    let diameter = at_least("neck", "primary_radius", params.primary_radius, 0.001) * 2.0;
    let top = NeckEnd {
        fore: saucer_z + (params.neck_primary_fore - 0.5) * diameter,
        aft: saucer_z + (params.neck_primary_aft - 0.5) * diameter,
        half_width: at_least("neck", "neck_primary_width", params.neck_primary_width, 0.0),
        heights: [saucer_underside(params, 0.0, saucer_z); 4],
        lateral: 0.0,
    };
    (sanitize(bottom), sanitize(top))
}

fn sanitize(end: NeckEnd) -> NeckEnd {
    NeckEnd {
        fore: finite_or("neck", "fore", end.fore, 0.0),
        aft: finite_or("neck", "aft", end.aft, 0.0),
        ..end
    }
}

pub fn neck(params: &ShipShapeParameters) -> ShipPart {
    let (bottom, top) = neck_ends(params);
    let mut neck = Neck {
        bottom,
        top,
        taper: [
            params.neck_taper_fore_starboard,
            params.neck_taper_fore_port,
            params.neck_taper_aft_port,
            params.neck_taper_aft_starboard,
        ],
        twist: finite_or("neck", "neck_twist", params.neck_twist, 0.0),
        undercut: NeckUndercut {
            location: params.neck_undercut_location,
            half_width: params.neck_undercut_width,
            amount: params.neck_undercut_amount,
            curve: params.neck_undercut_curve,
        },
        slices: params.neck_slices,
    };
    neck.top.heights = neck
        .top_footprint()
        .map(|p| saucer_underside(params, p.x, p.y));
    ShipPart::new(PartKind::Neck, Section::Neck, neck.build())
}

/// Starboard pylon node chain, hull end first
pub fn pylon_nodes(params: &ShipShapeParameters) -> Vec<TrussNode> {
    let hull = Vec3::new(
        hull_radius(params) * hull_width(params) * 0.7,
        finite_or("pylon", "engineering_y", params.engineering_y, 0.0),
        finite_or("pylon", "engineering_z", params.engineering_z, 0.0),
    );
    let [x, y, z] = nacelle_center(params);
    let nacelle = Vec3::new(x - nacelle_radius(params) * nacelle_width(params) * 0.6, y, z);

    let start = TrussNode::from_part(
        hull,
        hull_length(params),
        params.pylon_engineering_fore,
        params.pylon_engineering_aft,
        0.0,
    );
    let end = TrussNode::from_part(
        nacelle,
        nacelle_length(params),
        params.pylon_nacelle_fore,
        params.pylon_nacelle_aft,
        1.0,
    );

    let elbow = Elbow {
        fraction: finite_or("pylon", "pylon_elbow_fraction", params.pylon_elbow_fraction, 0.5),
        length: finite_or("pylon", "pylon_elbow_length", params.pylon_elbow_length, 0.0),
        lateral: finite_or("pylon", "pylon_elbow_lateral", params.pylon_elbow_lateral, 0.0),
        vertical: finite_or("pylon", "pylon_elbow_vertical", params.pylon_elbow_vertical, 0.0),
        longitudinal: finite_or(
            "pylon",
            "pylon_elbow_longitudinal",
            params.pylon_elbow_longitudinal,
            0.0,
        ),
    };
    let route = match params.pylon_route {
        PylonRoute::Direct => TrussRoute::Direct,
        PylonRoute::SingleElbow => TrussRoute::SingleElbow(elbow),
        PylonRoute::DoubleElbow => TrussRoute::DoubleElbow(elbow),
    };
    route.nodes(start, end)
}

/// Starboard and port pylons between the engineering hull and the nacelles
pub fn pylons(params: &ShipShapeParameters) -> Result<[ShipPart; 2], ShipError> {
    let truss = Truss {
        thickness: params.pylon_thickness,
        subdivisions: params.pylon_subdivisions,
    };
    let starboard = truss.build(&pylon_nodes(params))?;
    let mut port = starboard.clone();
    port.apply(Reflect { axis: Axis::X });
    Ok([
        ShipPart::new(PartKind::PylonStarboard, Section::Hull, starboard),
        ShipPart::new(PartKind::PylonPort, Section::Hull, port),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neck_spans_hull_to_saucer() {
        let params = ShipShapeParameters::default();
        let (bottom, top) = neck_ends(&params);
        let part = neck(&params);
        let (min, _) = part.geometry.bounds();
        assert!((min.y - bottom.heights[0]).abs() < 1e-4);
        assert!(bottom.heights[0] < top.heights[0]);
    }

    #[test]
    fn test_neck_top_follows_saucer_shape() {
        let params = ShipShapeParameters {
            primary_width_ratio: 0.6,
            primary_skew: 0.3,
            neck_twist: 0.4,
            ..Default::default()
        };
        let part = neck(&params);
        let slices = params.neck_slices.max(1) as usize;
        let top = slices * 5;
        let corners: Vec<[f32; 3]> = (0..4).map(|k| part.geometry.positions[top + k]).collect();
        for p in &corners {
            let y = saucer_underside(&params, p[0], p[2]);
            assert!((p[1] - y).abs() < 1e-4, "{p:?} vs {y}");
        }
        // the skew lifts the fore corners above the aft ones
        assert!(corners[0][1] > corners[3][1]);

        let level = neck(&ShipShapeParameters {
            neck_twist: 0.4,
            ..Default::default()
        });
        let level_top = level.geometry.positions[top][1];
        assert!((corners[0][1] - level_top).abs() > 1e-3);
    }

    #[test]
    fn test_inverted_neck_fractions_still_build() {
        let params = ShipShapeParameters {
            neck_primary_fore: 0.1,
            neck_primary_aft: 0.6,
            ..Default::default()
        };
        let part = neck(&params);
        assert!(part.geometry.is_finite());
        let straight = neck(&ShipShapeParameters {
            neck_primary_fore: 0.6,
            neck_primary_aft: 0.1,
            ..Default::default()
        });
        assert_eq!(part.geometry.positions, straight.geometry.positions);
    }

    #[test]
    fn test_pylon_routes() {
        for (route, count) in [
            (PylonRoute::Direct, 2),
            (PylonRoute::SingleElbow, 3),
            (PylonRoute::DoubleElbow, 4),
        ] {
            let params = ShipShapeParameters {
                pylon_route: route,
                pylon_elbow_vertical: 0.5,
                ..Default::default()
            };
            let nodes = pylon_nodes(&params);
            assert_eq!(nodes.len(), count);
            let [a, b] = pylons(&params).unwrap();
            assert!(a.geometry.is_finite() && b.geometry.is_finite());
        }
    }

    #[test]
    fn test_pylon_joins_hull_and_nacelle() {
        let params = ShipShapeParameters::default();
        let nodes = pylon_nodes(&params);
        let first = nodes[0].center;
        let last = nodes[nodes.len() - 1].center;
        assert!(first.x < params.engineering_radius);
        assert!(last.x > params.nacelle_x - params.nacelle_radius);
        assert!((last.y - params.nacelle_y).abs() < 1e-6);
    }
}
