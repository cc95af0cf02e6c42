//! Whole-crate behavior checks: determinism, UV ranges, mirroring, undercut
//! and pointiness behavior, degenerate trusses, JSON round trips and window
//! density bounds.

use std::f32::consts::TAU;

use glam::Vec3;
use shipwright::geometry::{
    Axis, FarEnd, GeometryBuffer, Lathe, MeshApply, Pointiness, ProfilePolyline, Side, Transform,
    Truss, TrussNode, Undercut,
};
use shipwright::params::{ShipDesign, ShipShapeParameters};
use shipwright::ship::saucer_sweeps;
use shipwright::texture::{build_section, build_section_with_report, Section};
use shipwright::{build_geometry, build_textures, PartKind};

fn assert_geometry_close(a: &GeometryBuffer, b: &GeometryBuffer) {
    assert_eq!(a.positions.len(), b.positions.len());
    assert_eq!(a.indices, b.indices);
    for (p, q) in a.positions.iter().zip(&b.positions) {
        for i in 0..3 {
            assert!((p[i] - q[i]).abs() <= 1e-5);
        }
    }
    for (p, q) in a.uvs.iter().zip(&b.uvs) {
        assert!((p[0] - q[0]).abs() <= 1e-5 && (p[1] - q[1]).abs() <= 1e-5);
    }
}

fn hull_body() -> GeometryBuffer {
    let profile = ProfilePolyline::new(vec![[0.0, -1.0], [0.8, -0.6], [1.0, 0.2], [0.5, 1.0]]);
    let mut body = Lathe::full(16).build(&profile).unwrap();
    body.apply(Transform::rotate_x(90.0));
    body
}

#[test]
fn geometry_is_deterministic() {
    let params = ShipShapeParameters::default();
    let a = build_geometry(&params).unwrap();
    let b = build_geometry(&params).unwrap();
    assert_eq!(a.parts.len(), b.parts.len());
    for (p, q) in a.parts.iter().zip(&b.parts) {
        assert_eq!(p.kind, q.kind);
        assert_geometry_close(&p.geometry, &q.geometry);
    }
}

#[test]
fn textures_are_byte_identical() {
    let params = ShipShapeParameters::default();
    for section in [Section::Saucer, Section::Engineering, Section::Neck] {
        let a = build_section(section, &params, "USS Determinism");
        let b = build_section(section, &params, "USS Determinism");
        assert_eq!(a.color.pixels, b.color.pixels, "{}", section.name());
        assert_eq!(a.normal.pixels, b.normal.pixels, "{}", section.name());
        assert_eq!(a.emissive.pixels, b.emissive.pixels, "{}", section.name());
    }
}

#[test]
fn texture_seed_changes_output() {
    let params = ShipShapeParameters::default();
    let reseeded = ShipShapeParameters {
        texture_seed: params.texture_seed + 1,
        ..params.clone()
    };
    let a = build_section(Section::Bridge, &params, "");
    let b = build_section(Section::Bridge, &reseeded, "");
    assert_ne!(a.color.pixels, b.color.pixels);
}

#[test]
fn every_uv_in_unit_square() {
    let ship = build_geometry(&ShipShapeParameters::default()).unwrap();
    for part in &ship.parts {
        assert_eq!(part.geometry.uvs.len(), part.geometry.positions.len());
        for uv in &part.geometry.uvs {
            assert!(
                (0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]),
                "{}: {:?}",
                part.kind.name(),
                uv
            );
        }
    }
}

#[test]
fn mirrored_sections_are_symmetric_with_red_inverted() {
    let params = ShipShapeParameters {
        show_name: false,
        registry: String::new(),
        show_insignia: false,
        ..Default::default()
    };
    for section in [Section::Saucer, Section::Bridge, Section::Nacelle, Section::Hull] {
        let set = build_section(section, &params, "");
        let w = set.color.width;
        for y in (0..set.color.height).step_by(7) {
            for x in (0..w / 2).step_by(3) {
                let mx = w - 1 - x;
                assert_eq!(set.color.get_pixel(x, y), set.color.get_pixel(mx, y));
                assert_eq!(set.emissive.get_pixel(x, y), set.emissive.get_pixel(mx, y));
                let (l, r) = (set.normal.get_pixel(x, y), set.normal.get_pixel(mx, y));
                assert_eq!(r[0], 255 - l[0], "{} at ({x}, {y})", section.name());
                assert_eq!(l[1..], r[1..]);
            }
        }
    }
}

#[test]
fn undercut_never_grows_and_zero_is_identity() {
    let base = hull_body();
    let cut = |amount: f32| {
        let mut mesh = base.clone();
        mesh.apply(Undercut {
            compress: Axis::Y,
            along: Axis::Z,
            side: Side::Negative,
            far_end: FarEnd::Min,
            start: 0.2,
            amount,
            curve: 1.5,
        });
        mesh
    };

    assert_eq!(cut(0.0).positions, base.positions);
    let mut previous = cut(0.0);
    for step in 1..=10 {
        let next = cut(step as f32 * 0.1);
        for (p, q) in previous.positions.iter().zip(&next.positions) {
            assert!(q[1].abs() <= p[1].abs() + 1e-6);
            assert_eq!((p[0], p[2]), (q[0], q[2]));
        }
        previous = next;
    }
}

#[test]
fn pointiness_zero_is_identity() {
    let base = hull_body();
    let mut mesh = base.clone();
    mesh.apply(Pointiness {
        axis: Axis::Z,
        amount: 0.0,
    });
    assert_eq!(mesh.positions, base.positions);

    mesh.apply(Pointiness {
        axis: Axis::Z,
        amount: 0.7,
    });
    assert!(mesh.is_finite());
    assert_ne!(mesh.positions, base.positions);
}

#[test]
fn coincident_truss_nodes_stay_finite() {
    let node = TrussNode::new(Vec3::new(1.0, 2.0, 3.0), 0.5, -0.5, 0.0);
    let nodes = [node, TrussNode { u: 1.0, ..node }];
    for subdivisions in [0, 2] {
        let truss = Truss {
            thickness: 0.1,
            subdivisions,
        };
        let mesh = truss.build(&nodes).unwrap();
        assert!(mesh.is_finite());
        assert!(mesh.is_well_formed());
    }
    assert!(Truss {
        thickness: 0.1,
        subdivisions: 0
    }
    .build(&nodes[..1])
    .is_err());
}

#[test]
fn json_round_trip_builds_identically() {
    let design = ShipDesign {
        name: "USS Round Trip".to_string(),
        ship: ShipShapeParameters {
            primary_skew: 0.15,
            engineering_undercut_bottom: 0.4,
            window_density: 0.8,
            ..Default::default()
        },
        ..Default::default()
    };
    let parsed = ShipDesign::from_json(&design.to_json_pretty().unwrap()).unwrap();
    assert_eq!(parsed, design);

    let a = build_geometry(&design.ship).unwrap();
    let b = build_geometry(&parsed.ship).unwrap();
    for (p, q) in a.parts.iter().zip(&b.parts) {
        assert_geometry_close(&p.geometry, &q.geometry);
    }
    let ta = build_section(Section::Saucer, &design.ship, &design.name);
    let tb = build_section(Section::Saucer, &parsed.ship, &parsed.name);
    assert_eq!(ta, tb);
}

#[test]
fn saucer_half_shells_cover_full_turn() {
    let params = ShipShapeParameters::default();
    let [(s0, e0), (s1, e1)] = saucer_sweeps(&params);
    assert!((e0 + e1 - TAU).abs() < 1e-5);
    assert!((s0 + e0 - s1).abs() < 1e-5);

    let ship = build_geometry(&params).unwrap();
    let starboard = &ship.part(PartKind::SaucerStarboard).unwrap().geometry;
    let port = &ship.part(PartKind::SaucerPort).unwrap().geometry;
    // Every vertex on one shell's seam has a partner on the other's
    let on_seam = |p: &[f32; 3]| p[0].abs() < 1e-4;
    for p in starboard.positions.iter().filter(|p| on_seam(p)) {
        let matched = port
            .positions
            .iter()
            .any(|q| (Vec3::from(*p) - Vec3::from(*q)).length() < 1e-4);
        assert!(matched, "{p:?}");
    }
}

#[test]
fn window_density_bounds() {
    let empty = ShipShapeParameters {
        window_density: 0.0,
        ..Default::default()
    };
    let full = ShipShapeParameters {
        window_density: 1.0,
        ..Default::default()
    };
    for section in [Section::Saucer, Section::Engineering, Section::Neck, Section::Bridge] {
        let (_, none) = build_section_with_report(section, &empty, "");
        assert!(none.windows.candidates > 0);
        assert_eq!(none.windows.drawn, 0, "{}", section.name());

        let (_, all) = build_section_with_report(section, &full, "");
        assert_eq!(all.windows.drawn, all.windows.candidates, "{}", section.name());
    }
}

#[test]
fn hostile_parameters_still_texture() {
    let params = ShipShapeParameters {
        window_density: f32::NAN,
        label_curve: f32::INFINITY,
        label_size: -2.0,
        panel_color_variation: 1e9,
        greeble_density: -1.0,
        ..Default::default()
    };
    let textures = build_textures(&params, "\u{1F680} ship");
    assert_eq!(textures.sections.len(), Section::ALL.len());
}
