//! Whole-ship assembly
//!
//! Turns `ShipShapeParameters` into positioned part buffers. Each part module
//! exposes its deformation chain as a separate `*_deformations` function so
//! the per-part step order is visible and testable on its own.

mod connectors;
mod engineering;
mod nacelle;
mod primary;

pub use connectors::{neck, neck_ends, pylon_nodes, pylons};
pub use engineering::{deflector, engineering_deformations, engineering_hull};
pub use nacelle::{bussards, nacelle_deformations, nacelles};
pub use primary::{
    bridge, bridge_deformations, saucer_deformations, saucer_shells, saucer_sweeps,
    saucer_underside,
};

use tracing::{debug, warn};

use crate::geometry::{combine, GeometryBuffer};
use crate::params::{Color, ShipShapeParameters};
use crate::texture::Section;
use crate::ShipError;

/// Minimum radial segment count for any lathed part
pub const MIN_SEGMENTS: u32 = 3;

/// Identifies one generated part
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    SaucerStarboard,
    SaucerPort,
    Bridge,
    EngineeringHull,
    Deflector,
    Neck,
    NacelleStarboard,
    NacellePort,
    BussardOuterStarboard,
    BussardInnerStarboard,
    BussardOuterPort,
    BussardInnerPort,
    PylonStarboard,
    PylonPort,
}

impl PartKind {
    /// Lower-case name used for exported files
    pub fn name(self) -> &'static str {
        match self {
            PartKind::SaucerStarboard => "saucer_starboard",
            PartKind::SaucerPort => "saucer_port",
            PartKind::Bridge => "bridge",
            PartKind::EngineeringHull => "engineering_hull",
            PartKind::Deflector => "deflector",
            PartKind::Neck => "neck",
            PartKind::NacelleStarboard => "nacelle_starboard",
            PartKind::NacellePort => "nacelle_port",
            PartKind::BussardOuterStarboard => "bussard_outer_starboard",
            PartKind::BussardInnerStarboard => "bussard_inner_starboard",
            PartKind::BussardOuterPort => "bussard_outer_port",
            PartKind::BussardInnerPort => "bussard_inner_port",
            PartKind::PylonStarboard => "pylon_starboard",
            PartKind::PylonPort => "pylon_port",
        }
    }
}

/// One positioned part and the texture section it samples
#[derive(Clone, Debug, PartialEq)]
pub struct ShipPart {
    pub kind: PartKind,
    pub section: Section,
    pub geometry: GeometryBuffer,
    /// Self-lit tint for parts whose glow is not painted into a texture
    /// (deflector dish, bussard cores)
    pub glow: Option<Color>,
}

impl ShipPart {
    pub fn new(kind: PartKind, section: Section, mut geometry: GeometryBuffer) -> Self {
        if geometry.normals.len() != geometry.positions.len() {
            geometry.compute_normals();
        }
        debug!(
            "built {}: {} vertices, {} triangles",
            kind.name(),
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        Self {
            kind,
            section,
            geometry,
            glow: None,
        }
    }

    pub fn with_glow(mut self, color: Color) -> Self {
        self.glow = Some(color);
        self
    }
}

/// All parts of one ship, in build order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipGeometry {
    pub parts: Vec<ShipPart>,
}

impl ShipGeometry {
    pub fn part(&self, kind: PartKind) -> Option<&ShipPart> {
        self.parts.iter().find(|p| p.kind == kind)
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.geometry.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.geometry.triangle_count()).sum()
    }

    /// Every part merged into one buffer
    pub fn combined(&self) -> GeometryBuffer {
        let buffers: Vec<&GeometryBuffer> = self.parts.iter().map(|p| &p.geometry).collect();
        combine(&buffers)
    }
}

/// Build every part of the ship
pub fn build_geometry(params: &ShipShapeParameters) -> Result<ShipGeometry, ShipError> {
    let mut parts = Vec::with_capacity(14);
    parts.extend(saucer_shells(params)?);
    parts.push(bridge(params)?);
    parts.push(engineering_hull(params)?);
    parts.push(deflector(params)?);
    parts.push(neck(params));
    parts.extend(nacelles(params)?);
    parts.extend(bussards(params)?);
    parts.extend(pylons(params)?);

    let geometry = ShipGeometry { parts };
    debug!(
        "build_geometry: {} parts, {} triangles",
        geometry.parts.len(),
        geometry.triangle_count()
    );
    Ok(geometry)
}

/// Saturate a parameter from below, logging when it had to
pub(crate) fn at_least(context: &str, name: &str, value: f32, min: f32) -> f32 {
    if value.is_finite() && value >= min {
        value
    } else {
        warn!("{context}: {name} must be >= {min}, clamping to {min}");
        min
    }
}

/// Finite value or a fallback, logging when it had to
pub(crate) fn finite_or(context: &str, name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        warn!("{context}: {name} is not finite, using {fallback}");
        fallback
    }
}

/// Radial segment count saturated to `MIN_SEGMENTS`
pub(crate) fn segments(context: &str, name: &str, value: u32) -> u32 {
    if value >= MIN_SEGMENTS {
        value
    } else {
        warn!("{context}: {name} must be >= {MIN_SEGMENTS}, clamping to {MIN_SEGMENTS}");
        MIN_SEGMENTS
    }
}
