//! Ship and light parameters
//!
//! `ShipShapeParameters` is deliberately flat: one field per slider, grouped
//! only by comments, serialized as a flat JSON object keyed by field name.
//! Every field has a default, so documents written by older or newer editors
//! still load. Nothing here is range-checked; builders saturate or skip
//! degenerate values themselves.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ShipError;

/// Failure to parse a `#rrggbb` color string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(pub String);

/// 8-bit sRGB color, serialized as `"#rrggbb"`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA
    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Scale brightness, saturating at white
    pub fn scaled(self, factor: f32) -> Self {
        let f = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::rgb(f(self.r), f(self.g), f(self.b))
    }

    /// Shift every channel by `delta`, clamped to the channel range
    pub fn offset(self, delta: i32) -> Self {
        let f = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
        Self::rgb(f(self.r), f(self.g), f(self.b))
    }

    pub fn parse(text: &str) -> Result<Self, ParseColorError> {
        let hex = text
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| ParseColorError(text.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(text.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// How the pylons travel from the engineering hull to the nacelles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PylonRoute {
    #[default]
    Direct,
    SingleElbow,
    DoubleElbow,
}

/// Glyph rotation for curved registry labels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrientation {
    /// Every glyph stays level
    Upright,
    /// Glyph tops point toward the arc center
    Inward,
    /// Glyph tops point away from the arc center
    #[default]
    Outward,
}

/// Every shape and livery parameter of a ship
///
/// Lengths are scene units, sweep and twist angles radians, label angles
/// degrees. +Y is dorsal, +Z is fore, +X is starboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipShapeParameters {
    // Primary hull (saucer)
    pub primary_radius: f32,
    pub primary_thickness: f32,
    pub primary_dome_height: f32,
    pub primary_bottom_height: f32,
    pub primary_width_ratio: f32,
    pub primary_skew: f32,
    /// Angular width of the notch cut into the saucer's fore edge (radians)
    pub primary_notch_fore: f32,
    /// Angular width of the notch cut into the saucer's aft edge (radians)
    pub primary_notch_aft: f32,
    pub primary_segments: u32,
    pub primary_y: f32,
    pub primary_z: f32,

    // Bridge
    pub bridge_radius: f32,
    pub bridge_height: f32,
    pub bridge_width_ratio: f32,
    /// Z offset from the saucer center
    pub bridge_z: f32,
    pub bridge_segments: u32,

    // Engineering hull
    pub engineering_length: f32,
    pub engineering_radius: f32,
    pub engineering_width_ratio: f32,
    pub engineering_skew: f32,
    pub engineering_fore_taper: f32,
    pub engineering_aft_taper: f32,
    pub engineering_undercut_top: f32,
    pub engineering_undercut_top_start: f32,
    pub engineering_undercut_top_curve: f32,
    pub engineering_undercut_bottom: f32,
    pub engineering_undercut_bottom_start: f32,
    pub engineering_undercut_bottom_curve: f32,
    pub engineering_pointiness: f32,
    pub engineering_segments: u32,
    pub engineering_y: f32,
    pub engineering_z: f32,

    // Deflector dish
    pub deflector_radius: f32,
    pub deflector_depth: f32,
    pub deflector_antenna_length: f32,
    /// Y offset from the engineering hull's axis
    pub deflector_y: f32,
    pub deflector_segments: u32,
    pub deflector_color: Color,

    // Neck
    /// Fractions along the saucer (0 = aft edge, 1 = fore edge)
    pub neck_primary_fore: f32,
    pub neck_primary_aft: f32,
    /// Fractions along the engineering hull
    pub neck_engineering_fore: f32,
    pub neck_engineering_aft: f32,
    pub neck_primary_width: f32,
    pub neck_engineering_width: f32,
    pub neck_taper_fore_starboard: f32,
    pub neck_taper_fore_port: f32,
    pub neck_taper_aft_port: f32,
    pub neck_taper_aft_starboard: f32,
    pub neck_twist: f32,
    pub neck_undercut_location: f32,
    pub neck_undercut_width: f32,
    pub neck_undercut_amount: f32,
    pub neck_undercut_curve: f32,
    pub neck_slices: u32,

    // Nacelles
    pub nacelle_length: f32,
    pub nacelle_radius: f32,
    pub nacelle_width_ratio: f32,
    pub nacelle_skew: f32,
    pub nacelle_fore_taper: f32,
    pub nacelle_aft_taper: f32,
    pub nacelle_undercut_top: f32,
    pub nacelle_undercut_top_start: f32,
    pub nacelle_undercut_top_curve: f32,
    pub nacelle_undercut_bottom: f32,
    pub nacelle_undercut_bottom_start: f32,
    pub nacelle_undercut_bottom_curve: f32,
    pub nacelle_pointiness: f32,
    pub nacelle_segments: u32,
    /// Starboard nacelle center; the port one mirrors it
    pub nacelle_x: f32,
    pub nacelle_y: f32,
    pub nacelle_z: f32,
    pub nacelle_grille_color: Color,

    // Bussard collectors
    pub bussard_radius: f32,
    pub bussard_length: f32,
    /// Inner shell size relative to the outer one
    pub bussard_inner_scale: f32,
    pub bussard_segments: u32,
    pub bussard_color: Color,

    // Pylons
    pub pylon_thickness: f32,
    pub pylon_engineering_fore: f32,
    pub pylon_engineering_aft: f32,
    pub pylon_nacelle_fore: f32,
    pub pylon_nacelle_aft: f32,
    pub pylon_route: PylonRoute,
    pub pylon_elbow_fraction: f32,
    pub pylon_elbow_length: f32,
    pub pylon_elbow_lateral: f32,
    pub pylon_elbow_vertical: f32,
    pub pylon_elbow_longitudinal: f32,
    pub pylon_subdivisions: u32,

    // Texture / livery
    pub registry: String,
    pub texture_seed: u32,
    pub hull_color: Color,
    pub panel_line_color: Color,
    /// Maximum per-plate gray offset, in channel steps
    pub panel_color_variation: f32,
    pub greeble_density: f32,
    pub window_density: f32,
    pub window_lit_fraction: f32,
    pub window_color_a: Color,
    pub window_color_b: Color,
    pub window_glass_color: Color,
    pub label_color: Color,
    /// 0 gives straight text; larger values bend it more
    pub label_curve: f32,
    pub label_orientation: LabelOrientation,
    /// Label distance from the saucer center, as a fraction of the texture radius
    pub label_radius: f32,
    /// Label anchor angle on the saucer texture (degrees)
    pub label_angle: f32,
    pub label_size: f32,
    pub show_name: bool,
    pub show_pennant: bool,
    pub pennant_color: Color,
    pub show_insignia: bool,
    pub insignia_color: Color,
}

impl Default for ShipShapeParameters {
    fn default() -> Self {
        Self {
            primary_radius: 6.0,
            primary_thickness: 0.5,
            primary_dome_height: 0.6,
            primary_bottom_height: 0.8,
            primary_width_ratio: 1.0,
            primary_skew: 0.0,
            primary_notch_fore: 0.0,
            primary_notch_aft: 0.0,
            primary_segments: 64,
            primary_y: 3.0,
            primary_z: 4.0,

            bridge_radius: 1.2,
            bridge_height: 0.45,
            bridge_width_ratio: 1.0,
            bridge_z: -0.4,
            bridge_segments: 24,

            engineering_length: 9.0,
            engineering_radius: 1.3,
            engineering_width_ratio: 1.0,
            engineering_skew: 0.0,
            engineering_fore_taper: 0.85,
            engineering_aft_taper: 0.45,
            engineering_undercut_top: 0.0,
            engineering_undercut_top_start: 0.5,
            engineering_undercut_top_curve: 1.5,
            engineering_undercut_bottom: 0.3,
            engineering_undercut_bottom_start: 0.4,
            engineering_undercut_bottom_curve: 1.5,
            engineering_pointiness: 0.0,
            engineering_segments: 32,
            engineering_y: 0.0,
            engineering_z: -2.5,

            deflector_radius: 0.9,
            deflector_depth: 0.3,
            deflector_antenna_length: 0.5,
            deflector_y: -0.1,
            deflector_segments: 24,
            deflector_color: Color::rgb(0xff, 0x9d, 0x2e),

            neck_primary_fore: 0.45,
            neck_primary_aft: 0.2,
            neck_engineering_fore: 0.85,
            neck_engineering_aft: 0.55,
            neck_primary_width: 0.7,
            neck_engineering_width: 0.55,
            neck_taper_fore_starboard: 1.0,
            neck_taper_fore_port: 1.0,
            neck_taper_aft_port: 1.0,
            neck_taper_aft_starboard: 1.0,
            neck_twist: 0.0,
            neck_undercut_location: 0.5,
            neck_undercut_width: 0.3,
            neck_undercut_amount: 0.2,
            neck_undercut_curve: 2.0,
            neck_slices: 8,

            nacelle_length: 10.0,
            nacelle_radius: 0.7,
            nacelle_width_ratio: 1.0,
            nacelle_skew: 0.0,
            nacelle_fore_taper: 0.9,
            nacelle_aft_taper: 0.5,
            nacelle_undercut_top: 0.0,
            nacelle_undercut_top_start: 0.5,
            nacelle_undercut_top_curve: 1.5,
            nacelle_undercut_bottom: 0.0,
            nacelle_undercut_bottom_start: 0.5,
            nacelle_undercut_bottom_curve: 1.5,
            nacelle_pointiness: 0.0,
            nacelle_segments: 24,
            nacelle_x: 4.0,
            nacelle_y: 3.2,
            nacelle_z: -6.0,
            nacelle_grille_color: Color::rgb(0x3f, 0xa9, 0xff),

            bussard_radius: 0.62,
            bussard_length: 0.9,
            bussard_inner_scale: 0.85,
            bussard_segments: 24,
            bussard_color: Color::rgb(0xff, 0x3b, 0x1f),

            pylon_thickness: 0.18,
            pylon_engineering_fore: 0.35,
            pylon_engineering_aft: 0.1,
            pylon_nacelle_fore: 0.55,
            pylon_nacelle_aft: 0.3,
            pylon_route: PylonRoute::Direct,
            pylon_elbow_fraction: 0.5,
            pylon_elbow_length: 1.0,
            pylon_elbow_lateral: 0.0,
            pylon_elbow_vertical: 0.0,
            pylon_elbow_longitudinal: 0.0,
            pylon_subdivisions: 0,

            registry: "NCC-1701".to_string(),
            texture_seed: 1701,
            hull_color: Color::rgb(0xc8, 0xcc, 0xd2),
            panel_line_color: Color::rgb(0x8a, 0x90, 0x98),
            panel_color_variation: 10.0,
            greeble_density: 0.3,
            window_density: 0.6,
            window_lit_fraction: 0.7,
            window_color_a: Color::rgb(0xff, 0xe9, 0xb0),
            window_color_b: Color::rgb(0xbf, 0xe4, 0xff),
            window_glass_color: Color::rgb(0x1a, 0x1f, 0x26),
            label_color: Color::rgb(0x2b, 0x2f, 0x36),
            label_curve: 0.6,
            label_orientation: LabelOrientation::Outward,
            label_radius: 0.78,
            label_angle: 90.0,
            label_size: 1.0,
            show_name: true,
            show_pennant: true,
            pennant_color: Color::rgb(0xb3, 0x20, 0x2a),
            show_insignia: true,
            insignia_color: Color::rgb(0xd9, 0xb4, 0x4a),
        }
    }
}

/// Light and environment settings for the presentation layer
///
/// The core never reads these; they travel with the design so the renderer
/// can light the exported assets the way the user saw them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParameters {
    pub key_direction: [f32; 3],
    pub key_color: Color,
    pub key_intensity: f32,
    pub fill_intensity: f32,
    pub rim_intensity: f32,
    pub ambient_intensity: f32,
    pub exposure: f32,
    pub bloom_strength: f32,
    /// Emissive pulse frequency in Hz (0 = steady)
    pub pulse_rate: f32,
}

impl Default for LightParameters {
    fn default() -> Self {
        Self {
            key_direction: [-0.4, -0.7, -0.6],
            key_color: Color::rgb(0xff, 0xf4, 0xe6),
            key_intensity: 2.5,
            fill_intensity: 0.6,
            rim_intensity: 1.2,
            ambient_intensity: 0.15,
            exposure: 1.0,
            bloom_strength: 0.4,
            pulse_rate: 0.5,
        }
    }
}

/// A saved design: ship name plus shape and light parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipDesign {
    pub name: String,
    pub ship: ShipShapeParameters,
    pub lights: LightParameters,
}

impl Default for ShipDesign {
    fn default() -> Self {
        Self {
            name: "USS Enterprise".to_string(),
            ship: ShipShapeParameters::default(),
            lights: LightParameters::default(),
        }
    }
}

impl ShipDesign {
    pub fn from_json(text: &str) -> Result<Self, ShipError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ShipError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Minimal shape check for an imported ship parameter object
///
/// True when the object has at least one saucer key (`primary_*`) and one
/// registry key (`registry*`). A full `ShipDesign` is accepted by looking
/// inside its `ship` member.
pub fn looks_like_ship_design(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    if let Some(ship) = object.get("ship").filter(|s| s.is_object()) {
        return looks_like_ship_design(ship);
    }
    let saucer = object.keys().any(|k| k.starts_with("primary_"));
    let registry = object.keys().any(|k| k.starts_with("registry"));
    saucer && registry
}
