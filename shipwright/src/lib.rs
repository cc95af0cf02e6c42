//! Parametric starship geometry and procedural texture synthesis
//!
//! This library turns a flat set of ship parameters into vertex/index buffers
//! and co-registered texture rasters. Every build is a pure function of its
//! inputs: the same parameters always produce the same buffers.
//!
//! # Geometry Example
//! ```no_run
//! use shipwright::geometry::*;
//!
//! // Revolve a cross-section into a surface
//! let profile = ProfilePolyline::new(vec![[0.0, -0.5], [1.0, 0.0], [0.0, 0.5]]);
//! let mut hull = Lathe::full(24).build(&profile)?;
//!
//! // Deform it in an explicit order
//! hull.apply(AxisScale::new(1.4, 1.0, 1.0))
//!     .apply(Shear { source: Axis::Z, target: Axis::Y, factor: 0.1 });
//! hull.compute_normals();
//! # Ok::<(), shipwright::GeometryError>(())
//! ```
//!
//! # Whole Ship Example
//! ```no_run
//! use shipwright::params::ShipShapeParameters;
//! use shipwright::{build_geometry, build_textures};
//!
//! let params = ShipShapeParameters::default();
//! let geometry = build_geometry(&params)?;
//! let textures = build_textures(&params, "USS Example");
//!
//! println!("{} parts, {} sections", geometry.parts.len(), textures.sections.len());
//! # Ok::<(), shipwright::ShipError>(())
//! ```

pub mod cache;
pub mod export;
pub mod geometry;
pub mod params;
pub mod rng;
pub mod ship;
pub mod texture;

mod error;

pub use cache::BuildCache;
pub use error::{GeometryError, ShipError};
pub use ship::{build_geometry, PartKind, ShipGeometry, ShipPart};
pub use texture::{build_textures, Section, ShipTextures};
