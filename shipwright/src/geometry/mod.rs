//! Geometry generation and modification

// Local modules
pub mod buffer;
pub mod deform;
pub mod lathe;
pub mod modifiers;
pub mod neck;
pub mod subdivide;
pub mod truss;
pub mod uv;

// Convenience re-exports
pub use buffer::{combine, GeometryBuffer, Vertex};
pub use deform::{
    AxisScale, Deformation, DeformationChain, FarEnd, Pointiness, Shear, Side, Undercut,
};
pub use lathe::{Lathe, ProfilePolyline};
pub use modifiers::{Axis, MeshApply, MeshModifier, Reflect, SmoothNormals, Transform};
pub use neck::{Neck, NeckEnd, NeckUndercut};
pub use subdivide::FlatPreservingSubdivide;
pub use truss::{Elbow, Truss, TrussNode, TrussRoute};
pub use uv::PlanarProjection;
