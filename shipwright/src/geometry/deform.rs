//! Deformation steps applied after lathing
//!
//! Each step is a pure position transform; UVs are left alone (except by the
//! planar projection step, which recomputes them) and normals must be
//! re-derived once the chain has run. Steps are order-sensitive (undercut
//! and pointiness measure extents from whatever earlier steps produced), so
//! parts list them explicitly in a `DeformationChain` instead of applying a
//! fixed set.

use tracing::warn;

use super::buffer::GeometryBuffer;
use super::modifiers::{Axis, MeshModifier};
use super::uv::PlanarProjection;

/// Below this, an extent is treated as degenerate
const EPSILON: f32 = 1e-6;

/// Per-axis extent of a buffer as (min, max)
fn extent(mesh: &GeometryBuffer, axis: Axis) -> Option<(f32, f32)> {
    let a = axis.index();
    let mut iter = mesh.positions.iter().map(|p| p[a]);
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Multiply coordinate axes by ratios (width / aspect adjustments)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisScale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisScale {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Scale only the lateral (X) axis
    pub fn width(ratio: f32) -> Self {
        Self::new(ratio, 1.0, 1.0)
    }
}

impl MeshModifier for AxisScale {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        let factors = [self.x, self.y, self.z].map(|f| if f.is_finite() { f } else { 1.0 });
        for p in &mut mesh.positions {
            for (c, f) in p.iter_mut().zip(factors) {
                *c *= f;
            }
        }
    }
}

/// Linear shear: `target += factor · source`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shear {
    pub source: Axis,
    pub target: Axis,
    pub factor: f32,
}

impl Shear {
    /// The shear that undoes this one exactly
    pub fn inverse(&self) -> Self {
        Self {
            factor: -self.factor,
            ..*self
        }
    }
}

impl MeshModifier for Shear {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        if self.source == self.target {
            warn!("Shear: source and target axis are both {:?}, skipping", self.source);
            return;
        }
        if self.factor == 0.0 || !self.factor.is_finite() {
            return;
        }
        let (s, t) = (self.source.index(), self.target.index());
        for p in &mut mesh.positions {
            p[t] += self.factor * p[s];
        }
    }
}

/// Which sign of the compressed axis an undercut affects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Positive,
    Negative,
}

impl Side {
    #[inline]
    fn contains(self, value: f32) -> bool {
        match self {
            Side::Positive => value > 0.0,
            Side::Negative => value < 0.0,
        }
    }
}

/// Which end of the longitudinal extent the undercut ramps toward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FarEnd {
    Max,
    Min,
}

/// Smooth partial flattening of one side toward one end of a part
///
/// Vertices beyond the normalized threshold `start` (measured along `along`
/// toward `far_end`) and on `side` of the `compress` axis have that axis scaled
/// by `1 − amount · progress^curve`, where progress ramps 0→1 from the
/// threshold to the far end. The scale is clamped to `[1 − amount, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Undercut {
    pub compress: Axis,
    pub along: Axis,
    pub side: Side,
    pub far_end: FarEnd,
    /// Threshold fraction along the part where compression begins
    pub start: f32,
    /// Maximum compression (0 = identity, 1 = flat at the far end)
    pub amount: f32,
    /// Ease-in exponent (1 = linear, >1 concentrates near the far end)
    pub curve: f32,
}

impl Undercut {
    /// Scale factor for a vertex at normalized position `t` (0 at the near
    /// end, 1 at the far end)
    pub fn scale_at(&self, t: f32) -> f32 {
        let amount = if self.amount.is_finite() {
            self.amount.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let start = self.start.clamp(0.0, 1.0);
        if amount == 0.0 || t <= start || start >= 1.0 {
            return 1.0;
        }
        let curve = if self.curve.is_finite() {
            self.curve.max(0.01)
        } else {
            1.0
        };
        let progress = ((t - start) / (1.0 - start)).clamp(0.0, 1.0);
        (1.0 - amount * progress.powf(curve)).clamp(1.0 - amount, 1.0)
    }
}

impl MeshModifier for Undercut {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        if self.compress == self.along {
            warn!("Undercut: compress and along axis are both {:?}, skipping", self.along);
            return;
        }
        let Some((lo, hi)) = extent(mesh, self.along) else {
            return;
        };
        let length = hi - lo;
        if length < EPSILON {
            return;
        }

        let (c, l) = (self.compress.index(), self.along.index());
        for p in &mut mesh.positions {
            if !self.side.contains(p[c]) {
                continue;
            }
            let mut t = (p[l] - lo) / length;
            if self.far_end == FarEnd::Min {
                t = 1.0 - t;
            }
            p[c] *= self.scale_at(t);
        }
    }
}

/// Pointiness beyond this range folds or collapses the part
const POINTINESS_RANGE: (f32, f32) = (-1.0, 0.9);

/// Asymmetric longitudinal stretch
///
/// With `z_n ∈ [-1, 1]` the normalized position about the part's center,
/// each vertex's distance from the aft end is divided by
/// `stretch = (1 + z_n)^amount`, taken relative to the stretch at the fore
/// end so both ends stay put. That reduces to `s' = s^(1 − amount)` for the
/// aft-to-fore fraction `s`: positive amounts push rings toward the fore end
/// (a long, pointed tail) and negative amounts pull them aft. `amount = 0` is
/// the identity, and ring order along the axis never changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointiness {
    pub axis: Axis,
    pub amount: f32,
}

impl Pointiness {
    fn clamped_amount(&self) -> f32 {
        let (lo, hi) = POINTINESS_RANGE;
        let clamped = self.amount.clamp(lo, hi);
        if clamped != self.amount {
            warn!("Pointiness: amount must be in [{lo}, {hi}], clamping to {clamped}");
        }
        clamped
    }
}

impl MeshModifier for Pointiness {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        if self.amount == 0.0 || !self.amount.is_finite() {
            return;
        }
        let Some((lo, hi)) = extent(mesh, self.axis) else {
            return;
        };
        let length = hi - lo;
        if length < EPSILON {
            return;
        }

        let exponent = 1.0 - self.clamped_amount();
        let a = self.axis.index();
        for p in &mut mesh.positions {
            let s = ((p[a] - lo) / length).clamp(0.0, 1.0);
            p[a] = lo + length * s.powf(exponent);
        }
    }
}

/// One named step in a part's deformation chain
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Deformation {
    Scale(AxisScale),
    Shear(Shear),
    Undercut(Undercut),
    Pointiness(Pointiness),
    /// Recompute UVs from the positions as they stand at this point
    PlanarUv(PlanarProjection),
}

impl Deformation {
    /// Short step name for logs and tests
    pub fn name(&self) -> &'static str {
        match self {
            Deformation::Scale(_) => "scale",
            Deformation::Shear(_) => "shear",
            Deformation::Undercut(_) => "undercut",
            Deformation::Pointiness(_) => "pointiness",
            Deformation::PlanarUv(_) => "planar_uv",
        }
    }
}

impl MeshModifier for Deformation {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        match self {
            Deformation::Scale(step) => step.apply(mesh),
            Deformation::Shear(step) => step.apply(mesh),
            Deformation::Undercut(step) => step.apply(mesh),
            Deformation::Pointiness(step) => step.apply(mesh),
            Deformation::PlanarUv(step) => step.apply(mesh),
        }
    }
}

/// Ordered list of deformation steps for one part
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeformationChain {
    steps: Vec<Deformation>,
}

impl DeformationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn then(mut self, step: Deformation) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Deformation] {
        &self.steps
    }

    /// Step names in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Deformation::name).collect()
    }
}

impl MeshModifier for DeformationChain {
    fn apply(&self, mesh: &mut GeometryBuffer) {
        for step in &self.steps {
            step.apply(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Lathe, ProfilePolyline};

    /// Capsule-ish body along Y, radius 1, from -2 to 2
    fn body() -> GeometryBuffer {
        let profile = ProfilePolyline::new(vec![
            [0.2, -2.0],
            [1.0, -1.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.2, 2.0],
        ]);
        Lathe::full(16).build(&profile).unwrap()
    }

    fn top_undercut(amount: f32) -> Undercut {
        Undercut {
            compress: Axis::X,
            along: Axis::Y,
            side: Side::Positive,
            far_end: FarEnd::Max,
            start: 0.4,
            amount,
            curve: 2.0,
        }
    }

    #[test]
    fn test_axis_scale() {
        let mut mesh = body();
        let before = mesh.clone();
        AxisScale::width(2.0).apply(&mut mesh);
        for (a, b) in mesh.positions.iter().zip(&before.positions) {
            assert!((a[0] - b[0] * 2.0).abs() < 1e-6);
            assert_eq!(a[1], b[1]);
        }
    }

    #[test]
    fn test_shear_is_invertible() {
        let mut mesh = body();
        let before = mesh.clone();
        let shear = Shear {
            source: Axis::Y,
            target: Axis::Z,
            factor: 0.35,
        };
        shear.apply(&mut mesh);
        assert_ne!(mesh.positions, before.positions);
        shear.inverse().apply(&mut mesh);
        for (a, b) in mesh.positions.iter().zip(&before.positions) {
            for k in 0..3 {
                assert!((a[k] - b[k]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_undercut_zero_amount_is_identity() {
        let mut mesh = body();
        let before = mesh.clone();
        top_undercut(0.0).apply(&mut mesh);
        assert_eq!(mesh.positions, before.positions);
    }

    #[test]
    fn test_undercut_is_monotonic_in_amount() {
        let base = body();
        let mut previous = base.clone();
        for step in 1..=10 {
            let mut mesh = base.clone();
            top_undercut(step as f32 / 10.0).apply(&mut mesh);
            for (now, before) in mesh.positions.iter().zip(&previous.positions) {
                assert!(now[0].abs() <= before[0].abs() + 1e-6);
            }
            previous = mesh;
        }
    }

    #[test]
    fn test_undercut_only_touches_selected_side_and_window() {
        let base = body();
        let mut mesh = base.clone();
        top_undercut(0.8).apply(&mut mesh);
        for (now, before) in mesh.positions.iter().zip(&base.positions) {
            let t = (before[1] + 2.0) / 4.0;
            if before[0] <= 0.0 || t <= 0.4 {
                assert_eq!(now, before);
            }
        }
    }

    #[test]
    fn test_undercut_scale_clamped() {
        let cut = top_undercut(0.6);
        for i in 0..=100 {
            let s = cut.scale_at(i as f32 / 100.0);
            assert!((0.4 - 1e-6..=1.0).contains(&s));
        }
        assert!((cut.scale_at(1.0) - 0.4).abs() < 1e-6);
        // Out-of-range amounts saturate
        assert!((top_undercut(3.0).scale_at(1.0)).abs() < 1e-6);
        assert_eq!(top_undercut(-1.0).scale_at(1.0), 1.0);
    }

    #[test]
    fn test_top_and_bottom_undercuts_compose() {
        let mut mesh = body();
        let bottom = Undercut {
            side: Side::Negative,
            ..top_undercut(0.5)
        };
        DeformationChain::new()
            .then(Deformation::Undercut(top_undercut(0.5)))
            .then(Deformation::Undercut(bottom))
            .apply(&mut mesh);
        let (lo, hi) = extent(&mesh, Axis::X).unwrap();
        assert!(hi < 1.0 && lo > -1.0);
    }

    #[test]
    fn test_pointiness_zero_is_identity() {
        let mut mesh = body();
        let before = mesh.clone();
        Pointiness {
            axis: Axis::Y,
            amount: 0.0,
        }
        .apply(&mut mesh);
        assert_eq!(mesh.positions, before.positions);
    }

    #[test]
    fn test_pointiness_never_produces_nan() {
        for amount in [-2.0, -0.5, 0.5, 3.0] {
            let mut mesh = body();
            Pointiness {
                axis: Axis::Y,
                amount,
            }
            .apply(&mut mesh);
            assert!(mesh.is_finite(), "amount {amount}");
        }
    }

    /// Axial coordinate of each profile level on the first lathe column
    fn level_heights(mesh: &GeometryBuffer, levels: usize) -> Vec<f32> {
        (0..levels).map(|j| mesh.positions[j][1]).collect()
    }

    #[test]
    fn test_pointiness_keeps_ends_and_order() {
        for amount in [-1.0, -0.5, 0.5, 0.9] {
            let mut mesh = body();
            Pointiness {
                axis: Axis::Y,
                amount,
            }
            .apply(&mut mesh);
            let heights = level_heights(&mesh, 5);
            assert!((heights[0] + 2.0).abs() < 1e-5, "amount {amount}: {heights:?}");
            assert!((heights[4] - 2.0).abs() < 1e-5, "amount {amount}: {heights:?}");
            assert!(heights.windows(2).all(|w| w[0] < w[1]), "amount {amount}: {heights:?}");
        }
    }

    #[test]
    fn test_pointiness_direction() {
        let middle = |amount: f32| {
            let mut mesh = body();
            Pointiness {
                axis: Axis::Y,
                amount,
            }
            .apply(&mut mesh);
            level_heights(&mesh, 5)[2]
        };
        // s = 0.5 maps to 0.5^(1 - amount)
        assert!((middle(0.5) - (-2.0 + 4.0 * 0.5f32.sqrt())).abs() < 1e-4);
        assert!(middle(0.5) > 0.0);
        assert!(middle(-0.5) < 0.0);
    }

    #[test]
    fn test_chain_preserves_order() {
        let chain = DeformationChain::new()
            .then(Deformation::Scale(AxisScale::width(1.2)))
            .then(Deformation::Shear(Shear {
                source: Axis::Y,
                target: Axis::Z,
                factor: 0.1,
            }))
            .then(Deformation::Undercut(top_undercut(0.2)));
        assert_eq!(chain.names(), vec!["scale", "shear", "undercut"]);
    }
}
