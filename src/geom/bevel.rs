//! Corner bevel solver.
//!
//! Rounds the corner formed by two segments `anchor -> side_b` and
//! `anchor -> side_c` with an arc that starts at `offset` along each side.
//!
//! The arc is a canonical unit quarter circle pushed through a chain of affine
//! transforms:
//!
//! 1. rotate the corner plane onto the XY plane (skipped when already parallel),
//! 2. move the pivot to the origin,
//! 3. rotate so `p1` lies on +X,
//! 4. shear so `p2` lies on +Y,
//! 5. scale so the unit endpoints land on `p1` and `p2`.
//!
//! The composition of those transforms maps `(cos t, sin t, 0)` onto the corner.
//! Non-right corners therefore produce an elliptical (sheared) arc that is still
//! tangent to both sides.
//!
//! # Degenerate input
//! Collinear sides, or a side of zero length, make `ab x ac` exactly zero. The
//! solver then returns a single-point arc holding the anchor. The test is exact
//! on purpose: near-collinear corners still take the general path.

use super::{Point3, Tolerance, Transform, Vec3};
use crate::error::BevelError;

/// Input for a single corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelRequest {
    /// Shared vertex of both sides.
    pub anchor: Point3,
    pub side_b: Point3,
    pub side_c: Point3,
    /// Distance from the anchor along each side where the arc begins/ends.
    pub offset: f64,
    /// Number of arc segments; the arc has `segments + 1` points.
    pub segments: usize,
}

impl BevelRequest {
    /// Build a request without validation. `solve` expects finite points,
    /// `offset > 0` and `segments >= 1`.
    #[must_use]
    pub const fn new(
        anchor: Point3,
        side_b: Point3,
        side_c: Point3,
        offset: f64,
        segments: usize,
    ) -> Self {
        Self {
            anchor,
            side_b,
            side_c,
            offset,
            segments,
        }
    }

    /// Build a request and check the solver's preconditions.
    ///
    /// Offsets longer than a side are accepted; clamping those is the job of
    /// [`crate::settings::BevelSettings`].
    pub fn checked(
        anchor: Point3,
        side_b: Point3,
        side_c: Point3,
        offset: f64,
        segments: usize,
    ) -> Result<Self, BevelError> {
        for (name, point) in [("anchor", anchor), ("side_b", side_b), ("side_c", side_c)] {
            if !point.is_finite() {
                return Err(BevelError::NonFinitePoint {
                    name,
                    point: point.to_array(),
                });
            }
        }
        if !offset.is_finite() || offset <= 0.0 {
            return Err(BevelError::InvalidOffset { offset });
        }
        if segments < 1 {
            return Err(BevelError::InvalidSegmentCount { segments });
        }
        Ok(Self::new(anchor, side_b, side_c, offset, segments))
    }

    /// The same corner with `side_b` and `side_c` exchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            side_b: self.side_c,
            side_c: self.side_b,
            ..self
        }
    }
}

/// Output of [`solve`].
#[derive(Debug, Clone, PartialEq)]
pub struct BevelResult {
    /// Arc samples from `p1` to `p2`, or `[anchor]` for a degenerate corner.
    pub arc_points: Vec<Point3>,
    /// Arc start on the `anchor -> side_b` side.
    pub p1: Point3,
    /// Arc end on the `anchor -> side_c` side.
    pub p2: Point3,
    /// Construction point `p1 + offset * normalize(ac)`.
    pub pivot: Point3,
    /// Unit normal of the corner plane (zero when degenerate).
    pub plane_normal: Vec3,
}

impl BevelResult {
    fn degenerate(anchor: Point3) -> Self {
        Self {
            arc_points: vec![anchor],
            p1: anchor,
            p2: anchor,
            pivot: anchor,
            plane_normal: Vec3::ZERO,
        }
    }

    /// `true` when no bevel could be built and `arc_points == [anchor]`.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.arc_points.len() < 2
    }

    /// Points strictly between `p1` and `p2`.
    #[must_use]
    pub fn interior_points(&self) -> &[Point3] {
        match self.arc_points.len() {
            0..=2 => &[],
            len => &self.arc_points[1..len - 1],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BevelDiagnostics {
    pub degenerate: bool,
    /// The corner plane was rotated onto the XY plane before solving.
    pub plane_aligned: bool,
    /// Rotation about local Z that puts `p1` on +X (radians, counter-clockwise).
    pub axis_angle: f64,
    /// `p2.x / p2.y` after axis alignment; zero for right-angle corners.
    pub shear_factor: f64,
    /// Diagonal scale `(p1.x, p2.y)` applied to the unit quarter circle.
    pub scale: [f64; 2],
    /// The shear stage could not be built and the degenerate result was returned.
    pub shear_fallback: bool,
    pub warnings: Vec<String>,
}

/// Compute the bevel arc for a corner.
#[must_use]
pub fn solve(request: &BevelRequest) -> BevelResult {
    solve_with_diagnostics(request).0
}

/// Solve a batch of independent corners. Output order matches input order.
#[must_use]
pub fn solve_many(requests: &[BevelRequest]) -> Vec<BevelResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests.par_iter().map(solve).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        requests.iter().map(solve).collect()
    }
}

/// Same as [`solve`], also reporting the intermediate transform parameters.
#[must_use]
pub fn solve_with_diagnostics(request: &BevelRequest) -> (BevelResult, BevelDiagnostics) {
    let mut diag = BevelDiagnostics::default();
    let BevelRequest {
        anchor,
        side_b,
        side_c,
        offset,
        segments,
    } = *request;

    let ab = side_b - anchor;
    let ac = side_c - anchor;
    let cross = ab.cross(ac);
    if cross == Vec3::ZERO {
        log::debug!("bevel: sides are collinear or zero-length, returning anchor");
        diag.degenerate = true;
        return (BevelResult::degenerate(anchor), diag);
    }

    // Only non-finite input gets past the zero test and still fails here.
    let (Some(normal), Some(dir_b), Some(dir_c)) =
        (cross.normalized(), ab.normalized(), ac.normalized())
    else {
        log::debug!("bevel: corner vectors are not finite, returning anchor");
        diag.degenerate = true;
        return (BevelResult::degenerate(anchor), diag);
    };

    let p1 = anchor + dir_b * offset;
    let p2 = anchor + dir_c * offset;
    let pivot = p1 + dir_c * offset;

    // Rotate the corner plane onto the XY plane unless it already is (anti)parallel.
    let in_xy_plane = 1.0 - Vec3::Z.dot(normal).abs() < Tolerance::PLANE_ALIGNMENT.eps;
    let align = if in_xy_plane {
        None
    } else {
        Transform::rotation_between(Vec3::Z, normal)
    };
    diag.plane_aligned = align.is_some();

    let to_plane = match align.map(Transform::inverse) {
        None => Transform::identity(),
        Some(Some(inv)) => inv,
        Some(None) => return shear_fallback(anchor, diag, "plane rotation is not invertible"),
    };
    let (local_p1, local_p2, local_pivot) = (
        to_plane.apply_point(p1),
        to_plane.apply_point(p2),
        to_plane.apply_point(pivot),
    );

    // Pivot becomes the origin.
    let translate = Transform::translate(local_pivot.to_vec3());
    let local_p1 = local_p1 - local_pivot.to_vec3();
    let local_p2 = local_p2 - local_pivot.to_vec3();

    // p1 onto +X.
    let angle = local_p1.y.atan2(local_p1.x);
    let axis_rot = Transform::rotate_z(angle);
    let unrotate = Transform::rotate_z(-angle);
    let local_p1 = unrotate.apply_point(local_p1);
    let local_p2 = unrotate.apply_point(local_p2);
    diag.axis_angle = angle;

    // p2 onto +Y.
    if local_p2.y == 0.0 || !local_p2.y.is_finite() {
        return shear_fallback(anchor, diag, "p2 lies on the local x-axis, shear is undefined");
    }
    let factor = local_p2.x / local_p2.y;
    let shear = Transform::shear_xz(factor, 0.0);
    let Some(unshear) = shear.inverse() else {
        return shear_fallback(anchor, diag, "shear transform is not invertible");
    };
    let local_p2 = unshear.apply_point(local_p2);
    diag.shear_factor = factor;

    let scale = Transform::scale(local_p1.x, local_p2.y, 1.0);
    diag.scale = [local_p1.x, local_p2.y];

    let mut mat = translate * axis_rot * shear * scale;
    if let Some(align) = align {
        mat = align * mat;
    }
    if !mat.is_finite() {
        return shear_fallback(anchor, diag, "composed transform is not finite");
    }

    let arc_points = quarter_arc(segments)
        .map(|sample| mat.apply_point(sample))
        .collect::<Vec<_>>();

    log::debug!(
        "bevel: {} points, aligned={}, shear={factor:.6}, scale=({:.6}, {:.6})",
        arc_points.len(),
        diag.plane_aligned,
        local_p1.x,
        local_p2.y
    );

    let result = BevelResult {
        arc_points,
        p1,
        p2,
        pivot,
        plane_normal: normal,
    };
    (result, diag)
}

/// `segments + 1` samples on the unit circle from angle 0 to pi/2.
fn quarter_arc(segments: usize) -> impl Iterator<Item = Point3> {
    let step = std::f64::consts::FRAC_PI_2 / segments as f64;
    (0..=segments).map(move |i| {
        let (sin, cos) = (step * i as f64).sin_cos();
        Point3::new(cos, sin, 0.0)
    })
}

fn shear_fallback(
    anchor: Point3,
    mut diag: BevelDiagnostics,
    reason: &str,
) -> (BevelResult, BevelDiagnostics) {
    log::warn!("bevel: {reason}; returning anchor");
    diag.degenerate = true;
    diag.shear_fallback = true;
    diag.warnings.push(reason.to_owned());
    (BevelResult::degenerate(anchor), diag)
}
