use std::ops::{Add, Mul, Neg, Sub};

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean length, scaled by the largest component so tiny or huge
    /// vectors neither underflow nor overflow in the sum of squares.
    #[must_use]
    pub fn length(self) -> f64 {
        let scale = self.max_abs();
        if scale == 0.0 || !scale.is_finite() {
            return scale;
        }
        let v = self.div_scalar(scale);
        scale * v.dot(v).sqrt()
    }

    fn max_abs(self) -> f64 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    fn div_scalar(self, d: f64) -> Self {
        Self::new(self.x / d, self.y / d, self.z / d)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Unit vector in the same direction, or `None` for zero/non-finite input.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let scale = self.max_abs();
        if !(scale.is_finite() && scale > 0.0) {
            return None;
        }
        let v = self.div_scalar(scale);
        let len = v.dot(v).sqrt();
        len.is_finite().then(|| v.div_scalar(len))
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin point (0, 0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Position vector from the origin.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Point3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Self;
    fn sub(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Affine 4x4 homogeneous matrix, row-major, acting on column vectors.
///
/// `a.compose(b)` (or `a * b`) applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Transform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    #[must_use]
    pub const fn translate(offset: Vec3) -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, offset.x],
                [0.0, 1.0, 0.0, offset.y],
                [0.0, 0.0, 1.0, offset.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Diagonal matrix `diag(sx, sy, sz, 1)`.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            m: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Counter-clockwise rotation about the Z axis.
    #[must_use]
    pub fn rotate_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [
                [c, -s, 0.0, 0.0],
                [s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation of `angle` radians about `axis` (right-hand rule).
    #[must_use]
    pub fn rotate_axis(axis: Vec3, angle: f64) -> Option<Self> {
        let Vec3 { x, y, z } = axis.normalized()?;
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        Some(Self {
            m: [
                [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
                [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
                [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        })
    }

    /// Smallest-angle rotation taking direction `from` onto direction `to`.
    ///
    /// Returns `None` when either input cannot be normalized or the two
    /// directions are exactly opposite (the rotation axis is then undefined).
    /// Parallel inputs give the identity.
    #[must_use]
    pub fn rotation_between(from: Vec3, to: Vec3) -> Option<Self> {
        let from = from.normalized()?;
        let to = to.normalized()?;
        let cos = from.dot(to).clamp(-1.0, 1.0);
        let axis = from.cross(to);
        if axis.length() == 0.0 {
            return (cos > 0.0).then(Self::identity);
        }
        Self::rotate_axis(axis, cos.acos())
    }

    /// Shear that offsets X and Z proportionally to Y:
    /// `x' = x + fx * y`, `z' = z + fz * y`.
    #[must_use]
    pub const fn shear_xz(fx: f64, fz: f64) -> Self {
        Self {
            m: [
                [1.0, fx, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, fz, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        let mut result = Self::identity();
        for (i, row) in result.m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        result
    }

    /// Determinant of the linear (upper-left 3x3) part.
    #[must_use]
    pub fn determinant(self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse of this affine transform.
    ///
    /// Returns `None` if the linear part is singular or the result would not be
    /// finite. The bottom row is assumed to be `(0, 0, 0, 1)`.
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-15 {
            return None;
        }
        let m = &self.m;
        let inv_det = 1.0 / det;

        let mut out = Self::identity();
        // Linear part: transposed cofactor matrix over the determinant.
        out.m[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det;
        out.m[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        out.m[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        out.m[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        out.m[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        out.m[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det;
        out.m[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det;
        out.m[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det;
        out.m[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det;

        // Translation: -L^-1 * t
        let t = self.translation();
        let back = out.apply_vec(t);
        out.m[0][3] = -back.x;
        out.m[1][3] = -back.y;
        out.m[2][3] = -back.z;

        out.is_finite().then_some(out)
    }

    #[must_use]
    pub fn translation(self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    #[must_use]
    pub fn apply_point(self, p: Point3) -> Point3 {
        let x = self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2] * p.z + self.m[0][3];
        let y = self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2] * p.z + self.m[1][3];
        let z = self.m[2][0] * p.x + self.m[2][1] * p.y + self.m[2][2] * p.z + self.m[2][3];
        Point3::new(x, y, z)
    }

    #[must_use]
    pub fn apply_vec(self, v: Vec3) -> Vec3 {
        let x = self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z;
        let y = self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z;
        let z = self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z;
        Vec3::new(x, y, z)
    }

    #[must_use]
    pub const fn as_matrix(&self) -> &[[f64; 4]; 4] {
        &self.m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric comparisons.
///
/// Named constants keep the handful of epsilons in one place:
/// - `Tolerance::DEFAULT` - general comparisons (1e-9)
/// - `Tolerance::LOOSE` - endpoint/coplanarity checks after a transform chain (1e-6)
/// - `Tolerance::PLANE_ALIGNMENT` - "already in the XY plane" test (1e-4)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    pub const LOOSE: Self = Self { eps: 1e-6 };

    /// A plane whose normal satisfies `1 - |n.z| < eps` is treated as parallel
    /// to the XY plane.
    pub const PLANE_ALIGNMENT: Self = Self { eps: 1e-4 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    /// Tolerance scaled by the magnitude of `reference` (never tighter than `self`).
    #[must_use]
    pub fn relative_to(self, reference: f64) -> Self {
        Self::new(self.eps * reference.abs().max(1.0))
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_zero_f64(self, a: f64) -> bool {
        a.abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_point3(self, a: Point3, b: Point3) -> bool {
        (a - b).length() <= self.eps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matrix_close(a: Transform, b: Transform) {
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (a.as_matrix()[i][j] - b.as_matrix()[i][j]).abs() < 1e-10,
                    "entry ({i},{j}) differs: {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_vec3_operators() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_length_survives_extreme_magnitudes() {
        let tiny = Vec3::new(0.0, 0.0, 1e-200);
        assert_eq!(tiny.length(), 1e-200);
        assert_eq!(tiny.normalized(), Some(Vec3::Z));

        let huge = Vec3::new(3e200, 0.0, 4e200);
        assert!((huge.length() / 5e200 - 1.0).abs() < 1e-15);
        let n = huge.normalized().unwrap();
        assert!((n.x - 0.6).abs() < 1e-15 && (n.z - 0.8).abs() < 1e-15);

        assert!(Vec3::new(f64::NAN, 1.0, 0.0).normalized().is_none());
        assert!(Vec3::new(f64::INFINITY, 1.0, 0.0).normalized().is_none());
    }

    #[test]
    fn test_normalized_rejects_zero() {
        assert!(Vec3::ZERO.normalized().is_none());
        let n = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_point3_operators() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let v = Vec3::new(1.0, 1.0, 1.0);

        assert_eq!(p + v, Point3::new(2.0, 3.0, 4.0));
        assert_eq!(p - v, Point3::new(0.0, 1.0, 2.0));
        assert_eq!(Point3::new(4.0, 5.0, 6.0) - p, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_transform_inverse_roundtrip() {
        let t = Transform::translate(Vec3::new(1.0, 2.0, 3.0))
            * Transform::rotate_z(0.7)
            * Transform::shear_xz(0.4, 0.0)
            * Transform::scale(2.0, 0.5, 1.0);
        let inv = t.inverse().unwrap();

        assert_matrix_close(t.compose(inv), Transform::identity());
        assert_matrix_close(inv.compose(t), Transform::identity());
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        assert!(Transform::scale(1.0, 0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_transform_compose_order() {
        // Scale first, then translate.
        let t = Transform::translate(Vec3::new(1.0, 0.0, 0.0)) * Transform::scale(2.0, 2.0, 2.0);
        assert_eq!(t.apply_point(Point3::new(1.0, 1.0, 0.0)), Point3::new(3.0, 2.0, 0.0));
    }

    #[test]
    fn test_shear_xz_moves_x_by_y() {
        let t = Transform::shear_xz(0.5, 0.0);
        assert_eq!(t.apply_point(Point3::new(0.0, 2.0, 0.0)), Point3::new(1.0, 2.0, 0.0));
        let back = t.inverse().unwrap().apply_point(Point3::new(1.0, 2.0, 0.0));
        assert!(Tolerance::DEFAULT.approx_eq_point3(back, Point3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_rotation_between_maps_from_onto_to() {
        let to = Vec3::new(1.0, -2.0, 0.5).normalized().unwrap();
        let r = Transform::rotation_between(Vec3::Z, to).unwrap();
        let mapped = r.apply_vec(Vec3::Z);
        assert!((mapped - to).length() < 1e-12);
        assert!((r.determinant() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_between_parallel_and_opposite() {
        assert_eq!(
            Transform::rotation_between(Vec3::Z, Vec3::new(0.0, 0.0, 3.0)),
            Some(Transform::identity())
        );
        assert!(Transform::rotation_between(Vec3::Z, -Vec3::Z).is_none());
    }

    #[test]
    fn test_rotate_z_is_counter_clockwise() {
        let p = Transform::rotate_z(std::f64::consts::FRAC_PI_2)
            .apply_point(Point3::new(1.0, 0.0, 0.0));
        assert!(Tolerance::DEFAULT.approx_eq_point3(p, Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_tolerance_relative() {
        let tol = Tolerance::LOOSE.relative_to(100.0);
        assert!(tol.approx_eq_f64(100.0, 100.00005));
        assert!(!Tolerance::LOOSE.approx_eq_f64(100.0, 100.00005));
        assert_eq!(Tolerance::LOOSE.relative_to(0.01), Tolerance::LOOSE);
    }
}
