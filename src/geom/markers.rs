//! Construction markers for editors that visualise how a bevel is built.

use super::{BevelRequest, BevelResult, Point3, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct BevelMarkers {
    pub anchor: Point3,
    pub side_b: Point3,
    pub side_c: Point3,
    /// `side_b - anchor`.
    pub ab: Vec3,
    /// `side_c - anchor`.
    pub ac: Vec3,
    pub p1: Point3,
    pub p2: Point3,
    pub pivot: Point3,
    pub normal: Vec3,
    /// Arc samples strictly between `p1` and `p2`.
    pub interior: Vec<Point3>,
}

impl BevelMarkers {
    #[must_use]
    pub fn from_result(request: &BevelRequest, result: &BevelResult) -> Self {
        Self {
            anchor: request.anchor,
            side_b: request.side_b,
            side_c: request.side_c,
            ab: request.side_b - request.anchor,
            ac: request.side_c - request.anchor,
            p1: result.p1,
            p2: result.p2,
            pivot: result.pivot,
            normal: result.plane_normal,
            interior: result.interior_points().to_vec(),
        }
    }

    /// Segment from the pivot along the plane normal, `length` long.
    #[must_use]
    pub fn normal_segment(&self, length: f64) -> (Point3, Point3) {
        (self.pivot, self.pivot + self.normal * length)
    }
}
