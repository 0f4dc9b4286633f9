//! User-facing bevel parameters.
//!
//! Editors keep one `BevelSettings` per corner and rebuild a [`BevelRequest`]
//! after every change. The clamps here keep interactive input inside the
//! range where the bevel neither overlaps itself nor runs past a side.

use serde::{Deserialize, Serialize};

use crate::error::BevelError;
use crate::geom::{BevelRequest, Point3};

/// Smallest accepted offset.
pub const MIN_OFFSET: f64 = 0.001;
/// Gap kept between the arc ends and the far side points.
pub const SIDE_MARGIN: f64 = 0.01;
pub const MIN_SEGMENTS: usize = 1;
pub const MAX_SEGMENTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BevelSettings {
    pub anchor: [f64; 3],
    pub side_b: [f64; 3],
    pub side_c: [f64; 3],
    pub offset: f64,
    pub segments: usize,
    /// Show interior arc samples as point markers.
    pub show_points: bool,
    /// Show the beveled face mesh.
    pub show_mesh: bool,
    /// Show the plane normal at the pivot.
    pub show_normal: bool,
}

impl Default for BevelSettings {
    fn default() -> Self {
        Self {
            anchor: [0.0, 0.0, 0.0],
            side_b: [4.0, 0.0, 0.0],
            side_c: [0.0, 4.0, 0.0],
            offset: 1.5,
            segments: 8,
            show_points: true,
            show_mesh: true,
            show_normal: true,
        }
    }
}

impl BevelSettings {
    /// Offset clamped to `[MIN_OFFSET, shortest side - SIDE_MARGIN]`.
    ///
    /// When the shortest side is shorter than the margin the upper bound
    /// collapses to `MIN_OFFSET`.
    #[must_use]
    pub fn clamped_offset(&self) -> f64 {
        let anchor = Point3::from(self.anchor);
        let ab = Point3::from(self.side_b).distance_to(anchor);
        let ac = Point3::from(self.side_c).distance_to(anchor);
        let hi = (ab.min(ac) - SIDE_MARGIN).max(MIN_OFFSET);
        if self.offset.is_nan() {
            return MIN_OFFSET;
        }
        self.offset.clamp(MIN_OFFSET, hi)
    }

    #[must_use]
    pub fn clamped_segments(&self) -> usize {
        self.segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS)
    }

    /// Copy with offset and segment count clamped.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            offset: self.clamped_offset(),
            segments: self.clamped_segments(),
            ..self.clone()
        }
    }

    /// Build a solver request with both clamps applied.
    pub fn to_request(&self) -> Result<BevelRequest, BevelError> {
        BevelRequest::checked(
            self.anchor.into(),
            self.side_b.into(),
            self.side_c.into(),
            self.clamped_offset(),
            self.clamped_segments(),
        )
    }
}

/// Parse `"x,y,z"` (whitespace around components is ignored).
pub fn parse_point(input: &str) -> Result<Point3, BevelError> {
    let invalid = || BevelError::InvalidPoint {
        input: input.to_owned(),
    };

    let mut coords = [0.0; 3];
    let mut parts = input.split(',');
    for slot in &mut coords {
        let part = parts.next().ok_or_else(invalid)?;
        *slot = part.trim().parse::<f64>().map_err(|_| invalid())?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }

    let point = Point3::from(coords);
    if !point.is_finite() {
        return Err(BevelError::NonFinitePoint {
            name: "point",
            point: coords,
        });
    }
    Ok(point)
}
