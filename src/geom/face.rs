//! Planar face bounded by the two sides and the bevel arc.
//!
//! The outline runs `side_c -> p2 -> ... -> p1 -> side_b` and closes back to
//! `side_c`. For offsets within the side lengths the outline is convex (the
//! arc bulges towards the cut-off anchor), so a triangle fan from the first
//! vertex covers it without overlaps.

use super::{BevelRequest, BevelResult, Point3};
use crate::error::BevelError;

#[derive(Debug, Clone, PartialEq)]
pub struct BevelFace {
    /// Closed outline, first vertex not repeated.
    pub outline: Vec<Point3>,
}

/// Indexed triangle mesh, positions as plain arrays for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BevelMesh {
    pub positions: Vec<[f64; 3]>,
    /// Triangle list; length is a multiple of 3.
    pub indices: Vec<u32>,
}

impl BevelMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as `[a, b, c]` index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| [tri[0], tri[1], tri[2]])
    }
}

impl BevelFace {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.outline.len()
    }

    /// Fan-triangulate the outline around its first vertex.
    #[must_use]
    pub fn to_mesh(&self) -> BevelMesh {
        let positions = self.outline.iter().map(|p| p.to_array()).collect::<Vec<_>>();
        let count = u32::try_from(positions.len()).unwrap_or(u32::MAX);

        let mut indices = Vec::with_capacity(positions.len().saturating_sub(2) * 3);
        for i in 1..count.saturating_sub(1) {
            indices.extend_from_slice(&[0, i, i + 1]);
        }

        BevelMesh { positions, indices }
    }
}

/// Build the beveled face for a solved corner.
///
/// Returns `None` for degenerate results, which have no arc to bound a face.
#[must_use]
pub fn bevel_face(request: &BevelRequest, result: &BevelResult) -> Option<BevelFace> {
    if result.is_degenerate() {
        return None;
    }

    let mut outline = Vec::with_capacity(result.arc_points.len() + 2);
    outline.push(request.side_c);
    outline.extend(result.arc_points.iter().rev().copied());
    outline.push(request.side_b);
    Some(BevelFace { outline })
}

/// Like [`bevel_face`], reporting a degenerate corner as an error.
pub fn try_bevel_face(
    request: &BevelRequest,
    result: &BevelResult,
) -> Result<BevelFace, BevelError> {
    bevel_face(request, result).ok_or(BevelError::Degenerate {
        anchor: request.anchor.to_array(),
    })
}
