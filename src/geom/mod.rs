mod bevel;
mod core;
mod face;
mod markers;

pub use bevel::{
    BevelDiagnostics, BevelRequest, BevelResult, solve, solve_many, solve_with_diagnostics,
};
pub use core::{Point3, Tolerance, Transform, Vec3};
pub use face::{BevelFace, BevelMesh, bevel_face, try_bevel_face};
pub use markers::BevelMarkers;

#[cfg(test)]
mod tests;
