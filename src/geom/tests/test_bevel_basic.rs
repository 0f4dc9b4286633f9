use crate::geom::{
    BevelRequest, Point3, Tolerance, Vec3, solve, solve_many, solve_with_diagnostics,
};

fn request(a: [f64; 3], b: [f64; 3], c: [f64; 3], offset: f64, segments: usize) -> BevelRequest {
    BevelRequest::new(a.into(), b.into(), c.into(), offset, segments)
}

/// Corners covering the XY plane, its flipped orientation and arbitrary 3D planes.
fn sample_corners() -> Vec<BevelRequest> {
    vec![
        request([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0], 1.5, 8),
        request([0.0, 0.0, 0.0], [0.0, 4.0, 0.0], [4.0, 0.0, 0.0], 1.5, 8),
        request([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [2.0, 3.0, 0.0], 1.0, 5),
        request([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [-3.0, 1.0, 0.0], 0.8, 7),
        request([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 0.0, 3.0], 1.0, 4),
        request([1.0, 2.0, 3.0], [5.0, -1.0, 7.0], [-2.0, 4.0, 0.5], 1.2, 12),
        request([-4.0, 0.5, 2.0], [-4.0, 6.0, 9.0], [3.0, 0.5, 2.5], 2.0, 3),
        request([10.0, 10.0, 10.0], [12.0, 10.0, 10.0], [10.0, 11.0, 13.0], 0.5, 16),
    ]
}

fn tol_for(req: &BevelRequest) -> Tolerance {
    let scale = [req.anchor, req.side_b, req.side_c]
        .iter()
        .flat_map(|p| p.to_array())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    Tolerance::LOOSE.relative_to(scale)
}

fn assert_point_close(actual: Point3, expected: Point3, tol: Tolerance) {
    assert!(
        tol.approx_eq_point3(actual, expected),
        "expected {expected:?}, got {actual:?} (tol {})",
        tol.eps
    );
}

#[test]
fn orthogonal_equal_offsets_trace_quarter_circle() {
    let req = request([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0], 1.5, 8);
    let result = solve(&req);

    assert_eq!(result.p1, Point3::new(1.5, 0.0, 0.0));
    assert_eq!(result.p2, Point3::new(0.0, 1.5, 0.0));
    assert_eq!(result.pivot, Point3::new(1.5, 1.5, 0.0));
    assert_eq!(result.plane_normal, Vec3::Z);
    assert_eq!(result.arc_points.len(), 9);

    let tol = Tolerance::LOOSE;
    assert_point_close(result.arc_points[0], result.p1, tol);
    assert_point_close(result.arc_points[8], result.p2, tol);
    for point in &result.arc_points {
        assert!((point.distance_to(result.pivot) - 1.5).abs() < 1e-9);
        assert!(point.z.abs() < 1e-12);
        // Arc stays inside the corner square between anchor and pivot.
        assert!(point.x <= 1.5 + 1e-9 && point.y <= 1.5 + 1e-9);
    }
}

#[test]
fn collinear_sides_return_anchor_only() {
    let req = request([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [4.0, 0.0, 0.0], 1.0, 8);
    let (result, diag) = solve_with_diagnostics(&req);

    assert_eq!(result.arc_points, vec![Point3::ORIGIN]);
    assert_eq!(result.p1, Point3::ORIGIN);
    assert_eq!(result.p2, Point3::ORIGIN);
    assert_eq!(result.pivot, Point3::ORIGIN);
    assert_eq!(result.plane_normal, Vec3::ZERO);
    assert!(result.is_degenerate());
    assert!(diag.degenerate);
    assert!(!diag.shear_fallback);
}

#[test]
fn zero_length_or_opposite_sides_are_degenerate() {
    let anchor = [1.0, -2.0, 3.0];
    let cases = [
        request(anchor, anchor, [4.0, 0.0, 0.0], 1.0, 4),
        request(anchor, [4.0, 0.0, 0.0], anchor, 1.0, 4),
        request(anchor, [3.0, -2.0, 3.0], [-5.0, -2.0, 3.0], 1.0, 4),
        request(anchor, [2.0, -1.0, 4.0], [3.0, 0.0, 5.0], 1.0, 4),
    ];

    for req in cases {
        let result = solve(&req);
        assert_eq!(result.arc_points, vec![Point3::new(1.0, -2.0, 3.0)], "{req:?}");
    }
}

#[test]
fn arc_endpoints_match_offset_points() {
    for req in sample_corners() {
        let result = solve(&req);
        let tol = tol_for(&req);

        let dir_b = (req.side_b - req.anchor).normalized().unwrap();
        let dir_c = (req.side_c - req.anchor).normalized().unwrap();
        assert_point_close(result.p1, req.anchor + dir_b * req.offset, tol);
        assert_point_close(result.p2, req.anchor + dir_c * req.offset, tol);
        assert_point_close(result.pivot, result.p1 + dir_c * req.offset, tol);

        assert_point_close(result.arc_points[0], result.p1, tol);
        assert_point_close(*result.arc_points.last().unwrap(), result.p2, tol);
    }
}

#[test]
fn arc_points_lie_in_corner_plane() {
    for req in sample_corners() {
        let result = solve(&req);
        let tol = tol_for(&req);
        let normal = (req.side_b - req.anchor)
            .cross(req.side_c - req.anchor)
            .normalized()
            .unwrap();

        assert!((result.plane_normal - normal).length() < 1e-12);
        for point in &result.arc_points {
            let distance = (*point - req.anchor).dot(normal);
            assert!(tol.approx_zero_f64(distance), "{point:?} is {distance} off-plane");
        }
    }
}

#[test]
fn arc_is_affine_image_of_quarter_circle() {
    // The composed transform maps (cos t, sin t) to
    // pivot + cos t (p1 - pivot) + sin t (p2 - pivot).
    for req in sample_corners() {
        let result = solve(&req);
        let tol = tol_for(&req);
        let u = result.p1 - result.pivot;
        let v = result.p2 - result.pivot;
        let step = std::f64::consts::FRAC_PI_2 / req.segments as f64;

        for (i, point) in result.arc_points.iter().enumerate() {
            let (sin, cos) = (step * i as f64).sin_cos();
            assert_point_close(*point, result.pivot + u * cos + v * sin, tol);
        }
    }
}

#[test]
fn point_count_is_segments_plus_one() {
    for segments in 1..=16 {
        let req = request([0.0, 1.0, 0.0], [3.0, 1.0, 1.0], [0.5, 4.0, -1.0], 0.75, segments);
        assert_eq!(solve(&req).arc_points.len(), segments + 1);
    }
}

#[test]
fn swapping_sides_reverses_arc() {
    for req in sample_corners() {
        let tol = tol_for(&req);
        let original = solve(&req);
        let swapped = solve(&req.swapped());

        assert_point_close(swapped.p1, original.p2, tol);
        assert_point_close(swapped.p2, original.p1, tol);
        assert_point_close(swapped.pivot, original.pivot, tol);

        assert_eq!(swapped.arc_points.len(), original.arc_points.len());
        for (a, b) in swapped.arc_points.iter().zip(original.arc_points.iter().rev()) {
            assert_point_close(*a, *b, tol);
        }
    }
}

#[test]
fn segment_count_only_changes_interior_density() {
    let base = request([1.0, 2.0, 3.0], [5.0, -1.0, 7.0], [-2.0, 4.0, 0.5], 1.2, 1);
    let reference = solve(&base);
    let tol = tol_for(&base);

    for segments in [2, 3, 8, 16] {
        let result = solve(&BevelRequest { segments, ..base });
        assert_point_close(result.arc_points[0], reference.arc_points[0], tol);
        assert_point_close(
            *result.arc_points.last().unwrap(),
            *reference.arc_points.last().unwrap(),
            tol,
        );
    }
}

#[test]
fn single_segment_is_a_chamfer() {
    let req = request([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0], 1.0, 1);
    let result = solve(&req);
    assert_eq!(result.arc_points.len(), 2);
    assert!(result.interior_points().is_empty());
}

#[test]
fn unequal_side_lengths_keep_equal_offsets() {
    let req = request([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 2.0, 0.0], 1.5, 6);
    let result = solve(&req);
    let tol = Tolerance::LOOSE;

    assert_point_close(result.p1, Point3::new(1.5, 0.0, 0.0), tol);
    assert_point_close(result.p2, Point3::new(0.0, 1.5, 0.0), tol);
    for point in &result.arc_points {
        assert!((point.distance_to(result.pivot) - 1.5).abs() < 1e-9);
    }
}

#[test]
fn near_collinear_corner_takes_general_path() {
    let req = request([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1e-6, 0.0], 0.5, 4);
    let (result, diag) = solve_with_diagnostics(&req);
    assert!(!diag.degenerate);
    assert_eq!(result.arc_points.len(), 5);
}

#[test]
fn tiny_corner_is_not_mistaken_for_collinear() {
    // |ab x ac| = 1e-200, whose square underflows to zero.
    let req = request([0.0, 0.0, 0.0], [1e-100, 0.0, 0.0], [0.0, 1e-100, 0.0], 5e-101, 8);
    let (result, diag) = solve_with_diagnostics(&req);

    assert!(!diag.degenerate);
    assert_eq!(result.plane_normal, Vec3::Z);
    assert_eq!(result.arc_points.len(), 9);
    assert!((result.arc_points[0] - result.p1).length() < 1e-112);
    assert!((result.arc_points[8] - result.p2).length() < 1e-112);
    for point in &result.arc_points {
        let radius = point.distance_to(result.pivot);
        assert!((radius / 5e-101 - 1.0).abs() < 1e-9, "radius {radius}");
    }
}

#[test]
fn slightly_tilted_plane_is_solved_flat_at_pivot_height() {
    // 1 - |n.z| is about 7.8e-5, under the alignment threshold, so the arc is
    // built in a plane parallel to XY through the pivot. The p1 end stays
    // exact; the p2 end is lifted by the pivot height.
    let req = request([0.0, 0.0, 0.0], [4.0, 0.0, 0.05], [0.0, 4.0, 0.0], 1.5, 8);
    let (result, diag) = solve_with_diagnostics(&req);

    assert!(!diag.degenerate);
    assert!(!diag.plane_aligned);
    assert!(1.0 - result.plane_normal.z.abs() < Tolerance::PLANE_ALIGNMENT.eps);

    let height = result.pivot.z;
    assert!(height > 1e-2 && height < 2e-2, "pivot height {height}");
    for point in &result.arc_points {
        assert!((point.z - height).abs() < 1e-12);
    }

    let tol = Tolerance::new(1e-12);
    assert_point_close(result.arc_points[0], result.p1, tol);
    let last = result.arc_points[8];
    assert_point_close(last, Point3::new(result.p2.x, result.p2.y, height), tol);
    assert!((last.z - result.p2.z - height).abs() < 1e-12);
}

#[test]
fn underflowing_offset_point_falls_back_to_anchor() {
    // The y component of p2 relative to the pivot underflows to zero, so no
    // shear can put p2 on the local y-axis.
    let req = request([0.0, 0.0, 0.0], [1.0, 1e-200, 0.0], [-1.0, 0.0, 0.0], 1e-200, 4);
    let (result, diag) = solve_with_diagnostics(&req);

    assert!(diag.degenerate);
    assert!(diag.shear_fallback);
    assert_eq!(diag.warnings.len(), 1);
    assert_eq!(result.arc_points, vec![Point3::ORIGIN]);
    assert!(result.is_degenerate());
}

#[test]
fn solve_many_preserves_order() {
    let requests = sample_corners();
    let batch = solve_many(&requests);
    assert_eq!(batch.len(), requests.len());
    for (req, result) in requests.iter().zip(&batch) {
        assert_eq!(result, &solve(req));
    }
}
