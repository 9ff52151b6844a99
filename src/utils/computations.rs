/// Displacement `coord1 - coord2`
pub fn delta(coord1: &[f64; 3], coord2: &[f64; 3]) -> [f64; 3] {
    [
        coord1[0] - coord2[0],
        coord1[1] - coord2[1],
        coord1[2] - coord2[2],
    ]
}

pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// ```rust
/// use jbond::utils::distance_squared;
///
/// assert_eq!(distance_squared(&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]), 5.0);
/// ```
pub fn distance_squared(coord1: &[f64; 3], coord2: &[f64; 3]) -> f64 {
    let d = delta(coord1, coord2);
    dot(&d, &d)
}

/// Symmetric outer product `s * a ⊗ b` as xx, yy, zz, xy, xz, yz
pub fn outer6(s: f64, a: &[f64; 3], b: &[f64; 3]) -> [f64; 6] {
    [
        s * a[0] * b[0],
        s * a[1] * b[1],
        s * a[2] * b[2],
        s * a[0] * b[1],
        s * a[0] * b[2],
        s * a[1] * b[2],
    ]
}
