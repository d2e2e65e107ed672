//! Vector primitives shared by the joint-angle computations.

use nalgebra::Vector3;

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `None` when either vector has zero (or non-finite) length, since the
/// angle is undefined there.
pub fn angle_between_vectors(a: &Vector3<f32>, b: &Vector3<f32>) -> Option<f32> {
    let magnitude_product = a.norm() * b.norm();
    if !magnitude_product.is_finite() || magnitude_product <= 0.0 {
        return None;
    }

    // Rounding can push the ratio slightly past ±1, which would make acos NaN.
    let cos_angle = (a.dot(b) / magnitude_product).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Angle between `v` and the horizontal (XZ) plane in degrees, in `[0, 90]`.
pub fn elevation_from_horizontal(v: &Vector3<f32>) -> Option<f32> {
    let length = v.norm();
    if !length.is_finite() || length <= 0.0 {
        return None;
    }

    let horizontal = (v.x * v.x + v.z * v.z).sqrt();
    Some(v.y.abs().atan2(horizontal).to_degrees())
}
