//! Slider geometry
//!
//! The stylesheet sizes the rotating backdrop from the slider's diagonal,
//! exposed as the `--diameter` custom property.

/// Diagonal of a `width` x `height` box
///
/// Non-finite and negative sides count as zero.
pub fn diameter(width: f64, height: f64) -> f64 {
    side(width).hypot(side(height))
}

fn side(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
