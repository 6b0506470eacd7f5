// Math utilities and helper functions

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Reduce the magnitude of `value` by `amount`, stopping at zero.
///
/// This is linear drag: it can slow a body down to rest but never reverse it.
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value - amount > 0.0 {
        value - amount
    } else if value + amount < 0.0 {
        value + amount
    } else {
        0.0
    }
}

/// Clamp `value` to the symmetric range `[-limit, limit]`
pub fn clamp_abs(value: f32, limit: f32) -> f32 {
    clamp(value, -limit, limit)
}

/// `-1.0`, `0.0` or `1.0` depending on the sign of `value` (zero stays zero)
pub fn sign_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
