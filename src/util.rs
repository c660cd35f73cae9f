//! Small numeric helpers shared by the bars and the animator.

/// Linearly remap `value` from `[in_start, in_end]` to `[out_start, out_end]`.
///
/// No clamping is applied, values outside the input range extrapolate.
pub fn map_range(in_start: f64, in_end: f64, out_start: f64, out_end: f64, value: f64) -> f64 {
    out_start + (value - in_start) * (out_end - out_start) / (in_end - in_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_endpoints() {
        assert_eq!(map_range(0.0, 255.0, 1.0, 50.0, 0.0), 1.0);
        assert_eq!(map_range(0.0, 255.0, 1.0, 50.0, 255.0), 50.0);
    }

    #[test]
    fn test_map_range_midpoint_and_extrapolation() {
        assert!((map_range(0.0, 1.0, 55.0, 65.0, 0.5) - 60.0).abs() < 1e-9);
        // Energy ratios slightly above 1.0 keep extrapolating
        assert!((map_range(0.0, 1.0, 0.0, 10.0, 1.5) - 15.0).abs() < 1e-9);
    }
}
