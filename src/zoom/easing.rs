//! Easing curve for zoom transitions

/// Cubic ease in/out: `4p³` for the first half, `1 - 4(1-p)³` for the second.
///
/// Input is clamped to [0, 1]. The curve is point-symmetric around 0.5, so
/// `1 - f(1 - p) == f(p)`; the animation clock relies on that when a zoom-in
/// is reversed into a zoom-out mid-flight.
#[inline]
pub fn cubic_in_out(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        let inv = 1.0 - p;
        1.0 - 4.0 * inv * inv * inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn hits_fixed_points() {
        assert!(approx_eq(cubic_in_out(0.0), 0.0));
        assert!(approx_eq(cubic_in_out(0.5), 0.5));
        assert!(approx_eq(cubic_in_out(1.0), 1.0));
    }

    #[test]
    fn is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=1000 {
            let p = i as f64 / 1000.0;
            let v = cubic_in_out(p);
            assert!(v >= prev, "not monotonic at p={p}");
            prev = v;
        }
    }

    #[test]
    fn is_point_symmetric() {
        for i in 0..=20 {
            let p = i as f64 / 20.0;
            assert!(approx_eq(1.0 - cubic_in_out(1.0 - p), cubic_in_out(p)));
        }
    }

    #[test]
    fn clamps_out_of_range_input() {
        assert!(approx_eq(cubic_in_out(-1.0), 0.0));
        assert!(approx_eq(cubic_in_out(2.0), 1.0));
    }
}
