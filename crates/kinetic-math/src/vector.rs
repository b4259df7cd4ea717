//! Small fixed-size vector helpers for `[f64; D]` positions.

#[inline]
pub fn dot<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm<const D: usize>(a: &[f64; D]) -> f64 {
    dot(a, a).sqrt()
}

/// a + s * b
#[inline]
pub fn axpy<const D: usize>(a: &[f64; D], s: f64, b: &[f64; D]) -> [f64; D] {
    let mut out = [0.0; D];
    for d in 0..D {
        out[d] = a[d] + s * b[d];
    }
    out
}

#[inline]
pub fn is_finite<const D: usize>(a: &[f64; D]) -> bool {
    a.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let a = [1.0, 2.0, 2.0];
        let b = [0.5, 0.0, -1.0];
        assert!((norm(&a) - 3.0).abs() < 1e-15);
        assert!((dot(&a, &b) + 1.5).abs() < 1e-15);
        assert_eq!(axpy(&a, 2.0, &b), [2.0, 2.0, 0.0]);
        assert!(!is_finite(&[1.0, f64::NAN]));
    }
}
