//! Complex arithmetic on `(re, im)` tuples.
//!
//! Only what the zeta and phase computations need.

/// A complex number represented as (real, imaginary).
pub type Complex = (f64, f64);

pub const ZERO: Complex = (0.0, 0.0);
pub const ONE: Complex = (1.0, 0.0);

#[inline]
pub fn cadd(a: Complex, b: Complex) -> Complex {
    (a.0 + b.0, a.1 + b.1)
}

#[inline]
pub fn csub(a: Complex, b: Complex) -> Complex {
    (a.0 - b.0, a.1 - b.1)
}

#[inline]
pub fn cmul(a: Complex, b: Complex) -> Complex {
    (a.0 * b.0 - a.1 * b.1, a.0 * b.1 + a.1 * b.0)
}

#[inline]
pub fn cdiv(a: Complex, b: Complex) -> Complex {
    let denom = b.0 * b.0 + b.1 * b.1;
    (
        (a.0 * b.0 + a.1 * b.1) / denom,
        (a.1 * b.0 - a.0 * b.1) / denom,
    )
}

#[inline]
pub fn cscale(s: f64, z: Complex) -> Complex {
    (s * z.0, s * z.1)
}

/// |z|, computed without intermediate overflow.
#[inline]
pub fn cabs(z: Complex) -> f64 {
    z.0.hypot(z.1)
}

/// Principal argument in (-pi, pi].
#[inline]
pub fn carg(z: Complex) -> f64 {
    z.1.atan2(z.0)
}

/// Principal logarithm.
#[inline]
pub fn cln(z: Complex) -> Complex {
    (cabs(z).ln(), carg(z))
}

/// `n^{-s}` for a positive real base.
#[inline]
pub fn real_pow_neg(n: f64, s: Complex) -> Complex {
    let ln_n = n.ln();
    let magnitude = (-s.0 * ln_n).exp();
    let phase = -s.1 * ln_n;
    (magnitude * phase.cos(), magnitude * phase.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex, b: Complex) -> bool {
        (a.0 - b.0).abs() < 1e-12 && (a.1 - b.1).abs() < 1e-12
    }

    #[test]
    fn test_mul_div_inverse() {
        let a = (1.5, -2.0);
        let b = (0.25, 3.0);
        assert!(close(cdiv(cmul(a, b), b), a));
    }

    #[test]
    fn test_real_pow_neg() {
        // 4^{-1/2} = 1/2
        assert!(close(real_pow_neg(4.0, (0.5, 0.0)), (0.5, 0.0)));
        // |n^{-it}| = 1
        assert!((cabs(real_pow_neg(7.0, (0.0, 13.0))) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ln_arg() {
        assert!(close(cln((-1.0, 0.0)), (0.0, std::f64::consts::PI)));
        assert!((carg((0.0, 2.0)) - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
