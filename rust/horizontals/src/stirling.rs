//! Stirling-type estimates of the log-gamma derivative.

use certificate_core::complex::{self, Complex};

/// Below this modulus the asymptotic form is replaced by the digamma function.
pub const STIRLING_CUTOFF: f64 = 10.0;

/// Re(z) the recurrence shifts to before the asymptotic series is applied.
const SHIFT_TARGET: f64 = 10.0;

/// B_{2k} / (2k) for k = 1..6.
const DIGAMMA_COEFFS: [f64; 6] = [
    1.0 / 12.0,
    -1.0 / 120.0,
    1.0 / 252.0,
    -1.0 / 240.0,
    1.0 / 132.0,
    -691.0 / 32760.0,
];

/// Complex digamma psi(z).
///
/// Shifts z right with psi(z) = psi(z + 1) - 1/z until Re(z) >= 10, then
/// applies psi(z) ~ ln z - 1/(2z) - sum B_{2k} / (2k z^{2k}).
pub fn digamma(z: Complex) -> Complex {
    let mut z = z;
    let mut shift = complex::ZERO;
    while z.0 < SHIFT_TARGET {
        shift = complex::cadd(shift, complex::cdiv(complex::ONE, z));
        z = (z.0 + 1.0, z.1);
    }

    let inv = complex::cdiv(complex::ONE, z);
    let inv2 = complex::cmul(inv, inv);
    let mut series = complex::ZERO;
    let mut power = inv2;
    for &coeff in &DIGAMMA_COEFFS {
        series = complex::cadd(series, complex::cscale(coeff, power));
        power = complex::cmul(power, inv2);
    }

    let psi = complex::csub(
        complex::csub(complex::cln(z), complex::cscale(0.5, inv)),
        series,
    );
    complex::csub(psi, shift)
}

/// Estimate of the log-gamma derivative at sigma + it.
///
/// For |s| >= 10 this is ln|s| + sigma / (2|s|^2); closer to the origin the
/// imaginary part of psi(s) is used.
pub fn log_gamma_derivative(sigma: f64, t: f64) -> f64 {
    let modulus = sigma.hypot(t);
    if modulus < STIRLING_CUTOFF {
        return digamma((sigma, t)).1;
    }
    modulus.ln() + sigma / (2.0 * modulus * modulus)
}
