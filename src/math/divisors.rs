//! GCD / HCF / LCM reductions.
//!
//! LCM accumulates in `u128` and reports overflow instead of wrapping.

use thiserror::Error;

/// Errors raised by arithmetic reductions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// The least common multiple does not fit in `u128`.
    #[error("lcm result exceeds supported range")]
    Overflow,
    /// The caller gave up on the computation before it finished.
    #[error("computation cancelled")]
    Cancelled,
}

/// Euclidean greatest common divisor. `gcd(0, 0) == 0`.
pub fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

/// Highest common factor of the sequence.
///
/// A single element is returned unchanged; an empty sequence yields `0`.
pub fn hcf(numbers: &[u64]) -> u64 {
    match numbers.split_first() {
        None => 0,
        Some((&first, rest)) => rest
            .iter()
            // gcd of two u64 values always fits back into u64
            .fold(first, |acc, &n| gcd(acc as u128, n as u128) as u64),
    }
}

/// Least common multiple of two numbers.
pub fn lcm_pair(a: u128, b: u128) -> Result<u128, MathError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b)).checked_mul(b).ok_or(MathError::Overflow)
}

/// Least common multiple of the sequence, same empty/singleton policy as [`hcf`].
pub fn lcm(numbers: &[u64]) -> Result<u128, MathError> {
    match numbers.split_first() {
        None => Ok(0),
        Some((&first, rest)) => rest
            .iter()
            .try_fold(first as u128, |acc, &n| lcm_pair(acc, n as u128)),
    }
}
