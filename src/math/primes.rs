//! Primality testing by trial division.
//!
//! A u64 prime near `u64::MAX` needs about 2^31 odd divisions, which is
//! seconds of CPU. The `_until` variants poll a cancel flag so a caller that
//! stops waiting also stops the work.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::math::divisors::MathError;

/// Odd divisors tried between cancel-flag polls.
const POLL_INTERVAL: u64 = 1 << 16;

/// Returns true if `n` is prime.
pub fn is_prime(n: u64) -> bool {
    let never = AtomicBool::new(false);
    is_prime_until(n, &never).unwrap_or(false)
}

/// [`is_prime`], abandoned with [`MathError::Cancelled`] once `cancelled` is set.
pub fn is_prime_until(n: u64, cancelled: &AtomicBool) -> Result<bool, MathError> {
    if n <= 1 {
        return Ok(false);
    }
    if n == 2 {
        return Ok(true);
    }
    if n % 2 == 0 {
        return Ok(false);
    }

    // `i <= n / i` is `i * i <= n` without overflowing near u64::MAX
    let mut i = 3u64;
    let mut steps = 0u64;
    while i <= n / i {
        if n % i == 0 {
            return Ok(false);
        }
        i += 2;

        steps += 1;
        if steps % POLL_INTERVAL == 0 && cancelled.load(Ordering::Relaxed) {
            return Err(MathError::Cancelled);
        }
    }

    Ok(true)
}

/// Keep only the primes, preserving order and duplicates.
pub fn filter_primes(numbers: &[u64]) -> Vec<u64> {
    numbers.iter().copied().filter(|&n| is_prime(n)).collect()
}

/// [`filter_primes`], abandoned with [`MathError::Cancelled`] once `cancelled` is set.
pub fn filter_primes_until(numbers: &[u64], cancelled: &AtomicBool) -> Result<Vec<u64>, MathError> {
    let mut primes = Vec::new();
    for &n in numbers {
        if cancelled.load(Ordering::Relaxed) {
            return Err(MathError::Cancelled);
        }
        if is_prime_until(n, cancelled)? {
            primes.push(n);
        }
    }
    Ok(primes)
}
