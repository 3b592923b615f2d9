//! Fibonacci sequence generation.

/// Number of terms representable in `u128` (term 187 overflows).
pub const MAX_REPRESENTABLE_TERMS: usize = 187;

/// First `n` terms of the sequence `0, 1, 1, 2, 3, 5, 8, ...`.
///
/// Requests beyond [`MAX_REPRESENTABLE_TERMS`] yield only the representable prefix.
pub fn fibonacci(n: usize) -> Vec<u128> {
    let n = n.min(MAX_REPRESENTABLE_TERMS);
    let mut terms: Vec<u128> = Vec::with_capacity(n);

    for i in 0..n {
        let term = if i < 2 { i as u128 } else { terms[i - 1] + terms[i - 2] };
        terms.push(term);
    }

    terms
}
