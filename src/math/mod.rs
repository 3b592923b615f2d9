//! Deterministic math operations.
//!
//! # Data Flow
//! ```text
//! ValidatedRequest (positive / non-negative integers only)
//!     → sequence.rs (fibonacci)
//!     → primes.rs (primality filter)
//!     → divisors.rs (gcd / hcf / lcm reduction)
//!     → Payload
//! ```
//!
//! # Design Decisions
//! - Pure functions, no I/O, no shared state
//! - Inputs are trusted to satisfy the validator contract; the failure
//!   modes are LCM overflow past `u128` and cancellation of a primality scan
//! - Trial division is the only unbounded loop, so it polls a cancel flag
//! - Empty reductions return the sentinel `0` instead of an error

pub mod divisors;
pub mod primes;
pub mod sequence;

pub use divisors::{gcd, hcf, lcm, lcm_pair, MathError};
pub use primes::{filter_primes, filter_primes_until, is_prime, is_prime_until};
pub use sequence::fibonacci;
