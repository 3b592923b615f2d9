//! Operation tags and validated requests.

use std::fmt;
use std::str::FromStr;

/// One of the supported request kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fibonacci,
    Prime,
    Lcm,
    Hcf,
    Ai,
}

impl Operation {
    /// All operations in the order their keys are listed to clients.
    pub const ALL: [Operation; 5] = [
        Operation::Fibonacci,
        Operation::Prime,
        Operation::Lcm,
        Operation::Hcf,
        Operation::Ai,
    ];

    /// The JSON key selecting this operation.
    pub fn key(&self) -> &'static str {
        match self {
            Operation::Fibonacci => "fibonacci",
            Operation::Prime => "prime",
            Operation::Lcm => "lcm",
            Operation::Hcf => "hcf",
            Operation::Ai => "AI",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for keys outside the recognized set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation key: {}", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Keys are case-sensitive: `AI` is recognized, `ai` is not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.key() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// A request that passed validation, carrying its typed argument.
///
/// Created once by the validator and consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedRequest {
    /// Number of terms, `0..=100`.
    Fibonacci(usize),
    /// Non-empty, at most 1000 positive integers.
    Prime(Vec<u64>),
    Lcm(Vec<u64>),
    Hcf(Vec<u64>),
    /// Trimmed question, 1 to 500 characters.
    Ai(String),
}

impl ValidatedRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ValidatedRequest::Fibonacci(_) => Operation::Fibonacci,
            ValidatedRequest::Prime(_) => Operation::Prime,
            ValidatedRequest::Lcm(_) => Operation::Lcm,
            ValidatedRequest::Hcf(_) => Operation::Hcf,
            ValidatedRequest::Ai(_) => Operation::Ai,
        }
    }
}
