//! Request body validation.
//!
//! # Responsibilities
//! - Reject bodies that are not JSON objects
//! - Select exactly one recognized operation key, ignoring unknown keys
//! - Type and range check the argument for that operation
//!
//! # Design Decisions
//! - Pure function of the parsed value, no side effects
//! - Checks short-circuit on the first failure
//! - Integral floats (`10.0`) count as integers
//! - Question length is measured in UTF-16 code units, the unit browser
//!   clients count in

use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::operation::{Operation, ValidatedRequest};

/// Largest accepted fibonacci term count.
pub const MAX_FIBONACCI: u64 = 100;

/// Largest accepted array length for prime / lcm / hcf.
pub const MAX_ARRAY_LENGTH: usize = 1000;

/// Largest accepted AI question length, in UTF-16 code units, after trimming.
pub const MAX_AI_QUESTION_LENGTH: usize = 500;

// 2^64 as f64; integral floats at or above this do not fit in u64
const U64_LIMIT_F64: f64 = 18_446_744_073_709_551_616.0;

/// Validate a parsed request body.
pub fn validate(body: &Value) -> ApiResult<ValidatedRequest> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::malformed("Request body is required"))?;

    let mut recognized = object
        .iter()
        .filter_map(|(key, value)| key.parse::<Operation>().ok().map(|op| (op, value)));

    let (operation, value) = match (recognized.next(), recognized.next()) {
        (None, _) => return Err(ApiError::selection(missing_key_message())),
        (Some(_), Some(_)) => {
            return Err(ApiError::selection("Request must contain exactly one key"))
        }
        (Some(found), None) => found,
    };

    match operation {
        Operation::Fibonacci => validate_fibonacci(value),
        Operation::Prime => validate_integer_array(value, operation).map(ValidatedRequest::Prime),
        Operation::Lcm => validate_integer_array(value, operation).map(ValidatedRequest::Lcm),
        Operation::Hcf => validate_integer_array(value, operation).map(ValidatedRequest::Hcf),
        Operation::Ai => validate_question(value),
    }
}

fn missing_key_message() -> String {
    let keys: Vec<&str> = Operation::ALL.iter().map(Operation::key).collect();
    format!("Request must contain exactly one of: {}", keys.join(", "))
}

/// Whole number carried by a JSON number, if it is one.
///
/// Floats qualify when finite with no fractional part. Negative values and
/// magnitudes beyond `u64` return `None`.
fn whole_number(value: &Value) -> Option<WholeNumber> {
    if let Some(n) = value.as_u64() {
        return Some(WholeNumber::Fits(n));
    }
    // negative integer literals also land here and fail the sign check
    let f = value.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 || f < 0.0 {
        return None;
    }
    if f >= U64_LIMIT_F64 {
        Some(WholeNumber::Huge)
    } else {
        Some(WholeNumber::Fits(f as u64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WholeNumber {
    Fits(u64),
    Huge,
}

fn validate_fibonacci(value: &Value) -> ApiResult<ValidatedRequest> {
    let n = whole_number(value)
        .ok_or_else(|| ApiError::argument("fibonacci requires a non-negative integer"))?;

    match n {
        WholeNumber::Fits(n) if n <= MAX_FIBONACCI => Ok(ValidatedRequest::Fibonacci(n as usize)),
        _ => Err(ApiError::argument(format!(
            "fibonacci input too large, max is {}",
            MAX_FIBONACCI
        ))),
    }
}

fn validate_integer_array(value: &Value, operation: Operation) -> ApiResult<Vec<u64>> {
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(ApiError::argument(format!(
                "{} requires a non-empty array of integers",
                operation
            )))
        }
    };

    if items.len() > MAX_ARRAY_LENGTH {
        return Err(ApiError::argument(format!(
            "Array too large, max {} elements",
            MAX_ARRAY_LENGTH
        )));
    }

    items
        .iter()
        .map(|item| match whole_number(item) {
            Some(WholeNumber::Fits(n)) if n > 0 => Ok(n),
            Some(WholeNumber::Huge) => Err(ApiError::argument(format!(
                "Array elements must not exceed {}",
                u64::MAX
            ))),
            _ => Err(ApiError::argument("Array must contain only positive integers")),
        })
        .collect()
}

fn validate_question(value: &Value) -> ApiResult<ValidatedRequest> {
    let question = value
        .as_str()
        .ok_or_else(|| ApiError::argument("AI requires a question string"))?
        .trim();

    if question.is_empty() {
        return Err(ApiError::argument("AI question cannot be empty"));
    }

    if question.encode_utf16().count() > MAX_AI_QUESTION_LENGTH {
        return Err(ApiError::argument(format!(
            "AI question too long, max {} characters",
            MAX_AI_QUESTION_LENGTH
        )));
    }

    Ok(ValidatedRequest::Ai(question.to_string()))
}
