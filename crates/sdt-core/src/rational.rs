//! Exact non-negative rational numbers used for randomization weights.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SdtError};

/// Reduced denominators at or above this value are displayed as decimals.
pub const LARGE_DENOMINATOR: u64 = 1000;

/// Non-negative fraction stored in lowest terms with a positive denominator.
///
/// Equality is structural, which coincides with numeric equality because
/// every constructor reduces. Arithmetic is checked and never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RatioRepr", into = "RatioRepr")]
pub struct Ratio {
    numerator: u64,
    denominator: u64,
}

#[derive(Serialize, Deserialize)]
struct RatioRepr {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RatioRepr> for Ratio {
    type Error = SdtError;

    fn try_from(repr: RatioRepr) -> Result<Self, Self::Error> {
        Ratio::new(repr.numerator, repr.denominator)
    }
}

impl From<Ratio> for RatioRepr {
    fn from(value: Ratio) -> Self {
        Self {
            numerator: value.numerator,
            denominator: value.denominator,
        }
    }
}

fn ratio_error(code: &str, message: impl Into<String>, input: &str) -> SdtError {
    SdtError::Validation(ErrorInfo::new(code, message).with_context("input", input))
}

impl Ratio {
    /// Zero.
    pub const ZERO: Ratio = Ratio {
        numerator: 0,
        denominator: 1,
    };

    /// One.
    pub const ONE: Ratio = Ratio {
        numerator: 1,
        denominator: 1,
    };

    /// Creates and normalizes a ratio.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, SdtError> {
        if denominator == 0 {
            return Err(SdtError::Validation(
                ErrorInfo::new("ratio-zero-denominator", "denominator must be positive")
                    .with_context("numerator", numerator.to_string()),
            ));
        }
        let gcd = gcd_u64(numerator, denominator);
        Ok(Self {
            numerator: numerator / gcd,
            denominator: denominator / gcd,
        })
    }

    /// Returns `1/count`, the uniform weight over `count` levels.
    pub fn uniform(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(Self {
            numerator: 1,
            denominator: count as u64,
        })
    }

    /// Reduced numerator.
    pub const fn numerator(self) -> u64 {
        self.numerator
    }

    /// Reduced denominator (always > 0).
    pub const fn denominator(self) -> u64 {
        self.denominator
    }

    /// True for exactly zero.
    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    /// True for exactly one.
    pub fn is_one(self) -> bool {
        self.numerator == 1 && self.denominator == 1
    }

    /// Exact addition; `None` when the reduced result does not fit in `u64`.
    pub fn checked_add(self, other: Ratio) -> Option<Ratio> {
        let gcd = gcd_u128(self.denominator as u128, other.denominator as u128);
        let lcm = (self.denominator as u128 / gcd).checked_mul(other.denominator as u128)?;
        let left = (self.numerator as u128).checked_mul(lcm / self.denominator as u128)?;
        let right = (other.numerator as u128).checked_mul(lcm / other.denominator as u128)?;
        reduce_u128(left.checked_add(right)?, lcm)
    }

    /// Exact sum of a sequence; `None` on overflow.
    pub fn checked_sum<I>(values: I) -> Option<Ratio>
    where
        I: IntoIterator<Item = Ratio>,
    {
        values
            .into_iter()
            .try_fold(Ratio::ZERO, |acc, value| acc.checked_add(value))
    }

    /// Nearest binary floating point approximation.
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Readable rendering: `n/d`, or a decimal once the denominator is large.
    pub fn display_compact(self) -> String {
        if self.denominator >= LARGE_DENOMINATOR {
            format!("{}", self.to_f64())
        } else {
            self.to_string()
        }
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::ZERO
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = self.numerator as u128 * other.denominator as u128;
        let right = other.numerator as u128 * self.denominator as u128;
        left.cmp(&right)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Ratio {
    type Err = SdtError;

    /// Parses `3`, `0.25`, `.5`, `2.5e-1` or `1/3`, with optional sign and
    /// surrounding whitespace. Negative non-zero values are rejected.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ratio_error("ratio-parse", "empty number", text));
        }
        let (negative, body) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (numerator, denominator) = match body.split_once('/') {
            Some((num, den)) => {
                let num = parse_integer(num.trim())
                    .ok_or_else(|| ratio_error("ratio-parse", "invalid numerator", text))?;
                let den = parse_integer(den.trim())
                    .ok_or_else(|| ratio_error("ratio-parse", "invalid denominator", text))?;
                if den == 0 {
                    return Err(ratio_error(
                        "ratio-zero-denominator",
                        "denominator must be positive",
                        text,
                    ));
                }
                (num, den)
            }
            None => parse_decimal(body).ok_or_else(|| {
                ratio_error("ratio-parse", "not a decimal or fraction", text)
            })?,
        };
        if negative && numerator != 0 {
            return Err(ratio_error(
                "ratio-negative",
                "negative values are not allowed",
                text,
            ));
        }
        reduce_u128(numerator, denominator)
            .ok_or_else(|| ratio_error("ratio-overflow", "value is too precise to store", text))
    }
}

fn parse_integer(digits: &str) -> Option<u128> {
    if digits.is_empty() {
        return None;
    }
    digits.bytes().try_fold(0u128, |acc, byte| {
        if !byte.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u128::from(byte - b'0'))
    })
}

fn pow10(exponent: u32) -> Option<u128> {
    10u128.checked_pow(exponent)
}

fn parse_decimal(text: &str) -> Option<(u128, u128)> {
    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => {
            let raw = &text[idx + 1..];
            let (negative, digits) = match raw.as_bytes().first() {
                Some(b'-') => (true, &raw[1..]),
                Some(b'+') => (false, &raw[1..]),
                _ => (false, raw),
            };
            let magnitude = i64::try_from(parse_integer(digits)?).ok()?;
            (&text[..idx], if negative { -magnitude } else { magnitude })
        }
        None => (text, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut numerator = if int_part.is_empty() {
        0
    } else {
        parse_integer(int_part)?
    };
    if !frac_part.is_empty() {
        let scale = pow10(u32::try_from(frac_part.len()).ok()?)?;
        numerator = numerator
            .checked_mul(scale)?
            .checked_add(parse_integer(frac_part)?)?;
    }
    let frac_digits = i64::try_from(frac_part.len()).ok()?;
    let shift = exponent.checked_sub(frac_digits)?;
    if shift >= 0 {
        let scale = pow10(u32::try_from(shift).ok()?)?;
        Some((numerator.checked_mul(scale)?, 1))
    } else {
        let scale = pow10(u32::try_from(-shift).ok()?)?;
        Some((numerator, scale))
    }
}

fn reduce_u128(numerator: u128, denominator: u128) -> Option<Ratio> {
    let gcd = gcd_u128(numerator, denominator);
    Some(Ratio {
        numerator: u64::try_from(numerator / gcd).ok()?,
        denominator: u64::try_from(denominator / gcd).ok()?,
    })
}

fn gcd_u64(mut left: u64, mut right: u64) -> u64 {
    while right != 0 {
        let rem = left % right;
        left = right;
        right = rem;
    }
    left.max(1)
}

fn gcd_u128(mut left: u128, mut right: u128) -> u128 {
    while right != 0 {
        let rem = left % right;
        left = right;
        right = rem;
    }
    left.max(1)
}
