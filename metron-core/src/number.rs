//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for base-10 arbitrary precision arithmetic,
//! so decimal factors like 0.0254 or 0.000001 stay exact and rounding
//! to a number of fraction digits happens on the real decimal digits.

use dashu_float::DBig;
use dashu_float::ops::Abs;
use dashu_int::IBig;
use dashu_int::ops::BitTest;
use serde::{Deserialize, Serialize, Serializer, Deserializer};
use std::cmp::Ordering;
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// Default precision for calculations (decimal digits)
const DEFAULT_PRECISION: usize = 50;

/// How to round away digits beyond the requested fraction digits.
///
/// The variants follow the classic decimal-formatter set; `HalfEven` is
/// the default used by [`crate::LocaleFormatConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Towards zero (truncate)
    Down,
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties towards zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    #[default]
    HalfEven,
}

impl RoundingMode {
    /// Decide whether a truncated magnitude must be bumped by one unit.
    ///
    /// `remainder` is the discarded part of the magnitude, expressed in
    /// the same scale as `divisor` (so `0 <= remainder < divisor`).
    fn rounds_away(self, negative: bool, quotient: &IBig, remainder: &IBig, divisor: &IBig) -> bool {
        if *remainder == IBig::ZERO {
            return false;
        }
        match self {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => !negative,
            RoundingMode::Floor => negative,
            RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
                let twice = remainder * IBig::from(2u8);
                match twice.cmp(divisor) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => match self {
                        RoundingMode::HalfUp => true,
                        RoundingMode::HalfDown => false,
                        _ => quotient.bit(0),
                    },
                }
            }
        }
    }
}

/// Sign and plain decimal digits of a rounded number.
///
/// `integer` never has leading zeros (it is `"0"` for values below one);
/// `fraction` holds exactly the requested number of digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalDigits {
    pub negative: bool,
    pub integer: String,
    pub fraction: String,
}

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. All operations return Results or new
/// Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(DEFAULT_PRECISION).value()
    }

    /// Create from a decimal string such as "3.14" or "-42"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        let inner: DBig = s.parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create from `significand * 10^exponent` without rounding
    pub fn from_parts(significand: i64, exponent: isize) -> Self {
        let result = DBig::from_parts(IBig::from(significand), exponent);
        Self { inner: Self::with_work_precision(result) }
    }

    /// Create from ratio (single rounded division)
    pub fn from_ratio(num: i64, den: i64) -> Self {
        if den == 0 {
            return Self { inner: DBig::ZERO };
        }
        let n = Self::with_work_precision(DBig::from(num));
        let d = Self::with_work_precision(DBig::from(den));
        Self { inner: n / d }
    }

    /// Create from f64
    ///
    /// Goes through the shortest round-tripping decimal rendering, so
    /// `5.5` becomes exactly 5.5 rather than its binary expansion.
    /// NaN and infinities map to zero.
    pub fn from_f64(f: f64) -> Self {
        if f.is_nan() || f.is_infinite() {
            return Self { inner: DBig::ZERO };
        }
        Self::from_str(&format!("{}", f)).unwrap_or(Self { inner: DBig::ZERO })
    }

    // ========== Predicates ==========

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    /// Check if value is an integer
    pub fn is_integer(&self) -> bool {
        let floor_val = self.inner.clone().floor();
        self.inner == floor_val
    }

    // ========== Basic Arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    /// Negation
    pub fn neg(&self) -> Self {
        Self { inner: -self.inner.clone() }
    }

    // ========== Other Operations ==========

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    /// Floor - largest integer <= x
    pub fn floor(&self) -> Self {
        Self { inner: self.inner.clone().floor() }
    }

    /// Round to `places` fraction digits using `mode`.
    ///
    /// Works on the exact base-10 representation: a value that already has
    /// no more than `places` fraction digits is returned unchanged.
    pub fn round_dp(&self, places: u32, mode: RoundingMode) -> Self {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let target = -(places as isize);
        if exponent >= target {
            return self.clone();
        }

        let negative = significand < IBig::ZERO;
        let magnitude = if negative { -significand } else { significand };
        let divisor = IBig::from(10u8).pow((target - exponent) as usize);
        let quotient = &magnitude / &divisor;
        let remainder = &magnitude - &quotient * &divisor;

        let quotient = if mode.rounds_away(negative, &quotient, &remainder, &divisor) {
            quotient + IBig::ONE
        } else {
            quotient
        };
        let significand = if negative { -quotient } else { quotient };

        Self { inner: Self::with_work_precision(DBig::from_parts(significand, target)) }
    }

    /// Round to `places` fraction digits and split into sign, integer
    /// digits and exactly `places` fraction digits.
    pub fn to_digits(&self, places: u32, mode: RoundingMode) -> DecimalDigits {
        let rounded = self.round_dp(places, mode);
        let (significand, exponent) = rounded.inner.into_repr().into_parts();

        let negative = significand < IBig::ZERO;
        let magnitude = if negative { -significand } else { significand };
        let is_zero = magnitude == IBig::ZERO;

        let mut digits = magnitude.to_string();
        let scale = if exponent >= 0 {
            digits.push_str(&"0".repeat(exponent as usize));
            0
        } else {
            (-exponent) as usize
        };
        if digits.len() <= scale {
            digits = format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits);
        }

        let (integer, fraction) = digits.split_at(digits.len() - scale);
        let mut fraction = fraction.to_string();
        while fraction.len() < places as usize {
            fraction.push('0');
        }
        fraction.truncate(places as usize);

        let integer = integer.trim_start_matches('0');
        DecimalDigits {
            negative: negative && !is_zero,
            integer: if integer.is_empty() { "0".to_string() } else { integer.to_string() },
            fraction,
        }
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> Option<f64> {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();

        let sig_f64: f64 = if significand.bit_len() <= 53 {
            let small: i64 = significand.try_into().ok()?;
            small as f64
        } else {
            // Significand too large - shift to 53 bits, then scale back up
            let is_neg = significand < IBig::ZERO;
            let abs_sig = if is_neg { -significand } else { significand };
            let extra_bits = abs_sig.bit_len() - 53;
            let shifted: i64 = (&abs_sig >> extra_bits).try_into().ok()?;
            let base = shifted as f64 * 2_f64.powi(extra_bits as i32);
            if is_neg { -base } else { base }
        };

        let result = if exponent == 0 {
            sig_f64
        } else if exponent > 0 && exponent <= 308 {
            sig_f64 * 10_f64.powi(exponent as i32)
        } else if exponent < 0 && exponent >= -308 {
            sig_f64 / 10_f64.powi((-exponent) as i32)
        } else {
            return None;
        };

        if result.is_finite() {
            Some(result)
        } else {
            None
        }
    }

    // ========== Display ==========

    /// Exact plain decimal text, e.g. `"-0.0254"` or `"300"`
    pub fn to_plain_string(&self) -> String {
        let exponent = self.inner.repr().exponent();
        let places = if exponent < 0 { (-exponent) as u32 } else { 0 };
        let digits = self.to_digits(places, RoundingMode::HalfEven);
        let sign = if digits.negative { "-" } else { "" };
        if digits.fraction.is_empty() {
            format!("{}{}", sign, digits.integer)
        } else {
            format!("{}{}.{}", sign, digits.integer, digits.fraction)
        }
    }

    /// Render as plain decimal string with at most `places` fraction digits
    /// (half-even, trailing zeros removed)
    pub fn as_decimal(&self, places: u32) -> String {
        let digits = self.to_digits(places, RoundingMode::HalfEven);
        let fraction = digits.fraction.trim_end_matches('0');
        let sign = if digits.negative { "-" } else { "" };
        if fraction.is_empty() {
            format!("{}{}", sign, digits.integer)
        } else {
            format!("{}{}.{}", sign, digits.integer, fraction)
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal(10))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Self::from_f64(f)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_decimal(DEFAULT_PRECISION as u32))
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(Ordering::Equal)
    }
}
