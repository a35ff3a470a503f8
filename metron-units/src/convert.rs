//! Unit conversion through the kind's base unit
//!
//! `value_in_base = value * factor(from)`, `result = value_in_base / factor(to)`.
//! Both factors are exact ratios, so the pivot is folded into a single
//! division and terminating results (5.5 m/s -> 19.8 km/h) come out exact.

use metron_core::Number;
use crate::kind::UnitKind;

/// Convert an arbitrary precision value between two units of one kind.
///
/// Identity conversions return the value untouched.
pub fn convert<U: UnitKind>(value: &Number, from: U, to: U) -> Number {
    if from == to {
        return value.clone();
    }
    let (f, t) = (from.factor(), to.factor());
    let numerator = value
        .mul(&Number::from_i64(f.num))
        .mul(&Number::from_i64(t.den));
    let denominator = Number::from_i64(f.den).mul(&Number::from_i64(t.num));
    match numerator.checked_div(&denominator) {
        Ok(result) => result,
        // catalog factors are never zero
        Err(_) => value.clone(),
    }
}

/// Convert a double between two units of one kind
pub fn convert_f64<U: UnitKind>(value: f64, from: U, to: U) -> f64 {
    if from == to {
        return value;
    }
    let (f, t) = (from.factor(), to.factor());
    value * (f.num as f64 * t.den as f64) / (f.den as f64 * t.num as f64)
}

/// Express `value` (in `unit`) in the base unit
pub fn to_base<U: UnitKind>(value: &Number, unit: U) -> Number {
    convert(value, unit, U::BASE)
}

/// Express a base-unit amount in `unit`
pub fn from_base<U: UnitKind>(value: &Number, unit: U) -> Number {
    convert(value, U::BASE, unit)
}
