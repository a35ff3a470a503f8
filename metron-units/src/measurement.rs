//! Measurement type - a value with an associated unit

use std::cmp::Ordering;
use std::fmt;
use serde::{Serialize, Deserialize};
use metron_core::Number;
use crate::convert::{convert, to_base};
use crate::kind::UnitKind;

/// A numeric value tagged with a unit of one quantity kind.
///
/// Every operation comes in two flavours: one that returns a new
/// measurement and leaves `self` alone, and an `_and_update` / in-place
/// one that rewrites `self`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement<U: UnitKind> {
    value: Number,
    unit: U,
}

impl<U: UnitKind> Measurement<U> {
    pub fn new(value: Number, unit: U) -> Self {
        Measurement { value, unit }
    }

    pub fn from_f64(value: f64, unit: U) -> Self {
        Measurement { value: Number::from_f64(value), unit }
    }

    pub fn from_i64(value: i64, unit: U) -> Self {
        Measurement { value: Number::from_i64(value), unit }
    }

    pub fn value(&self) -> &Number {
        &self.value
    }

    pub fn unit(&self) -> U {
        self.unit
    }

    pub fn into_parts(self) -> (Number, U) {
        (self.value, self.unit)
    }

    /// Value expressed in the kind's base unit
    pub fn to_base(&self) -> Number {
        to_base(&self.value, self.unit)
    }

    /// Value expressed in `unit`, without building a measurement
    pub fn value_in(&self, unit: U) -> Number {
        convert(&self.value, self.unit, unit)
    }

    // ========== Conversion ==========

    /// New measurement holding the same amount in `target`
    pub fn convert(&self, target: U) -> Self {
        Measurement::new(self.value_in(target), target)
    }

    /// Rewrite this measurement in `target`
    pub fn convert_and_update(&mut self, target: U) -> &mut Self {
        self.value = self.value_in(target);
        self.unit = target;
        self
    }

    // ========== Arithmetic ==========

    /// Add `other` in place; both operands are converted to `target` first
    pub fn add(&mut self, other: &Self, target: U) -> &mut Self {
        self.value = self.value_in(target).add(&other.value_in(target));
        self.unit = target;
        self
    }

    /// Sum of `self` and `other`, expressed in `target`
    pub fn add_and_return_new(&self, other: &Self, target: U) -> Self {
        Measurement::new(self.value_in(target).add(&other.value_in(target)), target)
    }

    /// Subtract `other` in place, in `target`
    pub fn subtract(&mut self, other: &Self, target: U) -> &mut Self {
        self.value = self.value_in(target).sub(&other.value_in(target));
        self.unit = target;
        self
    }

    /// Difference `self - other`, expressed in `target`
    pub fn subtract_and_return_new(&self, other: &Self, target: U) -> Self {
        Measurement::new(self.value_in(target).sub(&other.value_in(target)), target)
    }

    // ========== Comparison ==========

    /// Equal within `epsilon`, measured in `self`'s unit
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        let diff = self.value.sub(&other.value_in(self.unit)).abs();
        match diff.to_f64() {
            Some(d) => d <= epsilon,
            None => false,
        }
    }
}

impl<U: UnitKind> fmt::Display for Measurement<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

impl<U: UnitKind> PartialEq for Measurement<U> {
    fn eq(&self, other: &Self) -> bool {
        // Compare base values for equality
        self.to_base() == other.to_base()
    }
}

impl<U: UnitKind> PartialOrd for Measurement<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.to_base().cmp(&other.to_base()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{DistanceUnit, TimeUnit};

    fn meters(v: i64) -> Measurement<DistanceUnit> {
        Measurement::from_i64(v, DistanceUnit::Meter)
    }

    #[test]
    fn test_measurement_creation() {
        let m = meters(5);
        assert_eq!(*m.value(), Number::from_i64(5));
        assert_eq!(m.unit(), DistanceUnit::Meter);
    }

    #[test]
    fn test_convert_returns_new() {
        let m = meters(5000);
        let km = m.convert(DistanceUnit::Kilometer);
        assert_eq!(*km.value(), Number::from_i64(5));
        assert_eq!(km.unit(), DistanceUnit::Kilometer);
        // original untouched
        assert_eq!(m.unit(), DistanceUnit::Meter);
        assert_eq!(*m.value(), Number::from_i64(5000));
    }

    #[test]
    fn test_convert_and_update() {
        let mut m = meters(1500);
        m.convert_and_update(DistanceUnit::Kilometer);
        assert_eq!(m.unit(), DistanceUnit::Kilometer);
        assert_eq!(*m.value(), Number::from_str("1.5").unwrap());
    }

    #[test]
    fn test_add_in_place() {
        let mut total = Measurement::from_i64(1, DistanceUnit::Kilometer);
        total.add(&meters(500), DistanceUnit::Kilometer);
        assert_eq!(*total.value(), Number::from_str("1.5").unwrap());

        total.add(&meters(500), DistanceUnit::Meter);
        assert_eq!(*total.value(), Number::from_i64(2000));
        assert_eq!(total.unit(), DistanceUnit::Meter);
    }

    #[test]
    fn test_add_and_return_new() {
        let a = Measurement::from_i64(1, DistanceUnit::Kilometer);
        let sum = a.add_and_return_new(&meters(500), DistanceUnit::Meter);
        assert_eq!(*sum.value(), Number::from_i64(1500));
        assert_eq!(*a.value(), Number::from_i64(1));
    }

    #[test]
    fn test_subtract() {
        let a = Measurement::from_i64(2, TimeUnit::Hour);
        let b = Measurement::from_i64(30, TimeUnit::Minute);
        let diff = a.subtract_and_return_new(&b, TimeUnit::Minute);
        assert_eq!(*diff.value(), Number::from_i64(90));

        let mut c = a.clone();
        c.subtract(&b, TimeUnit::Hour);
        assert_eq!(*c.value(), Number::from_str("1.5").unwrap());
    }

    #[test]
    fn test_equality_across_units() {
        assert_eq!(Measurement::from_i64(1, DistanceUnit::Kilometer), meters(1000));
        assert!(meters(999) < Measurement::from_i64(1, DistanceUnit::Kilometer));
    }

    #[test]
    fn test_approx_eq() {
        let a = Measurement::from_f64(1.0000001, DistanceUnit::Meter);
        let b = Measurement::from_i64(100, DistanceUnit::Centimeter);
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&b, 1e-9));
    }

    #[test]
    fn test_display() {
        let m = Measurement::from_f64(5.5, DistanceUnit::Kilometer);
        assert_eq!(m.to_string(), "5.5 Km");
    }

    #[test]
    fn test_serde_roundtrip() {
        let m = Measurement::from_f64(2.25, TimeUnit::Hour);
        let json = serde_json::to_string(&m).unwrap();
        let back: Measurement<TimeUnit> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit(), TimeUnit::Hour);
        assert_eq!(*back.value(), Number::from_str("2.25").unwrap());
    }
}
