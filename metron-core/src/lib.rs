//! Metron Core - numbers, locales and errors
//!
//! This crate provides the core types used by the measurement formatters:
//! - `Number`: Arbitrary precision decimal numbers with exact rounding
//! - `Locale` / `UnitSystem`: BCP 47 locales (via `icu_locid`), their CLDR
//!   number marks and default unit system
//! - `LocaleFormatConfig` / `NumberFormat`: locale-aware number rendering
//!   and parsing
//! - `MeasureError`: the errors every formatter operation returns

mod number;
mod error;
mod locale;
mod number_format;

pub use number::{Number, NumberError, RoundingMode, DecimalDigits};
pub use error::{MeasureError, codes};
pub use locale::{Locale, DecimalSymbols, UnitSystem};
pub use number_format::{
    LocaleFormatConfig, NumberFormat,
    DEFAULT_MAX_FRACTION_DIGITS, DEFAULT_MAX_INTEGER_DIGITS, DEFAULT_VALUE_AND_UNIT_PATTERN,
    MAX_FRACTION_DIGITS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, RoundingMode, Locale, UnitSystem, LocaleFormatConfig, MeasureError};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod number_tests {
        use super::*;

        #[test]
        fn test_from_str_decimal() {
            let n = Number::from_str("3.14").unwrap();
            assert!(!n.is_integer());
            assert!(Number::from_str("1/3").is_err());
        }

        #[test]
        fn test_from_f64_is_shortest_decimal() {
            assert_eq!(Number::from_f64(5.5), Number::from_str("5.5").unwrap());
            assert_eq!(Number::from_f64(0.1), Number::from_str("0.1").unwrap());
            assert_eq!(Number::from_f64(5000000.5), Number::from_str("5000000.5").unwrap());
            assert!(Number::from_f64(f64::NAN).is_zero());
        }

        #[test]
        fn test_from_parts() {
            assert_eq!(Number::from_parts(25, -1), Number::from_str("2.5").unwrap());
            assert_eq!(Number::from_parts(3, 2), Number::from_i64(300));
        }

        #[test]
        fn test_arithmetic() {
            let a = Number::from_i64(10);
            let b = Number::from_i64(4);
            assert_eq!(a.add(&b), Number::from_i64(14));
            assert_eq!(a.sub(&b), Number::from_i64(6));
            assert_eq!(a.mul(&b), Number::from_i64(40));
            assert_eq!(a.checked_div(&b).unwrap(), Number::from_str("2.5").unwrap());
            assert_eq!(a.neg(), Number::from_i64(-10));
        }

        #[test]
        fn test_div_by_zero() {
            let result = Number::from_i64(1).checked_div(&Number::from_i64(0));
            assert!(matches!(result, Err(NumberError::DivisionByZero)));
        }

        #[test]
        fn test_floor_and_abs() {
            let n = Number::from_str("-2.5").unwrap();
            assert_eq!(n.floor(), Number::from_i64(-3));
            assert_eq!(n.abs(), Number::from_str("2.5").unwrap());
            assert!(n.is_negative());
        }

        #[test]
        fn test_round_dp_half_even() {
            let n = Number::from_str("2.345").unwrap();
            assert_eq!(n.round_dp(2, RoundingMode::HalfEven), Number::from_str("2.34").unwrap());
            let n = Number::from_str("2.355").unwrap();
            assert_eq!(n.round_dp(2, RoundingMode::HalfEven), Number::from_str("2.36").unwrap());
        }

        #[test]
        fn test_round_dp_keeps_short_values() {
            let n = Number::from_str("1.5").unwrap();
            assert_eq!(n.round_dp(3, RoundingMode::Up), n);
        }

        #[test]
        fn test_round_dp_directional() {
            let n = Number::from_str("-1.21").unwrap();
            assert_eq!(n.round_dp(1, RoundingMode::Ceiling), Number::from_str("-1.2").unwrap());
            assert_eq!(n.round_dp(1, RoundingMode::Floor), Number::from_str("-1.3").unwrap());
            assert_eq!(n.round_dp(1, RoundingMode::Up), Number::from_str("-1.3").unwrap());
            assert_eq!(n.round_dp(1, RoundingMode::Down), Number::from_str("-1.2").unwrap());
        }

        #[test]
        fn test_to_digits() {
            let d = Number::from_str("1234.5").unwrap().to_digits(2, RoundingMode::HalfEven);
            assert_eq!(d, DecimalDigits { negative: false, integer: "1234".into(), fraction: "50".into() });

            let d = Number::from_str("-0.007").unwrap().to_digits(2, RoundingMode::HalfEven);
            assert_eq!(d, DecimalDigits { negative: true, integer: "0".into(), fraction: "01".into() });

            let d = Number::from_i64(5000).to_digits(0, RoundingMode::HalfEven);
            assert_eq!(d.integer, "5000");
            assert_eq!(d.fraction, "");
        }

        #[test]
        fn test_to_plain_string() {
            assert_eq!(Number::from_str("-0.0254").unwrap().to_plain_string(), "-0.0254");
            assert_eq!(Number::from_parts(3, 2).to_plain_string(), "300");
        }

        #[test]
        fn test_to_f64() {
            assert_eq!(Number::from_str("19.8").unwrap().to_f64(), Some(19.8));
            assert_eq!(Number::from_i64(-7).to_f64(), Some(-7.0));
        }

        #[test]
        fn test_display() {
            assert_eq!(format!("{}", Number::from_str("5.5").unwrap()), "5.5");
            assert_eq!(format!("{}", Number::from_i64(3)), "3");
        }
    }

    mod locale_tests {
        use super::*;

        #[test]
        fn test_parse_tag() {
            let l = Locale::from_tag("es_es").unwrap();
            assert_eq!(l.language(), "es");
            assert_eq!(l.region(), Some("ES"));
            assert_eq!(l.tag(), "es-ES");
        }

        #[test]
        fn test_invalid_tags() {
            assert!(matches!(Locale::from_tag(""), Err(MeasureError::InvalidArgument(_))));
            assert!(Locale::from_tag("e").is_err());
            assert!(Locale::from_tag("es-ESP").is_err());
            assert!(Locale::from_tag("es-ES-x").is_err());
            assert!(Locale::from_tag("not a tag").is_err());
        }

        #[test]
        fn test_script_and_region() {
            let l = Locale::from_tag("sr-Latn-RS").unwrap();
            assert_eq!(l.language(), "sr");
            assert_eq!(l.script(), Some("Latn"));
            assert_eq!(l.region(), Some("RS"));
            assert_eq!(l.tag(), "sr-Latn-RS");
        }

        #[test]
        fn test_symbols() {
            let es = Locale::from_tag("es-ES").unwrap().symbols();
            assert_eq!((es.decimal, es.grouping, es.zero), (',', '.', '0'));
            let en = Locale::en_us().symbols();
            assert_eq!((en.decimal, en.grouping, en.minus), ('.', ',', '-'));
            let at = Locale::from_tag("de-AT").unwrap().symbols();
            assert_eq!(at.grouping, '\u{a0}');

            let ar = Locale::from_tag("ar-EG").unwrap().symbols();
            assert_eq!((ar.decimal, ar.grouping, ar.zero), ('٫', '٬', '٠'));
            assert_eq!(ar.digit_value('٧'), Some(7));
            assert_eq!(ar.digit_value('7'), Some(7));
            assert_eq!(ar.digit_value('x'), None);
        }

        #[test]
        fn test_default_unit_system() {
            assert_eq!(Locale::en_us().default_unit_system(), UnitSystem::Imperial);
            assert_eq!(Locale::from_tag("en-GB").unwrap().default_unit_system(), UnitSystem::Metric);
            assert_eq!(Locale::from_tag("es-ES").unwrap().default_unit_system(), UnitSystem::Metric);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_codes() {
            assert_eq!(MeasureError::parse_error("x").code(), codes::PARSE_ERROR);
            assert_eq!(MeasureError::unknown_unit("5 zz").code(), codes::UNKNOWN_UNIT);
            assert_eq!(MeasureError::missing_required("formatter").code(), codes::MISSING_REQUIRED);
            assert_eq!(MeasureError::invalid_argument("locale").code(), codes::INVALID_ARGUMENT);
        }

        #[test]
        fn test_from_number_error() {
            let err: MeasureError = NumberError::ParseError("abc".into()).into();
            assert!(matches!(err, MeasureError::ParseError(_)));
            let err: MeasureError = NumberError::DivisionByZero.into();
            assert_eq!(err.code(), codes::INVALID_ARGUMENT);
        }

        #[test]
        fn test_display() {
            let err = MeasureError::unknown_unit("5 zz");
            assert_eq!(err.to_string(), "Unknown unit in '5 zz'");
        }
    }
}
