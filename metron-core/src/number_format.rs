//! Locale-aware number formatting and parsing
//!
//! `LocaleFormatConfig` is the per-formatter configuration record;
//! `NumberFormat` is a read-only view over it. Rendering goes through
//! `icu_decimal`, so digits, marks and grouping sizes are the locale's
//! CLDR ones (`12,34,567` in en-IN, `١٬٢٣٤` in ar-EG).

use std::str::FromStr;
use fixed_decimal::FixedDecimal;
use icu_decimal::options::{FixedDecimalFormatterOptions, GroupingStrategy};
use icu_decimal::FixedDecimalFormatter;
use serde::{Deserialize, Serialize};
use crate::locale::BIDI_MARKS;
use crate::{DecimalSymbols, Locale, MeasureError, Number, NumberError, RoundingMode};

/// Upper bound on integer digits, matching what a double can hold
pub const DEFAULT_MAX_INTEGER_DIGITS: u32 = 309;

/// Upper bound on fraction digits
pub const MAX_FRACTION_DIGITS: u32 = 340;

/// Default fraction digit cap for freshly created configurations
pub const DEFAULT_MAX_FRACTION_DIGITS: u32 = 3;

/// Default pattern: value, a space, then the unit symbol
pub const DEFAULT_VALUE_AND_UNIT_PATTERN: &str = "{0} {1}";

/// Number rendering options owned by a single formatter.
///
/// Minimum/maximum pairs stay consistent: raising a minimum above the
/// current maximum raises the maximum with it, and lowering a maximum
/// below the minimum lowers the minimum. Integer digit counts are capped
/// at [`DEFAULT_MAX_INTEGER_DIGITS`] and fraction digit counts at
/// [`MAX_FRACTION_DIGITS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleFormatConfig {
    locale: Locale,
    min_integer_digits: u32,
    max_integer_digits: u32,
    min_fraction_digits: u32,
    max_fraction_digits: u32,
    grouping_used: bool,
    parse_integer_only: bool,
    rounding_mode: RoundingMode,
    value_and_unit_pattern: String,
}

impl LocaleFormatConfig {
    /// Defaults for `locale`
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            locale,
            min_integer_digits: 1,
            max_integer_digits: DEFAULT_MAX_INTEGER_DIGITS,
            min_fraction_digits: 0,
            max_fraction_digits: DEFAULT_MAX_FRACTION_DIGITS,
            grouping_used: true,
            parse_integer_only: false,
            rounding_mode: RoundingMode::default(),
            value_and_unit_pattern: DEFAULT_VALUE_AND_UNIT_PATTERN.to_string(),
        }
    }

    /// Defaults for a locale tag such as `"es-ES"`
    pub fn for_tag(tag: &str) -> Result<Self, MeasureError> {
        Ok(Self::for_locale(Locale::from_tag(tag)?))
    }

    // ========== Builders ==========

    pub fn with_min_fraction_digits(mut self, digits: u32) -> Self {
        self.set_min_fraction_digits(digits);
        self
    }

    pub fn with_max_fraction_digits(mut self, digits: u32) -> Self {
        self.set_max_fraction_digits(digits);
        self
    }

    pub fn with_min_integer_digits(mut self, digits: u32) -> Self {
        self.set_min_integer_digits(digits);
        self
    }

    pub fn with_grouping_used(mut self, grouping: bool) -> Self {
        self.grouping_used = grouping;
        self
    }

    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = mode;
        self
    }

    // ========== Accessors ==========

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn symbols(&self) -> DecimalSymbols {
        self.locale.symbols()
    }

    pub fn min_integer_digits(&self) -> u32 {
        self.min_integer_digits
    }

    pub fn set_min_integer_digits(&mut self, digits: u32) {
        let digits = digits.min(DEFAULT_MAX_INTEGER_DIGITS);
        self.min_integer_digits = digits;
        if self.max_integer_digits < digits {
            self.max_integer_digits = digits;
        }
    }

    pub fn max_integer_digits(&self) -> u32 {
        self.max_integer_digits
    }

    pub fn set_max_integer_digits(&mut self, digits: u32) {
        let digits = digits.min(DEFAULT_MAX_INTEGER_DIGITS);
        self.max_integer_digits = digits;
        if self.min_integer_digits > digits {
            self.min_integer_digits = digits;
        }
    }

    pub fn min_fraction_digits(&self) -> u32 {
        self.min_fraction_digits
    }

    pub fn set_min_fraction_digits(&mut self, digits: u32) {
        let digits = digits.min(MAX_FRACTION_DIGITS);
        self.min_fraction_digits = digits;
        if self.max_fraction_digits < digits {
            self.max_fraction_digits = digits;
        }
    }

    pub fn max_fraction_digits(&self) -> u32 {
        self.max_fraction_digits
    }

    pub fn set_max_fraction_digits(&mut self, digits: u32) {
        let digits = digits.min(MAX_FRACTION_DIGITS);
        self.max_fraction_digits = digits;
        if self.min_fraction_digits > digits {
            self.min_fraction_digits = digits;
        }
    }

    pub fn is_grouping_used(&self) -> bool {
        self.grouping_used
    }

    pub fn set_grouping_used(&mut self, grouping: bool) {
        self.grouping_used = grouping;
    }

    pub fn is_parse_integer_only(&self) -> bool {
        self.parse_integer_only
    }

    pub fn set_parse_integer_only(&mut self, integer_only: bool) {
        self.parse_integer_only = integer_only;
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding_mode
    }

    pub fn set_rounding_mode(&mut self, mode: RoundingMode) {
        self.rounding_mode = mode;
    }

    pub fn value_and_unit_pattern(&self) -> &str {
        &self.value_and_unit_pattern
    }

    /// Replace the pattern; it must contain both `{0}` (value) and `{1}`
    /// (unit symbol).
    pub fn set_value_and_unit_pattern(&mut self, pattern: &str) -> Result<(), MeasureError> {
        if pattern.is_empty() {
            return Err(MeasureError::invalid_argument("value and unit pattern is empty"));
        }
        if !pattern.contains("{0}") || !pattern.contains("{1}") {
            return Err(MeasureError::invalid_argument(format!(
                "pattern '{}' must contain both {{0}} and {{1}}", pattern
            )));
        }
        self.value_and_unit_pattern = pattern.to_string();
        Ok(())
    }

    /// Substitute a rendered value and a unit symbol into the pattern
    pub fn apply_pattern(&self, value: &str, symbol: &str) -> String {
        self.value_and_unit_pattern
            .replace("{0}", value)
            .replace("{1}", symbol)
    }

    /// Number formatter view over this configuration
    pub fn number_format(&self) -> NumberFormat<'_> {
        NumberFormat::new(self)
    }
}

impl Default for LocaleFormatConfig {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

/// Renders and reads numbers according to a [`LocaleFormatConfig`]
#[derive(Debug)]
pub struct NumberFormat<'a> {
    config: &'a LocaleFormatConfig,
    formatter: Option<FixedDecimalFormatter>,
    symbols: DecimalSymbols,
}

impl<'a> NumberFormat<'a> {
    pub fn new(config: &'a LocaleFormatConfig) -> Self {
        let mut options = FixedDecimalFormatterOptions::default();
        options.grouping_strategy = if config.grouping_used {
            GroupingStrategy::Auto
        } else {
            GroupingStrategy::Never
        };

        let formatter = match FixedDecimalFormatter::try_new(&config.locale.as_icu().into(), options) {
            Ok(formatter) => Some(formatter),
            Err(err) => {
                tracing::warn!(locale = %config.locale, error = ?err, "no decimal data, rendering plain digits");
                None
            }
        };
        Self { config, formatter, symbols: config.symbols() }
    }

    pub fn symbols(&self) -> DecimalSymbols {
        self.symbols
    }

    /// Render `value` with the configured digits, grouping and rounding
    pub fn format(&self, value: &Number) -> String {
        let config = self.config;
        let mut decimal = match FixedDecimal::from_str(&value.to_plain_string()) {
            Ok(decimal) => decimal,
            Err(err) => {
                tracing::warn!(%value, error = ?err, "value outside decimal range, rendering plain digits");
                return value.as_decimal(config.max_fraction_digits);
            }
        };

        round(&mut decimal, config.rounding_mode, -digit_position(config.max_fraction_digits));

        // Past the maximum, high-order digits are dropped
        let max_integer = digit_position(config.max_integer_digits);
        if integer_len(&decimal) > max_integer as usize {
            decimal.set_max_position(max_integer);
        }
        decimal.trim_start();
        decimal.pad_start(digit_position(config.min_integer_digits));

        decimal.trim_end();
        decimal.pad_end(-digit_position(config.min_fraction_digits));

        let plain = decimal.to_string();
        if plain.starts_with('-') && plain.chars().all(|c| matches!(c, '-' | '0' | '.')) {
            if let Ok(unsigned) = FixedDecimal::from_str(&plain[1..]) {
                decimal = unsigned;
            }
        }

        match &self.formatter {
            Some(formatter) => formatter.format(&decimal).to_string(),
            None => decimal.to_string(),
        }
    }

    /// Render a double through the same rules
    pub fn format_f64(&self, value: f64) -> String {
        self.format(&Number::from_f64(value))
    }

    /// Parse the whole (trimmed) text as a number
    pub fn parse(&self, text: &str) -> Result<Number, NumberError> {
        let text = text.trim();
        match self.parse_prefix(text) {
            Some((value, end)) if end == text.len() => Ok(value),
            _ => Err(NumberError::ParseError(text.to_string())),
        }
    }

    /// Parse the longest numeric prefix of `text`.
    ///
    /// Returns the number and the byte offset just past it. Digits may be
    /// ASCII or the locale's own. Grouping marks are skipped when grouping
    /// is enabled and they sit between digits; a decimal mark is accepted
    /// once, and only when followed by a digit and parse-integer-only is
    /// off. `None` when `text` does not start with a number.
    pub fn parse_prefix(&self, text: &str) -> Option<(Number, usize)> {
        let symbols = self.symbols;
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let digit_at = |i: usize| chars.get(i).map_or(false, |&(_, c)| symbols.is_digit(c));

        let mut i = 0;
        while chars.get(i).map_or(false, |(_, c)| BIDI_MARKS.contains(c)) {
            i += 1;
        }
        let mut negative = false;
        if let Some(&(_, c)) = chars.get(i) {
            if c == symbols.minus || c == '-' {
                negative = true;
                i += 1;
            }
        }

        let mut integer = String::new();
        let mut fraction = String::new();
        let mut in_fraction = false;

        while let Some(&(_, c)) = chars.get(i) {
            if let Some(value) = symbols.digit_value(c) {
                let digit = char::from_digit(value, 10)?;
                if in_fraction {
                    fraction.push(digit);
                } else {
                    integer.push(digit);
                }
            } else if !in_fraction
                && self.config.grouping_used
                && c == symbols.grouping
                && !integer.is_empty()
                && digit_at(i + 1)
            {
                // thousands mark between digits
            } else if !in_fraction
                && !self.config.parse_integer_only
                && c == symbols.decimal
                && digit_at(i + 1)
            {
                in_fraction = true;
            } else {
                break;
            }
            i += 1;
        }

        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        let end = chars.get(i).map(|&(pos, _)| pos).unwrap_or(text.len());
        let literal = format!(
            "{}{}.{}",
            if negative { "-" } else { "" },
            if integer.is_empty() { "0" } else { integer.as_str() },
            if fraction.is_empty() { "0" } else { fraction.as_str() },
        );
        Number::from_str(&literal).ok().map(|n| (n, end))
    }
}

/// Digit count as a `FixedDecimal` magnitude; counts are capped well
/// inside `i16`
fn digit_position(digits: u32) -> i16 {
    digits.min(MAX_FRACTION_DIGITS) as i16
}

fn integer_len(decimal: &FixedDecimal) -> usize {
    let plain = decimal.to_string();
    let unsigned = plain.trim_start_matches('-');
    unsigned.find('.').unwrap_or(unsigned.len())
}

fn round(decimal: &mut FixedDecimal, mode: RoundingMode, position: i16) {
    match mode {
        RoundingMode::Up => decimal.expand(position),
        RoundingMode::Down => decimal.trunc(position),
        RoundingMode::Ceiling => decimal.ceil(position),
        RoundingMode::Floor => decimal.floor(position),
        RoundingMode::HalfUp => decimal.half_expand(position),
        RoundingMode::HalfDown => decimal.half_trunc(position),
        RoundingMode::HalfEven => decimal.half_even(position),
    }
}
