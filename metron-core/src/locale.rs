//! Locales, their number symbols and their default unit system
//!
//! Tags are parsed by `icu_locid`. Digits and marks are read from the
//! CLDR data compiled into `icu_decimal`, so they always agree with what
//! [`crate::NumberFormat`] renders.

use std::fmt;
use std::str::FromStr;
use fixed_decimal::FixedDecimal;
use icu_decimal::options::{FixedDecimalFormatterOptions, GroupingStrategy};
use icu_decimal::FixedDecimalFormatter;
use serde::{Deserialize, Serialize};
use crate::MeasureError;

/// Bidi controls some locales put around the sign (ALM, LRM, RLM)
pub(crate) const BIDI_MARKS: [char; 3] = ['\u{061C}', '\u{200E}', '\u{200F}'];

/// Negative, grouped and fractional: every mark shows up once rendered
const SYMBOL_SAMPLE: &str = "-1234567.5";

/// Measurement system a unit (or a locale's preference) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "METRIC"),
            UnitSystem::Imperial => write!(f, "IMPERIAL"),
        }
    }
}

/// A BCP 47 locale such as `es-ES`, `en` or `sr-Latn-RS`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    inner: icu_locid::Locale,
}

impl Locale {
    /// Parse a tag like `"es-ES"`, `"en_US"` or `"sr-Latn-RS"`.
    ///
    /// Anything `icu_locid` rejects (including an empty tag) is an
    /// `InvalidArgument`.
    pub fn from_tag(tag: &str) -> Result<Self, MeasureError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(MeasureError::invalid_argument("locale tag is empty"));
        }

        let inner = icu_locid::Locale::from_str(&tag.replace('_', "-")).map_err(|err| {
            MeasureError::invalid_argument(format!("invalid locale tag '{}': {}", tag, err))
        })?;
        Ok(Self { inner })
    }

    /// `en-US`, used when a caller has no preference
    pub fn en_us() -> Self {
        Self { inner: icu_locid::locale!("en-US") }
    }

    pub fn language(&self) -> &str {
        self.inner.id.language.as_str()
    }

    pub fn script(&self) -> Option<&str> {
        self.inner.id.script.as_ref().map(|script| script.as_str())
    }

    pub fn region(&self) -> Option<&str> {
        self.inner.id.region.as_ref().map(|region| region.as_str())
    }

    /// Canonical BCP 47 tag, e.g. `es-ES`
    pub fn tag(&self) -> String {
        self.inner.to_string()
    }

    pub(crate) fn as_icu(&self) -> &icu_locid::Locale {
        &self.inner
    }

    /// Digits and marks this locale renders numbers with.
    ///
    /// Read off a CLDR rendering of a sample number; a locale without
    /// decimal data falls back to ASCII marks.
    pub fn symbols(&self) -> DecimalSymbols {
        match self.rendered_symbols() {
            Some(symbols) => symbols,
            None => {
                tracing::warn!(locale = %self, "no decimal symbols for locale, using ASCII marks");
                DecimalSymbols::default()
            }
        }
    }

    fn rendered_symbols(&self) -> Option<DecimalSymbols> {
        let mut options = FixedDecimalFormatterOptions::default();
        options.grouping_strategy = GroupingStrategy::Always;
        let formatter = FixedDecimalFormatter::try_new(&self.as_icu().into(), options).ok()?;
        let render = |value: &FixedDecimal| -> Vec<char> {
            formatter
                .format(value)
                .to_string()
                .chars()
                .filter(|c| !BIDI_MARKS.contains(c))
                .collect()
        };

        let zero = *render(&FixedDecimal::from(0u32)).first()?;
        let is_digit = |c: char| (c as u32).wrapping_sub(zero as u32) < 10;

        let sample = render(&FixedDecimal::from_str(SYMBOL_SAMPLE).ok()?);
        let first_digit = sample.iter().position(|&c| is_digit(c))?;
        let minus = *sample[..first_digit].last()?;
        let grouping = *sample[first_digit..].iter().find(|&&c| !is_digit(c))?;
        let decimal = *sample[first_digit..].iter().rev().find(|&&c| !is_digit(c))?;

        Some(DecimalSymbols { decimal, grouping, minus, zero })
    }

    /// Unit system used when the caller does not ask for one.
    ///
    /// Only the United States, Liberia and Myanmar default to imperial.
    pub fn default_unit_system(&self) -> UnitSystem {
        match self.region() {
            Some("US") | Some("LR") | Some("MM") => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl Serialize for Locale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_tag(&s).map_err(serde::de::Error::custom)
    }
}

/// Locale-specific marks used when rendering and reading numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSymbols {
    pub decimal: char,
    pub grouping: char,
    pub minus: char,
    /// Zero of the locale's numbering system; one through nine follow it
    pub zero: char,
}

impl DecimalSymbols {
    /// Value of an ASCII or native digit
    pub fn digit_value(&self, c: char) -> Option<u32> {
        c.to_digit(10).or_else(|| {
            let offset = (c as u32).wrapping_sub(self.zero as u32);
            (offset < 10).then_some(offset)
        })
    }

    pub fn is_digit(&self, c: char) -> bool {
        self.digit_value(c).is_some()
    }
}

impl Default for DecimalSymbols {
    fn default() -> Self {
        Self { decimal: '.', grouping: ',', minus: '-', zero: '0' }
    }
}
