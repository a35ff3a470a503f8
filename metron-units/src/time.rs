//! Composite time formatting
//!
//! Durations rendered as several components walking the cascade
//! `century > year > month > week > day > hour > minute > second >
//! millisecond > microsecond > nanosecond`, plus clock style `HH:MM` and
//! `HH:MM:SS` renderings. Everything here is an inherent extension of the
//! time formatter and only reads its configuration.

use std::sync::OnceLock;
use regex::Regex;
use serde::{Serialize, Deserialize};
use metron_core::{LocaleFormatConfig, MeasureError, Number, DEFAULT_MAX_INTEGER_DIGITS};
use crate::convert::{from_base, to_base};
use crate::format::MeasureFormatter;
use crate::kind::UnitKind;
use crate::measurement::Measurement;
use crate::units::TimeUnit;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;
const CENTURY_SUFFIX: &str = "c.";

/// Coarsest to finest
static CASCADE: [TimeUnit; 11] = [
    TimeUnit::Century,
    TimeUnit::Year,
    TimeUnit::Month,
    TimeUnit::Week,
    TimeUnit::Day,
    TimeUnit::Hour,
    TimeUnit::Minute,
    TimeUnit::Second,
    TimeUnit::Millisecond,
    TimeUnit::Microsecond,
    TimeUnit::Nanosecond,
];

static DATE_STANDARD: [TimeUnit; 3] = [TimeUnit::Year, TimeUnit::Month, TimeUnit::Day];

/// Which band of the cascade a composite rendering covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeFormatMode {
    All,
    Centuries,
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
    /// Hour down to nanosecond
    TimeAll,
    /// Hour, minute and second
    TimeStandard,
    /// Century down to day
    DateAll,
    /// Year, month and day
    DateStandard,
}

impl CompositeFormatMode {
    /// Units rendered by this mode, coarsest first
    pub fn units(self) -> &'static [TimeUnit] {
        match self {
            CompositeFormatMode::All => &CASCADE,
            CompositeFormatMode::Centuries => &CASCADE[0..1],
            CompositeFormatMode::Years => &CASCADE[1..2],
            CompositeFormatMode::Months => &CASCADE[2..3],
            CompositeFormatMode::Weeks => &CASCADE[3..4],
            CompositeFormatMode::Days => &CASCADE[4..5],
            CompositeFormatMode::Hours => &CASCADE[5..6],
            CompositeFormatMode::Minutes => &CASCADE[6..7],
            CompositeFormatMode::Seconds => &CASCADE[7..8],
            CompositeFormatMode::Milliseconds => &CASCADE[8..9],
            CompositeFormatMode::Microseconds => &CASCADE[9..10],
            CompositeFormatMode::Nanoseconds => &CASCADE[10..11],
            CompositeFormatMode::TimeAll => &CASCADE[5..11],
            CompositeFormatMode::TimeStandard => &CASCADE[5..8],
            CompositeFormatMode::DateAll => &CASCADE[0..5],
            CompositeFormatMode::DateStandard => &DATE_STANDARD,
        }
    }

    pub fn is_single_unit(self) -> bool {
        self.units().len() == 1
    }
}

/// English ordinal suffix used for centuries: 1st, 2nd, 3rd, 4th...
///
/// Zero takes "st" and there is no teens rule, so 11 and 21 read "11th"
/// and "21th".
fn ordinal_suffix(n: &Number) -> &'static str {
    if *n <= Number::from_i64(1) {
        "st"
    } else if *n == Number::from_i64(2) {
        "nd"
    } else if *n == Number::from_i64(3) {
        "rd"
    } else {
        "th"
    }
}

fn hour_minute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-)?([0-9]+):([0-9]{2})$").expect("valid clock pattern")
    })
}

fn hour_minute_second_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-)?([0-9]+):([0-9]{2}):([0-9]{2})$").expect("valid clock pattern")
    })
}

/// One rendered component of a composite duration
struct Component {
    unit: TimeUnit,
    amount: Number,
    is_zero: bool,
}

impl MeasureFormatter<TimeUnit> {
    // ========== Composite formatting ==========

    /// Render `time` across the units of `mode`, zero components included
    pub fn format_multiple(&self, time: &Measurement<TimeUnit>, mode: CompositeFormatMode) -> String {
        self.format_multiple_with(time, mode, true)
    }

    /// Render `time` across the units of `mode`.
    ///
    /// Every level but the finest takes the whole count that fits and
    /// passes the remainder down; the finest level shows what is left as a
    /// locale number, possibly fractional. The first component is always
    /// shown and trailing zero components never are; `include_zero_components`
    /// decides about zeros in between. A leading century renders as an
    /// English ordinal, e.g. `"3rd c."`.
    pub fn format_multiple_with(
        &self,
        time: &Measurement<TimeUnit>,
        mode: CompositeFormatMode,
        include_zero_components: bool,
    ) -> String {
        let units = mode.units();
        let total = time.to_base();
        let negative = total.is_negative();
        let mut remaining = total.abs();

        let mut components = Vec::with_capacity(units.len());
        for (i, &unit) in units.iter().enumerate() {
            let amount = from_base(&remaining, unit);
            if i + 1 == units.len() {
                let shown = amount.round_dp(self.max_fraction_digits(), self.rounding_mode());
                components.push(Component { unit, is_zero: shown.is_zero(), amount });
            } else {
                let count = amount.floor();
                remaining = remaining.sub(&to_base(&count, unit));
                components.push(Component { unit, is_zero: count.is_zero(), amount: count });
            }
        }

        let last_shown = components.iter().rposition(|c| !c.is_zero).unwrap_or(0);
        let rendered: Vec<String> = components[..=last_shown]
            .iter()
            .enumerate()
            .filter(|(i, c)| *i == 0 || include_zero_components || !c.is_zero)
            .map(|(i, c)| self.render_component(c, i == 0, i + 1 == units.len()))
            .collect();
        tracing::trace!(?mode, total = %total, components = rendered.len(), "composite decomposition");

        let body = rendered.join(" ");
        let shows_nonzero = components[..=last_shown].iter().any(|c| !c.is_zero);
        if negative && shows_nonzero {
            format!("{}{}", self.symbols().minus, body)
        } else {
            body
        }
    }

    fn render_component(&self, component: &Component, leading: bool, finest: bool) -> String {
        let amount = if finest {
            component.amount.round_dp(self.max_fraction_digits(), self.rounding_mode())
        } else {
            component.amount.clone()
        };
        if leading && component.unit == TimeUnit::Century && amount.is_integer() {
            let digits = self.format_count(&amount);
            return format!("{}{} {}", digits, ordinal_suffix(&amount), CENTURY_SUFFIX);
        }
        let number = if finest {
            self.config().number_format().format(&amount)
        } else {
            self.format_count(&amount)
        };
        self.config().apply_pattern(&number, component.unit.symbol())
    }

    /// Whole counts stay ungrouped so they can be read back
    fn format_count(&self, count: &Number) -> String {
        let mut config = self.config().clone().with_grouping_used(false).with_max_fraction_digits(0);
        config.set_min_integer_digits(1);
        config.number_format().format(count)
    }

    /// Read a composite duration such as `"1 d 2 h 30 min"` or `"3rd c."`.
    ///
    /// Each component must be a plain whole number followed by a time
    /// symbol. A component carrying the locale's decimal or grouping mark
    /// is an `UnknownUnit`, as is an unrecognized symbol; text that does
    /// not start with a number is a `ParseError`. The result is the sum,
    /// in seconds.
    pub fn parse_multiple(&self, text: &str) -> Result<Measurement<TimeUnit>, MeasureError> {
        let symbols = self.symbols();
        let body = text.trim();
        let (negative, mut rest) = match body.strip_prefix(symbols.minus).or_else(|| body.strip_prefix('-')) {
            Some(stripped) => (true, stripped),
            None => (false, body),
        };

        let mut total = Number::from_i64(0);
        let mut first = true;
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }

            let digits_end = rest.find(|c: char| !symbols.is_digit(c)).unwrap_or(rest.len());
            if digits_end == 0 {
                tracing::debug!(text, "composite component without a number");
                return Err(if first {
                    MeasureError::parse_error(text)
                } else {
                    MeasureError::unknown_unit(text)
                });
            }
            let digits: String = rest[..digits_end]
                .chars()
                .filter_map(|c| symbols.digit_value(c).and_then(|value| char::from_digit(value, 10)))
                .collect();
            let count = Number::from_str(&digits)?;
            rest = &rest[digits_end..];

            if rest.starts_with(symbols.decimal) || rest.starts_with(symbols.grouping) {
                tracing::debug!(text, "composite component is not a plain integer");
                return Err(MeasureError::unknown_unit(text));
            }

            let (unit, after) = match Self::century_ordinal(rest) {
                Some(after) => (TimeUnit::Century, after),
                None => match Self::leading_symbol(rest.trim_start()) {
                    Some(found) => found,
                    None => {
                        tracing::debug!(text, "unknown composite unit");
                        return Err(MeasureError::unknown_unit(text));
                    }
                },
            };

            total = total.add(&to_base(&count, unit));
            rest = after;
            first = false;
        }

        if first {
            return Err(MeasureError::parse_error(text));
        }
        let total = if negative { total.neg() } else { total };
        Ok(Measurement::new(total, TimeUnit::Second))
    }

    /// `"rd c."` style tail glued to a century count
    fn century_ordinal(rest: &str) -> Option<&str> {
        let tail = ["st", "nd", "rd", "th"]
            .iter()
            .find_map(|suffix| rest.strip_prefix(suffix))?;
        tail.trim_start().strip_prefix(CENTURY_SUFFIX)
    }

    /// Longest time symbol at the start of `text`, ending at whitespace or
    /// end of input
    fn leading_symbol(text: &str) -> Option<(TimeUnit, &str)> {
        TimeUnit::symbol_index().iter().find_map(|&(symbol, unit)| {
            let after = text.strip_prefix(symbol)?;
            match after.chars().next() {
                None => Some((unit, after)),
                Some(c) if c.is_whitespace() => Some((unit, after)),
                Some(_) => None,
            }
        })
    }

    // ========== Clock formatting ==========

    /// Configuration for clock fields: at least two integer digits, no
    /// grouping, same locale and fraction rules
    fn clock_config(&self) -> LocaleFormatConfig {
        let mut config = self.config().clone();
        config.set_max_integer_digits(DEFAULT_MAX_INTEGER_DIGITS);
        config.set_min_integer_digits(2);
        config.set_grouping_used(false);
        config
    }

    fn sign(&self, negative: bool, zero: bool) -> String {
        if negative && !zero {
            self.symbols().minus.to_string()
        } else {
            String::new()
        }
    }

    /// `HH:MM`, minutes rounded with the configured rounding mode. Hours
    /// widen past two digits instead of wrapping.
    pub fn format_hour_minute(&self, time: &Measurement<TimeUnit>) -> String {
        let seconds = time.to_base();
        let total_minutes = from_base(&seconds.abs(), TimeUnit::Minute).round_dp(0, self.rounding_mode());

        let hours = from_base(&total_minutes.mul(&Number::from_i64(SECONDS_PER_MINUTE)), TimeUnit::Hour).floor();
        let minutes = total_minutes.sub(&hours.mul(&Number::from_i64(SECONDS_PER_MINUTE)));

        let config = self.clock_config().with_max_fraction_digits(0);
        let numbers = config.number_format();
        format!(
            "{}{}:{}",
            self.sign(seconds.is_negative(), total_minutes.is_zero()),
            numbers.format(&hours),
            numbers.format(&minutes),
        )
    }

    /// `HH:MM:SS`, with a fractional seconds tail when the configured
    /// fraction digits allow one (`"00:00:01,5"` in es-ES).
    pub fn format_hour_minute_second(&self, time: &Measurement<TimeUnit>) -> String {
        let seconds = time.to_base();
        let total = seconds.abs().round_dp(self.max_fraction_digits(), self.rounding_mode());

        let hours = from_base(&total, TimeUnit::Hour).floor();
        let remaining = total.sub(&hours.mul(&Number::from_i64(SECONDS_PER_HOUR)));
        let minutes = from_base(&remaining, TimeUnit::Minute).floor();
        let secs = remaining.sub(&minutes.mul(&Number::from_i64(SECONDS_PER_MINUTE)));

        let config = self.clock_config();
        let whole = config.clone().with_max_fraction_digits(0);
        format!(
            "{}{}:{}:{}",
            self.sign(seconds.is_negative(), total.is_zero()),
            whole.number_format().format(&hours),
            whole.number_format().format(&minutes),
            config.number_format().format(&secs),
        )
    }

    /// Read `HH:MM` (hours may be longer) into seconds
    pub fn parse_hour_minute(&self, text: &str) -> Result<Measurement<TimeUnit>, MeasureError> {
        let text = text.trim();
        let caps = hour_minute_regex()
            .captures(text)
            .ok_or_else(|| Self::clock_error(text))?;
        Self::clock_fields(text, caps.get(1).is_some(), &caps[2], &caps[3], None)
    }

    /// Read `HH:MM:SS` into seconds. A fractional seconds field is refused
    /// even though [`format_hour_minute_second`](Self::format_hour_minute_second)
    /// may produce one.
    pub fn parse_hour_minute_second(&self, text: &str) -> Result<Measurement<TimeUnit>, MeasureError> {
        let text = text.trim();
        let caps = hour_minute_second_regex()
            .captures(text)
            .ok_or_else(|| Self::clock_error(text))?;
        Self::clock_fields(text, caps.get(1).is_some(), &caps[2], &caps[3], Some(&caps[4]))
    }

    fn clock_error(text: &str) -> MeasureError {
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.starts_with(|c: char| c.is_ascii_digit()) {
            tracing::debug!(text, "malformed clock text");
            MeasureError::unknown_unit(text)
        } else {
            tracing::debug!(text, "clock text does not start with a number");
            MeasureError::parse_error(text)
        }
    }

    fn clock_fields(
        text: &str,
        negative: bool,
        hours: &str,
        minutes: &str,
        seconds: Option<&str>,
    ) -> Result<Measurement<TimeUnit>, MeasureError> {
        let sixty = Number::from_i64(SECONDS_PER_MINUTE);
        let hours = Number::from_str(hours)?;
        let minutes = Number::from_str(minutes)?;
        let seconds = match seconds {
            Some(s) => Number::from_str(s)?,
            None => Number::from_i64(0),
        };
        if minutes >= sixty || seconds >= sixty {
            tracing::debug!(text, "clock field out of range");
            return Err(MeasureError::unknown_unit(text));
        }

        let total = to_base(&hours, TimeUnit::Hour)
            .add(&to_base(&minutes, TimeUnit::Minute))
            .add(&seconds);
        let total = if negative { total.neg() } else { total };
        Ok(Measurement::new(total, TimeUnit::Second))
    }
}
