//! Measurement formatting and parsing
//!
//! A `MeasureFormatter<U>` owns one `LocaleFormatConfig` and renders
//! value + unit pairs of a single quantity kind through the
//! configuration's value-and-unit pattern. It also reads such text back,
//! recognizes unit symbols and picks a best-fit unit for display.

use std::marker::PhantomData;
use metron_core::{
    DecimalSymbols, Locale, LocaleFormatConfig, MeasureError, Number, RoundingMode, UnitSystem,
};
use crate::convert::convert;
use crate::kind::UnitKind;
use crate::measurement::Measurement;
use crate::units::*;

/// Locale-aware formatter for one quantity kind.
///
/// Cloning deep-copies the configuration; the clone can be reconfigured
/// or handed to another thread without affecting the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureFormatter<U: UnitKind> {
    config: LocaleFormatConfig,
    _kind: PhantomData<U>,
}

pub type DistanceFormatter = MeasureFormatter<DistanceUnit>;
pub type SpeedFormatter = MeasureFormatter<SpeedUnit>;
pub type SurfaceFormatter = MeasureFormatter<SurfaceUnit>;
pub type TimeFormatter = MeasureFormatter<TimeUnit>;
pub type VolumeFormatter = MeasureFormatter<VolumeUnit>;
pub type WeightFormatter = MeasureFormatter<WeightUnit>;
pub type MagneticFluxDensityFormatter = MeasureFormatter<MagneticFluxDensityUnit>;

impl<U: UnitKind> MeasureFormatter<U> {
    /// Formatter with the defaults for `locale`
    pub fn new(locale: Locale) -> Self {
        Self::with_config(LocaleFormatConfig::for_locale(locale))
    }

    /// Formatter for a locale tag such as `"es-ES"`
    pub fn for_tag(tag: &str) -> Result<Self, MeasureError> {
        Ok(Self::new(Locale::from_tag(tag)?))
    }

    pub fn with_config(config: LocaleFormatConfig) -> Self {
        MeasureFormatter { config, _kind: PhantomData }
    }

    /// Copy-construct from another formatter; the configuration is copied,
    /// never shared.
    pub fn from_formatter(other: Option<&Self>) -> Result<Self, MeasureError> {
        match other {
            Some(formatter) => Ok(formatter.clone()),
            None => Err(MeasureError::missing_required("formatter to copy from")),
        }
    }

    // ========== Configuration ==========

    pub fn config(&self) -> &LocaleFormatConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LocaleFormatConfig {
        &mut self.config
    }

    pub fn locale(&self) -> &Locale {
        self.config.locale()
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.config.set_locale(locale);
    }

    /// Switch locale by tag; an invalid tag leaves the formatter untouched
    pub fn set_locale_tag(&mut self, tag: &str) -> Result<(), MeasureError> {
        let locale = Locale::from_tag(tag)?;
        self.config.set_locale(locale);
        Ok(())
    }

    pub fn symbols(&self) -> DecimalSymbols {
        self.config.symbols()
    }

    pub fn min_integer_digits(&self) -> u32 {
        self.config.min_integer_digits()
    }

    pub fn set_min_integer_digits(&mut self, digits: u32) {
        self.config.set_min_integer_digits(digits);
    }

    pub fn max_integer_digits(&self) -> u32 {
        self.config.max_integer_digits()
    }

    pub fn set_max_integer_digits(&mut self, digits: u32) {
        self.config.set_max_integer_digits(digits);
    }

    pub fn min_fraction_digits(&self) -> u32 {
        self.config.min_fraction_digits()
    }

    pub fn set_min_fraction_digits(&mut self, digits: u32) {
        self.config.set_min_fraction_digits(digits);
    }

    pub fn max_fraction_digits(&self) -> u32 {
        self.config.max_fraction_digits()
    }

    pub fn set_max_fraction_digits(&mut self, digits: u32) {
        self.config.set_max_fraction_digits(digits);
    }

    pub fn is_grouping_used(&self) -> bool {
        self.config.is_grouping_used()
    }

    pub fn set_grouping_used(&mut self, grouping: bool) {
        self.config.set_grouping_used(grouping);
    }

    pub fn is_parse_integer_only(&self) -> bool {
        self.config.is_parse_integer_only()
    }

    pub fn set_parse_integer_only(&mut self, integer_only: bool) {
        self.config.set_parse_integer_only(integer_only);
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.config.rounding_mode()
    }

    pub fn set_rounding_mode(&mut self, mode: RoundingMode) {
        self.config.set_rounding_mode(mode);
    }

    pub fn value_and_unit_pattern(&self) -> &str {
        self.config.value_and_unit_pattern()
    }

    pub fn set_value_and_unit_pattern(&mut self, pattern: &str) -> Result<(), MeasureError> {
        self.config.set_value_and_unit_pattern(pattern)
    }

    // ========== Formatting ==========

    /// Render `value` in `unit`, e.g. `"5,5 m"` for es-ES
    pub fn format(&self, value: &Number, unit: U) -> String {
        let number = self.config.number_format().format(value);
        self.config.apply_pattern(&number, unit.symbol())
    }

    pub fn format_f64(&self, value: f64, unit: U) -> String {
        self.format(&Number::from_f64(value), unit)
    }

    pub fn format_measurement(&self, measurement: &Measurement<U>) -> String {
        self.format(measurement.value(), measurement.unit())
    }

    /// Primary symbol of `unit`; it never depends on the value
    pub fn unit_symbol(&self, unit: U) -> &'static str {
        unit.symbol()
    }

    // ========== Parsing ==========

    /// Read text produced by [`format`](Self::format) back into a measurement.
    ///
    /// Fails with `ParseError` when no number can be read and with
    /// `UnknownUnit` when the number is followed by something that is not a
    /// symbol of this quantity kind.
    pub fn parse(&self, text: &str) -> Result<Measurement<U>, MeasureError> {
        let body = self.strip_pattern_literals(text.trim());
        let numbers = self.config.number_format();

        if self.is_value_first() {
            let (value, end) = match numbers.parse_prefix(body) {
                Some(found) => found,
                None => {
                    tracing::debug!(text, "no numeric prefix");
                    return Err(MeasureError::parse_error(text));
                }
            };
            let symbol = self.strip_separator(body[end..].trim());
            return match U::from_symbol(symbol) {
                Some(unit) => Ok(Measurement::new(value, unit)),
                None => {
                    tracing::debug!(text, symbol, kind = %U::KIND, "unknown unit symbol");
                    Err(MeasureError::unknown_unit(text))
                }
            };
        }

        // Unit first: the number is the first numeric run that reaches the end
        for (start, _) in body.char_indices() {
            if let Some((value, end)) = numbers.parse_prefix(&body[start..]) {
                if !body[start + end..].trim().is_empty() {
                    continue;
                }
                let symbol = self.strip_separator(body[..start].trim());
                return match U::from_symbol(symbol) {
                    Some(unit) => Ok(Measurement::new(value, unit)),
                    None => {
                        tracing::debug!(text, symbol, kind = %U::KIND, "unknown unit symbol");
                        Err(MeasureError::unknown_unit(text))
                    }
                };
            }
        }
        tracing::debug!(text, "no number after unit");
        Err(MeasureError::parse_error(text))
    }

    /// Unit whose symbol ends `text`, or starts it when the pattern puts
    /// the unit first.
    ///
    /// Symbols are tried longest first so that `"5 mm"` resolves to
    /// millimeters rather than meters.
    pub fn find_unit(&self, text: &str) -> Option<U> {
        let index = U::symbol_index();
        let found = if self.is_value_first() {
            let text = self.strip_trailing_literal(text.trim_end());
            index.iter().find(|(symbol, _)| text.ends_with(symbol))
        } else {
            let text = self.strip_leading_literal(text.trim_start());
            index.iter().find(|(symbol, _)| text.starts_with(symbol))
        };
        found.map(|&(_, unit)| unit)
    }

    pub fn is_valid_unit(&self, text: &str) -> bool {
        self.find_unit(text).is_some()
    }

    /// True when `text` is a number followed by a known symbol
    pub fn is_valid_measurement(&self, text: &str) -> bool {
        self.parse(text).is_ok()
    }

    /// System of the unit found in `text`; `None` for neutral or unknown
    /// units.
    pub fn unit_system(&self, text: &str) -> Option<UnitSystem> {
        self.find_unit(text).and_then(|unit| unit.system())
    }

    pub fn is_metric_unit(&self, text: &str) -> bool {
        self.unit_system(text) == Some(UnitSystem::Metric)
    }

    pub fn is_imperial_unit(&self, text: &str) -> bool {
        self.unit_system(text) == Some(UnitSystem::Imperial)
    }

    // ========== Auto scaling ==========

    /// Re-express `value` in the best-fit unit of `system`.
    ///
    /// Candidates are the units of `system` ordered by magnitude; the
    /// largest one in which the value is at least one wins, otherwise the
    /// smallest. A kind with no unit in `system` keeps `unit`.
    pub fn auto_scale(&self, value: &Number, unit: U, system: UnitSystem) -> Measurement<U> {
        let mut candidates: Vec<U> = U::all()
            .iter()
            .copied()
            .filter(|candidate| candidate.system() == Some(system))
            .collect();
        if candidates.is_empty() {
            tracing::debug!(kind = %U::KIND, %system, "no candidate unit, keeping {}", unit.symbol());
            return Measurement::new(value.clone(), unit);
        }
        candidates.sort_by(|a, b| a.factor().magnitude_cmp(&b.factor()));

        let one = Number::from_i64(1);
        let chosen = candidates
            .iter()
            .rev()
            .map(|&candidate| Measurement::new(convert(value, unit, candidate), candidate))
            .find(|scaled| scaled.value().abs() >= one);
        let scaled = match chosen {
            Some(scaled) => scaled,
            None => Measurement::new(convert(value, unit, candidates[0]), candidates[0]),
        };
        tracing::debug!(kind = %U::KIND, %system, from = unit.symbol(), to = scaled.unit().symbol(), "auto-scaled");
        scaled
    }

    /// Auto-scale into the locale's default system, then format
    pub fn format_and_convert(&self, value: &Number, unit: U) -> String {
        self.format_and_convert_to(value, unit, self.locale().default_unit_system())
    }

    pub fn format_and_convert_to(&self, value: &Number, unit: U, system: UnitSystem) -> String {
        self.format_measurement(&self.auto_scale(value, unit, system))
    }

    pub fn format_and_convert_metric(&self, value: &Number, unit: U) -> String {
        self.format_and_convert_to(value, unit, UnitSystem::Metric)
    }

    pub fn format_and_convert_imperial(&self, value: &Number, unit: U) -> String {
        self.format_and_convert_to(value, unit, UnitSystem::Imperial)
    }

    // ========== Pattern helpers ==========

    fn is_value_first(&self) -> bool {
        let pattern = self.config.value_and_unit_pattern();
        match (pattern.find("{0}"), pattern.find("{1}")) {
            (Some(value), Some(unit)) => value < unit,
            _ => true,
        }
    }

    /// Pattern text before the first placeholder, between them, and after
    /// the last one
    fn pattern_literals(&self) -> (&str, &str, &str) {
        let pattern = self.config.value_and_unit_pattern();
        let (first, second) = if self.is_value_first() { ("{0}", "{1}") } else { ("{1}", "{0}") };
        let (leading, rest) = pattern.split_once(first).unwrap_or(("", pattern));
        let (middle, trailing) = rest.split_once(second).unwrap_or((rest, ""));
        (leading.trim(), middle.trim(), trailing.trim())
    }

    fn strip_pattern_literals<'t>(&self, text: &'t str) -> &'t str {
        self.strip_trailing_literal(self.strip_leading_literal(text))
    }

    fn strip_leading_literal<'t>(&self, text: &'t str) -> &'t str {
        let (leading, _, _) = self.pattern_literals();
        if leading.is_empty() {
            text
        } else {
            text.strip_prefix(leading).unwrap_or(text).trim_start()
        }
    }

    fn strip_trailing_literal<'t>(&self, text: &'t str) -> &'t str {
        let (_, _, trailing) = self.pattern_literals();
        if trailing.is_empty() {
            text
        } else {
            text.strip_suffix(trailing).unwrap_or(text).trim_end()
        }
    }

    fn strip_separator<'t>(&self, text: &'t str) -> &'t str {
        let (_, middle, _) = self.pattern_literals();
        if middle.is_empty() {
            return text;
        }
        let text = if self.is_value_first() {
            text.strip_prefix(middle).unwrap_or(text)
        } else {
            text.strip_suffix(middle).unwrap_or(text)
        };
        text.trim()
    }
}

impl<U: UnitKind> Default for MeasureFormatter<U> {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn es<U: UnitKind>() -> MeasureFormatter<U> {
        MeasureFormatter::for_tag("es-ES").unwrap()
    }

    fn check_symbols_recovered<U: UnitKind>() {
        for pattern in ["{0} {1}", "{1} {0}", "({1}) {0}"] {
            let mut formatter: MeasureFormatter<U> = es();
            formatter.set_value_and_unit_pattern(pattern).unwrap();
            for &unit in U::all() {
                let text = formatter.format(&num("5.5"), unit);
                assert_eq!(formatter.find_unit(&text), Some(unit), "'{}' did not resolve", text);
                assert!(formatter.is_valid_unit(&text));
                assert_eq!(formatter.unit_system(&text), unit.system());
                let parsed = formatter.parse(&text).unwrap();
                assert_eq!(parsed.unit(), unit);
                assert_eq!(*parsed.value(), num("5.5"));
            }
        }
    }

    #[test]
    fn test_format_spanish_meters() {
        let formatter: DistanceFormatter = es();
        assert_eq!(formatter.format(&num("5.5"), DistanceUnit::Meter), "5,5 m");
        assert_eq!(formatter.format_f64(5.5, DistanceUnit::Meter), "5,5 m");
    }

    #[test]
    fn test_format_grouping_and_pattern() {
        let mut formatter: WeightFormatter = es();
        assert_eq!(formatter.format(&num("1234567.5"), WeightUnit::Kilogram), "1.234.567,5 Kg");
        assert_eq!(formatter.format(&num("1234.5"), WeightUnit::Kilogram), "1234,5 Kg");
        formatter.set_value_and_unit_pattern("{0}{1}").unwrap();
        formatter.set_grouping_used(false);
        assert_eq!(formatter.format(&num("1234567.5"), WeightUnit::Kilogram), "1234567,5Kg");
    }

    #[test]
    fn test_format_and_convert_picks_largest_unit_at_least_one() {
        let mut formatter: DistanceFormatter = es();
        formatter.set_max_fraction_digits(2);
        assert_eq!(formatter.format_and_convert(&num("5000000.5"), DistanceUnit::Millimeter), "5 Km");
        assert_eq!(formatter.format_and_convert(&num("50.5"), DistanceUnit::Millimeter), "5,05 cm");
    }

    #[test]
    fn test_format_and_convert_small_value_uses_smallest_unit() {
        let formatter: DistanceFormatter = es();
        assert_eq!(formatter.format_and_convert(&num("0.5"), DistanceUnit::Millimeter), "0,5 mm");
        assert_eq!(formatter.format_and_convert(&num("0"), DistanceUnit::Kilometer), "0 mm");
    }

    #[test]
    fn test_format_and_convert_respects_system() {
        let formatter: DistanceFormatter = es();
        let metric = formatter.auto_scale(&num("3"), DistanceUnit::Mile, UnitSystem::Metric);
        assert_eq!(metric.unit(), DistanceUnit::Kilometer);

        let imperial = formatter.auto_scale(&num("5000"), DistanceUnit::Meter, UnitSystem::Imperial);
        assert_eq!(imperial.unit(), DistanceUnit::Mile);
        assert_eq!(formatter.format_and_convert_imperial(&num("0.3048"), DistanceUnit::Meter), "1 ft");
        assert_eq!(formatter.format_and_convert_metric(&num("12"), DistanceUnit::Inch), "30,48 cm");

        for value in ["0.001", "1", "250", "123456"] {
            for &unit in SpeedUnit::all() {
                for system in [UnitSystem::Metric, UnitSystem::Imperial] {
                    let scaled = es::<SpeedUnit>().auto_scale(&num(value), unit, system);
                    assert_eq!(scaled.unit().system(), Some(system));
                }
            }
        }
    }

    #[test]
    fn test_format_and_convert_uses_locale_system() {
        let us: SpeedFormatter = MeasureFormatter::new(Locale::en_us());
        assert_eq!(us.format_and_convert(&num("10"), SpeedUnit::MetersPerSecond), "22.369 mph");
        let es: SpeedFormatter = es();
        assert_eq!(es.format_and_convert(&num("10"), SpeedUnit::MetersPerSecond), "10 m/s");
        assert_eq!(es.format_and_convert(&num("0.5"), SpeedUnit::MetersPerSecond), "1,8 Km/h");
    }

    #[test]
    fn test_format_and_convert_without_candidates_keeps_unit() {
        let formatter: MagneticFluxDensityFormatter = es();
        assert_eq!(
            formatter.format_and_convert_imperial(&num("2"), MagneticFluxDensityUnit::Gauss),
            "2 G"
        );
    }

    #[test]
    fn test_find_unit_prefers_longest_symbol() {
        let distance: DistanceFormatter = es();
        assert_eq!(distance.find_unit("5 mm"), Some(DistanceUnit::Millimeter));
        assert_eq!(distance.find_unit("5 mi  "), Some(DistanceUnit::Mile));
        assert_eq!(distance.find_unit("5 m"), Some(DistanceUnit::Meter));
        assert_eq!(distance.find_unit("5 nmi"), Some(DistanceUnit::NauticalMile));

        let time: TimeFormatter = es();
        assert_eq!(time.find_unit("5 min"), Some(TimeUnit::Minute));
        assert_eq!(time.find_unit("5 ms"), Some(TimeUnit::Millisecond));

        let flux: MagneticFluxDensityFormatter = es();
        assert_eq!(flux.find_unit("1 T"), Some(MagneticFluxDensityUnit::Tesla));
        assert_eq!(flux.find_unit("1 mT"), Some(MagneticFluxDensityUnit::Millitesla));
        assert_eq!(flux.find_unit("1 µT"), Some(MagneticFluxDensityUnit::Microtesla));
        assert_eq!(flux.find_unit("1 KT"), Some(MagneticFluxDensityUnit::Kilotesla));
        assert_eq!(flux.find_unit("1 X"), None);
    }

    #[test]
    fn test_find_unit_recovers_every_unit() {
        check_symbols_recovered::<DistanceUnit>();
        check_symbols_recovered::<SpeedUnit>();
        check_symbols_recovered::<SurfaceUnit>();
        check_symbols_recovered::<TimeUnit>();
        check_symbols_recovered::<VolumeUnit>();
        check_symbols_recovered::<WeightUnit>();
        check_symbols_recovered::<MagneticFluxDensityUnit>();
    }

    #[test]
    fn test_parse() {
        let formatter: DistanceFormatter = es();
        let m = formatter.parse("1.234,5 Km").unwrap();
        assert_eq!(m.unit(), DistanceUnit::Kilometer);
        assert_eq!(*m.value(), num("1234.5"));

        let m = formatter.parse("  -3mi").unwrap();
        assert_eq!(*m.value(), num("-3"));
        assert_eq!(m.unit(), DistanceUnit::Mile);
    }

    #[test]
    fn test_parse_errors() {
        let formatter: DistanceFormatter = es();
        let err = formatter.parse("Km").unwrap_err();
        assert!(matches!(err, MeasureError::ParseError(_)));
        let err = formatter.parse("").unwrap_err();
        assert!(matches!(err, MeasureError::ParseError(_)));

        let err = formatter.parse("5 parsecs").unwrap_err();
        assert!(matches!(err, MeasureError::UnknownUnit(_)));
        // a time symbol is not a distance
        let err = formatter.parse("5 min").unwrap_err();
        assert!(matches!(err, MeasureError::UnknownUnit(_)));
    }

    #[test]
    fn test_parse_with_decorated_patterns() {
        let mut formatter: WeightFormatter = es();
        formatter.set_value_and_unit_pattern("[{0} - {1}]").unwrap();
        let text = formatter.format(&num("2.5"), WeightUnit::Pound);
        assert_eq!(text, "[2,5 - lb]");
        let m = formatter.parse(&text).unwrap();
        assert_eq!(m.unit(), WeightUnit::Pound);
        assert_eq!(formatter.find_unit(&text), Some(WeightUnit::Pound));

        formatter.set_value_and_unit_pattern("{1} {0}").unwrap();
        let text = formatter.format(&num("7"), WeightUnit::Gram);
        assert_eq!(text, "g 7");
        let m = formatter.parse(&text).unwrap();
        assert_eq!(m.unit(), WeightUnit::Gram);
        assert_eq!(*m.value(), num("7"));
        assert_eq!(formatter.find_unit(&text), Some(WeightUnit::Gram));
        assert!(formatter.is_metric_unit(&text));
        assert!(formatter.is_imperial_unit("lb 2"));
        assert!(matches!(formatter.parse("g"), Err(MeasureError::ParseError(_))));
        assert!(matches!(formatter.parse("zz 7"), Err(MeasureError::UnknownUnit(_))));
    }

    #[test]
    fn test_validity_and_systems() {
        let formatter: VolumeFormatter = es();
        assert!(formatter.is_valid_unit("gal"));
        assert!(!formatter.is_valid_unit("parsec"));
        assert!(formatter.is_valid_measurement("3 l"));
        assert!(!formatter.is_valid_measurement("l"));
        assert!(formatter.is_metric_unit("3 ml"));
        assert!(formatter.is_imperial_unit("2 fl oz"));
        assert!(!formatter.is_imperial_unit("2 l"));

        let time: TimeFormatter = es();
        assert_eq!(time.unit_system("5 h"), None);
        assert_eq!(time.unit_system("5 ms"), Some(UnitSystem::Metric));
        assert!(!time.is_metric_unit("5 d"));
        assert!(!time.is_imperial_unit("5 d"));
    }

    #[test]
    fn test_unit_symbol() {
        let formatter: SurfaceFormatter = es();
        assert_eq!(formatter.unit_symbol(SurfaceUnit::SquareMeter), "m²");
        assert_eq!(formatter.unit_symbol(SurfaceUnit::Acre), "ac");
    }

    #[test]
    fn test_clone_is_independent() {
        let original: DistanceFormatter = es();
        let mut copy = MeasureFormatter::from_formatter(Some(&original)).unwrap();
        copy.set_max_fraction_digits(0);
        copy.set_locale(Locale::en_us());
        assert_eq!(original.max_fraction_digits(), 3);
        assert_eq!(original.locale().tag(), "es-ES");
        assert_eq!(original.format(&num("1.25"), DistanceUnit::Meter), "1,25 m");
        assert_eq!(copy.format(&num("1.25"), DistanceUnit::Meter), "1 m");
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        let err = DistanceFormatter::from_formatter(None).unwrap_err();
        assert!(matches!(err, MeasureError::MissingRequired(_)));

        assert!(matches!(DistanceFormatter::for_tag(""), Err(MeasureError::InvalidArgument(_))));

        let mut formatter: DistanceFormatter = es();
        assert!(formatter.set_locale_tag("not a tag").is_err());
        assert_eq!(formatter.locale().tag(), "es-ES");
        assert!(formatter.set_value_and_unit_pattern("").is_err());
        assert_eq!(formatter.value_and_unit_pattern(), "{0} {1}");
    }
}
