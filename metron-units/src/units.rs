//! Unit catalog - one enum per quantity kind
//!
//! Factors are exact ratios to the kind's base unit (meter, meter per
//! second, square meter, second, liter, kilogram, tesla).

use std::fmt;
use std::sync::LazyLock;
use serde::{Serialize, Deserialize};
use metron_core::UnitSystem;
use crate::kind::{build_symbol_index, Factor, QuantityKind, UnitDef, UnitKind};

const METRIC: Option<UnitSystem> = Some(UnitSystem::Metric);
const IMPERIAL: Option<UnitSystem> = Some(UnitSystem::Imperial);
const NEUTRAL: Option<UnitSystem> = None;

/// Declare a unit enum together with its `UnitKind` table.
///
/// Each row reads: `Variant => "name", [symbols], num / den, system;`
macro_rules! unit_catalog {
    (
        $(#[$meta:meta])*
        $name:ident: $kind:ident, base = $base:ident {
            $( $variant:ident => $label:literal, [$($symbol:literal),+], $num:literal / $den:literal, $system:expr; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];
        }

        impl UnitKind for $name {
            const KIND: QuantityKind = QuantityKind::$kind;
            const BASE: Self = $name::$base;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn def(self) -> &'static UnitDef {
                match self {
                    $(
                        $name::$variant => {
                            static DEF: UnitDef = UnitDef {
                                name: $label,
                                symbols: &[$($symbol),+],
                                factor: Factor::new($num, $den),
                                system: $system,
                            };
                            &DEF
                        }
                    )+
                }
            }

            fn symbol_index() -> &'static [(&'static str, Self)] {
                static INDEX: LazyLock<Vec<(&'static str, $name)>> =
                    LazyLock::new(|| build_symbol_index($name::ALL));
                &INDEX
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.symbol())
            }
        }
    };
}

unit_catalog! {
    /// Length units, base meter
    DistanceUnit: Distance, base = Meter {
        Millimeter => "millimeter", ["mm"], 1 / 1000, METRIC;
        Centimeter => "centimeter", ["cm"], 1 / 100, METRIC;
        Meter => "meter", ["m"], 1 / 1, METRIC;
        Kilometer => "kilometer", ["Km", "km"], 1000 / 1, METRIC;
        Inch => "inch", ["in"], 254 / 10000, IMPERIAL;
        Foot => "foot", ["ft"], 3048 / 10000, IMPERIAL;
        Yard => "yard", ["yd"], 9144 / 10000, IMPERIAL;
        Mile => "mile", ["mi"], 1609344 / 1000, IMPERIAL;
        NauticalMile => "nautical mile", ["NM", "nmi"], 1852 / 1, NEUTRAL;
    }
}

unit_catalog! {
    /// Speed units, base meter per second
    SpeedUnit: Speed, base = MetersPerSecond {
        MetersPerSecond => "meter per second", ["m/s"], 1 / 1, METRIC;
        KilometersPerHour => "kilometer per hour", ["Km/h", "km/h"], 5 / 18, METRIC;
        FeetPerSecond => "foot per second", ["ft/s"], 3048 / 10000, IMPERIAL;
        MilesPerHour => "mile per hour", ["mph", "mi/h"], 44704 / 100000, IMPERIAL;
        Knot => "knot", ["kn", "kt"], 463 / 900, NEUTRAL;
    }
}

unit_catalog! {
    /// Area units, base square meter
    SurfaceUnit: Surface, base = SquareMeter {
        SquareMillimeter => "square millimeter", ["mm²", "mm2"], 1 / 1000000, METRIC;
        SquareCentimeter => "square centimeter", ["cm²", "cm2"], 1 / 10000, METRIC;
        SquareMeter => "square meter", ["m²", "m2"], 1 / 1, METRIC;
        Hectare => "hectare", ["ha"], 10000 / 1, METRIC;
        SquareKilometer => "square kilometer", ["Km²", "km²", "Km2", "km2"], 1000000 / 1, METRIC;
        SquareInch => "square inch", ["in²", "in2"], 64516 / 100000000, IMPERIAL;
        SquareFoot => "square foot", ["ft²", "ft2"], 9290304 / 100000000, IMPERIAL;
        SquareYard => "square yard", ["yd²", "yd2"], 83612736 / 100000000, IMPERIAL;
        Acre => "acre", ["ac"], 40468564224 / 10000000, IMPERIAL;
        SquareMile => "square mile", ["mi²", "mi2"], 2589988110336 / 1000000, IMPERIAL;
    }
}

unit_catalog! {
    /// Time units, base second.
    ///
    /// A year is 365.25 days, a month a twelfth of that and a century
    /// 100 years. Everything coarser than a second is system-neutral.
    TimeUnit: Time, base = Second {
        Nanosecond => "nanosecond", ["ns"], 1 / 1000000000, METRIC;
        Microsecond => "microsecond", ["µs", "μs", "us"], 1 / 1000000, METRIC;
        Millisecond => "millisecond", ["ms"], 1 / 1000, METRIC;
        Second => "second", ["s"], 1 / 1, METRIC;
        Minute => "minute", ["min"], 60 / 1, NEUTRAL;
        Hour => "hour", ["h"], 3600 / 1, NEUTRAL;
        Day => "day", ["d"], 86400 / 1, NEUTRAL;
        Week => "week", ["w"], 604800 / 1, NEUTRAL;
        Month => "month", ["mon"], 2629800 / 1, NEUTRAL;
        Year => "year", ["y"], 31557600 / 1, NEUTRAL;
        Century => "century", ["c."], 3155760000 / 1, NEUTRAL;
    }
}

unit_catalog! {
    /// Volume units, base liter (imperial entries are US customary)
    VolumeUnit: Volume, base = Liter {
        Milliliter => "milliliter", ["ml", "mL"], 1 / 1000, METRIC;
        Centiliter => "centiliter", ["cl", "cL"], 1 / 100, METRIC;
        Deciliter => "deciliter", ["dl", "dL"], 1 / 10, METRIC;
        Liter => "liter", ["l", "L"], 1 / 1, METRIC;
        CubicMeter => "cubic meter", ["m³", "m3"], 1000 / 1, METRIC;
        FluidOunce => "fluid ounce", ["fl oz", "floz"], 295735295625 / 10000000000000, IMPERIAL;
        Pint => "pint", ["pt"], 473176473 / 1000000000, IMPERIAL;
        Quart => "quart", ["qt"], 946352946 / 1000000000, IMPERIAL;
        Gallon => "gallon", ["gal"], 3785411784 / 1000000000, IMPERIAL;
    }
}

unit_catalog! {
    /// Mass units, base kilogram
    WeightUnit: Weight, base = Kilogram {
        Milligram => "milligram", ["mg"], 1 / 1000000, METRIC;
        Gram => "gram", ["g"], 1 / 1000, METRIC;
        Kilogram => "kilogram", ["Kg", "kg"], 1 / 1, METRIC;
        Tonne => "tonne", ["t"], 1000 / 1, METRIC;
        Ounce => "ounce", ["oz"], 28349523125 / 1000000000000, IMPERIAL;
        Pound => "pound", ["lb", "lbs"], 45359237 / 100000000, IMPERIAL;
        Stone => "stone", ["st"], 635029318 / 100000000, IMPERIAL;
    }
}

unit_catalog! {
    /// Magnetic flux density units, base tesla. Gauss is CGS and
    /// belongs to neither system.
    MagneticFluxDensityUnit: MagneticFluxDensity, base = Tesla {
        Nanotesla => "nanotesla", ["nT"], 1 / 1000000000, METRIC;
        Microtesla => "microtesla", ["µT", "μT", "uT"], 1 / 1000000, METRIC;
        Millitesla => "millitesla", ["mT"], 1 / 1000, METRIC;
        Tesla => "tesla", ["T"], 1 / 1, METRIC;
        Kilotesla => "kilotesla", ["KT", "kT"], 1000 / 1, METRIC;
        Gauss => "gauss", ["G"], 1 / 10000, NEUTRAL;
    }
}
