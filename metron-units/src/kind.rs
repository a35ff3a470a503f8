//! Quantity kinds and the unit trait every catalog enum implements
//!
//! Each quantity kind gets its own unit enum, so converting between
//! kinds (meters into seconds) is a type error rather than a runtime check.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use serde::{Serialize, Deserialize};
use metron_core::{Number, UnitSystem};

/// Physical dimension a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    Distance,
    Speed,
    Surface,
    Time,
    Volume,
    Weight,
    MagneticFluxDensity,
}

impl QuantityKind {
    pub fn name(&self) -> &'static str {
        match self {
            QuantityKind::Distance => "distance",
            QuantityKind::Speed => "speed",
            QuantityKind::Surface => "surface",
            QuantityKind::Time => "time",
            QuantityKind::Volume => "volume",
            QuantityKind::Weight => "weight",
            QuantityKind::MagneticFluxDensity => "magnetic flux density",
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Exact ratio `num / den` from a unit to its kind's base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Factor {
    pub num: i64,
    pub den: i64,
}

impl Factor {
    pub const ONE: Factor = Factor { num: 1, den: 1 };

    pub const fn new(num: i64, den: i64) -> Self {
        Factor { num, den }
    }

    pub fn is_one(&self) -> bool {
        self.num == self.den
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Factor as a decimal (rounded to working precision for
    /// non-terminating ratios such as 5/18)
    pub fn to_number(&self) -> Number {
        Number::from_ratio(self.num, self.den)
    }

    /// Compare magnitudes exactly via cross multiplication
    pub fn magnitude_cmp(&self, other: &Factor) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

/// Static description of one unit
#[derive(Debug)]
pub struct UnitDef {
    /// Human name, e.g. "kilometer"
    pub name: &'static str,
    /// Accepted symbols; the first one is used when formatting
    pub symbols: &'static [&'static str],
    /// Ratio to the base unit
    pub factor: Factor,
    /// `None` for system-neutral units (minute, hour, knot, ...)
    pub system: Option<UnitSystem>,
}

/// A unit of one quantity kind.
///
/// Implemented by the catalog enums in [`crate::units`]; every
/// implementation has exactly one unit whose factor is one, `BASE`.
pub trait UnitKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Kind shared by every unit of this type
    const KIND: QuantityKind;

    /// The conversion pivot
    const BASE: Self;

    /// Every unit, in catalog order
    fn all() -> &'static [Self];

    fn def(self) -> &'static UnitDef;

    /// All (symbol, unit) pairs ordered by descending symbol length, ties
    /// in catalog order. Longest-first lets "mm" win over "m".
    fn symbol_index() -> &'static [(&'static str, Self)];

    fn name(self) -> &'static str {
        self.def().name
    }

    /// Primary symbol
    fn symbol(self) -> &'static str {
        self.def().symbols[0]
    }

    fn symbols(self) -> &'static [&'static str] {
        self.def().symbols
    }

    fn factor(self) -> Factor {
        self.def().factor
    }

    fn system(self) -> Option<UnitSystem> {
        self.def().system
    }

    fn is_base(self) -> bool {
        self == Self::BASE
    }

    /// Unit whose symbol list contains `symbol` exactly
    fn from_symbol(symbol: &str) -> Option<Self> {
        Self::symbol_index()
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|&(_, unit)| unit)
    }
}

/// Build the longest-first symbol index for a catalog
pub(crate) fn build_symbol_index<U: UnitKind>(units: &[U]) -> Vec<(&'static str, U)> {
    let mut index: Vec<(&'static str, U)> = units
        .iter()
        .flat_map(|&unit| unit.symbols().iter().map(move |&symbol| (symbol, unit)))
        .collect();
    // stable: equal lengths keep catalog order
    index.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    index
}
