//! Metron Units - measurement conversion, formatting and parsing
//!
//! Every quantity kind has its own unit enum, so values of different kinds
//! never mix. Units carry their symbols, an exact factor to the kind's base
//! unit and their metric/imperial classification.
//!
//! Kinds:
//! - Distance (mm, cm, m, Km, in, ft, yd, mi, NM)
//! - Speed (m/s, Km/h, ft/s, mph, kn)
//! - Surface (mm², m², ha, Km², ft², ac, mi², etc.)
//! - Time (ns ... s, min, h, d, w, mon, y, c.)
//! - Volume (ml, l, m³, fl oz, pt, qt, gal)
//! - Weight (mg, g, Kg, t, oz, lb, st)
//! - Magnetic flux density (nT, µT, mT, T, KT, G)
//!
//! ```
//! use metron_core::Number;
//! use metron_units::{DistanceFormatter, DistanceUnit};
//!
//! let formatter = DistanceFormatter::for_tag("es-ES").unwrap();
//! assert_eq!(formatter.format(&Number::from_f64(5.5), DistanceUnit::Meter), "5,5 m");
//! ```

mod kind;
mod units;
mod convert;
mod measurement;
mod format;
mod time;

pub use kind::{QuantityKind, Factor, UnitDef, UnitKind};
pub use units::{
    DistanceUnit, SpeedUnit, SurfaceUnit, TimeUnit, VolumeUnit, WeightUnit,
    MagneticFluxDensityUnit,
};
pub use convert::{convert, convert_f64, to_base, from_base};
pub use measurement::Measurement;
pub use format::{
    MeasureFormatter, DistanceFormatter, SpeedFormatter, SurfaceFormatter, TimeFormatter,
    VolumeFormatter, WeightFormatter, MagneticFluxDensityFormatter,
};
pub use time::CompositeFormatMode;

pub use metron_core::{Locale, LocaleFormatConfig, MeasureError, Number, RoundingMode, UnitSystem};
