//! Pharmacokinetic reference-data engine.
//!
//! Numeric extraction from free-text drug tables, one-compartment formula
//! calculators, Cmax source resolution and exponential-decay curve sampling.
//! Every operation is a pure function of its inputs.

pub mod calculators;
pub mod catalog;
pub mod config;
pub mod curve;
pub mod error;
pub mod extract;
pub mod output;
pub mod record;
pub mod resolver;

pub use calculators::{
    calculate_bioavailability, calculate_clearance, convert_half_life_to_k, convert_k_to_half_life,
    estimate_cmin, Calculation,
};
pub use catalog::DrugCatalog;
pub use config::{ColumnKeys, EngineConfig};
pub use curve::{generate_curve, plot_record, CurveSample, PlottedCurve, DEFAULT_SAMPLE_COUNT};
pub use error::{PKError, PKResult};
pub use extract::{extract_numeric, extract_strict, find_ambiguity, AmbiguousValue, RawValue};
pub use record::{DrugRecord, ParameterValue};
pub use resolver::{
    resolve_cmax, CmaxMode, CmaxOrigin, CmaxResolver, ResolutionWarning, ResolvedCmax,
};
