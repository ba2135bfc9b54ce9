//! Peak-concentration source selection for a single drug record.
//!
//! In [`CmaxMode::DerivedFromAuc`] the peak is approximated as
//! `C0 = AUC · k`. This is the one-compartment, instantaneous-input
//! relationship; it does not hold in general for oral dosing, and the origin
//! of every resolved value is reported so the assumption stays visible.

use crate::calculators::elimination_constant;
use crate::config::ColumnKeys;
use crate::error::{PKError, PKResult};
use crate::record::DrugRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CmaxMode {
    #[default]
    Reported,
    DerivedFromAuc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmaxOrigin {
    Reported,
    DerivedFromAuc,
}

impl fmt::Display for CmaxOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmaxOrigin::Reported => write!(f, "Reported"),
            CmaxOrigin::DerivedFromAuc => write!(f, "Calculated from AUC"),
        }
    }
}

/// Non-fatal condition attached to a usable resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionWarning {
    /// AUC was missing or non-positive; the reported Cmax was used instead.
    AucUnavailable,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::AucUnavailable => {
                write!(f, "No valid AUC found for this drug. Using reported Cmax instead.")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCmax {
    pub value: f64,
    pub origin: CmaxOrigin,
    pub warning: Option<ResolutionWarning>,
    /// Extracted half-life [h], when the record has a positive one
    pub half_life: Option<f64>,
    /// ln(2) / half_life
    pub elimination_constant: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolverState {
    AwaitingInputs,
    Resolved(ResolvedCmax),
    Unresolvable(String),
}

/// Extracted inputs the resolution policy works from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CmaxInputs {
    pub cmax_reported: Option<f64>,
    pub half_life: Option<f64>,
    pub auc: Option<f64>,
}

impl CmaxInputs {
    pub fn from_record(record: &DrugRecord, columns: &ColumnKeys) -> Self {
        Self {
            cmax_reported: record.numeric(&columns.cmax),
            half_life: record.numeric(&columns.half_life),
            auc: record.numeric(&columns.auc),
        }
    }
}

/// Resolves Cmax for one record under one mode.
///
/// Starts in `AwaitingInputs`; [`CmaxResolver::resolve`] moves it to a
/// terminal `Resolved` or `Unresolvable` state.
#[derive(Debug, Clone)]
pub struct CmaxResolver {
    mode: CmaxMode,
    columns: ColumnKeys,
    state: ResolverState,
}

impl CmaxResolver {
    pub fn new(mode: CmaxMode, columns: ColumnKeys) -> Self {
        Self {
            mode,
            columns,
            state: ResolverState::AwaitingInputs,
        }
    }

    pub fn mode(&self) -> CmaxMode {
        self.mode
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    pub fn resolve(&mut self, record: &DrugRecord) -> PKResult<ResolvedCmax> {
        let inputs = CmaxInputs::from_record(record, &self.columns);
        debug!("Resolving Cmax for {} ({:?}): {:?}", record.name, self.mode, inputs);

        let outcome = resolve_inputs(&inputs, self.mode);
        self.state = match &outcome {
            Ok(resolved) => ResolverState::Resolved(resolved.clone()),
            Err(PKError::Unresolvable(reason)) => ResolverState::Unresolvable(reason.clone()),
            Err(other) => ResolverState::Unresolvable(other.to_string()),
        };

        if let Ok(ResolvedCmax { warning: Some(w), .. }) = &outcome {
            debug!("{}: {}", record.name, w);
        }
        outcome
    }
}

/// `resolveCmax(record, mode)` with the default column keywords.
pub fn resolve_cmax(record: &DrugRecord, mode: CmaxMode) -> PKResult<ResolvedCmax> {
    CmaxResolver::new(mode, ColumnKeys::default()).resolve(record)
}

/// The resolution policy over already extracted values.
pub fn resolve_inputs(inputs: &CmaxInputs, mode: CmaxMode) -> PKResult<ResolvedCmax> {
    let half_life = inputs.half_life.filter(|&t| t > 0.0);
    let k = half_life.map(elimination_constant).transpose()?;
    let reported = inputs.cmax_reported.filter(|&c| c > 0.0);

    match mode {
        CmaxMode::Reported => {
            let value = reported.ok_or_else(|| {
                PKError::Unresolvable("no positive reported Cmax".to_string())
            })?;
            Ok(ResolvedCmax {
                value,
                origin: CmaxOrigin::Reported,
                warning: None,
                half_life,
                elimination_constant: k,
            })
        },
        CmaxMode::DerivedFromAuc => {
            let k = k.ok_or_else(|| {
                PKError::Unresolvable(
                    "no positive half-life to derive the elimination constant".to_string(),
                )
            })?;

            if let Some(auc) = inputs.auc.filter(|&a| a > 0.0) {
                return Ok(ResolvedCmax {
                    value: auc * k,
                    origin: CmaxOrigin::DerivedFromAuc,
                    warning: None,
                    half_life,
                    elimination_constant: Some(k),
                });
            }

            let value = reported.ok_or_else(|| {
                PKError::Unresolvable(
                    "neither a positive AUC nor a positive reported Cmax".to_string(),
                )
            })?;
            Ok(ResolvedCmax {
                value,
                origin: CmaxOrigin::Reported,
                warning: Some(ResolutionWarning::AucUnavailable),
                half_life,
                elimination_constant: Some(k),
            })
        },
    }
}
