//! Trough concentration at the end of a dosing interval.
//!
//! Cmin = Cmax · e^(-k·Δt), with k = ln(2) / t½.

use super::half_life::elimination_constant;
use super::Calculation;
use crate::error::PKResult;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CminRequest {
    pub cmax: f64,
    pub t_half: f64,
    /// Time since peak / dosing interval [h]
    pub interval_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CminResult {
    pub k: f64,
    pub cmin: f64,
}

/// Cmax is not range-checked here; a negative peak is the caller's call.
pub fn estimate_cmin(cmax: f64, t_half: f64, interval_hours: f64) -> PKResult<CminResult> {
    let k = elimination_constant(t_half)?;
    let cmin = cmax * (-k * interval_hours).exp();
    debug!("k = {:.4} /h, Cmin after {} h = {:.2}", k, interval_hours, cmin);
    Ok(CminResult { k, cmin })
}

impl Calculation for CminRequest {
    type Output = CminResult;

    fn name(&self) -> &'static str {
        "Cmin (Trough)"
    }

    fn calculate(&self) -> PKResult<CminResult> {
        estimate_cmin(self.cmax, self.t_half, self.interval_hours)
    }
}
