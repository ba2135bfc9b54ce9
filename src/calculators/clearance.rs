//! Total body clearance: CL = F · Dose / AUC.

use super::Calculation;
use crate::error::{require_positive, PKResult};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceRequest {
    pub dose: f64,
    /// Bioavailability fraction, 1.0 for IV administration
    pub f: f64,
    pub auc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceResult {
    pub cl: f64,
}

pub fn calculate_clearance(dose: f64, f: f64, auc: f64) -> PKResult<ClearanceResult> {
    let auc = require_positive("AUC", auc)?;
    let cl = f * dose / auc;
    debug!("Clearance CL = {:.4}", cl);
    Ok(ClearanceResult { cl })
}

impl Calculation for ClearanceRequest {
    type Output = ClearanceResult;

    fn name(&self) -> &'static str {
        "Clearance (CL)"
    }

    fn calculate(&self) -> PKResult<ClearanceResult> {
        calculate_clearance(self.dose, self.f, self.auc)
    }
}
