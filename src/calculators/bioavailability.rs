//! Absolute bioavailability from paired oral and IV exposure.
//!
//! F = (AUC_oral · Dose_IV) / (AUC_IV · Dose_oral)

use super::Calculation;
use crate::error::{require_positive, PKResult};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BioavailabilityRequest {
    pub auc_oral: f64,
    pub dose_oral: f64,
    pub auc_iv: f64,
    pub dose_iv: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BioavailabilityResult {
    /// Fraction absorbed (0-1 for physiological inputs)
    pub f: f64,
    pub f_percent: f64,
}

/// AUC_oral may be zero (F = 0); both doses and AUC_IV must be positive.
pub fn calculate_bioavailability(
    auc_oral: f64,
    dose_oral: f64,
    auc_iv: f64,
    dose_iv: f64,
) -> PKResult<BioavailabilityResult> {
    let dose_oral = require_positive("Oral dose", dose_oral)?;
    let auc_iv = require_positive("IV AUC", auc_iv)?;
    let dose_iv = require_positive("IV dose", dose_iv)?;

    let f = (auc_oral * dose_iv) / (auc_iv * dose_oral);
    debug!("Bioavailability F = {:.4}", f);

    Ok(BioavailabilityResult {
        f,
        f_percent: f * 100.0,
    })
}

impl Calculation for BioavailabilityRequest {
    type Output = BioavailabilityResult;

    fn name(&self) -> &'static str {
        "Bioavailability (F)"
    }

    fn calculate(&self) -> PKResult<BioavailabilityResult> {
        calculate_bioavailability(self.auc_oral, self.dose_oral, self.auc_iv, self.dose_iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PKError;
    use approx::assert_relative_eq;

    #[test]
    fn test_oral_vs_iv() {
        let result = calculate_bioavailability(500.0, 100.0, 400.0, 50.0).unwrap();
        assert_relative_eq!(result.f, 0.625, epsilon = 1e-12);
        assert_relative_eq!(result.f_percent, 62.5, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_oral_auc_gives_zero() {
        let result = calculate_bioavailability(0.0, 100.0, 400.0, 50.0).unwrap();
        assert_eq!(result.f, 0.0);
        assert_eq!(result.f_percent, 0.0);
    }

    #[test]
    fn test_rejects_non_positive_divisors() {
        let cases = [(0.0, 400.0, 50.0), (100.0, 0.0, 50.0), (100.0, 400.0, -1.0)];
        for (dose_oral, auc_iv, dose_iv) in cases {
            let result = calculate_bioavailability(500.0, dose_oral, auc_iv, dose_iv);
            assert!(matches!(result, Err(PKError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_request() {
        let request = BioavailabilityRequest {
            auc_oral: 300.0,
            dose_oral: 200.0,
            auc_iv: 300.0,
            dose_iv: 100.0,
        };
        assert_relative_eq!(request.calculate().unwrap().f, 0.5, epsilon = 1e-12);
    }
}
