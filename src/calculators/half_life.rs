//! Half-life and first-order elimination constant interconversion.
//!
//! `t½ = ln(2) / k` and `k = ln(2) / t½`, using the exact `ln(2)`.

use super::Calculation;
use crate::error::{require_positive, PKResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// Request: elimination constant from a half-life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KFromHalfLife {
    /// Elimination half-life [h]
    pub t_half: f64,
}

/// Request: half-life from an elimination constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfLifeFromK {
    /// Elimination rate constant [1/h]
    pub k: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EliminationConstant {
    /// Elimination rate constant [1/h]
    pub k: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfLife {
    /// Elimination half-life [h]
    pub t_half: f64,
}

/// `k = ln(2) / t½`, shared by every module that needs the elimination constant.
pub fn elimination_constant(t_half: f64) -> PKResult<f64> {
    let t_half = require_positive("Half-life", t_half)?;
    Ok(LN_2 / t_half)
}

pub fn convert_half_life_to_k(t_half: f64) -> PKResult<EliminationConstant> {
    let k = elimination_constant(t_half)?;
    debug!("t½ = {} h -> k = {:.6} /h", t_half, k);
    Ok(EliminationConstant { k })
}

pub fn convert_k_to_half_life(k: f64) -> PKResult<HalfLife> {
    let k = require_positive("Elimination constant", k)?;
    let t_half = LN_2 / k;
    debug!("k = {} /h -> t½ = {:.4} h", k, t_half);
    Ok(HalfLife { t_half })
}

impl Calculation for KFromHalfLife {
    type Output = EliminationConstant;

    fn name(&self) -> &'static str {
        "Elimination Constant (k)"
    }

    fn calculate(&self) -> PKResult<EliminationConstant> {
        convert_half_life_to_k(self.t_half)
    }
}

impl Calculation for HalfLifeFromK {
    type Output = HalfLife;

    fn name(&self) -> &'static str {
        "Half-Life (t½)"
    }

    fn calculate(&self) -> PKResult<HalfLife> {
        convert_k_to_half_life(self.k)
    }
}
