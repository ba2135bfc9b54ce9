pub mod bioavailability;
pub mod trough;
pub mod clearance;
pub mod half_life;

use crate::error::PKResult;
use serde::Serialize;

pub use bioavailability::{
    calculate_bioavailability, BioavailabilityRequest, BioavailabilityResult,
};
pub use trough::{estimate_cmin, CminRequest, CminResult};
pub use clearance::{calculate_clearance, ClearanceRequest, ClearanceResult};
pub use half_life::{
    convert_half_life_to_k, convert_k_to_half_life, elimination_constant, EliminationConstant,
    HalfLife, HalfLifeFromK, KFromHalfLife,
};

/// A one-compartment formula over direct numeric inputs.
///
/// Implementations validate every divisor before dividing and report
/// violations as `PKError::InvalidInput`.
pub trait Calculation {
    type Output: Serialize;

    fn name(&self) -> &'static str;
    fn calculate(&self) -> PKResult<Self::Output>;
}
