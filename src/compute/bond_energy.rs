use super::{ComputeTrait, ComputeValue};
use crate::Accumulator;

/// Global bond energy of this process
#[derive(Clone, Debug, PartialEq)]
pub struct BondEnergy {}

impl ComputeTrait for BondEnergy {
    fn name(&self) -> &'static str {
        "ebond"
    }
    fn compute(&self, acc: &Accumulator) -> ComputeValue {
        ComputeValue::Float(acc.energy())
    }
}
