use super::{ComputeTrait, ComputeValue};
use crate::Accumulator;

/// Global bond virial of this process, xx, yy, zz, xy, xz, yz
#[derive(Clone, Debug, PartialEq)]
pub struct BondVirial {}

impl ComputeTrait for BondVirial {
    fn name(&self) -> &'static str {
        "vbond"
    }
    fn compute(&self, acc: &Accumulator) -> ComputeValue {
        ComputeValue::Tensor(acc.virial())
    }
}
