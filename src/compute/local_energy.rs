use super::{ComputeTrait, ComputeValue};
use crate::Accumulator;

/// Sum of per-atom bond energy over the atoms this process owns.
///
/// Ghost slots are left out: under single counting they still hold shares
/// that reverse communication has to fold into their owners.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalAtomEnergy {}

impl ComputeTrait for LocalAtomEnergy {
    fn name(&self) -> &'static str {
        "ebond/atom"
    }
    fn compute(&self, acc: &Accumulator) -> ComputeValue {
        let eatom = acc.eatom();
        let nlocal = acc.nlocal().min(eatom.len());
        ComputeValue::Float(eatom[..nlocal].iter().sum())
    }
}
