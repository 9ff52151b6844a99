//! Read-only consumers of the totals of a finished force evaluation

use enum_dispatch::enum_dispatch;

use crate::Accumulator;

mod bond_energy;
mod bond_virial;
mod local_energy;

pub use bond_energy::BondEnergy;
pub use bond_virial::BondVirial;
pub use local_energy::LocalAtomEnergy;

#[derive(Clone, Debug, PartialEq)]
pub enum ComputeValue {
    Float(f64),
    Tensor([f64; 6]),
}

#[enum_dispatch]
#[derive(Clone, Debug, PartialEq)]
pub enum Compute {
    BondEnergy,
    BondVirial,
    LocalAtomEnergy,
}

#[enum_dispatch(Compute)]
pub trait ComputeTrait {
    fn name(&self) -> &'static str;
    fn compute(&self, acc: &Accumulator) -> ComputeValue;
}
