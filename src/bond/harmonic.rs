use std::io::{Read, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{read_table_restart, write_table_restart, BondEval, BondPair, BondPotentialTrait};
use crate::{
    coeff::{CoeffRecord, CoeffTable},
    mask::{CommMask, F_MASK, X_MASK},
    Error,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(deny_unknown_fields))]
pub struct HarmonicCoeff {
    /// Spring constant, including the factor 1/2
    pub k: f64,
    /// Equilibrium distance
    pub r0: f64,
}
impl HarmonicCoeff {
    pub fn new(k: f64, r0: f64) -> Self {
        Self { k, r0 }
    }
    /// E = K (r - r0)², returned with fbond = -dE/dr / r
    #[inline(always)]
    fn energy_and_fbond(&self, rsq: f64) -> (f64, f64) {
        let r = rsq.sqrt();
        let dr = r - self.r0;
        let rk = self.k * dr;
        let fbond = if r > 0.0 { -2.0 * rk / r } else { 0.0 };
        (rk * dr, fbond)
    }
}
impl CoeffRecord for HarmonicCoeff {
    const NAMES: &'static [&'static str] = &["K", "r0"];
    fn from_values(values: &[f64]) -> Self {
        Self::new(values[0], values[1])
    }
    fn values(&self) -> Vec<f64> {
        vec![self.k, self.r0]
    }
    fn check(&self) -> Result<(), String> {
        if self.r0 < 0.0 {
            return Err(format!("Equilibrium distance {} is negative", self.r0));
        }
        Ok(())
    }
}

/// Harmonic spring bond
#[derive(Clone, Debug)]
pub struct Harmonic {
    coeffs: CoeffTable<HarmonicCoeff>,
}
impl Harmonic {
    pub fn new(num_types: usize) -> Self {
        Self {
            coeffs: CoeffTable::new(num_types),
        }
    }
    pub fn coeffs(&self) -> &CoeffTable<HarmonicCoeff> {
        &self.coeffs
    }
}

impl BondPotentialTrait for Harmonic {
    fn style_name(&self) -> &'static str {
        "harmonic"
    }
    fn num_types(&self) -> usize {
        self.coeffs.num_types()
    }
    fn parse_coefficients(&mut self, types: &str, args: &[&str]) -> Result<(), Error> {
        self.coeffs.parse_coeff(types, args)
    }
    fn unset_types(&self) -> Vec<usize> {
        self.coeffs.unset_types()
    }
    fn freeze_coefficients(&mut self) {
        self.coeffs.freeze();
    }
    fn equilibrium_distance(&self, bond_type: usize) -> Result<f64, Error> {
        Ok(self.coeffs.get(bond_type)?.r0)
    }
    fn bond_eval(&self, bond_type: usize, pair: &BondPair, _history: &mut [f64], _dt: f64) -> BondEval {
        let (energy, fbond) = self.coeffs.at(bond_type).energy_and_fbond(pair.rsq);
        BondEval {
            energy,
            fbond,
            ftangential: None,
        }
    }
    fn single(&self, bond_type: usize, rsq: f64, _i: usize, _j: usize) -> Result<(f64, f64), Error> {
        Ok(self.coeffs.get(bond_type)?.energy_and_fbond(rsq))
    }
    fn write_restart(&self, out: &mut dyn Write) -> Result<(), Error> {
        write_table_restart(self.style_name(), &self.coeffs, out)
    }
    fn read_restart(&mut self, input: &mut dyn Read) -> Result<(), Error> {
        read_table_restart("harmonic", &mut self.coeffs, input)
    }
    fn write_data(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.coeffs.write_data(out)
    }
    fn comm_mask(&self) -> CommMask {
        CommMask::new(X_MASK | F_MASK)
    }
}
