use std::io::{Read, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{read_table_restart, write_table_restart, BondEval, BondPair, BondPotentialTrait};
use crate::{
    coeff::{CoeffRecord, CoeffTable},
    mask::{CommMask, X_MASK},
    Error,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ZeroCoeff {
    /// Equilibrium distance reported to other commands
    pub r0: f64,
}
impl CoeffRecord for ZeroCoeff {
    const NAMES: &'static [&'static str] = &["r0"];
    fn from_values(values: &[f64]) -> Self {
        Self { r0: values[0] }
    }
    fn values(&self) -> Vec<f64> {
        vec![self.r0]
    }
    fn parse(args: &[&str]) -> Result<Self, String> {
        match args {
            [] => Ok(Self::default()),
            [r0] => r0
                .parse::<f64>()
                .map(|r0| Self { r0 })
                .map_err(|_| format!("Invalid value '{}' for r0", r0)),
            _ => Err(format!("Expected at most 1 coefficient (r0), found {}", args.len())),
        }
    }
}

/// Bonds that exist in the topology but exert no force
#[derive(Clone, Debug)]
pub struct Zero {
    coeffs: CoeffTable<ZeroCoeff>,
    coeff_flag: bool,
}
impl Zero {
    pub fn new(num_types: usize) -> Self {
        Self {
            coeffs: CoeffTable::new(num_types),
            coeff_flag: true,
        }
    }
}

impl BondPotentialTrait for Zero {
    fn style_name(&self) -> &'static str {
        "zero"
    }
    fn num_types(&self) -> usize {
        self.coeffs.num_types()
    }
    fn settings(&mut self, args: &[&str]) -> Result<(), Error> {
        match args {
            [] => self.coeff_flag = true,
            ["nocoeff"] => self.coeff_flag = false,
            _ => return Err(Error::config(None, "Illegal bond_style zero command")),
        }
        Ok(())
    }
    fn parse_coefficients(&mut self, types: &str, args: &[&str]) -> Result<(), Error> {
        if self.coeff_flag {
            self.coeffs.parse_coeff(types, args)
        } else {
            self.coeffs.mark_set(types)
        }
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
    fn bond_eval(&self, _bond_type: usize, _pair: &BondPair, _history: &mut [f64], _dt: f64) -> BondEval {
        BondEval::default()
    }
    fn single(&self, bond_type: usize, _rsq: f64, _i: usize, _j: usize) -> Result<(f64, f64), Error> {
        self.coeffs.get(bond_type)?;
        Ok((0.0, 0.0))
    }
    fn write_restart(&self, out: &mut dyn Write) -> Result<(), Error> {
        write_table_restart(self.style_name(), &self.coeffs, out)
    }
    fn read_restart(&mut self, input: &mut dyn Read) -> Result<(), Error> {
        read_table_restart("zero", &mut self.coeffs, input)
    }
    fn write_data(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.coeffs.write_data(out)
    }
    fn comm_mask(&self) -> CommMask {
        CommMask::new(X_MASK)
    }
}
