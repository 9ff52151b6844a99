//! Per-bond-type coefficient storage

use std::io::{Read, Write};

use log::warn;

use crate::{
    restart::{RestartReader, RestartWriter},
    utils::TypeRange,
    Error,
};

/// Coefficients of one bond type for one style
pub trait CoeffRecord: Clone + Copy + Default + std::fmt::Debug {
    /// Names of the coefficients, in input and restart order
    const NAMES: &'static [&'static str];

    fn from_values(values: &[f64]) -> Self;
    fn values(&self) -> Vec<f64>;

    /// Validate parsed values; called after the argument count is checked
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    /// Parse the coefficient arguments of one `bond_coeff` line
    fn parse(args: &[&str]) -> Result<Self, String> {
        if args.len() != Self::NAMES.len() {
            return Err(format!(
                "Expected {} coefficients ({}), found {}",
                Self::NAMES.len(),
                Self::NAMES.join(" "),
                args.len()
            ));
        }
        let values = args
            .iter()
            .zip(Self::NAMES)
            .map(|(arg, name)| {
                arg.parse::<f64>()
                    .map_err(|_| format!("Invalid value '{}' for {}", arg, name))
            })
            .collect::<Result<Vec<f64>, String>>()?;
        let record = Self::from_values(&values);
        record.check()?;
        Ok(record)
    }
}

/// Coefficients for bond types `1..=num_types`, each with a set flag
#[derive(Clone, Debug)]
pub struct CoeffTable<C: CoeffRecord> {
    coeffs: Vec<C>,
    coeff_set: Vec<bool>,
    frozen: bool,
}
impl<C: CoeffRecord> CoeffTable<C> {
    pub fn new(num_types: usize) -> Self {
        Self {
            coeffs: vec![C::default(); num_types],
            coeff_set: vec![false; num_types],
            frozen: false,
        }
    }
    pub fn num_types(&self) -> usize {
        self.coeffs.len()
    }
    pub fn is_set(&self, bond_type: usize) -> bool {
        bond_type >= 1 && self.coeff_set.get(bond_type - 1).copied().unwrap_or(false)
    }
    pub fn all_set(&self) -> bool {
        self.coeff_set.iter().all(|&x| x)
    }
    /// Bond types that have no coefficients yet
    pub fn unset_types(&self) -> Vec<usize> {
        self.coeff_set
            .iter()
            .enumerate()
            .filter_map(|(n, set)| if *set { None } else { Some(n + 1) })
            .collect()
    }
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
    /// Make the table read-only for the rest of the run
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Coefficients of a configured type
    pub fn get(&self, bond_type: usize) -> Result<&C, Error> {
        if !self.is_set(bond_type) {
            return Err(Error::UnconfiguredType(bond_type));
        }
        Ok(&self.coeffs[bond_type - 1])
    }

    /// Coefficients inside the force loop, where the type was validated by
    /// the start-of-run gate
    #[inline]
    pub(crate) fn at(&self, bond_type: usize) -> &C {
        &self.coeffs[bond_type - 1]
    }

    pub fn set_coeff(&mut self, types: TypeRange, coeff: C) -> Result<(), Error> {
        if self.frozen {
            return Err(Error::config(
                types.min(),
                "Bond coefficients cannot change once the run has started",
            ));
        }
        for t in types.bounds(self.num_types())? {
            if self.coeff_set[t - 1] {
                warn!("Overwriting bond coefficients for type {}", t);
            }
            self.coeffs[t - 1] = coeff;
            self.coeff_set[t - 1] = true;
        }
        Ok(())
    }

    /// Parse `types` (a type or wildcard range) and its coefficient
    /// arguments; the last call for a type wins
    pub fn parse_coeff(&mut self, types: &str, args: &[&str]) -> Result<(), Error> {
        let range = TypeRange::parse(types)?;
        let coeff = C::parse(args).map_err(|message| Error::config(range.min(), message))?;
        self.set_coeff(range, coeff)
    }

    /// Mark types as configured without coefficients
    pub(crate) fn mark_set(&mut self, types: &str) -> Result<(), Error> {
        let range = TypeRange::parse(types)?;
        self.set_coeff(range, C::default())
    }

    pub fn write_restart<W: Write>(&self, out: &mut RestartWriter<W>) -> Result<(), Error> {
        out.write_usize(self.num_types())?;
        out.write_usize(C::NAMES.len())?;
        for (coeff, set) in self.coeffs.iter().zip(&self.coeff_set) {
            out.write_bool(*set)?;
            out.write_f64_slice(&coeff.values())?;
        }
        Ok(())
    }

    /// Replace the table with one read from a restart file written by a
    /// table of the same shape. The table is left untouched unless the
    /// whole block reads and validates.
    pub fn read_restart<R: Read>(&mut self, input: &mut RestartReader<R>) -> Result<(), Error> {
        input.expect_usize("number of bond types", self.num_types())?;
        input.expect_usize("coefficients per bond type", C::NAMES.len())?;
        let mut coeffs = Vec::with_capacity(self.num_types());
        let mut coeff_set = Vec::with_capacity(self.num_types());
        for n in 0..self.num_types() {
            let set = input.read_bool()?;
            let values = input.read_f64_vec(C::NAMES.len())?;
            let coeff = C::from_values(&values);
            if set {
                coeff
                    .check()
                    .map_err(|message| Error::restart("valid coefficients", format!("type {}: {}", n + 1, message)))?;
            }
            coeffs.push(coeff);
            coeff_set.push(set);
        }
        self.coeffs = coeffs;
        self.coeff_set = coeff_set;
        Ok(())
    }

    /// One text line per type: `<type> <coeff> ...`
    pub fn write_data<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), Error> {
        if C::NAMES.is_empty() {
            return Ok(());
        }
        for (n, coeff) in self.coeffs.iter().enumerate() {
            let values: Vec<String> = coeff.values().iter().map(|v| format!("{}", v)).collect();
            writeln!(out, "{} {}", n + 1, values.join(" "))?;
        }
        Ok(())
    }
}
impl<C: CoeffRecord + PartialEq> PartialEq for CoeffTable<C> {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs && self.coeff_set == other.coeff_set
    }
}
