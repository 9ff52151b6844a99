//! Bond styles.
//!
//! Every style implements [`BondPotentialTrait`]; [`BondPotential`] is the
//! closed set of styles, selected by name with [`BondPotential::create`].

pub mod gran;
pub mod harmonic;
pub mod zero;

pub use gran::{Gran, GranCoeff};
pub use harmonic::{Harmonic, HarmonicCoeff};
pub use zero::{Zero, ZeroCoeff};

use std::io::{Read, Write};

use enum_dispatch::enum_dispatch;

use crate::{
    coeff::{CoeffRecord, CoeffTable},
    history::HistorySlots,
    mask::CommMask,
    restart::{RestartReader, RestartWriter},
    Error,
};

/// Current state of one bond as seen by the force law
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BondPair {
    /// `x_i - x_j`
    pub del: [f64; 3],
    pub rsq: f64,
    pub vi: [f64; 3],
    pub vj: [f64; 3],
}
impl BondPair {
    pub fn new(del: [f64; 3]) -> Self {
        Self {
            del,
            rsq: del[0] * del[0] + del[1] * del[1] + del[2] * del[2],
            ..Default::default()
        }
    }
    pub fn with_velocities(mut self, vi: [f64; 3], vj: [f64; 3]) -> Self {
        self.vi = vi;
        self.vj = vj;
        self
    }
}

/// Result of the force law for one bond
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BondEval {
    pub energy: f64,
    /// Central force on `i` divided by the distance
    pub fbond: f64,
    /// Non-central force on `i`, if the style has one
    pub ftangential: Option<[f64; 3]>,
}

#[enum_dispatch]
#[derive(Clone, Debug)]
pub enum BondPotential {
    Harmonic,
    Zero,
    Gran,
}

#[enum_dispatch(BondPotential)]
/// Capabilities shared by all bond styles
pub trait BondPotentialTrait {
    /// Name used to select the style and to tag restart files
    fn style_name(&self) -> &'static str;

    /// Number of bond types the coefficient table covers
    fn num_types(&self) -> usize;

    /// Style-wide options
    fn settings(&mut self, args: &[&str]) -> Result<(), Error> {
        if args.is_empty() {
            Ok(())
        } else {
            Err(Error::config(
                None,
                format!("Illegal bond_style {} command", self.style_name()),
            ))
        }
    }

    /// Parse one coefficient line for `types` (a type or wildcard range)
    fn parse_coefficients(&mut self, types: &str, args: &[&str]) -> Result<(), Error>;

    /// Types without coefficients
    fn unset_types(&self) -> Vec<usize>;

    /// Forbid further coefficient changes
    fn freeze_coefficients(&mut self);

    /// Style-specific checks at the start of a run
    fn init_style(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn equilibrium_distance(&self, bond_type: usize) -> Result<f64, Error>;

    /// Force law of one bond inside the force loop. The type is known to be
    /// configured. `history` holds the bond's record and may be updated.
    fn bond_eval(&self, bond_type: usize, pair: &BondPair, history: &mut [f64], dt: f64) -> BondEval;

    /// Energy and `fbond` of an isolated bond at squared distance `rsq`
    fn single(&self, bond_type: usize, rsq: f64, i: usize, j: usize) -> Result<(f64, f64), Error>;

    fn write_restart(&self, out: &mut dyn Write) -> Result<(), Error>;
    fn read_restart(&mut self, input: &mut dyn Read) -> Result<(), Error>;

    /// Coefficients as data-file text
    fn write_data(&self, out: &mut dyn Write) -> Result<(), Error>;

    fn history_slots(&self) -> HistorySlots {
        HistorySlots::none()
    }

    fn comm_mask(&self) -> CommMask {
        CommMask::default()
    }

    /// Largest stable timestep for this style
    fn min_dt(&self) -> f64 {
        1.0
    }
}

impl BondPotential {
    /// Create a style by name for `num_types` bond types
    pub fn create(name: &str, num_types: usize) -> Result<Self, Error> {
        let style: BondPotential = match name {
            "harmonic" => Harmonic::new(num_types).into(),
            "zero" => Zero::new(num_types).into(),
            "gran" => Gran::new(num_types).into(),
            _ => return Err(Error::UnknownStyle(String::from(name))),
        };
        Ok(style)
    }
}

/// Restart block shared by the table-driven styles: style name, then table
pub(crate) fn write_table_restart<C: CoeffRecord>(
    name: &str,
    table: &CoeffTable<C>,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let mut out = RestartWriter::new(out);
    out.write_str(name)?;
    table.write_restart(&mut out)
}

pub(crate) fn read_table_restart<C: CoeffRecord>(
    name: &str,
    table: &mut CoeffTable<C>,
    input: &mut dyn Read,
) -> Result<(), Error> {
    let mut input = RestartReader::new(input);
    input.expect_str("bond style", name)?;
    table.read_restart(&mut input)
}
