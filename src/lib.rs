//! Bonded interactions for a particle simulation: bond styles, their
//! coefficient tables, per-bond history and the energy/virial tally.
//!
//! A run configures a [`BondStyle`], passes [`BondStyle::init`] and then
//! calls [`BondStyle::compute`] once per step with the atoms and bonds of
//! one subdomain.

pub mod accumulator;
pub mod atoms;
pub mod bond;
pub mod coeff;
pub mod compute;
pub mod error;
pub mod history;
pub mod mask;
pub mod prelude;
pub mod restart;
pub mod style;
pub mod topology;
pub mod utils;

pub use accumulator::{Accumulator, EvFlags, TallyMode};
pub use atoms::Atoms;
pub use bond::{BondPotential, BondPotentialTrait};
pub use error::Error;
pub use history::HistorySlots;
pub use mask::CommMask;
pub use style::{BondContext, BondStyle};
pub use topology::{Bond, BondList};
