pub use super::accumulator::{Accumulator, EvFlags, TallyMode};
pub use super::atoms::Atoms;
pub use super::bond::{BondPotential, BondPotentialTrait};
pub use super::compute::{Compute, ComputeTrait, ComputeValue};
pub use super::error::Error;
pub use super::history::HistorySlots;
pub use super::style::{BondContext, BondStyle};
pub use super::topology::{Bond, BondList};
