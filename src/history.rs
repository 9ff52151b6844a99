//! Persistent per-bond history.
//!
//! A style declares how many scalars each of its bonds carries. The
//! migration layer moves bonds between subdomains through
//! [`HistorySlots::pack_bond`] / [`HistorySlots::unpack_bond`], and restart
//! files store every record verbatim keyed by global atom ids.

use std::io::{Read, Write};

use log::debug;

use crate::{
    restart::{RestartReader, RestartWriter},
    Atoms, Bond, BondList, Error, TallyMode,
};

/// Largest integer an `f64` transfer value holds exactly
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Number of history values per bond, fixed for the lifetime of a style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistorySlots {
    count: usize,
}
impl HistorySlots {
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
    pub const fn none() -> Self {
        Self::new(0)
    }
    pub fn count(&self) -> usize {
        self.count
    }
    /// An empty bond list whose bonds carry this many values
    pub fn bond_list(&self) -> BondList {
        BondList::new(self.count)
    }

    /// Append the history of `bond` to `buf`, returning the number of
    /// values written
    pub fn pack(&self, bond: &Bond, buf: &mut Vec<f64>) -> usize {
        buf.extend_from_slice(bond.history());
        self.count
    }

    /// Restore the history of `bond` from the front of `buf`, returning the
    /// number of values read
    pub fn unpack(&self, bond: &mut Bond, buf: &[f64]) -> usize {
        assert!(
            buf.len() >= self.count,
            "History buffer holds {} values, {} needed",
            buf.len(),
            self.count
        );
        bond.history_mut().copy_from_slice(&buf[..self.count]);
        self.count
    }

    /// Remove bond `idx` from `bonds` and append it, history included, to
    /// the transfer buffer of a migrating atom
    pub fn pack_bond(&self, bonds: &mut BondList, idx: usize, atoms: &Atoms, buf: &mut Vec<f64>) -> usize {
        let bond = bonds.remove(idx);
        buf.push(atoms.ids[bond.i] as f64);
        buf.push(atoms.ids[bond.j] as f64);
        buf.push(bond.bond_type as f64);
        let n = 3 + self.pack(&bond, buf);
        debug!(
            "Packed bond {}-{} with {} history values",
            atoms.ids[bond.i], atoms.ids[bond.j], self.count
        );
        n
    }

    /// Re-create a bond packed by [`HistorySlots::pack_bond`] on the
    /// receiving subdomain, returning the number of values read
    pub fn unpack_bond(
        &self,
        bonds: &mut BondList,
        atoms: &Atoms,
        buf: &[f64],
        num_types: usize,
    ) -> Result<usize, Error> {
        if buf.len() < 3 + self.count {
            return Err(Error::restart(
                format!("{} values per bond", 3 + self.count),
                buf.len(),
            ));
        }
        let tag_i = whole(buf[0], "atom id")?;
        let tag_j = whole(buf[1], "atom id")?;
        let bond_type = check_type(whole(buf[2], "bond type")?, num_types)?;
        let i = lookup(atoms, tag_i)?;
        let j = lookup(atoms, tag_j)?;
        let mut bond = Bond::with_history(i, j, bond_type, vec![0.0; self.count]);
        let n = 3 + self.unpack(&mut bond, &buf[3..]);
        bonds.push(bond);
        Ok(n)
    }

    /// Write every bond with its history, keyed by global atom ids
    pub fn write_restart<W: Write>(
        &self,
        bonds: &BondList,
        atoms: &Atoms,
        out: &mut RestartWriter<W>,
    ) -> Result<(), Error> {
        out.write_usize(self.count)?;
        out.write_usize(bonds.len())?;
        for bond in bonds.iter() {
            out.write_usize(atoms.ids[bond.i])?;
            out.write_usize(atoms.ids[bond.j])?;
            out.write_usize(bond.bond_type)?;
            out.write_f64_slice(bond.history())?;
        }
        Ok(())
    }

    /// Read bonds written by [`HistorySlots::write_restart`] and keep the
    /// ones this subdomain evaluates, so any subdomain split can read a file
    /// written by any other. Under [`TallyMode::SingleCount`] that is every
    /// bond whose first atom is owned here; under [`TallyMode::DualCount`]
    /// every bond with at least one owned atom.
    pub fn read_restart<R: Read>(
        &self,
        input: &mut RestartReader<R>,
        atoms: &Atoms,
        mode: TallyMode,
        num_types: usize,
    ) -> Result<BondList, Error> {
        input.expect_usize("history values per bond", self.count)?;
        let nbonds = input.read_usize()?;
        let mut bonds = self.bond_list();
        for _ in 0..nbonds {
            let tag_i = input.read_usize()?;
            let tag_j = input.read_usize()?;
            let bond_type = check_type(input.read_usize()?, num_types)?;
            let history = input.read_f64_vec(self.count)?;

            let i = atoms.id_to_idx(tag_i);
            let j = atoms.id_to_idx(tag_j);
            let owned = |idx: Option<usize>| idx.is_some_and(|idx| atoms.is_local(idx));
            let keep = match mode {
                TallyMode::SingleCount => owned(i),
                TallyMode::DualCount => owned(i) || owned(j),
            };
            if keep {
                let i = lookup(atoms, tag_i)?;
                let j = lookup(atoms, tag_j)?;
                bonds.push(Bond::with_history(i, j, bond_type, history));
            }
        }
        debug!("Restored {} of {} bonds from restart", bonds.len(), nbonds);
        Ok(bonds)
    }
}

/// A transfer value that must hold a non-negative integer
fn whole(value: f64, what: &str) -> Result<usize, Error> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_EXACT_F64 {
        Ok(value as usize)
    } else {
        Err(Error::restart(format!("a whole {}", what), value))
    }
}

fn check_type(bond_type: usize, num_types: usize) -> Result<usize, Error> {
    if (1..=num_types).contains(&bond_type) {
        Ok(bond_type)
    } else {
        Err(Error::restart(
            format!("a bond type in 1..={}", num_types),
            bond_type,
        ))
    }
}

fn lookup(atoms: &Atoms, tag: usize) -> Result<usize, Error> {
    atoms
        .id_to_idx(tag)
        .ok_or_else(|| Error::restart("bond atom present on this subdomain", format!("missing atom {}", tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms() -> Atoms {
        let mut atoms = Atoms::new();
        atoms.add_atoms(vec![10, 11], vec![[0.0; 3], [1.0, 0.0, 0.0]]);
        atoms.add_ghosts(vec![12], vec![[2.0, 0.0, 0.0]]);
        atoms
    }

    #[test]
    fn pack_unpack_history() {
        let slots = HistorySlots::new(3);
        let mut bonds = slots.bond_list();
        bonds.add_bond(0, 1, 1);
        bonds.bonds_mut()[0].history_mut().copy_from_slice(&[1.0, -2.0, 3.5]);

        let mut buf = Vec::new();
        assert_eq!(slots.pack(&bonds.bonds()[0], &mut buf), 3);

        let mut fresh = slots.bond_list();
        fresh.add_bond(0, 1, 1);
        assert_eq!(slots.unpack(&mut fresh.bonds_mut()[0], &buf), 3);
        assert_eq!(fresh, bonds);
    }

    #[test]
    fn bond_migrates_with_history() {
        let slots = HistorySlots::new(2);
        let sender = atoms();
        let mut bonds = slots.bond_list();
        bonds.add_bond(0, 1, 1);
        bonds.add_bond(1, 2, 2);
        bonds.bonds_mut()[1].history_mut().copy_from_slice(&[0.5, 0.25]);

        let mut buf = Vec::new();
        let written = slots.pack_bond(&mut bonds, 1, &sender, &mut buf);
        assert_eq!(written, 5);
        assert_eq!(bonds.len(), 1);

        // receiver stores the same atoms in another order
        let mut receiver = Atoms::new();
        receiver.add_atoms(vec![12, 11], vec![[2.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let mut received = slots.bond_list();
        let read = slots.unpack_bond(&mut received, &receiver, &buf, 2).unwrap();
        assert_eq!(read, 5);
        let bond = &received.bonds()[0];
        assert_eq!((bond.i, bond.j, bond.bond_type), (1, 0, 2));
        assert_eq!(bond.history(), &[0.5, 0.25]);
    }

    #[test]
    fn restart_is_independent_of_the_split() {
        let slots = HistorySlots::new(1);
        let all = atoms();
        let mut bonds = slots.bond_list();
        bonds.add_bond(0, 1, 1);
        bonds.add_bond(1, 2, 1);
        bonds.bonds_mut()[0].history_mut()[0] = 4.0;
        bonds.bonds_mut()[1].history_mut()[0] = 5.0;

        let mut out = RestartWriter::new(Vec::new());
        slots.write_restart(&bonds, &all, &mut out).unwrap();
        let bytes = out.into_inner();

        // two subdomains: one owns 10 and 11, the other owns 12 with 11 as ghost
        let first = slots
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &all, TallyMode::SingleCount, 1)
            .unwrap();
        let mut other = Atoms::new();
        other.add_atoms(vec![12], vec![[2.0, 0.0, 0.0]]);
        other.add_ghosts(vec![11], vec![[1.0, 0.0, 0.0]]);
        let second = slots
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &other, TallyMode::SingleCount, 1)
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first.bonds()[0].history(), &[4.0]);
        assert_eq!(second.len(), 0);

        let mut swapped = slots.bond_list();
        swapped.add_bond(0, 1, 1);
        let mut out = RestartWriter::new(Vec::new());
        slots.write_restart(&swapped, &other, &mut out).unwrap();
        let bytes = out.into_inner();
        let back = slots
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &other, TallyMode::SingleCount, 1)
            .unwrap();
        assert_eq!(back, swapped);
    }

    #[test]
    fn restart_with_wrong_history_width_fails() {
        let all = atoms();
        let mut bonds = HistorySlots::new(2).bond_list();
        bonds.add_bond(0, 1, 1);
        let mut out = RestartWriter::new(Vec::new());
        HistorySlots::new(2)
            .write_restart(&bonds, &all, &mut out)
            .unwrap();
        let bytes = out.into_inner();

        let err = HistorySlots::new(3)
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &all, TallyMode::SingleCount, 1)
            .unwrap_err();
        assert!(matches!(err, Error::RestartFormat { .. }));
    }

    #[test]
    fn dual_count_keeps_bonds_of_either_owned_atom() {
        let slots = HistorySlots::new(2);
        // owns 12, sees 11 as a ghost, evaluates the shared bond from the ghost side
        let mut atoms = Atoms::new();
        atoms.add_atoms(vec![12], vec![[2.0, 0.0, 0.0]]);
        atoms.add_ghosts(vec![11], vec![[1.0, 0.0, 0.0]]);
        let mut bonds = slots.bond_list();
        bonds.add_bond(1, 0, 1);
        bonds.bonds_mut()[0].history_mut().copy_from_slice(&[0.0, -0.1]);

        let mut out = RestartWriter::new(Vec::new());
        slots.write_restart(&bonds, &atoms, &mut out).unwrap();
        let bytes = out.into_inner();

        let dual = slots
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &atoms, TallyMode::DualCount, 1)
            .unwrap();
        assert_eq!(dual, bonds);
        let single = slots
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &atoms, TallyMode::SingleCount, 1)
            .unwrap();
        assert!(single.is_empty());
    }

    #[test]
    fn out_of_range_bond_type_is_rejected() {
        let slots = HistorySlots::new(1);
        let all = atoms();
        let mut bonds = slots.bond_list();
        bonds.add_bond(0, 1, 7);
        let mut out = RestartWriter::new(Vec::new());
        slots.write_restart(&bonds, &all, &mut out).unwrap();
        let bytes = out.into_inner();

        for num_types in [1, 6] {
            let err = slots
                .read_restart(&mut RestartReader::new(bytes.as_slice()), &all, TallyMode::SingleCount, num_types)
                .unwrap_err();
            assert!(matches!(err, Error::RestartFormat { .. }));
        }
        assert!(slots
            .read_restart(&mut RestartReader::new(bytes.as_slice()), &all, TallyMode::SingleCount, 7)
            .is_ok());

        let mut received = slots.bond_list();
        for bad in [[10.0, 11.0, 0.0, 0.0], [10.0, 11.0, 2.0, 0.0]] {
            let err = slots.unpack_bond(&mut received, &all, &bad, 1).unwrap_err();
            assert!(matches!(err, Error::RestartFormat { .. }));
        }
        assert!(received.is_empty());
    }

    #[test]
    fn malformed_transfer_values_are_rejected() {
        let slots = HistorySlots::new(1);
        let all = atoms();
        let mut received = slots.bond_list();
        for bad in [
            [f64::NAN, 11.0, 1.0, 0.0],
            [-10.0, 11.0, 1.0, 0.0],
            [10.5, 11.0, 1.0, 0.0],
            [10.0, 1.0e300, 1.0, 0.0],
            [10.0, 11.0, 1.5, 0.0],
        ] {
            let err = slots.unpack_bond(&mut received, &all, &bad, 1).unwrap_err();
            assert!(matches!(err, Error::RestartFormat { .. }));
        }
        assert!(slots.unpack_bond(&mut received, &all, &[10.0, 11.0], 1).is_err());
        assert_eq!(slots.unpack_bond(&mut received, &all, &[10.0, 11.0, 1.0, 0.5], 1).unwrap(), 4);
        assert_eq!(received.bonds()[0].history(), &[0.5]);
    }
}
