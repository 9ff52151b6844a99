//! Bond instances supplied by the topology builder

/// A persistent bond between atoms `i` and `j` (local or ghost indices),
/// carrying its history record
#[derive(Clone, Debug, PartialEq)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub bond_type: usize,
    history: Vec<f64>,
}
impl Bond {
    pub(crate) fn with_history(i: usize, j: usize, bond_type: usize, history: Vec<f64>) -> Self {
        Self {
            i,
            j,
            bond_type,
            history,
        }
    }
    pub fn history(&self) -> &[f64] {
        &self.history
    }
    pub(crate) fn history_mut(&mut self) -> &mut [f64] {
        &mut self.history
    }
}

/// Ordered list of the bonds this process evaluates each step.
///
/// The order is the visitation order of the force loop, so it must be
/// stable across identical runs for reproducible energy sums.
#[derive(Clone, Debug, PartialEq)]
pub struct BondList {
    bonds: Vec<Bond>,
    num_history: usize,
}
impl BondList {
    /// An empty list whose bonds carry `num_history` history values each
    pub fn new(num_history: usize) -> Self {
        Self {
            bonds: Vec::new(),
            num_history,
        }
    }
    pub fn num_history(&self) -> usize {
        self.num_history
    }
    pub fn len(&self) -> usize {
        self.bonds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }
    pub(crate) fn bonds_mut(&mut self) -> &mut [Bond] {
        &mut self.bonds
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Bond> {
        self.bonds.iter()
    }

    /// Create a bond; its history starts at zero
    pub fn add_bond(&mut self, i: usize, j: usize, bond_type: usize) {
        assert!(bond_type >= 1, "Bond types start at 1");
        self.bonds.push(Bond::with_history(
            i,
            j,
            bond_type,
            vec![0.0; self.num_history],
        ));
    }

    pub(crate) fn push(&mut self, bond: Bond) {
        assert!(
            bond.history.len() == self.num_history,
            "Bond history length {} does not match {}",
            bond.history.len(),
            self.num_history
        );
        self.bonds.push(bond);
    }

    /// Remove a bond, keeping the order of the rest
    pub fn remove(&mut self, idx: usize) -> Bond {
        self.bonds.remove(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bonds_have_zeroed_history() {
        let mut bonds = BondList::new(3);
        bonds.add_bond(0, 1, 1);
        assert_eq!(bonds.bonds()[0].history(), &[0.0; 3]);

        let mut plain = BondList::new(0);
        plain.add_bond(0, 1, 2);
        assert!(plain.bonds()[0].history().is_empty());
    }

    #[test]
    fn remove_keeps_order() {
        let mut bonds = BondList::new(0);
        bonds.add_bond(0, 1, 1);
        bonds.add_bond(1, 2, 1);
        bonds.add_bond(2, 3, 1);
        bonds.remove(0);
        let pairs: Vec<(usize, usize)> = bonds.iter().map(|b| (b.i, b.j)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
    }
}
