use std::fmt::Debug;

/// Per-atom arrays seen by one process.
///
/// Indices `0..nlocal` are owned by this process; indices `nlocal..` are
/// ghost copies of atoms owned by a neighboring subdomain, kept current by
/// the communication layer.
#[derive(Clone, Debug, Default)]
pub struct Atoms {
    pub ids: Vec<usize>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
    pub nlocal: usize,
}
impl Atoms {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn num_atoms(&self) -> usize {
        self.ids.len()
    }
    pub fn num_ghost_atoms(&self) -> usize {
        self.num_atoms() - self.nlocal
    }
    pub fn is_local(&self, idx: usize) -> bool {
        idx < self.nlocal
    }
    pub fn ids(&self) -> &Vec<usize> {
        &self.ids
    }
    pub fn id_to_idx(&self, id: usize) -> Option<usize> {
        self.ids.iter().position(|x| *x == id)
    }
    pub fn positions(&self) -> &Vec<[f64; 3]> {
        &self.positions
    }
    pub fn velocities(&self) -> &Vec<[f64; 3]> {
        &self.velocities
    }

    /// Add owned atoms. Owned atoms are kept in front of all ghosts.
    pub fn add_atoms(&mut self, ids: Vec<usize>, coords: Vec<[f64; 3]>) {
        assert!(
            ids.len() == coords.len(),
            "Number of ids and coordinates should be equal"
        );
        let num_atoms = coords.len();
        let at = self.nlocal;
        self.nlocal += num_atoms;
        self.ids.splice(at..at, ids);
        self.positions.splice(at..at, coords);
        self.velocities
            .splice(at..at, std::iter::repeat([0.0; 3]).take(num_atoms));
    }
    /// Append ghost copies of atoms owned elsewhere
    pub fn add_ghosts(&mut self, ids: Vec<usize>, coords: Vec<[f64; 3]>) {
        assert!(
            ids.len() == coords.len(),
            "Number of ids and coordinates should be equal"
        );
        let num_atoms = coords.len();
        self.ids.extend(ids);
        self.positions.extend(coords);
        self.velocities
            .extend(std::iter::repeat([0.0; 3]).take(num_atoms));
    }
    pub fn set_velocity(&mut self, i: usize, new_vel: [f64; 3]) {
        self.velocities[i] = new_vel;
    }
    pub fn remove_idxs(&mut self, atom_idxs: Vec<usize>) {
        let num_local = atom_idxs.iter().filter(|&i| *i < self.nlocal).count();
        self.nlocal -= num_local;
        fn filter_by_idx<T: Copy>(atom_idxs: &[usize], vec: &[T]) -> Vec<T> {
            vec.iter()
                .enumerate()
                .filter_map(|(i, x)| {
                    if atom_idxs.contains(&i) {
                        None
                    } else {
                        Some(*x)
                    }
                })
                .collect()
        }

        self.ids = filter_by_idx(&atom_idxs, &self.ids);
        self.positions = filter_by_idx(&atom_idxs, &self.positions);
        self.velocities = filter_by_idx(&atom_idxs, &self.velocities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_atoms_stay_in_front_of_ghosts() {
        let mut atoms = Atoms::new();
        atoms.add_atoms(vec![7], vec![[0.0; 3]]);
        atoms.add_ghosts(vec![9], vec![[1.0, 0.0, 0.0]]);
        atoms.add_atoms(vec![8], vec![[2.0, 0.0, 0.0]]);

        assert_eq!(atoms.ids(), &vec![7, 8, 9]);
        assert_eq!(atoms.nlocal, 2);
        assert_eq!(atoms.num_ghost_atoms(), 1);
        assert!(atoms.is_local(1));
        assert!(!atoms.is_local(2));
        assert_eq!(atoms.id_to_idx(9), Some(2));
    }

    #[test]
    fn remove_local_and_ghost() {
        let mut atoms = Atoms::new();
        atoms.add_atoms(vec![1, 2], vec![[0.0; 3], [1.0; 3]]);
        atoms.add_ghosts(vec![3], vec![[2.0; 3]]);
        atoms.remove_idxs(vec![0, 2]);
        assert_eq!(atoms.ids(), &vec![2]);
        assert_eq!(atoms.nlocal, 1);
        assert_eq!(atoms.positions()[0], [1.0; 3]);
    }
}
