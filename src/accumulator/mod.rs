//! Energy and virial accumulation for bonded interactions.
//!
//! One [`Accumulator`] belongs to one bond style. The driver calls
//! [`Accumulator::ev_setup`] once per force evaluation, the style tallies
//! every bond it visits, and reporting code reads the totals afterwards.

mod flags;

pub use flags::{EvFlags, TallyMode};

use log::debug;

use crate::utils::outer6;

/// Global and per-atom energy/virial totals of one force evaluation
#[derive(Clone, Debug)]
pub struct Accumulator {
    flags: EvFlags,
    mode: TallyMode,
    nlocal: usize,
    nall: usize,
    energy: f64,
    virial: [f64; 6],
    eatom: Vec<f64>,
    vatom: Vec<[f64; 6]>,
}
impl Accumulator {
    pub fn new() -> Self {
        Self {
            flags: EvFlags::none(),
            mode: TallyMode::SingleCount,
            nlocal: 0,
            nall: 0,
            energy: 0.0,
            virial: [0.0; 6],
            eatom: Vec::new(),
            vatom: Vec::new(),
        }
    }

    /// Reset all totals for a new force evaluation over `nall` local plus
    /// ghost atoms, of which the first `nlocal` are owned.
    ///
    /// Per-atom arrays grow when requested and too small, and are never
    /// shrunk.
    pub fn ev_setup(&mut self, flags: EvFlags, mode: TallyMode, nlocal: usize, nall: usize) {
        assert!(
            nlocal <= nall,
            "Owned atoms ({}) cannot exceed all atoms ({})",
            nlocal,
            nall
        );
        self.flags = flags;
        self.mode = mode;
        self.nlocal = nlocal;
        self.nall = nall;

        self.energy = 0.0;
        self.virial = [0.0; 6];

        if flags.eflag_atom {
            if nall > self.eatom.len() {
                debug!("Growing per-atom bond energy from {} to {}", self.eatom.len(), nall);
                self.eatom.resize(nall, 0.0);
            }
            self.eatom[..nall].fill(0.0);
        }
        if flags.vflag_atom {
            if nall > self.vatom.len() {
                debug!("Growing per-atom bond virial from {} to {}", self.vatom.len(), nall);
                self.vatom.resize(nall, [0.0; 6]);
            }
            self.vatom[..nall].fill([0.0; 6]);
        }
    }

    /// An empty accumulator with the same request, mode and atom counts,
    /// for one worker thread.
    pub fn thread_private(&self) -> Self {
        let mut acc = Self::new();
        acc.ev_setup(self.flags, self.mode, self.nlocal, self.nall);
        acc
    }

    /// Tally a central bond force.
    ///
    /// `fbond` is the force on atom `i` divided by the distance, `del` is
    /// `x_i - x_j`. Energy and virial are split in half between `i` and
    /// `j`; which halves this process keeps depends on the [`TallyMode`].
    pub fn ev_tally(&mut self, i: usize, j: usize, ebond: f64, fbond: f64, del: [f64; 3]) {
        if !self.flags.evflag() {
            return;
        }
        self.tally_energy(i, j, ebond);
        if self.flags.vflag_either() {
            let v = outer6(fbond, &del, &del);
            self.tally_virial(i, j, &v);
        }
    }

    /// Tally a force vector `f` acting on `i` (and `-f` on `j`) that need
    /// not point along the bond.
    pub fn ev_tally_xyz(&mut self, i: usize, j: usize, ebond: f64, f: [f64; 3], del: [f64; 3]) {
        if !self.flags.evflag() {
            return;
        }
        self.tally_energy(i, j, ebond);
        if self.flags.vflag_either() {
            let v = outer6(1.0, &del, &f);
            self.tally_virial(i, j, &v);
        }
    }

    fn check_indices(&self, i: usize, j: usize) {
        assert!(
            i < self.nall && j < self.nall,
            "Bond atoms ({}, {}) outside of the {} atoms set up for tallying",
            i,
            j,
            self.nall
        );
    }

    fn tally_energy(&mut self, i: usize, j: usize, ebond: f64) {
        if !self.flags.eflag_either() {
            return;
        }
        self.check_indices(i, j);
        let credit_i = self.mode.credits(i, self.nlocal);
        let credit_j = self.mode.credits(j, self.nlocal);
        let ebondhalf = 0.5 * ebond;

        if self.flags.eflag_global {
            match self.mode {
                TallyMode::SingleCount => self.energy += ebond,
                TallyMode::DualCount => {
                    if credit_i {
                        self.energy += ebondhalf;
                    }
                    if credit_j {
                        self.energy += ebondhalf;
                    }
                }
            }
        }
        if self.flags.eflag_atom {
            if credit_i {
                self.eatom[i] += ebondhalf;
            }
            if credit_j {
                self.eatom[j] += ebondhalf;
            }
        }
    }

    fn tally_virial(&mut self, i: usize, j: usize, v: &[f64; 6]) {
        self.check_indices(i, j);
        let credit_i = self.mode.credits(i, self.nlocal);
        let credit_j = self.mode.credits(j, self.nlocal);

        if self.flags.vflag_global {
            match self.mode {
                TallyMode::SingleCount => add6(&mut self.virial, v, 1.0),
                TallyMode::DualCount => {
                    if credit_i {
                        add6(&mut self.virial, v, 0.5);
                    }
                    if credit_j {
                        add6(&mut self.virial, v, 0.5);
                    }
                }
            }
        }
        if self.flags.vflag_atom {
            if credit_i {
                add6(&mut self.vatom[i], v, 0.5);
            }
            if credit_j {
                add6(&mut self.vatom[j], v, 0.5);
            }
        }
    }

    /// Sum a thread-private accumulator into this one
    pub fn merge(&mut self, other: &Accumulator) {
        assert!(
            self.nall == other.nall && self.flags == other.flags,
            "Only accumulators set up for the same step can be merged"
        );
        self.energy += other.energy;
        add6(&mut self.virial, &other.virial, 1.0);
        if self.flags.eflag_atom {
            for (a, b) in self.eatom[..self.nall].iter_mut().zip(other.eatom()) {
                *a += b;
            }
        }
        if self.flags.vflag_atom {
            for (a, b) in self.vatom[..self.nall].iter_mut().zip(other.vatom()) {
                add6(a, b, 1.0);
            }
        }
    }

    // Getters
    pub fn flags(&self) -> EvFlags {
        self.flags
    }
    pub fn mode(&self) -> TallyMode {
        self.mode
    }
    pub fn nlocal(&self) -> usize {
        self.nlocal
    }
    pub fn nall(&self) -> usize {
        self.nall
    }
    pub fn energy(&self) -> f64 {
        self.energy
    }
    /// Virial as xx, yy, zz, xy, xz, yz
    pub fn virial(&self) -> [f64; 6] {
        self.virial
    }
    /// Per-atom energy of the current step, empty unless requested
    pub fn eatom(&self) -> &[f64] {
        if self.flags.eflag_atom {
            &self.eatom[..self.nall]
        } else {
            &[]
        }
    }
    /// Per-atom virial of the current step, empty unless requested
    pub fn vatom(&self) -> &[[f64; 6]] {
        if self.flags.vflag_atom {
            &self.vatom[..self.nall]
        } else {
            &[]
        }
    }
    /// Bytes held by the per-atom arrays
    pub fn memory_usage(&self) -> usize {
        self.eatom.capacity() * std::mem::size_of::<f64>()
            + self.vatom.capacity() * std::mem::size_of::<[f64; 6]>()
    }
}
impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn add6(target: &mut [f64; 6], v: &[f64; 6], scale: f64) {
    for (t, x) in target.iter_mut().zip(v) {
        *t += scale * x;
    }
}
