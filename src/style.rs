use std::io::{Read, Write};

use log::info;
use rayon::prelude::*;

use crate::{
    accumulator::{Accumulator, EvFlags, TallyMode},
    bond::{BondPair, BondPotential, BondPotentialTrait},
    history::HistorySlots,
    mask::CommMask,
    restart::{RestartReader, RestartWriter},
    utils::delta,
    Atoms, Bond, BondList, Error,
};

/// What one force evaluation works on, supplied by the driver
pub struct BondContext<'a> {
    pub atoms: &'a Atoms,
    /// One entry per local and ghost atom
    pub forces: &'a mut [[f64; 3]],
    pub bonds: &'a mut BondList,
    pub mode: TallyMode,
    pub timestep: f64,
}
impl<'a> BondContext<'a> {
    pub fn new(atoms: &'a Atoms, forces: &'a mut [[f64; 3]], bonds: &'a mut BondList) -> Self {
        Self {
            atoms,
            forces,
            bonds,
            mode: TallyMode::SingleCount,
            timestep: 0.0,
        }
    }
    pub fn mode(mut self, mode: TallyMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }
}

/// A bond style together with the energy/virial totals it accumulates.
///
/// The driver configures it, calls [`BondStyle::init`] once before the
/// first step, then [`BondStyle::compute`] once per force evaluation and
/// reads the totals through [`BondStyle::accumulator`].
#[derive(Clone, Debug)]
pub struct BondStyle {
    potential: BondPotential,
    acc: Accumulator,
    history: HistorySlots,
    initialized: bool,
}
impl BondStyle {
    pub fn new(potential: BondPotential) -> Self {
        let history = potential.history_slots();
        Self {
            potential,
            acc: Accumulator::new(),
            history,
            initialized: false,
        }
    }
    /// Create a style by name, see [`BondPotential::create`]
    pub fn create(name: &str, num_types: usize) -> Result<Self, Error> {
        Ok(Self::new(BondPotential::create(name, num_types)?))
    }

    // Getters
    pub fn potential(&self) -> &BondPotential {
        &self.potential
    }
    pub fn name(&self) -> &'static str {
        self.potential.style_name()
    }
    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }
    pub fn energy(&self) -> f64 {
        self.acc.energy()
    }
    pub fn virial(&self) -> [f64; 6] {
        self.acc.virial()
    }
    pub fn eatom(&self) -> &[f64] {
        self.acc.eatom()
    }
    pub fn vatom(&self) -> &[[f64; 6]] {
        self.acc.vatom()
    }
    pub fn history_slots(&self) -> HistorySlots {
        self.history
    }
    pub fn comm_mask(&self) -> CommMask {
        self.potential.comm_mask()
    }
    pub fn data_mask(&self) -> u32 {
        self.comm_mask().datamask
    }
    pub fn data_mask_ext(&self) -> u32 {
        self.comm_mask().datamask_ext
    }
    pub fn min_dt(&self) -> f64 {
        self.potential.min_dt()
    }
    pub fn memory_usage(&self) -> usize {
        self.acc.memory_usage()
    }
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
    /// An empty bond list sized for this style's history
    pub fn bond_list(&self) -> BondList {
        self.history.bond_list()
    }

    // Configuration
    pub fn settings(&mut self, args: &[&str]) -> Result<(), Error> {
        if self.initialized {
            return Err(Error::config(
                None,
                format!("Bond style {} settings cannot change during a run", self.name()),
            ));
        }
        self.potential.settings(args)
    }
    pub fn parse_coefficients(&mut self, types: &str, args: &[&str]) -> Result<(), Error> {
        self.potential.parse_coefficients(types, args)
    }
    pub fn equilibrium_distance(&self, bond_type: usize) -> Result<f64, Error> {
        self.potential.equilibrium_distance(bond_type)
    }

    /// Start-of-run gate: every bond type must have coefficients. The
    /// coefficient table is read-only afterwards.
    pub fn init(&mut self) -> Result<(), Error> {
        let missing = self.potential.unset_types();
        if !missing.is_empty() {
            return Err(Error::FatalStartup {
                style: String::from(self.name()),
                missing,
            });
        }
        self.potential.init_style()?;
        self.potential.freeze_coefficients();
        self.initialized = true;
        info!(
            "Bond style {} initialized for {} bond types",
            self.name(),
            self.potential.num_types()
        );
        Ok(())
    }

    fn setup(&mut self, flags: EvFlags, ctx: &BondContext) {
        assert!(self.initialized, "Bond style must pass init before compute");
        let nall = ctx.atoms.num_atoms();
        assert!(
            ctx.forces.len() >= nall,
            "Force array holds {} atoms, {} needed",
            ctx.forces.len(),
            nall
        );
        assert!(
            ctx.bonds.num_history() == self.history.count(),
            "Bonds carry {} history values, style {} needs {}",
            ctx.bonds.num_history(),
            self.name(),
            self.history.count()
        );
        self.acc.ev_setup(flags, ctx.mode, ctx.atoms.nlocal, nall);
    }

    /// Evaluate all bonds: add forces, update bond histories and tally
    /// energy/virial as requested by `flags`
    pub fn compute(&mut self, flags: EvFlags, ctx: &mut BondContext) {
        self.setup(flags, ctx);
        compute_bonds(
            &self.potential,
            ctx.bonds.bonds_mut(),
            ctx.atoms,
            ctx.mode,
            ctx.timestep,
            ctx.forces,
            &mut self.acc,
        );
    }

    /// Same as [`BondStyle::compute`] with the bond list split into
    /// `nthreads` contiguous chunks evaluated in parallel. Each chunk tallies
    /// into private totals that are summed in chunk order afterwards.
    pub fn compute_threaded(&mut self, flags: EvFlags, ctx: &mut BondContext, nthreads: usize) {
        self.setup(flags, ctx);
        let nall = ctx.atoms.num_atoms();
        let nbonds = ctx.bonds.len();
        if nbonds == 0 {
            return;
        }
        let chunk = nbonds.div_ceil(nthreads.max(1));

        let template = &self.acc;
        let potential = &self.potential;
        let atoms = ctx.atoms;
        let (mode, dt) = (ctx.mode, ctx.timestep);
        let partials: Vec<(Accumulator, Vec<[f64; 3]>)> = ctx
            .bonds
            .bonds_mut()
            .par_chunks_mut(chunk)
            .map(|bonds| {
                let mut acc = template.thread_private();
                let mut forces = vec![[0.0; 3]; nall];
                compute_bonds(potential, bonds, atoms, mode, dt, &mut forces, &mut acc);
                (acc, forces)
            })
            .collect();

        for (acc, forces) in &partials {
            self.acc.merge(acc);
            for (f, df) in ctx.forces.iter_mut().zip(forces) {
                f[0] += df[0];
                f[1] += df[1];
                f[2] += df[2];
            }
        }
    }

    /// Energy and `fbond` of an isolated bond at squared distance `rsq`
    pub fn single(&self, bond_type: usize, rsq: f64, i: usize, j: usize) -> Result<(f64, f64), Error> {
        self.potential.single(bond_type, rsq, i, j)
    }

    // Restart and data files
    pub fn write_restart(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.potential.write_restart(out)
    }
    pub fn read_restart(&mut self, input: &mut dyn Read) -> Result<(), Error> {
        if self.initialized {
            return Err(Error::config(
                None,
                "Bond coefficients cannot be read from a restart during a run",
            ));
        }
        self.potential.read_restart(input)
    }
    pub fn write_history_restart(
        &self,
        bonds: &BondList,
        atoms: &Atoms,
        out: &mut dyn Write,
    ) -> Result<(), Error> {
        self.history
            .write_restart(bonds, atoms, &mut RestartWriter::new(out))
    }
    /// Restore the bonds this subdomain evaluates under `mode`, with their
    /// history
    pub fn read_history_restart(
        &self,
        input: &mut dyn Read,
        atoms: &Atoms,
        mode: TallyMode,
    ) -> Result<BondList, Error> {
        let bonds = self.history.read_restart(
            &mut RestartReader::new(input),
            atoms,
            mode,
            self.potential.num_types(),
        )?;
        info!("Read {} bonds for bond style {}", bonds.len(), self.name());
        Ok(bonds)
    }
    pub fn write_data(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.potential.write_data(out)
    }
}

/// Force loop over a run of bonds
fn compute_bonds(
    potential: &BondPotential,
    bonds: &mut [Bond],
    atoms: &Atoms,
    mode: TallyMode,
    dt: f64,
    forces: &mut [[f64; 3]],
    acc: &mut Accumulator,
) {
    let nlocal = atoms.nlocal;
    let evflag = acc.flags().evflag();

    for bond in bonds {
        let (i, j) = (bond.i, bond.j);
        let del = delta(&atoms.positions[i], &atoms.positions[j]);
        let pair = BondPair::new(del).with_velocities(atoms.velocities[i], atoms.velocities[j]);
        let eval = potential.bond_eval(bond.bond_type, &pair, bond.history_mut(), dt);

        let mut f = [del[0] * eval.fbond, del[1] * eval.fbond, del[2] * eval.fbond];
        if let Some(ft) = eval.ftangential {
            f[0] += ft[0];
            f[1] += ft[1];
            f[2] += ft[2];
        }
        if mode.credits(i, nlocal) {
            forces[i][0] += f[0];
            forces[i][1] += f[1];
            forces[i][2] += f[2];
        }
        if mode.credits(j, nlocal) {
            forces[j][0] -= f[0];
            forces[j][1] -= f[1];
            forces[j][2] -= f[2];
        }

        if evflag {
            acc.ev_tally(i, j, eval.energy, eval.fbond, del);
            if let Some(ft) = eval.ftangential {
                acc.ev_tally_xyz(i, j, 0.0, ft, del);
            }
        }
    }
}
