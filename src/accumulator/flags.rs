/// Energy and virial request switches for one force evaluation.
///
/// Mirrors the integer `eflag`/`vflag` convention of the driver: bit 1 of
/// `eflag` asks for the global energy, bit 2 for per-atom energy; `vflag`
/// values 1 or 2 ask for the global virial and bit 4 for per-atom virial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvFlags {
    pub eflag_global: bool,
    pub eflag_atom: bool,
    pub vflag_global: bool,
    pub vflag_atom: bool,
}
impl EvFlags {
    /// Nothing requested
    pub fn none() -> Self {
        Self::default()
    }
    /// Decode the driver's integer flags
    ///
    /// ```rust
    /// use jbond::EvFlags;
    ///
    /// let flags = EvFlags::from_raw(3, 4);
    /// assert!(flags.eflag_global && flags.eflag_atom);
    /// assert!(!flags.vflag_global && flags.vflag_atom);
    /// ```
    pub fn from_raw(eflag: u32, vflag: u32) -> Self {
        Self {
            eflag_global: eflag % 2 == 1,
            eflag_atom: eflag / 2 % 2 == 1,
            vflag_global: vflag % 4 != 0,
            vflag_atom: vflag / 4 % 2 == 1,
        }
    }
    pub fn global_energy(mut self) -> Self {
        self.eflag_global = true;
        self
    }
    pub fn per_atom_energy(mut self) -> Self {
        self.eflag_atom = true;
        self
    }
    pub fn global_virial(mut self) -> Self {
        self.vflag_global = true;
        self
    }
    pub fn per_atom_virial(mut self) -> Self {
        self.vflag_atom = true;
        self
    }
    /// Everything requested
    pub fn all() -> Self {
        Self::none()
            .global_energy()
            .per_atom_energy()
            .global_virial()
            .per_atom_virial()
    }
    pub fn eflag_either(&self) -> bool {
        self.eflag_global || self.eflag_atom
    }
    pub fn vflag_either(&self) -> bool {
        self.vflag_global || self.vflag_atom
    }
    /// True if any tallying is needed this step
    pub fn evflag(&self) -> bool {
        self.eflag_either() || self.vflag_either()
    }
}

/// Double-counting policy for bonds that straddle a subdomain boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyMode {
    /// Each bond is evaluated by exactly one process (newton_bond on).
    /// Ghost endpoints are credited in their ghost slot and folded into
    /// the owner by reverse communication.
    SingleCount,
    /// A bond crossing a boundary is evaluated on both processes
    /// (newton_bond off); each credits only the endpoints it owns.
    DualCount,
}
impl TallyMode {
    /// Whether atom `idx` receives a share from this process
    #[inline]
    pub fn credits(&self, idx: usize, nlocal: usize) -> bool {
        match self {
            TallyMode::SingleCount => true,
            TallyMode::DualCount => idx < nlocal,
        }
    }
}
