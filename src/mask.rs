//! Per-atom fields a bond style needs on ghost atoms

pub const X_MASK: u32 = 0x0000_0001;
pub const V_MASK: u32 = 0x0000_0002;
pub const F_MASK: u32 = 0x0000_0004;
pub const TAG_MASK: u32 = 0x0000_0008;
pub const BOND_HIST_MASK: u32 = 0x0000_0100;
pub const ALL_MASK: u32 = 0xffff_ffff;

/// Fields beyond position that the communication layer must keep current
/// on ghost atoms for a style. `datamask_ext` is reserved for fields added
/// by extensions and is opaque to this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommMask {
    pub datamask: u32,
    pub datamask_ext: u32,
}
impl CommMask {
    pub fn new(datamask: u32) -> Self {
        Self {
            datamask,
            datamask_ext: 0,
        }
    }
    pub fn needs(&self, mask: u32) -> bool {
        self.datamask & mask == mask
    }
}
impl Default for CommMask {
    fn default() -> Self {
        Self::new(ALL_MASK)
    }
}
