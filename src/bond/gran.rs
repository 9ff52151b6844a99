//! Granular bond with a tangential spring.
//!
//! The normal part is a harmonic spring along the bond. The tangential part
//! integrates the relative tangential velocity of the two particles into a
//! displacement stored in the bond's history, which persists across steps,
//! subdomain migration and restarts.

use std::io::{Read, Write};

use log::{info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{read_table_restart, write_table_restart, BondEval, BondPair, BondPotentialTrait};
use crate::{
    coeff::{CoeffRecord, CoeffTable},
    history::HistorySlots,
    mask::{CommMask, BOND_HIST_MASK, F_MASK, TAG_MASK, V_MASK, X_MASK},
    utils::dot,
    Error,
};

/// Tangential displacement x, y, z
pub const GRAN_HISTORY: HistorySlots = HistorySlots::new(3);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(deny_unknown_fields))]
pub struct GranCoeff {
    /// Normal stiffness, including the factor 1/2
    pub kn: f64,
    /// Tangential stiffness, including the factor 1/2
    pub kt: f64,
    pub r0: f64,
}
impl GranCoeff {
    pub fn new(kn: f64, kt: f64, r0: f64) -> Self {
        Self { kn, kt, r0 }
    }
    #[inline(always)]
    fn normal(&self, rsq: f64) -> (f64, f64) {
        let r = rsq.sqrt();
        let dr = r - self.r0;
        let fbond = if r > 0.0 { -2.0 * self.kn * dr / r } else { 0.0 };
        (self.kn * dr * dr, fbond)
    }
}
impl CoeffRecord for GranCoeff {
    const NAMES: &'static [&'static str] = &["kn", "kt", "r0"];
    fn from_values(values: &[f64]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
    fn values(&self) -> Vec<f64> {
        vec![self.kn, self.kt, self.r0]
    }
    fn check(&self) -> Result<(), String> {
        if self.kn < 0.0 || self.kt < 0.0 {
            return Err(String::from("Bond stiffness must not be negative"));
        }
        if self.r0 < 0.0 {
            return Err(format!("Equilibrium distance {} is negative", self.r0));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Gran {
    coeffs: CoeffTable<GranCoeff>,
    tangential: bool,
    reference_mass: Option<f64>,
}
impl Gran {
    pub fn new(num_types: usize) -> Self {
        Self {
            coeffs: CoeffTable::new(num_types),
            tangential: true,
            reference_mass: None,
        }
    }
    pub fn tangential(&self) -> bool {
        self.tangential
    }
}

impl BondPotentialTrait for Gran {
    fn style_name(&self) -> &'static str {
        "gran"
    }
    fn num_types(&self) -> usize {
        self.coeffs.num_types()
    }
    /// `tangential yes|no` and `mass <m>`, in any order
    fn settings(&mut self, args: &[&str]) -> Result<(), Error> {
        let mut iter = args.iter();
        while let Some(&keyword) = iter.next() {
            let value = iter.next().ok_or_else(|| {
                Error::config(None, format!("Missing value for bond_style gran {}", keyword))
            })?;
            match (keyword, *value) {
                ("tangential", "yes") => self.tangential = true,
                ("tangential", "no") => self.tangential = false,
                ("mass", m) => {
                    let mass = m
                        .parse::<f64>()
                        .ok()
                        .filter(|m| *m > 0.0)
                        .ok_or_else(|| Error::config(None, format!("Invalid reference mass '{}'", m)))?;
                    self.reference_mass = Some(mass);
                }
                _ => return Err(Error::config(None, "Illegal bond_style gran command")),
            }
        }
        Ok(())
    }
    fn parse_coefficients(&mut self, types: &str, args: &[&str]) -> Result<(), Error> {
        self.coeffs.parse_coeff(types, args)
    }
    fn unset_types(&self) -> Vec<usize> {
        self.coeffs.unset_types()
    }
    fn freeze_coefficients(&mut self) {
        self.coeffs.freeze();
    }
    fn init_style(&mut self) -> Result<(), Error> {
        let no_tangential_stiffness = (1..=self.num_types()).all(|t| self.coeffs.at(t).kt == 0.0);
        if self.tangential && no_tangential_stiffness {
            warn!("Tangential springs are on but every bond type has kt = 0");
        }
        info!(
            "Granular bonds: tangential {}, {} history values per bond",
            if self.tangential { "on" } else { "off" },
            GRAN_HISTORY.count()
        );
        Ok(())
    }
    fn equilibrium_distance(&self, bond_type: usize) -> Result<f64, Error> {
        Ok(self.coeffs.get(bond_type)?.r0)
    }
    fn bond_eval(&self, bond_type: usize, pair: &BondPair, history: &mut [f64], dt: f64) -> BondEval {
        let coeff = self.coeffs.at(bond_type);
        let (mut energy, fbond) = coeff.normal(pair.rsq);
        if !self.tangential || pair.rsq == 0.0 {
            return BondEval {
                energy,
                fbond,
                ftangential: None,
            };
        }

        let rinv = 1.0 / pair.rsq.sqrt();
        let n = [pair.del[0] * rinv, pair.del[1] * rinv, pair.del[2] * rinv];
        let vr = [
            pair.vi[0] - pair.vj[0],
            pair.vi[1] - pair.vj[1],
            pair.vi[2] - pair.vj[2],
        ];
        let vn = dot(&vr, &n);

        // accumulate, then keep the displacement in the tangential plane
        let mut shear = [0.0; 3];
        for k in 0..3 {
            shear[k] = history[k] + (vr[k] - vn * n[k]) * dt;
        }
        let sn = dot(&shear, &n);
        for k in 0..3 {
            shear[k] -= sn * n[k];
        }
        history[..3].copy_from_slice(&shear);

        energy += coeff.kt * dot(&shear, &shear);
        let ft = [
            -2.0 * coeff.kt * shear[0],
            -2.0 * coeff.kt * shear[1],
            -2.0 * coeff.kt * shear[2],
        ];
        BondEval {
            energy,
            fbond,
            ftangential: Some(ft),
        }
    }
    /// Normal part only; the tangential part depends on the bond's history
    fn single(&self, bond_type: usize, rsq: f64, _i: usize, _j: usize) -> Result<(f64, f64), Error> {
        Ok(self.coeffs.get(bond_type)?.normal(rsq))
    }
    fn write_restart(&self, out: &mut dyn Write) -> Result<(), Error> {
        write_table_restart(self.style_name(), &self.coeffs, out)
    }
    fn read_restart(&mut self, input: &mut dyn Read) -> Result<(), Error> {
        read_table_restart("gran", &mut self.coeffs, input)
    }
    fn write_data(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.coeffs.write_data(out)
    }
    fn history_slots(&self) -> HistorySlots {
        GRAN_HISTORY
    }
    fn comm_mask(&self) -> CommMask {
        CommMask::new(X_MASK | V_MASK | F_MASK | TAG_MASK | BOND_HIST_MASK)
    }
    /// `0.2 sqrt(m / k)` for the stiffest spring and the reference mass `m`
    fn min_dt(&self) -> f64 {
        let kmax = (1..=self.num_types())
            .filter(|&t| self.coeffs.is_set(t))
            .map(|t| {
                let c = self.coeffs.at(t);
                c.kn.max(c.kt)
            })
            .fold(0.0, f64::max);
        match self.reference_mass {
            Some(m) if kmax > 0.0 => 0.2 * (m / kmax).sqrt(),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gran() -> Gran {
        let mut g = Gran::new(1);
        g.parse_coefficients("1", &["10.0", "4.0", "1.0"]).unwrap();
        g
    }

    #[test]
    fn tangential_history_accumulates() {
        let g = gran();
        let pair = BondPair::new([1.0, 0.0, 0.0]).with_velocities([0.0, 0.5, 0.0], [0.0, -0.5, 0.2]);
        let mut history = [0.0; 3];

        let first = g.bond_eval(1, &pair, &mut history, 0.1);
        assert_relative_eq!(history[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(history[2], -0.02, epsilon = 1e-12);
        assert_eq!(history[0], 0.0);

        let second = g.bond_eval(1, &pair, &mut history, 0.1);
        assert_relative_eq!(history[1], 0.2, epsilon = 1e-12);
        let ft = second.ftangential.unwrap();
        assert_relative_eq!(ft[1], -2.0 * 4.0 * 0.2, epsilon = 1e-12);
        assert!(second.energy > first.energy);
    }

    #[test]
    fn normal_motion_leaves_history_alone() {
        let g = gran();
        let pair = BondPair::new([1.2, 0.0, 0.0]).with_velocities([1.0, 0.0, 0.0], [0.0; 3]);
        let mut history = [0.0; 3];
        let eval = g.bond_eval(1, &pair, &mut history, 0.1);
        assert_eq!(history, [0.0; 3]);
        assert_relative_eq!(eval.energy, 10.0 * 0.04, epsilon = 1e-12);
        assert_relative_eq!(eval.fbond, -2.0 * 10.0 * 0.2 / 1.2, epsilon = 1e-12);
    }

    #[test]
    fn tangential_off() {
        let mut g = gran();
        g.settings(&["tangential", "no"]).unwrap();
        let pair = BondPair::new([1.0, 0.0, 0.0]).with_velocities([0.0, 1.0, 0.0], [0.0; 3]);
        let mut history = [0.0; 3];
        let eval = g.bond_eval(1, &pair, &mut history, 0.1);
        assert_eq!(history, [0.0; 3]);
        assert!(eval.ftangential.is_none());
    }

    #[test]
    fn settings_and_min_dt() {
        let mut g = gran();
        assert_eq!(g.min_dt(), 1.0);
        g.settings(&["mass", "2.5", "tangential", "yes"]).unwrap();
        assert_relative_eq!(g.min_dt(), 0.2 * (2.5f64 / 10.0).sqrt());
        assert!(g.settings(&["mass"]).is_err());
        assert!(g.settings(&["mass", "-1"]).is_err());
        assert!(g.settings(&["tangential", "maybe"]).is_err());
    }

    #[test]
    fn declares_history_and_velocity_exchange() {
        let g = gran();
        assert_eq!(g.history_slots().count(), 3);
        assert!(g.comm_mask().needs(V_MASK));
    }

    #[test]
    fn rejects_negative_stiffness() {
        let mut g = Gran::new(1);
        assert!(g.parse_coefficients("1", &["-1.0", "1.0", "1.0"]).is_err());
    }
}
