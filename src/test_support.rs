//! A small synthetic backend used by this crate's own tests.
//!
//! Real equation-of-state backends (multi-parameter Helmholtz EOS, the
//! IF97 industrial formulation) are out of scope (§1): this module stands
//! in for one, exposing the same [`Backend`] contract a real
//! implementation would, with a closed-form, internally-consistent model
//! loosely patterned on water (it reproduces a saturation dome, a
//! sub-critical density maximum near 277 K, and a critical point) so the
//! flash solver and adapter have a domain to work against. It is not a
//! validated equation of state and its numeric outputs should not be
//! mistaken for real water properties beyond qualitative agreement.

use crate::backend::Backend;
use crate::error::FlashResult;
use crate::phase::Phase;

const R: f64 = 8.314_462_618;
const T_TRIPLE: f64 = 273.16;
const P_TRIPLE: f64 = 611.657;
const T_CRIT: f64 = 647.096;
const P_CRIT: f64 = 22.064e6;
const T_MIN: f64 = 260.0;
const T_MAX: f64 = 1200.0;
const P_MIN: f64 = 1.0;
const P_MAX: f64 = 1.0e9;
const MOLAR_MASS: f64 = 0.018_015_3;

const LATENT_HEAT: f64 = 45_054.0; // J/mol, Clausius-Clapeyron constant
const CP_LIQUID: f64 = 75.3; // J/(mol K)
const CP_VAPOR: f64 = 33.6; // J/(mol K)
const RHO_PEAK: f64 = 55_345.0; // mol/m^3
const T_PEAK: f64 = 277.0; // K, density maximum
const DENSITY_CURVATURE: f64 = 4e-6; // 1/K^2
const LIQUID_COMPRESSIBILITY: f64 = 4.5e-10; // 1/Pa

/// Clausius-Clapeyron saturation pressure at `t`, clamped to `P_crit`
/// above `T_crit` (used only to pick a branch internally; callers should
/// prefer [`Backend::p_sat`] which returns `None`/NaN above `T_crit` per
/// §4.C).
fn sat_pressure(t: f64) -> f64 {
    if t >= T_CRIT {
        return P_CRIT;
    }
    P_TRIPLE * (-(LATENT_HEAT / R) * (1.0 / t - 1.0 / T_TRIPLE)).exp()
}

/// Inverts [`sat_pressure`] in closed form.
fn sat_temperature(p: f64) -> f64 {
    if p >= P_CRIT {
        return T_CRIT;
    }
    1.0 / (1.0 / T_TRIPLE - (R / LATENT_HEAT) * (p / P_TRIPLE).ln())
}

fn liquid_density(p: f64, t: f64) -> f64 {
    let dt = t - T_PEAK;
    let rho_t = RHO_PEAK * (1.0 - DENSITY_CURVATURE * dt * dt);
    let p_sat = sat_pressure(t);
    rho_t * (1.0 + LIQUID_COMPRESSIBILITY * (p - p_sat))
}

fn vapor_density(p: f64, t: f64) -> f64 {
    p / (R * t)
}

// `dH = V dP` at constant T for a near-incompressible liquid: without this
// term H would be (unphysically, for this toy model) independent of P on
// the liquid branch, leaving the T,H / T,S flash with no pressure root to
// find.
fn liquid_enthalpy(p: f64, t: f64) -> f64 {
    let p_sat = sat_pressure(t);
    CP_LIQUID * (t - T_TRIPLE) + (p - p_sat) / liquid_density(p, t)
}

// Small correction so entropy is not perfectly flat in P on the liquid
// branch either; not a physically derived Maxwell relation, just enough
// slope for the solver to have a root.
fn liquid_entropy(p: f64, t: f64) -> f64 {
    let p_sat = sat_pressure(t);
    CP_LIQUID * (t / T_TRIPLE).ln() - 1e-7 * (p - p_sat)
}

fn vapor_enthalpy(p: f64, t: f64) -> f64 {
    // Weak real-gas correction (`-a*P/T`): an ideal gas's enthalpy is
    // exactly P-independent at fixed T, which would make the T,H flash
    // degenerate on the vapor branch.
    const REAL_GAS_CORRECTION: f64 = 2.0;
    LATENT_HEAT + CP_VAPOR * (t - T_TRIPLE) - REAL_GAS_CORRECTION * (p / t)
}

fn vapor_entropy(p: f64, t: f64) -> f64 {
    let s_ref = LATENT_HEAT / T_TRIPLE;
    s_ref + CP_VAPOR * (t / T_TRIPLE).ln() - R * (p / P_TRIPLE).ln()
}

/// A single-phase or two-phase point on the synthetic model described
/// above.
#[derive(Debug, Clone, Copy)]
pub struct IdealGasBackend {
    p: f64,
    t: f64,
    x: f64, // NaN when not on the saturation line
}

impl IdealGasBackend {
    /// A backend instance with no state set yet (at the triple point, to
    /// keep all current-state accessors finite).
    pub fn water() -> Self {
        let mut b = Self {
            p: P_TRIPLE,
            t: T_TRIPLE,
            x: f64::NAN,
        };
        let _ = b.set_pt(P_TRIPLE, T_TRIPLE);
        b
    }

    fn is_liquid_branch(&self) -> bool {
        self.t >= T_CRIT || self.p >= sat_pressure(self.t)
    }
}

impl Backend for IdealGasBackend {
    fn set_pt(&mut self, p: f64, t: f64) -> FlashResult<()> {
        self.p = p;
        self.t = t;
        self.x = f64::NAN;
        Ok(())
    }

    fn set_px(&mut self, p: f64, x: f64) -> FlashResult<()> {
        self.p = p;
        self.t = sat_temperature(p);
        self.x = x;
        Ok(())
    }

    fn set_tx(&mut self, t: f64, x: f64) -> FlashResult<()> {
        self.t = t;
        self.p = sat_pressure(t);
        self.x = x;
        Ok(())
    }

    fn set_dt(&mut self, rho: f64, t: f64) -> FlashResult<()> {
        // Invert density at fixed T to a pressure by bisection against the
        // (monotonic-in-P, at fixed T) branch density formula.
        self.t = t;
        self.x = f64::NAN;
        let density_at = |p: f64| {
            if p >= sat_pressure(t) || t >= T_CRIT {
                liquid_density(p, t)
            } else {
                vapor_density(p, t)
            }
        };
        let (mut lo, mut hi) = (P_MIN, P_MAX);
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if density_at(mid) < rho {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        self.p = 0.5 * (lo + hi);
        Ok(())
    }

    fn t(&self) -> f64 {
        self.t
    }

    fn p(&self) -> f64 {
        self.p
    }

    fn rho(&self) -> f64 {
        if self.x.is_nan() {
            if self.is_liquid_branch() {
                liquid_density(self.p, self.t)
            } else {
                vapor_density(self.p, self.t)
            }
        } else {
            let v_liq = 1.0 / liquid_density(self.p, self.t);
            let v_vap = 1.0 / vapor_density(self.p, self.t);
            1.0 / (self.x * v_vap + (1.0 - self.x) * v_liq)
        }
    }

    fn x(&self) -> f64 {
        self.x
    }

    fn h(&self) -> f64 {
        if self.x.is_nan() {
            if self.is_liquid_branch() {
                liquid_enthalpy(self.p, self.t)
            } else {
                vapor_enthalpy(self.p, self.t)
            }
        } else {
            self.x * vapor_enthalpy(self.p, self.t) + (1.0 - self.x) * liquid_enthalpy(self.p, self.t)
        }
    }

    fn s(&self) -> f64 {
        if self.x.is_nan() {
            if self.is_liquid_branch() {
                liquid_entropy(self.p, self.t)
            } else {
                vapor_entropy(self.p, self.t)
            }
        } else {
            self.x * vapor_entropy(self.p, self.t) + (1.0 - self.x) * liquid_entropy(self.p, self.t)
        }
    }

    fn u(&self) -> f64 {
        self.h() - self.p() / self.rho()
    }

    fn molar_mass(&self) -> f64 {
        MOLAR_MASS
    }

    fn p_crit(&self) -> f64 {
        P_CRIT
    }

    fn t_crit(&self) -> f64 {
        T_CRIT
    }

    fn t_min(&self) -> f64 {
        T_MIN
    }

    fn t_max(&self) -> f64 {
        T_MAX
    }

    fn p_min(&self) -> f64 {
        P_MIN
    }

    fn p_max(&self) -> f64 {
        P_MAX
    }

    fn p_sat(&self, t: f64) -> Option<f64> {
        if t > T_CRIT {
            None
        } else {
            Some(sat_pressure(t))
        }
    }

    fn t_sat(&self, p: f64) -> Option<f64> {
        if p > P_CRIT {
            None
        } else {
            Some(sat_temperature(p))
        }
    }

    fn phase(&self) -> Option<Phase> {
        None // let the adapter apply the §3.4 predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pt_round_trips_through_accessors() {
        let mut b = IdealGasBackend::water();
        b.set_pt(101_325.0, 298.15).unwrap();
        assert_eq!(b.p(), 101_325.0);
        assert_eq!(b.t(), 298.15);
        assert!(b.x().is_nan());
    }

    #[test]
    fn density_has_a_maximum_near_277_k() {
        let mut below = IdealGasBackend::water();
        below.set_pt(101_325.0, 277.0).unwrap();
        let mut lower_t = IdealGasBackend::water();
        lower_t.set_pt(101_325.0, 274.0).unwrap();
        let mut higher_t = IdealGasBackend::water();
        higher_t.set_pt(101_325.0, 280.0).unwrap();
        assert!(below.rho() > lower_t.rho());
        assert!(below.rho() > higher_t.rho());
    }

    #[test]
    fn px_and_tx_agree_on_the_same_saturation_point() {
        let mut via_px = IdealGasBackend::water();
        via_px.set_px(101_325.0, 0.5).unwrap();
        let mut via_tx = IdealGasBackend::water();
        via_tx.set_tx(via_px.t(), 0.5).unwrap();
        assert!((via_px.p() - via_tx.p()).abs() < 1e-6);
    }
}
