//! Backend adapter (component C, §4.C).
//!
//! Wraps a [`Backend`] and presents the full property surface named in
//! §3.1, filling in whatever the backend does not natively compute via the
//! thermodynamic identities of §4.C and the numerical derivatives of
//! [`crate::derivative`]. Every auxiliary query that must perturb the
//! backend state (two-phase mixing, saturation probes, derivative probes)
//! clones the backend first and discards the clone, leaving `self` intact
//! (the copy-on-branch discipline of §9).

use crate::backend::Backend;
use crate::error::{FlashError, FlashResult};
use crate::param::Param;
use crate::phase::{self, Phase};

const GAS_CONSTANT: f64 = 8.314_462_618; // J / (mol K)

/// Wraps a backend and answers property queries in molar units,
/// transparently applying the identities and numerical derivatives of
/// §4.C.
#[derive(Debug, Clone)]
pub struct Adapter<B> {
    backend: B,
}

impl<B: Backend> Adapter<B> {
    /// Wraps `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Borrows the wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrows the wrapped backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Unwraps the adapter, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Current phase, preferring the backend's own classifier if it has
    /// one, otherwise applying the §3.4 predicates.
    pub fn phase(&self) -> Phase {
        if let Some(p) = self.backend.phase() {
            return p;
        }
        let t = self.backend.t();
        let p = self.backend.p();
        let p_sat = self.p_sat(t);
        let t_sat = self.t_sat(p);
        phase::classify(p, t, self.backend.p_crit(), self.backend.t_crit(), p_sat, t_sat)
    }

    /// Saturation pressure at `t` (NaN above `T_crit`), via the backend's
    /// own correlation if present, else a (T, X=½) probe on a cloned
    /// backend.
    pub fn p_sat(&self, t: f64) -> f64 {
        if let Some(p) = self.backend.p_sat(t) {
            return p;
        }
        if t > self.backend.t_crit() {
            return f64::NAN;
        }
        let mut probe = self.backend.clone();
        match probe.set_tx(t, 0.5) {
            Ok(()) => probe.p(),
            Err(_) => f64::NAN,
        }
    }

    /// Saturation temperature at `p` (NaN above `P_crit`).
    pub fn t_sat(&self, p: f64) -> f64 {
        if let Some(t) = self.backend.t_sat(p) {
            return t;
        }
        if p > self.backend.p_crit() {
            return f64::NAN;
        }
        let mut probe = self.backend.clone();
        match probe.set_px(p, 0.5) {
            Ok(()) => probe.t(),
            Err(_) => f64::NAN,
        }
    }

    fn volume(&self) -> f64 {
        self.backend.v().unwrap_or_else(|| 1.0 / self.backend.rho())
    }

    fn gibbs(&self) -> f64 {
        self.backend
            .g()
            .unwrap_or_else(|| self.backend.h() - self.backend.t() * self.backend.s())
    }

    fn helmholtz(&self) -> f64 {
        self.backend
            .a()
            .unwrap_or_else(|| self.backend.u() - self.backend.t() * self.backend.s())
    }

    fn compressibility(&self) -> f64 {
        self.backend.z().unwrap_or_else(|| {
            self.backend.p() / (self.backend.rho() * GAS_CONSTANT * self.backend.t())
        })
    }

    fn d_h_d_t_at_p(&self) -> f64 {
        let p = self.backend.p();
        crate::derivative::richardson(
            |t| {
                let mut probe = self.backend.clone();
                probe.set_pt(p, t).ok()?;
                Some(probe.h())
            },
            self.backend.t(),
        )
    }

    fn cp(&self) -> f64 {
        self.backend.cp().unwrap_or_else(|| self.d_h_d_t_at_p())
    }

    fn d_u_d_t_at_rho(&self) -> f64 {
        let rho = self.backend.rho();
        crate::derivative::richardson(
            |t| {
                let mut probe = self.backend.clone();
                probe.set_dt(rho, t).ok()?;
                Some(probe.u())
            },
            self.backend.t(),
        )
    }

    fn cv(&self) -> f64 {
        self.backend.cv().unwrap_or_else(|| self.d_u_d_t_at_rho())
    }

    fn d_v_d_p_at_t(&self) -> f64 {
        let t = self.backend.t();
        crate::derivative::richardson(
            |p| {
                let mut probe = self.backend.clone();
                probe.set_pt(p, t).ok()?;
                Some(probe.v().unwrap_or_else(|| 1.0 / probe.rho()))
            },
            self.backend.p(),
        )
    }

    fn d_v_d_t_at_p(&self) -> f64 {
        let p = self.backend.p();
        crate::derivative::richardson(
            |t| {
                let mut probe = self.backend.clone();
                probe.set_pt(p, t).ok()?;
                Some(probe.v().unwrap_or_else(|| 1.0 / probe.rho()))
            },
            self.backend.t(),
        )
    }

    fn d_p_d_v_at_t(&self) -> f64 {
        let t = self.backend.t();
        let v0 = self.volume();
        crate::derivative::richardson(
            |v| {
                if v <= 0.0 {
                    return None;
                }
                let mut probe = self.backend.clone();
                probe.set_dt(1.0 / v, t).ok()?;
                Some(probe.p())
            },
            v0,
        )
    }

    fn kappa(&self) -> f64 {
        self.backend
            .kappa()
            .unwrap_or_else(|| -self.backend.rho() * self.d_v_d_p_at_t())
    }

    fn alpha(&self) -> f64 {
        self.backend
            .alpha()
            .unwrap_or_else(|| self.backend.rho() * self.d_v_d_t_at_p())
    }

    fn speed_of_sound(&self) -> f64 {
        if let Some(w) = self.backend.w() {
            return w;
        }
        let v = self.volume();
        let mw = self.backend.molar_mass();
        let cv = self.cv();
        let cp = self.cp();
        let d_p_d_v = self.d_p_d_v_at_t();
        let beta = -(1.0 / v) * (cv / cp) / d_p_d_v;
        (v / (beta * mw)).sqrt()
    }

    /// Two-phase extensive-property mixing: sets a cloned backend to
    /// saturated liquid and saturated vapor at the current pressure and
    /// linearly interpolates in quality (§3.4). `extract` reads the
    /// property of interest off the probe (already unit-neutral, molar
    /// basis).
    fn two_phase_mix<F: Fn(&Adapter<B>) -> f64>(&self, extract: F) -> FlashResult<f64> {
        let p = self.backend.p();
        let x = self.backend.x();

        let mut liq_backend = self.backend.clone();
        liq_backend
            .set_px(p, 0.0)
            .map_err(|_| out_of_range("two_phase_mix", &[("P", p)]))?;
        let liq = Adapter::new(liq_backend);

        let mut vap_backend = self.backend.clone();
        vap_backend
            .set_px(p, 1.0)
            .map_err(|_| out_of_range("two_phase_mix", &[("P", p)]))?;
        let vap = Adapter::new(vap_backend);

        Ok(x * extract(&vap) + (1.0 - x) * extract(&liq))
    }

    fn is_two_phase(&self) -> bool {
        matches!(self.phase(), Phase::TwoPhase)
    }

    /// Returns the requested property, molar basis, applying the
    /// identities/fallbacks of §4.C and the two-phase mixing rule of §3.4.
    /// `Phase`, sentinel and unit-bridge-only tags (`T`, `P`, `X`) are
    /// handled by the caller; this covers the quantity surface.
    pub fn get(&self, param: Param) -> FlashResult<f64> {
        use Param::*;

        // Extensive quantities mix linearly in quality across the dome.
        if self.is_two_phase() && matches!(param, H | S | U | Rho | V | Cp | Cv) {
            return match param {
                Rho => {
                    // Density mixes reciprocally (linear in specific volume).
                    let v = self.two_phase_mix(|a| a.volume())?;
                    Ok(1.0 / v)
                }
                V => self.two_phase_mix(|a| a.volume()),
                H => self.two_phase_mix(|a| a.backend.h()),
                S => self.two_phase_mix(|a| a.backend.s()),
                U => self.two_phase_mix(|a| a.backend.u()),
                Cp => self.two_phase_mix(|a| a.cp()),
                Cv => self.two_phase_mix(|a| a.cv()),
                _ => unreachable!(),
            };
        }

        // Transport properties are undefined (NaN) in the two-phase region.
        if self.is_two_phase() && matches!(param, Eta | Nu | Tc | Pr) {
            return Ok(f64::NAN);
        }

        Ok(match param {
            T => self.backend.t(),
            P => self.backend.p(),
            Rho => self.backend.rho(),
            V => self.volume(),
            H => self.backend.h(),
            S => self.backend.s(),
            U => self.backend.u(),
            X => self.backend.x(),
            A => self.helmholtz(),
            G => self.gibbs(),
            Z => self.compressibility(),
            Kappa => self.kappa(),
            Alpha => self.alpha(),
            Cp => self.cp(),
            Cv => self.cv(),
            W => self.speed_of_sound(),
            Eta => self.backend.eta().unwrap_or(f64::NAN),
            Tc => self.backend.tc().unwrap_or(f64::NAN),
            Nu => {
                let eta = self.backend.eta().unwrap_or(f64::NAN);
                eta / self.backend.rho()
            }
            Pr => {
                let eta = self.backend.eta().unwrap_or(f64::NAN);
                let tc = self.backend.tc().unwrap_or(f64::NAN);
                self.cp() * eta / tc
            }
            Mw => self.backend.molar_mass(),
            Phase | Undefined | Unknown => {
                return Err(unsupported_query(param));
            }
        })
    }
}

fn out_of_range(function: &'static str, params: &[(&'static str, f64)]) -> FlashError {
    FlashError::OutOfRange {
        function,
        params: params.to_vec(),
    }
}

fn unsupported_query(param: Param) -> FlashError {
    FlashError::UnsupportedSpecification {
        function: "Adapter::get",
        params: vec![(param.canonical(), f64::NAN)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::IdealGasBackend;

    #[test]
    fn volume_falls_back_to_reciprocal_density() {
        let mut backend = IdealGasBackend::water();
        backend.set_pt(101_325.0, 298.15).unwrap();
        let adapter = Adapter::new(backend);
        assert!((adapter.volume() - 1.0 / adapter.backend.rho()).abs() < 1e-12);
    }

    #[test]
    fn gibbs_identity_matches_h_minus_ts() {
        let mut backend = IdealGasBackend::water();
        backend.set_pt(101_325.0, 298.15).unwrap();
        let adapter = Adapter::new(backend);
        let expected = adapter.backend.h() - adapter.backend.t() * adapter.backend.s();
        assert_eq!(adapter.gibbs(), expected);
    }

    #[test]
    fn cp_numerical_derivative_is_finite_and_positive() {
        let mut backend = IdealGasBackend::water();
        backend.set_pt(101_325.0, 298.15).unwrap();
        let adapter = Adapter::new(backend);
        let cp = adapter.cp();
        assert!(cp.is_finite() && cp > 0.0);
    }
}
