//! Backend contract (component B, §4.B/§6.1).
//!
//! A backend is an EOS implementation exposing native state setters and
//! property readers in SI molar units. The flash engine (component D)
//! drives it; the adapter (component C) fills in whatever a backend does
//! not natively provide.
//!
//! `Backend` is deliberately object-safe (no generic methods, no `Self`
//! return types) so that [`crate::fluid::Fluid`] can be instantiated over
//! either a concrete backend type (static dispatch) or `Box<dyn Backend>`
//! (dynamic dispatch) through the same code paths, per §9.

use crate::error::FlashResult;
use crate::phase::Phase;

/// Required and optional primitives an equation-of-state implementation
/// exposes to the flash engine.
///
/// All required setters default to returning
/// [`FlashError::UnsupportedSpecification`](crate::error::FlashError::UnsupportedSpecification);
/// a concrete backend overrides the ones it natively supports. All
/// optional accessors default to `None`, signaling the adapter to fall
/// back to the identities of §4.C.
pub trait Backend: BackendClone {
    /// Sets state from pressure and temperature. Every backend is expected
    /// to support this pair; it is the universal fallback axis for the
    /// flash solver.
    fn set_pt(&mut self, p: f64, t: f64) -> FlashResult<()>;

    /// Sets state from pressure and vapor quality (saturation).
    fn set_px(&mut self, p: f64, x: f64) -> FlashResult<()> {
        let _ = (p, x);
        Err(unsupported("set_px", &[("P", p), ("X", x)]))
    }

    /// Sets state from temperature and vapor quality (saturation).
    fn set_tx(&mut self, t: f64, x: f64) -> FlashResult<()> {
        let _ = (t, x);
        Err(unsupported("set_tx", &[("T", t), ("X", x)]))
    }

    /// Sets state from pressure and enthalpy, if natively supported.
    fn set_ph(&mut self, p: f64, h: f64) -> FlashResult<()> {
        let _ = (p, h);
        Err(unsupported("set_ph", &[("P", p), ("H", h)]))
    }

    /// Sets state from pressure and entropy, if natively supported.
    fn set_ps(&mut self, p: f64, s: f64) -> FlashResult<()> {
        let _ = (p, s);
        Err(unsupported("set_ps", &[("P", p), ("S", s)]))
    }

    /// Sets state from pressure and internal energy, if natively supported.
    fn set_pu(&mut self, p: f64, u: f64) -> FlashResult<()> {
        let _ = (p, u);
        Err(unsupported("set_pu", &[("P", p), ("U", u)]))
    }

    /// Sets state from density and pressure, if natively supported.
    fn set_dp(&mut self, rho: f64, p: f64) -> FlashResult<()> {
        let _ = (rho, p);
        Err(unsupported("set_dp", &[("RHO", rho), ("P", p)]))
    }

    /// Sets state from density and temperature, if natively supported.
    fn set_dt(&mut self, rho: f64, t: f64) -> FlashResult<()> {
        let _ = (rho, t);
        Err(unsupported("set_dt", &[("RHO", rho), ("T", t)]))
    }

    /// Sets state from density and entropy, if natively supported.
    fn set_ds(&mut self, rho: f64, s: f64) -> FlashResult<()> {
        let _ = (rho, s);
        Err(unsupported("set_ds", &[("RHO", rho), ("S", s)]))
    }

    /// Sets state from density and enthalpy, if natively supported.
    fn set_dh(&mut self, rho: f64, h: f64) -> FlashResult<()> {
        let _ = (rho, h);
        Err(unsupported("set_dh", &[("RHO", rho), ("H", h)]))
    }

    /// Sets state from density and internal energy, if natively supported.
    fn set_du(&mut self, rho: f64, u: f64) -> FlashResult<()> {
        let _ = (rho, u);
        Err(unsupported("set_du", &[("RHO", rho), ("U", u)]))
    }

    /// Sets state from enthalpy and entropy, if natively supported.
    fn set_hs(&mut self, h: f64, s: f64) -> FlashResult<()> {
        let _ = (h, s);
        Err(unsupported("set_hs", &[("H", h), ("S", s)]))
    }

    /// Sets state from temperature and entropy, if natively supported.
    fn set_ts(&mut self, t: f64, s: f64) -> FlashResult<()> {
        let _ = (t, s);
        Err(unsupported("set_ts", &[("T", t), ("S", s)]))
    }

    /// Current temperature, K.
    fn t(&self) -> f64;
    /// Current pressure, Pa.
    fn p(&self) -> f64;
    /// Current molar density, mol/m³.
    fn rho(&self) -> f64;
    /// Current vapor quality, or NaN outside the two-phase region.
    fn x(&self) -> f64;
    /// Current molar enthalpy.
    fn h(&self) -> f64;
    /// Current molar entropy.
    fn s(&self) -> f64;
    /// Current molar internal energy.
    fn u(&self) -> f64;

    /// Molar mass, kg/mol.
    fn molar_mass(&self) -> f64;
    /// Critical pressure, Pa.
    fn p_crit(&self) -> f64;
    /// Critical temperature, K.
    fn t_crit(&self) -> f64;
    /// Lower validity bound for temperature.
    fn t_min(&self) -> f64;
    /// Upper validity bound for temperature.
    fn t_max(&self) -> f64;
    /// Lower validity bound for pressure.
    fn p_min(&self) -> f64;
    /// Upper validity bound for pressure.
    fn p_max(&self) -> f64;

    /// Molar volume, if the backend computes it natively.
    fn v(&self) -> Option<f64> {
        None
    }
    /// Molar Gibbs energy, if natively available.
    fn g(&self) -> Option<f64> {
        None
    }
    /// Molar Helmholtz energy, if natively available.
    fn a(&self) -> Option<f64> {
        None
    }
    /// Compressibility factor, if natively available.
    fn z(&self) -> Option<f64> {
        None
    }
    /// Isobaric molar heat capacity, if natively available.
    fn cp(&self) -> Option<f64> {
        None
    }
    /// Isochoric molar heat capacity, if natively available.
    fn cv(&self) -> Option<f64> {
        None
    }
    /// Speed of sound, if natively available.
    fn w(&self) -> Option<f64> {
        None
    }
    /// Isothermal compressibility, if natively available.
    fn kappa(&self) -> Option<f64> {
        None
    }
    /// Thermal expansion coefficient, if natively available.
    fn alpha(&self) -> Option<f64> {
        None
    }
    /// Dynamic viscosity, if natively available (NaN in two-phase).
    fn eta(&self) -> Option<f64> {
        None
    }
    /// Thermal conductivity, if natively available (NaN in two-phase).
    fn tc(&self) -> Option<f64> {
        None
    }
    /// Saturation pressure at `t`, if the backend computes it directly
    /// rather than through a (T, X=½) probe.
    fn p_sat(&self, t: f64) -> Option<f64> {
        let _ = t;
        None
    }
    /// Saturation temperature at `p`, if the backend computes it directly.
    fn t_sat(&self, p: f64) -> Option<f64> {
        let _ = p;
        None
    }
    /// Native phase classifier, if the backend provides one more precise
    /// than the §3.4 predicates.
    fn phase(&self) -> Option<Phase> {
        None
    }

    /// A fast backward-correlation guess for `(P, T)` given a
    /// non-natively-supported specification pair and its two values, if
    /// the backend provides one (§4.D.2 step 1, §4.D.5).
    fn guess_pt(&self, spec_params: (&'static str, f64), other: (&'static str, f64)) -> Option<(f64, f64)> {
        let _ = (spec_params, other);
        None
    }
}

fn unsupported(function: &'static str, params: &[(&'static str, f64)]) -> crate::error::FlashError {
    crate::error::FlashError::UnsupportedSpecification {
        function,
        params: params.to_vec(),
    }
}

/// Object-safety helper: lets `Box<dyn Backend>` implement `Clone` without
/// requiring `Backend: Clone` directly (which would make the trait object
/// unsized and break dynamic dispatch).
pub trait BackendClone {
    #[doc(hidden)]
    fn clone_box(&self) -> Box<dyn Backend>;
}

impl<T> BackendClone for T
where
    T: 'static + Backend + Clone,
{
    fn clone_box(&self) -> Box<dyn Backend> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Backend> {
    fn clone(&self) -> Box<dyn Backend> {
        // Dispatch through an unsized `&dyn Backend` reference rather than
        // calling `clone_box` on `self` directly: `Box<dyn Backend>` itself
        // picks up `BackendClone` from the blanket impl below (it is
        // `Backend + Clone + 'static`), and calling through `self` would
        // resolve to that impl instead of the vtable method, recursing
        // forever.
        let backend: &dyn Backend = self.as_ref();
        backend.clone_box()
    }
}

/// Forwards every method to the boxed backend, so that `Fluid<Box<dyn
/// Backend>>` (the dynamic-dispatch path of §9) exercises exactly the same
/// generic adapter/solver code as `Fluid<B: Backend>` over a concrete type.
impl Backend for Box<dyn Backend> {
    fn set_pt(&mut self, p: f64, t: f64) -> FlashResult<()> {
        (**self).set_pt(p, t)
    }
    fn set_px(&mut self, p: f64, x: f64) -> FlashResult<()> {
        (**self).set_px(p, x)
    }
    fn set_tx(&mut self, t: f64, x: f64) -> FlashResult<()> {
        (**self).set_tx(t, x)
    }
    fn set_ph(&mut self, p: f64, h: f64) -> FlashResult<()> {
        (**self).set_ph(p, h)
    }
    fn set_ps(&mut self, p: f64, s: f64) -> FlashResult<()> {
        (**self).set_ps(p, s)
    }
    fn set_pu(&mut self, p: f64, u: f64) -> FlashResult<()> {
        (**self).set_pu(p, u)
    }
    fn set_dp(&mut self, rho: f64, p: f64) -> FlashResult<()> {
        (**self).set_dp(rho, p)
    }
    fn set_dt(&mut self, rho: f64, t: f64) -> FlashResult<()> {
        (**self).set_dt(rho, t)
    }
    fn set_ds(&mut self, rho: f64, s: f64) -> FlashResult<()> {
        (**self).set_ds(rho, s)
    }
    fn set_dh(&mut self, rho: f64, h: f64) -> FlashResult<()> {
        (**self).set_dh(rho, h)
    }
    fn set_du(&mut self, rho: f64, u: f64) -> FlashResult<()> {
        (**self).set_du(rho, u)
    }
    fn set_hs(&mut self, h: f64, s: f64) -> FlashResult<()> {
        (**self).set_hs(h, s)
    }
    fn set_ts(&mut self, t: f64, s: f64) -> FlashResult<()> {
        (**self).set_ts(t, s)
    }
    fn t(&self) -> f64 {
        (**self).t()
    }
    fn p(&self) -> f64 {
        (**self).p()
    }
    fn rho(&self) -> f64 {
        (**self).rho()
    }
    fn x(&self) -> f64 {
        (**self).x()
    }
    fn h(&self) -> f64 {
        (**self).h()
    }
    fn s(&self) -> f64 {
        (**self).s()
    }
    fn u(&self) -> f64 {
        (**self).u()
    }
    fn molar_mass(&self) -> f64 {
        (**self).molar_mass()
    }
    fn p_crit(&self) -> f64 {
        (**self).p_crit()
    }
    fn t_crit(&self) -> f64 {
        (**self).t_crit()
    }
    fn t_min(&self) -> f64 {
        (**self).t_min()
    }
    fn t_max(&self) -> f64 {
        (**self).t_max()
    }
    fn p_min(&self) -> f64 {
        (**self).p_min()
    }
    fn p_max(&self) -> f64 {
        (**self).p_max()
    }
    fn v(&self) -> Option<f64> {
        (**self).v()
    }
    fn g(&self) -> Option<f64> {
        (**self).g()
    }
    fn a(&self) -> Option<f64> {
        (**self).a()
    }
    fn z(&self) -> Option<f64> {
        (**self).z()
    }
    fn cp(&self) -> Option<f64> {
        (**self).cp()
    }
    fn cv(&self) -> Option<f64> {
        (**self).cv()
    }
    fn w(&self) -> Option<f64> {
        (**self).w()
    }
    fn kappa(&self) -> Option<f64> {
        (**self).kappa()
    }
    fn alpha(&self) -> Option<f64> {
        (**self).alpha()
    }
    fn eta(&self) -> Option<f64> {
        (**self).eta()
    }
    fn tc(&self) -> Option<f64> {
        (**self).tc()
    }
    fn p_sat(&self, t: f64) -> Option<f64> {
        (**self).p_sat(t)
    }
    fn t_sat(&self, p: f64) -> Option<f64> {
        (**self).t_sat(p)
    }
    fn phase(&self) -> Option<Phase> {
        (**self).phase()
    }
    fn guess_pt(
        &self,
        spec_params: (&'static str, f64),
        other: (&'static str, f64),
    ) -> Option<(f64, f64)> {
        (**self).guess_pt(spec_params, other)
    }
}
