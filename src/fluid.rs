//! Fluid handle and property facade (component E, §4.E).
//!
//! [`Fluid`] implements the typestate pattern over [`StateVariant`]: an
//! [`Undefined`] fluid wraps a backend with no state set yet and exposes no
//! property queries; flashing it to a specification pair yields a
//! [`FlashResults`], which derefs to a [`Defined`] fluid and additionally
//! remembers whether the solve converged.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::adapter::Adapter;
use crate::backend::Backend;
use crate::config::FlashConfig;
use crate::error::FlashResult;
use crate::flash::{self, FlashOutcome};
use crate::param::Param;
use crate::phase::Phase;
use crate::quantity::{MolarMass, Quantity};
use crate::state_variant::{Defined, StateVariant, Undefined};
use crate::units::Units;

/// A fluid backed by `B`, in state `S`.
///
/// Generic over the backend type so the same facade drives either a
/// concrete backend (static dispatch) or `Box<dyn Backend>` (dynamic
/// dispatch), per §9.
#[derive(Debug)]
pub struct Fluid<B, S: StateVariant = Defined> {
    backend: B,
    config: FlashConfig,
    state: PhantomData<S>,
}

// Written by hand rather than derived: `#[derive(Clone)]` would add a
// spurious `S: Clone` bound that the zero-sized `Defined`/`Undefined`
// markers don't (and don't need to) satisfy, since `PhantomData<S>` is
// `Clone` regardless of `S`.
impl<B: Clone, S: StateVariant> Clone for Fluid<B, S> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            config: self.config,
            state: PhantomData,
        }
    }
}

impl<B> Fluid<B, Undefined> {
    /// Wraps `backend`, with no thermodynamic state set yet.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: FlashConfig::default(),
            state: PhantomData,
        }
    }

    /// As [`Fluid::new`], with a non-default solver configuration.
    pub fn with_config(backend: B, config: FlashConfig) -> Self {
        Self {
            backend,
            config,
            state: PhantomData,
        }
    }
}

impl<B: Backend + Clone> Fluid<B, Undefined> {
    /// Flashes to the specification `(a, b)`, consuming this handle and
    /// returning a [`FlashResults`] that remembers the resulting fluid
    /// (§4.E call shape 1).
    pub fn flash(mut self, a: (Param, f64), b: (Param, f64)) -> FlashResult<FlashResults<B>> {
        let outcome = flash::flash(&mut self.backend, a, b, &self.config)?;
        Ok(FlashResults {
            fluid: Fluid {
                backend: self.backend,
                config: self.config,
                state: PhantomData,
            },
            outcome,
        })
    }

    /// Declares the state already known (e.g. a backend constructed
    /// already at a reference condition) without running the solver.
    pub fn assume_defined(self) -> Fluid<B, Defined> {
        Fluid {
            backend: self.backend,
            config: self.config,
            state: PhantomData,
        }
    }
}

impl<B: Backend + Clone> Fluid<B, Defined> {
    /// Re-flashes this fluid in place to a new specification (§4.E call
    /// shape 2, mutating variant).
    pub fn update(&mut self, a: (Param, f64), b: (Param, f64)) -> FlashResult<FlashOutcome> {
        flash::flash(&mut self.backend, a, b, &self.config)
    }

    /// Returns a new, independently-owned fluid at a different
    /// specification, leaving this one untouched (§9 copy-on-branch
    /// discipline).
    pub fn in_state(&self, a: (Param, f64), b: (Param, f64)) -> FlashResult<Fluid<B, Defined>> {
        let mut backend = self.backend.clone();
        flash::flash(&mut backend, a, b, &self.config)?;
        Ok(Fluid {
            backend,
            config: self.config,
            state: PhantomData,
        })
    }

    fn adapter(&self) -> Adapter<B> {
        Adapter::new(self.backend.clone())
    }

    fn molar_mass(&self) -> MolarMass {
        MolarMass::new(self.backend.molar_mass())
    }

    /// Read-only access to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current phase region (§3.4).
    pub fn phase(&self) -> Phase {
        self.adapter().phase()
    }

    /// A single property, converted to the requested unit system.
    pub fn property<Q: Quantity, U: Units>(&self) -> FlashResult<Q> {
        let molar_value = self.adapter().get(Q::PARAM)?;
        Ok(Q::from(convert::<U>(Q::PARAM, molar_value, self.molar_mass())))
    }

    /// Several properties at once, materialized into whatever `R`
    /// implements [`FromPropertyTuple`] — a tuple of [`Quantity`] types, or
    /// any user type built from one (§4.E call shape 1's static proxy).
    pub fn properties<R: FromPropertyTuple, U: Units>(&self) -> FlashResult<R> {
        let adapter = self.adapter();
        let mw = self.molar_mass();
        let mut values = Vec::with_capacity(R::PARAMS.len());
        for &tag in R::PARAMS {
            values.push(convert::<U>(tag, adapter.get(tag)?, mw));
        }
        Ok(R::from_values(&values))
    }

    /// The same properties, named at runtime by tag rather than by type
    /// (§4.E call shape 1's dynamic proxy).
    pub fn properties_dyn<U: Units>(&self, tags: &[Param]) -> FlashResult<Vec<f64>> {
        let adapter = self.adapter();
        let mw = self.molar_mass();
        tags.iter()
            .map(|&tag| Ok(convert::<U>(tag, adapter.get(tag)?, mw)))
            .collect()
    }
}

/// Converts a molar-basis property value of tag `param` to the requested
/// unit system, honoring the unit-invariant/density exceptions of §4.C.1.
fn convert<U: Units>(param: Param, molar_value: f64, mw: MolarMass) -> f64 {
    match param {
        Param::Rho => crate::units::density_from_molar::<U>(molar_value, mw),
        Param::T
        | Param::P
        | Param::X
        | Param::Z
        | Param::Kappa
        | Param::Alpha
        | Param::W
        | Param::Eta
        | Param::Nu
        | Param::Tc
        | Param::Pr
        | Param::Mw
        | Param::Phase
        | Param::Undefined
        | Param::Unknown => molar_value,
        _ => crate::units::from_molar::<U>(molar_value, mw),
    }
}

/// The result of a flash: the resulting [`Fluid`] plus whether the solver
/// converged (SPEC_FULL §7 addition — non-convergence is still an `Err`
/// from [`Fluid::flash`]/[`Fluid::update`], but a caller that already has a
/// `FlashResults` in hand can inspect the record without a second lookup).
#[derive(Debug)]
pub struct FlashResults<B> {
    fluid: Fluid<B, Defined>,
    outcome: FlashOutcome,
}

impl<B: Clone> Clone for FlashResults<B> {
    fn clone(&self) -> Self {
        Self {
            fluid: self.fluid.clone(),
            outcome: self.outcome,
        }
    }
}

impl<B> FlashResults<B> {
    /// Whether the solve reached its residual tolerance.
    pub fn converged(&self) -> bool {
        self.outcome.converged
    }

    /// Iterations used (`0` for a natively forwarded specification).
    pub fn iterations(&self) -> u32 {
        self.outcome.iterations
    }

    /// Residual at termination.
    pub fn residual(&self) -> f64 {
        self.outcome.residual
    }

    /// Unwraps into the underlying fluid, discarding the convergence
    /// record.
    pub fn into_fluid(self) -> Fluid<B, Defined> {
        self.fluid
    }
}

impl<B> Deref for FlashResults<B> {
    type Target = Fluid<B, Defined>;

    fn deref(&self) -> &Self::Target {
        &self.fluid
    }
}

impl<B> DerefMut for FlashResults<B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.fluid
    }
}

/// Converts a fixed-size slice of converted property values into a
/// caller-chosen container: a tuple of [`Quantity`] types, or any user type
/// that implements this trait directly (field-by-field, matching the order
/// of [`FromPropertyTuple::PARAMS`]).
pub trait FromPropertyTuple: Sized {
    /// The tags this container is assembled from, in order.
    const PARAMS: &'static [Param];

    /// Builds `Self` from already-converted property values, in the same
    /// order as [`FromPropertyTuple::PARAMS`].
    fn from_values(values: &[f64]) -> Self;
}

macro_rules! impl_from_property_tuple {
    ($($q:ident : $idx:tt),+) => {
        impl<$($q: Quantity),+> FromPropertyTuple for ($($q,)+) {
            const PARAMS: &'static [Param] = &[$($q::PARAM),+];

            fn from_values(values: &[f64]) -> Self {
                ($($q::from(values[$idx]),)+)
            }
        }
    };
}

impl_from_property_tuple!(Q1: 0);
impl_from_property_tuple!(Q1: 0, Q2: 1);
impl_from_property_tuple!(Q1: 0, Q2: 1, Q3: 2);
impl_from_property_tuple!(Q1: 0, Q2: 1, Q3: 2, Q4: 3);

/// Saturated-liquid or saturated-vapor properties at the current pressure
/// (§4.E call shape 3). If `fluid` is not in the two-phase region this
/// still evaluates the requested branch's properties at that pressure's
/// saturation point; callers that only want the value when the fluid is
/// actually on the dome should check [`Fluid::phase`] first.
pub fn phase_properties<B: Backend + Clone, R: FromPropertyTuple, U: Units>(
    fluid: &Fluid<B, Defined>,
    quality: f64,
) -> FlashResult<R> {
    let p = fluid.property::<crate::quantity::Pressure, crate::units::Molar>()?.value();
    let saturated = fluid.in_state((Param::P, p), (Param::X, quality))?;
    saturated.properties::<R, U>()
}

/// Saturation temperature at the fluid's current pressure, `NaN` above
/// `P_crit` (§4.E call shape 4).
pub fn saturation_temperature<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.adapter().t_sat(fluid.backend.p())
}

/// Saturation pressure at the fluid's current temperature, `NaN` above
/// `T_crit`.
pub fn saturation_pressure<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.adapter().p_sat(fluid.backend.t())
}

/// Critical temperature.
pub fn critical_temperature<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.backend.t_crit()
}

/// Critical pressure.
pub fn critical_pressure<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.backend.p_crit()
}

/// Lower validity bound for temperature.
pub fn min_temperature<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.backend.t_min()
}

/// Upper validity bound for temperature.
pub fn max_temperature<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.backend.t_max()
}

/// Lower validity bound for pressure.
pub fn min_pressure<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.backend.p_min()
}

/// Upper validity bound for pressure.
pub fn max_pressure<B: Backend + Clone>(fluid: &Fluid<B, Defined>) -> f64 {
    fluid.backend.p_max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{Enthalpy, Pressure, Temperature};
    use crate::test_support::IdealGasBackend;
    use crate::units::Molar;

    #[test]
    fn flash_then_read_back_pt() {
        let fluid = Fluid::new(IdealGasBackend::water());
        let results = fluid.flash((Param::P, 101_325.0), (Param::T, 298.15)).unwrap();
        assert!(results.converged());
        let t: Temperature = results.property::<Temperature, Molar>().unwrap();
        assert_eq!(t.value(), 298.15);
    }

    #[test]
    fn properties_tuple_matches_individual_queries() {
        let fluid = Fluid::new(IdealGasBackend::water())
            .flash((Param::P, 101_325.0), (Param::T, 310.0))
            .unwrap();
        let (p, t, h): (Pressure, Temperature, Enthalpy) =
            fluid.properties::<(Pressure, Temperature, Enthalpy), Molar>().unwrap();
        assert_eq!(p.value(), fluid.property::<Pressure, Molar>().unwrap().value());
        assert_eq!(t.value(), fluid.property::<Temperature, Molar>().unwrap().value());
        assert_eq!(h.value(), fluid.property::<Enthalpy, Molar>().unwrap().value());
    }

    #[test]
    fn properties_dyn_matches_typed_query() {
        let fluid = Fluid::new(IdealGasBackend::water())
            .flash((Param::P, 101_325.0), (Param::T, 310.0))
            .unwrap();
        let values = fluid.properties_dyn::<Molar>(&[Param::P, Param::H]).unwrap();
        assert_eq!(values[0], fluid.property::<Pressure, Molar>().unwrap().value());
        assert_eq!(values[1], fluid.property::<Enthalpy, Molar>().unwrap().value());
    }

    #[test]
    fn in_state_leaves_original_untouched() {
        let fluid = Fluid::new(IdealGasBackend::water())
            .flash((Param::P, 101_325.0), (Param::T, 298.15))
            .unwrap()
            .into_fluid();
        let other = fluid.in_state((Param::P, 5.0e6), (Param::T, 500.0)).unwrap();
        assert_eq!(fluid.backend().t(), 298.15);
        assert_eq!(other.backend().t(), 500.0);
    }

    #[test]
    fn saturation_temperature_matches_tx_round_trip() {
        let fluid = Fluid::new(IdealGasBackend::water())
            .flash((Param::P, 101_325.0), (Param::X, 0.5))
            .unwrap()
            .into_fluid();
        let t_sat = saturation_temperature(&fluid);
        assert!((t_sat - fluid.backend().t()).abs() < 1e-6);
    }
}
