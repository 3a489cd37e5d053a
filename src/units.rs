//! Molar ↔ mass unit bridge (component F).
//!
//! Every property query carries a unit tag. The conversion factor is `1`
//! for [`Molar`] and the molar mass for [`Mass`]; `P`, `T`, `X`, `Z`, `Kappa`,
//! `Alpha` and `Phase` are unit-invariant and ignore the tag entirely.
//!
//! An extensive per-mole quantity converts to a per-mass basis by
//! *dividing* by the molar mass (`J/kg = (J/mol) / (kg/mol)`); density
//! converts the other way, by *multiplying* (`kg/m³ = (mol/m³) · (kg/mol)`),
//! since density is an inverse-extensive quantity.

use crate::quantity::MolarMass;

mod sealed {
    pub trait Sealed {}
}

/// A unit system a property value can be expressed in.
pub trait Units: sealed::Sealed {
    /// Conversion factor from the molar value to this unit system, given
    /// the fluid's molar mass.
    fn factor(molar_mass: MolarMass) -> f64;
}

/// Per mole (the backend-native unit system, §4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Molar;

/// Per unit mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mass;

impl sealed::Sealed for Molar {}
impl sealed::Sealed for Mass {}

impl Units for Molar {
    fn factor(_molar_mass: MolarMass) -> f64 {
        1.0
    }
}

impl Units for Mass {
    fn factor(molar_mass: MolarMass) -> f64 {
        molar_mass.value()
    }
}

/// Converts a molar-basis extensive value (energy, entropy, etc.) to the
/// requested unit system.
pub fn from_molar<U: Units>(molar_value: f64, molar_mass: MolarMass) -> f64 {
    molar_value / U::factor(molar_mass)
}

/// Converts a value expressed in the requested unit system back to molar
/// basis.
pub fn to_molar<U: Units>(value: f64, molar_mass: MolarMass) -> f64 {
    value * U::factor(molar_mass)
}

/// Converts a molar-basis density to the requested unit system (density
/// multiplies rather than divides by the conversion factor, per §4.C.1).
pub fn density_from_molar<U: Units>(molar_density: f64, molar_mass: MolarMass) -> f64 {
    molar_density * U::factor(molar_mass)
}

/// Converts a density expressed in the requested unit system back to molar
/// basis.
pub fn density_to_molar<U: Units>(density: f64, molar_mass: MolarMass) -> f64 {
    density / U::factor(molar_mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molar_is_identity() {
        let mw = MolarMass::new(0.018015);
        assert_eq!(from_molar::<Molar>(1.0, mw), 1.0);
    }

    #[test]
    fn mass_round_trips_through_molar_mass() {
        let mw = MolarMass::new(0.018015);
        let molar = 1000.0;
        let mass = from_molar::<Mass>(molar, mw);
        assert_eq!(to_molar::<Mass>(mass, mw), molar);
    }

    #[test]
    fn density_conversion_is_inverse_of_extensive_conversion() {
        let mw = MolarMass::new(0.018015);
        let molar_rho = 55000.0;
        let mass_rho = density_from_molar::<Mass>(molar_rho, mw);
        assert_eq!(density_to_molar::<Mass>(mass_rho, mw), molar_rho);
    }
}
