//! Strongly-typed scalar quantities.
//!
//! Each thermodynamic property is a distinct newtype wrapping an `f64`.
//! Quantities with the same physical dimension but different names (e.g.
//! [`Gibbs`] and [`Enthalpy`], both energy-per-amount) are different types
//! and do not arithmetic-combine with one another; only same-tag
//! addition/subtraction and explicit unwrapping to `f64` are provided.

use std::fmt;
use std::ops::{Add, Sub};

use crate::param::Param;

/// Links a typed quantity to the [`Param`] tag it corresponds to, and
/// describes how it converts between molar and mass bases (component F,
/// §4.E's typed `property<Q, Units>()` call shape).
pub trait Quantity: From<f64> {
    /// The property tag this quantity corresponds to.
    const PARAM: Param;
    /// Whether this is a density-like quantity (converts by multiplying by
    /// the molar mass rather than dividing, §4.C.1).
    const IS_DENSITY: bool = false;
    /// Whether this quantity ignores the requested unit system entirely
    /// (temperature, pressure, quality, and the dimensionless/intrinsic
    /// properties that are not expressed per amount of substance).
    const UNIT_INVARIANT: bool = false;
}

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        pub struct $name(pub f64);

        impl $name {
            /// Wraps a raw value.
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Returns the underlying value.
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }
    };
}

quantity!(
    /// Absolute temperature, K.
    Temperature
);
impl Quantity for Temperature {
    const PARAM: Param = Param::T;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Absolute pressure, Pa.
    Pressure
);
impl Quantity for Pressure {
    const PARAM: Param = Param::P;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Density, mol/m³ (molar) or kg/m³ (mass), per the unit tag in force.
    Density
);
impl Quantity for Density {
    const PARAM: Param = Param::Rho;
    const IS_DENSITY: bool = true;
}

quantity!(
    /// Specific volume, the reciprocal of [`Density`].
    Volume
);
impl Quantity for Volume {
    const PARAM: Param = Param::V;
}

quantity!(
    /// Enthalpy.
    Enthalpy
);
impl Quantity for Enthalpy {
    const PARAM: Param = Param::H;
}

quantity!(
    /// Entropy.
    Entropy
);
impl Quantity for Entropy {
    const PARAM: Param = Param::S;
}

quantity!(
    /// Internal energy.
    InternalEnergy
);
impl Quantity for InternalEnergy {
    const PARAM: Param = Param::U;
}

/// Vapor quality, mass (or mole) fraction of vapor in a two-phase mixture,
/// `0.0` = saturated liquid, `1.0` = saturated vapor. Not meaningful outside
/// `[0, 1]`.
quantity!(Quality);
impl Quantity for Quality {
    const PARAM: Param = Param::X;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Helmholtz free energy.
    Helmholtz
);
impl Quantity for Helmholtz {
    const PARAM: Param = Param::A;
}

quantity!(
    /// Gibbs free energy.
    Gibbs
);
impl Quantity for Gibbs {
    const PARAM: Param = Param::G;
}

quantity!(
    /// Compressibility factor, `Z = P / (rho * R * T)`. Dimensionless.
    Compressibility
);
impl Quantity for Compressibility {
    const PARAM: Param = Param::Z;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Isothermal compressibility, `-1/V * (dV/dP)_T`.
    IsothermalCompressibility
);
impl Quantity for IsothermalCompressibility {
    const PARAM: Param = Param::Kappa;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Thermal expansion coefficient, `1/V * (dV/dT)_P`.
    ThermalExpansion
);
impl Quantity for ThermalExpansion {
    const PARAM: Param = Param::Alpha;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Isobaric heat capacity.
    IsobaricHeatCapacity
);
impl Quantity for IsobaricHeatCapacity {
    const PARAM: Param = Param::Cp;
}

quantity!(
    /// Isochoric heat capacity.
    IsochoricHeatCapacity
);
impl Quantity for IsochoricHeatCapacity {
    const PARAM: Param = Param::Cv;
}

quantity!(
    /// Speed of sound.
    SpeedOfSound
);
impl Quantity for SpeedOfSound {
    const PARAM: Param = Param::W;
    const UNIT_INVARIANT: bool = true;
}

/// Dynamic viscosity. NaN in the two-phase region (§3.4).
quantity!(Viscosity);
impl Quantity for Viscosity {
    const PARAM: Param = Param::Eta;
    const UNIT_INVARIANT: bool = true;
}

/// Kinematic viscosity, `eta / rho`. NaN in the two-phase region.
quantity!(KinematicViscosity);
impl Quantity for KinematicViscosity {
    const PARAM: Param = Param::Nu;
    const UNIT_INVARIANT: bool = true;
}

/// Thermal conductivity. NaN in the two-phase region.
quantity!(ThermalConductivity);
impl Quantity for ThermalConductivity {
    const PARAM: Param = Param::Tc;
    const UNIT_INVARIANT: bool = true;
}

/// Prandtl number, `Cp * eta / TC`. NaN in the two-phase region.
quantity!(Prandtl);
impl Quantity for Prandtl {
    const PARAM: Param = Param::Pr;
    const UNIT_INVARIANT: bool = true;
}

quantity!(
    /// Molar mass.
    MolarMass
);
impl Quantity for MolarMass {
    const PARAM: Param = Param::Mw;
    const UNIT_INVARIANT: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_param_tags_match_the_registry() {
        assert_eq!(Temperature::PARAM, Param::T);
        assert_eq!(Density::PARAM, Param::Rho);
        assert!(Density::IS_DENSITY);
        assert!(Temperature::UNIT_INVARIANT);
        assert!(!Enthalpy::UNIT_INVARIANT);
    }

    #[test]
    fn same_tag_arithmetic_round_trips_value() {
        let a = Temperature::new(300.0);
        let b = Temperature::new(25.0);
        assert_eq!((a - b).value(), 275.0);
        assert_eq!((a + b).value(), 325.0);
    }

    #[test]
    fn display_matches_underlying_value() {
        assert_eq!(Pressure::new(101325.0).to_string(), "101325");
    }
}
