//! Runtime property registry.
//!
//! [`Param`] is the enum form of every quantity in [`crate::quantity`], used
//! wherever properties are requested by tag rather than by static type (the
//! dynamic proxy of component E, the backend contract of component B). The
//! string aliases are resolved at compile time via `strum` derives rather
//! than a `HashMap` built at startup -- the idiomatic Rust equivalent of the
//! two lookup tables named in the original design.

use strum_macros::{AsRefStr, EnumString, FromRepr};

/// Enum form of every thermodynamic quantity the engine knows about, plus
/// the two sentinel tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, FromRepr)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Param {
    /// Temperature.
    #[strum(serialize = "T", serialize = "TEMPERATURE")]
    T,
    /// Pressure.
    #[strum(serialize = "P", serialize = "PRESSURE")]
    P,
    /// Density.
    #[strum(serialize = "RHO", serialize = "D", serialize = "DENSITY")]
    Rho,
    /// Specific volume.
    #[strum(serialize = "V", serialize = "VOLUME")]
    V,
    /// Enthalpy.
    #[strum(serialize = "H", serialize = "ENTHALPY")]
    H,
    /// Entropy.
    #[strum(serialize = "S", serialize = "ENTROPY")]
    S,
    /// Internal energy.
    #[strum(serialize = "U", serialize = "INTERNAL_ENERGY")]
    U,
    /// Vapor quality.
    #[strum(serialize = "X", serialize = "Q", serialize = "QUALITY")]
    X,
    /// Helmholtz energy.
    #[strum(serialize = "A", serialize = "HELMHOLTZ")]
    A,
    /// Gibbs energy.
    #[strum(serialize = "G", serialize = "GIBBS")]
    G,
    /// Compressibility factor.
    #[strum(serialize = "Z", serialize = "COMPRESSIBILITY")]
    Z,
    /// Isothermal compressibility.
    #[strum(serialize = "KAPPA", serialize = "ISOTHERMAL_COMPRESSIBILITY")]
    Kappa,
    /// Thermal expansion coefficient.
    #[strum(serialize = "ALPHA", serialize = "THERMAL_EXPANSION")]
    Alpha,
    /// Isobaric heat capacity.
    #[strum(serialize = "CP", serialize = "ISOBARIC_HEAT_CAPACITY")]
    Cp,
    /// Isochoric heat capacity.
    #[strum(serialize = "CV", serialize = "ISOCHORIC_HEAT_CAPACITY")]
    Cv,
    /// Speed of sound.
    #[strum(serialize = "W", serialize = "SPEED_OF_SOUND")]
    W,
    /// Dynamic viscosity.
    #[strum(serialize = "ETA", serialize = "VISCOSITY")]
    Eta,
    /// Kinematic viscosity.
    #[strum(serialize = "NU", serialize = "KINEMATIC_VISCOSITY")]
    Nu,
    /// Thermal conductivity.
    #[strum(serialize = "TC", serialize = "THERMAL_CONDUCTIVITY")]
    Tc,
    /// Prandtl number.
    #[strum(serialize = "PR", serialize = "PRANDTL")]
    Pr,
    /// Molar mass.
    #[strum(serialize = "MW", serialize = "MOLAR_MASS")]
    Mw,
    /// Phase classifier.
    #[strum(serialize = "PHASE")]
    Phase,
    /// Computation attempted and failed.
    #[strum(serialize = "UNDEFINED")]
    Undefined,
    /// Property not requested/unavailable.
    #[strum(serialize = "UNKNOWN")]
    Unknown,
}

impl Param {
    /// Canonical short string for this tag (the first alias listed).
    pub fn canonical(self) -> &'static str {
        self.as_ref()
    }

    /// Resolves a string alias, case-insensitively, falling back to
    /// [`Param::Unknown`] rather than erroring on anything unrecognized
    /// (§4.F).
    pub fn parse_or_unknown(s: &str) -> Self {
        s.parse().unwrap_or(Param::Unknown)
    }

    /// Whether this tag is one of the two "current state" primaries that a
    /// backend natively sets (`P` or `T`).
    pub fn is_native_axis(self) -> bool {
        matches!(self, Param::P | Param::T)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_aliases_resolve_to_same_tag() {
        assert_eq!(Param::parse_or_unknown("p"), Param::P);
        assert_eq!(Param::parse_or_unknown("Pressure"), Param::P);
        assert_eq!(Param::parse_or_unknown("pressure"), Param::P);
    }

    #[test]
    fn unrecognized_alias_maps_to_unknown() {
        assert_eq!(Param::parse_or_unknown("not-a-property"), Param::Unknown);
    }

    #[test]
    fn density_and_volume_are_distinct_tags() {
        assert_ne!(Param::Rho, Param::V);
    }
}
