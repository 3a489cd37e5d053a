//! Convenient re-exports of commonly used types and traits.

pub use crate::backend::Backend;
pub use crate::config::FlashConfig;
pub use crate::error::{FlashError, FlashResult};
pub use crate::flash::FlashOutcome;
pub use crate::fluid::{
    critical_pressure, critical_temperature, max_pressure, max_temperature, min_pressure,
    min_temperature, phase_properties, saturation_pressure, saturation_temperature, Fluid,
    FlashResults, FromPropertyTuple,
};
pub use crate::param::Param;
pub use crate::phase::Phase;
pub use crate::quantity::{
    Compressibility, Density, Enthalpy, Entropy, Gibbs, Helmholtz, InternalEnergy,
    IsobaricHeatCapacity, IsochoricHeatCapacity, IsothermalCompressibility, KinematicViscosity,
    MolarMass, Prandtl, Pressure, Quality, Quantity, SpeedOfSound, Temperature,
    ThermalConductivity, ThermalExpansion, Viscosity, Volume,
};
pub use crate::spec::StateSpec;
pub use crate::state_variant::{Defined, StateVariant, Undefined};
pub use crate::units::{Mass, Molar, Units};
