//! Strongly-typed thermodynamic flash engine core.
//!
//! Given any two of a fluid's state variables, [`fluid::flash`] (via
//! [`fluid::Fluid::flash`]) determines the remaining thermodynamic state and
//! exposes every derived property through a unit-aware, compile-time-typed
//! API. Backends (component B, [`backend::Backend`]) supply the underlying
//! equation of state; this crate supplies the specification algebra
//! (component A, [`spec::StateSpec`]), the property fallbacks and numerical
//! derivatives that fill the gaps a backend leaves open (component C,
//! [`adapter::Adapter`]), the flash solver (component D, [`flash`]), and the
//! typestate fluid handle that ties it all together (component E,
//! [`fluid::Fluid`]).
//!
//! ## License
//!
//! This project is licensed under [MIT License](https://github.com/portyanikhin/rfluids/blob/main/LICENSE).

#![warn(missing_docs)]

pub mod adapter;
pub mod backend;
pub mod config;
pub mod derivative;
pub mod error;
pub mod flash;
pub mod fluid;
pub mod param;
pub mod phase;
pub mod prelude;
pub mod quantity;
pub mod spec;
pub mod state_variant;
pub mod units;

/// A synthetic [`backend::Backend`] used by this crate's own tests and
/// available to integration tests for the same purpose.
pub mod test_support;
