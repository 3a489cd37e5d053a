//! Error handling.

use thiserror::Error;

/// A single named `(parameter, value)` pair attached to an error, in the
/// order the parameters were evaluated.
pub type ErrorParams = Vec<(&'static str, f64)>;

/// Errors raised anywhere in the flash engine.
///
/// Every fallible entry point in this crate returns `Result<_, FlashError>`.
/// There is no other error type and no panic path for a caller-triggerable
/// condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlashError {
    /// An input value lies outside the backend's validity envelope
    /// (`[T_min, T_max]`, `[P_min, P_max]`, or the admissible quality range).
    #[error("{function}: input(s) out of range: {}", format_params(.params))]
    OutOfRange {
        /// Name of the function that raised the error.
        function: &'static str,
        /// Offending parameter names and values.
        params: ErrorParams,
    },

    /// The backend lacks a setter for the requested specification pair and
    /// no thermodynamic-identity fallback applies.
    #[error("{function}: unsupported specification: {}", format_params(.params))]
    UnsupportedSpecification {
        /// Name of the function that raised the error.
        function: &'static str,
        /// The two state variables that make up the rejected specification.
        params: ErrorParams,
    },

    /// The flash solver exhausted its iteration cap without reaching the
    /// residual tolerance. The backend is left at the best-residual
    /// iterate; callers that need strict convergence should treat this as
    /// fatal, callers that accept best-effort results may proceed.
    #[error("{function}: did not converge after {iterations} iterations (residual {residual:e}): {}", format_params(.params))]
    NonConvergence {
        /// Name of the function that raised the error.
        function: &'static str,
        /// Iteration count at termination.
        iterations: u32,
        /// Residual norm at termination.
        residual: f64,
        /// State variables at the best-effort iterate.
        params: ErrorParams,
    },

    /// A supplied value is NaN or otherwise non-finite.
    #[error("{function}: invalid (non-finite) input: {}", format_params(.params))]
    InvalidInput {
        /// Name of the function that raised the error.
        function: &'static str,
        /// Offending parameter names and values.
        params: ErrorParams,
    },
}

fn format_params(params: &ErrorParams) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl FlashError {
    /// Name of the function that raised this error.
    pub fn function(&self) -> &'static str {
        match self {
            Self::OutOfRange { function, .. }
            | Self::UnsupportedSpecification { function, .. }
            | Self::NonConvergence { function, .. }
            | Self::InvalidInput { function, .. } => function,
        }
    }

    /// The parameter name/value pairs attached to this error.
    pub fn params(&self) -> &[(&'static str, f64)] {
        match self {
            Self::OutOfRange { params, .. }
            | Self::UnsupportedSpecification { params, .. }
            | Self::NonConvergence { params, .. }
            | Self::InvalidInput { params, .. } => params,
        }
    }
}

/// Result alias used throughout the crate.
pub type FlashResult<T> = Result<T, FlashError>;
