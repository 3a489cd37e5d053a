//! Flash solver (component D, §4.D).
//!
//! Dispatches a requested two-variable specification to the appropriate
//! solve strategy: native forwarding when the backend supports the pair
//! directly (§4.A), a 1-D bracketed bisection when one of the two variables
//! is the backend-native `P` or `T` axis (§4.D.2/§4.D.3), or a damped 2-D
//! Newton iteration over `(P, T)` otherwise (§4.D.5).

mod solver1d;
mod solver2d;

use crate::backend::Backend;
use crate::config::FlashConfig;
use crate::error::{FlashError, FlashResult};
use crate::param::Param;
use crate::spec::StateSpec;

/// Outcome of a flash solve.
///
/// Non-convergence of the iterative solvers is still reported as an `Err`
/// (a caller asking for a property it cannot get needs to know), but the
/// iteration/residual record is carried on this struct so a caller that
/// wants the best-effort state anyway can inspect it before deciding
/// (SPEC_FULL §7 addition).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashOutcome {
    /// Whether the residual tolerance was reached within the iteration cap.
    pub converged: bool,
    /// Iterations actually used (`0` for a natively forwarded setter).
    pub iterations: u32,
    /// Residual norm at termination (`0.0` when natively forwarded).
    pub residual: f64,
}

impl FlashOutcome {
    fn native() -> Self {
        Self {
            converged: true,
            iterations: 0,
            residual: 0.0,
        }
    }
}

/// Sets `backend`'s state to satisfy `(a.0, a.1)` and `(b.0, b.1)`,
/// dispatching by the pair's [`StateSpec`] (§4.A).
pub fn flash<B: Backend + Clone>(
    backend: &mut B,
    a: (Param, f64),
    b: (Param, f64),
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    let pair = StateSpec::try_from((a.0, b.0)).map_err(|_| FlashError::UnsupportedSpecification {
        function: "flash",
        params: vec![(a.0.canonical(), a.1), (b.0.canonical(), b.1)],
    })?;

    let (p1, p2) = pair.params();
    let value_for = |want: Param| -> FlashResult<f64> {
        if a.0 == want {
            Ok(a.1)
        } else if a.0 == Param::V && want == Param::Rho {
            Ok(1.0 / a.1)
        } else if b.0 == want {
            Ok(b.1)
        } else if b.0 == Param::V && want == Param::Rho {
            Ok(1.0 / b.1)
        } else {
            Err(FlashError::InvalidInput {
                function: "flash",
                params: vec![(a.0.canonical(), a.1), (b.0.canonical(), b.1)],
            })
        }
    };
    let v1 = value_for(p1)?;
    let v2 = value_for(p2)?;

    if !v1.is_finite() || !v2.is_finite() {
        return Err(FlashError::InvalidInput {
            function: "flash",
            params: vec![(p1.canonical(), v1), (p2.canonical(), v2)],
        });
    }

    tracing::trace!(
        spec = ?pair,
        p1 = p1.canonical(),
        v1,
        p2 = p2.canonical(),
        v2,
        "flash entry"
    );

    dispatch(backend, pair, (p1, v1), (p2, v2), config)
}

fn dispatch<B: Backend + Clone>(
    backend: &mut B,
    pair: StateSpec,
    (p1, v1): (Param, f64),
    (p2, v2): (Param, f64),
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    use StateSpec::*;

    let branch = match pair {
        PT | PX | TX => "native",
        PH | PS | PU | PD | TD => "native-then-1d",
        TH | TS | TU => "1d",
        HS | UV | HV | DS | DH | DU | SU => "2d-newton",
    };
    tracing::trace!(spec = ?pair, branch, "flash branch classification");

    match pair {
        PT => {
            backend.set_pt(v1, v2)?;
            Ok(FlashOutcome::native())
        }
        PX => {
            backend.set_px(v1, v2)?;
            Ok(FlashOutcome::native())
        }
        TX => {
            backend.set_tx(v1, v2)?;
            Ok(FlashOutcome::native())
        }
        PH | PS | PU | PD | TD => try_native_then_1d(backend, pair, (p1, v1), (p2, v2), config),
        TH | TS | TU => solver1d::solve(backend, pair, (p1, v1), (p2, v2), config),
        HS | UV | HV | DS | DH | DU | SU => solver2d::solve(backend, pair, (p1, v1), (p2, v2), config),
    }
}

/// `PH`/`PS`/`PU`/`PD`/`TD` all have a direct backend setter (`set_ph`,
/// `set_ps`, `set_pu`, `set_dp`, `set_dt`); a backend that overrides it
/// answers in one call, one that doesn't falls through to the 1-D solver
/// with the same fixed/target roles.
fn try_native_then_1d<B: Backend + Clone>(
    backend: &mut B,
    pair: StateSpec,
    (p1, v1): (Param, f64),
    (p2, v2): (Param, f64),
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    use StateSpec::*;

    let native_result = match pair {
        PH => backend.set_ph(v1, v2),
        PS => backend.set_ps(v1, v2),
        PU => backend.set_pu(v1, v2),
        PD => backend.set_dp(v2, v1),
        TD => backend.set_dt(v2, v1),
        _ => unreachable!("try_native_then_1d only handles PH/PS/PU/PD/TD"),
    };

    match native_result {
        Ok(()) => Ok(FlashOutcome::native()),
        Err(FlashError::UnsupportedSpecification { .. }) => {
            solver1d::solve(backend, pair, (p1, v1), (p2, v2), config)
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::IdealGasBackend;

    #[test]
    fn pt_forwards_natively_with_zero_iterations() {
        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let outcome = flash(&mut backend, (Param::P, 101_325.0), (Param::T, 298.15), &config).unwrap();
        assert_eq!(outcome, FlashOutcome::native());
        assert_eq!(backend.p(), 101_325.0);
        assert_eq!(backend.t(), 298.15);
    }

    #[test]
    fn v_normalizes_to_reciprocal_density() {
        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let rho = backend.rho();
        flash(&mut backend, (Param::P, backend.p()), (Param::V, 1.0 / rho), &config).unwrap();
        assert!((backend.rho() - rho).abs() / rho < 1e-6);
    }

    #[test]
    fn rejects_same_tag_pair() {
        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let err = flash(&mut backend, (Param::P, 1.0), (Param::P, 2.0), &config).unwrap_err();
        assert!(matches!(err, FlashError::UnsupportedSpecification { .. }));
    }

    #[test]
    fn rejects_non_finite_input() {
        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let err = flash(&mut backend, (Param::P, 101_325.0), (Param::T, f64::NAN), &config).unwrap_err();
        assert!(matches!(err, FlashError::InvalidInput { .. }));
    }
}
