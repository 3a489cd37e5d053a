//! 2-D damped-Newton flash solves (§4.D.5): neither requested variable is
//! the backend-native `P` or `T` axis, so the engine iterates directly on
//! `(P, T)` to match both properties at once.
//!
//! The step multiplier halves whenever a trial step worsens the residual
//! norm and resets to `1.0` whenever one improves it, box-constrained to
//! the backend's `(P, T)` validity limits throughout, per §4.D.5.

use crate::adapter::Adapter;
use crate::backend::Backend;
use crate::config::FlashConfig;
use crate::error::{FlashError, FlashResult};
use crate::param::Param;
use crate::spec::StateSpec;

use super::FlashOutcome;

pub(super) fn solve<B: Backend + Clone>(
    backend: &mut B,
    _pair: StateSpec,
    (p1, v1): (Param, f64),
    (p2, v2): (Param, f64),
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    let (mut p, mut t) = backend
        .guess_pt((p1.canonical(), v1), (p2.canonical(), v2))
        .unwrap_or_else(|| (backend.p(), backend.t()));

    let residual = |p: f64, t: f64| -> FlashResult<(f64, f64)> {
        let mut probe = backend.clone();
        probe.set_pt(p, t)?;
        let adapter = Adapter::new(probe);
        Ok((adapter.get(p1)? - v1, adapter.get(p2)? - v2))
    };

    let scale1 = v1.abs().max(config.abs_tolerance);
    let scale2 = v2.abs().max(config.abs_tolerance);
    let norm = |r1: f64, r2: f64| ((r1 / scale1).powi(2) + (r2 / scale2).powi(2)).sqrt();

    let (mut r1, mut r2) = residual(p, t)?;
    let mut best_norm = norm(r1, r2);
    let mut step = config.initial_step_multiplier;
    let mut iterations = 0u32;
    let mut converged = best_norm <= config.epsilon;

    let p_min = backend.p_min();
    let p_max = backend.p_max();
    let t_min = backend.t_min();
    let t_max = backend.t_max();

    while !converged && iterations < config.max_iterations {
        iterations += 1;

        let h_p = (p.abs() * 1e-6).max(1e-6);
        let h_t = (t.abs() * 1e-6).max(1e-6);

        let (r1_p_plus, r2_p_plus) = residual(p + h_p, t)?;
        let (r1_p_minus, r2_p_minus) = residual(p - h_p, t)?;
        let (r1_t_plus, r2_t_plus) = residual(p, t + h_t)?;
        let (r1_t_minus, r2_t_minus) = residual(p, t - h_t)?;

        let d_r1_dp = (r1_p_plus - r1_p_minus) / (2.0 * h_p);
        let d_r2_dp = (r2_p_plus - r2_p_minus) / (2.0 * h_p);
        let d_r1_dt = (r1_t_plus - r1_t_minus) / (2.0 * h_t);
        let d_r2_dt = (r2_t_plus - r2_t_minus) / (2.0 * h_t);

        let det = d_r1_dp * d_r2_dt - d_r1_dt * d_r2_dp;
        if det.abs() < 1e-300 || !det.is_finite() {
            tracing::warn!(
                p1 = p1.canonical(),
                v1,
                p2 = p2.canonical(),
                v2,
                iterations,
                residual = best_norm,
                "2-D flash Jacobian is singular"
            );
            return Err(FlashError::NonConvergence {
                function: "flash::solve_2d",
                iterations,
                residual: best_norm,
                params: vec![(p1.canonical(), v1), (p2.canonical(), v2)],
            });
        }

        let delta_p = -(r1 * d_r2_dt - r2 * d_r1_dt) / det;
        let delta_t = -(d_r1_dp * r2 - d_r2_dp * r1) / det;

        let trial_p = (p + step * delta_p).clamp(p_min, p_max);
        let trial_t = (t + step * delta_t).clamp(t_min, t_max);

        let (trial_r1, trial_r2) = residual(trial_p, trial_t)?;
        let trial_norm = norm(trial_r1, trial_r2);

        tracing::trace!(
            iteration = iterations,
            p = trial_p,
            t = trial_t,
            residual = trial_norm,
            step,
            "flash 2-D iteration"
        );

        if trial_norm < best_norm {
            p = trial_p;
            t = trial_t;
            r1 = trial_r1;
            r2 = trial_r2;
            best_norm = trial_norm;
            step = 1.0;
            converged = best_norm <= config.epsilon;
        } else {
            step *= 0.5;
            if step < 1e-12 {
                break;
            }
        }
    }

    backend.set_pt(p, t)?;

    if !converged {
        tracing::warn!(
            p1 = p1.canonical(),
            v1,
            p2 = p2.canonical(),
            v2,
            iterations,
            residual = best_norm,
            "2-D flash did not converge within the iteration cap"
        );
        return Err(FlashError::NonConvergence {
            function: "flash::solve_2d",
            iterations,
            residual: best_norm,
            params: vec![(p1.canonical(), v1), (p2.canonical(), v2)],
        });
    }

    Ok(FlashOutcome {
        converged: true,
        iterations,
        residual: best_norm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::IdealGasBackend;

    #[test]
    fn hs_recovers_the_source_state_single_phase() {
        let mut source = IdealGasBackend::water();
        source.set_pt(2.0e6, 350.0).unwrap();
        let h_target = source.h();
        let s_target = source.s();

        let mut backend = IdealGasBackend::water();
        backend.set_pt(101_325.0, 298.15).unwrap();
        let config = FlashConfig::default();

        let outcome = solve(
            &mut backend,
            StateSpec::HS,
            (Param::H, h_target),
            (Param::S, s_target),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.p() - 2.0e6).abs() / 2.0e6 < 1e-3);
        assert!((backend.t() - 350.0).abs() < 1e-2);
    }

    #[test]
    fn uv_recovers_the_source_state() {
        let mut source = IdealGasBackend::water();
        source.set_pt(500_000.0, 420.0).unwrap();
        let u_target = source.u();
        let rho_target = source.rho();

        let mut backend = IdealGasBackend::water();
        backend.set_pt(101_325.0, 298.15).unwrap();
        let config = FlashConfig::default();

        let outcome = solve(
            &mut backend,
            StateSpec::UV,
            (Param::U, u_target),
            (Param::Rho, rho_target),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.p() - 500_000.0).abs() / 500_000.0 < 1e-2);
        assert!((backend.t() - 420.0).abs() < 1e-1);
    }
}
