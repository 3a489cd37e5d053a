//! 1-D flash solves (§4.D.2/§4.D.3/§4.D.4): one state variable is the
//! backend-native `P` or `T`, fixed directly; the engine searches the other
//! for the value that reproduces the requested property.
//!
//! Subcritical searches are branch-aware: the target is compared against
//! the true saturated-liquid and saturated-vapor values at the relevant
//! saturation point (via `set_tx`/`set_px`, never `set_pt`, since a single
//! `(P, T)` pair cannot represent a two-phase state) before bisecting,
//! mirroring the branch classification the original KSteam flash engine
//! performs in `calcPSpecSaturation`/`calcPSpecLiquid`/`calcPSpecVapor`.
//!
//! The liquid branch is not always monotonic in the search axis: density
//! has an interior extremum in temperature at fixed pressure (`P,ρ`/`P,V`,
//! §4.D.3), and enthalpy/entropy/internal energy have an analogous interior
//! extremum in pressure at fixed temperature (`T,H`/`T,S`/`T,U`, §4.D.4).
//! [`find_extremum`] locates that point numerically (a sign change in the
//! Richardson derivative, rather than `computeFlashPRHO`'s fixed piecewise
//! polynomial, since this engine's backend is not assumed to be IAPWS-97
//! water specifically) and [`split_at_extremum`] restricts the search to
//! whichever sub-branch the target value, or failing that the backend's own
//! `guess_pt`, indicates.

use crate::adapter::Adapter;
use crate::backend::Backend;
use crate::config::FlashConfig;
use crate::error::{FlashError, FlashResult};
use crate::param::Param;
use crate::spec::StateSpec;

use super::FlashOutcome;

pub(super) fn solve<B: Backend + Clone>(
    backend: &mut B,
    pair: StateSpec,
    (fixed_param, fixed_value): (Param, f64),
    (target, target_value): (Param, f64),
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    let _ = pair;
    match fixed_param {
        Param::P => search_temperature(backend, fixed_value, target, target_value, config),
        Param::T => search_pressure(backend, fixed_value, target, target_value, config),
        _ => unreachable!("1-D flash solves always fix P or T"),
    }
}

fn eval_pt<B: Backend + Clone>(backend: &B, p: f64, t: f64, target: Param) -> FlashResult<f64> {
    let mut probe = backend.clone();
    probe.set_pt(p, t)?;
    Adapter::new(probe).get(target)
}

fn eval_tx<B: Backend + Clone>(backend: &B, t: f64, x: f64, target: Param) -> FlashResult<f64> {
    let mut probe = backend.clone();
    probe.set_tx(t, x)?;
    Adapter::new(probe).get(target)
}

fn eval_px<B: Backend + Clone>(backend: &B, p: f64, x: f64, target: Param) -> FlashResult<f64> {
    let mut probe = backend.clone();
    probe.set_px(p, x)?;
    Adapter::new(probe).get(target)
}

/// Saturated-liquid pressure, liquid value and vapor value of `target` at
/// fixed `t`. `None` if the backend cannot answer `set_tx` at all.
fn saturation_dome_t<B: Backend + Clone>(backend: &B, t: f64, target: Param) -> Option<(f64, f64, f64)> {
    let mut liq = backend.clone();
    liq.set_tx(t, 0.0).ok()?;
    let p_sat = liq.p();
    let liq_val = Adapter::new(liq).get(target).ok()?;
    let vap_val = eval_tx(backend, t, 1.0, target).ok()?;
    Some((p_sat, liq_val, vap_val))
}

/// Saturated-liquid temperature, liquid value and vapor value of `target`
/// at fixed `p`.
fn saturation_dome_p<B: Backend + Clone>(backend: &B, p: f64, target: Param) -> Option<(f64, f64, f64)> {
    let mut liq = backend.clone();
    liq.set_px(p, 0.0).ok()?;
    let t_sat = liq.t();
    let liq_val = Adapter::new(liq).get(target).ok()?;
    let vap_val = eval_px(backend, p, 1.0, target).ok()?;
    Some((t_sat, liq_val, vap_val))
}

/// Locates the point in `(lo, hi)` where `eval`'s derivative with respect to
/// the search axis changes sign, by bisecting on the sign of a Richardson
/// derivative. Returns `None` when the derivative signs at `lo` and `hi`
/// already agree (the function is monotonic on this window, so there is no
/// interior extremum to split around).
fn find_extremum<B, E>(backend: &B, lo: f64, hi: f64, eval: &E) -> Option<f64>
where
    B: Backend + Clone,
    E: Fn(&B, f64) -> FlashResult<f64>,
{
    if !(hi > lo) {
        return None;
    }
    let derivative_at = |x: f64| crate::derivative::richardson(|probe| eval(backend, probe).ok(), x);

    let (d_lo, d_hi) = (derivative_at(lo), derivative_at(hi));
    if !d_lo.is_finite() || !d_hi.is_finite() || d_lo.signum() == d_hi.signum() {
        return None;
    }

    let (mut a, mut b, mut d_a) = (lo, hi, d_lo);
    for _ in 0..60 {
        let mid = 0.5 * (a + b);
        let d_mid = derivative_at(mid);
        if !d_mid.is_finite() {
            return None;
        }
        if d_mid.signum() == d_a.signum() {
            a = mid;
            d_a = d_mid;
        } else {
            b = mid;
        }
    }
    Some(0.5 * (a + b))
}

/// Restricts a liquid-branch search window `(lo, hi)` around its interior
/// extremum (if any) to the sub-bracket the target value falls in,
/// disambiguating with `guess` when the target is close enough to the
/// extremum to fall in both (§4.D.3 step 3, §4.D.4's analogous pressure
/// split). Returns `(lo, hi)` unchanged when the window is monotonic.
fn split_at_extremum<B, E>(backend: &B, lo: f64, hi: f64, target_value: f64, guess: Option<f64>, eval: &E) -> (f64, f64)
where
    B: Backend + Clone,
    E: Fn(&B, f64) -> FlashResult<f64>,
{
    let Some(extremum) = find_extremum(backend, lo, hi, eval) else {
        return (lo, hi);
    };
    let (Ok(v_lo), Ok(v_extremum), Ok(v_hi)) = (eval(backend, lo), eval(backend, extremum), eval(backend, hi)) else {
        return (lo, hi);
    };

    let lower_window = (v_lo.min(v_extremum), v_lo.max(v_extremum));
    let upper_window = (v_extremum.min(v_hi), v_extremum.max(v_hi));
    let in_lower = target_value >= lower_window.0 && target_value <= lower_window.1;
    let in_upper = target_value >= upper_window.0 && target_value <= upper_window.1;

    let use_lower = match (in_lower, in_upper) {
        (true, false) => true,
        (false, true) => false,
        // Ambiguous (near the extremum) or outside both windows: defer to
        // the caller's guess, defaulting to the upper sub-branch (the usual
        // case — most liquid states lie between the extremum and
        // saturation, not between the extremum and the validity limit).
        _ => guess.map(|g| g <= extremum).unwrap_or(false),
    };

    tracing::trace!(extremum, use_lower, "split search window around interior extremum");

    if use_lower {
        (lo, extremum)
    } else {
        (extremum, hi)
    }
}

/// Expands a bracket outward from `guess` by `factor` each step until the
/// residual changes sign or the validity limits are exhausted (§4.D.2 step
/// 3).
fn expand_bracket<B, E>(
    backend: &B,
    guess: f64,
    lo_limit: f64,
    hi_limit: f64,
    factor: f64,
    target_value: f64,
    eval: E,
) -> FlashResult<Option<(f64, f64)>>
where
    E: Fn(&B, f64) -> FlashResult<f64>,
{
    let guess = guess.clamp(lo_limit, hi_limit);
    let mut half_width = ((hi_limit - lo_limit) * 1e-3).max(guess.abs() * 1e-6).max(1e-9);

    loop {
        let lo = (guess - half_width).max(lo_limit);
        let hi = (guess + half_width).min(hi_limit);
        let r_lo = eval(backend, lo)? - target_value;
        let r_hi = eval(backend, hi)? - target_value;
        if r_lo.signum() != r_hi.signum() {
            return Ok(Some((lo, hi)));
        }
        if lo <= lo_limit && hi >= hi_limit {
            return Ok(None);
        }
        half_width *= factor;
    }
}

/// Pressure targets whose liquid branch can have an interior extremum along
/// the isotherm (§4.D.4): enthalpy, entropy, internal energy.
fn has_pressure_inflection(target: Param) -> bool {
    matches!(target, Param::H | Param::S | Param::U)
}

fn search_pressure<B: Backend + Clone>(
    backend: &mut B,
    t: f64,
    target: Param,
    target_value: f64,
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    let p_min = backend.p_min();
    let p_max = backend.p_max();

    tracing::trace!(t, target = target.canonical(), target_value, "search_pressure entry");

    let brackets = if t < backend.t_crit() {
        match saturation_dome_t(backend, t, target) {
            Some((p_sat, liq_val, vap_val)) => {
                let (lo, hi) = (liq_val.min(vap_val), liq_val.max(vap_val));
                if target_value >= lo && target_value <= hi && (vap_val - liq_val).abs() > f64::EPSILON {
                    tracing::trace!("search_pressure branch: on saturation dome, solving for quality directly");
                    let x = (target_value - liq_val) / (vap_val - liq_val);
                    backend.set_tx(t, x)?;
                    return Ok(FlashOutcome {
                        converged: true,
                        iterations: 1,
                        residual: 0.0,
                    });
                }
                let eps = (p_sat.abs() * 1e-6).max(1e-9);
                let vapor_bracket = (p_min, (p_sat - eps).max(p_min));
                let dome_bracket = ((p_sat - eps).max(p_min), (p_sat + eps).min(p_max));
                let liquid_lo = (p_sat + eps).min(p_max);
                let liquid_bracket = if has_pressure_inflection(target) {
                    let guess = backend
                        .guess_pt((Param::T.canonical(), t), (target.canonical(), target_value))
                        .map(|(guess_p, _)| guess_p);
                    tracing::trace!("search_pressure branch: liquid, checking for interior extremum");
                    split_at_extremum(backend, liquid_lo, p_max, target_value, guess, &|b, p| eval_pt(b, p, t, target))
                } else {
                    (liquid_lo, p_max)
                };
                vec![vapor_bracket, dome_bracket, liquid_bracket]
            }
            None => vec![(p_min, p_max)],
        }
    } else {
        tracing::trace!("search_pressure branch: supercritical, expanding bracket from guess_pt");
        match backend.guess_pt((Param::T.canonical(), t), (target.canonical(), target_value)) {
            Some((guess_p, _)) => expand_bracket(
                backend,
                guess_p,
                p_min,
                p_max,
                config.bracket_expansion_factor,
                target_value,
                |b, p| eval_pt(b, p, t, target),
            )?
            .map(|bracket| vec![bracket])
            .unwrap_or_else(|| vec![(p_min, p_max)]),
            None => vec![(p_min, p_max)],
        }
    };

    bisect(
        backend,
        &brackets,
        target_value,
        config,
        |probe, p| probe.set_pt(p, t),
        |probe, p| eval_pt(probe, p, t, target),
        "T",
        t,
        target.canonical(),
    )
}

fn search_temperature<B: Backend + Clone>(
    backend: &mut B,
    p: f64,
    target: Param,
    target_value: f64,
    config: &FlashConfig,
) -> FlashResult<FlashOutcome> {
    let t_min = backend.t_min();
    let t_max = backend.t_max();

    tracing::trace!(p, target = target.canonical(), target_value, "search_temperature entry");

    let brackets = if p < backend.p_crit() {
        match saturation_dome_p(backend, p, target) {
            Some((t_sat, liq_val, vap_val)) => {
                let (lo, hi) = (liq_val.min(vap_val), liq_val.max(vap_val));
                if target_value >= lo && target_value <= hi && (vap_val - liq_val).abs() > f64::EPSILON {
                    tracing::trace!("search_temperature branch: on saturation dome, solving for quality directly");
                    let x = (target_value - liq_val) / (vap_val - liq_val);
                    backend.set_px(p, x)?;
                    return Ok(FlashOutcome {
                        converged: true,
                        iterations: 1,
                        residual: 0.0,
                    });
                }
                let eps = (t_sat.abs() * 1e-6).max(1e-9);
                let liquid_hi = (t_sat - eps).max(t_min);
                let liquid_bracket = if target == Param::Rho {
                    let guess = backend
                        .guess_pt((Param::P.canonical(), p), (target.canonical(), target_value))
                        .map(|(_, guess_t)| guess_t);
                    tracing::trace!("search_temperature branch: liquid, checking for interior density extremum");
                    split_at_extremum(backend, t_min, liquid_hi, target_value, guess, &|b, t| eval_pt(b, p, t, target))
                } else {
                    (t_min, liquid_hi)
                };
                let dome_bracket = (liquid_hi, (t_sat + eps).min(t_max));
                let vapor_bracket = ((t_sat + eps).min(t_max), t_max);
                vec![liquid_bracket, dome_bracket, vapor_bracket]
            }
            None => vec![(t_min, t_max)],
        }
    } else {
        tracing::trace!("search_temperature branch: supercritical, expanding bracket from guess_pt");
        match backend.guess_pt((Param::P.canonical(), p), (target.canonical(), target_value)) {
            Some((_, guess_t)) => expand_bracket(
                backend,
                guess_t,
                t_min,
                t_max,
                config.bracket_expansion_factor,
                target_value,
                |b, t| eval_pt(b, p, t, target),
            )?
            .map(|bracket| vec![bracket])
            .unwrap_or_else(|| vec![(t_min, t_max)]),
            None => vec![(t_min, t_max)],
        }
    };

    bisect(
        backend,
        &brackets,
        target_value,
        config,
        |probe, t| probe.set_pt(p, t),
        |probe, t| eval_pt(probe, p, t, target),
        "P",
        p,
        target.canonical(),
    )
}

/// Scans candidate `(lo, hi)` brackets in order for a residual sign change
/// and bisects within the first such bracket found.
#[allow(clippy::too_many_arguments)]
fn bisect<B, S, E>(
    backend: &mut B,
    brackets: &[(f64, f64)],
    target_value: f64,
    config: &FlashConfig,
    set_axis: S,
    eval: E,
    fixed_param_name: &'static str,
    fixed_value: f64,
    target_param_name: &'static str,
) -> FlashResult<FlashOutcome>
where
    B: Backend + Clone,
    S: Fn(&mut B, f64) -> FlashResult<()>,
    E: Fn(&B, f64) -> FlashResult<f64>,
{
    for &(x_lo, x_hi) in brackets {
        let residual_lo = eval(backend, x_lo)? - target_value;
        let residual_hi = eval(backend, x_hi)? - target_value;

        if residual_lo == 0.0 {
            set_axis(backend, x_lo)?;
            return Ok(FlashOutcome {
                converged: true,
                iterations: 0,
                residual: 0.0,
            });
        }
        if residual_hi == 0.0 {
            set_axis(backend, x_hi)?;
            return Ok(FlashOutcome {
                converged: true,
                iterations: 0,
                residual: 0.0,
            });
        }
        if residual_lo.signum() == residual_hi.signum() {
            continue;
        }

        let (mut lo, mut hi) = (x_lo, x_hi);
        let mut residual_lo = residual_lo;
        let mut mid = 0.5 * (lo + hi);
        let mut residual_mid = residual_lo;
        let mut iterations = 0u32;
        let scale = target_value.abs().max(config.abs_tolerance);

        for i in 0..config.max_iterations {
            iterations = i + 1;
            mid = 0.5 * (lo + hi);
            residual_mid = eval(backend, mid)? - target_value;
            if residual_mid.abs() <= config.epsilon * scale {
                break;
            }
            if residual_mid.signum() == residual_lo.signum() {
                lo = mid;
                residual_lo = residual_mid;
            } else {
                hi = mid;
            }
        }

        let converged = residual_mid.abs() <= config.epsilon * scale;
        set_axis(backend, mid)?;

        if !converged {
            tracing::warn!(
                fixed_param_name,
                fixed_value,
                target_param_name,
                target_value,
                iterations,
                residual = residual_mid,
                "1-D flash did not converge within the iteration cap"
            );
            return Err(FlashError::NonConvergence {
                function: "flash::solve_1d",
                iterations,
                residual: residual_mid,
                params: vec![(fixed_param_name, fixed_value), (target_param_name, target_value)],
            });
        }
        return Ok(FlashOutcome {
            converged: true,
            iterations,
            residual: residual_mid,
        });
    }

    tracing::warn!(
        fixed_param_name,
        fixed_value,
        target_param_name,
        target_value,
        "1-D flash found no bracket with a sign change in any candidate window"
    );
    Err(FlashError::NonConvergence {
        function: "flash::solve_1d",
        iterations: 0,
        residual: f64::NAN,
        params: vec![(fixed_param_name, fixed_value), (target_param_name, target_value)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::IdealGasBackend;

    #[test]
    fn th_recovers_pressure_on_the_liquid_branch() {
        let mut source = IdealGasBackend::water();
        source.set_pt(5.0e6, 300.0).unwrap();
        let h_target = source.h();

        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let outcome = solve(
            &mut backend,
            StateSpec::TH,
            (Param::T, 300.0),
            (Param::H, h_target),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.p() - 5.0e6).abs() / 5.0e6 < 1e-5);
    }

    #[test]
    fn ts_recovers_pressure_on_the_vapor_branch() {
        let mut source = IdealGasBackend::water();
        source.set_pt(50_000.0, 400.0).unwrap();
        let s_target = source.s();

        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let outcome = solve(
            &mut backend,
            StateSpec::TS,
            (Param::T, 400.0),
            (Param::S, s_target),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.p() - 50_000.0).abs() / 50_000.0 < 1e-4);
    }

    #[test]
    fn pd_splits_the_liquid_branch_around_the_density_extremum() {
        // `IdealGasBackend`'s liquid density peaks near 277K at this pressure,
        // so 55_320.0 mol/m^3 brackets two valid temperature roots (~265.85K
        // and ~288.14K). With no `guess_pt` override, the split falls to its
        // no-guess default and should land on the upper (near-peak) root.
        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let outcome = solve(
            &mut backend,
            StateSpec::PD,
            (Param::P, 101_325.0),
            (Param::Rho, 55_320.0),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.t() - 288.14).abs() < 0.1);
    }

    #[test]
    fn th_two_phase_target_solves_for_quality_directly() {
        let mut liq = IdealGasBackend::water();
        liq.set_tx(373.124, 0.0).unwrap();
        let mut vap = IdealGasBackend::water();
        vap.set_tx(373.124, 1.0).unwrap();
        let h_target = 0.5 * (liq.h() + vap.h());

        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let outcome = solve(
            &mut backend,
            StateSpec::TH,
            (Param::T, 373.124),
            (Param::H, h_target),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.x() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ph_falls_back_to_1d_search_when_backend_lacks_set_ph() {
        let mut source = IdealGasBackend::water();
        source.set_pt(101_325.0, 320.0).unwrap();
        let h_target = source.h();

        let mut backend = IdealGasBackend::water();
        let config = FlashConfig::default();
        let outcome = solve(
            &mut backend,
            StateSpec::PH,
            (Param::P, 101_325.0),
            (Param::H, h_target),
            &config,
        )
        .unwrap();

        assert!(outcome.converged);
        assert!((backend.t() - 320.0).abs() < 1e-3);
    }
}
