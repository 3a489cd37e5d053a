//! Phase classification (§3.4).

use strum_macros::AsRefStr;

/// A tolerance band used to decide whether `P`/`T` lie "on" the critical
/// point or the saturation locus rather than strictly inside/outside it.
pub const PHASE_EPSILON: f64 = 1e-6;

/// The phase region a fluid state falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Phase {
    /// Subcritical, below the saturated-liquid line.
    Liquid,
    /// Subcritical, above the saturated-vapor line.
    Gas,
    /// On the saturation locus.
    TwoPhase,
    /// Within [`PHASE_EPSILON`] of both the critical pressure and
    /// temperature.
    Critical,
    /// Above both the critical pressure and temperature.
    Supercritical,
    /// None of the above conditions hold (e.g. inputs could not be
    /// evaluated against the envelope).
    Unknown,
}

/// Classifies a state given its pressure, temperature and the fluid's
/// critical point and saturation values at the current conditions.
///
/// `p_sat_at_t` is `P_sat(T)` (NaN above `T_crit`); `t_sat_at_p` is
/// `T_sat(P)` (NaN above `P_crit`). Passing both lets the caller avoid
/// computing whichever one classification doesn't need.
#[allow(clippy::too_many_arguments)]
pub fn classify(
    p: f64,
    t: f64,
    p_crit: f64,
    t_crit: f64,
    p_sat_at_t: f64,
    t_sat_at_p: f64,
) -> Phase {
    let near = |a: f64, b: f64| (a - b).abs() <= PHASE_EPSILON.max(b.abs() * PHASE_EPSILON);

    if near(p, p_crit) && near(t, t_crit) {
        return Phase::Critical;
    }
    if p > p_crit && t > t_crit {
        return Phase::Supercritical;
    }
    if p <= p_crit && t <= t_crit {
        if p_sat_at_t.is_finite() && near(p, p_sat_at_t) {
            return Phase::TwoPhase;
        }
        if t_sat_at_p.is_finite() && near(t, t_sat_at_p) {
            return Phase::TwoPhase;
        }
        if p_sat_at_t.is_finite() && p > p_sat_at_t + PHASE_EPSILON {
            return Phase::Liquid;
        }
        if t_sat_at_p.is_finite() && t > t_sat_at_p + PHASE_EPSILON {
            return Phase::Gas;
        }
    }
    Phase::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    const P_CRIT: f64 = 22.064e6;
    const T_CRIT: f64 = 647.096;

    #[test]
    fn classifies_critical_point() {
        assert_eq!(
            classify(P_CRIT, T_CRIT, P_CRIT, T_CRIT, f64::NAN, f64::NAN),
            Phase::Critical
        );
    }

    #[test]
    fn classifies_supercritical() {
        assert_eq!(
            classify(
                P_CRIT * 2.0,
                T_CRIT * 1.1,
                P_CRIT,
                T_CRIT,
                f64::NAN,
                f64::NAN
            ),
            Phase::Supercritical
        );
    }

    #[test]
    fn classifies_liquid_below_saturation_curve() {
        // Subcooled liquid: actual pressure well above P_sat(T).
        assert_eq!(
            classify(5.0e6, 300.0, P_CRIT, T_CRIT, 3.5e3, f64::NAN),
            Phase::Liquid
        );
    }

    #[test]
    fn classifies_two_phase_on_saturation_locus() {
        let p_sat = 101325.0;
        assert_eq!(
            classify(p_sat, 373.12, P_CRIT, T_CRIT, p_sat, 373.12),
            Phase::TwoPhase
        );
    }
}
