//! Solver configuration (ambient stack, SPEC_FULL §2.1).

use bon::Builder;

/// Tunables for the flash solver. Defaults match the numeric defaults
/// named in §4.D.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct FlashConfig {
    /// Residual tolerance. Defaults to `sqrt(f64::EPSILON)`.
    #[builder(default = default_epsilon())]
    pub epsilon: f64,

    /// Absolute-tolerance fallback used when the residual scale is near
    /// zero (e.g. a target property close to 0).
    #[builder(default = 1e-9)]
    pub abs_tolerance: f64,

    /// Iteration cap for both the 1-D and 2-D solvers.
    #[builder(default = 100)]
    pub max_iterations: u32,

    /// Initial step multiplier for the damped-Newton 2-D solver (§4.D.5).
    #[builder(default = 1.0)]
    pub initial_step_multiplier: f64,

    /// Factor by which an outward-expanding bracket search grows its
    /// interval each iteration (§4.D.2 step 3).
    #[builder(default = 2.0)]
    pub bracket_expansion_factor: f64,
}

fn default_epsilon() -> f64 {
    f64::EPSILON.sqrt()
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_defaults() {
        let cfg = FlashConfig::default();
        assert_eq!(cfg.epsilon, f64::EPSILON.sqrt());
        assert_eq!(cfg.max_iterations, 100);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let cfg = FlashConfig::builder().max_iterations(50).build();
        assert_eq!(cfg.max_iterations, 50);
        assert_eq!(cfg.epsilon, f64::EPSILON.sqrt());
    }
}
