//! Specification pairs: the admissible two-variable state specifications.

use crate::param::Param;

/// An admissible, order-independent pair of state variables.
///
/// `V` and `Rho` are interchangeable (`V = 1/Rho`) and are normalized to the
/// `D`-suffixed variants everywhere in this enum; [`StateSpec::try_from`]
/// performs that normalization for callers supplying `(P, V)` or `(T, V)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum StateSpec {
    PT,
    PH,
    PS,
    PU,
    PD,
    PX,
    TH,
    TS,
    TU,
    TD,
    TX,
    HS,
    UV,
    HV,
    DS,
    DH,
    DU,
    SU,
}

/// Rejected specification: the two variables are the same tag, or the pair
/// is not in the admissible list of §3.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InadmissibleSpec(pub Param, pub Param);

impl StateSpec {
    /// The two [`Param`] tags that make up this specification, in the
    /// canonical order used internally (not necessarily the order the
    /// caller supplied).
    pub fn params(self) -> (Param, Param) {
        use Param::*;
        match self {
            StateSpec::PT => (P, T),
            StateSpec::PH => (P, H),
            StateSpec::PS => (P, S),
            StateSpec::PU => (P, U),
            StateSpec::PD => (P, Rho),
            StateSpec::PX => (P, X),
            StateSpec::TH => (T, H),
            StateSpec::TS => (T, S),
            StateSpec::TU => (T, U),
            StateSpec::TD => (T, Rho),
            StateSpec::TX => (T, X),
            StateSpec::HS => (H, S),
            StateSpec::UV => (U, Rho),
            StateSpec::HV => (H, Rho),
            StateSpec::DS => (Rho, S),
            StateSpec::DH => (Rho, H),
            StateSpec::DU => (Rho, U),
            StateSpec::SU => (S, U),
        }
    }

    /// Whether the backend-native pair `P, T` is one of the two variables
    /// (i.e. this is a one-sided specification, dispatched by §4.D.2/§4.D.3
    /// rather than §4.D.5).
    pub fn is_one_dimensional(self) -> bool {
        let (a, b) = self.params();
        a.is_native_axis() || b.is_native_axis()
    }
}

impl TryFrom<(Param, Param)> for StateSpec {
    type Error = InadmissibleSpec;

    fn try_from((a, b): (Param, Param)) -> Result<Self, Self::Error> {
        use Param::*;

        // V/Rho normalize to Rho; caller-side value inversion (V = 1/Rho)
        // happens at the unit bridge, not here.
        let normalize = |p: Param| if p == V { Rho } else { p };
        let (a, b) = (normalize(a), normalize(b));
        if a == b {
            return Err(InadmissibleSpec(a, b));
        }

        let pair = match (a, b) {
            (P, T) | (T, P) => StateSpec::PT,
            (P, H) | (H, P) => StateSpec::PH,
            (P, S) | (S, P) => StateSpec::PS,
            (P, U) | (U, P) => StateSpec::PU,
            (P, Rho) | (Rho, P) => StateSpec::PD,
            (P, X) | (X, P) => StateSpec::PX,
            (T, H) | (H, T) => StateSpec::TH,
            (T, S) | (S, T) => StateSpec::TS,
            (T, U) | (U, T) => StateSpec::TU,
            (T, Rho) | (Rho, T) => StateSpec::TD,
            (T, X) | (X, T) => StateSpec::TX,
            (H, S) | (S, H) => StateSpec::HS,
            (U, Rho) | (Rho, U) => StateSpec::UV,
            (H, Rho) | (Rho, H) => StateSpec::HV,
            (Rho, S) | (S, Rho) => StateSpec::DS,
            (Rho, H) | (H, Rho) => StateSpec::DH,
            (Rho, U) | (U, Rho) => StateSpec::DU,
            (S, U) | (U, S) => StateSpec::SU,
            _ => return Err(InadmissibleSpec(a, b)),
        };
        Ok(pair)
    }
}

/// Returns `true` if `(a, b)` is the specification pair `XY`, in either
/// order (§4.A).
pub fn is_spec(a: Param, b: Param, xy: StateSpec) -> bool {
    StateSpec::try_from((a, b)).map(|s| s == xy).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Param::P, Param::T, StateSpec::PT)]
    #[case(Param::T, Param::P, StateSpec::PT)]
    #[case(Param::P, Param::V, StateSpec::PD)]
    #[case(Param::H, Param::S, StateSpec::HS)]
    fn recognizes_admissible_pairs_either_order(
        #[case] a: Param,
        #[case] b: Param,
        #[case] expected: StateSpec,
    ) {
        assert_eq!(StateSpec::try_from((a, b)).unwrap(), expected);
    }

    #[test]
    fn rejects_same_tag_pair() {
        assert!(StateSpec::try_from((Param::P, Param::P)).is_err());
    }

    #[test]
    fn rejects_inadmissible_pair() {
        assert!(StateSpec::try_from((Param::Eta, Param::Tc)).is_err());
    }

    #[test]
    fn is_spec_matches_either_order() {
        assert!(is_spec(Param::P, Param::T, StateSpec::PT));
        assert!(is_spec(Param::T, Param::P, StateSpec::PT));
        assert!(!is_spec(Param::P, Param::H, StateSpec::PT));
    }
}
