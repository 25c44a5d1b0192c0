//! Warmer/colder verdict between two accepted distances.

/// Direction of travel relative to the target, judged between two accepted
/// samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum TrendState {
    /// First reading of the session, nothing to compare against
    #[default]
    Initial,
    Closer,
    Farther,
    Same,
}

/// Exact comparison with no tolerance band. Two independently computed
/// distances are rarely bit-identical, so `Same` is uncommon in practice.
pub fn classify(previous: Option<f64>, current: f64) -> TrendState {
    let Some(previous) = previous else {
        return TrendState::Initial;
    };

    if current < previous {
        TrendState::Closer
    } else if current > previous {
        TrendState::Farther
    } else {
        TrendState::Same
    }
}
