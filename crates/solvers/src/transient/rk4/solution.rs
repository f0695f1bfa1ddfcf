use sprung_core::Snapshot;

/// The result of an RK4 integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// History of snapshots from each step (including initial state).
    ///
    /// Always holds `steps + 1` entries.
    pub history: Vec<Snapshot<I, O>>,

    /// Number of integration steps completed.
    pub steps: usize,
}

