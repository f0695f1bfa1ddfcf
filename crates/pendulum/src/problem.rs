use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use sprung_core::{DerivativeOf, OdeProblem};

use crate::{
    model::PendulumInput,
    state::{PendulumRates, PendulumState},
};

/// How stage slopes combine into the accepted increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementRule {
    /// Every variable advances by its own stage family.
    #[default]
    Classical,

    /// Swing advances by the stretch stages and swing rate by the stretch-rate
    /// stages, as the first version of this simulation did.
    ///
    /// Stage states are still built from the true slopes. Use this only to
    /// reproduce plots made with that version.
    Legacy,
}

/// Wires [`SpringPendulum`](crate::SpringPendulum) into an RK4 solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendulumProblem {
    rule: IncrementRule,
}

impl PendulumProblem {
    #[must_use]
    pub fn new(rule: IncrementRule) -> Self {
        Self { rule }
    }

    #[must_use]
    pub fn rule(&self) -> IncrementRule {
        self.rule
    }
}

impl OdeProblem for PendulumProblem {
    type Input = PendulumInput;
    type Output = PendulumRates;
    type Delta = f64;
    type State = PendulumState;
    type Error = Infallible;

    fn state(&self, input: &PendulumInput) -> Result<PendulumState, Infallible> {
        Ok(input.state)
    }

    fn derivative(
        &self,
        _input: &PendulumInput,
        output: &PendulumRates,
    ) -> Result<DerivativeOf<PendulumState, f64>, Infallible> {
        Ok(*output)
    }

    fn build_input(
        &self,
        base: &PendulumInput,
        state: &PendulumState,
        dt: &f64,
    ) -> Result<PendulumInput, Infallible> {
        Ok(PendulumInput {
            time: base.time + dt,
            state: *state,
        })
    }

    fn increment_derivative(&self, stage: PendulumRates) -> Result<PendulumRates, Infallible> {
        Ok(match self.rule {
            IncrementRule::Classical => stage,
            IncrementRule::Legacy => PendulumRates {
                d_swing: stage.d_stretch,
                d_swing_rate: stage.d_stretch_rate,
                ..stage
            },
        })
    }
}
