//! The spring pendulum's equations of motion.

use std::convert::Infallible;

use sprung_core::Model;

use crate::state::{PendulumRates, PendulumState};

/// Physical constants of the pendulum.
///
/// Mass and `length + stretch` appear as divisors. Nothing here checks them;
/// [`Config`](crate::Config) rejects the obvious bad values before integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Bob mass.
    pub mass: f64,

    /// Spring constant of the rod.
    pub spring_constant: f64,

    /// Unstretched rod length.
    pub length: f64,

    /// Gravitational acceleration.
    pub gravity: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            mass: 0.1,
            spring_constant: 0.2,
            length: 0.3,
            gravity: 0.1,
        }
    }
}

/// Evaluates the equations of motion at `state`.
///
/// ```text
/// d(stretch)/dt      = stretch_rate
/// d(stretch_rate)/dt = -(k/m)·stretch + (L + stretch)·swing_rate² + g·cos(swing)
/// d(swing)/dt        = swing_rate
/// d(swing_rate)/dt   = -(g·sin(swing) - 2·stretch_rate·swing_rate) / (L + stretch)
/// ```
///
/// When `L + stretch` is zero the swing acceleration is infinite or NaN. The
/// value is returned as is.
#[must_use]
pub fn derivative(parameters: &Parameters, state: &PendulumState) -> PendulumRates {
    let Parameters {
        mass,
        spring_constant,
        length,
        gravity,
    } = *parameters;
    let arm = length + state.stretch;

    PendulumRates {
        d_stretch: state.stretch_rate,
        d_stretch_rate: -(spring_constant / mass) * state.stretch
            + arm * state.swing_rate.powi(2)
            + gravity * state.swing.cos(),
        d_swing: state.swing_rate,
        d_swing_rate: -((gravity * state.swing.sin()
            - 2.0 * state.stretch_rate * state.swing_rate)
            / arm),
    }
}

/// Model input: the state and the time it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendulumInput {
    pub time: f64,
    pub state: PendulumState,
}

/// The spring pendulum as a [`Model`] from state to rates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringPendulum {
    parameters: Parameters,
}

impl SpringPendulum {
    /// Creates a pendulum with the given constants.
    #[must_use]
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }

    /// Returns the pendulum's constants.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

impl Model for SpringPendulum {
    type Input = PendulumInput;
    type Output = PendulumRates;
    type Error = Infallible;

    fn call(&self, input: &PendulumInput) -> Result<PendulumRates, Infallible> {
        Ok(derivative(&self.parameters, &input.state))
    }
}
