//! Runs a [`Config`] through the RK4 solver and collects the trajectory.

use std::convert::Infallible;

use sprung_core::{Observer, Snapshot};
use sprung_solvers::transient::rk4;
use tracing::{debug, warn};

use crate::{
    Config, Error, PendulumInput, PendulumProblem, PendulumRates, PendulumState, SpringPendulum,
};

/// Solver event for one accepted pendulum state.
pub type Event = rk4::Event<PendulumInput, PendulumRates>;

/// Time stamps and the state series that go with them.
///
/// All five sequences always have the same length: one entry for the initial
/// condition plus one per integration step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub stretch: Vec<f64>,
    pub stretch_rate: Vec<f64>,
    pub swing: Vec<f64>,
    pub swing_rate: Vec<f64>,
}

impl Trajectory {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            stretch: Vec::with_capacity(capacity),
            stretch_rate: Vec::with_capacity(capacity),
            swing: Vec::with_capacity(capacity),
            swing_rate: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, time: f64, state: &PendulumState) {
        self.times.push(time);
        self.stretch.push(state.stretch);
        self.stretch_rate.push(state.stretch_rate);
        self.swing.push(state.swing);
        self.swing_rate.push(state.swing_rate);
    }

    /// Returns the number of recorded time stamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the state recorded at index `n`, if any.
    #[must_use]
    pub fn state(&self, n: usize) -> Option<PendulumState> {
        Some(PendulumState {
            stretch: *self.stretch.get(n)?,
            stretch_rate: *self.stretch_rate.get(n)?,
            swing: *self.swing.get(n)?,
            swing_rate: *self.swing_rate.get(n)?,
        })
    }

    #[must_use]
    pub fn last_state(&self) -> Option<PendulumState> {
        self.state(self.len().checked_sub(1)?)
    }

    /// Iterates over `(time, state)` pairs in order.
    pub fn rows(&self) -> impl Iterator<Item = (f64, PendulumState)> + '_ {
        self.times
            .iter()
            .enumerate()
            .filter_map(|(n, &time)| Some((time, self.state(n)?)))
    }
}

impl FromIterator<Snapshot<PendulumInput, PendulumRates>> for Trajectory {
    fn from_iter<T: IntoIterator<Item = Snapshot<PendulumInput, PendulumRates>>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut trajectory = Self::with_capacity(iter.size_hint().0);
        for snapshot in iter {
            trajectory.push(snapshot.input.time, &snapshot.input.state);
        }
        trajectory
    }
}

/// Integrates the spring pendulum described by `config`.
///
/// # Errors
///
/// Returns an error only if the solver fails. Non-finite states are recorded
/// in the trajectory, not reported as errors.
pub fn integrate(config: &Config) -> Result<Trajectory, Error> {
    integrate_observed(config, ())
}

/// Integrates the spring pendulum, passing every accepted state to `observer`.
///
/// The observer sees the initial state as step 0, then each step in order.
///
/// # Errors
///
/// Returns an error only if the solver fails.
pub fn integrate_observed<Obs>(config: &Config, mut observer: Obs) -> Result<Trajectory, Error>
where
    Obs: Observer<Event, Infallible>,
{
    let steps = config.steps();
    debug!(?config, steps, "integrating spring pendulum");

    let model = SpringPendulum::new(*config.parameters());
    let problem = PendulumProblem::new(config.increment());
    let initial = PendulumInput {
        time: config.t_start(),
        state: *config.initial(),
    };

    let mut warned = false;
    let solution = rk4::solve(
        &model,
        &problem,
        initial,
        config.step(),
        steps,
        |event: &Event| {
            if !warned && !event.snapshot.input.state.is_finite() {
                warned = true;
                warn!(
                    step = event.step,
                    time = event.snapshot.input.time,
                    "pendulum state is no longer finite, continuing"
                );
            }
            observer.observe(event)
        },
    )?;

    Ok(solution.history.into_iter().collect())
}
