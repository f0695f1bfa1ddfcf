//! Classical fourth-order Runge-Kutta solver for ODE problems.
//!
//! Each step evaluates four slopes and advances the state by their weighted
//! average:
//!
//! ```text
//! k1 = f(t_n,        y_n)
//! k2 = f(t_n + dt/2, y_n + k1 * dt/2)
//! k3 = f(t_n + dt/2, y_n + k2 * dt/2)
//! k4 = f(t_n + dt,   y_n + k3 * dt)
//!
//! y_{n+1} = y_n + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
//! ```
//!
//! The state is stepped as a whole, so every stage sees all state components
//! perturbed together. The step size is fixed and the solver runs exactly the
//! requested number of steps: there is no error estimation and no early exit,
//! even when the state stops being finite.
//!
//! # Example
//!
//! ```ignore
//! use sprung_solvers::transient::rk4;
//!
//! let solution = rk4::solve_unobserved(&model, &problem, initial_input, dt, steps)?;
//!
//! for snapshot in &solution.history {
//!     println!("{:?} -> {:?}", snapshot.input, snapshot.output);
//! }
//! ```

mod error;
mod event;
mod solution;

pub use error::Error;
pub use event::Event;
pub use solution::Solution;

use std::{convert::Infallible, ops::Div};

use sprung_core::{DerivativeOf, Model, Observer, OdeProblem, Snapshot, StepIntegrable};
use tracing::{debug, trace};

/// Integrates an ODE problem using classical RK4.
///
/// # Algorithm
///
/// 1. Call the model with the initial input to get the initial snapshot.
/// 2. For each step:
///    - Extract the state from the current input.
///    - Take `k1` from the current snapshot and evaluate `k2`, `k3`, `k4` at
///      the midpoint, midpoint, and endpoint stage states.
///    - Pass each stage through [`OdeProblem::increment_derivative`] and step
///      the state by `dt/6`, `dt/3`, `dt/3`, `dt/6` in turn.
///    - Build and finalize the next input, then call the model on it.
///    - Emit an [`Event`] to the observer.
/// 3. Return the solution with the full history.
///
/// # Observer
///
/// The observer receives an [`Event`] for the initial snapshot and after each
/// integration step. RK4 has no control actions, so the action type is
/// [`Infallible`].
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Div<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
    Obs: Observer<Event<M::Input, M::Output>, Infallible>,
{
    debug!(steps, "starting rk4 integration");

    // Evaluate initial state.
    let initial_output = model.call(&initial).map_err(Error::model)?;
    let initial_snapshot = Snapshot::new(initial, initial_output);

    let mut history = Vec::with_capacity(steps + 1);
    history.push(initial_snapshot.clone());

    notify(
        &mut observer,
        &Event {
            step: 0,
            snapshot: initial_snapshot.clone(),
        },
    );

    let mut current = initial_snapshot;

    for step in 1..=steps {
        let next_snapshot = advance(model, problem, &current, &dt)?;
        trace!(step, "accepted rk4 step");

        history.push(next_snapshot.clone());

        notify(
            &mut observer,
            &Event {
                step,
                snapshot: next_snapshot.clone(),
            },
        );

        current = next_snapshot;
    }

    debug!(steps, "rk4 integration complete");

    Ok(Solution { history, steps })
}

/// Integrates an ODE problem using classical RK4 without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Div<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
{
    solve(model, problem, initial, dt, steps, ())
}

fn notify<E, Obs: Observer<E, Infallible>>(observer: &mut Obs, event: &E) {
    if let Some(action) = observer.observe(event) {
        match action {}
    }
}

/// Advances `current` by one full RK4 step.
fn advance<M, P>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    dt: &P::Delta,
) -> Result<Snapshot<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Div<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
{
    let half = dt.clone() / 2.0;
    let state = problem.state(&current.input).map_err(Error::problem)?;

    let k1 = problem
        .derivative(&current.input, &current.output)
        .map_err(Error::problem)?;
    let k2 = stage(model, problem, &current.input, &state, k1.clone(), half.clone())?;
    let k3 = stage(model, problem, &current.input, &state, k2.clone(), half)?;
    let k4 = stage(model, problem, &current.input, &state, k3.clone(), dt.clone())?;

    let sixth = dt.clone() / 6.0;
    let third = dt.clone() / 3.0;
    let weighted = [(k1, sixth.clone()), (k2, third.clone()), (k3, third), (k4, sixth)];

    let mut next_state = state;
    for (slope, weight) in weighted {
        let slope = problem
            .increment_derivative(slope)
            .map_err(Error::problem)?;
        next_state = next_state.step(slope, weight);
    }

    let next_input = problem
        .build_input(&current.input, &next_state, dt)
        .map_err(Error::problem)?;
    let next_input = problem
        .finalize_step(next_input, &current.input, &current.output, dt)
        .map_err(Error::problem)?;

    let next_output = model.call(&next_input).map_err(Error::model)?;

    Ok(Snapshot::new(next_input, next_output))
}

/// Evaluates the slope at `state + slope * offset`, placed `offset` past `base`.
fn stage<M, P>(
    model: &M,
    problem: &P,
    base: &M::Input,
    state: &P::State,
    slope: DerivativeOf<P::State, P::Delta>,
    offset: P::Delta,
) -> Result<DerivativeOf<P::State, P::Delta>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
{
    let probe = state.step(slope, offset.clone());
    let input = problem
        .build_input(base, &probe, &offset)
        .map_err(Error::problem)?;
    let output = model.call(&input).map_err(Error::model)?;

    problem.derivative(&input, &output).map_err(Error::problem)
}
