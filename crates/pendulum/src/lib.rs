//! RK4 integration of a spring-loaded pendulum.
//!
//! A bob hangs on an elastic rod that can both stretch and swing. The motion
//! is four coupled first-order equations in stretch, stretch rate, swing, and
//! swing rate, advanced with classical fourth-order Runge-Kutta at a fixed
//! step.
//!
//! ```ignore
//! use sprung::{Config, integrate};
//!
//! let trajectory = integrate(&Config::default())?;
//! for (t, state) in trajectory.rows() {
//!     println!("{t} {} {}", state.stretch, state.swing);
//! }
//! ```
//!
//! The lower-level pieces ([`SpringPendulum`], [`PendulumProblem`]) plug into
//! [`sprung_solvers::transient::rk4`] directly and skip config validation.
//!
//! # Features
//!
//! - `plot` — Enables [`plot::show`] for viewing a trajectory in a native
//!   window. This feature adds dependencies on `eframe` and `egui_plot`.

mod config;
mod error;
mod integrate;
mod model;
mod problem;
mod state;

pub mod logging;

#[cfg(feature = "plot")]
pub mod plot;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use integrate::{Event, Trajectory, integrate, integrate_observed};
pub use model::{Parameters, PendulumInput, SpringPendulum, derivative};
pub use problem::{IncrementRule, PendulumProblem};
pub use state::{PendulumRates, PendulumState};
