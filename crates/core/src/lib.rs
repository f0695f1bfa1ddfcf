//! Core traits and types for sprung.
//!
//! This crate defines the shared abstractions that solvers and models build on:
//!
//! - [`Model`] — a callable that maps a typed input to a typed output
//! - [`Snapshot`] — a captured input/output pair from a model call
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`OdeProblem`] — adapts a model to an ODE solver by extracting a state and
//!   its derivative from model input and output
//! - [`StepIntegrable`] — a state that can be stepped by its derivative

mod model;
mod observer;
mod problems;
mod step;

pub use observer::Observer;
pub use problems::OdeProblem;
pub use step::{DerivativeOf, StepIntegrable};
pub use {model::Model, model::Snapshot};
