//! Numerical solvers for sprung.
//!
//! - [`transient::rk4`] — classical fourth-order Runge-Kutta with a fixed step

pub mod transient;
