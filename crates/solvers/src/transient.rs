//! Time-marching solvers for [`OdeProblem`](sprung_core::OdeProblem)s.

pub mod rk4;
