//! integrated tests
pub mod toolkit;

mod baselines;
mod fidelity;
