//! Use cases (application services)

pub mod execute_round;
pub mod run_debate;
pub(crate) mod shared;
pub mod turn_runner;
