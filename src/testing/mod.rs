//! API test runner
//!
//! Drives a fixed sequence of HTTP scenarios against the cafe backend,
//! carrying the admin token and created fixture ids from one scenario to
//! the next, and reports pass/fail counts with an exit code.

mod context;
mod report;
mod runner;
mod scenarios;

pub use context::{Expect, Fixtures, Session, TestContext};
pub use report::{SuiteReport, Tally, Verdict};
pub use runner::{cleanup, run_scenarios, run_steps, run_suite};
pub use scenarios::{execute_scenario, Scenario};
