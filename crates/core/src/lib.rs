// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod application;
mod apply;
mod command;
mod error;
mod planner;

#[cfg(test)]
mod tests;

pub use application::{AcceptancePlan, plan_acceptance};
pub use apply::{BookingTransition, apply_booking};
pub use command::{BookingCommand, CancellationCaller, Decision};
pub use error::CoreError;
pub use planner::{PlannerStep, TripSelection};
