// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip-planner selection and filtering.
//!
//! A five-step linear wizard (Destination → Duration → Experience type →
//! Budget → Results) over a candidate package list. Each step writes one
//! field into the selection; every step is freely revisitable and setting
//! a field again overwrites it. Results are available only once all four
//! criteria are set.

use wayfare_domain::Package;

/// The wizard step a selection is currently on.
///
/// Derived from which fields are filled, in step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerStep {
    /// Choose a destination.
    Destination,
    /// Choose a maximum trip duration.
    Duration,
    /// Choose an experience type.
    Experience,
    /// Choose a budget ceiling.
    Budget,
    /// All criteria set; results may be computed.
    Results,
}

/// An in-progress trip-planner selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripSelection {
    destination: Option<String>,
    max_duration_days: Option<u32>,
    experience: Option<String>,
    max_budget_cents: Option<i64>,
}

impl TripSelection {
    /// Creates an empty selection at the destination step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or overwrites) the destination.
    pub fn set_destination(&mut self, destination: &str) {
        self.destination = Some(destination.trim().to_string());
    }

    /// Sets (or overwrites) the maximum duration in days.
    pub const fn set_max_duration_days(&mut self, days: u32) {
        self.max_duration_days = Some(days);
    }

    /// Sets (or overwrites) the experience type.
    pub fn set_experience(&mut self, experience: &str) {
        self.experience = Some(experience.trim().to_string());
    }

    /// Sets (or overwrites) the budget ceiling in cents.
    pub const fn set_max_budget_cents(&mut self, cents: i64) {
        self.max_budget_cents = Some(cents);
    }

    /// Returns the step this selection is currently on.
    ///
    /// The first unset field, in wizard order, determines the step; a
    /// fully-filled selection sits at `Results`.
    #[must_use]
    pub const fn current_step(&self) -> PlannerStep {
        if self.destination.is_none() {
            PlannerStep::Destination
        } else if self.max_duration_days.is_none() {
            PlannerStep::Duration
        } else if self.experience.is_none() {
            PlannerStep::Experience
        } else if self.max_budget_cents.is_none() {
            PlannerStep::Budget
        } else {
            PlannerStep::Results
        }
    }

    /// Returns whether all four criteria are set.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.current_step(), PlannerStep::Results)
    }

    /// Filters the candidate list against this selection.
    ///
    /// Matching is: destination equality and experience/category equality
    /// (both case-insensitive), `duration_days <= selected duration`, and
    /// `price_cents <= budget`.
    ///
    /// Returns `None` until the selection is complete.
    #[must_use]
    pub fn results<'a>(&self, candidates: &'a [Package]) -> Option<Vec<&'a Package>> {
        let destination: &str = self.destination.as_deref()?;
        let max_days: u32 = self.max_duration_days?;
        let experience: &str = self.experience.as_deref()?;
        let budget: i64 = self.max_budget_cents?;

        Some(
            candidates
                .iter()
                .filter(|package| {
                    package.location.eq_ignore_ascii_case(destination)
                        && package.category.eq_ignore_ascii_case(experience)
                        && package.duration_days <= max_days
                        && package.price_cents <= budget
                })
                .collect(),
        )
    }
}
