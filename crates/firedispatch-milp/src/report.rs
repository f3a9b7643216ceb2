use firedispatch_core::{DispatchError, RouteLegs};
use serde::Serialize;

/// One row of the optimized-assignment report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment {
    /// 1-based position of the fire in the input batch.
    pub fire_id: usize,
    pub fire_name: String,
    pub outcome: AssignmentOutcome,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Dispatched(DispatchDetail),
    Unaddressed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DispatchDetail {
    pub helicopter_id: u32,
    pub helicopter_model: String,
    pub base_name: String,
    pub legs: RouteLegs,
    /// minutes
    pub travel_time: f64,
    pub fuel_cost: f64,
    /// Solved `FireOn` of the fire: the combined capacity sent covers its difficulty.
    pub fire_addressed: bool,
}

impl Assignment {
    pub fn unaddressed(fire_id: usize, fire_name: impl Into<String>) -> Self {
        Self {
            fire_id,
            fire_name: fire_name.into(),
            outcome: AssignmentOutcome::Unaddressed,
        }
    }

    pub fn detail(&self) -> Option<&DispatchDetail> {
        match &self.outcome {
            AssignmentOutcome::Dispatched(detail) => Some(detail),
            AssignmentOutcome::Unaddressed => None,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        self.detail().is_some()
    }
}

/// A scenario group abandoned because the solver did not reach optimality.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupFailure {
    pub group: usize,
    pub status: String,
}

impl GroupFailure {
    pub fn error(&self) -> DispatchError {
        DispatchError::InfeasibleScenario {
            group: self.group,
            status: self.status.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    /// Sorted by `fire_id`.
    pub assignments: Vec<Assignment>,
    pub failed_groups: Vec<GroupFailure>,
}

impl DispatchReport {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn for_fire(&self, fire_id: usize) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(move |a| a.fire_id == fire_id)
    }

    pub fn dispatched(&self) -> impl Iterator<Item = (&Assignment, &DispatchDetail)> {
        self.assignments.iter().filter_map(|a| a.detail().map(|d| (a, d)))
    }

    pub fn total_fuel_cost(&self) -> f64 {
        self.dispatched().map(|(_, d)| d.fuel_cost).sum()
    }
}
