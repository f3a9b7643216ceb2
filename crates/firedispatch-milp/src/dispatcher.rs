use firedispatch_core::{
    find_optimal_water_sources, group_by_time_proximity, DispatchConfig, DispatchError, Fire, Helicopter, Helipad,
    Location, OptimizationParams, Result, ScenarioGroup, WaterSource,
};
use tracing::{info, warn};

use crate::builder::{max_fleet_fuel_cost, AssignmentModelBuilder};
use crate::parse::SolutionParser;
use crate::report::{Assignment, DispatchReport, GroupFailure};
use crate::solver::{solver_for, Solver, TerminationStatus};

enum GroupOutcome {
    Solved(Vec<Assignment>),
    Abandoned(TerminationStatus),
}

/// Scenario-grouped, solver-backed dispatch over a fixed fleet.
pub struct OptimizedDispatcher<S = Box<dyn Solver>> {
    fleet: Vec<Helicopter>,
    base_locations: Vec<Location>,
    helipads: Vec<Helipad>,
    params: OptimizationParams,
    solver: S,
}

impl OptimizedDispatcher<Box<dyn Solver>> {
    pub fn from_config(config: &DispatchConfig, fleet: Vec<Helicopter>, helipads: Vec<Helipad>) -> Result<Self> {
        let solver = solver_for(&config.solver)?;
        Self::new(fleet, helipads, config.optimization.clone(), solver)
    }
}

impl<S: Solver> OptimizedDispatcher<S> {
    /// Drops helicopters that cannot be routed (unknown base, unusable
    /// speeds) and checks that `big_penalty` dominates the fleet's worst
    /// possible fuel bill.
    pub fn new(fleet: Vec<Helicopter>, helipads: Vec<Helipad>, params: OptimizationParams, solver: S) -> Result<Self> {
        params.validate()?;

        if fleet.is_empty() {
            warn!("no helicopter data, optimized dispatch will produce empty reports");
        }
        if helipads.is_empty() {
            warn!("no helipad data, optimized dispatch will produce empty reports");
        }

        let mut usable = Vec::with_capacity(fleet.len());
        let mut base_locations = Vec::with_capacity(fleet.len());
        for heli in fleet {
            let location = match heli.base_location(&helipads) {
                Ok(location) => location,
                Err(e) => {
                    warn!(error = %e, "skipping helicopter with invalid base reference");
                    continue;
                }
            };
            if !heli.has_valid_speeds() {
                warn!(helicopter = heli.id, "skipping helicopter with non-positive speed");
                continue;
            }
            base_locations.push(location);
            usable.push(heli);
        }

        let bound = max_fleet_fuel_cost(&usable, params.fuel_rate);
        if !bound.is_finite() {
            let unlimited: Vec<u32> = usable.iter().filter(|h| !h.time_limit.is_finite()).map(|h| h.id).collect();
            return Err(DispatchError::Configuration(format!(
                "helicopters {unlimited:?} have no finite time_limit, so no big_penalty can outweigh their fuel cost"
            )));
        }
        if params.big_penalty <= bound {
            return Err(DispatchError::Configuration(format!(
                "big_penalty {} must exceed the largest feasible fuel cost {bound:.2} of the loaded fleet",
                params.big_penalty
            )));
        }

        info!(helicopters = usable.len(), helipads = helipads.len(), solver = solver.name(), "optimized dispatcher ready");
        Ok(Self {
            fleet: usable,
            base_locations,
            helipads,
            params,
            solver,
        })
    }

    /// Helicopters that take part in the model, in model order.
    pub fn fleet(&self) -> &[Helicopter] {
        &self.fleet
    }

    pub fn params(&self) -> &OptimizationParams {
        &self.params
    }

    pub fn dispatch(&self, fires: &[Fire], water: &[WaterSource]) -> Result<DispatchReport> {
        if fires.is_empty() {
            return Ok(DispatchReport::default());
        }
        if self.fleet.is_empty() || self.helipads.is_empty() {
            warn!(error = %DispatchError::MissingData("no usable helicopters or helipads".into()), "cannot perform optimized dispatch");
            return Ok(DispatchReport::default());
        }

        let groups = group_by_time_proximity(fires, self.params.scenario_time_window_minutes)?;
        let parser = SolutionParser::new(fires, &self.fleet, &self.helipads);
        let mut report = DispatchReport::default();

        for (group_no, group) in groups.iter().enumerate() {
            match self.solve_group(group, fires, water, &parser)? {
                GroupOutcome::Solved(rows) => report.assignments.extend(rows),
                GroupOutcome::Abandoned(status) => {
                    let failure = GroupFailure { group: group_no, status: status.to_string() };
                    warn!(error = %failure.error(), fires = group.len(), "scenario group left unaddressed");
                    report.failed_groups.push(failure);
                    report.assignments.extend(parser.unaddressed(group));
                }
            }
        }

        report.assignments.sort_by_key(|a| a.fire_id);
        let dispatched = report.dispatched().count();
        info!(
            fires = fires.len(),
            groups = groups.len(),
            dispatched,
            failed_groups = report.failed_groups.len(),
            "optimized dispatch finished"
        );
        Ok(report)
    }

    fn solve_group(
        &self,
        group: &ScenarioGroup,
        fires: &[Fire],
        water: &[WaterSource],
        parser: &SolutionParser<'_>,
    ) -> Result<GroupOutcome> {
        let (coords, difficulties): (Vec<Location>, Vec<u32>) = group
            .fire_indices()
            .iter()
            .map(|&idx| (fires[idx].location, fires[idx].intensity))
            .unzip();

        let routes = find_optimal_water_sources(&coords, water, &self.base_locations);
        let model = AssignmentModelBuilder::new(&self.fleet, &self.params).build(&difficulties, &routes)?;

        let outcome = self.solver.solve(model.milp());
        if !outcome.is_optimal() {
            return Ok(GroupOutcome::Abandoned(outcome.status));
        }
        if outcome.values.len() != model.milp().num_variables() {
            return Ok(GroupOutcome::Abandoned(TerminationStatus::Error(format!(
                "solver returned {} values for {} variables",
                outcome.values.len(),
                model.milp().num_variables()
            ))));
        }

        Ok(GroupOutcome::Solved(parser.parse(group, &model, &routes, &outcome.values)))
    }
}
