use firedispatch_core::{DispatchError, Helicopter, OptimizationParams, Result, RouteMatrices};
use tracing::debug;

use crate::model::{LinearExpr, MilpModel, Relation, VarId};

/// Per-pair timings and cost, indexed `[helicopter][fire]`, minutes and fuel units.
#[derive(Clone, Debug, PartialEq)]
pub struct PairCosts {
    travel_time: Vec<f64>,
    arrival_time: Vec<f64>,
    fuel_cost: Vec<f64>,
    n_fires: usize,
}

impl PairCosts {
    pub fn compute(fleet: &[Helicopter], routes: &RouteMatrices, fuel_rate: f64) -> Self {
        let n_fires = routes.n_fires();
        let size = fleet.len() * n_fires;
        let mut travel_time = Vec::with_capacity(size);
        let mut arrival_time = Vec::with_capacity(size);
        let mut fuel_cost = Vec::with_capacity(size);

        for (h, heli) in fleet.iter().enumerate() {
            for f in 0..n_fires {
                let legs = routes.legs(h, f);
                // out empty, back loaded, then home empty
                let arrival = legs.to_water / heli.speed_to_water + legs.water_to_fire / heli.speed_loaded;
                let travel = arrival + legs.fire_to_base / heli.speed_to_water;
                arrival_time.push(arrival);
                travel_time.push(travel);
                fuel_cost.push(fuel_rate * heli.efficiency * travel);
            }
        }

        Self {
            travel_time,
            arrival_time,
            fuel_cost,
            n_fires,
        }
    }

    /// Full round trip.
    #[inline]
    pub fn travel_time(&self, heli: usize, fire: usize) -> f64 {
        self.travel_time[heli * self.n_fires + fire]
    }

    /// Time until the helicopter first reaches the fire.
    #[inline]
    pub fn arrival_time(&self, heli: usize, fire: usize) -> f64 {
        self.arrival_time[heli * self.n_fires + fire]
    }

    #[inline]
    pub fn fuel_cost(&self, heli: usize, fire: usize) -> f64 {
        self.fuel_cost[heli * self.n_fires + fire]
    }
}

/// A built model for one scenario group together with the variable handles
/// needed to read a solution back.
#[derive(Clone, Debug)]
pub struct AssignmentModel {
    milp: MilpModel,
    costs: PairCosts,
    n_helicopters: usize,
    n_fires: usize,
    assign: Vec<VarId>,
    fire_on: Vec<VarId>,
    assign_fire: Vec<VarId>,
}

impl AssignmentModel {
    pub fn milp(&self) -> &MilpModel {
        &self.milp
    }

    pub fn costs(&self) -> &PairCosts {
        &self.costs
    }

    pub fn n_helicopters(&self) -> usize {
        self.n_helicopters
    }

    pub fn n_fires(&self) -> usize {
        self.n_fires
    }

    pub fn assign(&self, heli: usize, fire: usize) -> VarId {
        self.assign[heli * self.n_fires + fire]
    }

    pub fn fire_on(&self, fire: usize) -> VarId {
        self.fire_on[fire]
    }

    pub fn assign_fire(&self, heli: usize, fire: usize) -> VarId {
        self.assign_fire[heli * self.n_fires + fire]
    }

    /// `Assign[h,f]` of a solution, rounded at 0.5.
    pub fn is_assigned(&self, values: &[f64], heli: usize, fire: usize) -> bool {
        binary_value(values, self.assign(heli, fire))
    }

    pub fn is_fire_on(&self, values: &[f64], fire: usize) -> bool {
        binary_value(values, self.fire_on(fire))
    }
}

fn binary_value(values: &[f64], var: VarId) -> bool {
    values.get(var.index()).is_some_and(|v| *v >= 0.5)
}

pub struct AssignmentModelBuilder<'a> {
    fleet: &'a [Helicopter],
    params: &'a OptimizationParams,
}

impl<'a> AssignmentModelBuilder<'a> {
    pub fn new(fleet: &'a [Helicopter], params: &'a OptimizationParams) -> Self {
        Self { fleet, params }
    }

    /// Formulates the group's model. `difficulties[f]` and the route
    /// matrices must both be laid out by the group's local fire order.
    pub fn build(&self, difficulties: &[u32], routes: &RouteMatrices) -> Result<AssignmentModel> {
        let n_h = self.fleet.len();
        let n_f = difficulties.len();
        if n_h == 0 || n_f == 0 {
            return Err(DispatchError::MissingData(format!(
                "cannot build an assignment model for {n_h} helicopters and {n_f} fires"
            )));
        }
        if routes.n_helicopters() != n_h || routes.n_fires() != n_f {
            return Err(DispatchError::MissingData(format!(
                "route matrices cover {}x{} pairs, model needs {n_h}x{n_f}",
                routes.n_helicopters(),
                routes.n_fires()
            )));
        }

        let costs = PairCosts::compute(self.fleet, routes, self.params.fuel_rate);
        let mut milp = MilpModel::new();

        // 1. Variables
        let mut assign = Vec::with_capacity(n_h * n_f);
        let mut assign_fire = Vec::with_capacity(n_h * n_f);
        for h in 0..n_h {
            for f in 0..n_f {
                assign.push(milp.add_binary(format!("assign_{h}_{f}")));
            }
        }
        let fire_on: Vec<VarId> = (0..n_f).map(|f| milp.add_binary(format!("fire_on_{f}"))).collect();
        for h in 0..n_h {
            for f in 0..n_f {
                assign_fire.push(milp.add_binary(format!("assign_fire_{h}_{f}")));
            }
        }
        let at = |h: usize, f: usize| h * n_f + f;

        // 2. Hard cutoffs
        let mut cutoffs = 0usize;
        for (h, heli) in self.fleet.iter().enumerate() {
            for f in 0..n_f {
                let x = assign[at(h, f)];
                if costs.arrival_time(h, f) > self.params.golden_time_minutes {
                    milp.add_constraint(format!("golden_time_{h}_{f}"), LinearExpr::new().term(x, 1.0), Relation::Equal, 0.0);
                    cutoffs += 1;
                }
                if costs.travel_time(h, f) > heli.time_limit {
                    milp.add_constraint(format!("endurance_{h}_{f}"), LinearExpr::new().term(x, 1.0), Relation::Equal, 0.0);
                    cutoffs += 1;
                }
            }
        }

        // 3. difficulty[f] * FireOn[f] <= sum_h capa[h] * Assign[h,f]
        for (f, &difficulty) in difficulties.iter().enumerate() {
            let mut expr = LinearExpr::new().term(fire_on[f], f64::from(difficulty));
            for (h, heli) in self.fleet.iter().enumerate() {
                expr.add_term(assign[at(h, f)], -heli.suppression_capacity);
            }
            milp.add_constraint(format!("suppression_{f}"), expr, Relation::LessEq, 0.0);
        }

        // 4. Each helicopter serves at most one fire per group
        for h in 0..n_h {
            let mut expr = LinearExpr::new();
            for f in 0..n_f {
                expr.add_term(assign[at(h, f)], 1.0);
            }
            milp.add_constraint(format!("single_use_{h}"), expr, Relation::LessEq, 1.0);
        }

        // 5. AssignFire = Assign * FireOn
        for h in 0..n_h {
            for f in 0..n_f {
                let (af, x, on) = (assign_fire[at(h, f)], assign[at(h, f)], fire_on[f]);
                milp.add_constraint(
                    format!("assign_fire_ub_assign_{h}_{f}"),
                    LinearExpr::new().term(af, 1.0).term(x, -1.0),
                    Relation::LessEq,
                    0.0,
                );
                milp.add_constraint(
                    format!("assign_fire_ub_fire_on_{h}_{f}"),
                    LinearExpr::new().term(af, 1.0).term(on, -1.0),
                    Relation::LessEq,
                    0.0,
                );
                milp.add_constraint(
                    format!("assign_fire_lb_{h}_{f}"),
                    LinearExpr::new().term(af, 1.0).term(x, -1.0).term(on, -1.0),
                    Relation::GreaterEq,
                    -1.0,
                );
            }
        }

        // 6. min sum fuel * AssignFire + penalty * sum (1 - FireOn)
        let penalty = self.params.big_penalty;
        let mut objective = LinearExpr::constant(penalty * n_f as f64);
        for h in 0..n_h {
            for f in 0..n_f {
                objective.add_term(assign_fire[at(h, f)], costs.fuel_cost(h, f));
            }
        }
        for &on in &fire_on {
            objective.add_term(on, -penalty);
        }
        milp.set_objective(objective);

        debug!(
            helicopters = n_h,
            fires = n_f,
            variables = milp.num_variables(),
            constraints = milp.constraints().len(),
            cutoffs,
            "built assignment model"
        );

        Ok(AssignmentModel {
            milp,
            costs,
            n_helicopters: n_h,
            n_fires: n_f,
            assign,
            fire_on,
            assign_fire,
        })
    }
}

/// Upper bound on the total fuel cost of any feasible group assignment: each
/// helicopter flies at most one sortie, and the endurance cutoff caps it at
/// `time_limit` minutes. Infinite when any helicopter has no finite limit.
pub fn max_fleet_fuel_cost(fleet: &[Helicopter], fuel_rate: f64) -> f64 {
    fleet
        .iter()
        .map(|h| (fuel_rate * h.efficiency * h.time_limit).max(0.0))
        .sum()
}
