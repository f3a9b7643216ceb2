use firedispatch_core::{Fire, Helicopter, Helipad, RouteMatrices, ScenarioGroup};

use crate::builder::AssignmentModel;
use crate::report::{Assignment, AssignmentOutcome, DispatchDetail};

const UNKNOWN_BASE: &str = "UnknownBase";

/// Reads solved models back into report rows. `fleet` must be the fleet
/// the models were built from, in the same order.
pub struct SolutionParser<'a> {
    fires: &'a [Fire],
    fleet: &'a [Helicopter],
    helipads: &'a [Helipad],
}

impl<'a> SolutionParser<'a> {
    pub fn new(fires: &'a [Fire], fleet: &'a [Helicopter], helipads: &'a [Helipad]) -> Self {
        Self { fires, fleet, helipads }
    }

    /// One row per committed pair, plus a placeholder for every fire of the
    /// group that received no helicopter. Sorted by fire id.
    pub fn parse(
        &self,
        group: &ScenarioGroup,
        model: &AssignmentModel,
        routes: &RouteMatrices,
        values: &[f64],
    ) -> Vec<Assignment> {
        let mut rows = Vec::new();

        for f in 0..model.n_fires() {
            let Some(original) = group.original_index(f) else {
                continue;
            };
            let addressed = model.is_fire_on(values, f);
            let before = rows.len();

            for (h, heli) in self.fleet.iter().enumerate().take(model.n_helicopters()) {
                if !model.is_assigned(values, h, f) {
                    continue;
                }
                rows.push(Assignment {
                    fire_id: original + 1,
                    fire_name: self.fire_name(original),
                    outcome: AssignmentOutcome::Dispatched(DispatchDetail {
                        helicopter_id: heli.id,
                        helicopter_model: heli.model_name.clone(),
                        base_name: self.base_name(heli),
                        legs: routes.legs(h, f),
                        travel_time: model.costs().travel_time(h, f),
                        fuel_cost: model.costs().fuel_cost(h, f),
                        fire_addressed: addressed,
                    }),
                });
            }

            if rows.len() == before {
                rows.push(Assignment::unaddressed(original + 1, self.fire_name(original)));
            }
        }

        rows.sort_by_key(|a| a.fire_id);
        rows
    }

    /// Placeholders for every fire of a group that could not be solved.
    pub fn unaddressed(&self, group: &ScenarioGroup) -> Vec<Assignment> {
        let mut rows: Vec<Assignment> = group
            .fire_indices()
            .iter()
            .map(|&idx| Assignment::unaddressed(idx + 1, self.fire_name(idx)))
            .collect();
        rows.sort_by_key(|a| a.fire_id);
        rows
    }

    fn fire_name(&self, idx: usize) -> String {
        self.fires.get(idx).map(|f| f.id.clone()).unwrap_or_default()
    }

    fn base_name(&self, heli: &Helicopter) -> String {
        self.helipads
            .get(heli.base)
            .map_or_else(|| UNKNOWN_BASE.to_string(), |pad| pad.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AssignmentModelBuilder;
    use firedispatch_core::{find_optimal_water_sources, group_by_time_proximity, Location, OptimizationParams};

    fn fire(id: &str, time: &str, lat: f64) -> Fire {
        Fire {
            id: id.into(),
            location: Location::new(lat, 127.0),
            date: "2024-05-01".into(),
            time: time.into(),
            intensity: 1,
        }
    }

    fn heli(id: u32, base: usize) -> Helicopter {
        Helicopter {
            id,
            model_name: format!("M{id}"),
            base,
            speed_to_water: 3.0,
            speed_loaded: 2.5,
            efficiency: 1.0,
            load_capacity: 2000.0,
            time_limit: 240.0,
            suppression_capacity: 1.0,
        }
    }

    fn params() -> OptimizationParams {
        OptimizationParams {
            max_helicopter_range_km: 200.0,
            golden_time_minutes: 60.0,
            scenario_time_window_minutes: 10.0,
            fuel_rate: 1.0,
            big_penalty: 1e6,
        }
    }

    #[test]
    fn maps_local_fires_back_to_batch_positions() {
        // Group {0, 2}: fire 1 falls two hours later.
        let fires = vec![fire("A", "10:00", 37.1), fire("B", "12:00", 37.2), fire("C", "10:05", 37.3)];
        let fleet = vec![heli(11, 0), heli(12, 0)];
        let pads = vec![Helipad { location: Location::new(37.0, 127.0), name: "North".into() }];

        let groups = group_by_time_proximity(&fires, 10.0).unwrap();
        let group = &groups[0];
        assert_eq!(group.fire_indices(), &[0, 2]);

        let coords: Vec<Location> = group.fire_indices().iter().map(|&i| fires[i].location).collect();
        let routes = find_optimal_water_sources(&coords, &[], &[pads[0].location; 2]);
        let p = params();
        let model = AssignmentModelBuilder::new(&fleet, &p).build(&[1, 1], &routes).unwrap();

        // Helicopter 12 to the group's second fire, nothing to the first.
        let mut values = vec![0.0; model.milp().num_variables()];
        values[model.assign(1, 1).index()] = 0.9;
        values[model.fire_on(1).index()] = 1.0;
        values[model.assign_fire(1, 1).index()] = 1.0;

        let rows = SolutionParser::new(&fires, &fleet, &pads).parse(group, &model, &routes, &values);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Assignment::unaddressed(1, "A"));
        assert_eq!(rows[1].fire_id, 3);
        assert_eq!(rows[1].fire_name, "C");
        let detail = rows[1].detail().unwrap();
        assert_eq!(detail.helicopter_id, 12);
        assert_eq!(detail.base_name, "North");
        assert!(detail.fire_addressed);
        assert_eq!(detail.legs, routes.legs(1, 1));
        assert_eq!(detail.travel_time, model.costs().travel_time(1, 1));
    }

    #[test]
    fn values_below_half_do_not_commit() {
        let fires = vec![fire("A", "10:00", 37.1)];
        let fleet = vec![heli(1, 0)];
        let pads = vec![Helipad { location: Location::new(37.0, 127.0), name: "North".into() }];
        let groups = group_by_time_proximity(&fires, 10.0).unwrap();
        let routes = find_optimal_water_sources(&[fires[0].location], &[], &[pads[0].location]);
        let p = params();
        let model = AssignmentModelBuilder::new(&fleet, &p).build(&[1], &routes).unwrap();

        let mut values = vec![0.0; model.milp().num_variables()];
        values[model.assign(0, 0).index()] = 0.49;
        let rows = SolutionParser::new(&fires, &fleet, &pads).parse(&groups[0], &model, &routes, &values);
        assert_eq!(rows, vec![Assignment::unaddressed(1, "A")]);
    }

    #[test]
    fn unknown_base_gets_placeholder_name() {
        let fires = vec![fire("A", "10:00", 37.1)];
        let fleet = vec![heli(1, 5)];
        let parser = SolutionParser::new(&fires, &fleet, &[]);
        assert_eq!(parser.base_name(&fleet[0]), UNKNOWN_BASE);
    }
}
