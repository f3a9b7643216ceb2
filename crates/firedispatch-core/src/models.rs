use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DispatchError, Result};
use crate::geo::calculate_distance;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Geodesic distance in kilometres.
    #[inline]
    pub fn distance_to(&self, other: &Location) -> f64 {
        calculate_distance(self, other)
    }

    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Location {
        Location::new(self.latitude + d_lat, self.longitude + d_lng)
    }
}

/// An ignition report. Immutable once ingested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fire {
    pub id: String,
    pub location: Location,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, seconds optional.
    pub time: String,
    /// Difficulty score the assigned suppression capacity has to cover.
    pub intensity: u32,
}

impl Fire {
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        let raw = format!("{} {}", self.date.trim(), self.time.trim());
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
            .ok_or_else(|| DispatchError::InvalidTimestamp {
                fire: self.id.clone(),
                value: raw,
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Helipad {
    pub location: Location,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterSource {
    pub location: Location,
}

/// One airframe in the fleet registry, before the specs catalog is joined in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HelicopterUnit {
    pub id: u32,
    pub model: String,
    /// Index into the helipad directory.
    pub base: usize,
}

/// Performance figures shared by every airframe of one model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HelicopterSpec {
    pub model_id: String,
    pub model_name: String,
    /// km/min, flying empty (base to water, fire back to base).
    pub speed_to_water: f64,
    /// km/min, carrying a load from water to fire.
    pub speed_loaded: f64,
    pub efficiency: f64,
    pub load_capacity: f64,
    /// Endurance, minutes.
    pub time_limit: f64,
    pub suppression_capacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Helicopter {
    pub id: u32,
    pub model_name: String,
    pub base: usize,
    pub speed_to_water: f64,
    pub speed_loaded: f64,
    pub efficiency: f64,
    pub load_capacity: f64,
    pub time_limit: f64,
    pub suppression_capacity: f64,
}

impl Helicopter {
    pub fn from_unit(unit: &HelicopterUnit, spec: &HelicopterSpec) -> Self {
        Self {
            id: unit.id,
            model_name: spec.model_name.clone(),
            base: unit.base,
            speed_to_water: spec.speed_to_water,
            speed_loaded: spec.speed_loaded,
            efficiency: spec.efficiency,
            load_capacity: spec.load_capacity,
            time_limit: spec.time_limit,
            suppression_capacity: spec.suppression_capacity,
        }
    }

    pub fn has_valid_speeds(&self) -> bool {
        [self.speed_to_water, self.speed_loaded]
            .iter()
            .all(|s| s.is_finite() && *s > 0.0)
    }

    /// Resolves the home base against the helipad directory.
    pub fn base_location(&self, helipads: &[Helipad]) -> Result<Location> {
        helipads
            .get(self.base)
            .map(|pad| pad.location)
            .ok_or(DispatchError::InvalidReference {
                helicopter: self.id,
                base: self.base,
                known: helipads.len(),
            })
    }
}

/// Left-joins the unit registry with the specs catalog on the model key.
/// Units whose model is missing from the catalog are dropped.
pub fn join_fleet(units: &[HelicopterUnit], specs: &[HelicopterSpec]) -> Vec<Helicopter> {
    units
        .iter()
        .filter_map(|unit| match specs.iter().find(|s| s.model_id == unit.model) {
            Some(spec) => Some(Helicopter::from_unit(unit, spec)),
            None => {
                warn!(helicopter = unit.id, model = %unit.model, "no spec row for helicopter model, unit skipped");
                None
            }
        })
        .collect()
}

/// A helipad as seen by the greedy allocator: a named site with a nominal
/// number of airframes of one model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HelicopterBase {
    pub name: String,
    pub location: Location,
    pub model: String,
    pub helicopters: u32,
}

/// The three distance segments of one refill round trip, kilometres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLegs {
    /// base -> water
    pub to_water: f64,
    /// water -> fire
    pub water_to_fire: f64,
    /// fire -> base
    pub fire_to_base: f64,
}

impl RouteLegs {
    #[inline]
    pub fn total(&self) -> f64 {
        self.to_water + self.water_to_fire + self.fire_to_base
    }
}
