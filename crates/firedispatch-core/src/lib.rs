//! Shared primitives for wildfire helicopter dispatch.
//!
//! - [`models`] fire, fleet, helipad and water-source records
//! - [`geo`] WGS-84 geodesic distance
//! - [`scenario`] chain-linked time-window grouping of fires
//! - [`routing`] refill route selection through nearby water sources
//! - [`config`] JSON configuration and its validation

pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod routing;
pub mod scenario;

pub use config::{DispatchConfig, NeedsDistribution, OptimizationParams, SimulationParams, SolverBackend, SolverConfig};
pub use error::{DispatchError, Result};
pub use geo::calculate_distance;
pub use models::{
    join_fleet, Fire, Helicopter, HelicopterBase, HelicopterSpec, HelicopterUnit, Helipad, Location, RouteLegs,
    WaterSource,
};
pub use routing::{find_optimal_water_sources, RouteMatrices};
pub use scenario::{group_by_time_proximity, ScenarioGroup};
