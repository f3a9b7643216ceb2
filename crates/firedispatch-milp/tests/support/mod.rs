#![allow(dead_code)]

use firedispatch_core::{Fire, Helicopter, Helipad, Location, OptimizationParams, WaterSource};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const SEOUL: Location = Location::new(37.50, 127.00);
pub const DAEGU: Location = Location::new(35.87, 128.60);

pub fn helipads() -> Vec<Helipad> {
    vec![
        Helipad { location: SEOUL, name: "Seoul".into() },
        Helipad { location: DAEGU, name: "Daegu".into() },
    ]
}

pub fn water() -> Vec<WaterSource> {
    [(37.52, 127.03), (37.45, 126.95), (35.90, 128.62), (35.85, 128.55), (36.60, 127.80)]
        .iter()
        .map(|&(lat, lng)| WaterSource { location: Location::new(lat, lng) })
        .collect()
}

pub fn params() -> OptimizationParams {
    OptimizationParams {
        max_helicopter_range_km: 150.0,
        golden_time_minutes: 30.0,
        scenario_time_window_minutes: 10.0,
        fuel_rate: 1.0,
        big_penalty: 1e6,
    }
}

/// 180 km/h empty, 150 km/h loaded, two hours endurance.
pub fn heli(id: u32, base: usize, capacity: f64) -> Helicopter {
    Helicopter {
        id,
        model_name: "KA-32".into(),
        base,
        speed_to_water: 3.0,
        speed_loaded: 2.5,
        efficiency: 1.0,
        load_capacity: 3000.0,
        time_limit: 120.0,
        suppression_capacity: capacity,
    }
}

pub fn fire(id: &str, time: &str, location: Location, intensity: u32) -> Fire {
    Fire {
        id: id.into(),
        location,
        date: "2024-04-11".into(),
        time: time.into(),
        intensity,
    }
}

pub fn near_seoul() -> Location {
    Location::new(37.55, 127.05)
}

pub fn near_daegu() -> Location {
    Location::new(35.92, 128.65)
}
