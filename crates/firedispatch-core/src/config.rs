use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DispatchError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub optimization: OptimizationParams,
    pub simulation: SimulationParams,
    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationParams {
    pub max_helicopter_range_km: f64,
    pub golden_time_minutes: f64,
    pub scenario_time_window_minutes: f64,
    pub fuel_rate: f64,
    /// Must exceed any feasible total fuel cost of a group, see
    /// `firedispatch_milp::max_fleet_fuel_cost`.
    pub big_penalty: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub random_seed: u64,
    pub fire_helicopter_needs: NeedsDistribution,
}

/// Discrete distribution of how many helicopters a fire asks for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeedsDistribution {
    pub options: Vec<u32>,
    pub weights: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_solver_name")]
    pub name: String,
    #[serde(default)]
    pub executable_path: Option<String>,
}

fn default_solver_name() -> String {
    "microlp".to_string()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            name: default_solver_name(),
            executable_path: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverBackend {
    /// Pure-Rust branch and bound bundled with good_lp.
    Microlp,
}

impl SolverConfig {
    pub fn backend(&self) -> Result<SolverBackend> {
        let backend = match self.name.trim().to_ascii_lowercase().as_str() {
            "microlp" | "default" => SolverBackend::Microlp,
            other => {
                return Err(DispatchError::Configuration(format!(
                    "no solver backend named {other:?} is available (known: microlp)"
                )))
            }
        };
        if let Some(path) = &self.executable_path {
            debug!(solver = %self.name, path = %path, "in-process solver ignores executable_path");
        }
        Ok(backend)
    }
}

impl DispatchConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: DispatchConfig = serde_json::from_str(raw)
            .map_err(|e| DispatchError::Configuration(format!("invalid configuration JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DispatchError::Configuration(format!("cannot read configuration file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.optimization.validate()?;
        self.simulation.fire_helicopter_needs.validate()?;
        self.solver.backend()?;
        Ok(())
    }
}

impl OptimizationParams {
    pub fn validate(&self) -> Result<()> {
        positive("max_helicopter_range_km", self.max_helicopter_range_km)?;
        positive("golden_time_minutes", self.golden_time_minutes)?;
        positive("fuel_rate", self.fuel_rate)?;
        positive("big_penalty", self.big_penalty)?;
        let window = self.scenario_time_window_minutes;
        if !window.is_finite() || window < 0.0 {
            return Err(DispatchError::Configuration(format!(
                "scenario_time_window_minutes must be a non-negative number, got {window}"
            )));
        }
        Ok(())
    }
}

impl NeedsDistribution {
    pub fn validate(&self) -> Result<()> {
        if self.options.is_empty() {
            return Err(DispatchError::Configuration(
                "fire_helicopter_needs.options must not be empty".into(),
            ));
        }
        if self.options.len() != self.weights.len() {
            return Err(DispatchError::Configuration(format!(
                "fire_helicopter_needs has {} options but {} weights",
                self.options.len(),
                self.weights.len()
            )));
        }
        if self.options.contains(&0) {
            return Err(DispatchError::Configuration(
                "fire_helicopter_needs.options must all be at least 1".into(),
            ));
        }
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DispatchError::Configuration(
                "fire_helicopter_needs.weights must be finite and non-negative".into(),
            ));
        }
        if self.weights.iter().sum::<f64>() <= 0.0 {
            return Err(DispatchError::Configuration(
                "fire_helicopter_needs.weights must not all be zero".into(),
            ));
        }
        Ok(())
    }
}

fn positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DispatchError::Configuration(format!(
            "{key} must be a positive number, got {value}"
        )))
    }
}
