use firedispatch_core::{DispatchError, NeedsDistribution, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Samples how many helicopters a fire asks for.
#[derive(Clone, Debug)]
pub struct HelicopterNeeds {
    options: Vec<u32>,
    index: WeightedIndex<f64>,
}

impl HelicopterNeeds {
    /// Rejects distributions that `NeedsDistribution::validate` rejects,
    /// including any option of zero helicopters.
    pub fn new(distribution: &NeedsDistribution) -> Result<Self> {
        distribution.validate()?;
        let index = WeightedIndex::new(&distribution.weights)
            .map_err(|e| DispatchError::Configuration(format!("fire_helicopter_needs: {e}")))?;
        Ok(Self {
            options: distribution.options.clone(),
            index,
        })
    }

    /// Always returns `count`.
    pub fn fixed(count: u32) -> Result<Self> {
        Self::new(&NeedsDistribution {
            options: vec![count],
            weights: vec![1.0],
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.options[self.index.sample(rng)]
    }
}
