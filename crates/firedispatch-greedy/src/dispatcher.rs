use firedispatch_core::{Fire, HelicopterBase, OptimizationParams, Result, SimulationParams};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info, warn};

use crate::ledger::AllocationLedger;
use crate::needs::HelicopterNeeds;
use crate::record::{DispatchOutcome, DispatchRecord};

/// Nearest-base-first allocation with no solver involved.
///
/// Fires are served in the order given. Availability is tracked in an
/// [`AllocationLedger`] that starts full on every [`dispatch`](Self::dispatch)
/// call and only shrinks during it, so earlier fires can starve later ones.
pub struct BasicDispatcher<R = Xoshiro256PlusPlus> {
    bases: Vec<HelicopterBase>,
    max_range_km: f64,
    needs: HelicopterNeeds,
    rng: R,
}

impl BasicDispatcher<Xoshiro256PlusPlus> {
    pub fn new(bases: Vec<HelicopterBase>, optimization: &OptimizationParams, simulation: &SimulationParams) -> Result<Self> {
        let rng = Xoshiro256PlusPlus::seed_from_u64(simulation.random_seed);
        Self::with_rng(bases, optimization, simulation, rng)
    }
}

impl<R: Rng> BasicDispatcher<R> {
    pub fn with_rng(
        bases: Vec<HelicopterBase>,
        optimization: &OptimizationParams,
        simulation: &SimulationParams,
        rng: R,
    ) -> Result<Self> {
        optimization.validate()?;
        let needs = HelicopterNeeds::new(&simulation.fire_helicopter_needs)?;
        Ok(Self::with_needs(bases, optimization.max_helicopter_range_km, needs, rng))
    }

    pub fn with_needs(bases: Vec<HelicopterBase>, max_range_km: f64, needs: HelicopterNeeds, rng: R) -> Self {
        Self {
            bases,
            max_range_km,
            needs,
            rng,
        }
    }

    pub fn bases(&self) -> &[HelicopterBase] {
        &self.bases
    }

    pub fn dispatch(&mut self, fires: &[Fire]) -> Vec<DispatchRecord> {
        if fires.is_empty() {
            return Vec::new();
        }
        if self.bases.is_empty() {
            warn!("no helicopter base data, skipping basic dispatch");
            return Vec::new();
        }

        let mut ledger = AllocationLedger::new(&self.bases);
        let mut log = Vec::new();
        for fire in fires {
            let needed = self.needs.sample(&mut self.rng);
            let (next, records) = self.allocate(ledger, fire, needed);
            ledger = next;
            log.extend(records);
        }

        let sent: u32 = log.iter().map(DispatchRecord::sent).sum();
        info!(fires = fires.len(), helicopters_sent = sent, "basic dispatch complete");
        log
    }

    /// In-range bases as `(index, km)`, nearest first. Equal distances keep
    /// input order.
    fn bases_in_range(&self, fire: &Fire) -> Vec<(usize, f64)> {
        let mut near: Vec<(usize, f64)> = self
            .bases
            .iter()
            .enumerate()
            .map(|(i, base)| (i, base.location.distance_to(&fire.location)))
            .filter(|&(_, km)| km <= self.max_range_km)
            .collect();
        near.sort_by(|a, b| a.1.total_cmp(&b.1));
        near
    }

    fn allocate(
        &self,
        mut ledger: AllocationLedger,
        fire: &Fire,
        needed: u32,
    ) -> (AllocationLedger, Vec<DispatchRecord>) {
        let marker = |outcome| DispatchRecord {
            fire_id: fire.id.clone(),
            outcome,
        };

        let near = self.bases_in_range(fire);
        if near.is_empty() {
            debug!(fire = %fire.id, "no base within range");
            return (ledger, vec![marker(DispatchOutcome::NoInitialResponse)]);
        }

        let available = ledger.total_available(near.iter().map(|&(i, _)| i));
        if available < needed {
            debug!(fire = %fire.id, needed, available, "not enough helicopters in range");
            return (ledger, vec![marker(DispatchOutcome::NoAdditionalDispatch)]);
        }

        let mut remaining = needed;
        let mut records = Vec::new();
        for (i, km) in near {
            if remaining == 0 {
                break;
            }
            let sent = ledger.take(i, remaining);
            if sent == 0 {
                continue;
            }
            remaining -= sent;
            let base = &self.bases[i];
            debug!(fire = %fire.id, base = %base.name, sent, km, "helicopters sent");
            records.push(marker(DispatchOutcome::Sent {
                base_name: base.name.clone(),
                model: base.model.clone(),
                sent,
                nominal: base.helicopters,
            }));
        }
        (ledger, records)
    }
}
