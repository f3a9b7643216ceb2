use tracing::{debug, warn};

use crate::geo::calculate_distance;
use crate::models::{Location, RouteLegs, WaterSource};

/// Water sources considered per fire.
pub const NEAREST_WATER_CANDIDATES: usize = 3;
/// Latitude/longitude offset of the stand-in source used when the catalog is empty.
pub const DUMMY_WATER_OFFSET_DEG: f64 = 0.01;

/// Winning refill legs for every helicopter/fire pair of one scenario group,
/// indexed `[helicopter][fire]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteMatrices {
    // Flattened, row-major by helicopter
    legs: Vec<RouteLegs>,
    n_helicopters: usize,
    n_fires: usize,
}

impl RouteMatrices {
    pub fn n_helicopters(&self) -> usize {
        self.n_helicopters
    }

    pub fn n_fires(&self) -> usize {
        self.n_fires
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    #[inline]
    pub fn legs(&self, heli: usize, fire: usize) -> RouteLegs {
        self.legs[heli * self.n_fires + fire]
    }

    /// helicopter -> water
    pub fn leg1(&self, heli: usize, fire: usize) -> f64 {
        self.legs(heli, fire).to_water
    }

    /// water -> fire
    pub fn leg2(&self, heli: usize, fire: usize) -> f64 {
        self.legs(heli, fire).water_to_fire
    }

    /// fire -> helicopter
    pub fn leg3(&self, heli: usize, fire: usize) -> f64 {
        self.legs(heli, fire).fire_to_base
    }
}

/// Picks, for each fire and helicopter, the refill route through one of the
/// fire's nearest water sources that minimises the round trip
/// base -> water -> fire -> base.
///
/// With an empty catalog each fire refills at its own stand-in source just
/// off its position, so routes still resolve and the refill leg stays short.
pub fn find_optimal_water_sources(
    fires: &[Location],
    water: &[WaterSource],
    bases: &[Location],
) -> RouteMatrices {
    if fires.is_empty() || bases.is_empty() {
        return RouteMatrices::default();
    }

    let catalog: Vec<Location> = water.iter().map(|w| w.location).collect();
    if catalog.is_empty() {
        warn!(fires = fires.len(), "no water sources available, using a stand-in source next to each fire");
    }

    let n_fires = fires.len();
    let mut legs = vec![RouteLegs::default(); bases.len() * n_fires];

    for (f_idx, fire) in fires.iter().enumerate() {
        let candidates: Vec<(Location, f64)> = if catalog.is_empty() {
            let stand_in = fire.offset(DUMMY_WATER_OFFSET_DEG, DUMMY_WATER_OFFSET_DEG);
            vec![(stand_in, calculate_distance(fire, &stand_in))]
        } else {
            nearest_sources(fire, &catalog, NEAREST_WATER_CANDIDATES)
                .into_iter()
                .map(|(w_idx, km)| (catalog[w_idx], km))
                .collect()
        };

        for (h_idx, base) in bases.iter().enumerate() {
            let fire_to_base = calculate_distance(fire, base);
            let mut best: Option<RouteLegs> = None;

            for (source, water_to_fire) in &candidates {
                let route = RouteLegs {
                    to_water: calculate_distance(base, source),
                    water_to_fire: *water_to_fire,
                    fire_to_base,
                };
                // strict: first candidate wins ties
                if best.map_or(true, |b| route.total() < b.total()) {
                    best = Some(route);
                }
            }

            if let Some(route) = best {
                legs[h_idx * n_fires + f_idx] = route;
            }
        }
    }

    debug!(helicopters = bases.len(), fires = n_fires, sources = catalog.len(), "resolved refill routes");
    RouteMatrices {
        legs,
        n_helicopters: bases.len(),
        n_fires,
    }
}

/// `(catalog index, distance to fire)` of the `k` closest sources, closest
/// first. Equal distances keep catalog order.
fn nearest_sources(fire: &Location, catalog: &[Location], k: usize) -> Vec<(usize, f64)> {
    let mut dists: Vec<(usize, f64)> = catalog
        .iter()
        .enumerate()
        .map(|(idx, w)| (idx, calculate_distance(fire, w)))
        .collect();
    dists.sort_by(|a, b| a.1.total_cmp(&b.1));
    dists.truncate(k);
    dists
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn src(lat: f64, lng: f64) -> WaterSource {
        WaterSource { location: Location::new(lat, lng) }
    }

    #[test]
    fn empty_inputs_give_empty_matrices() {
        let m = find_optimal_water_sources(&[], &[src(0.0, 0.0)], &[Location::new(0.0, 0.0)]);
        assert!(m.is_empty());
        let m = find_optimal_water_sources(&[Location::new(0.0, 0.0)], &[], &[]);
        assert!(m.is_empty());
    }

    #[test]
    fn nearest_sources_are_stable_on_ties() {
        let fire = Location::new(0.0, 0.0);
        let catalog = vec![
            Location::new(0.0, 0.2),
            Location::new(0.0, 0.1),
            Location::new(0.0, -0.1),
            Location::new(0.0, 0.1),
        ];
        let picked: Vec<usize> = nearest_sources(&fire, &catalog, 3).iter().map(|c| c.0).collect();
        assert_eq!(picked, vec![1, 2, 3]);
    }

    #[test]
    fn chooses_candidate_minimising_round_trip() {
        let fire = Location::new(37.0, 127.0);
        let base = Location::new(37.0, 127.5);
        // Both sources equally close to the fire; only the eastern one is on the way.
        let water = vec![src(37.0, 126.9), src(37.0, 127.1)];
        let m = find_optimal_water_sources(&[fire], &water, &[base]);

        let east = Location::new(37.0, 127.1);
        assert_relative_eq!(m.leg1(0, 0), calculate_distance(&base, &east), epsilon = 1e-9);
        assert_relative_eq!(m.leg2(0, 0), calculate_distance(&east, &fire), epsilon = 1e-9);
        assert_relative_eq!(m.leg3(0, 0), calculate_distance(&fire, &base), epsilon = 1e-9);
    }

    #[test]
    fn far_sources_outside_top_three_are_ignored() {
        let fire = Location::new(37.0, 127.0);
        let base = Location::new(38.0, 127.0);
        // The fourth source sits on the base but is the farthest from the fire.
        let water = vec![
            src(36.95, 127.0),
            src(36.94, 127.0),
            src(36.93, 127.0),
            src(38.0, 127.0),
        ];
        let m = find_optimal_water_sources(&[fire], &water, &[base]);
        assert!(m.leg1(0, 0) > 100.0);
    }

    #[test]
    fn no_water_sources_use_offset_stand_ins() {
        let fires = vec![Location::new(36.5, 128.0), Location::new(35.1, 129.0)];
        let bases = vec![Location::new(37.0, 127.5), Location::new(35.0, 128.9), Location::new(36.0, 128.2)];
        let m = find_optimal_water_sources(&fires, &[], &bases);

        assert_eq!((m.n_helicopters(), m.n_fires()), (3, 2));
        for h in 0..3 {
            for f in 0..2 {
                let legs = m.legs(h, f);
                for d in [legs.to_water, legs.water_to_fire, legs.fire_to_base] {
                    assert!(d.is_finite() && d >= 0.0);
                }
                let stand_in = fires[f].offset(DUMMY_WATER_OFFSET_DEG, DUMMY_WATER_OFFSET_DEG);
                // each fire refills at its own stand-in, never at another fire's
                assert_relative_eq!(legs.water_to_fire, calculate_distance(&fires[f], &stand_in), epsilon = 1e-9);
                assert_relative_eq!(legs.to_water, calculate_distance(&bases[h], &stand_in), epsilon = 1e-9);
            }
        }
    }
}
