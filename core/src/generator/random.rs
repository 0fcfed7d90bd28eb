use alloc::vec;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Uniform placement: every position outside the safe zone is equally likely, sampled without
/// replacement.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: &GameConfig, anchor: Coord2) -> Vec<Coord2> {
        let size = config.size;
        let total = usize::from(config.total_cells());

        let mut excluded = vec![false; total];
        for coords in config.safe_zone.cells(anchor, size) {
            excluded[linear_index(coords, size)] = true;
        }
        let pool: Vec<usize> = (0..total).filter(|&i| !excluded[i]).collect();

        let wanted = usize::from(config.mines);
        let amount = if wanted > pool.len() {
            log::warn!(
                "Safe zone leaves only {} free cells, requested {} mines",
                pool.len(),
                wanted
            );
            pool.len()
        } else {
            wanted
        };

        let mines: Vec<Coord2> = index::sample(&mut self.rng, pool.len(), amount)
            .into_iter()
            .map(|i| from_linear_index(pool[i], size))
            .collect();
        log::debug!(
            "Generated {} mines around anchor {:?} ({:?})",
            mines.len(),
            anchor,
            config.safe_zone
        );
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_number_of_distinct_mines() {
        let config = GameConfig::new(10).unwrap();
        let mut generator = RandomMineGenerator::new(7);

        let mut mines = generator.generate(&config, (5, 5));
        mines.sort();
        mines.dedup();

        assert_eq!(mines.len(), usize::from(config.mines));
    }

    #[test]
    fn never_places_in_safe_zone() {
        for zone in [SafeZone::Neighborhood, SafeZone::LinearIndex] {
            let config = GameConfig::with_mines(5, 16).unwrap().with_safe_zone(zone);
            for seed in 0..50 {
                let anchor = ((seed % 5) as Coord, (seed / 10) as Coord);
                let mines = RandomMineGenerator::new(seed).generate(&config, anchor);
                let zone_cells = zone.cells(anchor, config.size);
                assert!(mines.iter().all(|pos| !zone_cells.contains(pos)));
                assert_eq!(mines.len(), 16);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::default();
        let a = RandomMineGenerator::new(42).generate(&config, (3, 4));
        let b = RandomMineGenerator::new(42).generate(&config, (3, 4));
        assert_eq!(a, b);
    }
}
