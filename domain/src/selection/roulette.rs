//! Random selector and roulette spin log
//!
//! [`pick_random`] decides; [`spin_roulette`] decides first and then builds a
//! tick sequence that visits the pool in order and stops on the winner. The
//! ticks are for replay only and never influence the pick.

use crate::core::error::SelectionError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Full passes over the pool before the wheel may stop
pub const MIN_SPIN_CYCLES: usize = 4;

/// Uniform pick from a non-empty pool
pub fn pick_random<'a, T, R>(pool: &'a [T], rng: &mut R) -> Result<&'a T, SelectionError>
where
    R: Rng + ?Sized,
{
    pick_index(pool.len(), rng).map(|idx| &pool[idx])
}

/// Uniform index in `0..len`
pub fn pick_index<R>(len: usize, rng: &mut R) -> Result<usize, SelectionError>
where
    R: Rng + ?Sized,
{
    if len == 0 {
        return Err(SelectionError::EmptyPool);
    }
    Ok(rng.random_range(0..len))
}

/// Replayable roulette animation that lands on a pre-chosen index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinLog {
    pub winner_index: usize,
    /// Pool indices highlighted in order; the last one is the winner
    pub ticks: Vec<usize>,
}

impl SpinLog {
    /// Build the tick sequence for a decided winner
    pub fn landing_on(pool_len: usize, winner_index: usize) -> Self {
        let full_cycles = MIN_SPIN_CYCLES * pool_len;
        let ticks = (0..full_cycles)
            .chain(0..=winner_index)
            .map(|i| i % pool_len.max(1))
            .collect();
        Self {
            winner_index,
            ticks,
        }
    }

    pub fn cycles(&self, pool_len: usize) -> usize {
        if pool_len == 0 {
            0
        } else {
            self.ticks.len() / pool_len
        }
    }
}

/// Pick a winner and the spin that lands on it
pub fn spin_roulette<'a, T, R>(
    pool: &'a [T],
    rng: &mut R,
) -> Result<(&'a T, SpinLog), SelectionError>
where
    R: Rng + ?Sized,
{
    let winner_index = pick_index(pool.len(), rng)?;
    Ok((&pool[winner_index], SpinLog::landing_on(pool.len(), winner_index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::rng::SelectionRng;

    #[test]
    fn test_empty_pool_errors() {
        let mut rng = SelectionRng::seeded(1);
        let pool: Vec<u32> = vec![];
        assert_eq!(pick_random(&pool, &mut rng), Err(SelectionError::EmptyPool));
        assert!(spin_roulette(&pool, &mut rng).is_err());
    }

    #[test]
    fn test_single_item_always_picked() {
        let mut rng = SelectionRng::seeded(9);
        let pool = ["only"];
        for _ in 0..20 {
            assert_eq!(*pick_random(&pool, &mut rng).unwrap(), "only");
        }
    }

    #[test]
    fn test_seeded_pick_is_reproducible() {
        let pool = [1, 2, 3, 4, 5, 6];
        let a: Vec<i32> = {
            let mut rng = SelectionRng::seeded(2024);
            (0..10).map(|_| *pick_random(&pool, &mut rng).unwrap()).collect()
        };
        let b: Vec<i32> = {
            let mut rng = SelectionRng::seeded(2024);
            (0..10).map(|_| *pick_random(&pool, &mut rng).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_random_is_uniform_chi_squared() {
        // 3 degrees of freedom, p = 0.001 critical value is 16.27
        let pool = [0usize, 1, 2, 3];
        let draws = 10_000;
        let mut counts = [0usize; 4];
        let mut rng = SelectionRng::seeded(0xC0FFEE);
        for _ in 0..draws {
            counts[*pick_random(&pool, &mut rng).unwrap()] += 1;
        }
        let expected = draws as f64 / pool.len() as f64;
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi2 < 16.27, "chi2 = {chi2}, counts = {counts:?}");
    }

    #[test]
    fn test_spin_lands_on_winner() {
        let pool = ["a", "b", "c"];
        for seed in 0..25 {
            let mut rng = SelectionRng::seeded(seed);
            let (winner, log) = spin_roulette(&pool, &mut rng).unwrap();
            assert_eq!(pool[*log.ticks.last().unwrap()], *winner);
            assert_eq!(pool[log.winner_index], *winner);
            assert!(log.cycles(pool.len()) >= MIN_SPIN_CYCLES);
        }
    }

    #[test]
    fn test_spin_visits_pool_in_order() {
        let log = SpinLog::landing_on(3, 1);
        assert_eq!(&log.ticks[..4], &[0, 1, 2, 0]);
        assert_eq!(log.ticks.len(), MIN_SPIN_CYCLES * 3 + 2);
    }

    #[test]
    fn test_spin_pick_matches_plain_pick() {
        let pool = [10, 20, 30, 40];
        let mut a = SelectionRng::seeded(77);
        let mut b = SelectionRng::seeded(77);
        let plain = *pick_random(&pool, &mut a).unwrap();
        let (spun, _) = spin_roulette(&pool, &mut b).unwrap();
        assert_eq!(plain, *spun);
    }
}
