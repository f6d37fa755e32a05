//! End-to-end tests driving the engine through the anytime runner with
//! kernels whose stationary distributions are known exactly.
//!
//! 1. A lazy symmetric random walk on a ring, whose stationary distribution
//!    is uniform over the ring.
//! 2. An independence kernel drawing from a binomial distribution, whose
//!    empirical mean must match the binomial mean.

use approx::assert_abs_diff_eq;
use mcmc_engine::anytime::AnytimeRunner;
use mcmc_engine::engine::{McmcEngine, TransitionKernel};
use rand::rngs::SmallRng;
use rand::Rng;
use rand_distr::{Binomial, Distribution};

/// Moves -1 or +1 with probability 1/4 each and stays put otherwise. The
/// laziness makes the chain aperiodic on rings of any size.
#[derive(Debug, Clone)]
struct LazyRingWalk {
    ring: i64,
}

impl TransitionKernel<i64> for LazyRingWalk {
    fn create_initial(&mut self, _rng: &mut SmallRng) -> anyhow::Result<i64> {
        Ok(0)
    }

    fn update(&mut self, param: &mut i64, rng: &mut SmallRng) -> anyhow::Result<()> {
        let delta: i64 = match rng.gen_range(0u8..4) {
            0 => -1,
            1 => 1,
            _ => 0,
        };
        *param = (*param + delta).rem_euclid(self.ring);
        Ok(())
    }
}

#[test]
fn ring_walk_occupancy_is_uniform() {
    const RING: i64 = 5;
    const SAMPLES: usize = 40_000;

    let mut engine = McmcEngine::new(LazyRingWalk { ring: RING }).set_seed(42);
    engine.set_burn_in_iterations(500);
    engine.set_iterations_per_sample(2).unwrap();
    engine.set_max_samples(SAMPLES).unwrap();

    let runner = AnytimeRunner::new();
    let performed = runner.run(&mut engine).unwrap();
    assert_eq!(performed, SAMPLES);

    let result = engine.result().expect("result after a completed run");
    assert_eq!(result.total(), SAMPLES as u64);
    assert_eq!(result.len(), RING as usize);

    let expected = 1.0 / RING as f64;
    for state in 0..RING {
        let fraction = result.fraction(&state);
        assert!(
            (fraction - expected).abs() < 0.03,
            "state {} occupancy {} deviates from uniform {}",
            state,
            fraction,
            expected
        );
    }
}

/// A perfectly mixing chain: every transition replaces the state with an
/// independent draw from the target.
struct BinomialDraw {
    target: Binomial,
}

impl TransitionKernel<u64> for BinomialDraw {
    fn create_initial(&mut self, rng: &mut SmallRng) -> anyhow::Result<u64> {
        Ok(self.target.sample(rng))
    }

    fn update(&mut self, param: &mut u64, rng: &mut SmallRng) -> anyhow::Result<()> {
        *param = self.target.sample(rng);
        Ok(())
    }
}

#[test]
fn independence_kernel_matches_binomial_mean() {
    const SAMPLES: usize = 20_000;

    let kernel = BinomialDraw {
        target: Binomial::new(10, 0.3).unwrap(),
    };
    let mut engine = McmcEngine::new(kernel).set_seed(1234);
    engine.set_max_samples(SAMPLES).unwrap();

    let runner = AnytimeRunner::new();
    runner.run(&mut engine).unwrap();

    let result = engine.result().expect("result after a completed run");
    assert_eq!(result.total(), SAMPLES as u64);

    let mean = result.mean().expect("non-empty result");
    assert_abs_diff_eq!(mean, 3.0, epsilon = 0.05);

    // Every observed state lies in the binomial's support.
    assert!(result.iter().all(|(&value, _)| value <= 10));
}
