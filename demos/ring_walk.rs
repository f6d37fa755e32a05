//! Samples a lazy random walk on a small ring and prints the empirical
//! distribution, which converges to uniform over the ring.
//!
//! Run with `cargo run --example ring_walk`.

use anyhow::Result;
use mcmc_engine::anytime::AnytimeRunner;
use mcmc_engine::engine::{McmcEngine, TransitionKernel};
use rand::rngs::SmallRng;
use rand::Rng;

const RING: i64 = 8;

struct LazyRingWalk;

impl TransitionKernel<i64> for LazyRingWalk {
    fn create_initial(&mut self, _rng: &mut SmallRng) -> Result<i64> {
        Ok(0)
    }

    fn update(&mut self, param: &mut i64, rng: &mut SmallRng) -> Result<()> {
        let delta: i64 = match rng.gen_range(0u8..4) {
            0 => -1,
            1 => 1,
            _ => 0,
        };
        *param = (*param + delta).rem_euclid(RING);
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut engine = McmcEngine::new(LazyRingWalk).set_seed(42);
    engine.set_burn_in_iterations(1_000);
    engine.set_iterations_per_sample(2)?;
    engine.set_max_samples(50_000)?;

    let runner = AnytimeRunner::new();
    let performed = runner.run_with_progress(&mut engine)?;
    println!("recorded {} samples", performed);

    let result = engine.result().expect("engine was initialized");
    for state in 0..RING {
        println!(
            "state {}: count {:>6}, fraction {:.4}",
            state,
            result.count(&state),
            result.fraction(&state)
        );
    }
    println!(
        "mode: {:?}, entropy: {:.4} bits",
        result.mode(),
        result.entropy()
    );
    Ok(())
}
