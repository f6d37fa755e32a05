/*!
# Markov Chain Monte Carlo Engine

A generic engine that drives a Markov chain to approximate a target
distribution via repeated application of an update rule, discards an initial
burn-in, and reports the post-burn-in visited states as a weighted empirical
distribution.

The algorithm-specific part — where the chain starts and how it moves — is
supplied through the [`TransitionKernel`] trait. The engine enforces the
statistically load-bearing discipline uniformly for any kernel:

- **Burn-in**: the first `burn_in_iterations` transitions are discarded so
  the chain can approach its stationary distribution before sampling begins.
- **Thinning**: only every `iterations_per_sample`-th state is recorded,
  reducing serial correlation between recorded samples.
- **Deep-copy of samples**: the kernel mutates the current parameter
  destructively, so every recorded sample is an independent copy; entries in
  the accumulator never alias the live walk state.

The engine implements [`AnytimeAlgorithm`], so an [`AnytimeRunner`] (or any
other driver honoring that contract) can run it, cancel it, and poll the
partial result mid-run.

[`AnytimeRunner`]: crate::anytime::AnytimeRunner

# Examples

```rust
use mcmc_engine::engine::{McmcEngine, TransitionKernel};
use rand::rngs::SmallRng;

/// A deterministic kernel: the chain walks 0, 1, 2, ...
struct Counter;

impl TransitionKernel<i64> for Counter {
    fn create_initial(&mut self, _rng: &mut SmallRng) -> anyhow::Result<i64> {
        Ok(0)
    }

    fn update(&mut self, param: &mut i64, _rng: &mut SmallRng) -> anyhow::Result<()> {
        *param += 1;
        Ok(())
    }
}

let mut engine = McmcEngine::new(Counter).set_seed(42);
engine.initialize()?;
for _ in 0..3 {
    engine.step()?;
}

let result = engine.result().unwrap();
assert_eq!(result.total(), 3);
assert_eq!(result.count(&2), 1);
assert_eq!(engine.previous_parameter()?, &3);
# Ok::<(), mcmc_engine::error::McmcError>(())
```
*/

use std::hash::Hash;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::anytime::AnytimeAlgorithm;
use crate::empirical::EmpiricalDistribution;
use crate::error::{McmcError, Result};

/// Default cap on the number of recorded samples per run.
pub const DEFAULT_MAX_SAMPLES: usize = 1_000;

/// The update rule of a concrete MCMC method.
///
/// Implementations supply the two algorithm-specific operations the engine
/// delegates: producing the chain's starting point and performing a single
/// Markov transition (e.g. a Metropolis-Hastings propose/accept step, or one
/// Gibbs coordinate sweep).
pub trait TransitionKernel<P> {
    /// Produces the chain's starting point. Called exactly once per run, at
    /// [`McmcEngine::initialize`].
    fn create_initial(&mut self, rng: &mut SmallRng) -> anyhow::Result<P>;

    /// Performs exactly one Markov transition, mutating `param` in place.
    ///
    /// On error the walk must be left in a valid state: the transition is
    /// either fully applied or not applied at all.
    fn update(&mut self, param: &mut P, rng: &mut SmallRng) -> anyhow::Result<()>;
}

/**
A generic MCMC sampling engine.

The engine owns the walk state (the current and most recently recorded
parameter values), the injected random generator, and the growing result
distribution. The parameter type `P` needs value semantics: `Clone` is the
deep-copy capability, `Eq + Hash` keys the accumulator by value equality.

Exact-value keying means continuous-valued parameter types degenerate to one
count per distinct visited point; the engine is intended for discrete or
low-cardinality parameter spaces.

A seeded generator must be injected (via [`set_seed`](Self::set_seed) or
[`set_rng`](Self::set_rng)) before [`initialize`](Self::initialize); two
engines with the same seed and a deterministic kernel produce identical
trajectories and identical results.

# Type Parameters

- `P`: the sampled parameter type.
- `K`: the transition kernel supplying the update rule.
*/
#[derive(Debug, Clone)]
pub struct McmcEngine<P, K> {
    kernel: K,
    rng: Option<SmallRng>,
    burn_in_iterations: usize,
    iterations_per_sample: usize,
    max_samples: usize,
    current: Option<P>,
    previous: Option<P>,
    result: Option<EmpiricalDistribution<P>>,
}

impl<P, K> McmcEngine<P, K>
where
    P: Clone + Eq + Hash,
    K: TransitionKernel<P>,
{
    /// Creates an engine with no burn-in, no thinning
    /// (`iterations_per_sample == 1`), the default sample cap, and no random
    /// generator.
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            rng: None,
            burn_in_iterations: 0,
            iterations_per_sample: 1,
            max_samples: DEFAULT_MAX_SAMPLES,
            current: None,
            previous: None,
            result: None,
        }
    }

    /// Seeds the engine's random generator.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = Some(SmallRng::seed_from_u64(seed));
        self
    }

    /// Injects an already-constructed random generator.
    pub fn set_rng(&mut self, rng: SmallRng) {
        self.rng = Some(rng);
    }

    pub fn burn_in_iterations(&self) -> usize {
        self.burn_in_iterations
    }

    /// Number of transitions discarded at `initialize` before sampling
    /// begins.
    pub fn set_burn_in_iterations(&mut self, burn_in_iterations: usize) {
        self.burn_in_iterations = burn_in_iterations;
    }

    pub fn iterations_per_sample(&self) -> usize {
        self.iterations_per_sample
    }

    /// Number of transitions performed per recorded sample (thinning
    /// factor). Rejects zero, leaving the prior configuration unchanged.
    pub fn set_iterations_per_sample(&mut self, iterations_per_sample: usize) -> Result<()> {
        if iterations_per_sample < 1 {
            return Err(McmcError::InvalidIterationsPerSample(iterations_per_sample));
        }
        self.iterations_per_sample = iterations_per_sample;
        Ok(())
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Cap on the number of samples a driver records in one run; also the
    /// capacity hint for the result distribution. Rejects zero, leaving the
    /// prior configuration unchanged.
    pub fn set_max_samples(&mut self, max_samples: usize) -> Result<()> {
        if max_samples < 1 {
            return Err(McmcError::InvalidMaxSamples(max_samples));
        }
        self.max_samples = max_samples;
        Ok(())
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Seeds the walk and burns in.
    ///
    /// Asks the kernel for the initial parameter (a fresh copy becomes both
    /// the current and the previous slot), performs exactly
    /// `burn_in_iterations` discarded transitions, then allocates the empty
    /// result distribution sized by `max_samples`. Calling this again starts
    /// a fresh run.
    ///
    /// Fails with [`McmcError::MissingRandomGenerator`] if no generator was
    /// injected; kernel failures propagate as [`McmcError::Kernel`].
    pub fn initialize(&mut self) -> Result<()> {
        let rng = self.rng.as_mut().ok_or(McmcError::MissingRandomGenerator)?;
        let initial = self
            .kernel
            .create_initial(rng)
            .map_err(|err| McmcError::Kernel(err.into()))?;
        self.previous = Some(initial.clone());
        self.current = Some(initial);
        self.result = None;

        self.advance(self.burn_in_iterations)?;

        self.result = Some(EmpiricalDistribution::with_capacity(self.max_samples));
        Ok(())
    }

    /// Advances the walk by `iterations_per_sample` transitions, then
    /// records one sample: an independent copy of the resulting parameter
    /// value becomes the previous slot and its count is incremented in the
    /// result distribution.
    ///
    /// Whether to keep stepping is the driving loop's decision, not this
    /// operation's.
    pub fn step(&mut self) -> Result<()> {
        self.advance(self.iterations_per_sample)?;

        let current = self.current.as_ref().ok_or(McmcError::NotInitialized)?;
        let sample = current.clone();
        let result = self.result.as_mut().ok_or(McmcError::NotInitialized)?;
        result.increment(sample.clone());
        self.previous = Some(sample);
        Ok(())
    }

    /// No per-run resources to release; present for lifecycle symmetry with
    /// [`initialize`](Self::initialize).
    pub fn cleanup(&mut self) {}

    /// The empirical distribution accumulated so far, `None` before
    /// `initialize`.
    ///
    /// Valid at any point after `initialize`, including mid-run and after a
    /// cancelled run. The handle is live — it keeps growing until the run
    /// ends — so callers needing a frozen snapshot should clone it.
    pub fn result(&self) -> Option<&EmpiricalDistribution<P>> {
        self.result.as_ref()
    }

    /// The most recently recorded sample.
    ///
    /// Fails with [`McmcError::NoSampleRecorded`] until at least one
    /// completed [`step`](Self::step).
    pub fn previous_parameter(&self) -> Result<&P> {
        let recorded = self.result.as_ref().map_or(0, |result| result.total());
        if recorded == 0 {
            return Err(McmcError::NoSampleRecorded);
        }
        self.previous.as_ref().ok_or(McmcError::NoSampleRecorded)
    }

    /// The live walk position, `None` before `initialize`.
    pub fn current_parameter(&self) -> Option<&P> {
        self.current.as_ref()
    }

    /// Advances the walk by `n` kernel transitions without recording a
    /// sample.
    fn advance(&mut self, n: usize) -> Result<()> {
        let current = self.current.as_mut().ok_or(McmcError::NotInitialized)?;
        let rng = self.rng.as_mut().ok_or(McmcError::MissingRandomGenerator)?;
        for _ in 0..n {
            self.kernel
                .update(current, rng)
                .map_err(|err| McmcError::Kernel(err.into()))?;
        }
        Ok(())
    }
}

impl<P, K> AnytimeAlgorithm for McmcEngine<P, K>
where
    P: Clone + Eq + Hash,
    K: TransitionKernel<P>,
{
    type Output = EmpiricalDistribution<P>;

    fn initialize(&mut self) -> anyhow::Result<()> {
        McmcEngine::initialize(self)?;
        Ok(())
    }

    fn step(&mut self) -> anyhow::Result<bool> {
        McmcEngine::step(self)?;
        Ok(true)
    }

    fn cleanup(&mut self) {
        McmcEngine::cleanup(self);
    }

    fn max_iterations(&self) -> usize {
        self.max_samples
    }

    fn result(&self) -> Option<&EmpiricalDistribution<P>> {
        self.result.as_ref()
    }
}
