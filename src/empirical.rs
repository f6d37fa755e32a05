/*!
# Weighted Empirical Distribution

The output type of a sampling run: a mapping from distinct parameter values
to observation counts. Values are keyed by equality, so repeated visits to an
equal parameter value accumulate into a single entry, and each distinct
value's empirical probability is `count / total`.

The distribution is an order-insensitive multiset; the order in which the
chain visited its states is not recoverable from it.

# Examples

```rust
use mcmc_engine::empirical::EmpiricalDistribution;

let mut dist = EmpiricalDistribution::new();
dist.increment(3);
dist.increment(3);
dist.increment(7);

assert_eq!(dist.total(), 3);
assert_eq!(dist.count(&3), 2);
assert!((dist.fraction(&7) - 1.0 / 3.0).abs() < 1e-12);
```
*/

use num_traits::ToPrimitive;
use std::collections::HashMap;
use std::hash::Hash;

/// A weighted empirical distribution over parameter values.
///
/// Grows monotonically while a run is in progress. Callers that need a frozen
/// snapshot of a live distribution should clone it.
#[derive(Debug, Clone)]
pub struct EmpiricalDistribution<P> {
    counts: HashMap<P, u64>,
    total: u64,
}

impl<P> EmpiricalDistribution<P> {
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
        }
    }

    /// Creates an empty distribution with an initial capacity hint.
    ///
    /// The hint sizes the underlying table for the expected number of
    /// distinct values; it is not a cap.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity),
            total: 0,
        }
    }

    /// Total observation weight across all values.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct values observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(value, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, u64)> {
        self.counts.iter().map(|(value, &count)| (value, count))
    }
}

impl<P: Eq + Hash> EmpiricalDistribution<P> {
    /// Increments `value`'s count by one.
    pub fn increment(&mut self, value: P) {
        self.increment_by(value, 1);
    }

    /// Increments `value`'s count by `weight`. A weight of zero is a no-op
    /// and does not create an entry.
    pub fn increment_by(&mut self, value: P, weight: u64) {
        if weight == 0 {
            return;
        }
        *self.counts.entry(value).or_insert(0) += weight;
        self.total += weight;
    }

    /// The count recorded for `value`, zero if it was never observed.
    pub fn count(&self, value: &P) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// The empirical probability of `value`, `count / total`.
    ///
    /// Returns 0.0 on an empty distribution.
    pub fn fraction(&self, value: &P) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(value) as f64 / self.total as f64
    }

    /// A value with maximal count. Ties are broken arbitrarily.
    pub fn mode(&self) -> Option<&P> {
        self.counts
            .iter()
            .max_by_key(|&(_, &count)| count)
            .map(|(value, _)| value)
    }

    /// Shannon entropy of the empirical distribution, in bits.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.counts.values().fold(0.0, |acc, &count| {
            let p = count as f64 / total;
            acc - p * p.log2()
        })
    }
}

impl<P: Eq + Hash + ToPrimitive> EmpiricalDistribution<P> {
    /// Count-weighted mean for numeric parameter types.
    ///
    /// Returns `None` on an empty distribution or if a value is not
    /// representable as `f64`.
    pub fn mean(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let mut acc = 0.0;
        for (value, &count) in &self.counts {
            acc += value.to_f64()? * count as f64;
        }
        Some(acc / self.total as f64)
    }
}

impl<P> Default for EmpiricalDistribution<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Eq + Hash> PartialEq for EmpiricalDistribution<P> {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total && self.counts == other.counts
    }
}

impl<P: Eq + Hash> Eq for EmpiricalDistribution<P> {}
