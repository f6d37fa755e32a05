//! Control-loop contract for anytime iterative algorithms.
//!
//! An anytime algorithm produces a usable partial result at every point of
//! its run: the driver calls `initialize` once, `step` repeatedly up to a
//! configured cap or until cancelled, then `cleanup` once. The result can be
//! polled mid-run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// An iterative algorithm drivable by [`AnytimeRunner`].
pub trait AnytimeAlgorithm {
    type Output;

    /// Prepares the algorithm for a fresh run.
    fn initialize(&mut self) -> Result<()>;

    /// Performs one iteration. Returns `false` if the algorithm has nothing
    /// left to do and the loop should stop early.
    fn step(&mut self) -> Result<bool>;

    /// Releases per-run resources after the loop has finished.
    fn cleanup(&mut self);

    /// Upper bound on the number of `step` calls a driver should make.
    fn max_iterations(&self) -> usize;

    /// The result accumulated so far, `None` before `initialize`.
    fn result(&self) -> Option<&Self::Output>;
}

/// Drives an [`AnytimeAlgorithm`] through its lifecycle on one logical
/// thread of control.
///
/// The loop stops after `max_iterations` steps, when `step` reports it is
/// done, or when the shared stop flag is set (e.g. from a deadline watcher
/// on another thread). Errors from `initialize` or `step` propagate to the
/// caller unmodified.
pub struct AnytimeRunner {
    stop: Arc<AtomicBool>,
}

impl AnytimeRunner {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for requesting cancellation of the running loop. The current
    /// step completes; the algorithm's partial result remains valid.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the algorithm to completion or cancellation, returning the
    /// number of iterations performed.
    pub fn run<A: AnytimeAlgorithm>(&self, algorithm: &mut A) -> Result<usize> {
        self.run_inner(algorithm, None)
    }

    /// Like [`run`](Self::run), with a progress bar.
    pub fn run_with_progress<A: AnytimeAlgorithm>(&self, algorithm: &mut A) -> Result<usize> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        self.run_inner(algorithm, Some(pb))
    }

    fn run_inner<A: AnytimeAlgorithm>(
        &self,
        algorithm: &mut A,
        pb: Option<ProgressBar>,
    ) -> Result<usize> {
        self.stop.store(false, Ordering::Relaxed);
        algorithm.initialize()?;

        let max_iterations = algorithm.max_iterations();
        if let Some(pb) = &pb {
            pb.set_length(max_iterations as u64);
        }

        let mut performed = 0;
        while performed < max_iterations && !self.stop.load(Ordering::Relaxed) {
            let keep_going = algorithm.step()?;
            performed += 1;
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            if !keep_going {
                break;
            }
        }

        algorithm.cleanup();
        if let Some(pb) = &pb {
            pb.finish_with_message("Done!");
        }
        Ok(performed)
    }
}

impl Default for AnytimeRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records lifecycle calls; optionally requests a stop through the
    /// runner's handle or reports itself done after a fixed step count.
    struct Recorder {
        max: usize,
        initialized: bool,
        cleaned: bool,
        steps: usize,
        history: Vec<usize>,
        stop_after: Option<(usize, Arc<AtomicBool>)>,
        done_after: Option<usize>,
    }

    impl Recorder {
        fn new(max: usize) -> Self {
            Self {
                max,
                initialized: false,
                cleaned: false,
                steps: 0,
                history: Vec::new(),
                stop_after: None,
                done_after: None,
            }
        }
    }

    impl AnytimeAlgorithm for Recorder {
        type Output = Vec<usize>;

        fn initialize(&mut self) -> Result<()> {
            self.initialized = true;
            Ok(())
        }

        fn step(&mut self) -> Result<bool> {
            self.steps += 1;
            self.history.push(self.steps);
            if let Some((n, flag)) = &self.stop_after {
                if self.steps == *n {
                    flag.store(true, Ordering::Relaxed);
                }
            }
            Ok(self.done_after.map_or(true, |n| self.steps < n))
        }

        fn cleanup(&mut self) {
            self.cleaned = true;
        }

        fn max_iterations(&self) -> usize {
            self.max
        }

        fn result(&self) -> Option<&Vec<usize>> {
            self.initialized.then_some(&self.history)
        }
    }

    #[test]
    fn run_performs_exactly_max_iterations() {
        let runner = AnytimeRunner::new();
        let mut algorithm = Recorder::new(10);
        let performed = runner.run(&mut algorithm).unwrap();

        assert_eq!(performed, 10);
        assert_eq!(algorithm.steps, 10);
        assert!(algorithm.initialized);
        assert!(algorithm.cleaned);
    }

    #[test]
    fn step_reporting_done_stops_the_loop_early() {
        let runner = AnytimeRunner::new();
        let mut algorithm = Recorder::new(100);
        algorithm.done_after = Some(3);
        let performed = runner.run(&mut algorithm).unwrap();

        assert_eq!(performed, 3);
        assert!(algorithm.cleaned);
    }

    #[test]
    fn stop_handle_cancels_the_loop() {
        let runner = AnytimeRunner::new();
        let mut algorithm = Recorder::new(100);
        algorithm.stop_after = Some((4, runner.stop_handle()));
        let performed = runner.run(&mut algorithm).unwrap();

        assert_eq!(performed, 4);
        assert!(algorithm.cleaned);
    }

    #[test]
    fn partial_result_survives_cancellation() {
        let runner = AnytimeRunner::new();
        let mut algorithm = Recorder::new(100);
        algorithm.stop_after = Some((2, runner.stop_handle()));
        runner.run(&mut algorithm).unwrap();

        assert_eq!(algorithm.result(), Some(&vec![1, 2]));
    }

    #[test]
    fn runner_is_reusable_after_a_cancelled_run() {
        let runner = AnytimeRunner::new();
        let mut first = Recorder::new(100);
        first.stop_after = Some((1, runner.stop_handle()));
        runner.run(&mut first).unwrap();

        let mut second = Recorder::new(5);
        let performed = runner.run(&mut second).unwrap();
        assert_eq!(performed, 5);
    }
}
