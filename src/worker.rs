//! Isolated background runs.
//!
//! [`spawn_run`] moves a configuration and a shared read-only matrix onto a
//! dedicated thread. Nothing mutable crosses the boundary: the run reports
//! back only through [`RunEvent`] messages on a channel, progress first and
//! then exactly one terminal event.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::matrix::DistanceMatrix;
use crate::progress::{NoProgress, Progress, ProgressObserver};
use crate::solver::{AlgorithmConfig, RunOutcome};

/// Message emitted by a background run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Sampled progress, in step order.
    Progress(Progress),
    /// The run finished.
    Complete(Box<RunOutcome>),
    /// The run was rejected before it started.
    Failed(String),
}

impl RunEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunEvent::Progress(_))
    }
}

/// Handle to a run executing on its own thread.
pub struct RunHandle {
    events: Receiver<RunEvent>,
    thread: JoinHandle<()>,
}

impl RunHandle {
    /// Event stream of the run. Closes after the terminal event.
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    /// Blocks until the run ends, discarding progress.
    pub fn wait(self) -> Result<RunOutcome, String> {
        self.wait_with(&mut NoProgress)
    }

    /// Blocks until the run ends, forwarding progress to `observer`.
    pub fn wait_with<O: ProgressObserver + ?Sized>(
        self,
        observer: &mut O,
    ) -> Result<RunOutcome, String> {
        let mut outcome = Err("run ended without a result".to_string());
        for event in self.events.iter() {
            match event {
                RunEvent::Progress(p) => observer.on_progress(&p),
                RunEvent::Complete(o) => {
                    outcome = Ok(*o);
                    break;
                }
                RunEvent::Failed(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        if self.thread.join().is_err() {
            return Err("run thread panicked".to_string());
        }
        outcome
    }

    /// Waits for the thread without reading the events.
    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

/// Starts `config` on a new thread against `matrix`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tsp_metaheur::{AlgorithmConfig, DistanceMatrix};
/// use tsp_metaheur::ga::GaConfig;
/// use tsp_metaheur::worker::spawn_run;
///
/// let m = Arc::new(DistanceMatrix::euclidean(&[(0.0, 0.0), (2.0, 0.0), (1.0, 2.0)]));
/// let config = AlgorithmConfig::Ga(GaConfig::default().with_population_size(10).with_generations(5));
/// let outcome = spawn_run(Arc::clone(&m), config).wait().unwrap();
/// assert_eq!(outcome.solution.best_tour.len(), 3);
/// ```
pub fn spawn_run(matrix: Arc<DistanceMatrix>, config: AlgorithmConfig) -> RunHandle {
    let (tx, events) = mpsc::channel();
    let thread = thread::spawn(move || {
        let algorithm = config.algorithm();
        let mut forward = |p: &Progress| {
            // A dropped handle only means nobody is listening anymore.
            let _ = tx.send(RunEvent::Progress(p.clone()));
        };
        let event = match config.run_detailed(&matrix, &mut forward) {
            Ok(outcome) => RunEvent::Complete(Box::new(outcome)),
            Err(e) => {
                log::warn!("{algorithm} run rejected: {e}");
                RunEvent::Failed(e)
            }
        };
        let _ = tx.send(event);
    });
    RunHandle { events, thread }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::DeConfig;
    use crate::ga::GaConfig;
    use crate::sa::SaConfig;
    use crate::solver::RunDetail;

    fn hexagon() -> Arc<DistanceMatrix> {
        let points: Vec<(f64, f64)> = (0..6)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / 6.0;
                (a.cos(), a.sin())
            })
            .collect();
        Arc::new(DistanceMatrix::euclidean(&points))
    }

    #[test]
    fn test_event_stream_order() {
        let config = AlgorithmConfig::Ga(
            GaConfig::default()
                .with_population_size(10)
                .with_generations(25)
                .with_seed(4),
        );
        let handle = spawn_run(hexagon(), config);

        let events: Vec<RunEvent> = handle.events().iter().collect();
        handle.join().unwrap();

        let (last, progress) = events.split_last().unwrap();
        assert!(matches!(last, RunEvent::Complete(_)));
        let steps: Vec<usize> = progress
            .iter()
            .map(|e| match e {
                RunEvent::Progress(p) => p.step,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(steps, vec![0, 10, 20]);
    }

    #[test]
    fn test_parallel_runs_are_independent() {
        let m = hexagon();
        let configs = [
            AlgorithmConfig::Ga(GaConfig::default().with_generations(20).with_seed(1)),
            AlgorithmConfig::Sa(SaConfig::default().with_max_iterations(3_000).with_seed(1)),
            AlgorithmConfig::De(DeConfig::default().with_generations(20).with_seed(1)),
        ];

        let handles: Vec<RunHandle> = configs
            .iter()
            .cloned()
            .map(|c| spawn_run(Arc::clone(&m), c))
            .collect();
        let outcomes: Vec<RunOutcome> = handles.into_iter().map(|h| h.wait().unwrap()).collect();

        assert!(matches!(outcomes[0].detail, RunDetail::Ga(_)));
        assert!(matches!(outcomes[1].detail, RunDetail::Sa(_)));
        assert!(matches!(outcomes[2].detail, RunDetail::De(_)));

        // Same seed on the calling thread gives the same answer.
        for (config, outcome) in configs.iter().zip(&outcomes) {
            let local = config.run_detailed(&m, &mut NoProgress).unwrap();
            assert_eq!(local.detail, outcome.detail);
        }
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = AlgorithmConfig::Sa(SaConfig::default().with_iterations_per_temp(0));
        let handle = spawn_run(hexagon(), config);
        let err = handle.wait().unwrap_err();
        assert!(err.contains("iterations_per_temp"));
    }

    #[test]
    fn test_wait_with_forwards_progress() {
        let config = AlgorithmConfig::De(
            DeConfig::default()
                .with_population_size(8)
                .with_generations(11)
                .with_seed(2),
        );
        let mut seen = Vec::new();
        let mut observer = |p: &Progress| seen.push(p.step);
        let outcome = spawn_run(hexagon(), config).wait_with(&mut observer).unwrap();
        assert_eq!(seen, vec![0, 10]);
        assert_eq!(outcome.solution.steps, 11);
    }
}
