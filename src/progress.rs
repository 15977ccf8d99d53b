//! Progress snapshots emitted while an optimizer runs.
//!
//! Snapshots are sampled, never sent on every step: every
//! [`GENERATION_CADENCE`] generations for GA/DE and every
//! [`ITERATION_CADENCE`] iterations for SA. They are delivered in step
//! order on the thread executing the run.

use std::sync::mpsc::Sender;

use crate::tour::Tour;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GA/DE report when `generation % GENERATION_CADENCE == 0`.
pub const GENERATION_CADENCE: usize = 10;

/// SA reports when `iteration % ITERATION_CADENCE == 0`.
pub const ITERATION_CADENCE: usize = 100;

/// Snapshot of a run in flight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Progress {
    /// 0-based generation (GA/DE) or total iteration count (SA).
    pub step: usize,
    /// Best cost found so far.
    pub best_cost: f64,
    /// Mean population cost (GA/DE).
    pub avg_cost: Option<f64>,
    /// Cost of the current solution (SA).
    pub current_cost: Option<f64>,
    /// Current temperature (SA).
    pub temperature: Option<f64>,
    /// Population diversity (GA).
    pub diversity: Option<f64>,
    /// Best tour found so far.
    pub best_tour: Tour,
}

/// Receives progress snapshots.
///
/// Implemented for closures taking `&Progress` and for
/// `mpsc::Sender<Progress>`, so a run can report to a callback or to a
/// channel read by another thread.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &Progress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&Progress),
{
    fn on_progress(&mut self, progress: &Progress) {
        self(progress)
    }
}

impl ProgressObserver for Sender<Progress> {
    fn on_progress(&mut self, progress: &Progress) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.send(progress.clone());
    }
}

/// Observer that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &Progress) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn snapshot(step: usize) -> Progress {
        Progress {
            step,
            best_cost: 1.0,
            avg_cost: None,
            current_cost: None,
            temperature: None,
            diversity: None,
            best_tour: vec![0, 1],
        }
    }

    #[test]
    fn test_closure_observer() {
        let mut steps = Vec::new();
        {
            let mut observer = |p: &Progress| steps.push(p.step);
            observer.on_progress(&snapshot(0));
            observer.on_progress(&snapshot(10));
        }
        assert_eq!(steps, vec![0, 10]);
    }

    #[test]
    fn test_channel_observer() {
        let (mut tx, rx) = mpsc::channel();
        tx.on_progress(&snapshot(3));
        assert_eq!(rx.recv().unwrap().step, 3);
    }

    #[test]
    fn test_channel_observer_ignores_closed_receiver() {
        let (mut tx, rx) = mpsc::channel::<Progress>();
        drop(rx);
        tx.on_progress(&snapshot(1));
    }
}
