//! Training run results

use std::fmt;

use crate::model::Model;
use crate::optim::LrFinderResult;
use crate::schedule::ScheduleSpec;
use crate::train::History;

/// Everything a completed fit produces
pub struct TrainedRun {
    /// The fitted model
    pub model: Box<dyn Model>,
    /// Per-epoch metric history
    pub history: History,
    /// The schedule actually constructed, `None` for the "none" kind.
    /// Callers use it to redraw the rate curve; one-cycle's realized rates
    /// are only known here, after the fact.
    pub schedule: Option<ScheduleSpec>,
}

// Manual impl: the fitted model is an opaque trait object.
impl fmt::Debug for TrainedRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedRun")
            .field("history", &self.history)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

/// Result of one trainer run.
///
/// Exactly one variant per run, chosen solely by the find-lr flag: the
/// diagnostic sweep result, or the trained model with its history and
/// schedule. The sum type keeps the two modes apart at compile time.
pub enum TrainOutcome {
    /// Diagnostic sweep observations (find-lr mode)
    Finder(LrFinderResult),
    /// Fitted model, history, and schedule (training mode)
    Trained(TrainedRun),
}

impl fmt::Debug for TrainOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finder(result) => f.debug_tuple("Finder").field(result).finish(),
            Self::Trained(run) => f.debug_tuple("Trained").field(run).finish(),
        }
    }
}

impl TrainOutcome {
    /// Whether this is a finder result
    pub fn is_finder(&self) -> bool {
        matches!(self, Self::Finder(_))
    }

    /// Whether this is a trained run
    pub fn is_trained(&self) -> bool {
        matches!(self, Self::Trained(_))
    }

    /// Unwrap the finder result, if that mode ran
    pub fn into_finder(self) -> Option<LrFinderResult> {
        match self {
            Self::Finder(result) => Some(result),
            Self::Trained(_) => None,
        }
    }

    /// Unwrap the trained run, if that mode ran
    pub fn into_trained(self) -> Option<TrainedRun> {
        match self {
            Self::Trained(run) => Some(run),
            Self::Finder(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_variant_accessors() {
        let outcome = TrainOutcome::Finder(LrFinderResult { rates: vec![], losses: vec![] });
        assert!(outcome.is_finder());
        assert!(!outcome.is_trained());
        assert!(outcome.into_finder().is_some());

        let outcome = TrainOutcome::Finder(LrFinderResult { rates: vec![], losses: vec![] });
        assert!(outcome.into_trained().is_none());
    }

    #[test]
    fn test_outcome_debug_names_the_variant() {
        // callers unwrap Result<TrainOutcome, _> in both directions, which
        // needs a working Debug rendering of either variant
        let outcome = TrainOutcome::Finder(LrFinderResult { rates: vec![0.1], losses: vec![0.5] });
        let rendered = format!("{outcome:?}");
        assert!(rendered.starts_with("Finder"), "got {rendered}");
    }

    #[test]
    fn test_trained_run_debug_elides_the_model() {
        use crate::model::{LinearSoftmaxBuilder, ModelBuilder};
        use crate::train::History;

        let run = TrainedRun {
            model: LinearSoftmaxBuilder.build(2, 2).unwrap(),
            history: History::new(),
            schedule: None,
        };
        let rendered = format!("{:?}", TrainOutcome::Trained(run));
        assert!(rendered.contains("Trained"), "got {rendered}");
        assert!(rendered.contains("history"), "got {rendered}");
    }
}
