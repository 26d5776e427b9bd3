//! Per-epoch metric history

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Training loss series
pub const LOSS: &str = "loss";
/// Training accuracy series
pub const ACCURACY: &str = "accuracy";
/// Validation loss series
pub const VAL_LOSS: &str = "val_loss";
/// Validation accuracy series
pub const VAL_ACCURACY: &str = "val_accuracy";
/// Learning rate in effect each epoch
pub const LEARNING_RATE: &str = "lr";

/// Mapping of metric name to its ordered per-epoch values.
///
/// Consumed downstream to plot training curves; one entry per epoch in each
/// series, recorded in epoch order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    series: BTreeMap<String, Vec<f32>>,
}

impl History {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the named series
    pub fn record(&mut self, name: &str, value: f32) {
        self.series.entry(name.to_string()).or_default().push(value);
    }

    /// Values of the named series, in epoch order
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Last recorded value of the named series
    pub fn final_value(&self, name: &str) -> Option<f32> {
        self.get(name)?.last().copied()
    }

    /// Number of recorded epochs (length of the training loss series)
    pub fn epochs(&self) -> usize {
        self.get(LOSS).map_or(0, <[f32]>::len)
    }

    /// Names of all recorded series
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_records_in_order() {
        let mut history = History::new();
        history.record(LOSS, 0.9);
        history.record(LOSS, 0.5);
        history.record(ACCURACY, 0.6);

        assert_eq!(history.get(LOSS), Some(&[0.9, 0.5][..]));
        assert_eq!(history.epochs(), 2);
        assert_eq!(history.final_value(LOSS), Some(0.5));
        assert_eq!(history.final_value(ACCURACY), Some(0.6));
        assert!(history.get(VAL_LOSS).is_none());
    }

    #[test]
    fn test_history_serializes() {
        let mut history = History::new();
        history.record(LOSS, 1.0);
        history.record(LEARNING_RATE, 0.1);

        let json = serde_json::to_string(&history).unwrap();
        let back: History = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(LOSS), Some(&[1.0][..]));
        assert_eq!(back.get(LEARNING_RATE), Some(&[0.1][..]));
    }
}
