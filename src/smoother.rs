// EpiWatch — Confidence Smoother
//
// Fixed-length ring of the most recent "seizure" confidences.  The average is
// reported as 0.0 until the ring has wrapped once, so the first
// CONFIDENCE_HISTORY_LEN - 1 windows after boot can never raise an alert.
// Whether that start-up suppression is wanted or hides early true positives
// is still open; it is kept as-is and asserted by the tests below.

use crate::config::CONFIDENCE_HISTORY_LEN;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceHistory {
    values: [f32; CONFIDENCE_HISTORY_LEN],
    index: usize,
    full: bool,
}

impl ConfidenceHistory {
    pub fn new() -> Self {
        Self {
            values: [0.0; CONFIDENCE_HISTORY_LEN],
            index: 0,
            full: false,
        }
    }

    /// Store one confidence and advance the write index.
    pub fn record(&mut self, confidence: f32) {
        self.values[self.index] = confidence;
        self.index = (self.index + 1) % CONFIDENCE_HISTORY_LEN;

        if self.index == 0 {
            self.full = true;
        }
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Uniform mean of every slot once the ring is full, 0.0 before that.
    pub fn average(&self) -> f32 {
        if !self.full {
            return 0.0;
        }

        let sum: f32 = self.values.iter().sum();
        sum / CONFIDENCE_HISTORY_LEN as f32
    }

    /// Count shown next to the average in the diagnostic log.
    pub fn samples_used(&self) -> usize {
        if self.full {
            CONFIDENCE_HISTORY_LEN
        } else {
            self.index
        }
    }
}

impl Default for ConfidenceHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_until_first_wrap() {
        let mut history = ConfidenceHistory::new();
        assert_eq!(history.average(), 0.0);

        for i in 0..CONFIDENCE_HISTORY_LEN - 1 {
            history.record(0.95);
            assert_eq!(history.average(), 0.0, "non-zero after {} records", i + 1);
            assert!(!history.is_full());
            assert_eq!(history.samples_used(), i + 1);
        }

        history.record(0.95);
        assert!(history.is_full());
        assert_eq!(history.samples_used(), CONFIDENCE_HISTORY_LEN);
        assert!((history.average() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_mean_of_most_recent_values() {
        let mut history = ConfidenceHistory::new();
        for v in [0.1, 0.2, 0.3, 0.4, 0.5] {
            history.record(v);
        }
        assert!((history.average() - 0.3).abs() < 1e-6);

        // Overwrites the oldest slot (0.1).
        history.record(0.6);
        assert!((history.average() - 0.4).abs() < 1e-6);

        for v in [0.9, 0.9, 0.9, 0.9] {
            history.record(v);
        }
        let expected = (0.6 + 0.9 * 4.0) / 5.0;
        assert!((history.average() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_stays_full_after_wrap() {
        let mut history = ConfidenceHistory::new();
        for _ in 0..CONFIDENCE_HISTORY_LEN * 3 + 2 {
            history.record(0.0);
            if history.is_full() {
                assert_eq!(history.samples_used(), CONFIDENCE_HISTORY_LEN);
            }
        }
        assert!(history.is_full());
    }
}
