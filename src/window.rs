// EpiWatch — Feature Window Buffer
//
// Accumulates RAW_SAMPLE_COUNT six-axis samples into one contiguous feature
// vector for the classifier.  Single-buffered: a full window must be consumed
// and reset before the next one starts filling, so samples are not captured
// while inference runs.

use crate::config::*;
use crate::events::Sample;

pub struct FeatureWindow {
    features: [f32; FRAME_SIZE],
    feature_ix: usize,
}

impl FeatureWindow {
    pub fn new() -> Self {
        Self {
            features: [0.0; FRAME_SIZE],
            feature_ix: 0,
        }
    }

    /// Write the sample's six values at the current index.
    ///
    /// Returns `false` and leaves the buffer untouched when the window is
    /// already full.
    pub fn append(&mut self, sample: &Sample) -> bool {
        if self.feature_ix + AXES_PER_SAMPLE > FRAME_SIZE {
            return false;
        }

        self.features[self.feature_ix..self.feature_ix + AXES_PER_SAMPLE]
            .copy_from_slice(&sample.to_array());
        self.feature_ix += AXES_PER_SAMPLE;
        true
    }

    pub fn is_full(&self) -> bool {
        self.feature_ix >= FRAME_SIZE
    }

    /// Number of values written since the last reset.
    pub fn len(&self) -> usize {
        self.feature_ix
    }

    pub fn is_empty(&self) -> bool {
        self.feature_ix == 0
    }

    /// Read-only view of a complete window, `None` while still filling.
    /// Callers must `reset()` once they are done with it.
    pub fn consume(&self) -> Option<&[f32; FRAME_SIZE]> {
        if self.is_full() {
            Some(&self.features)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.feature_ix = 0;
    }
}

impl Default for FeatureWindow {
    fn default() -> Self {
        Self::new()
    }
}
