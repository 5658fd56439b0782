// EpiWatch — Edge Impulse Inference Interface
//
// Architecture:
//   1. STUB mode (default) — a motion-energy heuristic stands in for the model
//      so the firmware can be developed and tested without the C++ Edge
//      Impulse SDK compiled in.
//   2. FFI mode — enable the `edge-impulse` feature; build.rs compiles the SDK
//      and `csrc/ei_shim.cpp`, which exposes `run_classifier` through a plain
//      C signature.
//
// The scheduler calls `Classifier::classify` with a full 600-float window
// (100 samples × 6 axes) and gets back each label the model reports with its
// score, plus DSP / NN timing.  The seizure score is looked up by label name,
// so the model's label order does not matter.

use std::fmt;

use crate::config::*;

// ---------------------------------------------------------------------------
// Public interface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timing {
    pub dsp_ms: i32,
    pub classification_ms: i32,
}

/// One label and its score, in the order the model reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub value: f32,
}

/// Scores for every label of one window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationResult {
    pub predictions: Vec<Prediction>,
    pub timing: Timing,
}

impl ClassificationResult {
    pub fn new(predictions: Vec<Prediction>, timing: Timing) -> Self {
        Self {
            predictions,
            timing,
        }
    }

    pub fn from_pairs(pairs: &[(&str, f32)], timing: Timing) -> Self {
        let predictions = pairs
            .iter()
            .map(|(label, value)| Prediction {
                label: (*label).to_string(),
                value: *value,
            })
            .collect();
        Self::new(predictions, timing)
    }

    /// Score of the first prediction carrying `label`.
    pub fn confidence_of(&self, label: &str) -> Option<f32> {
        self.predictions
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.value)
    }

    /// Confidence of the "seizure" label, 0.0 if the model has no such label.
    pub fn seizure_confidence(&self) -> f32 {
        self.confidence_of(SEIZURE_LABEL).unwrap_or(0.0)
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Predictions (DSP: {} ms, NN: {} ms):",
            self.timing.dsp_ms, self.timing.classification_ms
        )?;
        for p in &self.predictions {
            write!(f, "  {}: {:.5}", p.label, p.value)?;
        }
        Ok(())
    }
}

/// Non-OK status returned by the classifier back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("classifier returned {code} ({reason})")]
pub struct InferenceError {
    pub code: i32,
    pub reason: &'static str,
}

impl InferenceError {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            reason: describe_code(code),
        }
    }
}

fn describe_code(code: i32) -> &'static str {
    match code {
        -1 => "shapes don't match",
        -2 => "canceled",
        -3 => "TFLite error",
        -5 => "DSP error",
        -6 => "TFLite arena allocation failed",
        -8 => "allocation failed",
        _ => "unknown",
    }
}

/// Maps one complete feature window to per-label confidences.
pub trait Classifier {
    fn classify(
        &mut self,
        features: &[f32; FRAME_SIZE],
    ) -> Result<ClassificationResult, InferenceError>;
}

/// The on-device model (or its stub, without the `edge-impulse` feature).
#[derive(Debug, Default)]
pub struct EdgeImpulse {
    debug_nn: bool,
}

impl EdgeImpulse {
    pub fn new() -> Self {
        Self { debug_nn: DEBUG_NN }
    }
}

impl Classifier for EdgeImpulse {
    fn classify(
        &mut self,
        features: &[f32; FRAME_SIZE],
    ) -> Result<ClassificationResult, InferenceError> {
        run_inference(features, self.debug_nn)
    }
}

// ---------------------------------------------------------------------------
// Stub back-end — development / testing without the C++ SDK
// ---------------------------------------------------------------------------

/// Scores by mean absolute angular rate: tonic-clonic shaking shows up as
/// sustained high rotation on all three gyro axes.
#[cfg(not(feature = "edge-impulse"))]
fn run_inference(
    features: &[f32; FRAME_SIZE],
    _debug_nn: bool,
) -> Result<ClassificationResult, InferenceError> {
    let gyro_sum: f32 = features
        .chunks_exact(AXES_PER_SAMPLE)
        .flat_map(|s| s[3..6].iter())
        .map(|v| v.abs())
        .sum();
    let mean_abs_gyro = gyro_sum / (RAW_SAMPLE_COUNT * 3) as f32;

    let (normal, seizure) = if mean_abs_gyro < 0.5 {
        (0.95, 0.05)
    } else if mean_abs_gyro < 1.5 {
        (0.60, 0.40)
    } else if mean_abs_gyro < 3.0 {
        (0.25, 0.75)
    } else {
        (0.05, 0.95)
    };

    log::debug!(
        "STUB inference — mean |g| = {:.2} rad/s, seizure = {:.2}",
        mean_abs_gyro,
        seizure
    );
    Ok(ClassificationResult::from_pairs(
        &[("normal", normal), (SEIZURE_LABEL, seizure)],
        Timing::default(),
    ))
}

// ---------------------------------------------------------------------------
// Real FFI back-end — calls the C++ Edge Impulse compiled library
// ---------------------------------------------------------------------------
#[cfg(feature = "edge-impulse")]
mod ffi {
    use std::ffi::c_char;

    extern "C" {
        /// See csrc/ei_shim.cpp.  Fills up to `capacity` scores and label
        /// pointers, writes the model's label count to `count` and returns an
        /// `EI_IMPULSE_ERROR` code.
        pub fn epiwatch_classify(
            features: *const f32,
            len: usize,
            scores: *mut f32,
            labels: *mut *const c_char,
            capacity: usize,
            count: *mut usize,
            dsp_ms: *mut i32,
            nn_ms: *mut i32,
            debug: bool,
        ) -> i32;
    }
}

#[cfg(feature = "edge-impulse")]
fn run_inference(
    features: &[f32; FRAME_SIZE],
    debug_nn: bool,
) -> Result<ClassificationResult, InferenceError> {
    use std::ffi::{c_char, CStr};

    let mut scores = [0.0f32; MAX_LABELS];
    let mut labels: [*const c_char; MAX_LABELS] = [std::ptr::null(); MAX_LABELS];
    let mut count = 0usize;
    let mut timing = Timing::default();

    // SAFETY: every pointer refers to a live local or to `features`, lengths
    // match the buffers, and the shim does not retain any of them.
    let err = unsafe {
        ffi::epiwatch_classify(
            features.as_ptr(),
            features.len(),
            scores.as_mut_ptr(),
            labels.as_mut_ptr(),
            MAX_LABELS,
            &mut count,
            &mut timing.dsp_ms,
            &mut timing.classification_ms,
            debug_nn,
        )
    };
    if err != 0 {
        return Err(InferenceError::new(err));
    }

    let predictions = labels
        .iter()
        .zip(scores.iter())
        .take(count.min(MAX_LABELS))
        .map(|(label, value)| {
            let label = if label.is_null() {
                String::new()
            } else {
                // SAFETY: label strings are static, NUL-terminated model metadata.
                unsafe { CStr::from_ptr(*label) }.to_string_lossy().into_owned()
            };
            Prediction {
                label,
                value: *value,
            }
        })
        .collect();

    Ok(ClassificationResult::new(predictions, timing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seizure_confidence_lookup() {
        let result =
            ClassificationResult::from_pairs(&[("normal", 0.2), ("seizure", 0.8)], Timing::default());
        assert_eq!(result.seizure_confidence(), 0.8);
        assert_eq!(result.confidence_of("normal"), Some(0.2));
        assert_eq!(result.confidence_of("walking"), None);
    }

    #[test]
    fn test_seizure_picked_by_label_not_position() {
        let result =
            ClassificationResult::from_pairs(&[("seizure", 0.95), ("normal", 0.05)], Timing::default());
        assert_eq!(result.seizure_confidence(), 0.95);

        let result = ClassificationResult::from_pairs(
            &[("walking", 0.1), ("normal", 0.2), ("seizure", 0.7)],
            Timing::default(),
        );
        assert_eq!(result.seizure_confidence(), 0.7);
    }

    #[test]
    fn test_missing_seizure_label_reads_zero() {
        let result =
            ClassificationResult::from_pairs(&[("idle", 0.4), ("wave", 0.6)], Timing::default());
        assert_eq!(result.seizure_confidence(), 0.0);
    }

    #[test]
    fn test_display_lists_every_label() {
        let result = ClassificationResult::from_pairs(
            &[("normal", 0.25), ("seizure", 0.75)],
            Timing {
                dsp_ms: 3,
                classification_ms: 12,
            },
        );
        assert_eq!(
            result.to_string(),
            "Predictions (DSP: 3 ms, NN: 12 ms):  normal: 0.25000  seizure: 0.75000"
        );
    }

    #[test]
    fn test_error_message_names_known_codes() {
        assert_eq!(
            InferenceError::new(-5).to_string(),
            "classifier returned -5 (DSP error)"
        );
        assert_eq!(
            InferenceError::new(-42).to_string(),
            "classifier returned -42 (unknown)"
        );
    }

    #[cfg(not(feature = "edge-impulse"))]
    #[test]
    fn test_stub_separates_still_and_shaking() {
        let mut classifier = EdgeImpulse::new();

        let still = [0.0f32; FRAME_SIZE];
        let result = classifier.classify(&still).unwrap();
        assert!(result.seizure_confidence() < SEIZURE_THRESHOLD);

        let mut shaking = [0.0f32; FRAME_SIZE];
        for (i, sample) in shaking.chunks_exact_mut(AXES_PER_SAMPLE).enumerate() {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            sample[3..6].copy_from_slice(&[4.0 * sign, -4.0 * sign, 4.0 * sign]);
        }
        let result = classifier.classify(&shaking).unwrap();
        assert!(result.seizure_confidence() > SEIZURE_THRESHOLD);
    }
}
