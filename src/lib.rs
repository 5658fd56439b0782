//! EpiWatch — wearable seizure-motion detection firmware.
//!
//! An MPU6050 is sampled every 23 ms into 100-sample, six-axis feature
//! windows.  Each full window is classified by an Edge Impulse model; the
//! "seizure" confidence is averaged over the last five windows and an LED +
//! buzzer are switched on while that average stays above 0.7.
//!
//! The detection core (`window`, `smoother`, `alert`, `scheduler`) has no
//! hardware dependencies and is unit-tested on the host.  `drivers` only
//! exists when building for ESP-IDF.

pub mod alert;
pub mod config;
pub mod ei;
pub mod events;
pub mod scheduler;
pub mod smoother;
pub mod window;

#[cfg(target_os = "espidf")]
pub mod drivers;


pub use alert::{AlertOutput, AlertStateMachine};
pub use ei::{ClassificationResult, Classifier, EdgeImpulse, InferenceError};
pub use events::{AlertState, AlertTransition, Sample};
pub use scheduler::{Clock, MonotonicClock, SampleSource, Scheduler, Tick};
pub use smoother::ConfidenceHistory;
pub use window::FeatureWindow;
