// EpiWatch — Sampling Scheduler
//
// Cooperative fixed-period loop.  Every SAMPLE_INTERVAL_MS one sample is read
// into the feature window; when the window fills, classification, smoothing
// and alert evaluation run synchronously before the poll returns.
//
// All pipeline state lives in the `Scheduler` and is touched from a single
// thread only.  Moving sampling to a timer interrupt or a second task would
// need a lock around the window and the confidence history.

use std::thread;
use std::time::{Duration, Instant};

use crate::alert::{AlertOutput, AlertStateMachine};
use crate::config::*;
use crate::ei::{Classifier, InferenceError};
use crate::events::{AlertTransition, Sample};
use crate::smoother::ConfidenceHistory;
use crate::window::FeatureWindow;

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Produces one six-axis reading per call.
pub trait SampleSource {
    /// Probe and configure the device.
    fn init(&mut self) -> anyhow::Result<()>;

    fn read(&mut self) -> anyhow::Result<Sample>;
}

/// Milliseconds since an arbitrary origin.  Wraps at ~49 days; callers use
/// `wrapping_sub` for intervals.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}

/// A sample source whose `init` has succeeded.  Only obtainable through
/// [`try_bring_up`] / [`bring_up`], so the scheduler can never run against an
/// unconfigured sensor.
pub struct InitializedSource<S>(S);

impl<S> InitializedSource<S> {
    pub fn into_inner(self) -> S {
        self.0
    }
}

pub fn try_bring_up<S: SampleSource>(mut source: S) -> anyhow::Result<InitializedSource<S>> {
    source.init()?;
    Ok(InitializedSource(source))
}

/// Initialise the sensor or halt forever.
pub fn bring_up<S: SampleSource>(source: S) -> InitializedSource<S> {
    match try_bring_up(source) {
        Ok(ready) => ready,
        Err(e) => {
            log::error!("ERROR: Failed to find MPU6050 chip: {:#}", e);
            halt()
        }
    }
}

/// Inert safe state after a fatal start-up failure.  Never returns.
pub fn halt() -> ! {
    log::error!("System halted");
    loop {
        thread::sleep(Duration::from_millis(HALT_POLL_MS));
    }
}

pub fn log_banner() {
    log::info!("EpiWatch - Epileptic Motion Detection");
    log::info!("Model: {}", MODEL_PROJECT_NAME);
    log::info!("Firmware: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    log::info!("Seizure threshold: {:.2}", SEIZURE_THRESHOLD);
    log::info!("Confidence samples for averaging: {}", CONFIDENCE_HISTORY_LEN);
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Outcome of one `poll`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Less than SAMPLE_INTERVAL_MS since the previous tick.
    NotDue,
    /// One sample appended; window not yet full.
    Sampled,
    /// The sensor read failed; nothing was appended.
    SampleDropped,
    /// A full window was classified and smoothed.
    Classified {
        average: f32,
        transition: Option<AlertTransition>,
    },
    /// The classifier rejected the window; history and alert state untouched.
    ClassifierFailed(InferenceError),
}

pub struct Scheduler<S, C, O, K>
where
    S: SampleSource,
    C: Classifier,
    O: AlertOutput,
    K: Clock,
{
    source: S,
    classifier: C,
    clock: K,
    window: FeatureWindow,
    history: ConfidenceHistory,
    alert: AlertStateMachine<O>,
    last_tick_ms: u32,
}

impl<S, C, O, K> Scheduler<S, C, O, K>
where
    S: SampleSource,
    C: Classifier,
    O: AlertOutput,
    K: Clock,
{
    pub fn new(
        source: InitializedSource<S>,
        classifier: C,
        alert: AlertStateMachine<O>,
        clock: K,
    ) -> Self {
        Self {
            source: source.into_inner(),
            classifier,
            clock,
            window: FeatureWindow::new(),
            history: ConfidenceHistory::new(),
            alert,
            last_tick_ms: 0,
        }
    }

    pub fn window(&self) -> &FeatureWindow {
        &self.window
    }

    pub fn history(&self) -> &ConfidenceHistory {
        &self.history
    }

    pub fn alert(&self) -> &AlertStateMachine<O> {
        &self.alert
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Run at most one sampling tick.
    ///
    /// The next due time is measured from when this tick finished, so a slow
    /// classification delays the following sample instead of being made up
    /// with a burst of reads.
    pub fn poll(&mut self) -> Tick {
        let now = self.clock.now_ms();
        if now.wrapping_sub(self.last_tick_ms) < SAMPLE_INTERVAL_MS {
            return Tick::NotDue;
        }

        let tick = match self.source.read() {
            Ok(sample) => {
                self.window.append(&sample);
                if self.window.is_full() {
                    let outcome = self.run_pipeline();
                    self.window.reset();
                    outcome
                } else {
                    Tick::Sampled
                }
            }
            Err(e) => {
                log::warn!("IMU read error: {:#}", e);
                Tick::SampleDropped
            }
        };

        self.last_tick_ms = self.clock.now_ms();
        tick
    }

    /// Classify the full window, record the seizure confidence and update the
    /// alert state.
    fn run_pipeline(&mut self) -> Tick {
        let Some(features) = self.window.consume() else {
            return Tick::Sampled;
        };

        let result = match self.classifier.classify(features) {
            Ok(result) => result,
            Err(e) => {
                log::error!("ERROR: Failed to run classifier: {}", e);
                return Tick::ClassifierFailed(e);
            }
        };
        log::info!("{}", result);

        self.history.record(result.seizure_confidence());
        let average = self.history.average();
        log::info!(
            "Average confidence over {} samples: {:.5}",
            self.history.samples_used(),
            average
        );

        let transition = self.alert.evaluate(average);
        Tick::Classified {
            average,
            transition,
        }
    }

    /// Poll forever with a short idle delay between polls.
    pub fn run(mut self) -> ! {
        let idle = Duration::from_millis(IDLE_DELAY_MS);
        loop {
            self.poll();
            thread::sleep(idle);
        }
    }
}
