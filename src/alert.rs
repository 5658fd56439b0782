// EpiWatch — Alert State Machine
//
// Two states, one threshold.  Outputs are written only on a transition, never
// while the state is steady; the rolling average upstream is the only damping.

use crate::config::SEIZURE_THRESHOLD;
use crate::events::{AlertState, AlertTransition};

/// The physical alert lines (LED + buzzer).  Both lines are always driven
/// together, so implementors receive a single level.
pub trait AlertOutput {
    fn drive(&mut self, active: bool);
}

pub struct AlertStateMachine<O: AlertOutput> {
    outputs: O,
    state: AlertState,
    threshold: f32,
}

impl<O: AlertOutput> AlertStateMachine<O> {
    /// Starts in `Idle` with both lines pulled LOW.
    pub fn new(outputs: O) -> Self {
        Self::with_threshold(outputs, SEIZURE_THRESHOLD)
    }

    pub fn with_threshold(mut outputs: O, threshold: f32) -> Self {
        outputs.drive(false);
        Self {
            outputs,
            state: AlertState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    /// Compare the rolling average against the threshold and fire the edge,
    /// if any.
    pub fn evaluate(&mut self, average: f32) -> Option<AlertTransition> {
        let transition = match self.state {
            AlertState::Idle if average > self.threshold => AlertTransition::Raised,
            AlertState::Alert if average <= self.threshold => AlertTransition::Cleared,
            _ => return None,
        };

        self.state = transition.target();
        self.outputs.drive(self.state.is_active());

        match transition {
            AlertTransition::Raised => {
                log::warn!("SEIZURE DETECTED! Alert activated (avg {:.5})", average);
            }
            AlertTransition::Cleared => {
                log::info!("Normal activity detected. Alert stopped (avg {:.5})", average);
            }
        }

        Some(transition)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every level written to the alert lines.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingOutput {
        pub writes: Vec<bool>,
    }

    impl AlertOutput for RecordingOutput {
        fn drive(&mut self, active: bool) {
            self.writes.push(active);
        }
    }

    #[test]
    fn test_starts_idle_and_low() {
        let machine = AlertStateMachine::new(RecordingOutput::default());
        assert_eq!(machine.state(), AlertState::Idle);
        assert_eq!(machine.outputs().writes, vec![false]);
        assert_eq!(machine.threshold(), SEIZURE_THRESHOLD);
    }

    #[test]
    fn test_raise_and_clear() {
        let mut machine = AlertStateMachine::new(RecordingOutput::default());

        assert_eq!(machine.evaluate(0.71), Some(AlertTransition::Raised));
        assert!(machine.is_active());
        assert_eq!(machine.evaluate(0.7), Some(AlertTransition::Cleared));
        assert!(!machine.is_active());

        assert_eq!(machine.outputs().writes, vec![false, true, false]);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let mut machine = AlertStateMachine::new(RecordingOutput::default());
        assert_eq!(machine.evaluate(SEIZURE_THRESHOLD), None);
        assert_eq!(machine.state(), AlertState::Idle);
    }

    #[test]
    fn test_steady_state_writes_once() {
        let mut machine = AlertStateMachine::new(RecordingOutput::default());
        let transitions = (0..100).filter_map(|_| machine.evaluate(0.9)).count();

        assert_eq!(transitions, 1);
        assert_eq!(machine.outputs().writes, vec![false, true]);

        let cleared: Vec<_> = (0..100).filter_map(|_| machine.evaluate(0.2)).collect();
        assert_eq!(cleared, vec![AlertTransition::Cleared]);
        assert_eq!(machine.outputs().writes, vec![false, true, false]);
    }

    #[test]
    fn test_oscillates_at_boundary() {
        let mut machine = AlertStateMachine::with_threshold(RecordingOutput::default(), 0.5);
        for avg in [0.51, 0.5, 0.51, 0.5] {
            assert!(machine.evaluate(avg).is_some());
        }
        assert_eq!(machine.outputs().writes, vec![false, true, false, true, false]);
    }
}
