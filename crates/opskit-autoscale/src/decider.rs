//! ScalingDecider — threshold decisions over a trailing utilization window.
//!
//! The decider is a pure function of its policy, the sample window, and the
//! caller's current server count. Nothing is remembered between calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use opskit_core::ScalingConfig;

use crate::error::{ScalingError, ScalingResult};

/// Lowest and highest valid utilization percentage.
const MIN_UTILIZATION: f64 = 0.0;
const MAX_UTILIZATION: f64 = 100.0;

/// Slack applied to threshold comparisons. Means of decimal samples carry
/// float rounding, so a window whose exact mean sits on a threshold must
/// still hold.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Thresholds and window size injected into the decider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    /// Number of trailing samples averaged per decision.
    pub window_size: usize,
    /// Scale up when the window mean is strictly above this.
    pub upper_threshold: f64,
    /// Scale down when the window mean is strictly below this.
    pub lower_threshold: f64,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            window_size: opskit_core::config::DEFAULT_WINDOW_SIZE,
            upper_threshold: opskit_core::config::DEFAULT_UPPER_THRESHOLD,
            lower_threshold: opskit_core::config::DEFAULT_LOWER_THRESHOLD,
        }
    }
}

impl ScalingPolicy {
    /// Resolve a policy from the `[scaling]` config section, filling gaps
    /// with defaults.
    pub fn from_config(config: &ScalingConfig) -> Self {
        Self {
            window_size: config.window_size(),
            upper_threshold: config.upper_threshold(),
            lower_threshold: config.lower_threshold(),
        }
    }

    pub fn validate(&self) -> ScalingResult<()> {
        if self.window_size == 0 {
            return Err(ScalingError::InvalidPolicy(
                "window_size must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("upper_threshold", self.upper_threshold),
            ("lower_threshold", self.lower_threshold),
        ] {
            if !is_percentage(value) {
                return Err(ScalingError::InvalidPolicy(format!(
                    "{name} must be within [0, 100], got {value}"
                )));
            }
        }
        if self.lower_threshold > self.upper_threshold {
            return Err(ScalingError::InvalidPolicy(format!(
                "lower_threshold ({}) exceeds upper_threshold ({})",
                self.lower_threshold, self.upper_threshold
            )));
        }
        Ok(())
    }
}

/// The trailing fixed-size suffix of a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingWindow<'a> {
    samples: &'a [f64],
}

impl<'a> ScalingWindow<'a> {
    /// Take the last `size` samples, ignoring earlier history.
    ///
    /// Fails with `InsufficientData` on a partial window and with
    /// `InvalidInput` if any sample inside the window is not a finite
    /// percentage.
    pub fn trailing(samples: &'a [f64], size: usize) -> ScalingResult<Self> {
        if samples.len() < size {
            return Err(ScalingError::InsufficientData {
                required: size,
                available: samples.len(),
            });
        }
        let window = &samples[samples.len() - size..];
        if let Some((offset, value)) = window
            .iter()
            .enumerate()
            .find(|(_, v)| !is_percentage(**v))
        {
            return Err(ScalingError::InvalidInput(format!(
                "sample {} is {value}, expected a percentage in [0, 100]",
                samples.len() - size + offset
            )));
        }
        Ok(Self { samples: window })
    }

    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the window.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// Kind of scaling action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingDecision {
    ScaleUp,
    ScaleDown,
    Hold,
}

impl ScalingDecision {
    /// Server count after applying this decision to `current`.
    pub fn apply(self, current: u32) -> u32 {
        match self {
            ScalingDecision::ScaleUp => current.saturating_add(1),
            ScalingDecision::ScaleDown => current.saturating_sub(1),
            ScalingDecision::Hold => current,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScalingDecision::ScaleUp => "scale_up",
            ScalingDecision::ScaleDown => "scale_down",
            ScalingDecision::Hold => "hold",
        }
    }
}

impl fmt::Display for ScalingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current server count of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingState {
    current_servers: u32,
}

impl ScalingState {
    /// Validate a caller-supplied count. Negative counts are rejected.
    pub fn new(current_servers: i64) -> ScalingResult<Self> {
        if current_servers < 0 {
            return Err(ScalingError::InvalidInput(format!(
                "current_servers must be a non-negative count, got {current_servers}"
            )));
        }
        let current_servers = u32::try_from(current_servers).map_err(|_| {
            ScalingError::InvalidInput(format!(
                "current_servers must be at most {}, got {current_servers}",
                u32::MAX
            ))
        })?;
        Ok(Self { current_servers })
    }

    pub fn current_servers(&self) -> u32 {
        self.current_servers
    }

    pub fn apply(&mut self, decision: ScalingDecision) {
        self.current_servers = decision.apply(self.current_servers);
    }
}

/// A decision paired with the resulting server count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingOutcome {
    pub decision: ScalingDecision,
    pub new_server_count: u32,
}

impl fmt::Display for ScalingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.decision, self.new_server_count)
    }
}

/// Pure threshold decider.
#[derive(Debug, Clone, Default)]
pub struct ScalingDecider {
    policy: ScalingPolicy,
}

impl ScalingDecider {
    /// Create a decider with a validated policy.
    pub fn new(policy: ScalingPolicy) -> ScalingResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ScalingPolicy {
        &self.policy
    }

    /// Decide on the trailing window of `samples` for a group currently
    /// running `current_servers`.
    pub fn decide(&self, samples: &[f64], current_servers: i64) -> ScalingResult<ScalingOutcome> {
        let state = ScalingState::new(current_servers)?;
        let window = ScalingWindow::trailing(samples, self.policy.window_size)?;
        Ok(self.decide_window(&window, state))
    }

    /// Decide on an already-extracted window.
    pub fn decide_window(&self, window: &ScalingWindow<'_>, mut state: ScalingState) -> ScalingOutcome {
        let mean = window.mean();
        let decision = if mean > self.policy.upper_threshold + THRESHOLD_EPSILON {
            ScalingDecision::ScaleUp
        } else if mean < self.policy.lower_threshold - THRESHOLD_EPSILON {
            ScalingDecision::ScaleDown
        } else {
            ScalingDecision::Hold
        };

        let from = state.current_servers();
        state.apply(decision);
        debug!(
            mean,
            from,
            to = state.current_servers(),
            %decision,
            "scaling decision"
        );

        ScalingOutcome {
            decision,
            new_server_count: state.current_servers(),
        }
    }
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (MIN_UTILIZATION..=MAX_UTILIZATION).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decider() -> ScalingDecider {
        ScalingDecider::default()
    }

    #[test]
    fn scale_up_example() {
        let samples = [80.0, 82.0, 79.0, 90.0, 85.0, 77.0, 88.0, 91.0, 76.0, 95.0];
        let window = ScalingWindow::trailing(&samples, 10).unwrap();
        assert!((window.mean() - 84.3).abs() < 1e-9);

        let outcome = decider().decide(&samples, 3).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::ScaleUp);
        assert_eq!(outcome.new_server_count, 4);
    }

    #[test]
    fn scale_down_example() {
        let samples = [10.0, 12.0, 9.0, 15.0, 8.0, 5.0, 14.0, 11.0, 9.0, 7.0];
        let outcome = decider().decide(&samples, 2).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::ScaleDown);
        assert_eq!(outcome.new_server_count, 1);
    }

    #[test]
    fn hold_example() {
        let samples = [50.0, 60.0, 40.0, 55.0, 45.0, 50.0, 60.0, 40.0, 55.0, 45.0];
        let outcome = decider().decide(&samples, 5).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::Hold);
        assert_eq!(outcome.new_server_count, 5);
    }

    #[test]
    fn upper_boundary_holds() {
        let samples = [70.0, 80.0, 70.0, 80.0, 70.0, 80.0, 70.0, 80.0, 70.0, 80.0];
        let outcome = decider().decide(&samples, 4).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::Hold);
        assert_eq!(outcome.new_server_count, 4);
    }

    #[test]
    fn lower_boundary_holds() {
        let samples = [25.0; 10];
        let outcome = decider().decide(&samples, 4).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::Hold);
        assert_eq!(outcome.new_server_count, 4);
    }

    #[test]
    fn decimal_window_on_upper_threshold_holds() {
        // Exact mean is 75; the left-to-right f64 sum lands a hair above.
        let samples = [85.1, 76.7, 79.3, 65.6, 89.8, 85.8, 63.6, 70.0, 81.6, 52.5];
        let window = ScalingWindow::trailing(&samples, 10).unwrap();
        assert!((window.mean() - 75.0).abs() < 1e-9);

        let outcome = decider().decide(&samples, 3).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::Hold);
        assert_eq!(outcome.new_server_count, 3);
    }

    #[test]
    fn decimal_window_on_lower_threshold_holds() {
        let samples = [20.1, 29.9, 24.7, 25.3, 30.2, 19.8, 22.2, 27.8, 26.6, 23.4];
        let outcome = decider().decide(&samples, 3).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::Hold);
        assert_eq!(outcome.new_server_count, 3);
    }

    #[test]
    fn just_above_upper_scales_up() {
        let mut samples = [75.0; 10];
        samples[9] = 75.5;
        let outcome = decider().decide(&samples, 0).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::ScaleUp);
        assert_eq!(outcome.new_server_count, 1);
    }

    #[test]
    fn scale_down_never_goes_negative() {
        let samples = [0.0; 10];
        let outcome = decider().decide(&samples, 0).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::ScaleDown);
        assert_eq!(outcome.new_server_count, 0);
    }

    #[test]
    fn only_trailing_window_counts() {
        // Old history is idle; the last ten samples are hot.
        let mut samples = vec![0.0; 50];
        samples.extend([90.0; 10]);
        let outcome = decider().decide(&samples, 2).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::ScaleUp);
        assert_eq!(outcome.new_server_count, 3);
    }

    #[test]
    fn invalid_history_outside_window_is_ignored() {
        let mut samples = vec![f64::NAN, 250.0];
        samples.extend([50.0; 10]);
        let outcome = decider().decide(&samples, 1).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::Hold);
    }

    #[test]
    fn insufficient_data() {
        let samples = [90.0; 5];
        let err = decider().decide(&samples, 3).unwrap_err();
        assert!(matches!(
            err,
            ScalingError::InsufficientData {
                required: 10,
                available: 5
            }
        ));
    }

    #[test]
    fn empty_samples_is_insufficient() {
        let err = decider().decide(&[], 1).unwrap_err();
        assert!(matches!(err, ScalingError::InsufficientData { available: 0, .. }));
    }

    #[test]
    fn negative_servers_rejected() {
        let samples = [50.0; 10];
        let err = decider().decide(&samples, -1).unwrap_err();
        assert!(matches!(err, ScalingError::InvalidInput(_)));
    }

    #[test]
    fn oversized_server_count_reports_upper_bound() {
        let samples = [50.0; 10];
        let err = decider().decide(&samples, 5_000_000_000).unwrap_err();
        match err {
            ScalingError::InvalidInput(msg) => {
                assert!(msg.contains("at most 4294967295"), "{msg}");
                assert!(!msg.contains("non-negative"), "{msg}");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        let err = decider().decide(&samples, -1).unwrap_err();
        assert!(matches!(err, ScalingError::InvalidInput(msg) if msg.contains("non-negative")));
    }

    #[test]
    fn out_of_range_sample_rejected() {
        let mut samples = [50.0; 10];
        samples[3] = 101.0;
        let err = decider().decide(&samples, 1).unwrap_err();
        assert!(matches!(err, ScalingError::InvalidInput(msg) if msg.contains("sample 3")));

        samples[3] = -0.5;
        assert!(matches!(
            decider().decide(&samples, 1),
            Err(ScalingError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_finite_sample_rejected() {
        let mut samples = [50.0; 10];
        samples[0] = f64::NAN;
        assert!(matches!(
            decider().decide(&samples, 1),
            Err(ScalingError::InvalidInput(_))
        ));
        samples[0] = f64::INFINITY;
        assert!(matches!(
            decider().decide(&samples, 1),
            Err(ScalingError::InvalidInput(_))
        ));
    }

    #[test]
    fn custom_policy() {
        let decider = ScalingDecider::new(ScalingPolicy {
            window_size: 3,
            upper_threshold: 60.0,
            lower_threshold: 40.0,
        })
        .unwrap();

        let outcome = decider.decide(&[10.0, 70.0, 70.0, 70.0], 2).unwrap();
        assert_eq!(outcome.decision, ScalingDecision::ScaleUp);
        assert_eq!(outcome.new_server_count, 3);

        assert!(matches!(
            decider.decide(&[70.0, 70.0], 2),
            Err(ScalingError::InsufficientData { required: 3, .. })
        ));
    }

    #[test]
    fn invalid_policies_rejected() {
        let zero_window = ScalingPolicy {
            window_size: 0,
            ..ScalingPolicy::default()
        };
        assert!(matches!(
            ScalingDecider::new(zero_window),
            Err(ScalingError::InvalidPolicy(_))
        ));

        let inverted = ScalingPolicy {
            upper_threshold: 20.0,
            lower_threshold: 30.0,
            ..ScalingPolicy::default()
        };
        assert!(ScalingDecider::new(inverted).is_err());

        let out_of_range = ScalingPolicy {
            upper_threshold: 120.0,
            ..ScalingPolicy::default()
        };
        assert!(ScalingDecider::new(out_of_range).is_err());
    }

    #[test]
    fn policy_from_config_fills_defaults() {
        let config = ScalingConfig {
            upper_threshold: Some(80.0),
            ..ScalingConfig::default()
        };
        let policy = ScalingPolicy::from_config(&config);
        assert_eq!(policy.window_size, 10);
        assert_eq!(policy.upper_threshold, 80.0);
        assert_eq!(policy.lower_threshold, 25.0);
    }

    #[test]
    fn decision_apply_and_state() {
        assert_eq!(ScalingDecision::ScaleUp.apply(u32::MAX), u32::MAX);
        assert_eq!(ScalingDecision::ScaleDown.apply(0), 0);
        assert_eq!(ScalingDecision::Hold.apply(7), 7);

        let mut state = ScalingState::new(2).unwrap();
        state.apply(ScalingDecision::ScaleUp);
        state.apply(ScalingDecision::ScaleUp);
        state.apply(ScalingDecision::ScaleDown);
        assert_eq!(state.current_servers(), 3);
    }

    #[test]
    fn outcome_display() {
        let outcome = ScalingOutcome {
            decision: ScalingDecision::ScaleDown,
            new_server_count: 1,
        };
        assert_eq!(outcome.to_string(), "(scale_down, 1)");
        assert_eq!(
            serde_json::to_string(&ScalingDecision::ScaleUp).unwrap(),
            "\"scale_up\""
        );
    }

    #[test]
    fn decisions_are_deterministic() {
        let samples = [33.0, 81.0, 12.0, 99.0, 47.0, 64.0, 5.0, 70.0, 88.0, 21.0];
        let first = decider().decide(&samples, 6).unwrap();
        for _ in 0..5 {
            assert_eq!(decider().decide(&samples, 6).unwrap(), first);
        }
    }
}
