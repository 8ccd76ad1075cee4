//! opskit-autoscale — threshold-based scaling decisions.
//!
//! Takes the trailing window of CPU utilization samples for a group of
//! servers, averages it, and decides whether the group should grow by one
//! server, shrink by one, or stay as it is.
//!
//! # Scaling Algorithm
//!
//! ```text
//! window = last window_size samples        (default 10)
//! mean   = sum(window) / window_size
//!
//! if mean > upper_threshold:               (default 75)
//!     ScaleUp   -> current + 1
//! else if mean < lower_threshold:          (default 25)
//!     ScaleDown -> max(current - 1, 0)
//! else:
//!     Hold      -> current
//! ```
//!
//! Both thresholds are exclusive: a mean sitting exactly on a threshold
//! holds. The decider keeps no state between calls, so decisions for
//! different groups are independent of each other.

pub mod decider;
pub mod error;
pub mod groups;

pub use decider::{
    ScalingDecider, ScalingDecision, ScalingOutcome, ScalingPolicy, ScalingState, ScalingWindow,
};
pub use error::{ScalingError, ScalingResult};
pub use groups::{GroupDecision, GroupUtilization, decide_groups, load_groups, parse_groups};
