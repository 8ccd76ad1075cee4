//! Per-group input records and batch evaluation.
//!
//! The input file is a JSON array with one record per monitored group:
//!
//! ```json
//! [{ "group_name": "web", "value": [80, 82, 79], "number_of_servers": 3 }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decider::{ScalingDecider, ScalingDecision, ScalingOutcome};
use crate::error::{ScalingError, ScalingResult};

/// Utilization history for one group of servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupUtilization {
    pub group_name: String,
    /// Samples in collection order, oldest first.
    pub value: Vec<f64>,
    /// Signed so that a negative count reaches the decider and is rejected
    /// there rather than failing the whole file.
    pub number_of_servers: i64,
}

/// Decision for one group, ready for display or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDecision {
    pub group_name: String,
    pub decision: ScalingDecision,
    pub new_server_count: u32,
}

impl GroupDecision {
    pub fn new(group_name: impl Into<String>, outcome: ScalingOutcome) -> Self {
        Self {
            group_name: group_name.into(),
            decision: outcome.decision,
            new_server_count: outcome.new_server_count,
        }
    }
}

/// Read group records from a JSON file.
pub fn load_groups(path: &Path) -> ScalingResult<Vec<GroupUtilization>> {
    let content = std::fs::read_to_string(path).map_err(|source| ScalingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let groups = parse_groups(&content)?;
    debug!(?path, groups = groups.len(), "utilization input loaded");
    Ok(groups)
}

/// Parse group records from a JSON string.
pub fn parse_groups(content: &str) -> ScalingResult<Vec<GroupUtilization>> {
    serde_json::from_str(content).map_err(|e| ScalingError::InvalidInput(e.to_string()))
}

/// Decide for every group independently.
///
/// A group with bad data yields an error in its slot; the remaining groups
/// are still evaluated.
pub fn decide_groups(
    decider: &ScalingDecider,
    groups: &[GroupUtilization],
) -> Vec<(String, ScalingResult<GroupDecision>)> {
    groups
        .iter()
        .map(|group| {
            let result = decider
                .decide(&group.value, group.number_of_servers)
                .map(|outcome| GroupDecision::new(&group.group_name, outcome));
            if let Err(e) = &result {
                warn!(group = %group.group_name, error = %e, "scaling decision failed");
            }
            (group.group_name.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"[
        {"group_name": "web", "value": [80, 82, 79, 90, 85, 77, 88, 91, 76, 95], "number_of_servers": 3},
        {"group_name": "batch", "value": [10, 12, 9, 15, 8, 5, 14, 11, 9, 7], "number_of_servers": 2},
        {"group_name": "api", "value": [50, 60, 40, 55, 45, 50, 60, 40, 55, 45], "number_of_servers": 5},
        {"group_name": "new", "value": [90, 90, 90, 90, 90], "number_of_servers": 1}
    ]"#;

    #[test]
    fn parse_integer_samples() {
        let groups = parse_groups(INPUT).unwrap();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].group_name, "web");
        assert_eq!(groups[0].value[0], 80.0);
        assert_eq!(groups[1].number_of_servers, 2);
    }

    #[test]
    fn decide_each_group() {
        let groups = parse_groups(INPUT).unwrap();
        let results = decide_groups(&ScalingDecider::default(), &groups);

        let decisions: Vec<_> = results
            .iter()
            .map(|(name, r)| (name.as_str(), r.as_ref().ok().map(|d| (d.decision, d.new_server_count))))
            .collect();

        assert_eq!(
            decisions,
            vec![
                ("web", Some((ScalingDecision::ScaleUp, 4))),
                ("batch", Some((ScalingDecision::ScaleDown, 1))),
                ("api", Some((ScalingDecision::Hold, 5))),
                ("new", None),
            ]
        );
        assert!(matches!(
            results[3].1,
            Err(ScalingError::InsufficientData { .. })
        ));
    }

    #[test]
    fn negative_server_count_fails_only_that_group() {
        let input = r#"[
            {"group_name": "broken", "value": [50, 50, 50, 50, 50, 50, 50, 50, 50, 50], "number_of_servers": -2},
            {"group_name": "fine", "value": [50, 50, 50, 50, 50, 50, 50, 50, 50, 50], "number_of_servers": 2}
        ]"#;
        let groups = parse_groups(input).unwrap();
        let results = decide_groups(&ScalingDecider::default(), &groups);
        assert!(matches!(results[0].1, Err(ScalingError::InvalidInput(_))));
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn non_numeric_sample_is_invalid_input() {
        let input = r#"[{"group_name": "x", "value": [1, "high"], "number_of_servers": 1}]"#;
        assert!(matches!(parse_groups(input), Err(ScalingError::InvalidInput(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpu_utilisation.json");
        std::fs::write(&path, INPUT).unwrap();

        let groups = load_groups(&path).unwrap();
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_groups(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ScalingError::Read { .. }));
    }

    #[test]
    fn group_decision_serializes() {
        let decision = GroupDecision {
            group_name: "web".to_string(),
            decision: ScalingDecision::ScaleUp,
            new_server_count: 4,
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(
            json,
            r#"{"group_name":"web","decision":"scale_up","new_server_count":4}"#
        );
    }
}
