use std::path::Path;

use anyhow::{Context, bail};
use opskit_autoscale::{
    GroupDecision, ScalingDecider, ScalingPolicy, ScalingResult, decide_groups, load_groups,
};
use opskit_core::OpskitConfig;
use serde_json::{Value, json};

pub fn scale(config: &OpskitConfig, input: &Path, format: &str) -> anyhow::Result<()> {
    let decider = ScalingDecider::new(ScalingPolicy::from_config(&config.scaling()))?;
    let groups = load_groups(input)
        .with_context(|| format!("failed to load utilization input {}", input.display()))?;

    let results = decide_groups(&decider, &groups);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&render_json(&results))?),
        _ => {
            for line in render_text(&results) {
                println!("{line}");
            }
        }
    }

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        bail!("{failed} of {} groups could not be evaluated", results.len());
    }
    Ok(())
}

fn render_text(results: &[(String, ScalingResult<GroupDecision>)]) -> Vec<String> {
    results
        .iter()
        .map(|(group, result)| match result {
            Ok(d) => format!("For {group}: ({}, {})", d.decision, d.new_server_count),
            Err(e) => format!("For {group}: error: {e}"),
        })
        .collect()
}

fn render_json(results: &[(String, ScalingResult<GroupDecision>)]) -> Value {
    Value::Array(
        results
            .iter()
            .map(|(group, result)| match result {
                Ok(d) => json!(d),
                Err(e) => json!({ "group_name": group, "error": e.to_string() }),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opskit_autoscale::parse_groups;

    fn results() -> Vec<(String, ScalingResult<GroupDecision>)> {
        let groups = parse_groups(
            r#"[
                {"group_name": "web", "value": [80, 82, 79, 90, 85, 77, 88, 91, 76, 95], "number_of_servers": 3},
                {"group_name": "tiny", "value": [10, 20], "number_of_servers": 1}
            ]"#,
        )
        .unwrap();
        decide_groups(&ScalingDecider::default(), &groups)
    }

    #[test]
    fn text_lines() {
        let lines = render_text(&results());
        assert_eq!(lines[0], "For web: (scale_up, 4)");
        assert!(lines[1].starts_with("For tiny: error: insufficient data"));
    }

    #[test]
    fn json_entries() {
        let value = render_json(&results());
        assert_eq!(value[0]["decision"], "scale_up");
        assert_eq!(value[0]["new_server_count"], 4);
        assert_eq!(value[1]["group_name"], "tiny");
        assert!(value[1]["error"].as_str().unwrap().contains("need 10 samples"));
    }

    #[test]
    fn scale_fails_when_a_group_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpu.json");
        std::fs::write(
            &path,
            r#"[{"group_name": "tiny", "value": [10], "number_of_servers": 1}]"#,
        )
        .unwrap();
        assert!(scale(&OpskitConfig::default(), &path, "text").is_err());
    }

    #[test]
    fn scale_honours_config_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpu.json");
        std::fs::write(
            &path,
            r#"[{"group_name": "web", "value": [50, 50, 50], "number_of_servers": 1}]"#,
        )
        .unwrap();
        let config: OpskitConfig = toml_config("[scaling]\nwindow_size = 3\n");
        assert!(scale(&config, &path, "json").is_ok());
    }

    fn toml_config(s: &str) -> OpskitConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opskit.toml");
        std::fs::write(&path, s).unwrap();
        OpskitConfig::from_file(&path).unwrap()
    }
}
