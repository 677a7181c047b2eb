//! Wire types of the results backend.
//!
//! Scenario payloads are typed where the client reads them and left as raw JSON
//! where it only passes them through. Result rows are not typed at all here:
//! they arrive as JSON objects and go through [`super::mapping`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One JSON object from a results endpoint.
pub type RawRecord = Map<String, Value>;

/// Entry of `GET /scenarios`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub ep_scenario_id: i64,
    #[serde(default)]
    pub ep_scenario_description: String,
}

/// Payload of `GET /scenarios/{id}/details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDetails {
    pub scenario: ScenarioHeader,
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
    #[serde(default)]
    pub metrics: Vec<Value>,
    #[serde(default)]
    pub escalating_rates: Vec<Value>,
    #[serde(default)]
    pub solver_definitions: Vec<Value>,
    #[serde(default)]
    pub studies: Vec<StudyDefinition>,
}

/// Scenario record inside the details payload; unknown columns are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioHeader {
    pub ep_scenario_id: i64,
    #[serde(default)]
    pub ep_scenario_description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Candidate or existing unit attached to a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDefinition {
    #[serde(default)]
    pub unit_id: Option<i64>,
    #[serde(default)]
    pub unit_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Study definition attached to a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDefinition {
    #[serde(default)]
    pub study_id: Option<i64>,
    #[serde(default)]
    pub study_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error body sent with 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Extract the `message` field of an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_list_shape() {
        let json = r#"[{"epScenarioId": 5, "epScenarioDescription": "Base case"},
                       {"epScenarioId": 7}]"#;
        let list: Vec<ScenarioSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ep_scenario_description, "Base case");
        assert_eq!(list[1].ep_scenario_id, 7);
        assert!(list[1].ep_scenario_description.is_empty());
    }

    #[test]
    fn test_details_keep_unknown_columns() {
        let json = r#"{
            "scenario": {"epScenarioId": 5, "epScenarioDescription": "Base", "planningHorizon": 20},
            "units": [{"unitId": 1, "unitName": "CCGT 1", "capacityMw": 500}],
            "studies": [{"studyId": 3, "studyName": "Reliability"}]
        }"#;
        let details: ScenarioDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.scenario.extra["planningHorizon"], 20);
        assert_eq!(details.units[0].unit_name, "CCGT 1");
        assert_eq!(details.units[0].extra["capacityMw"], 500);
        assert_eq!(details.studies[0].study_name, "Reliability");
        assert!(details.escalating_rates.is_empty());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message": "Scenario not found"}"#),
            "Scenario not found"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(r#"{"message": ""}"#), r#"{"message": ""}"#);
    }
}
