use super::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One identity-check unit within a flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub verification_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form settings, passed through verbatim. Keys render sorted.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_empty_config")]
    pub config: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    /// Condition expressions. Their grammar belongs to the server; only order matters here.
    #[serde(
        rename = "if",
        alias = "logic",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub logic: Vec<String>,
}

impl Verification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn declared_fields(&self) -> Verification {
        Verification {
            verification_id: String::new(),
            name: self.name.clone(),
            config: self.config.clone(),
            steps: self.steps.iter().map(Step::declared_fields).collect(),
            logic: self.logic.clone(),
        }
    }
}

fn is_empty_config(config: &BTreeMap<String, serde_json::Value>) -> bool {
    config.is_empty()
}

/// One screen or prompt within a verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub step_id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub step_type: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub expected_inputs: Vec<ExpectedInput>,
}

impl Step {
    pub fn new(step_type: impl Into<String>) -> Self {
        Self {
            step_type: step_type.into(),
            ..Self::default()
        }
    }

    fn declared_fields(&self) -> Step {
        Step {
            step_id: String::new(),
            ..self.clone()
        }
    }
}

/// One input field requested by a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedInput {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub input_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub response_options: Vec<ResponseOption>,
}

impl ExpectedInput {
    pub fn new(input_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            input_type: input_type.into(),
            name: name.into(),
            response_options: Vec::new(),
        }
    }
}

/// A selectable choice for a choice-type input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseOption {
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub alias: String,
}
