use super::verification::Verification;
use super::{is_false, is_zero, lenient_timestamp, null_as_default};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Flow category used when a declaration does not name one.
pub const DEFAULT_FLOW_TYPE: &str = "permanent";

/// Locale used when a config block does not name one.
pub const DEFAULT_LANG: &str = "es";

fn default_flow_type() -> String {
    DEFAULT_FLOW_TYPE.to_string()
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn flow_type_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_flow_type))
}

fn lang_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_lang))
}

/// A complete identity verification process definition.
///
/// `flow_id`, `client_id`, `version`, `status` and the four timestamps are
/// assigned by the server. They are kept so a document read from the API
/// survives a round trip, but [`Flow::declared_fields`] strips them before
/// anything is sent back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub flow_id: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub version: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(
        rename = "type",
        default = "default_flow_type",
        deserialize_with = "flow_type_or_default"
    )]
    pub flow_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<FlowConfig>,
    /// `None` means "no data", which is distinct from an explicitly empty list.
    #[serde(default)]
    pub identity_verifications: Option<Vec<Verification>>,
}

impl Default for Flow {
    fn default() -> Self {
        Self {
            flow_id: String::new(),
            client_id: String::new(),
            version: 0,
            name: String::new(),
            status: String::new(),
            flow_type: default_flow_type(),
            creation_date: None,
            update_date: None,
            version_start_date: None,
            version_end_date: None,
            config: None,
            identity_verifications: None,
        }
    }
}

impl Flow {
    /// Creates a flow with the given name and the default type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy holding only what a user may declare.
    ///
    /// Every server-assigned field is reset, including the identifiers of
    /// nested verifications and steps.
    pub fn declared_fields(&self) -> Flow {
        let identity_verifications = self.identity_verifications.as_ref().map(|verifications| {
            verifications
                .iter()
                .map(Verification::declared_fields)
                .collect()
        });

        Flow {
            name: self.name.clone(),
            flow_type: self.flow_type.clone(),
            config: self.config.clone(),
            identity_verifications,
            ..Flow::default()
        }
    }

    /// Checks the minimum a flow needs before the server will accept it.
    pub fn validate_for_create(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        match &self.identity_verifications {
            Some(verifications) if !verifications.is_empty() => Ok(()),
            _ => Err(ValidationError::NoVerifications),
        }
    }
}

/// Flow-wide behavioral settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default = "default_lang", deserialize_with = "lang_or_default")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enable_desktop_flow: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub continue_flow_in_new_device: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub enable_follow_up: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub follow_up_delay: i64,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub follow_up_message: String,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub start_business_hours: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub end_business_hours: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Messages>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            enable_desktop_flow: false,
            continue_flow_in_new_device: false,
            enable_follow_up: false,
            follow_up_delay: 0,
            follow_up_message: String::new(),
            start_business_hours: None,
            end_business_hours: None,
            messages: None,
        }
    }
}

/// Per-outcome user-facing text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub failure_message: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub success_message: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub pending_message: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub exit_message: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub waiting_for_results_message: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub custom_messages: Vec<CustomMessage>,
}

/// A message shown when the flow ends in one specific status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}
