use super::decode::PROJECTED_VERIFICATIONS_KEY;
use super::value::{TreeMap, TreeValue};
use crate::error::TreeError;
use crate::model::{
    CustomMessage, ExpectedInput, Flow, FlowConfig, Messages, ResponseOption, Step, Verification,
};
use chrono::{DateTime, Utc};

/// Fixed display format for timestamps: millisecond precision, UTC, literal `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Projects a `Flow` into an attribute tree.
///
/// `creation_date` and `update_date` are display fields the host always
/// expects, so a null value fails with `NilTimestamp` instead of becoming an
/// empty string. The version window and business hours are omitted when unset,
/// and so is the verification list when it is `None`.
pub fn encode_flow(flow: &Flow) -> Result<TreeValue, TreeError> {
    encode_flow_fields(flow).map(TreeValue::Map)
}

/// Same as [`encode_flow`], returning the top-level map unwrapped.
pub fn encode_flow_fields(flow: &Flow) -> Result<TreeMap, TreeError> {
    let mut fields = TreeMap::new();
    fields.insert("flow_id".into(), flow.flow_id.as_str().into());
    fields.insert("client_id".into(), flow.client_id.as_str().into());
    fields.insert("version".into(), flow.version.into());
    fields.insert("name".into(), flow.name.as_str().into());
    fields.insert("status".into(), flow.status.as_str().into());
    fields.insert("type".into(), flow.flow_type.as_str().into());
    fields.insert(
        "creation_date".into(),
        required_timestamp("creation_date", flow.creation_date.as_ref())?,
    );
    fields.insert(
        "update_date".into(),
        required_timestamp("update_date", flow.update_date.as_ref())?,
    );
    insert_timestamp(&mut fields, "version_start_date", flow.version_start_date.as_ref());
    insert_timestamp(&mut fields, "version_end_date", flow.version_end_date.as_ref());

    if let Some(config) = &flow.config {
        fields.insert("config".into(), block(encode_config(config)));
    }

    if let Some(verifications) = &flow.identity_verifications {
        fields.insert(
            PROJECTED_VERIFICATIONS_KEY.into(),
            list(verifications, encode_verification),
        );
    }

    Ok(fields)
}

/// Projects a flow config into the body of its single-element `config` block.
pub fn encode_config(config: &FlowConfig) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert("lang".into(), config.lang.as_str().into());
    fields.insert("enable_desktop_flow".into(), config.enable_desktop_flow.into());
    fields.insert(
        "continue_flow_in_new_device".into(),
        config.continue_flow_in_new_device.into(),
    );
    fields.insert("enable_follow_up".into(), config.enable_follow_up.into());
    fields.insert("follow_up_delay".into(), config.follow_up_delay.into());
    fields.insert(
        "follow_up_message".into(),
        config.follow_up_message.as_str().into(),
    );
    insert_timestamp(&mut fields, "start_business_hours", config.start_business_hours.as_ref());
    insert_timestamp(&mut fields, "end_business_hours", config.end_business_hours.as_ref());

    if let Some(messages) = &config.messages {
        fields.insert("messages".into(), block(encode_messages(messages)));
    }

    fields
}

fn encode_messages(messages: &Messages) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert("failure_message".into(), messages.failure_message.as_str().into());
    fields.insert("success_message".into(), messages.success_message.as_str().into());
    fields.insert("pending_message".into(), messages.pending_message.as_str().into());
    fields.insert("exit_message".into(), messages.exit_message.as_str().into());
    fields.insert(
        "waiting_for_results_message".into(),
        messages.waiting_for_results_message.as_str().into(),
    );
    fields.insert(
        "custom_messages".into(),
        list(&messages.custom_messages, encode_custom_message),
    );
    fields
}

fn encode_custom_message(message: &CustomMessage) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert("message".into(), message.message.as_str().into());
    fields.insert("status".into(), message.status.as_str().into());
    fields
}

/// Projects one verification. Exposed for hosts that display verifications on their own.
pub fn encode_verification(verification: &Verification) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert(
        "verification_id".into(),
        verification.verification_id.as_str().into(),
    );
    fields.insert("name".into(), verification.name.as_str().into());
    fields.insert(
        "config".into(),
        TreeValue::Map(
            verification
                .config
                .iter()
                .filter_map(|(k, v)| TreeValue::from_json(v).map(|v| (k.clone(), v)))
                .collect(),
        ),
    );
    fields.insert(
        "logic".into(),
        TreeValue::List(
            verification
                .logic
                .iter()
                .map(|condition| condition.as_str().into())
                .collect(),
        ),
    );
    fields.insert("steps".into(), list(&verification.steps, encode_step));
    fields
}

fn encode_step(step: &Step) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert("step_id".into(), step.step_id.as_str().into());
    fields.insert("type".into(), step.step_type.as_str().into());
    fields.insert("title".into(), step.title.as_str().into());
    fields.insert("description".into(), step.description.as_str().into());
    fields.insert(
        "expected_inputs".into(),
        list(&step.expected_inputs, encode_expected_input),
    );
    fields
}

fn encode_expected_input(input: &ExpectedInput) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert("type".into(), input.input_type.as_str().into());
    fields.insert("name".into(), input.name.as_str().into());
    fields.insert(
        "response_options".into(),
        list(&input.response_options, encode_response_option),
    );
    fields
}

fn encode_response_option(option: &ResponseOption) -> TreeMap {
    let mut fields = TreeMap::new();
    fields.insert("value".into(), option.value.as_str().into());
    fields.insert("alias".into(), option.alias.as_str().into());
    fields
}

fn list<T>(items: &[T], encode: impl Fn(&T) -> TreeMap) -> TreeValue {
    TreeValue::List(items.iter().map(|item| TreeValue::Map(encode(item))).collect())
}

fn block(fields: TreeMap) -> TreeValue {
    TreeValue::List(vec![TreeValue::Map(fields)])
}

fn required_timestamp(
    field: &str,
    timestamp: Option<&DateTime<Utc>>,
) -> Result<TreeValue, TreeError> {
    timestamp
        .map(|t| TreeValue::Str(format_timestamp(t)))
        .ok_or_else(|| TreeError::NilTimestamp {
            field: field.to_string(),
        })
}

fn insert_timestamp(fields: &mut TreeMap, key: &str, timestamp: Option<&DateTime<Utc>>) {
    if let Some(t) = timestamp {
        fields.insert(key.into(), TreeValue::Str(format_timestamp(t)));
    }
}
