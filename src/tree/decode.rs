use super::path::FieldPath;
use super::value::{TreeMap, TreeValue};
use crate::error::TreeError;
use crate::model::{
    CustomMessage, DEFAULT_FLOW_TYPE, DEFAULT_LANG, ExpectedInput, Flow, FlowConfig, Messages,
    ResponseOption, Step, Verification, parse_timestamp,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Key under which a declaration lists its verifications.
pub const DECLARED_VERIFICATIONS_KEY: &str = "verification";

/// Key under which projected state lists its verifications.
pub const PROJECTED_VERIFICATIONS_KEY: &str = "identity_verifications";

/// Builds a `Flow` from an attribute tree.
///
/// Verifications are read from `verification`, falling back to
/// `identity_verifications` so projected state decodes as well. An absent
/// list decodes to `None`, a present but empty list to `Some(vec![])`.
pub fn decode_flow(tree: &TreeValue) -> Result<Flow, TreeError> {
    let node = Node::new(tree, FieldPath::root())?;

    let identity_verifications = match node.each(DECLARED_VERIFICATIONS_KEY, decode_verification)? {
        Some(verifications) => Some(verifications),
        None => node.each(PROJECTED_VERIFICATIONS_KEY, decode_verification)?,
    };

    Ok(Flow {
        flow_id: node.optional_str("flow_id")?,
        client_id: node.optional_str("client_id")?,
        version: node.optional_int("version")?,
        name: node.required_str("name")?,
        status: node.optional_str("status")?,
        flow_type: node.str_or("type", DEFAULT_FLOW_TYPE)?,
        creation_date: node.optional_timestamp("creation_date")?,
        update_date: node.optional_timestamp("update_date")?,
        version_start_date: node.optional_timestamp("version_start_date")?,
        version_end_date: node.optional_timestamp("version_end_date")?,
        config: node.block("config")?.map(decode_config).transpose()?,
        identity_verifications,
    })
}

fn decode_config(node: Node<'_>) -> Result<FlowConfig, TreeError> {
    // follow_up_delay and follow_up_message only make sense alongside the toggle.
    if !node.contains("enable_follow_up")
        && (node.contains("follow_up_delay") || node.contains("follow_up_message"))
    {
        return Err(node.missing("enable_follow_up"));
    }

    Ok(FlowConfig {
        lang: node.str_or("lang", DEFAULT_LANG)?,
        enable_desktop_flow: node.required_bool("enable_desktop_flow")?,
        continue_flow_in_new_device: node.optional_bool("continue_flow_in_new_device")?,
        enable_follow_up: node.optional_bool("enable_follow_up")?,
        follow_up_delay: node.optional_int("follow_up_delay")?,
        follow_up_message: node.optional_str("follow_up_message")?,
        start_business_hours: node.optional_timestamp("start_business_hours")?,
        end_business_hours: node.optional_timestamp("end_business_hours")?,
        messages: node.block("messages")?.map(decode_messages).transpose()?,
    })
}

fn decode_messages(node: Node<'_>) -> Result<Messages, TreeError> {
    Ok(Messages {
        failure_message: node.optional_str("failure_message")?,
        success_message: node.optional_str("success_message")?,
        pending_message: node.optional_str("pending_message")?,
        exit_message: node.optional_str("exit_message")?,
        waiting_for_results_message: node.optional_str("waiting_for_results_message")?,
        custom_messages: node
            .each("custom_messages", decode_custom_message)?
            .unwrap_or_default(),
    })
}

fn decode_custom_message(node: Node<'_>) -> Result<CustomMessage, TreeError> {
    Ok(CustomMessage {
        message: node.required_str("message")?,
        status: node.required_str("status")?,
    })
}

fn decode_verification(node: Node<'_>) -> Result<Verification, TreeError> {
    Ok(Verification {
        verification_id: node.optional_str("verification_id")?,
        name: node.required_str("name")?,
        config: node.opaque_map("config")?,
        steps: node.each("steps", decode_step)?.unwrap_or_default(),
        logic: node.strings("logic")?,
    })
}

fn decode_step(node: Node<'_>) -> Result<Step, TreeError> {
    Ok(Step {
        step_id: node.optional_str("step_id")?,
        step_type: node.required_str("type")?,
        title: node.optional_str("title")?,
        description: node.optional_str("description")?,
        expected_inputs: node
            .each("expected_inputs", decode_expected_input)?
            .unwrap_or_default(),
    })
}

fn decode_expected_input(node: Node<'_>) -> Result<ExpectedInput, TreeError> {
    Ok(ExpectedInput {
        input_type: node.required_str("type")?,
        name: node.required_str("name")?,
        response_options: node
            .each("response_options", decode_response_option)?
            .unwrap_or_default(),
    })
}

fn decode_response_option(node: Node<'_>) -> Result<ResponseOption, TreeError> {
    Ok(ResponseOption {
        value: node.required_str("value")?,
        alias: node.optional_str("alias")?,
    })
}

/// A map node together with its location, offering typed field accessors.
struct Node<'a> {
    fields: &'a TreeMap,
    path: FieldPath,
}

impl<'a> Node<'a> {
    fn new(value: &'a TreeValue, path: FieldPath) -> Result<Self, TreeError> {
        match value {
            TreeValue::Map(fields) => Ok(Self { fields, path }),
            other => Err(mismatch(&path, "map", other)),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    fn missing(&self, key: &str) -> TreeError {
        TreeError::MissingRequiredField {
            path: self.path.key(key).to_string(),
        }
    }

    fn str_field(&self, key: &str) -> Result<Option<String>, TreeError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(TreeValue::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mismatch(&self.path.key(key), "string", other)),
        }
    }

    fn required_str(&self, key: &str) -> Result<String, TreeError> {
        self.str_field(key)?.ok_or_else(|| self.missing(key))
    }

    fn optional_str(&self, key: &str) -> Result<String, TreeError> {
        Ok(self.str_field(key)?.unwrap_or_default())
    }

    fn str_or(&self, key: &str, default: &str) -> Result<String, TreeError> {
        Ok(self
            .str_field(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn bool_field(&self, key: &str) -> Result<Option<bool>, TreeError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(TreeValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch(&self.path.key(key), "bool", other)),
        }
    }

    fn required_bool(&self, key: &str) -> Result<bool, TreeError> {
        self.bool_field(key)?.ok_or_else(|| self.missing(key))
    }

    fn optional_bool(&self, key: &str) -> Result<bool, TreeError> {
        Ok(self.bool_field(key)?.unwrap_or_default())
    }

    fn optional_int(&self, key: &str) -> Result<i64, TreeError> {
        match self.fields.get(key) {
            None => Ok(0),
            Some(TreeValue::Int(i)) => Ok(*i),
            Some(other) => Err(mismatch(&self.path.key(key), "integer", other)),
        }
    }

    /// Timestamps are RFC 3339 strings. One that does not parse reads as unset.
    fn optional_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, TreeError> {
        Ok(self.str_field(key)?.as_deref().and_then(parse_timestamp))
    }

    fn list(&self, key: &str) -> Result<Option<&'a [TreeValue]>, TreeError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(TreeValue::List(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(mismatch(&self.path.key(key), "list", other)),
        }
    }

    /// Decodes every element of a list of map nodes, preserving order.
    fn each<T>(
        &self,
        key: &str,
        decode: impl Fn(Node<'a>) -> Result<T, TreeError>,
    ) -> Result<Option<Vec<T>>, TreeError> {
        let Some(items) = self.list(key)? else {
            return Ok(None);
        };
        let list_path = self.path.key(key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Node::new(item, list_path.index(i)).and_then(&decode))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// A nested block is written as a single-element list. An empty list counts as absent.
    fn block(&self, key: &str) -> Result<Option<Node<'a>>, TreeError> {
        let Some(value) = self.fields.get(key) else {
            return Ok(None);
        };
        match value {
            TreeValue::List(items) => items
                .first()
                .map(|item| Node::new(item, self.path.key(key).index(0)))
                .transpose(),
            TreeValue::Map(_) => Node::new(value, self.path.key(key)).map(Some),
            other => Err(mismatch(&self.path.key(key), "block", other)),
        }
    }

    fn strings(&self, key: &str) -> Result<Vec<String>, TreeError> {
        let Some(items) = self.list(key)? else {
            return Ok(Vec::new());
        };
        let list_path = self.path.key(key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                TreeValue::Str(s) => Ok(s.clone()),
                other => Err(mismatch(&list_path.index(i), "string", other)),
            })
            .collect()
    }

    fn opaque_map(&self, key: &str) -> Result<BTreeMap<String, serde_json::Value>, TreeError> {
        match self.fields.get(key) {
            None => Ok(BTreeMap::new()),
            Some(TreeValue::Map(map)) => Ok(map
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect()),
            Some(other) => Err(mismatch(&self.path.key(key), "map", other)),
        }
    }
}

fn mismatch(path: &FieldPath, expected: &'static str, found: &TreeValue) -> TreeError {
    TreeError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}
