mod common;

use common::*;
use serde_json::{Value, json};
use truora_flow::document::{from_document, from_slice, to_document, to_request_body};
use truora_flow::prelude::*;

#[test]
fn test_document_round_trip_preserves_every_field() {
    let flow = full_flow();
    let rendered = to_document(&flow).unwrap();
    let parsed = from_document(&rendered).unwrap();

    assert_eq!(parsed, flow);
}

#[test]
fn test_wire_tags() {
    let rendered: Value = serde_json::from_str(&to_document(&full_flow()).unwrap()).unwrap();

    assert_eq!(rendered["flow_id"], "IPF0001");
    assert_eq!(rendered["type"], "permanent");
    assert_eq!(rendered["creation_date"], "2024-03-01T12:00:00.500Z");
    assert_eq!(rendered["config"]["enable_desktop_flow"], true);
    assert_eq!(rendered["config"]["messages"]["custom_messages"][1]["status"], "pending_review");

    let verification = &rendered["identity_verifications"][0];
    assert_eq!(verification["if"], json!(["document_country == 'CO'", "score > 0.7"]));
    assert!(verification.get("logic").is_none());
    assert_eq!(verification["steps"][0]["type"], "document");
    assert_eq!(
        verification["steps"][1]["expected_inputs"][0]["response_options"][0],
        json!({ "value": "CO", "alias": "Colombia" })
    );
}

#[test]
fn test_logic_accepted_under_either_tag() {
    let under_if = r#"{"name":"f","identity_verifications":[{"name":"v","if":["a","b"]}]}"#;
    let under_logic = r#"{"name":"f","identity_verifications":[{"name":"v","logic":["a","b"]}]}"#;

    for raw in [under_if, under_logic] {
        let flow = from_document(raw).unwrap();
        let verification = &flow.identity_verifications.unwrap()[0];
        assert_eq!(verification.logic, vec!["a", "b"]);
    }
}

#[test]
fn test_defaults_for_type_and_lang() {
    let flow = from_document(r#"{"name":"f","type":null,"config":{"enable_desktop_flow":false}}"#)
        .unwrap();

    assert_eq!(flow.flow_type, "permanent");
    assert_eq!(flow.config.unwrap().lang, "es");
}

#[test]
fn test_nulls_read_as_zero_values() {
    let flow = from_document(
        r#"{"name":"f","flow_id":null,"version":null,
            "identity_verifications":[{"name":"v","steps":null,"config":null}]}"#,
    )
    .unwrap();

    assert_eq!(flow.flow_id, "");
    assert_eq!(flow.version, 0);
    let verification = &flow.identity_verifications.unwrap()[0];
    assert!(verification.steps.is_empty());
    assert!(verification.config.is_empty());
}

#[test]
fn test_nulls_in_required_strings_read_as_defaults() {
    let flow = from_document(
        r#"{"name":"f",
            "config":{"lang":null,"enable_desktop_flow":true,
                "messages":{"custom_messages":[{"message":null,"status":null}]}},
            "identity_verifications":[{"name":null,"steps":[{"type":null,
                "expected_inputs":[{"type":null,"name":null,
                    "response_options":[{"value":null,"alias":null}]}]}]}]}"#,
    )
    .unwrap();

    let config = flow.config.unwrap();
    assert_eq!(config.lang, "es");
    assert_eq!(
        config.messages.unwrap().custom_messages,
        vec![CustomMessage::default()]
    );

    let verification = &flow.identity_verifications.unwrap()[0];
    assert_eq!(verification.name, "");
    let step = &verification.steps[0];
    assert_eq!(step.step_type, "");
    let input = &step.expected_inputs[0];
    assert_eq!((input.input_type.as_str(), input.name.as_str()), ("", ""));
    assert_eq!(input.response_options, vec![ResponseOption::default()]);
}

#[test]
fn test_required_strings_still_required_when_absent() {
    let result = from_document(r#"{"name":"f","identity_verifications":[{"steps":[]}]}"#);
    assert!(matches!(result, Err(DocumentError::MalformedDocument(_))));
}

#[test]
fn test_verification_config_renders_in_stable_order() {
    let mut flow = kyc_flow();
    let verification = &mut flow.identity_verifications.as_mut().unwrap()[0];
    for (i, key) in ["e", "c", "h", "a", "f", "d", "b", "g"].into_iter().enumerate() {
        verification.config.insert(key.to_string(), json!(i));
    }

    let first = to_document(&flow).unwrap();
    for _ in 0..20 {
        assert_eq!(to_document(&flow).unwrap(), first);
    }
    assert!(first.contains(r#""config":{"a":3,"b":6,"c":1,"d":5,"e":0,"f":4,"g":7,"h":2}"#));
}

#[test]
fn test_absent_and_empty_verifications_stay_distinct() {
    let absent = from_document(r#"{"name":"f"}"#).unwrap();
    let null = from_document(r#"{"name":"f","identity_verifications":null}"#).unwrap();
    let empty = from_document(r#"{"name":"f","identity_verifications":[]}"#).unwrap();

    assert_eq!(absent.identity_verifications, None);
    assert_eq!(null.identity_verifications, None);
    assert_eq!(empty.identity_verifications, Some(vec![]));

    let rendered: Value = serde_json::from_str(&to_document(&empty).unwrap()).unwrap();
    assert_eq!(rendered["identity_verifications"], json!([]));
}

#[test]
fn test_unparseable_business_hours_read_as_unset() {
    let flow = from_document(
        r#"{"name":"f","config":{"enable_desktop_flow":true,
            "start_business_hours":"08:00","end_business_hours":"2024-01-01T18:00:00-05:00"}}"#,
    )
    .unwrap();

    let config = flow.config.unwrap();
    assert_eq!(config.start_business_hours, None);
    assert_eq!(
        config.end_business_hours.map(|t| t.to_rfc3339()),
        Some("2024-01-01T23:00:00+00:00".to_string())
    );
}

#[test]
fn test_malformed_document() {
    for raw in ["", "{", r#"{"name": 42}"#, r#"[1, 2]"#] {
        let result = from_document(raw);
        assert!(
            matches!(result, Err(DocumentError::MalformedDocument(_))),
            "expected {raw:?} to be rejected"
        );
    }
    assert!(matches!(
        from_slice(b"\xff\xfe"),
        Err(DocumentError::MalformedDocument(_))
    ));
}

#[test]
fn test_request_body_omits_server_fields() {
    let body: Value = serde_json::from_str(&to_request_body(&full_flow()).unwrap()).unwrap();

    for field in [
        "flow_id",
        "client_id",
        "version",
        "status",
        "creation_date",
        "update_date",
        "version_start_date",
    ] {
        assert!(body.get(field).is_none(), "{field} should not be sent");
    }

    assert_eq!(body["name"], "Onboarding");
    assert_eq!(body["config"]["follow_up_delay"], 3600);

    let verification = &body["identity_verifications"][0];
    assert!(verification.get("verification_id").is_none());
    assert!(verification["steps"][0].get("step_id").is_none());
    assert_eq!(verification["config"]["retries"], 3);
}

#[test]
fn test_validate_for_create() {
    assert_eq!(kyc_flow().validate_for_create(), Ok(()));

    let mut unnamed = kyc_flow();
    unnamed.name = "  ".to_string();
    assert_eq!(unnamed.validate_for_create(), Err(ValidationError::EmptyName));

    let mut empty = kyc_flow();
    empty.identity_verifications = Some(vec![]);
    assert_eq!(empty.validate_for_create(), Err(ValidationError::NoVerifications));

    assert_eq!(
        Flow::new("no verifications").validate_for_create(),
        Err(ValidationError::NoVerifications)
    );
}
