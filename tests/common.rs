//! Common test utilities: flow fixtures and a scripted transport.
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use truora_flow::prelude::*;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_SERVER: &str = "https://api.example.test";

/// A transport that replays canned responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<std::result::Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response left".to_string())))
    }
}

/// Builds a client against the test server using the given transport.
#[allow(dead_code)]
pub fn client_with(transport: ScriptedTransport) -> FlowClient<ScriptedTransport> {
    FlowClient::new(ClientConfig::new(TEST_API_KEY, TEST_SERVER), transport)
        .expect("test configuration is complete")
}

/// Converts a JSON literal into an attribute tree.
#[allow(dead_code)]
pub fn tree(value: serde_json::Value) -> TreeValue {
    TreeValue::from_json(&value).expect("tree literal is not null")
}

/// 2024-03-01T12:00:00.500Z
#[allow(dead_code)]
pub fn half_past_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::milliseconds(500)
}

/// The declared configuration from the end-to-end example, as an attribute tree.
#[allow(dead_code)]
pub fn kyc_attributes() -> TreeValue {
    tree(json!({
        "name": "KYC basic",
        "type": "permanent",
        "verification": [{
            "name": "id-check",
            "steps": [{
                "type": "document",
                "expected_inputs": [{ "type": "file", "name": "id_front" }]
            }]
        }]
    }))
}

/// The flow `kyc_attributes` is expected to decode into.
#[allow(dead_code)]
pub fn kyc_flow() -> Flow {
    let mut step = Step::new("document");
    step.expected_inputs = vec![ExpectedInput::new("file", "id_front")];

    let mut verification = Verification::new("id-check");
    verification.steps = vec![step];

    let mut flow = Flow::new("KYC basic");
    flow.identity_verifications = Some(vec![verification]);
    flow
}

/// A flow with every field populated, as the server would return it.
#[allow(dead_code)]
pub fn full_flow() -> Flow {
    let mut config = std::collections::BTreeMap::new();
    config.insert("country".to_string(), json!("CO"));
    config.insert("retries".to_string(), json!(3));
    config.insert("threshold".to_string(), json!(0.8));
    config.insert("document_types".to_string(), json!(["national-id", "passport"]));

    Flow {
        flow_id: "IPF0001".to_string(),
        client_id: "TCI0001".to_string(),
        version: 3,
        name: "Onboarding".to_string(),
        status: "active".to_string(),
        flow_type: "permanent".to_string(),
        creation_date: Some(half_past_noon()),
        update_date: Some(half_past_noon() + Duration::days(2)),
        version_start_date: Some(half_past_noon() + Duration::days(2)),
        version_end_date: None,
        config: Some(FlowConfig {
            lang: "en".to_string(),
            enable_desktop_flow: true,
            continue_flow_in_new_device: true,
            enable_follow_up: true,
            follow_up_delay: 3600,
            follow_up_message: "Come back to finish".to_string(),
            start_business_hours: Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()),
            end_business_hours: Some(Utc.with_ymd_and_hms(2024, 1, 1, 18, 30, 0).unwrap()),
            messages: Some(Messages {
                failure_message: "We could not verify you".to_string(),
                success_message: "Verified".to_string(),
                pending_message: "Hang on".to_string(),
                exit_message: "Bye".to_string(),
                waiting_for_results_message: "Processing".to_string(),
                custom_messages: vec![
                    CustomMessage {
                        message: "Expired document".to_string(),
                        status: "expired".to_string(),
                    },
                    CustomMessage {
                        message: "Manual review".to_string(),
                        status: "pending_review".to_string(),
                    },
                ],
            }),
        }),
        identity_verifications: Some(vec![
            Verification {
                verification_id: "VRF-1".to_string(),
                name: "document-validation".to_string(),
                config,
                steps: vec![
                    Step {
                        step_id: "STP-1".to_string(),
                        step_type: "document".to_string(),
                        title: "Your ID".to_string(),
                        description: "Take a picture of both sides".to_string(),
                        expected_inputs: vec![
                            ExpectedInput::new("file", "id_front"),
                            ExpectedInput::new("file", "id_back"),
                        ],
                    },
                    Step {
                        step_id: "STP-2".to_string(),
                        step_type: "question".to_string(),
                        title: String::new(),
                        description: String::new(),
                        expected_inputs: vec![ExpectedInput {
                            input_type: "choice".to_string(),
                            name: "document_country".to_string(),
                            response_options: vec![
                                ResponseOption {
                                    value: "CO".to_string(),
                                    alias: "Colombia".to_string(),
                                },
                                ResponseOption {
                                    value: "MX".to_string(),
                                    alias: String::new(),
                                },
                            ],
                        }],
                    },
                ],
                logic: vec![
                    "document_country == 'CO'".to_string(),
                    "score > 0.7".to_string(),
                ],
            },
            Verification::new("face-recognition"),
        ]),
    }
}

/// A server response body for a flow with the given id and version.
#[allow(dead_code)]
pub fn remote_flow_body(flow_id: &str, version: i64) -> String {
    json!({
        "flow_id": flow_id,
        "client_id": "TCI0001",
        "version": version,
        "name": "KYC basic",
        "status": "draft",
        "type": "permanent",
        "creation_date": "2024-03-01T12:00:00.500Z",
        "update_date": "2024-03-02T08:15:00Z",
        "identity_verifications": [{
            "verification_id": "VRF-1",
            "name": "id-check",
            "steps": [{
                "step_id": "STP-1",
                "type": "document",
                "expected_inputs": [{ "type": "file", "name": "id_front" }]
            }]
        }]
    })
    .to_string()
}
