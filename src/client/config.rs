use std::fmt;
use std::time::Duration;

pub const API_KEY_ENV: &str = "TRUORA_API_KEY";
pub const API_SERVER_ENV: &str = "TRUORA_API_SERVER";
pub const DEFAULT_API_SERVER: &str = "https://api.identity.truora.com";

/// Settings for a [`FlowClient`](super::FlowClient).
///
/// Nothing is validated here. Both the key and the server are checked when
/// the client is constructed.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_server: String,
    /// Per-request timeout applied by the default transport.
    pub timeout: Option<Duration>,
    /// Reject non-2xx responses on read instead of decoding their body.
    pub strict_reads: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_server: DEFAULT_API_SERVER.to_string(),
            timeout: None,
            strict_reads: false,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, api_server: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_server: api_server.into(),
            ..Self::default()
        }
    }

    /// Reads `TRUORA_API_KEY` and `TRUORA_API_SERVER` from the process environment.
    pub fn from_env() -> Self {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Resolves the key and server through `lookup`. An unset server falls back to the default.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup(API_KEY_ENV).unwrap_or_default(),
            api_server: lookup(API_SERVER_ENV).unwrap_or_else(|| DEFAULT_API_SERVER.to_string()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_server(mut self, api_server: impl Into<String>) -> Self {
        self.api_server = api_server.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_strict_reads(mut self, strict_reads: bool) -> Self {
        self.strict_reads = strict_reads;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_server", &self.api_server)
            .field("timeout", &self.timeout)
            .field("strict_reads", &self.strict_reads)
            .finish()
    }
}
