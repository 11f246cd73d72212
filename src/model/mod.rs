// Model module - payloads handed over by the test engine
// Mirrors the engine's JSON shapes (camelCase on the wire)

pub mod result;
pub mod test;

pub use result::{Attachment, TestResult, TestStatus};
pub use test::{FlowKey, TestCase, TestStep};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Full run configuration as reported at run begin.
///
/// Only `projects` is interpreted. The received JSON is kept as-is so the
/// configuration dump reproduces exactly what the engine sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct FullConfig {
    pub projects: Vec<ProjectConfig>,
    raw: Value,
}

impl FullConfig {
    /// Configuration holding only the given projects
    pub fn with_projects(projects: Vec<ProjectConfig>) -> Self {
        let raw = json!({
            "projects": projects
                .iter()
                .map(|p| json!({ "name": p.name, "retries": p.retries }))
                .collect::<Vec<_>>()
        });
        Self { projects, raw }
    }

    /// Configuration exactly as received
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Whether any configured project retries failed tests
    pub fn retries_enabled(&self) -> bool {
        self.projects.iter().any(|project| project.retries > 0)
    }
}

impl Default for FullConfig {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            raw: Value::Object(Map::new()),
        }
    }
}

impl TryFrom<Value> for FullConfig {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        #[derive(Deserialize)]
        struct Projects {
            #[serde(default)]
            projects: Vec<ProjectConfig>,
        }

        let Projects { projects } = Projects::deserialize(&raw)?;
        Ok(Self { projects, raw })
    }
}

impl From<FullConfig> for Value {
    fn from(config: FullConfig) -> Self {
        config.raw
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub retries: u32,
}

/// Root of the suite tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub suites: Vec<Suite>,

    #[serde(default)]
    pub tests: Vec<TestCase>,
}

impl Suite {
    /// Count tests in this suite and all nested suites
    pub fn total_tests(&self) -> usize {
        self.tests.len() + self.suites.iter().map(Suite::total_tests).sum::<usize>()
    }
}

/// Engine-level error (also used for test and step failures)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TestError {
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn stack_or_empty(&self) -> &str {
        self.stack.as_deref().unwrap_or_default()
    }
}

/// Final result of the whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullResult {
    pub status: String,
}

/// Output chunk or attachment body.
///
/// The engine sends either a plain string or a serialized buffer
/// (`{"type": "Buffer", "data": [..]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Buffer {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        data: Vec<u8>,
    },
}

impl Payload {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Payload::Buffer {
            kind: Some("Buffer".to_string()),
            data: data.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Buffer { data, .. } => data,
        }
    }

    /// Text form; invalid UTF-8 is replaced rather than rejected
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}
