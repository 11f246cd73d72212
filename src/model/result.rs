// Test result structures

use super::{Payload, TestError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub status: TestStatus,

    /// Milliseconds
    #[serde(default)]
    pub duration: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TestError>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl TestResult {
    pub fn new(status: TestStatus, duration: i64) -> Self {
        Self {
            status,
            duration,
            error: None,
            attachments: Vec::new(),
        }
    }

    pub fn passed(duration: i64) -> Self {
        Self::new(TestStatus::Passed, duration)
    }

    pub fn failed(duration: i64, message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self::new(TestStatus::Failed, duration).with_error(TestError {
            message: Some(message.into()),
            stack: Some(stack.into()),
            value: None,
        })
    }

    pub fn with_error(mut self, error: TestError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Test status.
///
/// Unknown wire values are kept in `Other` so the reporter can refuse them
/// instead of the event parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Passed,
    Failed,
    TimedOut,
    Skipped,
    Interrupted,
    Other(String),
}

impl TestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::TimedOut => "timedOut",
            TestStatus::Skipped => "skipped",
            TestStatus::Interrupted => "interrupted",
            TestStatus::Other(status) => status,
        }
    }
}

impl From<String> for TestStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "passed" => TestStatus::Passed,
            "failed" => TestStatus::Failed,
            "timedOut" => TestStatus::TimedOut,
            "skipped" => TestStatus::Skipped,
            "interrupted" => TestStatus::Interrupted,
            _ => TestStatus::Other(status),
        }
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File or inline data attached to a test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,

    #[serde(default)]
    pub content_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Payload>,
}

impl Attachment {
    pub fn from_path(
        name: impl Into<String>,
        content_type: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            path: Some(path.into()),
            body: None,
        }
    }

    pub fn from_body(
        name: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            path: None,
            body: Some(Payload::bytes(body)),
        }
    }
}
