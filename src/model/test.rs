// Test and step identities

use super::TestError;
use serde::{Deserialize, Serialize};

/// Separator between title path segments in display names
pub const TITLE_SEPARATOR: &str = " › ";

/// A single test as seen by the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Titles from the root suite down to the test itself
    pub title_path: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Configured timeout in milliseconds
    #[serde(default)]
    pub timeout: u64,
}

impl TestCase {
    pub fn new<I, S>(title_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            title_path: title_path.into_iter().map(Into::into).collect(),
            project: None,
            timeout: 0,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn flow_key(&self) -> FlowKey {
        FlowKey {
            project: self.project.clone().unwrap_or_default(),
            path: self.title_path.clone(),
        }
    }

    pub fn name(&self) -> String {
        self.flow_key().name()
    }
}

/// A step inside a running test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    /// Titles of the enclosing steps down to this one, relative to the test
    pub title_path: Vec<String>,

    /// Milliseconds; the engine reports -1 for steps that never finished
    #[serde(default)]
    pub duration: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TestError>,
}

impl TestStep {
    pub fn new<I, S>(title_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title_path: title_path.into_iter().map(Into::into).collect(),
            duration: 0,
            error: None,
        }
    }

    /// Identity of the step: its test's path followed by the step's own path
    pub fn flow_key(&self, test: &TestCase) -> FlowKey {
        let mut key = test.flow_key();
        key.path.extend(self.title_path.iter().cloned());
        key
    }
}

/// Identity of a test or step: project plus hierarchical title path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub project: String,
    pub path: Vec<String>,
}

impl FlowKey {
    /// Display name used in every message about this test or step
    pub fn name(&self) -> String {
        std::iter::once(self.project.as_str())
            .chain(self.path.iter().map(String::as_str))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(TITLE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_skips_empty_segments() {
        let test = TestCase::new(["", "login.spec.ts", "auth", "logs in"]).with_project("chromium");
        assert_eq!(test.name(), "chromium › login.spec.ts › auth › logs in");
    }

    #[test]
    fn test_name_without_project() {
        let test = TestCase::new(["a.spec.ts", "works"]);
        assert_eq!(test.name(), "a.spec.ts › works");
    }

    #[test]
    fn test_step_key_extends_test_key() {
        let test = TestCase::new(["a.spec.ts", "works"]).with_project("firefox");
        let step = TestStep::new(["goto", "wait"]);

        let key = step.flow_key(&test);

        assert_eq!(key.project, "firefox");
        assert_eq!(key.path, vec!["a.spec.ts", "works", "goto", "wait"]);
        assert_ne!(key, test.flow_key());
    }

    #[test]
    fn test_same_title_different_project_is_distinct() {
        let a = TestCase::new(["a.spec.ts", "works"]).with_project("chromium");
        let b = TestCase::new(["a.spec.ts", "works"]).with_project("webkit");
        assert_ne!(a.flow_key(), b.flow_key());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let test: TestCase = serde_json::from_str(
            r#"{"id":"abc","titlePath":["a.spec.ts","works"],"project":"chromium","timeout":5000}"#,
        )
        .expect("test case");
        assert_eq!(test.id.as_deref(), Some("abc"));
        assert_eq!(test.timeout, 5000);
    }
}
