// Report module - test runner lifecycle to TeamCity service messages

pub mod attachment;
pub mod flow;
pub mod service_message;
pub mod teamcity;

use crate::error::Result;
use crate::model::{FullConfig, FullResult, Payload, Suite, TestCase, TestError, TestResult, TestStep};
pub use flow::FlowIds;
pub use service_message::{MessageKind, ServiceMessage};
pub use teamcity::TeamcityReporter;

/// Reporter trait, one method per engine lifecycle event
pub trait Reporter: Send + Sync {
    /// Whether the reporter writes to stdio itself
    fn prints_to_stdio(&self) -> bool {
        true
    }

    /// Called once before any test runs
    fn on_begin(&self, config: &FullConfig, suite: &Suite);

    /// Called when a test starts
    fn on_test_begin(&self, test: &TestCase);

    /// Called when a step inside a test starts
    fn on_step_begin(&self, test: &TestCase, result: Option<&TestResult>, step: &TestStep);

    /// Called for every stdout chunk, with the owning test if known
    fn on_std_out(&self, chunk: &Payload, test: Option<&TestCase>);

    /// Called for every stderr chunk, with the owning test if known
    fn on_std_err(&self, chunk: &Payload, test: Option<&TestCase>);

    /// Called when a step finishes
    fn on_step_end(&self, test: &TestCase, result: Option<&TestResult>, step: &TestStep);

    /// Called when a test finishes
    fn on_test_end(&self, test: &TestCase, result: &TestResult) -> Result<()>;

    /// Called for engine-level errors outside any test
    fn on_error(&self, error: &TestError);

    /// Called once after the run
    fn on_end(&self, result: &FullResult);
}
