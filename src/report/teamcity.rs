// TeamCity reporter - writes service messages for every lifecycle event

use super::Reporter;
use super::attachment::{attachment_type, attachment_value};
use super::flow::FlowIds;
use super::service_message::{MessageKind, ServiceMessage};
use crate::config::ReporterConfig;
use crate::error::{ReporterError, Result};
use crate::model::{
    Attachment, FlowKey, FullConfig, FullResult, Payload, Suite, TestCase, TestError, TestResult,
    TestStatus, TestStep,
};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

type Sink = Mutex<Box<dyn Write + Send>>;

/// TeamCity reporter
pub struct TeamcityReporter {
    config: ReporterConfig,
    flow_ids: FlowIds,
    suite: Mutex<Option<Suite>>,
    out: Sink,
    err: Sink,
}

impl TeamcityReporter {
    /// Create a reporter writing to the process stdout and stderr
    pub fn new(config: ReporterConfig) -> Self {
        Self::with_writers(config, io::stdout(), io::stderr())
    }

    /// Create a reporter writing to the given streams
    pub fn with_writers(
        config: ReporterConfig,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        Self {
            config,
            flow_ids: FlowIds::new(),
            suite: Mutex::new(None),
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }

    /// Root suite stored at run begin
    pub fn suite(&self) -> Option<Suite> {
        lock(&self.suite).clone()
    }

    /// Flow id used for a test or step identity
    pub fn flow_id(&self, key: &FlowKey) -> String {
        self.flow_ids.get_or_create(key)
    }

    fn write_message(&self, message: &ServiceMessage) {
        self.write_line(&self.out, &message.to_string());
    }

    fn write_test_flow(&self, kind: MessageKind, key: &FlowKey, parts: &[(&'static str, String)]) {
        let mut message = ServiceMessage::new(kind).attr("name", key.name());
        for (attr, value) in parts {
            message = message.attr(*attr, value.as_str());
        }
        let message = message.attr("flowId", self.flow_id(key));
        self.write_message(&message);
    }

    fn write_attachment(&self, test: &TestCase, attachment: &Attachment) {
        let key = test.flow_key();
        let message = ServiceMessage::new(MessageKind::TestMetadata)
            .attr("type", attachment_type(&attachment.content_type))
            .attr("testName", key.name())
            .attr("name", attachment.name.as_str())
            .attr(
                "value",
                attachment_value(attachment, &self.config.test_metadata_artifacts),
            )
            .attr("flowId", self.flow_id(&key));
        self.write_message(&message);
    }

    fn write_line(&self, sink: &Sink, line: &str) {
        let mut writer = lock(sink);
        let written = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        if let Err(e) = written {
            warn!("Failed to write reporter output: {}", e);
        }
    }

    fn write_raw(&self, sink: &Sink, bytes: &[u8]) {
        let mut writer = lock(sink);
        let written = writer.write_all(bytes).and_then(|_| writer.flush());
        if let Err(e) = written {
            warn!("Failed to write reporter output: {}", e);
        }
    }

    fn failure_parts(error: Option<&TestError>, message: String) -> [(&'static str, String); 2] {
        [
            ("message", message),
            (
                "details",
                error.map(TestError::stack_or_empty).unwrap_or_default().to_string(),
            ),
        ]
    }
}

impl Reporter for TeamcityReporter {
    fn on_begin(&self, config: &FullConfig, suite: &Suite) {
        if self.config.log_config {
            match serde_json::to_string(config.as_value()) {
                Ok(text) => {
                    self.write_message(&ServiceMessage::new(MessageKind::Message).attr("text", text))
                }
                Err(e) => warn!("Failed to serialize run configuration: {}", e),
            }
        }

        // https://www.jetbrains.com/help/teamcity/service-messages.html#Enabling+Test+Retry
        if config.retries_enabled() {
            self.write_message(
                &ServiceMessage::new(MessageKind::TestRetrySupport).attr("enabled", "true"),
            );
        }

        debug!("Run started with {} tests", suite.total_tests());
        *lock(&self.suite) = Some(suite.clone());
    }

    fn on_test_begin(&self, test: &TestCase) {
        self.write_test_flow(MessageKind::TestStarted, &test.flow_key(), &[]);
    }

    fn on_step_begin(&self, test: &TestCase, _result: Option<&TestResult>, step: &TestStep) {
        self.write_test_flow(MessageKind::TestStarted, &step.flow_key(test), &[]);
    }

    fn on_std_out(&self, chunk: &Payload, test: Option<&TestCase>) {
        match test {
            Some(test) => self.write_test_flow(
                MessageKind::TestStdOut,
                &test.flow_key(),
                &[("out", chunk.to_text())],
            ),
            None => self.write_raw(&self.out, chunk.as_bytes()),
        }
    }

    fn on_std_err(&self, chunk: &Payload, test: Option<&TestCase>) {
        match test {
            Some(test) => self.write_test_flow(
                MessageKind::TestStdErr,
                &test.flow_key(),
                &[("out", chunk.to_text())],
            ),
            None => self.write_raw(&self.err, chunk.as_bytes()),
        }
    }

    fn on_step_end(&self, test: &TestCase, _result: Option<&TestResult>, step: &TestStep) {
        let key = step.flow_key(test);

        if let Some(error) = &step.error {
            let parts = Self::failure_parts(Some(error), error.message_or_empty().to_string());
            self.write_test_flow(MessageKind::TestFailed, &key, &parts);
        }

        self.write_test_flow(
            MessageKind::TestFinished,
            &key,
            &[("duration", step.duration.to_string())],
        );
    }

    fn on_test_end(&self, test: &TestCase, result: &TestResult) -> Result<()> {
        let key = test.flow_key();
        let error = result.error.as_ref();

        match &result.status {
            TestStatus::Skipped => self.write_test_flow(
                MessageKind::TestIgnored,
                &key,
                &[("message", "skipped".to_string())],
            ),
            TestStatus::TimedOut => {
                let parts =
                    Self::failure_parts(error, format!("Timeout of {}ms exceeded.", test.timeout));
                self.write_test_flow(MessageKind::TestFailed, &key, &parts);
            }
            TestStatus::Failed => {
                let message = error
                    .map(TestError::message_or_empty)
                    .unwrap_or_default()
                    .to_string();
                let parts = Self::failure_parts(error, message);
                self.write_test_flow(MessageKind::TestFailed, &key, &parts);
            }
            TestStatus::Passed => {}
            status @ (TestStatus::Interrupted | TestStatus::Other(_)) => {
                return Err(ReporterError::NotImplemented(status.to_string()));
            }
        }

        for attachment in &result.attachments {
            self.write_attachment(test, attachment);
        }

        self.write_test_flow(
            MessageKind::TestFinished,
            &key,
            &[("duration", result.duration.to_string())],
        );

        Ok(())
    }

    fn on_error(&self, error: &TestError) {
        match serde_json::to_string(error) {
            Ok(text) => self.write_line(&self.err, &text),
            Err(e) => warn!("Failed to serialize engine error: {}", e),
        }
    }

    fn on_end(&self, result: &FullResult) {
        self.write_line(&self.out, &format!("Finished the run: {}", result.status));
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
