// Engine events - one JSON object per line
// Each line is tagged with the lifecycle callback it stands for

use crate::error::{ReporterError, Result};
use crate::model::{FullConfig, FullResult, Payload, Suite, TestCase, TestError, TestResult, TestStep};
use crate::report::Reporter;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{debug, warn};

/// Lifecycle event emitted by the test engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    /// Run started
    Begin {
        config: FullConfig,
        #[serde(default)]
        suite: Suite,
    },

    /// Test started
    TestBegin { test: TestCase },

    /// Step started
    StepBegin {
        test: TestCase,
        #[serde(default)]
        result: Option<TestResult>,
        step: TestStep,
    },

    /// Stdout chunk
    StdOut {
        chunk: Payload,
        #[serde(default)]
        test: Option<TestCase>,
    },

    /// Stderr chunk
    StdErr {
        chunk: Payload,
        #[serde(default)]
        test: Option<TestCase>,
    },

    /// Step finished
    StepEnd {
        test: TestCase,
        #[serde(default)]
        result: Option<TestResult>,
        step: TestStep,
    },

    /// Test finished
    TestEnd { test: TestCase, result: TestResult },

    /// Engine error outside any test
    Error { error: TestError },

    /// Run finished
    End { result: FullResult },
}

impl Event {
    /// Hand the event to the matching reporter callback
    pub fn dispatch(&self, reporter: &dyn Reporter) -> Result<()> {
        match self {
            Event::Begin { config, suite } => reporter.on_begin(config, suite),
            Event::TestBegin { test } => reporter.on_test_begin(test),
            Event::StepBegin { test, result, step } => {
                reporter.on_step_begin(test, result.as_ref(), step)
            }
            Event::StdOut { chunk, test } => reporter.on_std_out(chunk, test.as_ref()),
            Event::StdErr { chunk, test } => reporter.on_std_err(chunk, test.as_ref()),
            Event::StepEnd { test, result, step } => {
                reporter.on_step_end(test, result.as_ref(), step)
            }
            Event::TestEnd { test, result } => reporter.on_test_end(test, result)?,
            Event::Error { error } => reporter.on_error(error),
            Event::End { result } => reporter.on_end(result),
        }
        Ok(())
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Event::Begin { .. } => "begin",
            Event::TestBegin { .. } => "testBegin",
            Event::StepBegin { .. } => "stepBegin",
            Event::StdOut { .. } => "stdOut",
            Event::StdErr { .. } => "stdErr",
            Event::StepEnd { .. } => "stepEnd",
            Event::TestEnd { .. } => "testEnd",
            Event::Error { .. } => "error",
            Event::End { .. } => "end",
        }
    }
}

/// Reads newline-delimited events, skipping blank lines
pub struct EventReader<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// 1-based number of the last line read
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(ReporterError::Io(e))),
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(line).map_err(|source| ReporterError::Parse {
                line: self.line_number,
                source,
            }));
        }
    }
}

/// Feed every event from `input` to `reporter`, returning how many were dispatched.
///
/// Lines that do not parse are skipped with a warning. Only a reporter
/// contract violation (an unsupported status) or a failing input stream
/// stops the replay.
pub fn replay<R: BufRead>(input: R, reporter: &dyn Reporter) -> Result<usize> {
    let mut count = 0usize;

    for event in EventReader::new(input) {
        let event = match event {
            Ok(event) => event,
            Err(e @ ReporterError::Parse { .. }) => {
                warn!("Skipping event: {}", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!("Dispatching '{}' event", event.name());
        event.dispatch(reporter)?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestStatus;
    use std::io::Cursor;

    #[test]
    fn test_parse_test_end() {
        let event: Event = serde_json::from_str(
            r#"{"event":"testEnd","test":{"titlePath":["a.spec.ts","works"],"timeout":5000},
                "result":{"status":"timedOut","duration":5001}}"#,
        )
        .expect("event");

        match event {
            Event::TestEnd { test, result } => {
                assert_eq!(test.timeout, 5000);
                assert_eq!(result.status, TestStatus::TimedOut);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_std_out_without_test() {
        let event: Event =
            serde_json::from_str(r#"{"event":"stdOut","chunk":"hello\n"}"#).expect("event");
        assert_eq!(
            event,
            Event::StdOut {
                chunk: Payload::Text("hello\n".to_string()),
                test: None
            }
        );
        assert_eq!(event.name(), "stdOut");
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        assert!(serde_json::from_str::<Event>(r#"{"event":"testPaused"}"#).is_err());
    }

    #[test]
    fn test_reader_skips_blank_lines_and_counts() {
        let input = "\n{\"event\":\"end\",\"result\":{\"status\":\"passed\"}}\n\n   \n";
        let mut reader = EventReader::new(Cursor::new(input));

        let event = reader.next().expect("one event").expect("valid event");
        assert_eq!(event.name(), "end");
        assert_eq!(reader.line_number(), 2);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_reports_line_of_bad_event() {
        let input = "{\"event\":\"end\",\"result\":{\"status\":\"passed\"}}\nnot json\n";
        let mut reader = EventReader::new(Cursor::new(input));

        assert!(reader.next().expect("first").is_ok());
        match reader.next().expect("second") {
            Err(ReporterError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
