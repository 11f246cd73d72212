// TeamCity service message formatting
// https://www.jetbrains.com/help/teamcity/service-messages.html

use std::fmt;

/// Service message kinds emitted by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Message,
    TestRetrySupport,
    TestStarted,
    TestFailed,
    TestIgnored,
    TestFinished,
    TestStdOut,
    TestStdErr,
    TestMetadata,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::TestRetrySupport => "testRetrySupport",
            MessageKind::TestStarted => "testStarted",
            MessageKind::TestFailed => "testFailed",
            MessageKind::TestIgnored => "testIgnored",
            MessageKind::TestFinished => "testFinished",
            MessageKind::TestStdOut => "testStdOut",
            MessageKind::TestStdErr => "testStdErr",
            MessageKind::TestMetadata => "testMetadata",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service message: kind plus ordered attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    kind: MessageKind,
    attributes: Vec<(&'static str, String)>,
}

impl ServiceMessage {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Raw (unescaped) value of the first attribute with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "##teamcity[{}", self.kind)?;
        for (key, value) in &self.attributes {
            write!(f, " {}='{}'", key, escape(value))?;
        }
        f.write_str("]")
    }
}

/// Escape an attribute value so it cannot end the value or the line early
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            '\u{0085}' => escaped.push_str("|x"),
            '\u{2028}' => escaped.push_str("|l"),
            '\u{2029}' => escaped.push_str("|p"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_attributes() {
        let message = ServiceMessage::new(MessageKind::TestStarted);
        assert_eq!(message.to_string(), "##teamcity[testStarted]");
    }

    #[test]
    fn test_render_keeps_attribute_order() {
        let message = ServiceMessage::new(MessageKind::TestFinished)
            .attr("name", "suite › case")
            .attr("duration", "42")
            .attr("flowId", "abc");

        assert_eq!(
            message.to_string(),
            "##teamcity[testFinished name='suite › case' duration='42' flowId='abc']"
        );
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("it's"), "it|'s");
        assert_eq!(escape("a|b"), "a||b");
        assert_eq!(escape("line1\nline2\r"), "line1|nline2|r");
        assert_eq!(escape("[x]"), "|[x|]");
        assert_eq!(escape("\u{0085}\u{2028}\u{2029}"), "|x|l|p");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn test_rendered_message_is_single_line() {
        let message = ServiceMessage::new(MessageKind::TestFailed)
            .attr("message", "expected 'a'\n]got b[")
            .attr("details", "at foo (x.ts:1:1)\r\nat bar");

        let rendered = message.to_string();

        assert!(!rendered.contains('\n'));
        assert!(!rendered.contains('\r'));
        assert!(rendered.ends_with("']"));
        assert_eq!(message.get("message"), Some("expected 'a'\n]got b["));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MessageKind::TestStdOut.as_str(), "testStdOut");
        assert_eq!(MessageKind::TestRetrySupport.to_string(), "testRetrySupport");
        assert_eq!(MessageKind::Message.as_str(), "message");
    }
}
