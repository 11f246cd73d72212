// Diagnostic logging. Everything goes to stderr: stdout carries service messages.

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub struct ReporterFormatter;

impl<S, N> FormatEvent<S, N> for ReporterFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let timestamp = Local::now().format("%H:%M:%S");

        let (emoji, level) = match *event.metadata().level() {
            Level::TRACE => ("🔬", "TRACE"),
            Level::DEBUG => ("🐛", "DEBUG"),
            Level::INFO => ("ℹ️ ", "INFO"),
            Level::WARN => ("⚠️ ", "WARN"),
            Level::ERROR => ("❌", "ERROR"),
        };

        write!(writer, "{} {} [{}] teamcity-reporter: ", emoji, level, timestamp)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Default filter directive for the given verbosity
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "teamcity_reporter=debug,warn"
    } else {
        "teamcity_reporter=warn,error"
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A subscriber may already be installed when embedded in another binary
    let _ = tracing_subscriber::fmt()
        .event_format(ReporterFormatter)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
