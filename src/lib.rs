pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod report;

pub use config::ReporterConfig;
pub use error::ReporterError;
pub use events::{Event, EventReader};
pub use report::{Reporter, TeamcityReporter};
