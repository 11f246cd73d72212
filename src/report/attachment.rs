// Attachment metadata: type tag and value for testMetadata messages
// https://www.jetbrains.com/help/teamcity/service-messages.html#Reporting+Additional+Test+Data

use crate::model::Attachment;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::warn;

/// Directory marker every attachment path is expected to contain
pub const RESULTS_MARKER: &str = "test-results";

/// Marker plus the separator that follows it
const RESULTS_PREFIX_LEN: usize = RESULTS_MARKER.len() + 1;

/// `type` attribute of the testMetadata message
pub fn attachment_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" | "application/zip" => "artifact",
        _ => "text",
    }
}

/// `value` attribute of the testMetadata message
pub fn attachment_value(attachment: &Attachment, artifacts_base: &str) -> String {
    if let Some(path) = &attachment.path {
        artifact_path(path, artifacts_base)
    } else if let Some(body) = &attachment.body {
        BASE64.encode(body.as_bytes())
    } else {
        String::new()
    }
}

/// Rewrite a local attachment path to its location under the published artifacts
pub fn artifact_path(path: &str, artifacts_base: &str) -> String {
    let normalized = path.replace('\\', "/");

    let Some(index) = normalized.find(RESULTS_MARKER) else {
        warn!(
            "Attachment path '{}' is outside '{}', reporting an empty value",
            path, RESULTS_MARKER
        );
        return String::new();
    };

    let relative = normalized
        .get(index + RESULTS_PREFIX_LEN..)
        .unwrap_or_default();
    let archive = if artifacts_base.ends_with(".zip") {
        "!"
    } else {
        ""
    };

    format!("{}{}/{}", artifacts_base, archive, relative)
}
