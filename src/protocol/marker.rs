//! Marker block extraction
//!
//! ```text
//! some output
//! ===BEGIN_PI_DATA===
//! {"CustomerName":"Acme","PINumber":"123","PMName":"Pat"}
//! ===END_PI_DATA===
//! more output
//! ```

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::types::{PayloadError, PiData};

pub const BEGIN_MARKER: &str = "===BEGIN_PI_DATA===";
pub const END_MARKER: &str = "===END_PI_DATA===";
/// Replaces the marker block in text shown to the operator
pub const PLACEHOLDER: &str = "[PI DATA LOADED]";

/// Maximum payload length echoed into diagnostics
const MAX_PAYLOAD_PREVIEW: usize = 200;

/// Lazy, dot-matches-newline, surrounding whitespace not captured
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s){}\s*(.*?)\s*{}",
        regex::escape(BEGIN_MARKER),
        regex::escape(END_MARKER)
    ))
    .expect("Invalid regex")
});

/// Script stdout split into operator text and optional structured data
#[derive(Debug)]
pub struct ExtractedResponse {
    /// Stdout with the block replaced by [`PLACEHOLDER`], trimmed
    pub log_text: String,
    /// `None` when no block was present
    pub payload: Option<Result<PiData, PayloadError>>,
}

/// Locate the first marker block in `stdout`, parse it, and strip every block from the log text.
pub fn extract(stdout: &str) -> ExtractedResponse {
    let Some(captures) = MARKER_RE.captures(stdout) else {
        return ExtractedResponse {
            log_text: stdout.trim().to_string(),
            payload: None,
        };
    };

    let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let payload = PiData::parse(body);
    match &payload {
        Ok(data) => debug!(
            customer_name = ?data.customer_name,
            pi_number = ?data.pi_number,
            "Parsed marker payload"
        ),
        Err(e) => warn!(
            error = %e,
            preview = %preview(body),
            payload_len = body.len(),
            "Malformed marker payload"
        ),
    }

    let log_text = MARKER_RE
        .replace_all(stdout, PLACEHOLDER)
        .trim()
        .to_string();

    ExtractedResponse {
        log_text,
        payload: Some(payload),
    }
}

fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(MAX_PAYLOAD_PREVIEW) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}
