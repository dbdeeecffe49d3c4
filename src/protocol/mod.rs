//! Structured data embedded in script output
//!
//! The automation script may print one block of JSON between marker lines. This module
//! pulls that block out, parses it, and hands back the remaining text for the log.
//!
//! - `marker` - locating and stripping the delimited block
//! - `types` - the payload and how it maps onto the form

mod marker;
mod types;

pub use marker::{extract, ExtractedResponse, BEGIN_MARKER, END_MARKER, PLACEHOLDER};
pub use types::{PayloadError, PiData};
