//! Submission-response interrogation.
//!
//! Every POST to the portal yields an HTML page that falls into exactly one
//! of a closed set of outcomes. `classify` is total over that set and checks
//! markers in priority order: a rejected CAPTCHA also renders a page without
//! the result table, so the CAPTCHA marker must win over table absence.

mod classify;
mod extract;
mod types;

pub use classify::{classify, NO_RECORDS_MARKER, WRONG_CAPTCHA_MARKER};
pub use extract::extract_records;
pub use types::*;
