use chrono::NaiveDate;
use scraper::{Html, Selector};

use super::extract::records_from_table;
use super::types::SubmissionOutcome;

/// Marker the portal renders when the CAPTCHA text is rejected.
pub const WRONG_CAPTCHA_MARKER: &str = "please enter correct captcha";

/// Marker the portal renders when the query matched nothing.
pub const NO_RECORDS_MARKER: &str = "no records found";

/// CSS selector for the result table on a successful response.
pub(super) const RESULT_TABLE_SELECTOR: &str = "table.table.table-striped.table-bordered";

/// Classify a submission response into exactly one outcome.
///
/// Markers are checked before table structure: a failed CAPTCHA still
/// renders a page without the result table, and must not be mistaken for
/// `TableMissing`. Marker matching is case-insensitive.
pub fn classify(html: &str, order_date: NaiveDate) -> SubmissionOutcome {
    let lowered = html.to_lowercase();

    if lowered.contains(WRONG_CAPTCHA_MARKER) {
        return SubmissionOutcome::WrongCaptcha;
    }

    if lowered.contains(NO_RECORDS_MARKER) {
        return SubmissionOutcome::NoRecords;
    }

    let document = Html::parse_document(html);
    let table_selector =
        Selector::parse(RESULT_TABLE_SELECTOR).expect("result table selector is valid CSS");

    match document.select(&table_selector).next() {
        Some(table) => SubmissionOutcome::Success(records_from_table(&table, order_date)),
        None => SubmissionOutcome::TableMissing,
    }
}
