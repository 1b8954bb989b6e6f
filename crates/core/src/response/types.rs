use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One tribunal-order row extracted from the portal's result table.
///
/// Immutable once extracted; this is the unit written to the record sink and
/// the source of the downloaded document's filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// The order date the query was scoped to.
    pub order_date: NaiveDate,
    /// Appeal number from the first line of the first cell.
    pub appeal_number: String,
    /// Assessment year from the second line of the first cell.
    pub assessment_year: String,
    /// Case status from the third line of the first cell.
    pub case_status: String,
    /// Parties involved, verbatim (trimmed).
    pub parties: String,
    /// Bench designation column, verbatim (trimmed).
    pub alpha_bench: String,
    /// Relative link to the order document; empty when the row has none.
    pub order_link: String,
}

/// The classified result of one submission attempt.
///
/// Exactly one variant per response; classification never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The portal rejected the CAPTCHA text.
    WrongCaptcha,
    /// The query was accepted and matched nothing; a legitimate terminal
    /// outcome for a date, not a failure.
    NoRecords,
    /// Neither marker matched and the result table is absent. In practice
    /// this is almost always a CAPTCHA rejection rendering differently.
    TableMissing,
    /// The result table was found; carries its rows in source order.
    Success(Vec<OrderRecord>),
}

impl SubmissionOutcome {
    /// Short name for logs and attempt histories.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::WrongCaptcha => "wrong_captcha",
            SubmissionOutcome::NoRecords => "no_records",
            SubmissionOutcome::TableMissing => "table_missing",
            SubmissionOutcome::Success(_) => "success",
        }
    }

    /// Whether the orchestrator should spend another attempt on this date.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::WrongCaptcha | SubmissionOutcome::TableMissing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(SubmissionOutcome::WrongCaptcha.label(), "wrong_captcha");
        assert_eq!(SubmissionOutcome::NoRecords.label(), "no_records");
        assert_eq!(SubmissionOutcome::TableMissing.label(), "table_missing");
        assert_eq!(SubmissionOutcome::Success(vec![]).label(), "success");
    }

    #[test]
    fn test_retryable_outcomes() {
        assert!(SubmissionOutcome::WrongCaptcha.is_retryable());
        assert!(SubmissionOutcome::TableMissing.is_retryable());
        assert!(!SubmissionOutcome::NoRecords.is_retryable());
        assert!(!SubmissionOutcome::Success(vec![]).is_retryable());
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = OrderRecord {
            order_date: NaiveDate::from_ymd_opt(2010, 3, 6).unwrap(),
            appeal_number: "ITA 123/Mum/2010".to_string(),
            assessment_year: "2008-09".to_string(),
            case_status: "Disposed".to_string(),
            parties: "ACIT vs Example Ltd".to_string(),
            alpha_bench: "A".to_string(),
            order_link: "/judicial/orders/123.pdf".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: OrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
