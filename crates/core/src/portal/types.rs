use chrono::NaiveDate;

/// Date format the portal's form expects.
const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Everything a single submission attempt needs from the query page.
///
/// Produced once per attempt and consumed once: the token and the CAPTCHA
/// are a matched single-use pair, so form state is never reused.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Server-issued CSRF token from the hidden form field.
    pub csrf_token: String,
    /// Raw bytes of the CAPTCHA image tied to the token.
    pub captcha_image: Vec<u8>,
}

/// A fully-determined submission. Partial payloads are unrepresentable.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub csrf_token: String,
    pub bench: String,
    pub appeal_type: String,
    pub order_date: NaiveDate,
    pub captcha_text: String,
}

impl SubmissionPayload {
    /// Field names and values as the portal's form expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("csrftkn", self.csrf_token.clone()),
            ("bench_name_2", self.bench.clone()),
            ("app_type_2", self.appeal_type.clone()),
            (
                "order_date",
                self.order_date.format(WIRE_DATE_FORMAT).to_string(),
            ),
            ("bt2", "true".to_string()),
            ("c2", self.captcha_text.clone()),
        ]
    }
}
