//! Reqwest-backed portal gateway implementation.

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::PortalConfig;
use crate::retry::{self, BackoffSchedule};

use super::error::PortalError;
use super::traits::PortalGateway;
use super::types::{FormState, SubmissionPayload};

/// The production portal gateway.
///
/// Owns the run's HTTP session: the cookie store lives in the inner client
/// and every request made through this value shares it.
pub struct PortalClient {
    client: Client,
    config: PortalConfig,
    snapshot_dir: PathBuf,
}

impl PortalClient {
    /// Create a client with a fresh session. One User-Agent from the
    /// configured pool is pinned for the whole run.
    pub fn new(config: PortalConfig, snapshot_dir: PathBuf) -> Self {
        let user_agent = pick_user_agent(&config.user_agents);
        debug!(user_agent = %user_agent, "Pinning session User-Agent");

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            snapshot_dir,
        }
    }

    /// One GET of the query page; transient failures are surfaced for the
    /// backoff wrapper to catch.
    async fn fetch_query_page(&self) -> Result<String, PortalError> {
        let response = self.client.get(&self.config.base_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::BadStatus { status });
        }
        Ok(response.text().await?)
    }

    /// Write the offending page to the snapshot directory for human review.
    fn snapshot_page(&self, html: &str) -> Option<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let path = self.snapshot_dir.join(format!("query-page-{}.html", stamp));

        match std::fs::create_dir_all(&self.snapshot_dir)
            .and_then(|_| std::fs::write(&path, html))
        {
            Ok(()) => {
                warn!(path = %path.display(), "Captured raw page snapshot");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Failed to write page snapshot");
                None
            }
        }
    }
}

#[async_trait]
impl PortalGateway for PortalClient {
    async fn fetch_form_state(&self) -> Result<FormState, PortalError> {
        let schedule = BackoffSchedule::exponential(
            self.config.fetch_backoff_base_secs,
            self.config.fetch_max_attempts,
        );

        let page = retry::with_backoff(schedule, |e: &PortalError| e.is_transient(), || {
            self.fetch_query_page()
        })
        .await
        .map_err(|e| {
            if e.is_transient() {
                PortalError::Unavailable {
                    attempts: self.config.fetch_max_attempts,
                    reason: e.to_string(),
                }
            } else {
                e
            }
        })?;

        let (csrf_token, captcha_src) = match extract_form_fields(&page) {
            Ok(fields) => fields,
            Err(reason) => {
                error!(reason = %reason, "Query page no longer matches the expected markup");
                let snapshot = self.snapshot_page(&page);
                return Err(PortalError::MalformedPage { reason, snapshot });
            }
        };

        let captcha_url = Url::parse(&self.config.base_url)
            .and_then(|base| base.join(&captcha_src))
            .map_err(|e| PortalError::MalformedPage {
                reason: format!("unresolvable CAPTCHA image URL {:?}: {}", captcha_src, e),
                snapshot: None,
            })?;

        // The CAPTCHA endpoint rate-limits harder than the page itself.
        tokio::time::sleep(Duration::from_millis(self.config.captcha_delay_ms)).await;

        let captcha_image = self.download(captcha_url.as_str()).await?;
        debug!(
            token_len = csrf_token.len(),
            image_bytes = captcha_image.len(),
            "Fetched form state"
        );

        Ok(FormState {
            csrf_token,
            captcha_image,
        })
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, PortalError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .form(&payload.form_fields())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::BadStatus { status });
        }

        Ok(response.text().await?)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PortalError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::BadStatus { status });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Pull the CSRF token and the CAPTCHA image source out of the query page.
///
/// Both must be present; either one missing means the portal's markup
/// contract is broken and the run must stop for human review.
fn extract_form_fields(html: &str) -> Result<(String, String), String> {
    let document = Html::parse_document(html);

    let token_selector =
        Selector::parse(r#"input[name="csrftkn"]"#).expect("token selector is valid CSS");
    let img_selector = Selector::parse("img").expect("img selector is valid CSS");

    let csrf_token = document
        .select(&token_selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| "CSRF token field not found".to_string())?;

    let captcha_src = document
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.to_lowercase().contains("captcha"))
        .map(str::to_string)
        .ok_or_else(|| "CAPTCHA image not found".to_string())?;

    Ok((csrf_token, captcha_src))
}

/// Pick one User-Agent for the run from the configured pool.
fn pick_user_agent(pool: &[String]) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);

    pool.get(nanos % pool.len().max(1))
        .cloned()
        .unwrap_or_else(|| "Mozilla/5.0".to_string())
}
