use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use worksheet_catalog::WorksheetRecord;

use super::envelope::decode_worksheets;
use super::{CatalogSource, EmailOutcome, EmailReply, EmailRequest, UpstreamError};
use crate::config::Upstream;

/// reqwest-backed client for the PHP content API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    worksheets_path: String,
    subjects_path: String,
    subtopics_path: String,
    send_email_path: String,
}

impl UpstreamClient {
    pub fn new(config: &Upstream) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            worksheets_path: config.endpoints.worksheets.clone(),
            subjects_path: config.endpoints.subjects.clone(),
            subtopics_path: config.endpoints.subtopics.clone(),
            send_email_path: config.endpoints.send_email.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request`, decode the JSON body and record the outcome. The one
    /// place upstream failures are logged.
    async fn fetch<T, F>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
        decode: F,
    ) -> Result<T, UpstreamError>
    where
        F: FnOnce(Value) -> Result<T, UpstreamError> + Send,
    {
        let start = Instant::now();
        let result = send_json(endpoint, request).await.and_then(decode);

        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) if err.is_rejection() => "rejected",
            Err(_) => "error",
        };
        counter!("upstream.requests", "endpoint" => endpoint, "outcome" => outcome).increment(1);
        histogram!("upstream.request_ms", "endpoint" => endpoint)
            .record(start.elapsed().as_millis() as f64);

        match &result {
            Err(err) if err.is_rejection() => tracing::warn!("{}", err),
            Err(err) => tracing::error!("{}", err),
            Ok(_) => {}
        }
        result
    }
}

async fn send_json(endpoint: &'static str, request: RequestBuilder) -> Result<Value, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|source| UpstreamError::Transport { endpoint, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|err| UpstreamError::InvalidPayload {
            endpoint,
            reason: err.to_string(),
        })
}

#[async_trait]
impl CatalogSource for UpstreamClient {
    async fn worksheets(&self) -> Result<Vec<WorksheetRecord>, UpstreamError> {
        const ENDPOINT: &str = "worksheets";

        self.fetch(ENDPOINT, self.http.get(self.url(&self.worksheets_path)), |body| {
            decode_worksheets(body).map_err(|reason| UpstreamError::InvalidPayload {
                endpoint: ENDPOINT,
                reason,
            })
        })
        .await
    }

    async fn subjects(&self) -> Result<Value, UpstreamError> {
        self.fetch("subjects", self.http.get(self.url(&self.subjects_path)), Ok)
            .await
    }

    async fn subtopics(&self, subject_id: &str) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .get(self.url(&self.subtopics_path))
            .query(&[("subject_id", subject_id)]);
        self.fetch("subtopics", request, Ok).await
    }

    async fn send_email(&self, request: &EmailRequest) -> Result<EmailOutcome, UpstreamError> {
        const ENDPOINT: &str = "send_email";

        let post = self.http.post(self.url(&self.send_email_path)).json(request);
        let reply: EmailReply = self
            .fetch(ENDPOINT, post, |body| {
                serde_json::from_value(body).map_err(|err| UpstreamError::InvalidPayload {
                    endpoint: ENDPOINT,
                    reason: err.to_string(),
                })
            })
            .await?;

        let outcome = EmailOutcome::from(reply);
        if let EmailOutcome::Rejected(reason) = &outcome {
            tracing::warn!(worksheet_id = %request.worksheet_id, "upstream mailer rejected request: {}", reason);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_urls_join_base_and_endpoint() {
        let mut config = Config::default().upstream;
        config.base_url = "http://localhost:9000/".to_string();

        let client = UpstreamClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(
            client.url(&client.worksheets_path),
            "http://localhost:9000/Worksheets/api/getWorksheet.php"
        );
    }
}
