use log::{debug, info};
use shared::{ScoreRecord, Submission};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client for the score server
pub struct LeaderboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl LeaderboardClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(LeaderboardClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Posts a score and returns the server's confirmation text
    pub async fn submit_score(&self, submission: &Submission) -> Result<String> {
        debug!("Submitting {:?}", submission);

        let response = self
            .http
            .post(self.url("/submit_score"))
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Submitted score for {}", submission.resolved_username());
        Ok(body)
    }

    /// Fetches the ranked leaderboard
    pub async fn fetch_leaderboard(&self) -> Result<Vec<ScoreRecord>> {
        let response = self.http.get(self.url("/leaderboard")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let records: Vec<ScoreRecord> = response.json().await?;
        debug!("Fetched {} records", records.len());
        Ok(records)
    }
}
