// src/services/fetcher.rs

//! Feed fetcher service.
//!
//! Downloads the current day's incident report as raw XLS bytes. The date
//! window covers the calendar day containing the moment of the call, so a
//! fetch issued near midnight may straddle days across a restart; the feed
//! is keyed by absolute timestamp, so that is harmless.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use reqwest::Client;
use url::Url;

use crate::config::FeedConfig;
use crate::error::{AppError, Result};
use crate::models::FEED_TIMESTAMP_FORMAT;

/// Service for downloading the daily incident report.
pub struct FeedFetcher {
    config: FeedConfig,
    client: Client,
}

impl FeedFetcher {
    /// Create a new fetcher with the given feed configuration.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Fetch the report for today's window. One request, no retry; the
    /// scheduler owns retry policy.
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        let (from, to) = day_window(Local::now().naive_local());
        let url = self.report_url(from, to)?;
        log::debug!("Fetching feed: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Build the report URL for a date window.
    fn report_url(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<Url> {
        let status_ids = self
            .config
            .status_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let url = Url::parse_with_params(
            &self.config.base_url,
            &[
                ("casOd", from.format(FEED_TIMESTAMP_FORMAT).to_string()),
                ("casDo", to.format(FEED_TIMESTAMP_FORMAT).to_string()),
                ("stavIndex", "0".to_string()),
                ("krajId", self.config.region_id.to_string()),
                ("stavIds", status_ids),
                ("typSouboru", "xls".to_string()),
            ],
        )?;
        Ok(url)
    }
}

/// Start and end of the calendar day containing `now`.
pub fn day_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let date = now.date();
    let end = NaiveTime::from_hms_opt(23, 59, 59).expect("valid end-of-day time");
    (date.and_time(NaiveTime::MIN), date.and_time(end))
}
