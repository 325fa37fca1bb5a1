//! HTTP client for the activity API and the per-year cache that mirrors it.
//!
//! The cache only changes after the server has confirmed a write, and a year
//! switch discards it entirely. Each year fetch carries a generation ticket so
//! a slow response for a previously selected year cannot overwrite newer state.

use crate::config::Config;
use crate::models::{ActivityInput, ActivityRecord, DeleteResponse, date_key};
use chrono::{Datelike, NaiveDate};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Network(err) => err.status(),
            Self::Api { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ActivityClient {
    http: reqwest::Client,
    base_url: String,
}

impl ActivityClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityRecord>, ClientError> {
        let response = self
            .http
            .get(format!("{}/activities", self.base_url))
            .query(&[("start", date_key(start)), ("end", date_key(end))])
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    /// `Ok(None)` when the server has no record for the day.
    pub async fn get(&self, date: NaiveDate) -> Result<Option<ActivityRecord>, ClientError> {
        let response = self.http.get(self.activity_url(date)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(checked(response).await?.json().await?))
    }

    pub async fn upsert(
        &self,
        date: NaiveDate,
        input: &ActivityInput,
    ) -> Result<ActivityRecord, ClientError> {
        let response = self
            .http
            .put(self.activity_url(date))
            .json(input)
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    pub async fn delete(&self, date: NaiveDate) -> Result<bool, ClientError> {
        let response = self.http.delete(self.activity_url(date)).send().await?;
        let body: DeleteResponse = checked(response).await?.json().await?;
        Ok(body.success)
    }

    fn activity_url(&self, date: NaiveDate) -> String {
        format!("{}/activities/{}", self.base_url, date_key(date))
    }
}

async fn checked(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}

/// Identifies one year fetch. Only the latest ticket may fill the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTicket {
    pub year: i32,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ActivityCache {
    year: i32,
    generation: u64,
    loading: bool,
    error: Option<String>,
    activities: BTreeMap<NaiveDate, ActivityRecord>,
}

impl ActivityCache {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ActivityRecord> {
        self.activities.get(&date)
    }

    pub fn activities(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.activities.values()
    }

    /// Switches to `year`, dropping everything cached for the previous one.
    pub fn begin_year(&mut self, year: i32) -> YearTicket {
        self.generation += 1;
        self.year = year;
        self.loading = true;
        self.error = None;
        self.activities.clear();
        YearTicket {
            year,
            generation: self.generation,
        }
    }

    /// Applies a year fetch. Returns `false` when the ticket is stale and the
    /// result was ignored.
    pub fn finish_year(
        &mut self,
        ticket: YearTicket,
        result: Result<Vec<ActivityRecord>, ClientError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!("ignoring stale fetch for {}", ticket.year);
            return false;
        }
        self.loading = false;
        match result {
            Ok(records) => self.replace_all(records),
            Err(err) => {
                warn!("failed to fetch activities for {}: {err}", ticket.year);
                self.error = Some(err.to_string());
            }
        }
        true
    }

    fn replace_all(&mut self, records: Vec<ActivityRecord>) {
        let year = self.year;
        self.activities = records
            .into_iter()
            .filter(|record| record.date.year() == year)
            .map(|record| (record.date, record))
            .collect();
    }

    /// Stores a server-confirmed record. Days outside the cached year are skipped.
    pub fn confirm_upsert(&mut self, record: ActivityRecord) {
        if record.date.year() == self.year {
            self.activities.insert(record.date, record);
        }
    }

    pub fn confirm_delete(&mut self, date: NaiveDate) {
        self.activities.remove(&date);
    }

    pub fn record_error(&mut self, err: &ClientError) {
        self.error = Some(err.to_string());
    }
}

/// Client plus cache, driven the way the page drives them.
pub struct Tracker {
    client: ActivityClient,
    cache: ActivityCache,
}

impl Tracker {
    pub fn new(client: ActivityClient, year: i32) -> Self {
        Self {
            client,
            cache: ActivityCache::new(year),
        }
    }

    pub fn cache(&self) -> &ActivityCache {
        &self.cache
    }

    pub fn activity(&self, date: NaiveDate) -> Option<&ActivityRecord> {
        self.cache.get(date)
    }

    pub async fn select_year(&mut self, year: i32) {
        let ticket = self.cache.begin_year(year);
        let result = self.fetch_year(year).await;
        self.cache.finish_year(ticket, result);
    }

    pub async fn refetch(&mut self) {
        let year = self.cache.year();
        self.select_year(year).await;
    }

    /// Returns the stored record, or `None` after recording the failure.
    pub async fn update_activity(
        &mut self,
        date: NaiveDate,
        input: &ActivityInput,
    ) -> Option<ActivityRecord> {
        match self.client.upsert(date, input).await {
            Ok(record) => {
                self.cache.confirm_upsert(record.clone());
                Some(record)
            }
            Err(err) => {
                warn!("failed to update {date}: {err}");
                self.cache.record_error(&err);
                None
            }
        }
    }

    pub async fn delete_activity(&mut self, date: NaiveDate) -> bool {
        match self.client.delete(date).await {
            Ok(_) => {
                self.cache.confirm_delete(date);
                true
            }
            Err(err) => {
                warn!("failed to delete {date}: {err}");
                self.cache.record_error(&err);
                false
            }
        }
    }

    async fn fetch_year(&self, year: i32) -> Result<Vec<ActivityRecord>, ClientError> {
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Ok(Vec::new());
        };
        self.client.list(start, end).await
    }
}
