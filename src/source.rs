use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{Studio, Teacher, local_time};

const EMBEDDED_SCHEDULE: &str = include_str!("../data/mock_schedule.json");

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed schedule document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Unjoined schedule document: classes point at teachers and studios by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawSchedule {
    pub studios: Vec<Studio>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<RawClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    pub id: String,
    pub name: String,
    pub style: String,
    pub teacher_id: String,
    pub studio_id: String,
    #[serde(with = "local_time")]
    pub start_time: NaiveDateTime,
    #[serde(with = "local_time")]
    pub end_time: NaiveDateTime,
    pub heat_level: u32,
    pub spots_left: u32,
    pub max_spots: u32,
}

impl RawSchedule {
    pub fn from_json(document: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(document)?)
    }
}

/// Anything that can hand the loader a raw schedule document.
pub trait ScheduleSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<RawSchedule, SourceError>>;

    fn describe(&self) -> String;
}

/// Schedule document held in memory; the default source is the bundled fixture.
#[derive(Clone)]
pub struct FixtureSource {
    document: Arc<str>,
}

impl FixtureSource {
    pub fn embedded() -> Self {
        Self::from_json(EMBEDDED_SCHEDULE)
    }

    pub fn from_json(document: impl Into<Arc<str>>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl ScheduleSource for FixtureSource {
    fn fetch(&self) -> BoxFuture<'_, Result<RawSchedule, SourceError>> {
        async move {
            tokio::task::yield_now().await;
            RawSchedule::from_json(&self.document)
        }
        .boxed()
    }

    fn describe(&self) -> String {
        "embedded fixture".to_string()
    }
}

#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Arc<Url>,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: Arc::new(url),
        }
    }

    async fn fetch_document(&self) -> Result<String, SourceError> {
        let response = self
            .client
            .get(self.url.as_str())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }
}

impl ScheduleSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'_, Result<RawSchedule, SourceError>> {
        async move {
            let body = self.fetch_document().await?;
            RawSchedule::from_json(&body)
        }
        .boxed()
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embedded_fixture_parses() {
        let raw = FixtureSource::embedded().fetch().await.unwrap();
        assert_eq!(raw.studios.len(), 2);
        assert_eq!(raw.teachers.len(), 3);
        assert_eq!(raw.classes.len(), 6);
        assert_eq!(raw.classes[0].teacher_id, "teacher-1");
    }

    #[tokio::test]
    async fn test_fixture_source_rejects_malformed_document() {
        let source = FixtureSource::from_json(r#"{"studios": []}"#);
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fixture_source_rejects_bad_timestamp() {
        let source = FixtureSource::from_json(
            r#"{"studios":[],"teachers":[],"classes":[{"id":"c","name":"n","style":"s","teacherId":"t","studioId":"s","startTime":"soon","endTime":"later","heatLevel":90,"spotsLeft":1,"maxSpots":2}]}"#,
        );
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fixture_source_rejects_fractional_counts() {
        let source = FixtureSource::from_json(
            r#"{"studios":[],"teachers":[],"classes":[{"id":"c","name":"n","style":"s","teacherId":"t","studioId":"s","startTime":"2024-06-01T09:00:00","endTime":"2024-06-01T10:00:00","heatLevel":95.0,"spotsLeft":1,"maxSpots":2}]}"#,
        );
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn test_describe() {
        assert_eq!(FixtureSource::embedded().describe(), "embedded fixture");
        let http = HttpSource::new(Url::parse("https://example.com/schedule.json").unwrap());
        assert_eq!(http.describe(), "https://example.com/schedule.json");
    }
}
