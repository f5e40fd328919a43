// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::episode::{Episode, Locale, RawEpisode};
use crate::error::LoaderError;
use crate::http::HttpClient;

/// How long a loaded episode is considered fresh by default
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60 * 60 * 24);

/// An episode together with when it was fetched
#[derive(Debug, Clone)]
pub struct LoadedEpisode {
    pub episode: Episode,
    pub fetched_at: DateTime<Utc>,
    /// Window after `fetched_at` during which callers may reuse the episode
    pub revalidate: Duration,
}

impl LoadedEpisode {
    /// Whether the episode is still inside its revalidation window at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.revalidate) {
            // A window reaching past the representable range never expires
            Ok(window) => self
                .fetched_at
                .checked_add_signed(window)
                .is_none_or(|expires_at| now < expires_at),
            Err(_) => true,
        }
    }
}

/// Fetches episodes from the podcast API and normalizes them for display
#[derive(Debug, Clone)]
pub struct EpisodeLoader<C> {
    client: C,
    base_url: Url,
    locale: Locale,
    revalidate: Duration,
}

impl<C: HttpClient> EpisodeLoader<C> {
    /// Create a loader for the API rooted at `base_url`
    pub fn new(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            locale: Locale::default(),
            revalidate: DEFAULT_REVALIDATE,
        }
    }

    pub fn from_config(client: C, config: &Config) -> Self {
        Self::new(client, config.api_base_url.clone())
            .with_locale(config.locale)
            .with_revalidate(config.revalidate())
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_revalidate(mut self, revalidate: Duration) -> Self {
        self.revalidate = revalidate;
        self
    }

    /// URL of a single episode: `{base}/episodes/{id}`
    pub fn episode_url(&self, id: &str) -> Result<Url, LoaderError> {
        let mut url = self.episodes_url()?;
        url.path_segments_mut()
            .map_err(|_| LoaderError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    /// URL of the latest `limit` episodes, newest first
    pub fn latest_url(&self, limit: usize) -> Result<Url, LoaderError> {
        let mut url = self.episodes_url()?;
        url.query_pairs_mut()
            .append_pair("_limit", &limit.to_string())
            .append_pair("_sort", "published_at")
            .append_pair("_order", "desc");
        Ok(url)
    }

    fn episodes_url(&self) -> Result<Url, LoaderError> {
        // A trailing slash keeps any path prefix of the base URL
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join("episodes")?)
    }

    /// Fetch and normalize one episode
    pub async fn load_episode(&self, id: &str) -> Result<LoadedEpisode, LoaderError> {
        let url = self.episode_url(id)?;
        let raw: RawEpisode = self.fetch_json(&url).await?;
        let episode = raw.normalize(self.locale)?;

        debug!(id, title = %episode.title, "loaded episode");

        Ok(LoadedEpisode {
            episode,
            fetched_at: Utc::now(),
            revalidate: self.revalidate,
        })
    }

    /// Fetch several episodes concurrently, keeping the order of `ids`
    pub async fn load_many(&self, ids: &[String]) -> Result<Vec<Episode>, LoaderError> {
        let loaded = try_join_all(ids.iter().map(|id| self.load_episode(id))).await?;
        Ok(loaded.into_iter().map(|l| l.episode).collect())
    }

    /// Fetch the latest `limit` episodes, newest first
    pub async fn load_latest(&self, limit: usize) -> Result<Vec<Episode>, LoaderError> {
        let url = self.latest_url(limit)?;
        let raw: Vec<RawEpisode> = self.fetch_json(&url).await?;

        let episodes = raw
            .into_iter()
            .map(|r| r.normalize(self.locale))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = episodes.len(), "loaded latest episodes");
        Ok(episodes)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, LoaderError> {
        let body = self.fetch_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| LoaderError::JsonParseFailed {
            url: url.to_string(),
            source: e,
        })
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes, LoaderError> {
        debug!(%url, "fetching");

        let response = self
            .client
            .get(url.as_str())
            .await
            .map_err(|e| LoaderError::FetchFailed {
                url: url.to_string(),
                source: e,
            })?;

        if !response.is_success() {
            return Err(LoaderError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::http::HttpResponse;

    /// Serves canned bodies by URL and remembers what was requested
    #[derive(Default)]
    struct MockHttpClient {
        responses: HashMap<String, (u16, String)>,
        requested: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), (status, body.to_string()));
            self
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
            self.requested.lock().unwrap().push(url.to_string());
            let (status, body) = self
                .responses
                .get(url)
                .cloned()
                .unwrap_or((404, "{}".to_string()));
            Ok(HttpResponse {
                status,
                body: Bytes::from(body),
            })
        }
    }

    fn raw_episode(id: &str, published_at: &str, duration: &str) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "title": "Title {id}",
                "members": "Diego Fernandes",
                "published_at": "{published_at}",
                "thumbnail": "https://example.com/{id}.jpg",
                "description": "<p>{id}</p>",
                "file": {{ "url": "https://example.com/{id}.m4a", "duration": {duration} }}
            }}"#
        )
    }

    fn loader(client: MockHttpClient) -> EpisodeLoader<MockHttpClient> {
        EpisodeLoader::new(client, Url::parse("http://localhost:3333/").unwrap())
    }

    #[test]
    fn builds_episode_urls() {
        let loader = loader(MockHttpClient::default());

        assert_eq!(
            loader.episode_url("a-react").unwrap().as_str(),
            "http://localhost:3333/episodes/a-react"
        );
        assert_eq!(
            loader.episode_url("with space").unwrap().as_str(),
            "http://localhost:3333/episodes/with%20space"
        );
        assert_eq!(
            loader.latest_url(12).unwrap().as_str(),
            "http://localhost:3333/episodes?_limit=12&_sort=published_at&_order=desc"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let loader = EpisodeLoader::new(
            MockHttpClient::default(),
            Url::parse("https://api.example.com/v1").unwrap(),
        );

        assert_eq!(
            loader.episode_url("x").unwrap().as_str(),
            "https://api.example.com/v1/episodes/x"
        );
    }

    #[tokio::test]
    async fn load_episode_normalizes_payload() {
        let client = MockHttpClient::default().with(
            "http://localhost:3333/episodes/a",
            200,
            &raw_episode("a", "2021-01-08 16:00:00", "\"3661\""),
        );
        let loader = loader(client);

        let loaded = loader.load_episode("a").await.unwrap();

        assert_eq!(loaded.episode.id, "a");
        assert_eq!(loaded.episode.published_at, "8 jan 21");
        assert_eq!(loaded.episode.duration, 3661);
        assert_eq!(loaded.episode.duration_as_string, "01:01:01");
        assert_eq!(loaded.revalidate, DEFAULT_REVALIDATE);
    }

    #[tokio::test]
    async fn load_episode_uses_configured_locale() {
        let client = MockHttpClient::default().with(
            "http://localhost:3333/episodes/a",
            200,
            &raw_episode("a", "2021-02-22T10:00:00Z", "5"),
        );
        let loader = loader(client).with_locale(Locale::EnUs);

        let loaded = loader.load_episode("a").await.unwrap();

        assert_eq!(loaded.episode.published_at, "22 Feb 21");
        assert_eq!(loaded.episode.duration_as_string, "00:00:05");
    }

    #[tokio::test]
    async fn http_errors_propagate() {
        let loader = loader(MockHttpClient::default());

        let err = loader.load_episode("missing").await.unwrap_err();

        assert!(matches!(
            err,
            LoaderError::HttpStatus { status: 404, ref url } if url.ends_with("/episodes/missing")
        ));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_parse_error() {
        let client = MockHttpClient::default().with(
            "http://localhost:3333/episodes/a",
            200,
            r#"{"id": "a"}"#,
        );

        let err = loader(client).load_episode("a").await.unwrap_err();

        assert!(matches!(err, LoaderError::JsonParseFailed { .. }));
    }

    #[tokio::test]
    async fn load_many_preserves_order() {
        let client = MockHttpClient::default()
            .with(
                "http://localhost:3333/episodes/a",
                200,
                &raw_episode("a", "2021-01-08", "1"),
            )
            .with(
                "http://localhost:3333/episodes/b",
                200,
                &raw_episode("b", "2021-01-09", "2"),
            );
        let loader = loader(client);

        let episodes = loader
            .load_many(&["b".to_string(), "a".to_string()])
            .await
            .unwrap();

        let ids: Vec<_> = episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn load_many_fails_if_any_episode_fails() {
        let client = MockHttpClient::default().with(
            "http://localhost:3333/episodes/a",
            200,
            &raw_episode("a", "2021-01-08", "1"),
        );

        let result = loader(client)
            .load_many(&["a".to_string(), "gone".to_string()])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn load_latest_normalizes_every_entry() {
        let body = format!(
            "[{}, {}]",
            raw_episode("new", "2021-03-01", "60"),
            raw_episode("old", "2021-01-01", "7200")
        );
        let client = MockHttpClient::default().with(
            "http://localhost:3333/episodes?_limit=2&_sort=published_at&_order=desc",
            200,
            &body,
        );
        let loader = loader(client);

        let episodes = loader.load_latest(2).await.unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].published_at, "1 mar 21");
        assert_eq!(episodes[1].duration_as_string, "02:00:00");
        assert_eq!(loader.client.requested.lock().unwrap().len(), 1);
    }

    #[test]
    fn freshness_window() {
        let fetched_at = Utc::now();
        let loaded = LoadedEpisode {
            episode: crate::episode::fixtures::episode("a"),
            fetched_at,
            revalidate: DEFAULT_REVALIDATE,
        };

        assert!(loaded.is_fresh(fetched_at + chrono::Duration::hours(23)));
        assert!(!loaded.is_fresh(fetched_at + chrono::Duration::hours(24)));
    }

    #[test]
    fn huge_revalidate_window_stays_fresh() {
        for secs in [9_000_000_000_000, 100_000_000_000_000, u64::MAX] {
            let loaded = LoadedEpisode {
                episode: crate::episode::fixtures::episode("a"),
                fetched_at: Utc::now(),
                revalidate: Duration::from_secs(secs),
            };

            assert!(loaded.is_fresh(Utc::now()), "window of {secs}s");
        }
    }

    #[test]
    fn configured_revalidate_window_reaches_the_loader() {
        let config: Config = serde_json::from_str(r#"{"revalidate_secs": 100000000000000}"#).unwrap();
        let loader = EpisodeLoader::from_config(MockHttpClient::default(), &config);

        assert_eq!(loader.revalidate, Duration::from_secs(100_000_000_000_000));
    }
}
