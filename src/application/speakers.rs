//! Keynote/speaker resolution against the conference-management API.
//!
//! The service owns the externally observed contract of the original
//! site: a missing API token yields empty lists without any outbound
//! call, and a failed fetch yields an empty list while leaving the
//! cache unset so the next request retries. Internally those two cases
//! stay distinguishable through [`FetchError`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use time::Duration;
use tracing::{debug, warn};

use crate::cache::{SpeakerCache, SpeakerListKey};
use crate::domain::speakers::{Speaker, Talk, partition_speakers};

const SOURCE: &str = "application::speakers::SpeakerService";

/// How long a resolved speaker list stays valid: 12 hours.
pub const SPEAKER_LIST_TTL: Duration = Duration::seconds(43_200);

/// Failure modes of a talks fetch, mirrored from the remote adapter.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("conference api returned status {status}")]
    Status { status: u16 },
    #[error("conference api transport failure: {message}")]
    Transport { message: String },
    #[error("conference api returned a malformed payload: {message}")]
    Format { message: String },
}

/// Remote source of confirmed talks for an event.
#[async_trait]
pub trait TalksSource: Send + Sync {
    async fn confirmed_talks(&self, event_slug: &str) -> Result<Vec<Talk>, FetchError>;
}

pub struct SpeakerService {
    source: Option<Arc<dyn TalksSource>>,
    cache: Arc<SpeakerCache>,
    event_slug: String,
    ttl: Duration,
}

impl SpeakerService {
    /// `source` is `None` when no API token is configured; resolution
    /// then short-circuits to empty lists without touching the network.
    pub fn new(
        source: Option<Arc<dyn TalksSource>>,
        cache: Arc<SpeakerCache>,
        event_slug: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            event_slug: event_slug.into(),
            ttl,
        }
    }

    pub async fn keynote_speakers(&self) -> Vec<Speaker> {
        self.resolve_or_empty(SpeakerListKey::Keynotes).await
    }

    pub async fn speakers(&self) -> Vec<Speaker> {
        self.resolve_or_empty(SpeakerListKey::Speakers).await
    }

    /// Resolve one list, consulting the cache first. A successful fetch
    /// caches the requested list for [`SPEAKER_LIST_TTL`]; a failed one
    /// writes nothing, so the next call retries.
    pub async fn resolve(&self, key: SpeakerListKey) -> Result<Vec<Speaker>, FetchError> {
        if let Some(hit) = self.cache.get(key) {
            return Ok(hit);
        }

        let Some(source) = self.source.as_ref() else {
            debug!(
                target = "podium::speakers",
                list = key.as_str(),
                "no conference api source configured; returning empty list"
            );
            return Ok(Vec::new());
        };

        let talks = source.confirmed_talks(&self.event_slug).await?;
        let (keynotes, others) = partition_speakers(&talks);
        let speakers = match key {
            SpeakerListKey::Keynotes => keynotes,
            SpeakerListKey::Speakers => others,
        };

        self.cache.set(key, speakers.clone(), self.ttl);
        Ok(speakers)
    }

    async fn resolve_or_empty(&self, key: SpeakerListKey) -> Vec<Speaker> {
        match self.resolve(key).await {
            Ok(speakers) => speakers,
            Err(err) => {
                warn!(
                    target = "podium::speakers",
                    source = SOURCE,
                    list = key.as_str(),
                    error = %err,
                    "speaker fetch failed; serving empty list"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Mutex;

    use crate::domain::speakers::KEYNOTE_MARKER;

    use super::*;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<Talk>, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<Talk>, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TalksSource for ScriptedSource {
        async fn confirmed_talks(&self, event_slug: &str) -> Result<Vec<Talk>, FetchError> {
            assert_eq!(event_slug, "pycon-apac-2026");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn speaker(code: &str) -> Speaker {
        Speaker {
            code: code.to_string(),
            name: code.to_uppercase(),
            biography: None,
            avatar: None,
        }
    }

    fn sample_talks() -> Vec<Talk> {
        vec![
            Talk {
                title: format!("{KEYNOTE_MARKER} Opening"),
                speakers: vec![speaker("s1")],
            },
            Talk {
                title: "Writing Parsers".to_string(),
                speakers: vec![speaker("s2"), speaker("s3")],
            },
        ]
    }

    fn service(source: Option<Arc<dyn TalksSource>>) -> SpeakerService {
        SpeakerService::new(
            source,
            Arc::new(SpeakerCache::new()),
            "pycon-apac-2026",
            SPEAKER_LIST_TTL,
        )
    }

    #[tokio::test]
    async fn partitions_keynotes_from_speakers() {
        let source = ScriptedSource::new(vec![Ok(sample_talks()), Ok(sample_talks())]);
        let service = service(Some(source.clone()));

        assert_eq!(service.keynote_speakers().await, vec![speaker("s1")]);
        assert_eq!(
            service.speakers().await,
            vec![speaker("s2"), speaker("s3")]
        );
        // One fetch per list: the two keys are cached independently.
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn missing_source_returns_empty_without_calling_out() {
        let service = service(None);

        assert!(service.keynote_speakers().await.is_empty());
        assert!(service.speakers().await.is_empty());
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let source = ScriptedSource::new(vec![Ok(sample_talks())]);
        let service = service(Some(source.clone()));

        let first = service.keynote_speakers().await;
        let second = service.keynote_speakers().await;

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_yields_empty_and_leaves_cache_unset() {
        let source = ScriptedSource::new(vec![
            Err(FetchError::Status { status: 503 }),
            Ok(sample_talks()),
        ]);
        let service = service(Some(source.clone()));

        assert!(service.keynote_speakers().await.is_empty());
        // The failure did not populate the cache: the next call retries.
        assert_eq!(service.keynote_speakers().await, vec![speaker("s1")]);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn resolve_surfaces_the_failure_internally() {
        let source = ScriptedSource::new(vec![Err(FetchError::Format {
            message: "missing field `results`".to_string(),
        })]);
        let service = service(Some(source));

        let err = service
            .resolve(SpeakerListKey::Speakers)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Format { .. }));
    }
}
