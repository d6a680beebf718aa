//! Cache storage for derived speaker lists.

use std::collections::HashMap;
use std::sync::RwLock;

use metrics::counter;
use time::{Duration, OffsetDateTime};

use crate::domain::speakers::Speaker;

use super::keys::SpeakerListKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

struct CachedList {
    speakers: Vec<Speaker>,
    expires_at: OffsetDateTime,
}

/// TTL key-value store shared by all requests in the process.
///
/// Writes are idempotent (same key, same TTL), so concurrent cache
/// misses that both fetch and both write are harmless.
#[derive(Default)]
pub struct SpeakerCache {
    entries: RwLock<HashMap<SpeakerListKey, CachedList>>,
}

impl SpeakerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SpeakerListKey) -> Option<Vec<Speaker>> {
        self.get_at(key, OffsetDateTime::now_utc())
    }

    /// Lookup against an explicit clock. Entries are valid strictly
    /// before their expiry instant; an expired entry is a miss and is
    /// overwritten by the next successful fetch.
    pub fn get_at(&self, key: SpeakerListKey, now: OffsetDateTime) -> Option<Vec<Speaker>> {
        let entries = rw_read(&self.entries, SOURCE, "get");
        match entries.get(&key) {
            Some(entry) if now < entry.expires_at => {
                counter!("podium_speaker_cache_hit_total", "list" => key.as_str()).increment(1);
                Some(entry.speakers.clone())
            }
            _ => {
                counter!("podium_speaker_cache_miss_total", "list" => key.as_str()).increment(1);
                None
            }
        }
    }

    pub fn set(&self, key: SpeakerListKey, speakers: Vec<Speaker>, ttl: Duration) {
        self.set_at(key, speakers, ttl, OffsetDateTime::now_utc());
    }

    pub fn set_at(
        &self,
        key: SpeakerListKey,
        speakers: Vec<Speaker>,
        ttl: Duration,
        now: OffsetDateTime,
    ) {
        let mut entries = rw_write(&self.entries, SOURCE, "set");
        entries.insert(
            key,
            CachedList {
                speakers,
                expires_at: now + ttl,
            },
        );
    }

}
