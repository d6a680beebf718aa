//! Process-wide speaker list cache.
//!
//! A small TTL key-value store over the two fixed speaker lists
//! (keynotes and non-keynote speakers). Entries are best-effort: a
//! failed remote fetch never writes, so the next request retries.

mod keys;
mod lock;
mod store;

pub use keys::SpeakerListKey;
pub use store::SpeakerCache;
