//! Wire types and classification rules for pretalx talks and speakers.

use serde::{Deserialize, Serialize};

/// Literal marker in a talk title that classifies it as a keynote.
pub const KEYNOTE_MARKER: &str = "[Keynote]";

/// Speaker record as returned by the pretalx talks endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Confirmed talk with its speaker list.
///
/// `title` and `speakers` are required: a payload missing either is
/// treated as malformed rather than silently empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub title: String,
    pub speakers: Vec<Speaker>,
}

impl Talk {
    pub fn is_keynote(&self) -> bool {
        self.title.contains(KEYNOTE_MARKER)
    }
}

/// Envelope of the pretalx talks listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TalksResponse {
    pub results: Vec<Talk>,
}

/// Split the flattened speaker lists of `talks` into
/// `(keynote speakers, non-keynote speakers)`, preserving talk order.
pub fn partition_speakers(talks: &[Talk]) -> (Vec<Speaker>, Vec<Speaker>) {
    let mut keynotes = Vec::new();
    let mut others = Vec::new();
    for talk in talks {
        let bucket = if talk.is_keynote() {
            &mut keynotes
        } else {
            &mut others
        };
        bucket.extend(talk.speakers.iter().cloned());
    }
    (keynotes, others)
}
