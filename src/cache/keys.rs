/// Fixed cache keys for the derived speaker lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeakerListKey {
    Keynotes,
    Speakers,
}

impl SpeakerListKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keynotes => "keynotes",
            Self::Speakers => "speakers",
        }
    }
}
