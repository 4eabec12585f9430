use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A song known to the catalog. Identity is the `id`; the remaining fields are
/// descriptive only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Song {
    /// Nil when the payload carried no id; such a song is treated as absent.
    #[serde(default)]
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    /// Length in seconds
    #[serde(default)]
    pub duration: Option<i32>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_duration(mut self, seconds: i32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_nil()
    }
}

/// Equality is by id only; two handles for the same song compare equal
/// even when their descriptive fields differ.
impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
