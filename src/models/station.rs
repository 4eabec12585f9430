use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A radio station. The station value is only a handle: its playlist is
/// owned by the catalog it is registered with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub id: Uuid,
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Station {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            name: name.into(),
            description: String::new(),
            genres: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_nil()
    }
}

/// Equality is by id only; two handles for the same station compare equal
/// even when their descriptive fields differ.
impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Summary of a registered station and its current playlist length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    pub id: Uuid,
    pub path: String,
    pub name: String,
    pub song_count: usize,
    pub capacity: usize,
}
