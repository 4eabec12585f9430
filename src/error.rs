use uuid::Uuid;

/// Broad classification of a [`CatalogError`].
///
/// `Null` means a required handle was absent (nil id). `State` means the
/// arguments were present but the catalog's structural preconditions were not
/// met. Neither kind leaves a partial mutation behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Null,
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing {0}: a {0} handle with a nil id was supplied")]
    Null(&'static str),

    #[error("Song already in catalog: {0}")]
    DuplicateSong(Uuid),

    #[error("Station already registered: {0}")]
    DuplicateStation(Uuid),

    #[error("User already registered: {0}")]
    DuplicateUser(Uuid),

    #[error("Catalog is full ({0} songs)")]
    CatalogFull(usize),

    #[error("Station limit reached ({0} stations)")]
    TooManyStations(usize),

    #[error("Station {station} is full ({capacity} songs)")]
    StationFull { station: Uuid, capacity: usize },

    #[error("Song {song} is already on station {station}")]
    AlreadyOnStation { song: Uuid, station: Uuid },

    #[error("Song {song} is not on station {station}")]
    NotOnStation { song: Uuid, station: Uuid },

    #[error("Song not in catalog: {0}")]
    SongNotFound(Uuid),

    #[error("Station not registered: {0}")]
    StationNotFound(Uuid),

    #[error("User not registered: {0}")]
    UserNotFound(Uuid),

    #[error("No rating on record for user {user} and song {song}")]
    RatingNotFound { user: Uuid, song: Uuid },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("User {0} has rated every song in the catalog")]
    NothingToSuggest(Uuid),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Null(_) => ErrorKind::Null,
            _ => ErrorKind::State,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == ErrorKind::Null
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
