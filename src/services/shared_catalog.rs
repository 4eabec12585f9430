use crate::config::CatalogConfig;
use crate::error::Result;
use crate::models::{Rating, Song, Station, StationInfo, User};
use crate::services::catalog::Catalog;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A [`Catalog`] behind one reader/writer lock, cheap to clone and share
/// between tasks.
///
/// Every method holds the lock only for the duration of the underlying
/// catalog call; nothing inside the lock awaits.
#[derive(Clone)]
pub struct SharedCatalog {
    catalog: Arc<RwLock<Catalog>>,
}

impl SharedCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self::from_catalog(Catalog::new(config))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    pub async fn add_song(&self, song: Song) -> Result<()> {
        self.catalog.write().await.add_song(song)
    }

    pub async fn remove_song(&self, song: &Song) -> Result<Song> {
        self.catalog.write().await.remove_song(song)
    }

    pub async fn add_station(&self, station: Station) -> Result<()> {
        self.catalog.write().await.add_station(station)
    }

    pub async fn remove_station(&self, station: &Station) -> Result<Station> {
        self.catalog.write().await.remove_station(station)
    }

    pub async fn add_to_station(&self, song: &Song, station: &Station) -> Result<()> {
        self.catalog.write().await.add_to_station(song, station)
    }

    pub async fn remove_from_station(&self, song: &Song, station: &Station) -> Result<Song> {
        self.catalog.write().await.remove_from_station(song, station)
    }

    pub async fn add_user(&self, user: User) -> Result<()> {
        self.catalog.write().await.add_user(user)
    }

    pub async fn remove_user(&self, user: &User) -> Result<User> {
        self.catalog.write().await.remove_user(user)
    }

    pub async fn rate_song(&self, user: &User, song: &Song, value: i32) -> Result<()> {
        self.catalog.write().await.rate_song(user, song, value)
    }

    pub async fn clear_rating(&self, user: &User, song: &Song) -> Result<()> {
        self.catalog.write().await.clear_rating(user, song)
    }

    pub async fn predict_rating(&self, user: &User, song: &Song) -> Result<Rating> {
        self.catalog.read().await.predict_rating(user, song)
    }

    pub async fn suggest_song(&self, user: &User) -> Result<Song> {
        self.catalog.read().await.suggest_song(user)
    }

    pub async fn rank_suggestions(&self, user: &User, limit: usize) -> Result<Vec<(Song, Rating)>> {
        self.catalog.read().await.rank_suggestions(user, limit)
    }

    pub async fn song_count(&self) -> usize {
        self.catalog.read().await.song_count()
    }

    pub async fn station_info(&self) -> Vec<StationInfo> {
        self.catalog.read().await.station_info()
    }

    /// Runs a read-only closure against a consistent view of the catalog.
    pub async fn with_catalog<T>(&self, f: impl FnOnce(&Catalog) -> T) -> T {
        let catalog = self.catalog.read().await;
        f(&catalog)
    }
}
