use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::models::{Rating, Song, Station, StationInfo, User};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A registered station together with the playlist the catalog keeps for it.
#[derive(Debug, Clone)]
pub(crate) struct StationEntry {
    pub station: Station,
    pub playlist: Vec<Uuid>,
}

/// In-memory catalog of songs, stations, users and ratings.
///
/// Songs and stations keep insertion order. Every mutating operation checks
/// all of its preconditions before touching any store, so a failed call
/// leaves the catalog exactly as it was.
#[derive(Debug, Clone)]
pub struct Catalog {
    config: CatalogConfig,
    songs: Vec<Song>,
    stations: Vec<StationEntry>,
    users: HashMap<Uuid, User>,
    /// user id -> (song id -> rating)
    ratings: HashMap<Uuid, HashMap<Uuid, Rating>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            songs: Vec::new(),
            stations: Vec::new(),
            users: HashMap::new(),
            ratings: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // -------- Songs --------

    pub fn add_song(&mut self, song: Song) -> Result<()> {
        require_song(&song)?;

        if self.contains_song(song.id) {
            return Err(CatalogError::DuplicateSong(song.id));
        }
        if self.songs.len() >= self.config.max_songs {
            warn!("Catalog full, rejecting song {}", song.id);
            return Err(CatalogError::CatalogFull(self.config.max_songs));
        }

        debug!("Added song '{}' by {} ({})", song.title, song.artist, song.id);
        self.songs.push(song);
        Ok(())
    }

    /// Removes a song and every station membership and rating that refers to it.
    pub fn remove_song(&mut self, song: &Song) -> Result<Song> {
        require_song(song)?;

        let index = self
            .song_index(song.id)
            .ok_or(CatalogError::SongNotFound(song.id))?;
        let removed = self.songs.remove(index);

        let mut playlists = 0;
        for entry in &mut self.stations {
            let before = entry.playlist.len();
            entry.playlist.retain(|id| *id != removed.id);
            if entry.playlist.len() != before {
                playlists += 1;
            }
        }

        let mut ratings = 0;
        for user_ratings in self.ratings.values_mut() {
            if user_ratings.remove(&removed.id).is_some() {
                ratings += 1;
            }
        }
        self.ratings.retain(|_, user_ratings| !user_ratings.is_empty());

        info!(
            "Removed song '{}' ({}), dropped from {} playlists and {} ratings",
            removed.title, removed.id, playlists, ratings
        );
        Ok(removed)
    }

    pub fn contains_song(&self, song_id: Uuid) -> bool {
        self.song_index(song_id).is_some()
    }

    pub fn get_song(&self, song_id: Uuid) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == song_id)
    }

    /// Songs in the order they were added.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    fn song_index(&self, song_id: Uuid) -> Option<usize> {
        self.songs.iter().position(|s| s.id == song_id)
    }

    // -------- Stations --------

    pub fn add_station(&mut self, station: Station) -> Result<()> {
        require_station(&station)?;

        if self.contains_station(station.id) {
            return Err(CatalogError::DuplicateStation(station.id));
        }
        if self.stations.len() >= self.config.max_stations {
            warn!("Station limit reached, rejecting station {}", station.id);
            return Err(CatalogError::TooManyStations(self.config.max_stations));
        }

        info!("Registered station: {} ({})", station.name, station.path);
        self.stations.push(StationEntry {
            station,
            playlist: Vec::new(),
        });
        Ok(())
    }

    /// Unregisters a station and discards its playlist.
    pub fn remove_station(&mut self, station: &Station) -> Result<Station> {
        require_station(station)?;

        let index = self
            .station_index(station.id)
            .ok_or(CatalogError::StationNotFound(station.id))?;
        let entry = self.stations.remove(index);

        info!(
            "Removed station: {} ({} songs on playlist)",
            entry.station.name,
            entry.playlist.len()
        );
        Ok(entry.station)
    }

    pub fn add_to_station(&mut self, song: &Song, station: &Station) -> Result<()> {
        require_song(song)?;
        require_station(station)?;

        if !self.contains_song(song.id) {
            return Err(CatalogError::SongNotFound(song.id));
        }

        let capacity = self.config.max_station_songs;
        let entry = self
            .stations
            .iter_mut()
            .find(|e| e.station.id == station.id)
            .ok_or(CatalogError::StationNotFound(station.id))?;

        if entry.playlist.contains(&song.id) {
            return Err(CatalogError::AlreadyOnStation {
                song: song.id,
                station: station.id,
            });
        }
        if entry.playlist.len() >= capacity {
            warn!("Station {} is full, rejecting song {}", station.id, song.id);
            return Err(CatalogError::StationFull {
                station: station.id,
                capacity,
            });
        }

        entry.playlist.push(song.id);
        debug!("Added song {} to station {}", song.id, entry.station.name);
        Ok(())
    }

    pub fn remove_from_station(&mut self, song: &Song, station: &Station) -> Result<Song> {
        require_song(song)?;
        require_station(station)?;

        let entry = self
            .stations
            .iter_mut()
            .find(|e| e.station.id == station.id)
            .ok_or(CatalogError::StationNotFound(station.id))?;

        let position = entry
            .playlist
            .iter()
            .position(|id| *id == song.id)
            .ok_or(CatalogError::NotOnStation {
                song: song.id,
                station: station.id,
            })?;
        entry.playlist.remove(position);
        debug!("Removed song {} from station {}", song.id, entry.station.name);

        // Playlists only hold catalog songs; return the stored copy
        Ok(self.get_song(song.id).cloned().unwrap_or_else(|| song.clone()))
    }

    pub fn contains_station(&self, station_id: Uuid) -> bool {
        self.station_index(station_id).is_some()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn playlist(&self, station: &Station) -> Result<&[Uuid]> {
        require_station(station)?;

        self.stations
            .iter()
            .find(|e| e.station.id == station.id)
            .map(|e| e.playlist.as_slice())
            .ok_or(CatalogError::StationNotFound(station.id))
    }

    /// Ids of the stations whose playlist holds the given song.
    pub fn stations_for(&self, song_id: Uuid) -> Vec<Uuid> {
        self.stations
            .iter()
            .filter(|e| e.playlist.contains(&song_id))
            .map(|e| e.station.id)
            .collect()
    }

    pub fn station_info(&self) -> Vec<StationInfo> {
        self.stations
            .iter()
            .map(|e| StationInfo {
                id: e.station.id,
                path: e.station.path.clone(),
                name: e.station.name.clone(),
                song_count: e.playlist.len(),
                capacity: self.config.max_station_songs,
            })
            .collect()
    }

    pub(crate) fn station_entries(&self) -> &[StationEntry] {
        &self.stations
    }

    fn station_index(&self, station_id: Uuid) -> Option<usize> {
        self.stations.iter().position(|e| e.station.id == station_id)
    }

    // -------- Users --------

    pub fn add_user(&mut self, user: User) -> Result<()> {
        require_user(&user)?;

        if self.users.contains_key(&user.id) {
            return Err(CatalogError::DuplicateUser(user.id));
        }

        info!("Registered user: {} ({})", user.username, user.id);
        self.users.insert(user.id, user);
        Ok(())
    }

    /// Unregisters a user and forgets all of their ratings.
    pub fn remove_user(&mut self, user: &User) -> Result<User> {
        require_user(user)?;

        let removed = self
            .users
            .remove(&user.id)
            .ok_or(CatalogError::UserNotFound(user.id))?;
        let ratings = self.ratings.remove(&user.id).map_or(0, |r| r.len());

        info!("Removed user {} and {} ratings", removed.username, ratings);
        Ok(removed)
    }

    pub fn contains_user(&self, user_id: Uuid) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // -------- Ratings --------

    pub fn rate_song(&mut self, user: &User, song: &Song, value: i32) -> Result<()> {
        require_user(user)?;
        require_song(song)?;
        self.require_registered(user, song)?;
        let rating = Rating::new(value)?;

        let previous = self
            .ratings
            .entry(user.id)
            .or_default()
            .insert(song.id, rating);

        match previous {
            Some(old) => debug!(
                "User {} changed rating of song {} from {} to {}",
                user.id, song.id, old.value(), rating.value()
            ),
            None => debug!("User {} rated song {}: {}", user.id, song.id, rating.value()),
        }
        Ok(())
    }

    /// Removes the rating entirely, so later predictions treat the song as
    /// never rated.
    pub fn clear_rating(&mut self, user: &User, song: &Song) -> Result<()> {
        require_user(user)?;
        require_song(song)?;

        let not_found = CatalogError::RatingNotFound {
            user: user.id,
            song: song.id,
        };
        let user_ratings = self
            .ratings
            .get_mut(&user.id)
            .ok_or_else(|| not_found.clone())?;
        user_ratings.remove(&song.id).ok_or(not_found)?;

        if user_ratings.is_empty() {
            self.ratings.remove(&user.id);
        }

        debug!("Cleared rating of song {} by user {}", song.id, user.id);
        Ok(())
    }

    pub fn rating(&self, user_id: Uuid, song_id: Uuid) -> Option<Rating> {
        self.ratings
            .get(&user_id)
            .and_then(|r| r.get(&song_id))
            .copied()
    }

    /// All ratings of a user, in catalog song order.
    pub fn ratings_for(&self, user_id: Uuid) -> Vec<(Uuid, Rating)> {
        let Some(user_ratings) = self.ratings.get(&user_id) else {
            return Vec::new();
        };

        self.songs
            .iter()
            .filter_map(|s| user_ratings.get(&s.id).map(|r| (s.id, *r)))
            .collect()
    }

    pub(crate) fn user_ratings(&self, user_id: Uuid) -> Option<&HashMap<Uuid, Rating>> {
        self.ratings.get(&user_id).filter(|r| !r.is_empty())
    }

    pub(crate) fn require_user_registered(&self, user: &User) -> Result<()> {
        if !self.contains_user(user.id) {
            return Err(CatalogError::UserNotFound(user.id));
        }
        Ok(())
    }

    pub(crate) fn require_registered(&self, user: &User, song: &Song) -> Result<()> {
        self.require_user_registered(user)?;
        if !self.contains_song(song.id) {
            return Err(CatalogError::SongNotFound(song.id));
        }
        Ok(())
    }
}

pub(crate) fn require_song(song: &Song) -> Result<()> {
    if song.is_absent() {
        return Err(CatalogError::Null("song"));
    }
    Ok(())
}

pub(crate) fn require_station(station: &Station) -> Result<()> {
    if station.is_absent() {
        return Err(CatalogError::Null("station"));
    }
    Ok(())
}

pub(crate) fn require_user(user: &User) -> Result<()> {
    if user.is_absent() {
        return Err(CatalogError::Null("user"));
    }
    Ok(())
}
