//! Rating prediction and song suggestion
//!
//! Similarity between two songs is the number of stations whose playlists
//! contain both of them. A prediction for a user is the similarity-weighted
//! average of the ratings they gave to other songs.
//!
//! Flow:
//! 1. No ratings on record: predict the default (3)
//! 2. Some rated song shares a station with the target: weighted average
//! 3. Otherwise: plain mean of every rating the user has given
//!
//! Suggestions rank every song the user has not rated by its prediction.
//! Ties keep catalog insertion order.

use crate::error::{CatalogError, Result};
use crate::models::{Rating, Song, User};
use crate::services::catalog::{require_song, require_user, Catalog};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// How a prediction was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum PredictionBasis {
    /// The user has no ratings on record
    Default,
    /// Weighted by station co-membership with this many rated songs
    Similarity { neighbors: usize },
    /// No shared stations; mean over this many ratings
    Mean { ratings: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub rating: Rating,
    #[serde(flatten)]
    pub basis: PredictionBasis,
}

impl Catalog {
    /// Predicts the rating `user` would give `song`, from 1 to 5.
    ///
    /// This is not a lookup: a song the user already rated is predicted from
    /// their other ratings like any other song.
    pub fn predict_rating(&self, user: &User, song: &Song) -> Result<Rating> {
        self.explain_prediction(user, song).map(|p| p.rating)
    }

    /// Same as [`Catalog::predict_rating`], also reporting how the value was reached.
    pub fn explain_prediction(&self, user: &User, song: &Song) -> Result<Prediction> {
        require_user(user)?;
        require_song(song)?;
        self.require_registered(user, song)?;

        let prediction = match self.user_ratings(user.id) {
            Some(history) => self.predict_from_history(history, song.id),
            None => Prediction {
                rating: Rating::DEFAULT_PREDICTION,
                basis: PredictionBasis::Default,
            },
        };

        debug!(
            "Predicted {} for user {} on song {} ({:?})",
            prediction.rating.value(),
            user.id,
            song.id,
            prediction.basis
        );
        Ok(prediction)
    }

    /// Suggests the song `user` is predicted to like most among those they
    /// have not rated.
    ///
    /// A user without ratings gets the first song in the catalog.
    pub fn suggest_song(&self, user: &User) -> Result<Song> {
        let ranked = self.rank_suggestions(user, 1)?;
        ranked
            .into_iter()
            .next()
            .map(|(song, _)| song)
            .ok_or(CatalogError::NothingToSuggest(user.id))
    }

    /// Unrated songs ordered by predicted rating, best first, at most `limit`.
    ///
    /// A user without ratings gets the first `limit` songs of the catalog at
    /// the default prediction.
    pub fn rank_suggestions(&self, user: &User, limit: usize) -> Result<Vec<(Song, Rating)>> {
        require_user(user)?;
        self.require_user_registered(user)?;

        if self.song_count() == 0 {
            return Err(CatalogError::EmptyCatalog);
        }

        let Some(history) = self.user_ratings(user.id) else {
            return Ok(self
                .songs()
                .iter()
                .take(limit)
                .map(|s| (s.clone(), Rating::DEFAULT_PREDICTION))
                .collect());
        };

        let mut ranked: Vec<(&Song, Rating)> = self
            .songs()
            .iter()
            .filter(|s| !history.contains_key(&s.id))
            .map(|s| (s, self.predict_from_history(history, s.id).rating))
            .collect();

        // Stable sort keeps insertion order among equal predictions
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        debug!(
            "Ranked {} unrated songs for user {} ({} ratings on record)",
            ranked.len(),
            user.id,
            history.len()
        );

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(s, r)| (s.clone(), r))
            .collect())
    }

    fn predict_from_history(&self, history: &HashMap<Uuid, Rating>, song_id: Uuid) -> Prediction {
        let mut weighted_sum: i64 = 0;
        let mut weight_total: i64 = 0;
        let mut neighbors = HashSet::new();

        // Each shared station adds one unit of weight to a rated neighbour
        for entry in self.station_entries() {
            if !entry.playlist.contains(&song_id) {
                continue;
            }
            for other in entry.playlist.iter().filter(|id| **id != song_id) {
                if let Some(rating) = history.get(other) {
                    weighted_sum += rating.value() as i64;
                    weight_total += 1;
                    neighbors.insert(*other);
                }
            }
        }

        if weight_total > 0 {
            return Prediction {
                rating: Rating::clamped(round_div(weighted_sum, weight_total)),
                basis: PredictionBasis::Similarity {
                    neighbors: neighbors.len(),
                },
            };
        }

        let total: i64 = history.values().map(|r| r.value() as i64).sum();
        let count = history.len() as i64;
        Prediction {
            rating: Rating::clamped(round_div(total, count.max(1))),
            basis: PredictionBasis::Mean {
                ratings: history.len(),
            },
        }
    }
}

/// Integer division of non-negative values, rounding halves up.
fn round_div(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator) / (2 * denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::error::ErrorKind;
    use crate::models::Station;

    struct Fixture {
        catalog: Catalog,
        user: User,
        songs: Vec<Song>,
    }

    fn fixture(song_count: usize) -> Fixture {
        let mut catalog = Catalog::new(CatalogConfig::default());
        let user = User::new("listener");
        catalog.add_user(user.clone()).unwrap();

        let songs: Vec<Song> = (0..song_count)
            .map(|i| Song::new(format!("Track {}", i), "Various"))
            .collect();
        for song in &songs {
            catalog.add_song(song.clone()).unwrap();
        }

        Fixture { catalog, user, songs }
    }

    fn station_with(catalog: &mut Catalog, name: &str, songs: &[&Song]) -> Station {
        let station = Station::new(name, name);
        catalog.add_station(station.clone()).unwrap();
        for song in songs {
            catalog.add_to_station(song, &station).unwrap();
        }
        station
    }

    #[test]
    fn test_prediction_json_shape() {
        let similarity = Prediction {
            rating: Rating::new(4).unwrap(),
            basis: PredictionBasis::Similarity { neighbors: 2 },
        };
        assert_eq!(
            serde_json::to_value(similarity).unwrap(),
            serde_json::json!({"rating": 4, "basis": "similarity", "neighbors": 2})
        );

        let fallback = Prediction {
            rating: Rating::DEFAULT_PREDICTION,
            basis: PredictionBasis::Default,
        };
        assert_eq!(
            serde_json::to_value(fallback).unwrap(),
            serde_json::json!({"rating": 3, "basis": "default"})
        );
    }

    #[test]
    fn test_round_div() {
        assert_eq!(round_div(9, 2), 5);
        assert_eq!(round_div(7, 2), 4);
        assert_eq!(round_div(10, 3), 3);
        assert_eq!(round_div(12, 3), 4);
    }

    #[test]
    fn test_no_history_predicts_three_for_every_song() {
        let f = fixture(4);
        for song in &f.songs {
            assert_eq!(f.catalog.predict_rating(&f.user, song).unwrap().value(), 3);
        }
        assert_eq!(
            f.catalog.explain_prediction(&f.user, &f.songs[0]).unwrap().basis,
            PredictionBasis::Default
        );
    }

    #[test]
    fn test_cleared_rating_counts_as_never_rated() {
        let mut f = fixture(2);
        f.catalog.rate_song(&f.user, &f.songs[0], 5).unwrap();
        f.catalog.clear_rating(&f.user, &f.songs[0]).unwrap();
        assert_eq!(f.catalog.predict_rating(&f.user, &f.songs[1]).unwrap().value(), 3);
    }

    #[test]
    fn test_all_fives_predicts_five() {
        let mut f = fixture(4);
        let (a, b, c, d) = (
            f.songs[0].clone(),
            f.songs[1].clone(),
            f.songs[2].clone(),
            f.songs[3].clone(),
        );
        station_with(&mut f.catalog, "one", &[&a, &b]);
        station_with(&mut f.catalog, "two", &[&b, &c, &d]);
        for song in &f.songs {
            f.catalog.rate_song(&f.user, song, 5).unwrap();
        }

        for song in &f.songs {
            assert_eq!(f.catalog.predict_rating(&f.user, song).unwrap().value(), 5);
        }
    }

    #[test]
    fn test_weighted_by_shared_stations() {
        let mut f = fixture(4);
        let (target, close, near, far) = (
            f.songs[0].clone(),
            f.songs[1].clone(),
            f.songs[2].clone(),
            f.songs[3].clone(),
        );
        station_with(&mut f.catalog, "s1", &[&target, &close, &near]);
        station_with(&mut f.catalog, "s2", &[&target, &close]);
        station_with(&mut f.catalog, "s3", &[&far]);

        f.catalog.rate_song(&f.user, &close, 5).unwrap();
        f.catalog.rate_song(&f.user, &near, 2).unwrap();
        f.catalog.rate_song(&f.user, &far, 1).unwrap();

        // (5 * 2 + 2 * 1) / 3 = 4
        let prediction = f.catalog.explain_prediction(&f.user, &target).unwrap();
        assert_eq!(prediction.rating.value(), 4);
        assert_eq!(prediction.basis, PredictionBasis::Similarity { neighbors: 2 });
    }

    #[test]
    fn test_mean_fallback_rounds_half_up() {
        let mut f = fixture(3);
        f.catalog.rate_song(&f.user, &f.songs[0], 4).unwrap();
        f.catalog.rate_song(&f.user, &f.songs[1], 5).unwrap();

        let prediction = f.catalog.explain_prediction(&f.user, &f.songs[2]).unwrap();
        assert_eq!(prediction.rating.value(), 5);
        assert_eq!(prediction.basis, PredictionBasis::Mean { ratings: 2 });
    }

    #[test]
    fn test_prediction_is_not_a_lookup() {
        let mut f = fixture(2);
        let (a, b) = (f.songs[0].clone(), f.songs[1].clone());
        station_with(&mut f.catalog, "pair", &[&a, &b]);
        f.catalog.rate_song(&f.user, &a, 1).unwrap();
        f.catalog.rate_song(&f.user, &b, 5).unwrap();

        assert_eq!(f.catalog.predict_rating(&f.user, &a).unwrap().value(), 5);
        assert_eq!(f.catalog.predict_rating(&f.user, &b).unwrap().value(), 1);
    }

    #[test]
    fn test_prediction_argument_errors() {
        let f = fixture(1);
        let song = &f.songs[0];
        assert!(f.catalog.predict_rating(&User::default(), song).unwrap_err().is_null());
        assert!(f.catalog.predict_rating(&f.user, &Song::default()).unwrap_err().is_null());

        let stranger = User::new("stranger");
        assert_eq!(
            f.catalog.predict_rating(&stranger, song).unwrap_err(),
            CatalogError::UserNotFound(stranger.id)
        );
        let outsider = Song::new("Outsider", "Nobody");
        assert_eq!(
            f.catalog.predict_rating(&f.user, &outsider).unwrap_err(),
            CatalogError::SongNotFound(outsider.id)
        );
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let mut f = fixture(5);
        let refs: Vec<&Song> = f.songs.iter().collect();
        station_with(&mut f.catalog, "all", &refs);
        f.catalog.rate_song(&f.user, &f.songs[0], 2).unwrap();
        f.catalog.rate_song(&f.user, &f.songs[1], 5).unwrap();

        let first = f.catalog.predict_rating(&f.user, &f.songs[4]).unwrap();
        for _ in 0..10 {
            assert_eq!(f.catalog.predict_rating(&f.user, &f.songs[4]).unwrap(), first);
        }
    }

    #[test]
    fn test_suggest_without_history_returns_catalog_song() {
        let mut f = fixture(3);
        f.catalog.remove_song(&f.songs[0].clone()).unwrap();

        let suggestion = f.catalog.suggest_song(&f.user).unwrap();
        assert_eq!(suggestion, f.songs[1]);
        assert!(f.catalog.contains_song(suggestion.id));
    }

    #[test]
    fn test_suggest_on_empty_catalog() {
        let f = fixture(0);
        let err = f.catalog.suggest_song(&f.user).unwrap_err();
        assert_eq!(err, CatalogError::EmptyCatalog);
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_suggest_argument_errors() {
        let f = fixture(1);
        assert!(f.catalog.suggest_song(&User::default()).unwrap_err().is_null());
        let stranger = User::new("stranger");
        assert_eq!(
            f.catalog.suggest_song(&stranger).unwrap_err(),
            CatalogError::UserNotFound(stranger.id)
        );
    }

    #[test]
    fn test_suggest_picks_highest_prediction() {
        let mut f = fixture(4);
        let (lonely, liked_peer, loved, hated) = (
            f.songs[0].clone(),
            f.songs[1].clone(),
            f.songs[2].clone(),
            f.songs[3].clone(),
        );
        station_with(&mut f.catalog, "good", &[&loved, &liked_peer]);
        f.catalog.rate_song(&f.user, &loved, 5).unwrap();
        f.catalog.rate_song(&f.user, &hated, 1).unwrap();

        // lonely falls back to the mean (3), liked_peer shares a station with a 5
        assert_eq!(f.catalog.predict_rating(&f.user, &lonely).unwrap().value(), 3);
        assert_eq!(f.catalog.suggest_song(&f.user).unwrap(), liked_peer);
    }

    #[test]
    fn test_suggest_ties_break_by_insertion_order() {
        let mut f = fixture(4);
        f.catalog.rate_song(&f.user, &f.songs[1], 4).unwrap();

        // Every unrated song falls back to the same mean
        assert_eq!(f.catalog.suggest_song(&f.user).unwrap(), f.songs[0]);

        f.catalog.rate_song(&f.user, &f.songs[0], 4).unwrap();
        assert_eq!(f.catalog.suggest_song(&f.user).unwrap(), f.songs[2]);
    }

    #[test]
    fn test_suggest_when_everything_rated() {
        let mut f = fixture(2);
        for song in &f.songs {
            f.catalog.rate_song(&f.user, song, 3).unwrap();
        }
        assert_eq!(
            f.catalog.suggest_song(&f.user).unwrap_err(),
            CatalogError::NothingToSuggest(f.user.id)
        );
    }

    #[test]
    fn test_rank_suggestions() {
        let mut f = fixture(4);
        let (a, b, c, d) = (
            f.songs[0].clone(),
            f.songs[1].clone(),
            f.songs[2].clone(),
            f.songs[3].clone(),
        );
        station_with(&mut f.catalog, "low", &[&a, &b]);
        station_with(&mut f.catalog, "high", &[&c, &d]);
        f.catalog.rate_song(&f.user, &a, 1).unwrap();
        f.catalog.rate_song(&f.user, &c, 5).unwrap();

        let ranked = f.catalog.rank_suggestions(&f.user, 10).unwrap();
        let order: Vec<(Uuid, i32)> = ranked.iter().map(|(s, r)| (s.id, r.value())).collect();
        assert_eq!(order, vec![(d.id, 5), (b.id, 1)]);

        assert_eq!(f.catalog.rank_suggestions(&f.user, 1).unwrap().len(), 1);
    }
}
