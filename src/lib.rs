//! Streaming radio catalog: songs, stations, users, ratings, and the rating
//! prediction and song suggestion built on top of them.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::CatalogConfig;
pub use error::{CatalogError, ErrorKind, Result};
pub use models::{Rating, Song, Station, StationInfo, User};
pub use services::{Catalog, Prediction, PredictionBasis, SharedCatalog};
