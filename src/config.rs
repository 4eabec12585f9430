use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Maximum number of songs the catalog will hold.
    pub max_songs: usize,
    /// Maximum number of registered stations.
    pub max_stations: usize,
    /// Maximum playlist length of a single station.
    pub max_station_songs: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_songs: 1000,
            max_stations: 100,
            max_station_songs: 200,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(CatalogConfig {
            max_songs: read_capacity("CATALOG_MAX_SONGS", defaults.max_songs)?,
            max_stations: read_capacity("CATALOG_MAX_STATIONS", defaults.max_stations)?,
            max_station_songs: read_capacity("STATION_MAX_SONGS", defaults.max_station_songs)?,
        })
    }
}

fn read_capacity(key: &str, default: usize) -> Result<usize, anyhow::Error> {
    match env::var(key) {
        Ok(raw) => parse_capacity(key, &raw),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(anyhow::anyhow!("{} could not be read: {}", key, e)),
    }
}

fn parse_capacity(key: &str, raw: &str) -> Result<usize, anyhow::Error> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} must be a positive integer, got '{}': {}", key, raw, e))?;

    // A zero bound would make every insert fail
    if value == 0 {
        return Err(anyhow::anyhow!("{} must be greater than zero", key));
    }

    Ok(value)
}
