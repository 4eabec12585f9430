use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A star rating from 1 to 5.
///
/// The inner value can only be produced through [`Rating::new`], so any
/// `Rating` in the catalog is known to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;
    /// Prediction returned for a user with no rating history.
    pub const DEFAULT_PREDICTION: Rating = Rating(3);

    pub fn new(value: i32) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(CatalogError::InvalidRating(value));
        }
        Ok(Rating(value as u8))
    }

    /// Builds a rating from a computed value, pinning it to the valid range.
    pub(crate) fn clamped(value: i64) -> Self {
        Rating(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> i32 {
        self.0 as i32
    }
}

impl TryFrom<i32> for Rating {
    type Error = CatalogError;

    fn try_from(value: i32) -> Result<Self> {
        Rating::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for star in 1..=Self::MAX {
            if star <= self.value() {
                write!(f, "★")?;
            } else {
                write!(f, "☆")?;
            }
        }
        Ok(())
    }
}
