pub mod rating;
pub mod song;
pub mod station;
pub mod user;

pub use rating::Rating;
pub use song::Song;
pub use station::{Station, StationInfo};
pub use user::User;
