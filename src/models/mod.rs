pub mod place_rating;
pub mod redis;
pub mod user_rating;

pub use place_rating::{PlaceRating, SchemaWriteMode};
pub use user_rating::UserRating;
