pub mod get;
pub mod post;

pub use get::get_place_rating;
pub use post::commit_rating;
