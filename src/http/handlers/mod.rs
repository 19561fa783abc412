pub mod rating;
pub mod schema;

pub use rating::{add_rating_handler, get_place_rating_handler};
pub use schema::{create_schema_handler, update_schema_handler};
