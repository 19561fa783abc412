pub mod get;
pub mod post;
pub mod put;

pub use get::get_rating_schema;
pub use post::create_rating_schema;
pub use put::{merge_rating_schema, replace_rating_schema};
