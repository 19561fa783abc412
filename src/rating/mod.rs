//! Rating engine: schema and submission checks, normalization onto `0..=100`
//! and the running per-place aggregate. Everything here is pure.

pub mod aggregate;
pub mod conformance;
pub mod normalize;
pub mod schema;
pub mod submission;

pub use aggregate::{PlaceRatingAggregate, fold_in, running_mean};
pub use conformance::{ValidatedRating, conforms_to_schema};
pub use normalize::{NormalizedRating, normalize};
pub use schema::{RatingRulesSchema, Scale, validate_schema};
pub use submission::{RatingSubmission, validate_submission};
