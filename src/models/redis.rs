use uuid::Uuid;

pub struct RedisKey;

impl RedisKey {
    pub fn rating_schema(place_type: &str) -> String {
        format!("rating_schema:{place_type}")
    }

    pub fn place_rating(place_id: &str) -> String {
        format!("place_rating:{place_id}")
    }

    pub fn place_rating_history(place_id: &str) -> String {
        format!("place_rating:{place_id}:ratings")
    }

    pub fn user_rating(id: Uuid) -> String {
        format!("user_rating:{id}")
    }
}
