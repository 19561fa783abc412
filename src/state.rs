use std::sync::Arc;

use bb8::Pool;
use bb8_redis::RedisConnectionManager;

use crate::{config::AdminSecret, db::RatingStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RatingStore>,
    pub admin_secret: AdminSecret,
}

impl AppState {
    pub fn new(store: Arc<dyn RatingStore>, admin_secret: AdminSecret) -> Self {
        Self {
            store,
            admin_secret,
        }
    }
}

pub type RedisClient = Pool<RedisConnectionManager>;
