pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod goodreads;
pub mod ui;

pub use db::DbPool;

use config::Config;
use goodreads::GoodreadsClient;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub goodreads: GoodreadsClient,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, goodreads: GoodreadsClient) -> Self {
        Self {
            config,
            db,
            goodreads,
        }
    }
}
