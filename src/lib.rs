pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod ident;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod swagger;
pub mod validation;

#[cfg(test)]
mod tests;

use crate::{config::Config, db::Database, services::media_service::MediaService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub media_service: MediaService,
}
