// Wayne API: JWT-authenticated CRUD service for vehicles, equipment and
// equipment safety records

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod query;
pub mod resources;
pub mod validation;

pub use app::{create_router, AppState};

#[cfg(test)]
mod test_support;
