// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use api::ApiClient;
pub use state::AppState;
