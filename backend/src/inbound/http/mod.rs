//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod onboarding;
pub mod portfolio;
pub mod posts;
pub mod routes;
pub mod schemas;
pub mod search;
pub mod session;
pub mod session_config;
pub mod sitemap;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
