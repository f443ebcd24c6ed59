//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types; business rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Classified errors**: Diesel failures are reduced to connection,
//!   contention, unique-violation, or query errors so services know what to
//!   retry.
//!
//! # Example
//!
//! ```ignore
//! use whoami::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/whoami")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

pub(crate) mod diesel_error_mapping;
mod diesel_follow_repository;
pub(crate) mod diesel_helpers;
mod diesel_portfolio_repository;
mod diesel_post_repository;
mod diesel_search_repository;
mod diesel_sitemap_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_portfolio_repository::DieselPortfolioRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_search_repository::DieselSearchRepository;
pub use diesel_sitemap_repository::DieselSitemapRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
