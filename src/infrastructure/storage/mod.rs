//! Storage infrastructure - PostgreSQL pooling and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{
    product_migrations, run_migrations, user_migrations, Migration, Migrator, PostgresMigrator,
};
pub use postgres::{connect_pool, is_unique_violation, PostgresConfig};
