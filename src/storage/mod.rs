//! SQLite pool, migrations and the generic DAO

pub mod dao;
pub mod db;
pub mod migrations;
pub mod models;

// Re-exports for convenience
pub use dao::{Criteria, Dao, Fields, Insertable, Match, Record};
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use models::{NewSpecialty, NewUniversity, Specialty, University};
