use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::core::error::AppResult;
use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Maximum number of pooled SQLite connections
const MAX_POOL_SIZE: u32 = 10;

/// Create a new database connection pool
///
/// Every connection is opened with foreign keys enabled so that removing a
/// university cascades to its specialties. Schema migrations run on the first
/// connection before the pool is handed out.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use abiturbot::storage::create_pool;
///
/// let pool = create_pool("database.sqlite")?;
/// # Ok::<(), abiturbot::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(MAX_POOL_SIZE).build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    log::info!("Database ready at {}", database_path);

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_pool_enables_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let pool = create_pool(path.to_str().unwrap()).unwrap();

        let conn = get_connection(&pool).unwrap();
        let enabled: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_create_pool_twice_on_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        create_pool(path.to_str().unwrap()).unwrap();
        assert!(create_pool(path.to_str().unwrap()).is_ok());
    }
}
