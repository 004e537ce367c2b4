//! Generic data-access object
//!
//! `Dao<R>` gives uniform access to one record kind. Every call borrows its own
//! pooled connection on the blocking thread pool and returns it when the call
//! finishes, so no connection or transaction is held across an `.await` and
//! two calls are never transactionally linked.

use std::marker::PhantomData;
use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};

use crate::core::error::{AppError, AppResult};
use crate::storage::db::{get_connection, DbConnection, DbPool};

/// A table-backed record type.
pub trait Record: Sized + Send + 'static {
    /// Table name
    const TABLE: &'static str;
    /// All columns in select order, `id` first. Doubles as the whitelist for
    /// filter and insert column names.
    const COLUMNS: &'static [&'static str];

    /// Builds the record from a row selected with `COLUMNS`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn id(&self) -> i64;
}

/// An insert form for a record type.
pub trait Insertable {
    type Record: Record;

    /// Checks the structural invariants of the new row.
    fn validate(&self) -> AppResult<()>;

    fn fields(&self) -> Fields;
}

/// Ordered `column = value` pairs.
///
/// Used both as a filter (all pairs must match) and as the column set of an
/// insert. Column names are checked against `Record::COLUMNS` before any SQL
/// is built; values are always bound as parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pairs: Vec<(String, Value)>,
}

/// Column values of a row to insert.
pub type Fields = Criteria;

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `column = value` pair.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pairs.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    fn columns(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(column, _)| column.as_str())
    }

    fn values(&self) -> impl Iterator<Item = &Value> {
        self.pairs.iter().map(|(_, value)| value)
    }
}

/// Declared intent of a single-row filter lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Zero or one row; several rows fail with `AppError::AmbiguousMatch`.
    ExactlyOne,
    /// The matching row with the lowest id.
    First,
}

/// Data-access object for one record type.
pub struct Dao<R> {
    pool: Arc<DbPool>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Dao<R> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            _record: PhantomData,
        }
    }
}

impl<R: Record> Dao<R> {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// Returns the record with the given id, or `None`.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<R>> {
        self.with_connection(move |conn| {
            let sql = select_sql::<R>(&Criteria::new().eq("id", id), None)?;
            let record = conn.query_row(&sql, [id], R::from_row).optional()?;
            Ok(record)
        })
        .await
    }

    /// Returns at most one record matching every pair of `criteria`.
    pub async fn find_by_filter(&self, criteria: Criteria, intent: Match) -> AppResult<Option<R>> {
        // Two rows are enough to prove ambiguity
        let limit = match intent {
            Match::ExactlyOne => 2,
            Match::First => 1,
        };
        let mut records = self
            .with_connection(move |conn| query_records::<R>(conn, &criteria, Some(limit)))
            .await?;

        if intent == Match::ExactlyOne && records.len() > 1 {
            return Err(AppError::AmbiguousMatch {
                table: R::TABLE,
                count: records.len(),
            });
        }
        Ok(if records.is_empty() { None } else { Some(records.swap_remove(0)) })
    }

    /// Zero or one matching record; fails loudly when several rows match.
    pub async fn find_one(&self, criteria: Criteria) -> AppResult<Option<R>> {
        self.find_by_filter(criteria, Match::ExactlyOne).await
    }

    /// The matching record with the lowest id.
    pub async fn find_first(&self, criteria: Criteria) -> AppResult<Option<R>> {
        self.find_by_filter(criteria, Match::First).await
    }

    /// All records matching `criteria`, ordered by id ascending.
    pub async fn get_all(&self, criteria: Criteria) -> AppResult<Vec<R>> {
        self.with_connection(move |conn| query_records::<R>(conn, &criteria, None))
            .await
    }

    /// Number of records matching `criteria`.
    pub async fn count(&self, criteria: Criteria) -> AppResult<i64> {
        self.with_connection(move |conn| {
            let sql = count_sql::<R>(&criteria)?;
            let count = conn.query_row(&sql, params_from_iter(criteria.values()), |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    /// Inserts one row and returns its id. The write is committed immediately.
    pub async fn add(&self, fields: Fields) -> AppResult<i64> {
        self.with_connection(move |conn| {
            let sql = insert_sql::<R>(&fields)?;
            conn.execute(&sql, params_from_iter(fields.values()))?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Validates and inserts a typed insert form.
    pub async fn insert<N>(&self, new: &N) -> AppResult<i64>
    where
        N: Insertable<Record = R>,
    {
        new.validate()?;
        self.add(new.fields()).await
    }

    /// Removes a row. Returns `false` when no row had that id.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        self.with_connection(move |conn| {
            let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
            let affected = conn.execute(&sql, [id])?;
            Ok(affected > 0)
        })
        .await
    }

    async fn with_connection<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&DbConnection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let conn = get_connection(&pool)?;
            f(&conn)
        })
        .await?
    }
}

fn query_records<R: Record>(conn: &DbConnection, criteria: &Criteria, limit: Option<usize>) -> AppResult<Vec<R>> {
    let sql = select_sql::<R>(criteria, limit)?;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(criteria.values()), R::from_row)?;
    let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

fn check_columns<R: Record>(criteria: &Criteria) -> AppResult<()> {
    match criteria.columns().find(|column| !R::COLUMNS.contains(column)) {
        Some(column) => Err(AppError::UnknownColumn {
            table: R::TABLE,
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

fn where_clause(criteria: &Criteria) -> String {
    if criteria.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = criteria
        .columns()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 1))
        .collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

fn select_sql<R: Record>(criteria: &Criteria, limit: Option<usize>) -> AppResult<String> {
    check_columns::<R>(criteria)?;
    let limit = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    Ok(format!(
        "SELECT {} FROM {}{} ORDER BY id ASC{}",
        R::COLUMNS.join(", "),
        R::TABLE,
        where_clause(criteria),
        limit
    ))
}

fn count_sql<R: Record>(criteria: &Criteria) -> AppResult<String> {
    check_columns::<R>(criteria)?;
    Ok(format!("SELECT COUNT(*) FROM {}{}", R::TABLE, where_clause(criteria)))
}

fn insert_sql<R: Record>(fields: &Fields) -> AppResult<String> {
    if fields.is_empty() {
        return Err(AppError::Validation(format!("nothing to insert into {}", R::TABLE)));
    }
    if fields.columns().any(|column| column == "id") {
        return Err(AppError::Validation(format!("{}.id is assigned by the store", R::TABLE)));
    }
    check_columns::<R>(fields)?;

    let columns: Vec<&str> = fields.columns().collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        R::TABLE,
        columns.join(", "),
        placeholders.join(", ")
    ))
}
