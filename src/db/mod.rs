pub mod calendar;
mod schema;

use crate::error::StorageError;
use crate::model::{ExportRow, Registro};
use calendar::Calendar;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{MySqlPool, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Clone, Debug)]
pub enum DbPool {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Picks the backend from the URL scheme.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        if database_url.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(database_url)?
                .create_if_missing(true)
                .busy_timeout(Duration::from_secs(5));

            // every in-memory connection is its own database, so pin exactly one
            let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
            let pool = SqlitePoolOptions::new()
                .max_connections(if in_memory { 1 } else { max_connections.max(1) })
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            return Ok(DbPool::Sqlite(pool));
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        Ok(DbPool::MySql(pool))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            DbPool::MySql(_) => "mysql",
            DbPool::Sqlite(_) => "sqlite",
        }
    }
}

/// Owns the pool and the calendar every query is scoped by.
#[derive(Clone)]
pub struct Storage {
    pool: DbPool,
    calendar: Calendar,
}

impl Storage {
    pub fn new(pool: DbPool, calendar: Calendar) -> Self {
        Self { pool, calendar }
    }

    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        calendar: Calendar,
    ) -> Result<Self, StorageError> {
        let pool = DbPool::connect(database_url, max_connections).await?;
        info!(backend = pool.backend(), max_connections, "Database pool ready");
        Ok(Self::new(pool, calendar))
    }

    /// Creates `registros` and its unique key if they are missing.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        let statements = match &self.pool {
            DbPool::MySql(_) => schema::MYSQL_SCHEMA,
            DbPool::Sqlite(_) => schema::SQLITE_SCHEMA,
        };

        for statement in statements {
            let result = match &self.pool {
                DbPool::MySql(pool) => sqlx::query(statement).execute(pool).await.map(|_| ()),
                DbPool::Sqlite(pool) => sqlx::query(statement).execute(pool).await.map(|_| ()),
            };
            result.map_err(|e| {
                error!(error = %e, "Schema migration failed");
                StorageError::from(e)
            })?;
        }

        info!("Schema up to date");
        Ok(())
    }

    pub async fn close(&self) {
        match &self.pool {
            DbPool::MySql(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }

    pub async fn ping(&self) -> Result<(), StorageError> {
        match &self.pool {
            DbPool::MySql(pool) => sqlx::query(schema::PING).execute(pool).await.map(|_| ())?,
            DbPool::Sqlite(pool) => sqlx::query(schema::PING).execute(pool).await.map(|_| ())?,
        };
        Ok(())
    }

    pub async fn exists_today(&self, codigo: &str, turno: &str) -> Result<bool, StorageError> {
        let dia = self.calendar.today();

        let count: i64 = match &self.pool {
            DbPool::MySql(pool) => {
                sqlx::query_scalar(schema::COUNT_TODAY)
                    .bind(codigo)
                    .bind(turno)
                    .bind(dia)
                    .fetch_one(pool)
                    .await?
            }
            DbPool::Sqlite(pool) => {
                sqlx::query_scalar(schema::COUNT_TODAY)
                    .bind(codigo)
                    .bind(turno)
                    .bind(dia)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count > 0)
    }

    /// Inserts a record stamped with the current time: UTC in `fecha`, the
    /// local calendar day in `dia`. The unique key on `(codigo, turno, dia)`
    /// makes this the atomic guard; a second insert for the same day fails
    /// with `ConstraintViolation`.
    pub async fn insert(&self, codigo: &str, turno: &str) -> Result<Registro, StorageError> {
        let stamp = self.calendar.stamp();

        let result = match &self.pool {
            DbPool::MySql(pool) => sqlx::query(schema::INSERT)
                .bind(codigo)
                .bind(turno)
                .bind(stamp.utc)
                .bind(stamp.dia)
                .execute(pool)
                .await
                .map(|done| done.last_insert_id() as i64),
            DbPool::Sqlite(pool) => sqlx::query(schema::INSERT)
                .bind(codigo)
                .bind(turno)
                .bind(stamp.utc)
                .bind(stamp.dia)
                .execute(pool)
                .await
                .map(|done| done.last_insert_rowid()),
        };

        match result {
            Ok(id) => {
                debug!(id, codigo, turno, dia = %stamp.dia, "Inserted registro");
                Ok(Registro {
                    id,
                    codigo: codigo.to_string(),
                    turno: turno.to_string(),
                    fecha: stamp.fecha,
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StorageError::ConstraintViolation)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Today's records for `turno`, most recent first.
    pub async fn list_today(&self, turno: &str) -> Result<Vec<Registro>, StorageError> {
        let dia = self.calendar.today();

        let mut registros = match &self.pool {
            DbPool::MySql(pool) => {
                sqlx::query_as::<_, Registro>(schema::LIST_TODAY)
                    .bind(turno)
                    .bind(dia)
                    .fetch_all(pool)
                    .await?
            }
            DbPool::Sqlite(pool) => {
                sqlx::query_as::<_, Registro>(schema::LIST_TODAY)
                    .bind(turno)
                    .bind(dia)
                    .fetch_all(pool)
                    .await?
            }
        };

        // fecha is stored in UTC so the order survives daylight-saving changes
        for registro in &mut registros {
            registro.fecha = self.calendar.localize(registro.fecha);
        }
        Ok(registros)
    }

    /// Same filter and order as `list_today`, projected with the full date-time.
    pub async fn list_today_for_export(&self, turno: &str) -> Result<Vec<ExportRow>, StorageError> {
        let registros = self.list_today(turno).await?;
        Ok(registros.into_iter().map(ExportRow::from).collect())
    }
}
