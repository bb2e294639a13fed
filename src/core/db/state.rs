use sqlx::{
    Sqlite,
    pool::PoolConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};
use tokio::sync::{RwLock, RwLockReadGuard};

use std::{
    fs,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};
use anyhow::Context;

pub(super) struct DbState {
    db_file: PathBuf,
    pool: RwLock<SqlitePool>,
}

impl std::fmt::Debug for DbState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbState")
            .field("db_file", &self.db_file)
            .finish()
    }
}

impl DbState {
    /// Acquire a pooled connection and hold the pool read lock for the entire lifetime
    /// of the returned guard.
    pub(super) async fn conn(&self) -> Result<DbConnGuard<'_>, sqlx::Error> {
        let pool_guard = self.pool.read().await;

        // The lock stays held because it lives in DbConnGuard.
        let conn = pool_guard.acquire().await?;

        Ok(DbConnGuard {
            _pool_guard: pool_guard,
            conn,
        })
    }

    fn connect_options(db_file: &Path, create: bool) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(db_file)
            .create_if_missing(create)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
    }

    /// Open the store, creating the file and its directory when absent.
    pub(super) async fn open<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        let db_file = db_file.as_ref().to_path_buf();

        match db_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for project store {:?}", db_file)
                })?;
            }
            _ => {}
        }

        Self::connect(db_file, true).await
    }

    /// Open a store that must already exist. Nothing is created on disk.
    pub(super) async fn open_existing<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        let db_file = db_file.as_ref().to_path_buf();
        if !db_file.is_file() {
            anyhow::bail!("Project store {:?} does not exist; run `import` first", db_file);
        }
        Self::connect(db_file, false).await
    }

    async fn connect(db_file: PathBuf, create: bool) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(Self::connect_options(&db_file, create))
            .await
            .with_context(|| format!("Failed to open project store {:?}", db_file))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .with_context(|| format!("Failed to migrate project store {:?}", db_file))?;
        tracing::info!(path = ?db_file, "project store opened");

        Ok(Self {
            db_file,
            pool: RwLock::new(pool),
        })
    }

    /// Exclusive close:
    /// - waits for in-flight queries (takes the WRITE lock)
    /// - checkpoints the WAL so the database file is current
    /// - closes the pool to release file handles
    pub(super) async fn close(&self) -> anyhow::Result<()> {
        let pool_guard = self.pool.write().await;

        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&*pool_guard)
            .await?;
        pool_guard.close().await;
        tracing::debug!(path = ?self.db_file, "project store closed");
        Ok(())
    }
}

pub struct DbConnGuard<'a> {
    _pool_guard: RwLockReadGuard<'a, SqlitePool>,
    conn: PoolConnection<Sqlite>,
}

impl<'a> Deref for DbConnGuard<'a> {
    type Target = PoolConnection<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl<'a> DerefMut for DbConnGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
