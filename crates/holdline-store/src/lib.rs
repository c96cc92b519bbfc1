pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

/// The calls database. Both constructors return a migrated store.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Applies pending migrations; opening already does this.
    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn calls(&self) -> repo::CallsRepo<'_> {
        repo::CallsRepo::new(&self.conn)
    }

    pub fn analytics(&self) -> repo::AnalyticsRepo<'_> {
        repo::AnalyticsRepo::new(&self.conn)
    }
}
