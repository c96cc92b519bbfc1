//! Connection setup for the calls database.
//!
//! Opening always leaves the schema current. The webhook process is the only
//! writer, so a single WAL connection serialized behind the server's mutex
//! is all that is needed; `busy_timeout` covers an operator running
//! `holdline analytics` against the same file.

use crate::error::Result;
use crate::migrate;
use rusqlite::Connection;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let journal: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    if !journal.eq_ignore_ascii_case("wal") {
        tracing::warn!(path = %path.display(), journal = %journal, "database is not in WAL mode");
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    migrate::run_migrations(&conn)?;
    // The WAL sidecars exist once the migration has written to the file.
    restrict_permissions(path)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrate::run_migrations(&conn)?;
    Ok(conn)
}

fn database_files(path: &Path) -> Vec<PathBuf> {
    let mut files = vec![path.to_path_buf()];
    for suffix in SIDECAR_SUFFIXES {
        let mut name = OsString::from(path.as_os_str());
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    for file in database_files(path) {
        if file.exists() {
            fs::set_permissions(&file, fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
