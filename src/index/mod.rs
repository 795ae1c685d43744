//! SQLite-backed authoritative index over one box directory.
//!
//! The database file lives inside the box directory itself. Every operation
//! opens its own connection, so no handle outlives a call and SQLite's file
//! locking remains the only cross-process coordination. Rows are never
//! updated in place: content is content-addressed, so changes mean new rows.

pub mod conditions;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use rusqlite::{
    params, params_from_iter, Connection, ErrorCode, OpenFlags, Row, TransactionBehavior,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::archive::{is_archive_path, ArchiveError, BeadArchive};
use crate::core::{BeadName, BeadRecord, ContentId, CoreError, FreezeTime, InputSpec, Kind};
use crate::error::Transience;

pub use conditions::Condition;
use conditions::compile;

/// Index database filename inside a box directory.
pub const INDEX_FILE: &str = ".index.sqlite";

/// Where an unreadable index database is set aside before a rebuild.
pub const CORRUPT_FILE: &str = ".index.sqlite.corrupt";

const SCHEMA_VERSION: i64 = 1;
const BUSY_TIMEOUT_MS: u64 = 250;

const SCHEMA_SQL: &str = "
CREATE TABLE beads (
    bead_id           INTEGER PRIMARY KEY,
    name              TEXT NOT NULL,
    content_id        TEXT NOT NULL,
    kind              TEXT NOT NULL,
    freeze_name       TEXT NOT NULL,
    freeze_time_str   TEXT NOT NULL,
    file_path         TEXT NOT NULL,
    UNIQUE(file_path),
    UNIQUE(name, content_id)
);
CREATE INDEX idx_beads_name        ON beads(name);
CREATE INDEX idx_beads_content_id  ON beads(content_id);
CREATE INDEX idx_beads_kind        ON beads(kind);
CREATE INDEX idx_beads_freeze_time ON beads(freeze_time_str);

CREATE TABLE inputs (
    input_id              INTEGER PRIMARY KEY,
    bead_id               INTEGER NOT NULL,
    input_name            TEXT NOT NULL,
    input_kind            TEXT NOT NULL,
    input_content_id      TEXT NOT NULL,
    input_freeze_time_str TEXT NOT NULL,
    FOREIGN KEY (bead_id) REFERENCES beads(bead_id) ON DELETE CASCADE,
    UNIQUE(bead_id, input_name)
);
CREATE INDEX idx_inputs_bead_id    ON inputs(bead_id);
CREATE INDEX idx_inputs_content_id ON inputs(input_content_id);
CREATE INDEX idx_inputs_kind       ON inputs(input_kind);
CREATE INDEX idx_inputs_name       ON inputs(input_name);
";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("no bead named `{name}` with content id `{content_id}`")]
    NotFound { name: BeadName, content_id: ContentId },
    #[error(
        "index lists multiple files for (`{name}`, `{content_id}`): {paths:?}; rebuild the index"
    )]
    Ambiguous {
        name: BeadName,
        content_id: ContentId,
        paths: Vec<String>,
    },
    #[error("index at {path:?} is busy after {attempts} attempts")]
    Busy { path: PathBuf, attempts: u32 },
    #[error("index at {path:?} is read-only")]
    ReadOnly { path: PathBuf },
    #[error("cannot write index at {path:?}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("index at {path:?} is unavailable: {reason}")]
    Unavailable { path: PathBuf, reason: String },
    #[error("archive {path:?} is outside box directory {directory:?}")]
    OutsideBox { path: PathBuf, directory: PathBuf },
    #[error("bead row decode failed: {0}")]
    RowDecode(String),
}

impl From<CoreError> for IndexError {
    fn from(err: CoreError) -> Self {
        IndexError::RowDecode(err.to_string())
    }
}

impl IndexError {
    pub fn transience(&self) -> Transience {
        match self {
            IndexError::Busy { .. } => Transience::Retryable,
            IndexError::Sqlite(_) | IndexError::Io { .. } => Transience::Unknown,
            IndexError::Archive(e) => e.transience(),
            // NotFound, Ambiguous, ReadOnly, Unwritable, Unavailable,
            // OutsideBox, RowDecode: retrying cannot help; the user or the
            // environment has to change first.
            _ => Transience::Permanent,
        }
    }
}

/// Whether `query` should attach input dependencies to the records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputLoading {
    Skip,
    Load,
}

/// SQLite journaling mode for the index database.
///
/// `Wal` is right for local disks. On network filesystems with unreliable
/// byte-range locking, `Delete` or `Truncate` avoid the shared-memory WAL
/// sidecars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    Wal,
    Delete,
    Truncate,
}

impl JournalMode {
    fn pragma_value(self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
        }
    }
}

/// Tunables for how the index talks to SQLite.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub journal_mode: JournalMode,
    /// Attempts per operation before giving up with `Busy`.
    pub busy_attempts: u32,
    /// First backoff delay; doubles per attempt.
    pub busy_base_delay_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            journal_mode: JournalMode::Wal,
            busy_attempts: 5,
            busy_base_delay_ms: 25,
        }
    }
}

enum Health {
    Healthy,
    Missing,
    Corrupt(String),
}

/// Authoritative index over one box directory.
///
/// A file on disk is invisible to queries until `sync`, `add`, or `rebuild`
/// has indexed it; a row whose file vanished stays until `remove` or
/// `rebuild` clears it.
#[derive(Debug)]
pub struct BoxIndex {
    directory: PathBuf,
    db_path: PathBuf,
    config: IndexConfig,
}

impl BoxIndex {
    /// Open the index for a box directory, creating or repairing it as
    /// needed: a missing database is rebuilt from the directory, an
    /// unreadable or version-mismatched one is set aside and rebuilt, and a
    /// healthy one is synced.
    pub fn open(directory: &Path, config: IndexConfig) -> Result<Self, IndexError> {
        let index = Self {
            directory: directory.to_path_buf(),
            db_path: directory.join(INDEX_FILE),
            config,
        };
        match index.inspect()? {
            Health::Healthy => match index.sync() {
                Ok(()) => {}
                Err(IndexError::ReadOnly { .. }) => {
                    debug!(path = ?index.db_path, "read-only index, skipping sync");
                }
                Err(err) => return Err(err),
            },
            Health::Missing => {
                if let Err(err) = index.rebuild() {
                    return Err(index.unavailable_from(err));
                }
            }
            Health::Corrupt(reason) => {
                index.set_aside(&reason)?;
                index.rebuild()?;
            }
        }
        Ok(index)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Drop and recreate the schema, then re-ingest every archive in the
    /// directory. Runs in one transaction: the previous index contents
    /// survive any mid-rebuild failure. Unreadable archives are skipped.
    pub fn rebuild(&self) -> Result<(), IndexError> {
        self.retrying(|| self.rebuild_once())
    }

    fn rebuild_once(&self) -> Result<(), IndexError> {
        // SQLite opens lazily, so an unreadable file surfaces only once the
        // transaction touches it; set it aside and start over.
        match self.rebuild_with_connection(self.open_connection(true)?) {
            Err(IndexError::Sqlite(err)) if is_corrupt(&err) => {
                self.set_aside("not a SQLite database")?;
                self.rebuild_with_connection(self.open_connection(true)?)
            }
            other => other,
        }
    }

    fn rebuild_with_connection(&self, mut conn: Connection) -> Result<(), IndexError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch("DROP TABLE IF EXISTS inputs; DROP TABLE IF EXISTS beads;")?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        let mut indexed = 0u64;
        let mut skipped = 0u64;
        for path in archive_paths(&self.directory)? {
            let rel = self.relative_path(&path)?;
            match BeadArchive::open(&path, "") {
                Ok(archive) => {
                    insert_archive(&tx, &rel, &archive)?;
                    indexed += 1;
                }
                Err(err) => {
                    warn!(path = ?path, error = %err, "skipping unreadable archive");
                    skipped += 1;
                }
            }
        }
        tx.commit()?;
        info!(indexed, skipped, directory = ?self.directory, "index rebuilt");
        Ok(())
    }

    /// Ingest files present on disk but absent from the index. Files whose
    /// `file_path` is already indexed are assumed valid and not re-read.
    pub fn sync(&self) -> Result<(), IndexError> {
        self.retrying(|| {
            let mut conn = self.open_connection(false)?;
            let indexed: HashSet<String> = {
                let mut stmt = conn.prepare("SELECT file_path FROM beads")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                rows.collect::<Result<_, _>>()?
            };

            let mut pending = Vec::new();
            for path in archive_paths(&self.directory)? {
                let rel = self.relative_path(&path)?;
                if !indexed.contains(&rel) {
                    pending.push((path, rel));
                }
            }
            if pending.is_empty() {
                return Ok(());
            }

            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut added = 0u64;
            let mut skipped = 0u64;
            for (path, rel) in &pending {
                match BeadArchive::open(path, "") {
                    Ok(archive) => {
                        insert_archive(&tx, rel, &archive)?;
                        added += 1;
                    }
                    Err(err) => {
                        warn!(path = ?path, error = %err, "skipping unreadable archive");
                        skipped += 1;
                    }
                }
            }
            tx.commit()?;
            info!(added, skipped, directory = ?self.directory, "index synced");
            Ok(())
        })
    }

    /// Ingest one archive by absolute or box-relative path.
    pub fn add(&self, archive_path: &Path) -> Result<(), IndexError> {
        let abs = self.absolute_path(archive_path);
        let rel = self.relative_path(&abs)?;
        let archive = BeadArchive::open(&abs, "")?;
        self.retrying(|| {
            let mut conn = self.open_connection(false)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            insert_archive(&tx, &rel, &archive)?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Delete the row for one archive path; input rows cascade.
    pub fn remove(&self, archive_path: &Path) -> Result<(), IndexError> {
        let rel = self.relative_path(&self.absolute_path(archive_path))?;
        self.retrying(|| {
            let conn = self.open_connection(false)?;
            let removed = conn.execute("DELETE FROM beads WHERE file_path = ?1", params![rel])?;
            if removed == 0 {
                warn!(path = %rel, "remove: path not present in index");
            }
            Ok(())
        })
    }

    /// Execute a compiled condition query, ordered by freeze time.
    pub fn query(
        &self,
        conditions: &[Condition],
        box_name: &str,
        loading: InputLoading,
    ) -> Result<Vec<BeadRecord>, IndexError> {
        self.read_op(|| {
            let conn = self.open_connection(false)?;
            let (fragment, values) = compile(conditions);

            let mut sql = String::from(
                "SELECT bead_id, name, content_id, kind, freeze_name, freeze_time_str FROM beads",
            );
            if !fragment.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&fragment);
            }
            sql.push_str(" ORDER BY freeze_time_str, content_id");

            let mut ids = Vec::new();
            let mut records = Vec::new();
            {
                let mut stmt = conn.prepare(&sql)?;
                let mut rows = stmt.query(params_from_iter(values.iter()))?;
                while let Some(row) = rows.next()? {
                    ids.push(row.get::<_, i64>(0)?);
                    records.push(decode_bead_row(row, box_name)?);
                }
            }

            if loading == InputLoading::Load {
                let mut by_bead = load_inputs(&conn, &fragment, &values)?;
                for (bead_id, record) in ids.iter().zip(records.iter_mut()) {
                    record.inputs = Some(by_bead.remove(bead_id).unwrap_or_default());
                }
            }
            Ok(records)
        })
    }

    /// Resolve the unique `(name, content_id)` pair to an absolute path.
    pub fn locate(&self, name: &BeadName, content_id: &ContentId) -> Result<PathBuf, IndexError> {
        self.read_op(|| {
            let conn = self.open_connection(false)?;
            let mut stmt = conn.prepare(
                "SELECT file_path FROM beads WHERE name = ?1 AND content_id = ?2 ORDER BY file_path",
            )?;
            let paths: Vec<String> = stmt
                .query_map(params![name.as_str(), content_id.as_str()], |row| row.get(0))?
                .collect::<Result<_, _>>()?;
            match paths.len() {
                0 => Err(IndexError::NotFound {
                    name: name.clone(),
                    content_id: content_id.clone(),
                }),
                1 => Ok(self.directory.join(&paths[0])),
                _ => Err(IndexError::Ambiguous {
                    name: name.clone(),
                    content_id: content_id.clone(),
                    paths,
                }),
            }
        })
    }

    /// Beads that list the given content id among their inputs. Supports
    /// dependency walks without exposing the schema upward.
    pub fn beads_with_input(
        &self,
        content_id: &ContentId,
        box_name: &str,
    ) -> Result<Vec<BeadRecord>, IndexError> {
        self.read_op(|| {
            let conn = self.open_connection(false)?;
            let mut stmt = conn.prepare(
                "SELECT DISTINCT b.bead_id, b.name, b.content_id, b.kind, b.freeze_name, b.freeze_time_str \
                 FROM beads b JOIN inputs i ON i.bead_id = b.bead_id \
                 WHERE i.input_content_id = ?1 \
                 ORDER BY b.freeze_time_str, b.content_id",
            )?;
            let mut rows = stmt.query(params![content_id.as_str()])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(decode_bead_row(row, box_name)?);
            }
            Ok(records)
        })
    }

    fn inspect(&self) -> Result<Health, IndexError> {
        if !self.db_path.exists() {
            return Ok(Health::Missing);
        }
        let conn = match self.open_connection(false) {
            Ok(conn) => conn,
            Err(err) if is_corrupt(&err) => {
                return Ok(Health::Corrupt("not a SQLite database".to_string()));
            }
            Err(err) => return Err(self.grade(err)),
        };
        let version: i64 = match conn.query_row("PRAGMA user_version", [], |row| row.get(0)) {
            Ok(version) => version,
            Err(err) if is_corrupt(&err) => {
                return Ok(Health::Corrupt("corrupted database".to_string()));
            }
            Err(err) => return Err(self.grade(err)),
        };
        if version != SCHEMA_VERSION {
            return Ok(Health::Corrupt(format!(
                "schema version {version}, expected {SCHEMA_VERSION}"
            )));
        }
        match conn.query_row("SELECT COUNT(*) FROM beads", [], |row| row.get::<_, i64>(0)) {
            Ok(_) => Ok(Health::Healthy),
            Err(err) if is_corrupt(&err) => Ok(Health::Corrupt("corrupted database".to_string())),
            Err(_) => Ok(Health::Corrupt("missing beads table".to_string())),
        }
    }

    /// Move an unreadable database out of the way before rebuilding.
    fn set_aside(&self, reason: &str) -> Result<(), IndexError> {
        warn!(path = ?self.db_path, reason = %reason, "setting unusable index aside");
        let target = self.directory.join(CORRUPT_FILE);
        match fs::rename(&self.db_path, &target) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(IndexError::Io {
                    path: self.db_path.clone(),
                    source,
                });
            }
        }
        for suffix in ["-journal", "-wal", "-shm"] {
            let _ = fs::remove_file(self.directory.join(format!("{INDEX_FILE}{suffix}")));
        }
        Ok(())
    }

    fn open_connection(&self, create: bool) -> Result<Connection, rusqlite::Error> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if create {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        let conn = Connection::open_with_flags(&self.db_path, flags)?;
        // Tolerated: WAL may be unavailable on network filesystems and on
        // read-only databases; queries still work in the prior mode.
        if let Err(err) =
            conn.pragma_update(None, "journal_mode", self.config.journal_mode.pragma_value())
        {
            debug!(error = %err, "journal mode pragma not applied");
        }
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Run `op`, retrying busy failures with bounded exponential backoff and
    /// grading the final SQLite error.
    fn retrying<T, F>(&self, mut op: F) -> Result<T, IndexError>
    where
        F: FnMut() -> Result<T, IndexError>,
    {
        let attempts = self.config.busy_attempts.max(1);
        let mut delay = Duration::from_millis(self.config.busy_base_delay_ms);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op() {
                Err(IndexError::Sqlite(err)) if is_busy(&err) => {
                    if attempt >= attempts {
                        return Err(IndexError::Busy {
                            path: self.db_path.clone(),
                            attempts: attempt,
                        });
                    }
                    debug!(attempt, delay = ?delay, "index busy, backing off");
                    thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                }
                Err(IndexError::Sqlite(err)) => return Err(self.grade(err)),
                other => return other,
            }
        }
    }

    /// Read path: corruption detected at query time triggers one automatic
    /// rebuild, then a single retry of the operation.
    fn read_op<T, F>(&self, mut op: F) -> Result<T, IndexError>
    where
        F: FnMut() -> Result<T, IndexError>,
    {
        match self.retrying(&mut op) {
            Err(IndexError::Sqlite(err)) if is_corrupt(&err) => {
                warn!(path = ?self.db_path, "index corrupted at query time, rebuilding");
                self.rebuild()?;
                self.retrying(&mut op)
            }
            other => other,
        }
    }

    fn grade(&self, err: rusqlite::Error) -> IndexError {
        match error_code(&err) {
            Some(ErrorCode::ReadOnly) => IndexError::ReadOnly {
                path: self.db_path.clone(),
            },
            Some(ErrorCode::DiskFull) => IndexError::Unwritable {
                path: self.db_path.clone(),
                source: err,
            },
            _ => IndexError::Sqlite(err),
        }
    }

    fn unavailable_from(&self, err: IndexError) -> IndexError {
        let convert = match &err {
            IndexError::ReadOnly { .. } => true,
            IndexError::Sqlite(inner) => matches!(
                error_code(inner),
                Some(ErrorCode::CannotOpen) | Some(ErrorCode::ReadOnly)
            ),
            _ => false,
        };
        if convert {
            IndexError::Unavailable {
                path: self.db_path.clone(),
                reason: format!("cannot create index: {err}"),
            }
        } else {
            err
        }
    }

    fn absolute_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.directory.join(path)
        }
    }

    fn relative_path(&self, path: &Path) -> Result<String, IndexError> {
        let rel = path
            .strip_prefix(&self.directory)
            .map_err(|_| IndexError::OutsideBox {
                path: path.to_path_buf(),
                directory: self.directory.clone(),
            })?;
        Ok(rel.to_string_lossy().into_owned())
    }
}

/// Archive files currently in a box directory, sorted for determinism.
pub(crate) fn archive_paths(directory: &Path) -> Result<Vec<PathBuf>, IndexError> {
    let entries = fs::read_dir(directory).map_err(|source| IndexError::Io {
        path: directory.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IndexError::Io {
            path: directory.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_archive_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Insert one archive's rows. `INSERT OR REPLACE` keeps `(name, content_id)`
/// and `file_path` unique; a replaced row's inputs go with it via the FK
/// cascade.
fn insert_archive(
    conn: &Connection,
    rel_path: &str,
    archive: &BeadArchive,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO beads \
         (name, content_id, kind, freeze_name, freeze_time_str, file_path) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            archive.name().as_str(),
            archive.content_id().as_str(),
            archive.kind().as_str(),
            archive.freeze_name().as_str(),
            archive.freeze_time().as_str(),
            rel_path,
        ],
    )?;
    let bead_id = conn.last_insert_rowid();
    for input in archive.inputs() {
        conn.execute(
            "INSERT INTO inputs \
             (bead_id, input_name, input_kind, input_content_id, input_freeze_time_str) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bead_id,
                input.name.as_str(),
                input.kind.as_str(),
                input.content_id.as_str(),
                input.freeze_time.as_str(),
            ],
        )?;
    }
    Ok(())
}

/// Decode a row selected as
/// `bead_id, name, content_id, kind, freeze_name, freeze_time_str`.
fn decode_bead_row(row: &Row<'_>, box_name: &str) -> Result<BeadRecord, IndexError> {
    Ok(BeadRecord {
        box_name: box_name.to_string(),
        name: BeadName::new(row.get::<_, String>(1)?)?,
        content_id: ContentId::new(row.get::<_, String>(2)?)?,
        kind: Kind::new(row.get::<_, String>(3)?)?,
        freeze_name: BeadName::new(row.get::<_, String>(4)?)?,
        freeze_time: FreezeTime::parse(row.get::<_, String>(5)?)?,
        inputs: None,
    })
}

/// One batched join keyed by the same WHERE fragment as the bead query.
fn load_inputs(
    conn: &Connection,
    fragment: &str,
    values: &[String],
) -> Result<HashMap<i64, Vec<InputSpec>>, IndexError> {
    let mut sql = String::from(
        "SELECT i.bead_id, i.input_name, i.input_kind, i.input_content_id, i.input_freeze_time_str \
         FROM inputs i JOIN beads b ON b.bead_id = i.bead_id",
    );
    if !fragment.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(fragment);
    }
    sql.push_str(" ORDER BY i.bead_id, i.input_name");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(values.iter()))?;
    let mut by_bead: HashMap<i64, Vec<InputSpec>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let bead_id: i64 = row.get(0)?;
        let spec = InputSpec {
            name: BeadName::new(row.get::<_, String>(1)?)?,
            kind: Kind::new(row.get::<_, String>(2)?)?,
            content_id: ContentId::new(row.get::<_, String>(3)?)?,
            freeze_time: FreezeTime::parse(row.get::<_, String>(4)?)?,
        };
        by_bead.entry(bead_id).or_default().push(spec);
    }
    Ok(by_bead)
}

fn error_code(err: &rusqlite::Error) -> Option<ErrorCode> {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => Some(inner.code),
        _ => None,
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        error_code(err),
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked)
    )
}

fn is_corrupt(err: &rusqlite::Error) -> bool {
    matches!(
        error_code(err),
        Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt)
    )
}
