use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::{migrations::run_migrations, seed::seed_defaults};
use crate::{
    config::DATABASE_NAME,
    error::{Error, Result},
};

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to store thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join store thread: {join_err:?}");
            }
        }
    }
}

/// Durable keyed storage for kits, scan results and settings.
///
/// All statements run on one dedicated thread that owns the connection, so
/// operations from a single caller are applied in submission order. The
/// handle is cheap to clone; clones share the same worker.
#[derive(Clone)]
pub struct RecordStore {
    location: Arc<StoreLocation>,
    inner: Arc<Mutex<Option<Arc<DatabaseInner>>>>,
}

impl RecordStore {
    /// A store backed by the database file at `db_path`. Nothing is opened until
    /// [`RecordStore::initialize`] runs.
    pub fn new(db_path: PathBuf) -> Self {
        Self::with_location(StoreLocation::File(db_path))
    }

    /// A store using the default database file name inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DATABASE_NAME))
    }

    pub fn in_memory() -> Self {
        Self::with_location(StoreLocation::Memory)
    }

    fn with_location(location: StoreLocation) -> Self {
        Self {
            location: Arc::new(location),
            inner: Arc::new(Mutex::new(None)),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        self.location.as_ref()
    }

    /// Database file path, `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        match self.location.as_ref() {
            StoreLocation::File(path) => Some(path.as_path()),
            StoreLocation::Memory => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self.inner.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Open the database, apply migrations and seed defaults.
    ///
    /// Idempotent: once a worker is running, later calls return immediately.
    pub fn initialize(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::StorageInit(anyhow!("store handle lock poisoned")))?;

        if guard.is_some() {
            return Ok(());
        }

        let inner = spawn_worker(self.location.as_ref().clone()).map_err(Error::StorageInit)?;
        *guard = Some(Arc::new(inner));

        match self.location.as_ref() {
            StoreLocation::File(path) => info!("Record store initialized at {}", path.display()),
            StoreLocation::Memory => info!("Record store initialized in memory"),
        }

        Ok(())
    }

    fn handle(&self) -> Result<Arc<DatabaseInner>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| Error::Storage(anyhow!("store handle lock poisoned")))?;
        guard.as_ref().cloned().ok_or(Error::StorageNotInitialized)
    }

    /// Run `task` on the store thread and await its result.
    pub(crate) async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.handle()?;
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("Store caller dropped before receiving result");
            }
        }));

        inner
            .sender
            .send(command)
            .map_err(|err| Error::Storage(anyhow!("failed to send command to store thread: {err}")))?;

        reply_rx
            .await
            .map_err(|_| Error::Storage(anyhow!("store thread terminated unexpectedly")))?
            .map_err(Error::Storage)
    }
}

fn open_connection(location: &StoreLocation) -> anyhow::Result<Connection> {
    match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
            Connection::open(path)
                .with_context(|| format!("failed to open SQLite database {}", path.display()))
        }
        StoreLocation::Memory => {
            Connection::open_in_memory().context("failed to open in-memory SQLite database")
        }
    }
}

fn spawn_worker(location: StoreLocation) -> anyhow::Result<DatabaseInner> {
    let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
    let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<()>>();

    let worker = thread::Builder::new()
        .name("steriscan-store".into())
        .spawn(move || {
            let mut conn = match open_connection(&location) {
                Ok(connection) => connection,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };

            if location != StoreLocation::Memory {
                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }
            }
            if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
                error!("Failed to enable foreign keys: {err}");
            }

            let init_result = run_migrations(&mut conn)
                .context("failed to run database migrations")
                .and_then(|()| seed_defaults(&mut conn).context("failed to seed default records"));
            let init_failed = init_result.is_err();
            if ready_tx.send(init_result).is_err() {
                error!("Store initialization receiver dropped before ready signal");
                return;
            }
            if init_failed {
                return;
            }

            while let Ok(command) = command_rx.recv() {
                match command {
                    DbCommand::Execute(task) => {
                        task(&mut conn);
                    }
                    DbCommand::Shutdown => break,
                }
            }

            info!("Record store thread shutting down");
        })
        .context("failed to spawn record store worker thread")?;

    let ready = ready_rx
        .recv()
        .context("record store worker exited before signaling readiness");

    if let Err(err) = ready.and_then(|result| result) {
        if let Err(join_err) = worker.join() {
            error!("Failed to join store thread: {join_err:?}");
        }
        return Err(err);
    }

    Ok(DatabaseInner {
        sender: command_tx,
        worker: Mutex::new(Some(worker)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let store = RecordStore::in_memory();
        assert!(!store.is_initialized());

        let result = store.execute(|_conn| Ok(())).await;
        assert!(matches!(result, Err(Error::StorageNotInitialized)));
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = RecordStore::in_memory();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert!(store.is_initialized());

        let settings_rows: i64 = store
            .execute(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(settings_rows, 1);
    }

    #[test]
    fn unopenable_location_is_an_init_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let store = RecordStore::new(dir.path().to_path_buf());

        assert!(matches!(store.initialize(), Err(Error::StorageInit(_))));
        assert!(!store.is_initialized());
    }
}
