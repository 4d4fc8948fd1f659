use anyhow::{Context, Result};
use shared::Ledger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

/// File-backed store for the ledger document.
///
/// The store owns the in-memory document behind a mutex; callers lock it,
/// mutate, and call [`LedgerStore::persist`] while still holding the guard.
/// That serializes every read-modify-write sequence, so two requests can
/// never interleave and lose an update.
#[derive(Clone)]
pub struct LedgerStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    document: Mutex<Ledger>,
}

impl LedgerStore {
    /// Open the store at `path`, creating an empty document on disk if the
    /// file does not exist yet. A file that exists but fails to parse is a
    /// startup error; the server refuses to run on a corrupted document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("reading ledger file {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing ledger file {}", path.display()))?
        } else {
            let document = Ledger::default();
            write_document(&path, &document)?;
            info!("Created new ledger file at {}", path.display());
            document
        };

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                document: Mutex::new(document),
            }),
        })
    }

    /// Lock the document. Mutating callers hold the guard across their
    /// mutation and the matching `persist` call.
    pub async fn document(&self) -> MutexGuard<'_, Ledger> {
        self.inner.document.lock().await
    }

    /// Write the whole document to disk.
    pub fn persist(&self, document: &Ledger) -> Result<()> {
        write_document(&self.inner.path, document)
    }
}

/// Whole-file overwrite via a sibling temp file and rename, so a crash
/// mid-write never leaves a truncated document behind.
fn write_document(path: &Path, document: &Ledger) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(document).context("serializing ledger document")?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes)
        .with_context(|| format!("writing ledger file {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("replacing ledger file {}", path.display()))?;
    Ok(())
}
