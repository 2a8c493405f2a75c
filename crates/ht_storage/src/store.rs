use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ht_core::{Error, Result};
use tracing::debug;

use crate::{xml, Ledger};

/// File-backed access to the ledger.
///
/// The backing file is materialized lazily: the first `load` against a
/// missing path persists an empty document before returning. Every `save`
/// rewrites the whole document through a temp file in the same directory and
/// renames it into place, so a crash mid-write cannot truncate the previous
/// valid file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full ledger from disk, creating an empty one if the backing
    /// file does not exist yet.
    pub fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "backing file missing, creating an empty ledger");
            let ledger = Ledger::new();
            self.save(&ledger)?;
            return Ok(ledger);
        }

        let text = fs::read_to_string(&self.path)?;
        xml::decode(&text).map_err(|e| match e {
            Error::Corrupt(detail) => {
                Error::Corrupt(format!("{}: {detail}", self.path.display()))
            }
            other => other,
        })
    }

    /// Overwrite the backing file with the given ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let bytes = xml::encode(ledger)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent)?;
                parent
            }
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Locate the article with the given id, flip its read flag and persist.
    ///
    /// A failed lookup happens before the save, so it leaves the previous
    /// file untouched.
    pub fn set_read_state(&self, id: u32, read: bool) -> Result<()> {
        let mut ledger = self.load()?;
        ledger.set_read_state(id, read)?;
        self.save(&ledger)
    }
}
