//! The durable table of resources.
//!
//! [`Store`] is the table contract the catalog relies on: point lookups keyed
//! by `(id, category)`, full scans, puts and deletes. Filtered lookups are
//! provided as scans over [`Store::scan`], so a backend only has to implement
//! the primitive calls. [`TableStore`] is the bundled backend: records kept in
//! insertion order and snapshotted as JSON after every write.

use crate::error::{CatalogError, CatalogResult};
use crate::snapshot::replace_file;
use crate::resource::{normalize_category, normalize_link, normalize_text, Resource, ResourceId};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub trait Store: Send + Sync {
    /// Persists `resource`, rejecting it with [`CatalogError::DuplicateLink`]
    /// when a live record already has the same link.
    fn put(&mut self, resource: Resource) -> CatalogResult<()>;

    /// Point lookup on the composite key.
    fn get(&self, id: &ResourceId, category: &str) -> CatalogResult<Resource>;

    /// Every record, in a deterministic order.
    fn scan(&self) -> CatalogResult<Vec<Resource>>;

    /// Removes the record; an absent key is not an error.
    fn delete(&mut self, id: &ResourceId, category: &str) -> CatalogResult<()>;

    fn count(&self) -> CatalogResult<usize> {
        Ok(self.scan()?.len())
    }

    fn find_by_link(&self, link: &str) -> CatalogResult<Vec<Resource>> {
        let link = normalize_link(link);
        Ok(self.scan()?
            .into_iter()
            .filter(|r| r.link == link)
            .collect())
    }

    /// Case-insensitive substring match over descriptions.
    fn find_by_keyword_in_description(&self, keyword: &str) -> CatalogResult<Vec<Resource>> {
        let keyword = normalize_text(keyword);
        Ok(self.scan()?
            .into_iter()
            .filter(|r| r.description.contains(&keyword))
            .collect())
    }

    fn find_by_category(&self, category: &str) -> CatalogResult<Vec<Resource>> {
        let category = normalize_category(category);
        Ok(self.scan()?
            .into_iter()
            .filter(|r| r.category == category)
            .collect())
    }

    /// Deletes every record one by one; the first failing delete aborts the
    /// sweep and leaves already-deleted records deleted.
    fn delete_all(&mut self) -> CatalogResult<()> {
        for resource in self.scan()? {
            self.delete(&resource.id, &resource.category)?;
        }
        Ok(())
    }
}

#[derive(Default, Serialize, Deserialize)]
struct Table {
    records: Vec<Resource>,
}

/// Insertion-ordered table, optionally backed by a JSON snapshot file.
pub struct TableStore {
    table: Table,
    path: Option<PathBuf>,
}

impl TableStore {
    /// A table that lives only as long as the process.
    pub fn in_memory() -> TableStore {
        TableStore { table: Table::default(), path: None }
    }

    /// Opens the table at `path`, starting empty when the file does not exist.
    ///
    /// An unreadable or corrupt file is reported as
    /// [`CatalogError::StorageUnavailable`] rather than silently discarded.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<TableStore> {
        let path = path.as_ref().to_path_buf();

        let table = if path.exists() {
            let file = File::open(&path)
                .map_err(|e| storage_error(&path, e))?;
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| storage_error(&path, e))?
        } else {
            Table::default()
        };

        info!(path = %path.display(), records = table.records.len(), "opened resource table");
        Ok(TableStore { table, path: Some(path) })
    }

    fn flush(&self) -> CatalogResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        replace_file(path, |writer| {
            serde_json::to_writer(writer, &self.table).map_err(std::io::Error::from)
        })
        .map_err(|e| storage_error(path, e))
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> CatalogError {
    CatalogError::StorageUnavailable(format!("'{}': {}", path.display(), err))
}

impl Store for TableStore {
    fn put(&mut self, resource: Resource) -> CatalogResult<()> {
        if !self.find_by_link(&resource.link)?.is_empty() {
            return Err(CatalogError::DuplicateLink(resource.link));
        }

        debug!(id = %resource.id, category = %resource.category, link = %resource.link, "storing resource");
        self.table.records.push(resource);

        if let Err(e) = self.flush() {
            self.table.records.pop();
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, id: &ResourceId, category: &str) -> CatalogResult<Resource> {
        self.table.records
            .iter()
            .find(|r| &r.id == id && r.category == category)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("{} in category {}", id, category)))
    }

    fn scan(&self) -> CatalogResult<Vec<Resource>> {
        Ok(self.table.records.clone())
    }

    fn delete(&mut self, id: &ResourceId, category: &str) -> CatalogResult<()> {
        let Some(position) = self.table.records
            .iter()
            .position(|r| &r.id == id && r.category == category)
        else {
            debug!(%id, category, "delete of absent resource");
            return Ok(());
        };

        let removed = self.table.records.remove(position);
        if let Err(e) = self.flush() {
            self.table.records.insert(position, removed);
            return Err(e);
        }

        debug!(%id, category, "deleted resource");
        Ok(())
    }

    fn count(&self) -> CatalogResult<usize> {
        Ok(self.table.records.len())
    }
}
