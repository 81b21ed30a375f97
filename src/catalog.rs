//! The resource catalog.
//!
//! [`ResourceCatalog`] owns the durable [`Store`] and the [`VectorIndex`] and
//! keeps them in step: every add writes the table first and then the index,
//! every search asks the index first and re-validates its answer against the
//! table, and deletes only go through a session slot set by a prior search.
//!
//! The two writes of an add are not transactional. If the table write
//! succeeds and the embedding or index write fails, the record stays in the
//! table and is reachable by keyword search only; the add then reports
//! [`AddOutcome::StoredUnindexed`] instead of a clean success.

use crate::config::CatalogConfig;
use crate::embed::{Embedder, HashEmbedder};
use crate::error::{CatalogError, CatalogResult};
use crate::index::VectorIndex;
use crate::resource::{normalize_link, normalize_text, Resource};
use crate::session::{SessionSlot, SessionState};
use crate::store::{Store, TableStore};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Keyword fallback never surfaces more than this many matches.
pub const MAX_KEYWORD_MATCHES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// In the table and in the index.
    Stored(Resource),
    /// In the table only; `cause` is why indexing failed.
    StoredUnindexed { resource: Resource, cause: CatalogError },
}

impl AddOutcome {
    pub fn resource(&self) -> &Resource {
        match self {
            AddOutcome::Stored(resource) => resource,
            AddOutcome::StoredUnindexed { resource, .. } => resource,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Semantic hit confirmed against the table.
    BestMatch(Resource),
    /// Keyword fallback, at most [`MAX_KEYWORD_MATCHES`] entries.
    Matches(Vec<Resource>),
    NoResults,
}

/// Caller-facing rendering of an operation: a success flag and a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub ok: bool,
    pub message: String,
}

impl Reply {
    pub fn ok(message: impl Into<String>) -> Reply {
        Reply { ok: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Reply {
        Reply { ok: false, message: message.into() }
    }

    pub fn from_result<T: Into<Reply>>(result: CatalogResult<T>) -> Reply {
        match result {
            Ok(value) => value.into(),
            Err(e) => e.into(),
        }
    }
}

impl From<CatalogError> for Reply {
    fn from(err: CatalogError) -> Self {
        Reply::failed(err.to_string())
    }
}

impl From<AddOutcome> for Reply {
    fn from(outcome: AddOutcome) -> Self {
        match outcome {
            AddOutcome::Stored(_) => Reply::ok("Resource saved successfully!"),
            AddOutcome::StoredUnindexed { cause, .. } => Reply::ok(format!(
                "Resource saved, but semantic search is unavailable for it ({}). It can still be found by keyword.",
                cause
            )),
        }
    }
}

impl From<SearchOutcome> for Reply {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::BestMatch(resource) => Reply::ok(format!(
                "Best match: {}\n\nUse delete {} to remove it.",
                resource.link, resource.link
            )),
            SearchOutcome::Matches(matches) => {
                let mut message = "Here are some matches:\n\n".to_string();
                for resource in &matches {
                    message.push_str(&format!("• {} - {}\n\n", resource.link, resource.description));
                }
                message.push_str("Use delete <link> to remove a resource.");
                Reply::ok(message)
            }
            SearchOutcome::NoResults => Reply::ok("No matching resources found."),
        }
    }
}

impl From<SessionSlot> for Reply {
    fn from(slot: SessionSlot) -> Self {
        Reply::ok(format!("Resource {} deleted successfully.", slot.link))
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::ok("All entries deleted successfully.")
    }
}

struct Inner {
    store: Box<dyn Store>,
    index: VectorIndex,
}

pub struct ResourceCatalog {
    inner: RwLock<Inner>,
    embedder: Box<dyn Embedder>,
    sessions: SessionState,
    default_category: String,
}

impl ResourceCatalog {
    pub fn new(store: Box<dyn Store>, index: VectorIndex, embedder: Box<dyn Embedder>) -> ResourceCatalog {
        ResourceCatalog {
            inner: RwLock::new(Inner { store, index }),
            embedder,
            sessions: SessionState::new(),
            default_category: crate::resource::DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Opens the file-backed table and index named by `config`, embedding
    /// with a [`HashEmbedder`] of the configured dimension.
    pub fn open(config: &CatalogConfig) -> CatalogResult<ResourceCatalog> {
        let store = TableStore::open(&config.store_path)?;
        let index = VectorIndex::open(&config.index_path)?;
        let embedder = HashEmbedder::new(config.embedding_dim);

        // Vectors from a different embedding width can never be compared
        if let Some(indexed) = index.dimension() {
            if indexed != embedder.dimension() {
                error!(
                    path = %config.index_path.display(),
                    indexed,
                    configured = embedder.dimension(),
                    "index snapshot was built with a different embedding dimension"
                );
                return Err(CatalogError::DimensionMismatch {
                    expected: indexed,
                    actual: embedder.dimension(),
                });
            }
        }

        let catalog = ResourceCatalog::new(Box::new(store), index, Box::new(embedder))
            .with_default_category(&config.default_category);

        let (records, vectors) = catalog.count()?;
        info!(records, vectors, "resource catalog ready");
        Ok(catalog)
    }

    pub fn with_default_category(mut self, category: &str) -> ResourceCatalog {
        let category = normalize_text(category);
        if !category.is_empty() {
            self.default_category = category;
        }
        self
    }

    /// Stores a resource in the table, then indexes its description.
    ///
    /// A blank `category` takes the catalog default. A link already present
    /// anywhere in the catalog is rejected with
    /// [`CatalogError::DuplicateLink`] before anything is written.
    pub fn add(&self, category: &str, link: &str, description: &str) -> CatalogResult<AddOutcome> {
        if normalize_link(link).is_empty() {
            return Err(CatalogError::InvalidInput("link must not be empty".to_string()));
        }
        if normalize_text(description).is_empty() {
            return Err(CatalogError::InvalidInput("description must not be empty".to_string()));
        }
        let category = if category.trim().is_empty() { self.default_category.as_str() } else { category };

        let mut inner = self.inner.write();
        let resource = Resource::new(category, link, description);
        inner.store.put(resource.clone())?;
        info!(id = %resource.id, category = %resource.category, link = %resource.link, "stored resource");

        let indexed = self.embedder
            .embed(&resource.description)
            .and_then(|vector| inner.index.add(&resource.link, vector));

        match indexed {
            Ok(()) => Ok(AddOutcome::Stored(resource)),
            Err(cause) => {
                warn!(
                    link = %resource.link,
                    error = %cause,
                    "resource stored but not indexed, reachable by keyword only"
                );
                Ok(AddOutcome::StoredUnindexed { resource, cause })
            }
        }
    }

    /// Finds the best match for `query` on behalf of `session`.
    ///
    /// The nearest indexed vector is only trusted once its link is found in
    /// the table; a stale or missing hit falls back to a keyword scan of
    /// descriptions. A confirmed semantic hit overwrites the session slot, a
    /// keyword result fills it only when the session has none. No result
    /// leaves the slot untouched.
    pub fn search(&self, session: &str, query: &str) -> CatalogResult<SearchOutcome> {
        let query = normalize_text(query);
        if query.is_empty() {
            return Err(CatalogError::InvalidInput("query must not be empty".to_string()));
        }

        let inner = self.inner.read();

        if let Some(resource) = self.semantic_match(&inner, &query)? {
            self.sessions.set(session, SessionSlot::from(&resource));
            debug!(session, link = %resource.link, "semantic match");
            return Ok(SearchOutcome::BestMatch(resource));
        }

        let mut matches = inner.store.find_by_keyword_in_description(&query)?;
        if matches.is_empty() {
            debug!(session, query = %query, "no matches");
            return Ok(SearchOutcome::NoResults);
        }
        matches.truncate(MAX_KEYWORD_MATCHES);

        if self.sessions.set_if_absent(session, SessionSlot::from(&matches[0])) {
            debug!(session, link = %matches[0].link, "session slot filled from keyword match");
        }
        Ok(SearchOutcome::Matches(matches))
    }

    fn semantic_match(&self, inner: &Inner, query: &str) -> CatalogResult<Option<Resource>> {
        if inner.index.is_empty() {
            return Ok(None);
        }

        let vector = match self.embedder.embed(query) {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "query embedding failed, falling back to keyword search");
                return Ok(None);
            }
        };

        let hits = match inner.index.search(&vector, 1) {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "index search failed, falling back to keyword search");
                return Ok(None);
            }
        };

        let Some((link, distance)) = hits.into_iter().next() else {
            return Ok(None);
        };

        let live = inner.store.find_by_link(&link)?.into_iter().next();
        if live.is_none() {
            debug!(link = %link, distance, "nearest vector is stale");
        }
        Ok(live)
    }

    /// Deletes the resource the session's last search surfaced.
    ///
    /// `link` must equal the slot's link; otherwise, or without a slot, the
    /// call fails with [`CatalogError::NoMatchingSession`]. The vector slot is
    /// left in the index and filtered out by later searches.
    pub fn delete(&self, session: &str, link: &str) -> CatalogResult<SessionSlot> {
        let link = normalize_link(link);

        let mut inner = self.inner.write();
        let slot = self.sessions
            .matching(session, &link)
            .ok_or(CatalogError::NoMatchingSession)?;

        if let Err(e) = inner.store.get(&slot.resource_id, &slot.category) {
            if matches!(e, CatalogError::NotFound(_)) {
                self.sessions.clear_if(session, &slot);
            }
            return Err(e);
        }

        inner.store.delete(&slot.resource_id, &slot.category)?;
        self.sessions.clear_if(session, &slot);

        info!(session, id = %slot.resource_id, category = %slot.category, link = %slot.link, "deleted resource");
        Ok(slot)
    }

    /// Empties the table. The index is left as is; its stale slots no longer
    /// validate, so searches come back empty.
    pub fn delete_all(&self) -> CatalogResult<()> {
        let mut inner = self.inner.write();
        let before = inner.store.count()?;
        inner.store.delete_all()?;
        info!(deleted = before, "deleted all resources");
        Ok(())
    }

    pub fn list(&self, category: &str) -> CatalogResult<Vec<Resource>> {
        let category = if category.trim().is_empty() { self.default_category.as_str() } else { category };
        self.inner.read().store.find_by_category(category)
    }

    /// `(records in the table, slots in the index)`.
    pub fn count(&self) -> CatalogResult<(usize, usize)> {
        let inner = self.inner.read();
        Ok((inner.store.count()?, inner.index.count()))
    }

    pub fn session(&self, session: &str) -> Option<SessionSlot> {
        self.sessions.get(session)
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;
    use crate::resource::ResourceId;
    use std::collections::HashMap;

    /// Embeds from a fixed table; anything else is unavailable.
    struct TableEmbedder(HashMap<String, Vec<f32>>);

    impl TableEmbedder {
        fn new(pairs: &[(&str, [f32; 3])]) -> TableEmbedder {
            TableEmbedder(pairs.iter().map(|(t, v)| (t.to_string(), v.to_vec())).collect())
        }
    }

    impl Embedder for TableEmbedder {
        fn dimension(&self) -> usize {
            3
        }

        fn embed(&self, text: &str) -> CatalogResult<Vec<f32>> {
            self.0
                .get(text)
                .cloned()
                .ok_or_else(|| CatalogError::EmbeddingUnavailable(format!("no vector for '{}'", text)))
        }
    }

    /// Every call fails as if the table service were down.
    struct DownStore;

    impl Store for DownStore {
        fn put(&mut self, _: Resource) -> CatalogResult<()> {
            Err(CatalogError::StorageUnavailable("down".to_string()))
        }
        fn get(&self, _: &ResourceId, _: &str) -> CatalogResult<Resource> {
            Err(CatalogError::StorageUnavailable("down".to_string()))
        }
        fn scan(&self) -> CatalogResult<Vec<Resource>> {
            Err(CatalogError::StorageUnavailable("down".to_string()))
        }
        fn delete(&mut self, _: &ResourceId, _: &str) -> CatalogResult<()> {
            Err(CatalogError::StorageUnavailable("down".to_string()))
        }
    }

    fn hashed_catalog() -> ResourceCatalog {
        ResourceCatalog::new(
            Box::new(TableStore::in_memory()),
            VectorIndex::in_memory(),
            Box::new(HashEmbedder::new(384)),
        )
    }

    fn table_catalog(pairs: &[(&str, [f32; 3])]) -> ResourceCatalog {
        ResourceCatalog::new(
            Box::new(TableStore::in_memory()),
            VectorIndex::in_memory(),
            Box::new(TableEmbedder::new(pairs)),
        )
    }

    #[test]
    fn test_add_search_delete_scenario() {
        let catalog = hashed_catalog();
        let added = catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        assert!(matches!(added, AddOutcome::Stored(_)));

        let found = catalog.search("alice", "kubernetes basics").unwrap();
        let SearchOutcome::BestMatch(resource) = found else {
            panic!("expected a best match, got {:?}", found);
        };
        assert_eq!(resource.link, "http://a.com");

        let slot = catalog.session("alice").unwrap();
        assert_eq!(slot.resource_id, added.resource().id);
        assert_eq!(slot.category, "general");
        assert_eq!(slot.link, "http://a.com");

        catalog.delete("alice", "http://a.com").unwrap();
        assert_eq!(catalog.count().unwrap(), (0, 1));

        let again = catalog.search("alice", "kubernetes basics").unwrap();
        assert_eq!(again, SearchOutcome::NoResults);
    }

    #[test]
    fn test_duplicate_link_rejected() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "x").unwrap();

        let result = catalog.add("general", "http://a.com", "y");
        assert_eq!(result, Err(CatalogError::DuplicateLink("http://a.com".to_string())));

        let (records, vectors) = catalog.count().unwrap();
        assert_eq!(records, 1);
        assert_eq!(vectors, 1);
    }

    #[test]
    fn test_duplicate_link_across_categories() {
        let catalog = hashed_catalog();
        catalog.add("career", "http://a.com", "x").unwrap();

        let result = catalog.add("general", " http://a.com ", "y");
        assert!(matches!(result, Err(CatalogError::DuplicateLink(_))));
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let catalog = hashed_catalog();
        assert!(matches!(catalog.add("general", "  ", "x"), Err(CatalogError::InvalidInput(_))));
        assert!(matches!(catalog.add("general", "http://a.com", " "), Err(CatalogError::InvalidInput(_))));
        assert_eq!(catalog.count().unwrap(), (0, 0));
    }

    #[test]
    fn test_blank_category_uses_default() {
        let catalog = hashed_catalog().with_default_category("Career");
        let added = catalog.add("", "http://a.com", "x").unwrap();

        assert_eq!(added.resource().category, "career");
        assert_eq!(catalog.list("").unwrap().len(), 1);
    }

    #[test]
    fn test_round_trip_by_description() {
        let catalog = hashed_catalog();
        let entries = [
            ("http://a.com", "intro to kubernetes"),
            ("http://b.com", "rust ownership and borrowing"),
            ("http://c.com", "writing a resume for tech jobs"),
            ("http://d.com", "system design interview guide"),
        ];
        for (link, description) in entries {
            catalog.add("general", link, description).unwrap();
        }

        for (link, description) in entries {
            match catalog.search("alice", description).unwrap() {
                SearchOutcome::BestMatch(resource) => assert_eq!(resource.link, link),
                other => panic!("expected best match for {}, got {:?}", link, other),
            }
        }
    }

    #[test]
    fn test_delete_without_search_is_rejected() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();

        let result = catalog.delete("alice", "http://a.com");
        assert_eq!(result, Err(CatalogError::NoMatchingSession));
        assert_eq!(catalog.count().unwrap().0, 1);
    }

    #[test]
    fn test_delete_requires_same_link_and_session() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        catalog.search("alice", "kubernetes").unwrap();

        assert_eq!(catalog.delete("alice", "http://b.com"), Err(CatalogError::NoMatchingSession));
        assert_eq!(catalog.delete("bob", "http://a.com"), Err(CatalogError::NoMatchingSession));
        assert!(catalog.delete("alice", " http://a.com ").is_ok());
    }

    #[test]
    fn test_repeat_delete_is_rejected() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        catalog.search("alice", "kubernetes").unwrap();

        catalog.delete("alice", "http://a.com").unwrap();
        assert!(catalog.session("alice").is_none());
        assert_eq!(catalog.delete("alice", "http://a.com"), Err(CatalogError::NoMatchingSession));
    }

    #[test]
    fn test_delete_of_vanished_record_reports_not_found() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        catalog.search("alice", "kubernetes").unwrap();
        catalog.delete_all().unwrap();

        let result = catalog.delete("alice", "http://a.com");
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
        assert!(catalog.session("alice").is_none());
    }

    #[test]
    fn test_stale_top_hit_falls_back_to_keyword() {
        let catalog = table_catalog(&[
            ("rust async", [1.0, 0.0, 0.0]),
            ("rust ownership guide", [0.0, 1.0, 0.0]),
            ("rust", [0.9, 0.1, 0.0]),
        ]);
        catalog.add("general", "http://async.com", "rust async").unwrap();
        catalog.add("general", "http://own.com", "rust ownership guide").unwrap();

        // Nearest to "rust" is the async entry
        let first = catalog.search("alice", "rust").unwrap();
        assert!(matches!(first, SearchOutcome::BestMatch(ref r) if r.link == "http://async.com"));
        catalog.delete("alice", "http://async.com").unwrap();

        // Its vector is still nearest but no longer authoritative
        let second = catalog.search("alice", "rust").unwrap();
        let SearchOutcome::Matches(matches) = second else {
            panic!("expected keyword matches, got {:?}", second);
        };
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].link, "http://own.com");
        assert_eq!(catalog.session("alice").unwrap().link, "http://own.com");
    }

    #[test]
    fn test_unindexed_add_is_reported_and_keyword_searchable() {
        let catalog = table_catalog(&[]);
        let added = catalog.add("general", "http://a.com", "Intro to Kubernetes").unwrap();

        let AddOutcome::StoredUnindexed { cause, .. } = &added else {
            panic!("expected unindexed add, got {:?}", added);
        };
        assert!(matches!(cause, CatalogError::EmbeddingUnavailable(_)));
        assert_eq!(catalog.count().unwrap(), (1, 0));

        let reply = Reply::from(added.clone());
        assert!(reply.ok);
        assert_ne!(reply, Reply::from(AddOutcome::Stored(added.resource().clone())));

        let found = catalog.search("alice", "kubernetes").unwrap();
        assert!(matches!(found, SearchOutcome::Matches(ref m) if m[0].link == "http://a.com"));
        assert!(catalog.delete("alice", "http://a.com").is_ok());
    }

    #[test]
    fn test_keyword_fallback_keeps_existing_slot() {
        let catalog = table_catalog(&[("kubernetes", [1.0, 0.0, 0.0])]);
        catalog.add("general", "http://a.com", "kubernetes").unwrap();
        catalog.search("alice", "kubernetes").unwrap();
        // Unembeddable description, reachable by keyword only
        catalog.add("general", "http://b.com", "docker handbook").unwrap();

        let found = catalog.search("alice", "docker").unwrap();
        assert!(matches!(found, SearchOutcome::Matches(_)));
        assert_eq!(catalog.session("alice").unwrap().link, "http://a.com");
    }

    #[test]
    fn test_keyword_fallback_caps_matches() {
        let catalog = table_catalog(&[]);
        for i in 0..5 {
            catalog.add("general", &format!("http://{}.com", i), &format!("rust book {}", i)).unwrap();
        }

        let SearchOutcome::Matches(matches) = catalog.search("alice", "rust").unwrap() else {
            panic!("expected keyword matches");
        };
        let links: Vec<_> = matches.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["http://0.com", "http://1.com", "http://2.com"]);
        assert_eq!(catalog.session("alice").unwrap().link, "http://0.com");
    }

    #[test]
    fn test_no_results_leaves_slot_untouched() {
        let catalog = table_catalog(&[("kubernetes", [1.0, 0.0, 0.0])]);
        catalog.add("general", "http://a.com", "kubernetes").unwrap();
        catalog.search("alice", "kubernetes").unwrap();
        let before = catalog.session("alice").unwrap();
        assert_eq!(before.link, "http://a.com");

        assert_eq!(catalog.search("alice", "cooking").unwrap(), SearchOutcome::NoResults);
        assert_eq!(catalog.session("alice"), Some(before));
    }

    #[test]
    fn test_empty_query_rejected() {
        let catalog = hashed_catalog();
        assert!(matches!(catalog.search("alice", "   "), Err(CatalogError::InvalidInput(_))));
    }

    #[test]
    fn test_delete_all_twice() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        catalog.add("career", "http://b.com", "resume tips").unwrap();

        catalog.delete_all().unwrap();
        catalog.delete_all().unwrap();
        assert_eq!(catalog.count().unwrap().0, 0);
        assert_eq!(catalog.search("alice", "resume tips").unwrap(), SearchOutcome::NoResults);
    }

    #[test]
    fn test_link_reusable_after_delete() {
        let catalog = hashed_catalog();
        catalog.add("general", "http://a.com", "old description").unwrap();
        catalog.search("alice", "old description").unwrap();
        catalog.delete("alice", "http://a.com").unwrap();

        catalog.add("general", "http://a.com", "new description").unwrap();
        let found = catalog.search("alice", "new description").unwrap();
        assert!(matches!(found, SearchOutcome::BestMatch(ref r) if r.description == "new description"));
    }

    #[test]
    fn test_list_by_category() {
        let catalog = hashed_catalog();
        catalog.add("career", "http://a.com", "resume").unwrap();
        catalog.add("general", "http://b.com", "kubernetes").unwrap();

        let career = catalog.list("Career").unwrap();
        assert_eq!(career.len(), 1);
        assert_eq!(career[0].link, "http://a.com");
    }

    #[test]
    fn test_storage_failures_propagate() {
        let catalog = ResourceCatalog::new(
            Box::new(DownStore),
            VectorIndex::in_memory(),
            Box::new(HashEmbedder::new(8)),
        );

        assert!(matches!(catalog.add("general", "http://a.com", "x"), Err(CatalogError::StorageUnavailable(_))));
        assert!(matches!(catalog.search("alice", "x"), Err(CatalogError::StorageUnavailable(_))));
        assert!(matches!(catalog.delete_all(), Err(CatalogError::StorageUnavailable(_))));
        assert_eq!(catalog.count().map(|_| ()), Err(CatalogError::StorageUnavailable("down".to_string())));
    }

    #[test]
    fn test_reply_messages() {
        let resource = Resource::new("general", "http://a.com", "intro");

        let reply = Reply::from(SearchOutcome::BestMatch(resource.clone()));
        assert!(reply.message.starts_with("Best match: http://a.com"));

        let reply = Reply::from(SearchOutcome::Matches(vec![resource]));
        assert!(reply.message.contains("• http://a.com - intro"));

        let reply = Reply::from_result::<SessionSlot>(Err(CatalogError::NoMatchingSession));
        assert_eq!(reply, Reply::failed("No matching search result found for deletion."));
    }

    #[test]
    fn test_open_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            store_path: dir.path().join("catalog.json"),
            index_path: dir.path().join("catalog.index"),
            embedding_dim: 64,
            ..CatalogConfig::default()
        };

        let catalog = ResourceCatalog::open(&config).unwrap();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        catalog.search("alice", "kubernetes").unwrap();
        drop(catalog);

        let reopened = ResourceCatalog::open(&config).unwrap();
        assert_eq!(reopened.count().unwrap(), (1, 1));
        // Sessions do not outlive the process
        assert!(reopened.session("alice").is_none());
        assert!(matches!(
            reopened.search("alice", "kubernetes").unwrap(),
            SearchOutcome::BestMatch(ref r) if r.link == "http://a.com"
        ));
    }

    #[test]
    fn test_open_rejects_changed_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CatalogConfig {
            store_path: dir.path().join("catalog.json"),
            index_path: dir.path().join("catalog.index"),
            embedding_dim: 64,
            ..CatalogConfig::default()
        };

        let catalog = ResourceCatalog::open(&config).unwrap();
        catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
        drop(catalog);

        config.embedding_dim = 128;
        let result = ResourceCatalog::open(&config);
        assert!(matches!(
            result,
            Err(CatalogError::DimensionMismatch { expected: 64, actual: 128 })
        ));
    }

    #[test]
    fn test_open_empty_index_accepts_any_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            store_path: dir.path().join("catalog.json"),
            index_path: dir.path().join("catalog.index"),
            embedding_dim: 32,
            ..CatalogConfig::default()
        };

        drop(ResourceCatalog::open(&config).unwrap());
        let reopened = ResourceCatalog::open(&CatalogConfig { embedding_dim: 16, ..config }).unwrap();
        assert_eq!(reopened.count().unwrap(), (0, 0));
    }
}
