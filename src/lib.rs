//! # rescat - A Resource Catalog with Dual-Path Retrieval
//!
//! rescat stores links with a free-text description and finds them again in
//! two ways: semantically, by nearest-neighbor search over description
//! embeddings, and by keyword, with a substring scan of the descriptions.
//! The durable table is the source of truth; the vector index is append-only
//! and every hit it returns is re-validated against the table.
//!
//! ## Example
//!
//! ```
//! use rescat::{HashEmbedder, ResourceCatalog, SearchOutcome, TableStore, VectorIndex};
//!
//! let catalog = ResourceCatalog::new(
//!     Box::new(TableStore::in_memory()),
//!     VectorIndex::in_memory(),
//!     Box::new(HashEmbedder::new(384)),
//! );
//!
//! catalog.add("general", "http://a.com", "intro to kubernetes").unwrap();
//!
//! // Search establishes what the session may delete
//! let found = catalog.search("alice", "kubernetes basics").unwrap();
//! assert!(matches!(found, SearchOutcome::BestMatch(ref r) if r.link == "http://a.com"));
//!
//! catalog.delete("alice", "http://a.com").unwrap();
//! assert_eq!(catalog.search("alice", "kubernetes basics").unwrap(), SearchOutcome::NoResults);
//! ```

pub mod vector;
pub mod server;
mod catalog;
mod config;
mod embed;
mod error;
mod index;
mod resource;
mod session;
mod snapshot;
mod store;

// Re-export the catalog and its collaborators as the primary public API
pub use catalog::{AddOutcome, Reply, ResourceCatalog, SearchOutcome, MAX_KEYWORD_MATCHES};
pub use config::CatalogConfig;
pub use embed::{Embedder, HashEmbedder};
pub use error::{CatalogError, CatalogResult};
pub use index::VectorIndex;
pub use resource::{Resource, ResourceId, DEFAULT_CATEGORY};
pub use session::{SessionSlot, SessionState};
pub use store::{Store, TableStore};
